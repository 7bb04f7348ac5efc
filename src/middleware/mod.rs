//! Middleware and extractors for cross-cutting request concerns.
//!
//! - [`auth`]: resolves the session user and gates protected pages
//! - [`csrf`]: per-session token check on state-changing requests
//! - [`headers`]: security headers on every response
//! - [`recover`]: panic recovery and the opt-in debug error body
//!
//! # Ordering
//!
//! Dynamic pages run, outermost first: session load/save (with the 5xx save
//! from [`crate::session::save_on_server_error`]), CSRF check,
//! authentication, then (for protected pages) the login gate. The login
//! gate therefore always sees a resolved [`auth::AuthContext`], and the
//! session is saved after every handler exit.
//!
//! ```ignore
//! let protected = Router::new()
//!     .route("/account/view", get(account_view))
//!     .route_layer(middleware::from_fn(require_authentication));
//! ```

pub mod auth;
pub mod csrf;
pub mod headers;
pub mod recover;
