//! # Snipit Models
//!
//! Domain models and their stores.
//!
//! Each store is a trait so the web layer depends on a capability rather
//! than on PostgreSQL:
//!
//! - [`snippets::SnippetStore`], implemented by [`snippets::PgSnippetStore`]
//! - [`users::UserStore`], implemented by [`users::PgUserStore`]
//!
//! With the `test-utils` feature, [`mocks`] provides in-memory
//! implementations of both traits.

pub mod errors;
#[cfg(any(test, feature = "test-utils"))]
pub mod mocks;
pub mod snippets;
pub mod users;

// Re-export commonly used types at crate root
pub use errors::ModelError;
pub use snippets::{PgSnippetStore, Snippet, SnippetStore};
pub use users::{PgUserStore, User, UserStore};
