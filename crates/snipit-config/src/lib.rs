//! # Snipit Config
//!
//! Configuration types for the Snipit web application.
//!
//! Every section is loaded from environment variables (a `.env` file is
//! honoured by the binary through `dotenvy`) and falls back to defaults
//! suited to local development:
//!
//! - [`server`]: listen address, debug mode, static asset directory
//! - [`database`]: PostgreSQL connection settings
//! - [`session`]: session cookie and lifetime settings
//!
//! # Example
//!
//! ```ignore
//! use snipit_config::AppConfig;
//!
//! let config = AppConfig::from_env();
//! println!("listening on {}", config.server.addr);
//! ```

pub mod database;
pub mod server;
pub mod session;

// Re-export commonly used types at crate root
pub use database::DatabaseConfig;
pub use server::ServerConfig;
pub use session::SessionConfig;

#[derive(Clone, Debug, Default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub session: SessionConfig,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            server: ServerConfig::from_env(),
            database: DatabaseConfig::from_env(),
            session: SessionConfig::from_env(),
        }
    }
}

/// Reads a boolean flag, accepting `true`/`1` (any case) as set.
pub(crate) fn env_flag(name: &str) -> Option<bool> {
    std::env::var(name)
        .ok()
        .map(|v| v.eq_ignore_ascii_case("true") || v == "1")
}
