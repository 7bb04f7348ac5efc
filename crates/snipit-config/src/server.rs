use std::env;

use crate::env_flag;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServerConfig {
    pub addr: String,
    /// Exposes server error chains in 500 responses. Never enable in production.
    pub debug: bool,
    pub static_dir: String,
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self {
            addr: env::var("SERVER_ADDR").unwrap_or_else(|_| "0.0.0.0:4000".to_string()),
            debug: env_flag("DEBUG").unwrap_or(false),
            static_dir: env::var("STATIC_DIR").unwrap_or_else(|_| "./ui/static".to_string()),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: "0.0.0.0:4000".to_string(),
            debug: false,
            static_dir: "./ui/static".to_string(),
        }
    }
}
