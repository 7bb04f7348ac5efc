//! # Snipit DB
//!
//! Database pool initialisation for the Snipit web application.
//!
//! # Example
//!
//! ```ignore
//! use snipit_config::DatabaseConfig;
//! use snipit_db::init_db_pool;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), sqlx::Error> {
//!     let pool = init_db_pool(&DatabaseConfig::from_env()).await?;
//!     // Use pool for database operations
//!     Ok(())
//! }
//! ```

use snipit_config::DatabaseConfig;
use sqlx::postgres::PgPoolOptions;
use tracing::info;

/// Opens a PostgreSQL connection pool and checks that it can connect.
///
/// The returned pool is cheaply cloneable and is shared by the snippet store,
/// the user store and the session store.
pub async fn init_db_pool(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.url)
        .await?;

    info!(max_connections = config.max_connections, "Database pool ready");
    Ok(pool)
}

// Re-export PgPool for convenience
pub use sqlx::PgPool;
