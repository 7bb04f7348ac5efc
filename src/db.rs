use std::sync::Arc;

use snipit_config::AppConfig;
use snipit_db::PgPool;
use snipit_models::{PgSnippetStore, PgUserStore};
use tower_sessions_sqlx_store::PostgresStore;
use tracing::info;

use crate::state::AppState;

/// Applies the application migrations in `./migrations`.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await?;
    info!("Database migrations applied");
    Ok(())
}

/// Session records live in their own table, created on first start.
pub async fn init_session_store(pool: &PgPool) -> Result<PostgresStore, sqlx::Error> {
    let store = PostgresStore::new(pool.clone());
    store.migrate().await?;
    Ok(store)
}

pub fn init_app_state(pool: PgPool, config: AppConfig) -> AppState {
    AppState::new(
        Arc::new(PgSnippetStore::new(pool.clone())),
        Arc::new(PgUserStore::new(pool)),
        config,
    )
}
