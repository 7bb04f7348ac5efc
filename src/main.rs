use std::net::SocketAddr;

use anyhow::Context;
use clap::Parser;
use dotenvy::dotenv;
use snipit::db::{init_app_state, init_session_store, run_migrations};
use snipit::logging::init_tracing;
use snipit::router::init_router;
use snipit_config::AppConfig;
use snipit_db::init_db_pool;
use tokio::signal;
use tower_sessions::ExpiredDeletion;
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(name = "snipit")]
#[command(author, version, about = "Snippet sharing web server", long_about = None)]
struct Cli {
    /// Address to listen on (overrides SERVER_ADDR)
    #[arg(long)]
    addr: Option<String>,

    /// Show error chains in 500 responses (overrides DEBUG)
    #[arg(long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    let cli = Cli::parse();
    let _log_guard = init_tracing();

    let mut config = AppConfig::from_env();
    if let Some(addr) = cli.addr {
        config.server.addr = addr;
    }
    config.server.debug |= cli.debug;

    let pool = init_db_pool(&config.database)
        .await
        .context("failed to connect to the database")?;
    run_migrations(&pool).await.context("failed to run migrations")?;

    let session_store = init_session_store(&pool)
        .await
        .context("failed to prepare the session store")?;
    let deletion_task = tokio::spawn(
        session_store
            .clone()
            .continuously_delete_expired(tokio::time::Duration::from_secs(60)),
    );

    let addr = config.server.addr.clone();
    if config.server.debug {
        info!("Debug mode on: error details will be shown in responses");
    }

    let state = init_app_state(pool, config);
    let app = init_router(state, session_store);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(addr = %addr, "Starting server");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("server error")?;

    deletion_task.abort();
    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            error!(error = %err, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(err) => {
                error!(error = %err, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
