use axum::{Router, routing::get};
use tower_http::services::ServeDir;

use crate::modules::pages::controller::{about, ping};
use crate::state::AppState;

pub fn init_pages_router() -> Router<AppState> {
    Router::new().route("/about", get(about))
}

/// Routes served without sessions, CSRF or authentication.
pub fn init_unwrapped_router(static_dir: &str) -> Router<AppState> {
    Router::new()
        .route("/ping", get(ping))
        .nest_service("/static", ServeDir::new(static_dir))
}
