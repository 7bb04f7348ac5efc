use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use snipit_core::AppError;
use tracing::instrument;

use crate::state::AppState;
use crate::templates::PageContext;

/// Liveness probe; runs outside the session stack.
pub async fn ping() -> &'static str {
    "OK"
}

#[instrument(skip(state, page))]
pub async fn about(State(state): State<AppState>, page: PageContext) -> Result<Response, AppError> {
    let data = page.template_data().await?;
    state.templates.render(StatusCode::OK, "about", &data)
}

pub async fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        StatusCode::NOT_FOUND.canonical_reason().unwrap_or("Not Found"),
    )
        .into_response()
}
