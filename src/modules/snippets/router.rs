use axum::{Router, routing::get};

use crate::modules::snippets::controller::{
    home, snippet_create, snippet_create_post, snippet_view,
};
use crate::state::AppState;

pub fn init_snippets_router() -> Router<AppState> {
    Router::new()
        .route("/", get(home))
        .route("/snippet/view/{id}", get(snippet_view))
}

pub fn init_protected_snippets_router() -> Router<AppState> {
    Router::new().route("/snippet/create", get(snippet_create).post(snippet_create_post))
}
