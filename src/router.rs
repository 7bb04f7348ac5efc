use axum::{Router, middleware};
use tower_http::catch_panic::CatchPanicLayer;
use tower_sessions::SessionStore;

use crate::logging::logging_middleware;
use crate::middleware::auth::{
    authenticate, require_authentication, require_authentication_without_return,
};
use crate::middleware::csrf::csrf_protect;
use crate::middleware::headers::with_secure_headers;
use crate::middleware::recover::{expose_error_detail, handle_panic};
use crate::modules::pages::controller::not_found;
use crate::modules::pages::router::{init_pages_router, init_unwrapped_router};
use crate::modules::snippets::router::{init_protected_snippets_router, init_snippets_router};
use crate::modules::users::router::{
    init_account_router, init_logout_router, init_users_router,
};
use crate::session::{save_on_server_error, session_layer};
use crate::state::AppState;

/// Builds the application.
///
/// Route layers run bottom-up, so dynamic pages see: session, the 5xx
/// session save, CSRF, authentication, then the login gate for protected
/// pages. `/ping` and
/// `/static` skip all of them.
pub fn init_router<Store>(state: AppState, store: Store) -> Router
where
    Store: SessionStore + Clone,
{
    let protected = init_protected_snippets_router()
        .merge(init_account_router())
        .route_layer(middleware::from_fn(require_authentication))
        .merge(
            init_logout_router()
                .route_layer(middleware::from_fn(require_authentication_without_return)),
        );

    let dynamic = Router::new()
        .merge(init_snippets_router())
        .merge(init_pages_router())
        .merge(init_users_router())
        .merge(protected)
        .route_layer(middleware::from_fn_with_state(state.clone(), authenticate))
        .route_layer(middleware::from_fn(csrf_protect))
        .route_layer(middleware::from_fn_with_state(
            state.config.clone(),
            save_on_server_error,
        ))
        .route_layer(session_layer(store, &state.config.session));

    let mut app = Router::new()
        .merge(init_unwrapped_router(&state.config.server.static_dir))
        .merge(dynamic)
        .fallback(not_found)
        .with_state(state.clone());

    if state.config.server.debug {
        app = app.layer(middleware::from_fn(expose_error_detail));
    }

    with_secure_headers(app)
        .layer(middleware::from_fn(logging_middleware))
        .layer(CatchPanicLayer::custom(handle_panic))
}
