use axum::{
    Router,
    routing::{get, post},
};

use crate::modules::users::controller::{
    account_password_update, account_password_update_post, account_view, user_login,
    user_login_post, user_logout_post, user_signup, user_signup_post,
};
use crate::state::AppState;

pub fn init_users_router() -> Router<AppState> {
    Router::new()
        .route("/user/signup", get(user_signup).post(user_signup_post))
        .route("/user/login", get(user_login).post(user_login_post))
}

/// Action-only routes: they have no page to return to after a login.
pub fn init_logout_router() -> Router<AppState> {
    Router::new().route("/user/logout", post(user_logout_post))
}

pub fn init_account_router() -> Router<AppState> {
    Router::new()
        .route("/account/view", get(account_view))
        .route(
            "/account/password/update",
            get(account_password_update).post(account_password_update_post),
        )
}
