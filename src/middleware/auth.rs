use axum::{
    extract::{FromRequestParts, Request, State},
    http::{HeaderValue, header, request::Parts},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use snipit_core::AppError;
use tracing::{debug, info};

use crate::session::{AUTHENTICATED_USER_ID, AppSession, REDIRECT_AFTER_LOGIN};
use crate::state::AppState;

pub const LOGIN_PATH: &str = "/user/login";

/// Who is making the request, as established by [`authenticate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthContext {
    Anonymous,
    Authenticated { user_id: i64 },
}

impl AuthContext {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, AuthContext::Authenticated { .. })
    }

    pub fn user_id(&self) -> Option<i64> {
        match self {
            AuthContext::Authenticated { user_id } => Some(*user_id),
            AuthContext::Anonymous => None,
        }
    }
}

impl<S> FromRequestParts<S> for AuthContext
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts.extensions.get::<AuthContext>().copied().ok_or_else(|| {
            AppError::internal(anyhow::anyhow!(
                "authenticate middleware is not installed on this route"
            ))
        })
    }
}

/// Resolves the session's user id against the identity store.
///
/// An id whose account no longer exists is dropped from the session and the
/// request proceeds anonymously.
pub async fn authenticate(
    State(state): State<AppState>,
    session: AppSession,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let context = match session.get(AUTHENTICATED_USER_ID).await? {
        Some(user_id) => {
            if state.users.exists(user_id).await? {
                AuthContext::Authenticated { user_id }
            } else {
                info!(user_id, "Session refers to a missing user, treating as anonymous");
                session.remove(AUTHENTICATED_USER_ID).await?;
                AuthContext::Anonymous
            }
        }
        None => AuthContext::Anonymous,
    };

    req.extensions_mut().insert(context);
    Ok(next.run(req).await)
}

/// Gate for pages that need a logged-in user.
///
/// Anonymous visitors are sent to the login page and the path they asked for
/// is remembered so a successful login can return them to it. Authenticated
/// responses are marked uncacheable.
pub async fn require_authentication(
    session: AppSession,
    auth: AuthContext,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    gate(session, auth, req, next, true).await
}

/// Same gate for endpoints with no page behind them, such as logout. Nothing
/// is remembered, so a later login goes to the default page.
pub async fn require_authentication_without_return(
    session: AppSession,
    auth: AuthContext,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    gate(session, auth, req, next, false).await
}

async fn gate(
    session: AppSession,
    auth: AuthContext,
    req: Request,
    next: Next,
    remember: bool,
) -> Result<Response, AppError> {
    if !auth.is_authenticated() {
        let requested = req
            .uri()
            .path_and_query()
            .map(|pq| pq.as_str().to_string())
            .unwrap_or_else(|| req.uri().path().to_string());
        debug!(path = %requested, remember, "Anonymous request to protected route");
        if remember {
            session.put(REDIRECT_AFTER_LOGIN, &requested).await?;
        }
        return Ok(Redirect::to(LOGIN_PATH).into_response());
    }

    let mut response = next.run(req).await;
    response
        .headers_mut()
        .insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
    Ok(response)
}

/// The logged-in user's id, for handlers behind [`require_authentication`].
#[derive(Debug, Clone, Copy)]
pub struct CurrentUser(pub i64);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let auth = AuthContext::from_request_parts(parts, state)
            .await
            .map_err(IntoResponse::into_response)?;

        auth.user_id()
            .map(CurrentUser)
            .ok_or_else(|| Redirect::to(LOGIN_PATH).into_response())
    }
}
