//! Server-side sessions.
//!
//! Session data lives in the session store keyed by an opaque token carried
//! in a cookie. [`session_layer`] loads the record before the inner service
//! runs and saves it once the response is produced. tower-sessions skips
//! that save on 5xx responses, so [`save_on_server_error`] runs just inside
//! it and persists those too. Every handler exit that yields a response
//! keeps its mutations.
//!
//! Values are addressed through typed [`SessionKey`]s, which removes the
//! need for callers to name or cast value types at each use:
//!
//! ```ignore
//! session.put(FLASH, &"Snippet successfully created!".to_string()).await?;
//! let user_id: Option<i64> = session.get(AUTHENTICATED_USER_ID).await?;
//! ```

use std::marker::PhantomData;

use std::sync::Arc;

use anyhow::anyhow;
use axum::{
    extract::{FromRequestParts, Request, State},
    http::{HeaderValue, header, request::Parts},
    middleware::Next,
    response::Response,
};
use serde::{Serialize, de::DeserializeOwned};
use snipit_config::{AppConfig, SessionConfig, session::MAX_LIFETIME_HOURS};
use time::Duration;
use tower_sessions::{
    Expiry, Session, SessionManagerLayer, SessionStore,
    cookie::{Cookie, SameSite},
};
use tracing::error;

use crate::middleware::csrf::CsrfToken;
use snipit_core::AppError;

/// A session entry name bound to the type stored under it.
#[derive(Debug)]
pub struct SessionKey<T> {
    name: &'static str,
    _value: PhantomData<fn() -> T>,
}

impl<T> SessionKey<T> {
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            _value: PhantomData,
        }
    }
}

impl<T> Clone for SessionKey<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for SessionKey<T> {}

pub const AUTHENTICATED_USER_ID: SessionKey<i64> = SessionKey::new("authenticatedUserID");
pub const FLASH: SessionKey<String> = SessionKey::new("flash");
pub const REDIRECT_AFTER_LOGIN: SessionKey<String> = SessionKey::new("redirectedPathAfterLogin");
pub const CSRF_TOKEN: SessionKey<CsrfToken> = SessionKey::new("csrfToken");

/// The current request's session.
#[derive(Debug, Clone)]
pub struct AppSession(Session);

impl AppSession {
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    pub async fn get<T: DeserializeOwned>(&self, key: SessionKey<T>) -> Result<Option<T>, AppError> {
        Ok(self.0.get(key.name).await?)
    }

    pub async fn put<T: Serialize>(&self, key: SessionKey<T>, value: &T) -> Result<(), AppError> {
        self.0.insert(key.name, value).await?;
        Ok(())
    }

    /// Reads and removes a value in one step.
    pub async fn pop<T: DeserializeOwned>(&self, key: SessionKey<T>) -> Result<Option<T>, AppError> {
        Ok(self.0.remove(key.name).await?)
    }

    pub async fn remove<T>(&self, key: SessionKey<T>) -> Result<(), AppError> {
        self.0.remove_value(key.name).await?;
        Ok(())
    }

    /// Moves the session data to a fresh token and deletes the old record.
    ///
    /// Must be called on every change of authentication state.
    pub async fn renew_token(&self) -> Result<(), AppError> {
        self.0.cycle_id().await?;
        Ok(())
    }
}

impl<S> FromRequestParts<S> for AppSession
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Session>()
            .cloned()
            .map(AppSession)
            .ok_or_else(|| AppError::internal(anyhow!("session layer is not installed on this route")))
    }
}

/// Builds the load-and-save layer for dynamic routes.
pub fn session_layer<Store>(store: Store, config: &SessionConfig) -> SessionManagerLayer<Store>
where
    Store: SessionStore + Clone,
{
    SessionManagerLayer::new(store)
        .with_name(config.cookie_name.clone())
        .with_secure(config.secure_cookie)
        .with_http_only(true)
        .with_same_site(SameSite::Lax)
        .with_expiry(Expiry::OnInactivity(Duration::hours(
            config.lifetime_hours.clamp(1, MAX_LIFETIME_HOURS),
        )))
}

/// Saves a modified session when the response is a server error and sends
/// its cookie. Must sit directly inside [`session_layer`].
pub async fn save_on_server_error(
    State(config): State<Arc<AppConfig>>,
    req: Request,
    next: Next,
) -> Response {
    let session = req.extensions().get::<Session>().cloned();
    let mut response = next.run(req).await;

    let Some(session) = session else {
        return response;
    };
    if !response.status().is_server_error() || !session.is_modified() || session.is_empty().await {
        return response;
    }

    if let Err(err) = session.save().await {
        error!(error = %err, "Failed to save session for an error response");
        return response;
    }

    if let Some(id) = session.id() {
        let cookie = Cookie::build((config.session.cookie_name.clone(), id.to_string()))
            .path("/")
            .http_only(true)
            .secure(config.session.secure_cookie)
            .same_site(SameSite::Lax)
            .max_age(session.expiry_age())
            .build();
        if let Ok(value) = HeaderValue::from_str(&cookie.to_string()) {
            response.headers_mut().append(header::SET_COOKIE, value);
        }
    }

    response
}
