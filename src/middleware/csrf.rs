//! Cross-site request forgery protection.
//!
//! Every session carries a random token. Pages embed it in a hidden
//! `csrf_token` field of each form, and state-changing requests must echo it
//! back (as that form field or in the `x-csrf-token` header). Requests
//! that fail the check are rejected with 400 before reaching a handler.

use anyhow::anyhow;
use axum::{
    body::{Body, to_bytes},
    extract::{FromRequestParts, Request},
    http::{Method, request::Parts},
    middleware::Next,
    response::Response,
};
use constant_time_eq::constant_time_eq;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use snipit_core::AppError;
use tracing::warn;

use crate::session::{AppSession, CSRF_TOKEN};

pub const CSRF_FIELD: &str = "csrf_token";
pub const CSRF_HEADER: &str = "x-csrf-token";

/// Largest form body buffered for the token check.
const MAX_FORM_BYTES: usize = 1024 * 1024;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CsrfToken(String);

impl CsrfToken {
    pub fn generate() -> Self {
        let mut bytes = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut bytes);
        Self(hex::encode(bytes))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Compares in time independent of where the first mismatch is.
    pub fn verify(&self, candidate: &str) -> bool {
        constant_time_eq(self.0.as_bytes(), candidate.as_bytes())
    }
}

impl<S> FromRequestParts<S> for CsrfToken
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CsrfToken>()
            .cloned()
            .ok_or_else(|| AppError::internal(anyhow!("csrf middleware is not installed on this route")))
    }
}

fn is_safe(method: &Method) -> bool {
    matches!(
        *method,
        Method::GET | Method::HEAD | Method::OPTIONS | Method::TRACE
    )
}

fn form_token(body: &[u8]) -> Option<String> {
    serde_urlencoded::from_bytes::<Vec<(String, String)>>(body)
        .ok()?
        .into_iter()
        .find_map(|(name, value)| (name == CSRF_FIELD).then_some(value))
}

pub async fn csrf_protect(
    session: AppSession,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = match session.get(CSRF_TOKEN).await? {
        Some(token) => token,
        None => {
            let token = CsrfToken::generate();
            session.put(CSRF_TOKEN, &token).await?;
            token
        }
    };

    let mut req = if is_safe(req.method()) {
        req
    } else {
        let (parts, body) = req.into_parts();
        let bytes = to_bytes(body, MAX_FORM_BYTES)
            .await
            .map_err(|err| AppError::bad_request(anyhow!("unreadable request body: {err}")))?;

        let submitted = parts
            .headers
            .get(CSRF_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned)
            .or_else(|| form_token(&bytes));

        let valid = submitted.is_some_and(|candidate| token.verify(&candidate));
        if !valid {
            warn!(method = %parts.method, path = %parts.uri.path(), "CSRF token check failed");
            return Err(AppError::bad_request(anyhow!("csrf token missing or invalid")));
        }

        Request::from_parts(parts, Body::from(bytes))
    };

    req.extensions_mut().insert(token);
    Ok(next.run(req).await)
}
