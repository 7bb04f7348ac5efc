use std::collections::BTreeMap;

use axum::{extract::FromRequestParts, http::request::Parts};
use chrono::{Datelike, Utc};
use serde::Serialize;
use serde_json::Value;
use snipit_core::{AppError, Validator};
use snipit_models::{Snippet, User};

use crate::middleware::auth::AuthContext;
use crate::middleware::csrf::CsrfToken;
use crate::session::{AppSession, FLASH};

/// Everything a page may display.
#[derive(Debug, Clone, Default)]
pub struct TemplateData {
    pub current_year: i32,
    pub snippet: Option<Snippet>,
    pub snippets: Vec<Snippet>,
    pub user: Option<User>,
    pub form: Option<FormData>,
    pub flash: Option<String>,
    pub is_authenticated: bool,
    pub csrf_token: String,
}

impl TemplateData {
    pub fn with_form(mut self, form: FormData) -> Self {
        self.form = Some(form);
        self
    }
}

/// Submitted form values paired with their validation outcome.
///
/// Values come from the form's `Serialize` impl, so fields marked
/// `#[serde(skip_serializing)]` (passwords) are never echoed back.
#[derive(Debug, Clone, Default)]
pub struct FormData {
    values: BTreeMap<String, String>,
    validator: Validator,
}

impl FormData {
    pub fn new<F: Serialize>(form: &F, validator: Validator) -> Self {
        let values = match serde_json::to_value(form) {
            Ok(Value::Object(map)) => map
                .into_iter()
                .filter_map(|(key, value)| match value {
                    Value::String(s) => Some((key, s)),
                    Value::Number(n) => Some((key, n.to_string())),
                    Value::Bool(b) => Some((key, b.to_string())),
                    _ => None,
                })
                .collect(),
            _ => BTreeMap::new(),
        };

        Self { values, validator }
    }

    pub fn value(&self, field: &str) -> &str {
        self.values.get(field).map(String::as_str).unwrap_or_default()
    }

    pub fn error(&self, field: &str) -> Option<&str> {
        self.validator.field_error(field)
    }

    pub fn non_field_errors(&self) -> &[String] {
        self.validator.non_field_errors()
    }
}

/// Request-scoped inputs every page needs: auth state, CSRF token and the
/// session holding the pending flash message.
#[derive(Debug, Clone)]
pub struct PageContext {
    auth: AuthContext,
    csrf_token: CsrfToken,
    session: AppSession,
}

impl PageContext {
    pub fn session(&self) -> &AppSession {
        &self.session
    }

    /// Base template data. Consumes the flash message, if any.
    pub async fn template_data(&self) -> Result<TemplateData, AppError> {
        Ok(TemplateData {
            current_year: Utc::now().year(),
            flash: self.session.pop(FLASH).await?,
            is_authenticated: self.auth.is_authenticated(),
            csrf_token: self.csrf_token.as_str().to_string(),
            ..TemplateData::default()
        })
    }
}

impl<S> FromRequestParts<S> for PageContext
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self {
            auth: AuthContext::from_request_parts(parts, state).await?,
            csrf_token: CsrfToken::from_request_parts(parts, state).await?,
            session: AppSession::from_request_parts(parts, state).await?,
        })
    }
}
