use anyhow::anyhow;
use axum::{
    Form,
    extract::{FromRequest, Request, rejection::FormRejection},
};
use serde::de::DeserializeOwned;
use snipit_core::AppError;

/// Decodes an `application/x-www-form-urlencoded` body.
///
/// Decoding failures are client errors (400) and never reach the handler.
/// Field validation is left to the handler so it can re-render the form.
#[derive(Debug, Clone, Copy, Default)]
pub struct DecodedForm<T>(pub T);

impl<T, S> FromRequest<S> for DecodedForm<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Form(value) = Form::<T>::from_request(req, state)
            .await
            .map_err(|rejection| match rejection {
                FormRejection::InvalidFormContentType(_) => {
                    AppError::bad_request(anyhow!("Expected a form-encoded request body"))
                }
                FormRejection::FailedToDeserializeForm(err) => {
                    AppError::bad_request(anyhow!("Malformed form body: {}", err.body_text()))
                }
                other => AppError::bad_request(anyhow!("Invalid request body: {}", other.body_text())),
            })?;

        Ok(DecodedForm(value))
    }
}
