use anyhow::Error;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::{debug, error};

/// An error that terminates request handling.
///
/// The wrapped error is only ever written to the log. Clients receive the
/// canonical reason phrase of the status code and nothing else, so query
/// details and error chains never leave the server.
#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub error: Error,
}

/// Full error chain of a server error, attached to the response extensions.
///
/// Only read by the opt-in debug middleware; never rendered by default.
#[derive(Debug, Clone)]
pub struct ErrorDetail(pub String);

impl AppError {
    pub fn new<E>(status: StatusCode, err: E) -> Self
    where
        E: Into<Error>,
    {
        Self {
            status,
            error: err.into(),
        }
    }

    pub fn internal<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, err)
    }

    pub fn not_found<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::NOT_FOUND, err)
    }

    pub fn bad_request<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::BAD_REQUEST, err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = self.status.canonical_reason().unwrap_or("Error");

        if self.status.is_server_error() {
            error!(status = %self.status.as_u16(), error = ?self.error, "Server error");

            let mut response = (self.status, body).into_response();
            response
                .extensions_mut()
                .insert(ErrorDetail(format!("{:?}", self.error)));
            return response;
        }

        debug!(status = %self.status.as_u16(), error = %self.error, "Client error");
        (self.status, body).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<Error>,
{
    fn from(err: E) -> Self {
        AppError::internal(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    #[test]
    fn server_errors_hide_the_error_text() {
        let response =
            AppError::internal(anyhow!("relation \"snippets\" does not exist")).into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let detail = response.extensions().get::<ErrorDetail>().unwrap();
        assert!(detail.0.contains("relation"));
    }

    #[test]
    fn client_errors_carry_no_detail() {
        let response = AppError::not_found(anyhow!("snippet 42 missing")).into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(response.extensions().get::<ErrorDetail>().is_none());
    }

    #[test]
    fn foreign_errors_convert_to_internal() {
        let err: AppError = std::io::Error::other("disk on fire").into();
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
    }
}
