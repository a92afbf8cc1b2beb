use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use findback_common::FindbackError;
use std::fmt;
use tracing::error;

use crate::types::ErrorResponse;

/// HTTP wrapper for [`FindbackError`]
///
/// Client errors carry their message; server-side failures are logged and
/// reported generically.
#[derive(Debug)]
pub struct ApiError(pub FindbackError);

impl From<FindbackError> for ApiError {
    fn from(err: FindbackError) -> Self {
        Self(err)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.0.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    fn error_response(&self) -> HttpResponse {
        let message = if self.0.is_client_error() {
            self.0.to_string()
        } else {
            error!("Request failed: {}", self.0);
            "internal server error".to_string()
        };
        HttpResponse::build(self.status_code()).json(ErrorResponse { error: message })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_error_keeps_message() {
        let err = ApiError(FindbackError::invalid_input("missing required fields: name"));
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.error_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_store_failure_is_internal() {
        let err = ApiError(FindbackError::store("disk full"));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
