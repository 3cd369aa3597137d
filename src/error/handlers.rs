//! Standardized classification of HTTP failures

use crate::error::ClientError;
use reqwest::StatusCode;

/// Maps HTTP statuses onto the client error taxonomy
pub struct HttpErrorHandler;

impl HttpErrorHandler {
    /// Anything below 400 is a success.
    pub fn is_failure(status: StatusCode) -> bool {
        status.as_u16() >= 400
    }

    /// Classify a failed response.
    ///
    /// 401, 404 and 500 get their own kinds, every other status >= 400 becomes
    /// [`ClientError::Response`] carrying the request rendering for trouble-shooting.
    pub fn classify(status: StatusCode, body: &[u8], request_debug: impl FnOnce() -> String) -> ClientError {
        let body = String::from_utf8_lossy(body).into_owned();

        match status {
            StatusCode::UNAUTHORIZED => ClientError::Unauthorized {
                status: Some(status),
                body,
            },
            StatusCode::NOT_FOUND => ClientError::UnknownTarget { status, body },
            StatusCode::INTERNAL_SERVER_ERROR => ClientError::ServerError { status, body },
            _ => ClientError::Response {
                status,
                body,
                request: request_debug(),
            },
        }
    }
}
