use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use serde_json::json;

/// Failures of a remote metadata call. Callers treat both kinds as "unavailable".
#[derive(Debug, thiserror::Error)]
pub enum ConnectorError {
    /// Transport error, timeout or non-success status
    #[error("remote service unavailable: {0}")]
    Unavailable(String),
    /// JSON body that lacks the fields we need
    #[error("malformed remote response: {0}")]
    MalformedResponse(String),
}

impl ResponseError for ConnectorError {
    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(json!({
            "message": "Remote metadata service unavailable",
        }))
    }

    fn status_code(&self) -> StatusCode {
        match self {
            Self::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::MalformedResponse(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl From<reqwest::Error> for ConnectorError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Unavailable(format!("request timeout: {}", err))
        } else if err.is_connect() {
            Self::Unavailable(format!("connection failed: {}", err))
        } else {
            Self::Unavailable(err.to_string())
        }
    }
}
