//! Request-level error taxonomy and its HTTP rendering.
//!
//! Every user-visible failure carries a taxonomy kind in a structured JSON
//! body; raw backend payloads and stack traces never leak to clients.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use mapsmith::GenerateError;

/// Failures surfaced to HTTP clients.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The client omitted (or blanked) a required request field.
    #[error("{0}")]
    MissingInput(String),

    /// The uploaded document yielded no usable text.
    #[error("no text content found in PDF")]
    NoExtractableText,

    /// The backend's output failed validation or could not be parsed.
    #[error("generated output is invalid: {0}")]
    MalformedOutput(String),

    /// The generation backend failed after every allowed attempt.
    #[error(transparent)]
    Backend(#[from] GenerateError),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            Self::MissingInput(_) | Self::NoExtractableText => StatusCode::BAD_REQUEST,
            Self::MalformedOutput(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Backend(_) => StatusCode::BAD_GATEWAY,
        }
    }

    /// Taxonomy label carried in the response body.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MissingInput(_) => "missing_input",
            Self::NoExtractableText => "no_extractable_text",
            Self::MalformedOutput(_) => "malformed_output",
            Self::Backend(err) => err.kind(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        tracing::warn!(kind = self.kind(), status = %status, error = %self, "request failed");
        let body = Json(json!({
            "error": self.to_string(),
            "kind": self.kind(),
        }));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_follow_the_taxonomy() {
        assert_eq!(
            ApiError::MissingInput("x".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ApiError::NoExtractableText.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiError::MalformedOutput("x".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ApiError::Backend(GenerateError::Timeout { seconds: 5 }).status(),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn backend_kind_is_forwarded() {
        let err = ApiError::Backend(GenerateError::Unreachable {
            detail: "refused".into(),
        });
        assert_eq!(err.kind(), "backend_unreachable");
    }
}
