//! API error responses

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::domain::{ClassifiedError, FailureKind};

const OVERLOADED_MESSAGE: &str =
    "The AI service is currently overloaded. Please try again in a few moments.";
const RATE_LIMITED_MESSAGE: &str = "Too many requests. Please wait a minute before trying again.";
const MALFORMED_OUTPUT_MESSAGE: &str =
    "The AI service returned an invalid response. Please try again.";
const REDACTED_DETAIL: &str = "Internal server error";

/// Error body returned to clients
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ApiErrorBody {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_retryable: Option<bool>,
    /// Seconds the client should wait before retrying
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry_after: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// API error with status code
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub body: ApiErrorBody,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            body: ApiErrorBody {
                message: message.into(),
                is_retryable: None,
                retry_after: None,
                error: None,
            },
        }
    }

    pub fn with_retry(mut self, retryable: bool, retry_after: Option<u64>) -> Self {
        self.body.is_retryable = Some(retryable);
        self.body.retry_after = retry_after;
        self
    }

    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.body.error = Some(error.into());
        self
    }

    /// Bad request error
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    /// Not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    /// Internal server error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    /// Map a classified generation failure to its response.
    ///
    /// `failure_message` is used for unknown failures; the original error text is
    /// only exposed when `expose_details` is set.
    pub fn from_classified(
        err: &ClassifiedError,
        failure_message: &str,
        expose_details: bool,
    ) -> Self {
        let retry = err.suggested_retry_after_secs;

        match err.kind {
            FailureKind::Overloaded => {
                Self::new(StatusCode::SERVICE_UNAVAILABLE, OVERLOADED_MESSAGE)
                    .with_retry(err.retryable, retry)
            }
            FailureKind::RateLimited => {
                Self::new(StatusCode::TOO_MANY_REQUESTS, RATE_LIMITED_MESSAGE)
                    .with_retry(err.retryable, retry)
            }
            FailureKind::MalformedOutput => {
                Self::new(StatusCode::UNPROCESSABLE_ENTITY, MALFORMED_OUTPUT_MESSAGE)
                    .with_retry(err.retryable, retry)
            }
            FailureKind::Unknown => {
                let detail = if expose_details {
                    err.original_message.as_str()
                } else {
                    REDACTED_DETAIL
                };

                Self::internal(failure_message)
                    .with_retry(err.retryable, retry)
                    .with_error(detail)
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let retry_after = self.body.retry_after;
        let mut response = (self.status, Json(self.body)).into_response();

        if let Some(secs) = retry_after {
            response
                .headers_mut()
                .insert(header::RETRY_AFTER, HeaderValue::from(secs));
        }

        response
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.status, self.body.message)
    }
}

impl std::error::Error for ApiError {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::generation::classify;
    use crate::domain::DomainError;

    fn classified(err: DomainError) -> ClassifiedError {
        classify(&err)
    }

    #[test]
    fn test_overloaded_maps_to_503() {
        let err = ApiError::from_classified(
            &classified(DomainError::provider_status("gemini", 503, "busy")),
            "Failed to generate questions",
            true,
        );

        assert_eq!(err.status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(err.body.message, OVERLOADED_MESSAGE);
        assert_eq!(err.body.is_retryable, Some(true));
        assert_eq!(err.body.retry_after, Some(30));
        assert_eq!(err.body.error, None);
    }

    #[test]
    fn test_rate_limited_maps_to_429() {
        let err = ApiError::from_classified(
            &classified(DomainError::provider_status("gemini", 429, "quota")),
            "Failed to generate questions",
            true,
        );

        assert_eq!(err.status, StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(err.body.retry_after, Some(60));
    }

    #[test]
    fn test_malformed_output_maps_to_422() {
        let err = ApiError::from_classified(
            &classified(DomainError::malformed_output("not json")),
            "Failed to generate explanation",
            true,
        );

        assert_eq!(err.status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(err.body.is_retryable, Some(true));
        assert_eq!(err.body.retry_after, None);
    }

    #[test]
    fn test_unknown_maps_to_500_with_detail() {
        let err = ApiError::from_classified(
            &classified(DomainError::provider_status("gemini", 401, "bad key")),
            "Failed to generate explanation",
            true,
        );

        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.body.message, "Failed to generate explanation");
        assert_eq!(err.body.is_retryable, Some(false));
        assert!(err.body.error.unwrap().contains("bad key"));
    }

    #[test]
    fn test_unknown_detail_redacted_in_production() {
        let err = ApiError::from_classified(
            &classified(DomainError::provider("gemini", "secret upstream detail")),
            "Failed to generate questions",
            false,
        );

        assert_eq!(err.body.error.as_deref(), Some(REDACTED_DETAIL));
    }

    #[test]
    fn test_body_serialization() {
        let err = ApiError::new(StatusCode::SERVICE_UNAVAILABLE, "busy").with_retry(true, Some(30));
        let json = serde_json::to_value(&err.body).unwrap();

        assert_eq!(
            json,
            serde_json::json!({"message": "busy", "isRetryable": true, "retryAfter": 30})
        );

        let json = serde_json::to_value(&ApiError::bad_request("Missing required fields").body)
            .unwrap();
        assert_eq!(json, serde_json::json!({"message": "Missing required fields"}));
    }

    #[test]
    fn test_retry_after_header() {
        let response = ApiError::new(StatusCode::TOO_MANY_REQUESTS, "slow down")
            .with_retry(true, Some(60))
            .into_response();

        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(response.headers()[header::RETRY_AFTER], "60");
    }
}
