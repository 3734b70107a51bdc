//! Failure taxonomy for generation errors

use serde::Serialize;
use thiserror::Error;

use crate::domain::DomainError;

/// Model service is overloaded
pub const STATUS_OVERLOADED: u16 = 503;
/// Caller is being rate limited
pub const STATUS_RATE_LIMITED: u16 = 429;

const OVERLOADED_RETRY_AFTER_SECS: u64 = 30;
const RATE_LIMITED_RETRY_AFTER_SECS: u64 = 60;

/// Closed set of failure kinds surfaced to callers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    Overloaded,
    RateLimited,
    MalformedOutput,
    Unknown,
}

impl FailureKind {
    /// Kinds the invoker retries with backoff
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Overloaded | Self::RateLimited)
    }
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Overloaded => write!(f, "overloaded"),
            Self::RateLimited => write!(f, "rate_limited"),
            Self::MalformedOutput => write!(f, "malformed_output"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

/// Error normalized into a [`FailureKind`] with retry hints
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("[{kind}] {original_message}")]
pub struct ClassifiedError {
    pub kind: FailureKind,
    pub retryable: bool,
    pub suggested_retry_after_secs: Option<u64>,
    pub original_message: String,
}

impl ClassifiedError {
    fn new(kind: FailureKind, retryable: bool, retry_after: Option<u64>, message: String) -> Self {
        Self {
            kind,
            retryable,
            suggested_retry_after_secs: retry_after,
            original_message: message,
        }
    }
}

impl From<DomainError> for ClassifiedError {
    fn from(err: DomainError) -> Self {
        classify(&err)
    }
}

/// Kind of an error without building the full classification
pub fn failure_kind(err: &DomainError) -> FailureKind {
    match err {
        DomainError::Provider {
            status: Some(STATUS_OVERLOADED),
            ..
        } => FailureKind::Overloaded,
        DomainError::Provider {
            status: Some(STATUS_RATE_LIMITED),
            ..
        } => FailureKind::RateLimited,
        DomainError::MalformedOutput { .. } => FailureKind::MalformedOutput,
        _ => FailureKind::Unknown,
    }
}

/// Classify an error raised anywhere in the generation pipeline
pub fn classify(err: &DomainError) -> ClassifiedError {
    let message = err.to_string();

    match failure_kind(err) {
        FailureKind::Overloaded => ClassifiedError::new(
            FailureKind::Overloaded,
            true,
            Some(OVERLOADED_RETRY_AFTER_SECS),
            message,
        ),
        FailureKind::RateLimited => ClassifiedError::new(
            FailureKind::RateLimited,
            true,
            Some(RATE_LIMITED_RETRY_AFTER_SECS),
            message,
        ),
        FailureKind::MalformedOutput => {
            ClassifiedError::new(FailureKind::MalformedOutput, true, None, message)
        }
        FailureKind::Unknown => ClassifiedError::new(FailureKind::Unknown, false, None, message),
    }
}
