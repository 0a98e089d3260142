//! Stable machine-readable error taxonomy shared by every crate in the
//! workspace, modeled on `otlp2parquet_writer::error::WriterError`: each
//! variant carries a fixed ASCII `ErrorCode` a caller can match on without
//! parsing the human-readable message.

use crate::batch::BatchStatus;
use crate::money::Quantity;
use std::fmt;

/// A stable, ASCII, machine-matchable error code. Never localized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    NotFound,
    Conflict,
    ValidationError,
    InsufficientStock,
    Internal,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::Conflict => "CONFLICT",
            ErrorCode::ValidationError => "VALIDATION_ERROR",
            ErrorCode::InsufficientStock => "INSUFFICIENT_STOCK",
            ErrorCode::Internal => "INTERNAL",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The error type returned by every operation in this workspace's core
/// crates. Library code never panics on a recoverable condition and never
/// catches-and-continues; callers decide retry/surface policy.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: String },

    #[error("conflict: {message}")]
    Conflict { message: String },

    #[error("validation error: {message}")]
    ValidationError {
        message: String,
        /// Populated when the validation concerns a batch whose status was
        /// the reason for rejection, so callers can branch on it instead of
        /// parsing `message` (spec §9 warns against parsing it).
        status: Option<BatchStatus>,
    },

    #[error("insufficient stock: requested {requested}, available {available}")]
    InsufficientStock {
        available: Quantity,
        requested: Quantity,
    },

    #[error("internal error: {message}")]
    Internal { message: String },
}

impl Error {
    pub fn not_found(entity: &'static str, id: impl fmt::Display) -> Self {
        Error::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Error::Conflict {
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Error::ValidationError {
            message: message.into(),
            status: None,
        }
    }

    pub fn validation_with_status(message: impl Into<String>, status: BatchStatus) -> Self {
        Error::ValidationError {
            message: message.into(),
            status: Some(status),
        }
    }

    pub fn insufficient_stock(available: Quantity, requested: Quantity) -> Self {
        Error::InsufficientStock {
            available,
            requested,
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Error::Internal {
            message: message.into(),
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            Error::NotFound { .. } => ErrorCode::NotFound,
            Error::Conflict { .. } => ErrorCode::Conflict,
            Error::ValidationError { .. } => ErrorCode::ValidationError,
            Error::InsufficientStock { .. } => ErrorCode::InsufficientStock,
            Error::Internal { .. } => ErrorCode::Internal,
        }
    }

    /// True for errors callers may retry once without changing their input
    /// (uniqueness collisions on generated numbers, stale-version conflicts).
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::Conflict { .. })
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_code_is_stable_ascii() {
        let err = Error::insufficient_stock(Quantity::zero(), Quantity::zero());
        assert_eq!(err.code().as_str(), "INSUFFICIENT_STOCK");
    }

    #[test]
    fn conflict_is_retryable_others_are_not() {
        assert!(Error::conflict("duplicate batch_number").is_retryable());
        assert!(!Error::validation("bad input").is_retryable());
        assert!(!Error::not_found("Batch", "abc").is_retryable());
    }

    #[test]
    fn validation_with_status_carries_structured_field() {
        let err = Error::validation_with_status("batch is scrapped", BatchStatus::Scrap);
        match err {
            Error::ValidationError { status, .. } => assert_eq!(status, Some(BatchStatus::Scrap)),
            _ => panic!("expected ValidationError"),
        }
    }
}
