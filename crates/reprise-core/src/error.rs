//! Error types for reprise operations.
//!
//! Every variant carries a structured [`ErrorCode`] so the API boundary can
//! map failures to responses without matching on message text.

use std::collections::HashMap;
use thiserror::Error;
use uuid::Uuid;

/// Result type alias for reprise operations.
pub type RepriseResult<T> = Result<T, RepriseError>;

/// Main error type for all reprise operations.
#[derive(Error, Debug)]
pub enum RepriseError {
    /// Review quality outside `0..=5`.
    #[error("Invalid quality: {quality} (quality must be between 0 and 5)")]
    InvalidQuality { quality: i64, code: ErrorCode },

    /// Requester does not own the card.
    #[error("Unauthorized: card {card_id} does not belong to user {requester_id}")]
    Unauthorized {
        card_id: Uuid,
        requester_id: Uuid,
        code: ErrorCode,
    },

    /// Card not found in the store.
    #[error("Card not found: {card_id}")]
    CardNotFound { card_id: Uuid, code: ErrorCode },

    /// Card scheduling state violates an invariant.
    #[error("Invalid card {card_id}: {message}")]
    InvalidCard {
        card_id: Uuid,
        message: String,
        code: ErrorCode,
    },

    /// Input validation failed.
    #[error("Validation error: {message}")]
    Validation {
        message: String,
        code: ErrorCode,
        details: HashMap<String, String>,
    },

    /// The card changed since it was fetched.
    #[error("Conflict: card {card_id} was modified concurrently")]
    Conflict { card_id: Uuid, code: ErrorCode },

    /// The next review date cannot be represented.
    #[error("Schedule overflow for card {card_id}: {interval_days} days")]
    ScheduleOverflow {
        card_id: Uuid,
        interval_days: u32,
        code: ErrorCode,
    },

    /// Persistence failure, passed through from the store.
    #[error("Store error: {message}")]
    Store {
        message: String,
        code: ErrorCode,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Error codes for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // Authorization (AUTH_xxx)
    AuthNotOwner,

    // Validation (VAL_xxx)
    ValInvalidQuality,
    ValMissingField,
    ValEmptyEdit,

    // Card (CARD_xxx)
    CardNotFound,
    CardInvalidState,

    // Store (STORE_xxx)
    StoreOperationFailed,
    StoreConflict,

    // Scheduling (SCHED_xxx)
    SchedOverflow,

    // Configuration
    ConfigInvalid,

    // Internal
    Internal,
}

impl ErrorCode {
    /// Get the string representation of the error code.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::AuthNotOwner => "AUTH_001",
            ErrorCode::ValInvalidQuality => "VAL_001",
            ErrorCode::ValMissingField => "VAL_002",
            ErrorCode::ValEmptyEdit => "VAL_003",
            ErrorCode::CardNotFound => "CARD_001",
            ErrorCode::CardInvalidState => "CARD_002",
            ErrorCode::StoreOperationFailed => "STORE_001",
            ErrorCode::StoreConflict => "STORE_002",
            ErrorCode::SchedOverflow => "SCHED_001",
            ErrorCode::ConfigInvalid => "CFG_001",
            ErrorCode::Internal => "INT_001",
        }
    }

    /// Whether the failure was caused by the caller's request.
    ///
    /// Client errors map to 4xx-class responses at the API boundary.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            ErrorCode::AuthNotOwner
                | ErrorCode::ValInvalidQuality
                | ErrorCode::ValMissingField
                | ErrorCode::ValEmptyEdit
                | ErrorCode::CardNotFound
                | ErrorCode::StoreConflict
        )
    }
}

impl RepriseError {
    /// Create an invalid quality error.
    pub fn invalid_quality(quality: i64) -> Self {
        Self::InvalidQuality {
            quality,
            code: ErrorCode::ValInvalidQuality,
        }
    }

    /// Create an unauthorized error.
    pub fn unauthorized(card_id: Uuid, requester_id: Uuid) -> Self {
        Self::Unauthorized {
            card_id,
            requester_id,
            code: ErrorCode::AuthNotOwner,
        }
    }

    /// Create a not found error.
    pub fn not_found(card_id: Uuid) -> Self {
        Self::CardNotFound {
            card_id,
            code: ErrorCode::CardNotFound,
        }
    }

    /// Create an invalid card error.
    pub fn invalid_card(card_id: Uuid, message: impl Into<String>) -> Self {
        Self::InvalidCard {
            card_id,
            message: message.into(),
            code: ErrorCode::CardInvalidState,
        }
    }

    /// Create a validation error naming the offending field.
    pub fn validation_field(field: impl Into<String>, message: impl Into<String>) -> Self {
        let message = message.into();
        let mut details = HashMap::new();
        details.insert(field.into(), message.clone());
        Self::Validation {
            message,
            code: ErrorCode::ValMissingField,
            details,
        }
    }

    /// Create a validation error for an edit that changes nothing.
    pub fn empty_edit() -> Self {
        Self::Validation {
            message: "edit must set at least one of front, back or deck".to_string(),
            code: ErrorCode::ValEmptyEdit,
            details: HashMap::new(),
        }
    }

    /// Create a conflict error.
    pub fn conflict(card_id: Uuid) -> Self {
        Self::Conflict {
            card_id,
            code: ErrorCode::StoreConflict,
        }
    }

    /// Create a schedule overflow error.
    pub fn schedule_overflow(card_id: Uuid, interval_days: u32) -> Self {
        Self::ScheduleOverflow {
            card_id,
            interval_days,
            code: ErrorCode::SchedOverflow,
        }
    }

    /// Create a store error.
    pub fn store(message: impl Into<String>) -> Self {
        Self::Store {
            message: message.into(),
            code: ErrorCode::StoreOperationFailed,
            source: None,
        }
    }

    /// Create a store error wrapping the backend failure.
    pub fn store_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Store {
            message: message.into(),
            code: ErrorCode::StoreOperationFailed,
            source: Some(Box::new(source)),
        }
    }

    /// Get the error code.
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::InvalidQuality { code, .. } => *code,
            Self::Unauthorized { code, .. } => *code,
            Self::CardNotFound { code, .. } => *code,
            Self::InvalidCard { code, .. } => *code,
            Self::Validation { code, .. } => *code,
            Self::Conflict { code, .. } => *code,
            Self::ScheduleOverflow { code, .. } => *code,
            Self::Store { code, .. } => *code,
            Self::Configuration(_) => ErrorCode::ConfigInvalid,
            Self::Io(_) => ErrorCode::Internal,
        }
    }

    /// Get a user-friendly suggestion for resolving this error.
    pub fn suggestion(&self) -> Option<&str> {
        match self {
            Self::InvalidQuality { .. } => Some("Rate the review with an integer from 0 to 5"),
            Self::Unauthorized { .. } => Some("Only the owner of a card can modify or review it"),
            Self::CardNotFound { .. } => Some("Please check the card ID and ensure it exists"),
            Self::Conflict { .. } => Some("Fetch the card again and retry the operation"),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_quality_error() {
        let err = RepriseError::invalid_quality(7);
        assert_eq!(err.code(), ErrorCode::ValInvalidQuality);
        assert!(err.to_string().contains("quality must be between 0 and 5"));
        assert!(err.code().is_client_error());
    }

    #[test]
    fn test_unauthorized_error() {
        let card_id = Uuid::new_v4();
        let err = RepriseError::unauthorized(card_id, Uuid::new_v4());
        assert_eq!(err.code(), ErrorCode::AuthNotOwner);
        assert!(err.to_string().contains(&card_id.to_string()));
        assert!(err.suggestion().is_some());
    }

    #[test]
    fn test_store_error_is_not_client_error() {
        let err = RepriseError::store("connection reset");
        assert_eq!(err.code(), ErrorCode::StoreOperationFailed);
        assert!(!err.code().is_client_error());
    }

    #[test]
    fn test_store_error_keeps_source() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "disk full");
        let err = RepriseError::store_with_source("write failed", io);
        let source = std::error::Error::source(&err).map(|s| s.to_string());
        assert_eq!(source.as_deref(), Some("disk full"));
    }

    #[test]
    fn test_validation_field_details() {
        let err = RepriseError::validation_field("deck_id", "deck ID is required");
        match err {
            RepriseError::Validation { details, .. } => {
                assert_eq!(details.get("deck_id").map(String::as_str), Some("deck ID is required"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: RepriseError = io.into();
        assert_eq!(err.code(), ErrorCode::Internal);
        assert_eq!(err.code().as_str(), "INT_001");
    }

    #[test]
    fn test_error_code_as_str() {
        assert_eq!(ErrorCode::AuthNotOwner.as_str(), "AUTH_001");
        assert_eq!(ErrorCode::ValInvalidQuality.as_str(), "VAL_001");
        assert_eq!(ErrorCode::CardNotFound.as_str(), "CARD_001");
        assert_eq!(ErrorCode::StoreConflict.as_str(), "STORE_002");
    }
}
