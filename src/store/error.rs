//! # Store Errors
//!
//! The single failure type every [`StorageGateway`](super::StorageGateway) implementation
//! returns. Implementations translate their native error representation into a
//! [`StoreErrorCode`] here, so nothing above the gateway ever sees a driver-specific error.

use std::fmt::Display;

/// Store-reported error class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreErrorCode {
    /// A unique constraint rejected the statement (SQLSTATE `23505`).
    UniqueViolation,
    /// A foreign-key constraint rejected the statement (SQLSTATE `23503`).
    ForeignKeyViolation,
    /// Anything else: connectivity, syntax, range, acquisition timeout.
    Generic,
}

impl StoreErrorCode {
    /// Classifies a Postgres SQLSTATE code.
    pub fn from_sqlstate(code: &str) -> Self {
        match code {
            "23505" => StoreErrorCode::UniqueViolation,
            "23503" => StoreErrorCode::ForeignKeyViolation,
            _ => StoreErrorCode::Generic,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StoreErrorCode::UniqueViolation => "unique_violation",
            StoreErrorCode::ForeignKeyViolation => "foreign_key_violation",
            StoreErrorCode::Generic => "generic",
        }
    }
}

impl Display for StoreErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A failed statement: the classified code plus the store's own message.
///
/// The message may contain schema details and must only reach the operational log.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("store error ({code}): {message}")]
pub struct StoreError {
    pub code: StoreErrorCode,
    pub message: String,
}

impl StoreError {
    pub fn new(code: StoreErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn generic(message: impl Into<String>) -> Self {
        Self::new(StoreErrorCode::Generic, message)
    }

    pub fn foreign_key(message: impl Into<String>) -> Self {
        Self::new(StoreErrorCode::ForeignKeyViolation, message)
    }

    pub fn unique(message: impl Into<String>) -> Self {
        Self::new(StoreErrorCode::UniqueViolation, message)
    }
}
