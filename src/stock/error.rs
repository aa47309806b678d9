//! Error types for stock operations.

use crate::error_kind::{classify, ErrorKind};
use crate::reply::ErrorReply;
use crate::store::{StoreError, StoreErrorCode};
use crate::validation::ValidationError;
use std::fmt::Display;
use thiserror::Error;

/// The stock operation a failure belongs to. Picks the caller-facing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StockOperation {
    Create,
    List,
    Get,
    Replace,
    Delete,
    Increase,
    Decrease,
    Filter,
    History,
}

impl StockOperation {
    pub fn as_str(&self) -> &'static str {
        match self {
            StockOperation::Create => "create",
            StockOperation::List => "list",
            StockOperation::Get => "get",
            StockOperation::Replace => "replace",
            StockOperation::Delete => "delete",
            StockOperation::Increase => "increase",
            StockOperation::Decrease => "decrease",
            StockOperation::Filter => "filter",
            StockOperation::History => "history",
        }
    }

    /// Generic message shown to callers when the store fails.
    pub fn failure_message(&self) -> &'static str {
        match self {
            StockOperation::Create => "Failed to create stock record",
            StockOperation::List => "Failed to fetch stock records",
            StockOperation::Get => "Failed to fetch stock by id",
            StockOperation::Replace => "Failed to update stock record",
            StockOperation::Delete => "Failed to delete stock record",
            StockOperation::Increase => "Failed to increase stock quantities",
            StockOperation::Decrease => "Failed to decrease stock quantities",
            StockOperation::Filter => "Failed to filter stock records",
            StockOperation::History => "Failed to fetch stock history",
        }
    }

    fn conflict_message(&self, code: StoreErrorCode) -> &'static str {
        match code {
            StoreErrorCode::ForeignKeyViolation => "Nonexistent product_id or shop_id",
            _ => "Stock record conflicts with existing data",
        }
    }
}

impl Display for StockOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors that can occur during stock operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum StockError {
    /// The input was rejected before reaching the store.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// No stock row matched the id.
    #[error("Stock record not found")]
    NotFound,

    /// The store rejected the statement on a constraint.
    #[error("{0}")]
    Conflict(String),

    /// Any other store failure. `source` is for logs only.
    #[error("{operation} failed: {source}")]
    Store {
        operation: StockOperation,
        source: StoreError,
    },
}

impl StockError {
    /// Classifies a store failure through the error-kind table.
    pub fn from_store(operation: StockOperation, err: StoreError) -> Self {
        match classify(err.code) {
            ErrorKind::Conflict => StockError::Conflict(operation.conflict_message(err.code).to_string()),
            _ => StockError::Store {
                operation,
                source: err,
            },
        }
    }
}

impl ErrorReply for StockError {
    fn kind(&self) -> ErrorKind {
        match self {
            StockError::Validation(_) => ErrorKind::Validation,
            StockError::NotFound => ErrorKind::NotFound,
            StockError::Conflict(_) => ErrorKind::Conflict,
            StockError::Store { .. } => ErrorKind::Store,
        }
    }

    fn public_message(&self) -> String {
        match self {
            StockError::Store { operation, .. } => operation.failure_message().to_string(),
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn foreign_key_violation_becomes_conflict() {
        let err = StockError::from_store(
            StockOperation::Create,
            StoreError::foreign_key("insert or update on table \"stocks\" violates foreign key constraint"),
        );
        assert_eq!(err, StockError::Conflict("Nonexistent product_id or shop_id".to_string()));
        assert_eq!(err.kind(), ErrorKind::Conflict);
    }

    #[test]
    fn generic_failure_hides_store_detail() {
        let err = StockError::from_store(
            StockOperation::Increase,
            StoreError::generic("connection refused (os error 111)"),
        );
        assert_eq!(err.kind(), ErrorKind::Store);
        assert_eq!(err.public_message(), "Failed to increase stock quantities");
        assert!(err.to_string().contains("connection refused"));
    }
}
