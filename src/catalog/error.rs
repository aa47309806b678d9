use crate::error_kind::{classify, ErrorKind};
use crate::reply::ErrorReply;
use crate::store::{StoreError, StoreErrorCode};
use crate::validation::ValidationError;
use std::fmt::Display;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CatalogOperation {
    CreateProduct,
    FilterProducts,
    CreateShop,
}

impl CatalogOperation {
    pub fn as_str(&self) -> &'static str {
        match self {
            CatalogOperation::CreateProduct => "create_product",
            CatalogOperation::FilterProducts => "filter_products",
            CatalogOperation::CreateShop => "create_shop",
        }
    }

    pub fn failure_message(&self) -> &'static str {
        match self {
            CatalogOperation::CreateProduct => "Failed to create product",
            CatalogOperation::FilterProducts => "Failed to filter products",
            CatalogOperation::CreateShop => "Failed to create shop",
        }
    }

    fn conflict_message(&self, code: StoreErrorCode) -> &'static str {
        match code {
            StoreErrorCode::UniqueViolation => "Product with this plu already exists",
            _ => "Catalog entry conflicts with existing data",
        }
    }
}

impl Display for CatalogOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors returned by the product catalog and shop registration.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum CatalogError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("{0}")]
    Conflict(String),

    #[error("{operation} failed: {source}")]
    Store {
        operation: CatalogOperation,
        source: StoreError,
    },
}

impl CatalogError {
    pub fn from_store(operation: CatalogOperation, err: StoreError) -> Self {
        match classify(err.code) {
            ErrorKind::Conflict => {
                CatalogError::Conflict(operation.conflict_message(err.code).to_string())
            }
            _ => CatalogError::Store {
                operation,
                source: err,
            },
        }
    }
}

impl ErrorReply for CatalogError {
    fn kind(&self) -> ErrorKind {
        match self {
            CatalogError::Validation(_) => ErrorKind::Validation,
            CatalogError::Conflict(_) => ErrorKind::Conflict,
            CatalogError::Store { .. } => ErrorKind::Store,
        }
    }

    fn public_message(&self) -> String {
        match self {
            CatalogError::Store { operation, .. } => operation.failure_message().to_string(),
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_plu_is_a_conflict() {
        let err = CatalogError::from_store(
            CatalogOperation::CreateProduct,
            StoreError::unique("duplicate key value violates unique constraint \"products_plu_key\""),
        );
        assert_eq!(err.public_message(), "Product with this plu already exists");
        assert_eq!(err.kind().status(), 400);
    }
}
