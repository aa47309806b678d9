//! # Error Taxonomy
//!
//! Every failure a caller can observe falls into one of four kinds. Store failures are
//! classified through [`STORE_ERROR_KINDS`], the only place that knows how store error
//! codes relate to caller-facing kinds.

use crate::store::StoreErrorCode;

/// Caller-facing failure kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed or out-of-range input, detected before any store access.
    Validation,
    /// An id-targeted statement matched zero rows.
    NotFound,
    /// The store rejected the statement on a uniqueness or foreign-key constraint.
    Conflict,
    /// Any other store failure.
    Store,
}

impl ErrorKind {
    /// HTTP status code an adaptation layer should answer with.
    pub fn status(&self) -> u16 {
        match self {
            ErrorKind::Validation => 400,
            ErrorKind::NotFound => 404,
            ErrorKind::Conflict => 400,
            ErrorKind::Store => 500,
        }
    }
}

/// Mapping from store error codes to caller-facing kinds.
pub const STORE_ERROR_KINDS: &[(StoreErrorCode, ErrorKind)] = &[
    (StoreErrorCode::UniqueViolation, ErrorKind::Conflict),
    (StoreErrorCode::ForeignKeyViolation, ErrorKind::Conflict),
    (StoreErrorCode::Generic, ErrorKind::Store),
];

/// Looks up the kind for a store error code. Codes missing from the table are `Store`.
pub fn classify(code: StoreErrorCode) -> ErrorKind {
    STORE_ERROR_KINDS
        .iter()
        .find(|(candidate, _)| *candidate == code)
        .map(|(_, kind)| *kind)
        .unwrap_or(ErrorKind::Store)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constraint_violations_are_conflicts() {
        assert_eq!(classify(StoreErrorCode::UniqueViolation), ErrorKind::Conflict);
        assert_eq!(
            classify(StoreErrorCode::ForeignKeyViolation),
            ErrorKind::Conflict
        );
        assert_eq!(classify(StoreErrorCode::Generic), ErrorKind::Store);
    }

    #[test]
    fn statuses() {
        assert_eq!(ErrorKind::Validation.status(), 400);
        assert_eq!(ErrorKind::NotFound.status(), 404);
        assert_eq!(ErrorKind::Conflict.status(), 400);
        assert_eq!(ErrorKind::Store.status(), 500);
    }
}
