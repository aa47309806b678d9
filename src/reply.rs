//! # Replies
//!
//! Maps operation outcomes to the `(status, JSON body)` pair an HTTP layer would send.
//!
//! - Success: `200` or `201` with the row (or rows) as the body.
//! - Delete success: `200` with `{"message": "Stock record deleted", "deleted": <row>}`.
//! - Failure: the status of the error's [`ErrorKind`] with `{"error": <message>}`. Store
//!   failures only ever carry the operation's generic message.

use crate::error_kind::ErrorKind;
use crate::model::Stock;
use serde::Serialize;
use serde_json::{json, Value};
use tracing::error;

/// Errors that can be turned into a reply.
pub trait ErrorReply: std::error::Error {
    fn kind(&self) -> ErrorKind;

    /// The message callers may see.
    fn public_message(&self) -> String;
}

#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub status: u16,
    pub body: Value,
}

impl Reply {
    pub fn ok<T: Serialize>(value: &T) -> Self {
        Self::json(200, value)
    }

    pub fn created<T: Serialize>(value: &T) -> Self {
        Self::json(201, value)
    }

    pub fn deleted(stock: &Stock) -> Self {
        match serde_json::to_value(stock) {
            Ok(deleted) => Self {
                status: 200,
                body: json!({ "message": "Stock record deleted", "deleted": deleted }),
            },
            Err(e) => Self::serialization_failure(e),
        }
    }

    pub fn error<E: ErrorReply + ?Sized>(err: &E) -> Self {
        Self {
            status: err.kind().status(),
            body: json!({ "error": err.public_message() }),
        }
    }

    /// `success` is used for `Ok`; errors map through [`Reply::error`].
    pub fn from_result<T: Serialize, E: ErrorReply>(result: &Result<T, E>, success: u16) -> Self {
        match result {
            Ok(value) => Self::json(success, value),
            Err(err) => Self::error(err),
        }
    }

    fn json<T: Serialize + ?Sized>(status: u16, value: &T) -> Self {
        match serde_json::to_value(value) {
            Ok(body) => Self { status, body },
            Err(e) => Self::serialization_failure(e),
        }
    }

    fn serialization_failure(e: serde_json::Error) -> Self {
        error!(error = %e, "Reply serialization failed");
        Self {
            status: ErrorKind::Store.status(),
            body: json!({ "error": "Failed to serialize response" }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stock::{StockError, StockOperation};
    use crate::store::StoreError;

    fn stock() -> Stock {
        Stock {
            id: 4,
            product_id: 1,
            shelf_quantity: 15,
            order_quantity: 0,
            shop_id: 1,
        }
    }

    #[test]
    fn created_rows_are_the_body() {
        let reply = Reply::created(&stock());
        assert_eq!(reply.status, 201);
        assert_eq!(reply.body["shelf_quantity"], 15);
    }

    #[test]
    fn delete_wraps_the_snapshot() {
        let reply = Reply::deleted(&stock());
        assert_eq!(reply.status, 200);
        assert_eq!(reply.body["message"], "Stock record deleted");
        assert_eq!(reply.body["deleted"]["order_quantity"], 0);
    }

    #[test]
    fn errors_use_the_kind_status_and_public_message() {
        let not_found: Result<Stock, StockError> = Err(StockError::NotFound);
        let reply = Reply::from_result(&not_found, 200);
        assert_eq!(reply.status, 404);
        assert_eq!(reply.body, json!({ "error": "Stock record not found" }));

        let store = StockError::from_store(
            StockOperation::Delete,
            StoreError::generic("relation \"stocks\" does not exist"),
        );
        let reply = Reply::error(&store);
        assert_eq!(reply.status, 500);
        assert_eq!(reply.body, json!({ "error": "Failed to delete stock record" }));
    }
}
