use crate::error_kind::{classify, ErrorKind};
use crate::reply::ErrorReply;
use crate::store::{StorageGateway, StoreError};
use std::fmt::Display;
use std::sync::Arc;
use tracing::{error, warn};

/// Shared plumbing for clients that run their operations through a [`StorageGateway`].
///
/// Implementors supply the gateway handle and how a store failure becomes their own error type.
/// [`GatewayClient::store_failure`] logs the full store detail before mapping, so the mapped
/// error is free to carry only a caller-safe message.
pub trait GatewayClient: Send + Sync {
    /// The client-specific error type.
    type Error: ErrorReply;

    /// Names the operation a failure belongs to.
    type Operation: Copy + Display;

    /// Access the injected gateway.
    fn gateway(&self) -> &Arc<dyn StorageGateway>;

    /// Map a store error to the client error type.
    fn map_error(operation: Self::Operation, err: StoreError) -> Self::Error;

    /// Logs a store failure and maps it.
    fn store_failure(operation: Self::Operation, err: StoreError) -> Self::Error {
        match classify(err.code) {
            ErrorKind::Conflict => {
                warn!(%operation, code = %err.code, message = %err.message, "Store rejected statement")
            }
            _ => error!(%operation, code = %err.code, message = %err.message, "Store statement failed"),
        }
        Self::map_error(operation, err)
    }
}
