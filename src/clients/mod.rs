//! Validated, typed entry points over an injected [`StorageGateway`](crate::store::StorageGateway).

pub mod catalog_client;
pub mod gateway_client;
pub mod stock_client;

pub use catalog_client::*;
pub use gateway_client::*;
pub use stock_client::*;
