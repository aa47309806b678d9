//! Pure data structures (rows and DTOs) exchanged with the [`StorageGateway`](crate::store::StorageGateway).

pub mod history;
pub mod product;
pub mod shop;
pub mod stock;

pub use history::*;
pub use product::*;
pub use shop::*;
pub use stock::*;
