//! # Storage Gateway
//!
//! Everything that touches rows goes through [`StorageGateway`]: one async method per store
//! statement, each returning rows or a [`StoreError`]. Clients hold the gateway as an injected
//! `Arc<dyn StorageGateway>`, so the backing store is chosen once at startup.
//!
//! ## Implementations
//!
//! - [`InMemoryGateway`] - a store actor owning its tables in a tokio task. Each statement is one
//!   message, so each statement is atomic with respect to every other.
//! - [`PgGateway`] - PostgreSQL through a `sqlx` pool.
//! - [`MockGateway`] - an expectation queue for testing clients in isolation.
//!
//! ## Contract
//!
//! - Id-keyed statements that match nothing return `Ok(None)`; deciding that this is a
//!   not-found condition is the caller's job.
//! - Every mutation appends its history entry in the same statement.
//! - Listing statements return rows ordered by id.

pub mod error;
pub mod memory;
pub mod message;
pub mod mock;
pub mod postgres;

pub use error::*;
pub use memory::{InMemoryGateway, StoreActor};
pub use mock::MockGateway;
pub use postgres::PgGateway;

use crate::model::{
    HistoryEntry, Product, ProductCreate, Shop, ShopCreate, Stock, StockCreate, StockListing,
};
use crate::query::Predicate;
use crate::stock::StockAdjustment;
use async_trait::async_trait;

/// One method per store statement.
#[async_trait]
pub trait StorageGateway: Send + Sync {
    async fn insert_product(&self, params: ProductCreate) -> Result<Product, StoreError>;

    async fn filter_products(&self, predicate: &Predicate) -> Result<Vec<Product>, StoreError>;

    async fn insert_shop(&self, params: ShopCreate) -> Result<Shop, StoreError>;

    async fn insert_stock(&self, params: StockCreate) -> Result<Stock, StoreError>;

    async fn select_stocks(&self) -> Result<Vec<Stock>, StoreError>;

    /// First stock row (lowest id) whose `product_id` matches.
    async fn select_stock_by_product(&self, product_id: i64) -> Result<Option<Stock>, StoreError>;

    async fn replace_stock(&self, id: i64, params: StockCreate)
        -> Result<Option<Stock>, StoreError>;

    async fn delete_stock(&self, id: i64) -> Result<Option<Stock>, StoreError>;

    /// Applies a relative adjustment as a single statement keyed by `id`.
    async fn adjust_stock(
        &self,
        id: i64,
        adjustment: StockAdjustment,
    ) -> Result<Option<Stock>, StoreError>;

    /// Stock rows joined with their product's `plu` and `name`.
    async fn filter_stocks(&self, predicate: &Predicate)
        -> Result<Vec<StockListing>, StoreError>;

    async fn select_history(&self) -> Result<Vec<HistoryEntry>, StoreError>;

    /// Drains outstanding work and releases the store. Later calls fail with a `Generic` error.
    async fn close(&self);
}
