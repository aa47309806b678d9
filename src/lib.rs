//! # Inventory Stocks
//!
//! > **Per-shop stock levels with atomic adjustments, composite filtering and an audit trail.**
//!
//! This crate is the core of an inventory service: stock rows tie a product to a shop with a
//! shelf counter and an order counter. Callers create, replace and delete rows, adjust the
//! counters relatively, and filter rows joined with product data. Every mutation appends a
//! history entry in the same store statement.
//!
//! ## Design
//!
//! ### One statement per operation
//! There is no cache and no read-modify-write in the caller. Relative adjustments are computed
//! by the store, so concurrent increases and decreases on one row never lose updates.
//! Decreases clamp at zero.
//!
//! ### An injected gateway
//! All data access goes through [`StorageGateway`](store::StorageGateway), created once at
//! startup and shared as `Arc<dyn StorageGateway>`. Swap Postgres for the in-memory store actor
//! or the mock without touching the clients.
//!
//! ### Typed errors with safe messages
//! Input is validated before any store access. Store error codes are classified through one
//! table ([`error_kind::STORE_ERROR_KINDS`]): constraint violations become conflicts with a domain
//! message, everything else becomes an opaque store failure whose detail only goes to the log.
//!
//! ## Module Tour
//!
//! - [`clients`] - [`StockClient`](clients::StockClient) and [`CatalogClient`](clients::CatalogClient), the entry points
//! - [`store`] - the gateway trait, the in-memory actor, Postgres and the mock
//! - [`validation`] - payload, query and id checks
//! - [`query`] - the filter predicate, rendered to SQL or evaluated in memory
//! - [`stock`] and [`catalog`] - adjustment arithmetic and per-client errors
//! - [`reply`] - status and JSON body for every outcome
//! - [`lifecycle`] - [`InventorySystem`](lifecycle::InventorySystem) and tracing setup
//! - [`config`] - connection settings from the environment
//!
//! ## Quick Start
//!
//! ```bash
//! # In-memory demo
//! RUST_LOG=info cargo run
//!
//! # Against Postgres
//! DB_USER=inventory DB_PASSWORD=secret DB_HOST=localhost DB_NAME=stocks RUST_LOG=info cargo run
//! ```
//!
//! ### Running Tests
//!
//! ```bash
//! cargo test
//! ```

pub mod catalog;
pub mod clients;
pub mod config;
pub mod error_kind;
pub mod lifecycle;
pub mod model;
pub mod query;
pub mod reply;
pub mod stock;
pub mod store;
pub mod validation;
