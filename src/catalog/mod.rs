//! # Catalog
//!
//! Products and shops are the rows stocks point at. The catalog only creates and looks them up;
//! their lifecycle beyond that is out of scope.
//!
//! Errors are reported through [`CatalogError`], which follows the same split as
//! [`StockError`](crate::stock::StockError): validation, constraint conflicts, and opaque store
//! failures.

pub mod error;

pub use error::*;
