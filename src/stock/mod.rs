//! # Stock
//!
//! Stock-specific logic shared by every gateway and the [`StockClient`](crate::clients::StockClient).
//!
//! ## Structure
//!
//! - [`actions`] - [`StockAdjustment`]: the increase/decrease arithmetic, including the clamp at zero
//! - [`error`] - [`StockError`] and [`StockOperation`]
//!
//! ## Concurrency
//!
//! Adjustments are relative and executed by the store as one statement, so concurrent
//! increases and decreases on the same row never lose updates. Ordering between callers is
//! not guaranteed. Two clamped decreases may remove more than one combined decrease would;
//! that is accepted.

pub mod actions;
pub mod error;

pub use actions::*;
pub use error::*;
