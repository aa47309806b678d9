//! Startup, wiring and shutdown.
//!
//! - [`InventorySystem`] - owns the gateway handle and hands out the clients
//! - [`setup_tracing`] - installs the log subscriber

pub mod inventory_system;
pub mod tracing;

pub use inventory_system::*;
pub use self::tracing::*;
