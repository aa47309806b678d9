//! # Observability & Tracing
//!
//! [`setup_tracing`] installs a compact `fmt` subscriber filtered by `RUST_LOG`.
//!
//! ```bash
//! # Mutations and lifecycle events
//! RUST_LOG=info cargo run
//!
//! # Every statement, with payloads
//! RUST_LOG=debug cargo run
//! ```
//!
//! Client methods open a span per call (`create`, `increase`, ...) with the raw path id as a
//! field; payloads are logged once at `debug`. The in-memory store logs each statement at
//! `debug`, mutations at `info` and not-found or constraint rejections at `warn`.
//!
//! Store failures are logged at `error` with their code and the store's own message. That
//! message never reaches callers, so the log is the only place to look for it:
//!
//! ```text
//! ERROR increase: Store statement failed operation=increase code=generic message=bigint out of range
//! ```
//!
//! The store actor runs on its own task, so its lines carry no client span. With
//! `RUST_LOG=info`, the stock scenario of the demo binary reads:
//!
//! ```text
//! INFO Store actor started
//! INFO Created stock_id=1 size=1
//! INFO create: Stock record created stock_id=1
//! INFO Adjusted stock_id=1 shelf_quantity=15 order_quantity=2
//! INFO Adjusted stock_id=1 shelf_quantity=15 order_quantity=0
//! INFO Deleted stock_id=1 size=0
//! ```

/// Initializes the global subscriber. Call once, at startup.
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();
}
