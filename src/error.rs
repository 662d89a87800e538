//! Error types raised by the dispatch engine.

use thiserror::Error;

use crate::models::{DriverId, OrderId, OrderStatus, StoreId};

/// Errors surfaced to callers of the dispatch engine.
///
/// Failures tied to a single order or courier inside a dispatch round are
/// recovered locally; only structural misuse reaches the caller.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// A courier capacity outside `1..=MAX_CAPACITY`.
    #[error("courier capacity {capacity} is outside the supported range 1..={max}")]
    InvalidCapacity {
        /// Requested capacity.
        capacity: usize,
        /// Largest supported capacity.
        max: usize,
    },
    /// The connectivity matrix does not match the node count.
    #[error("connectivity matrix must be {expected}x{expected}, row {row} has {found} entries")]
    ConnectivityShape {
        /// Number of registered nodes.
        expected: usize,
        /// Offending row, or `expected` when the row count itself is wrong.
        row: usize,
        /// Length found for that row (or the row count).
        found: usize,
    },
    /// Dispatch was requested before the network was built, or after the
    /// node set changed without a rebuild.
    #[error("distance network is missing or stale; rebuild it before dispatching")]
    NetworkNotBuilt,
    /// No order with this id is registered.
    #[error("order {0} not found")]
    UnknownOrder(OrderId),
    /// No courier with this id is registered.
    #[error("driver {0} not found")]
    UnknownDriver(DriverId),
    /// No store with this id is registered.
    #[error("store {0} not found")]
    UnknownStore(StoreId),
    /// An order status change that skips or reverses the lifecycle.
    #[error("order {order_id} cannot move from {from:?} to {to:?}")]
    InvalidTransition {
        /// Affected order.
        order_id: OrderId,
        /// Current status.
        from: OrderStatus,
        /// Requested status.
        to: OrderStatus,
    },
    /// Reading a configuration file failed.
    #[error("failed to read configuration file {path}")]
    ReadConfig {
        /// Path that could not be read.
        path: String,
        /// Source error from std I/O.
        #[source]
        source: std::io::Error,
    },
    /// Parsing configuration JSON failed.
    #[error("failed to parse dispatch configuration")]
    ParseConfig(#[from] serde_json::Error),
}
