// Public modules
pub mod algorithms;
pub mod config;
pub mod error;
pub mod models;
pub mod system;
pub mod utils;

// Re-exports for convenience
pub use algorithms::{
    AuctionDispatcher, BatchGreedyDispatcher, DispatchContext, DispatchStrategy, Dispatcher,
    GreedyDispatcher,
};
pub use config::DispatchConfig;
pub use error::DispatchError;
pub use models::{Assignment, Driver, Location, Order, OrderStatus, Orderer, Store};
pub use system::DeliverySystem;
pub use utils::{DistanceOracle, LocationGraph};
