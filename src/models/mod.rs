// Models module - exports all model types

mod assignment;
mod driver;
mod location;
mod order;
mod route;
mod store;

// Re-export model types
pub use self::assignment::Assignment;
pub use self::driver::{validate_capacity, Driver, MAX_CAPACITY};
pub use self::location::Location;
pub use self::order::{Order, OrderStatus};
pub use self::route::{VisitPlan, Waypoint};
pub use self::store::{find_store, Orderer, Store};

// Common type aliases for improved code readability
pub type NodeId = usize;
pub type OrderId = u32;
pub type DriverId = u32;
pub type StoreId = u32;
pub type OrdererId = u32;
pub type Distance = f64;
pub type Fee = f64;
