use serde::Serialize;

use crate::models::{Distance, DriverId, OrderId};

/// One courier-order pairing produced by a dispatch round.
///
/// Assignments are not stored; they describe the mutations a round applied.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Assignment {
    pub driver_id: DriverId,
    pub order_id: OrderId,
    /// Travel distance the strategy charged for this pairing
    pub cost: Distance,
}

impl Assignment {
    pub fn new(driver_id: DriverId, order_id: OrderId, cost: Distance) -> Self {
        Self {
            driver_id,
            order_id,
            cost,
        }
    }
}
