pub mod auction;
pub mod batch_greedy;
pub mod greedy;

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::models::{find_store, Assignment, Distance, Driver, NodeId, Order, OrderId, Store};
use crate::utils::DistanceOracle;

pub use auction::AuctionDispatcher;
pub use batch_greedy::BatchGreedyDispatcher;
pub use greedy::GreedyDispatcher;

/// Read-only snapshot a dispatch round works against
#[derive(Debug, Clone, Copy)]
pub struct DispatchContext<'a> {
    pub oracle: &'a DistanceOracle,
    pub stores: &'a [Store],
}

impl<'a> DispatchContext<'a> {
    pub fn new(oracle: &'a DistanceOracle, stores: &'a [Store]) -> Self {
        Self { oracle, stores }
    }

    /// Store node and delivery node of an order, if both resolve
    pub fn order_endpoints(&self, order: &Order) -> Option<(NodeId, NodeId)> {
        let store_node = find_store(self.stores, order.store_id)?.node?;
        let delivery_node = order.delivery_node?;
        Some((store_node, delivery_node))
    }

    /// Courier to store plus store to customer, `None` when unresolvable or
    /// unreachable
    pub fn direct_cost(&self, driver_node: NodeId, order: &Order) -> Option<Distance> {
        let (store_node, delivery_node) = self.order_endpoints(order)?;
        let to_store = self.oracle.distance(driver_node, store_node)?;
        let to_customer = self.oracle.distance(store_node, delivery_node)?;
        Some(to_store + to_customer)
    }
}

/// Trait for order assignment strategies
pub trait Dispatcher {
    /// Short name used in logs and reports
    fn name(&self) -> &'static str;

    /// Run one dispatch round, mutating couriers and orders in place.
    ///
    /// Couriers are visited in slice order and orders keep their slice order
    /// for tie-breaks. Returns the assignments made, in commit order.
    fn dispatch(
        &self,
        ctx: &DispatchContext<'_>,
        drivers: &mut [Driver],
        orders: &mut [Order],
    ) -> Vec<Assignment>;
}

/// The dispatch strategies a caller can pick per round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DispatchStrategy {
    #[default]
    Greedy,
    BatchGreedy,
    Auction,
}

impl DispatchStrategy {
    pub fn dispatcher(&self) -> Box<dyn Dispatcher> {
        match self {
            DispatchStrategy::Greedy => Box::new(GreedyDispatcher),
            DispatchStrategy::BatchGreedy => Box::new(BatchGreedyDispatcher),
            DispatchStrategy::Auction => Box::new(AuctionDispatcher),
        }
    }
}

/// Orders still waiting for a courier and not taken earlier in this round
pub(crate) fn is_open(order: &Order, claimed: &HashSet<OrderId>) -> bool {
    order.is_awaiting_driver() && !claimed.contains(&order.id)
}

/// Hand `order` to `driver` and describe the result
pub(crate) fn commit(driver: &mut Driver, order: &mut Order, cost: Distance) -> Option<Assignment> {
    if let Err(err) = order.assign_driver(driver.id) {
        warn!(driver = driver.id, order = order.id, %err, "skipping assignment");
        return None;
    }
    driver.push_order(order.id);
    Some(Assignment::new(driver.id, order.id, cost))
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::models::{Driver, Location, Order, Store};
    use crate::utils::{DistanceOracle, LocationGraph};

    /// Nodes laid out on a line at the given x coordinates, fully connected
    pub fn line_oracle(xs: &[f64]) -> DistanceOracle {
        let locations: Vec<Location> = xs.iter().map(|x| Location::new(*x, 0.0)).collect();
        DistanceOracle::build(&LocationGraph::fully_connected(&locations))
    }

    pub fn store(id: u32, node: usize) -> Store {
        Store::at_node(id, format!("store-{id}"), Location::new(0.0, 0.0), node)
    }

    pub fn driver(id: u32, node: usize, capacity: usize) -> Driver {
        Driver::at_node(id, node, capacity).unwrap()
    }

    pub fn order(id: u32, store_id: u32, delivery_node: usize, fee: f64) -> Order {
        Order::accepted(id, store_id, delivery_node, fee)
    }
}
