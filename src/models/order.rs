// Order model with its delivery lifecycle

use serde::{Deserialize, Serialize};

use crate::error::DispatchError;
use crate::models::{DriverId, Fee, Location, NodeId, OrderId, OrdererId, StoreId};

/// Lifecycle of an order. Transitions only move one step forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Placed by the orderer, not yet received by the store
    Requested,
    /// Received by the store, waiting for a courier
    Accepted,
    /// A courier has been assigned
    DriverAssigned,
    /// Picked up at the store
    PickedUp,
    /// Handed to the orderer
    Delivered,
}

/// Represents a delivery order from a store to an orderer
#[derive(Debug, Clone)]
pub struct Order {
    /// Unique identifier for the order
    pub id: OrderId,

    /// Customer who placed the order
    pub orderer_id: OrdererId,

    /// Store the order is picked up from
    pub store_id: StoreId,

    /// Where the order is delivered
    pub delivery_location: Location,

    /// Graph node of the delivery location, set on registration
    pub delivery_node: Option<NodeId>,

    /// Fee paid to the courier for this delivery
    pub fee: Fee,

    status: OrderStatus,
    driver_id: Option<DriverId>,
}

impl Order {
    /// Creates a new order in the `Requested` status
    pub fn new(
        id: OrderId,
        orderer_id: OrdererId,
        store_id: StoreId,
        delivery_location: Location,
        fee: Fee,
    ) -> Self {
        Self {
            id,
            orderer_id,
            store_id,
            delivery_location,
            delivery_node: None,
            fee,
            status: OrderStatus::Requested,
            driver_id: None,
        }
    }

    /// Creates an order that is already accepted by its store and pinned to a
    /// delivery node
    pub fn accepted(id: OrderId, store_id: StoreId, delivery_node: NodeId, fee: Fee) -> Self {
        Self {
            delivery_node: Some(delivery_node),
            status: OrderStatus::Accepted,
            ..Self::new(id, 0, store_id, Location::new(0.0, 0.0), fee)
        }
    }

    pub fn status(&self) -> OrderStatus {
        self.status
    }

    /// Courier assigned to this order, if any
    pub fn driver_id(&self) -> Option<DriverId> {
        self.driver_id
    }

    /// Whether the order is waiting for a courier
    pub fn is_awaiting_driver(&self) -> bool {
        self.status == OrderStatus::Accepted
    }

    pub fn is_delivered(&self) -> bool {
        self.status == OrderStatus::Delivered
    }

    /// Store received the order
    pub fn accept(&mut self) -> Result<(), DispatchError> {
        self.advance(OrderStatus::Requested, OrderStatus::Accepted)
    }

    /// Records the courier and moves to `DriverAssigned`
    pub fn assign_driver(&mut self, driver_id: DriverId) -> Result<(), DispatchError> {
        self.advance(OrderStatus::Accepted, OrderStatus::DriverAssigned)?;
        self.driver_id = Some(driver_id);
        Ok(())
    }

    pub fn complete_pickup(&mut self) -> Result<(), DispatchError> {
        self.advance(OrderStatus::DriverAssigned, OrderStatus::PickedUp)
    }

    pub fn complete_delivery(&mut self) -> Result<(), DispatchError> {
        self.advance(OrderStatus::PickedUp, OrderStatus::Delivered)
    }

    fn advance(&mut self, from: OrderStatus, to: OrderStatus) -> Result<(), DispatchError> {
        if self.status != from {
            return Err(DispatchError::InvalidTransition {
                order_id: self.id,
                from: self.status,
                to,
            });
        }
        self.status = to;
        Ok(())
    }
}
