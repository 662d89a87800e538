// Driver (courier) model with its order queue

use std::collections::VecDeque;

use crate::error::DispatchError;
use crate::models::{DriverId, Location, NodeId, OrderId};

/// Largest number of orders a courier may carry at once
pub const MAX_CAPACITY: usize = 3;

/// Represents a courier delivering orders
#[derive(Debug, Clone)]
pub struct Driver {
    /// Unique identifier for the courier
    pub id: DriverId,

    pub name: String,

    /// Current position of the courier
    pub location: Location,

    /// Graph node of the current position, set on registration
    pub node: Option<NodeId>,

    capacity: usize,
    queue: VecDeque<OrderId>,
}

impl Driver {
    /// Creates a courier carrying one order at a time
    pub fn new<S: Into<String>>(id: DriverId, name: S, location: Location) -> Self {
        Self {
            id,
            name: name.into(),
            location,
            node: None,
            capacity: 1,
            queue: VecDeque::new(),
        }
    }

    /// Creates a courier with an explicit capacity in `1..=MAX_CAPACITY`
    pub fn with_capacity<S: Into<String>>(
        id: DriverId,
        name: S,
        location: Location,
        capacity: usize,
    ) -> Result<Self, DispatchError> {
        validate_capacity(capacity)?;
        Ok(Self {
            capacity,
            ..Self::new(id, name, location)
        })
    }

    /// Creates a courier already pinned to a graph node
    pub fn at_node(id: DriverId, node: NodeId, capacity: usize) -> Result<Self, DispatchError> {
        let name = format!("driver-{id}");
        let mut driver = Self::with_capacity(id, name, Location::new(0.0, 0.0), capacity)?;
        driver.node = Some(node);
        Ok(driver)
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// A courier is available iff it carries no orders
    pub fn is_available(&self) -> bool {
        self.queue.is_empty()
    }

    /// Orders in delivery sequence
    pub fn queue(&self) -> impl Iterator<Item = &OrderId> {
        self.queue.iter()
    }

    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    /// Appends an order; the courier becomes unavailable
    pub fn push_order(&mut self, order_id: OrderId) {
        self.queue.push_back(order_id);
    }

    /// Pops the delivered order from the front of the queue.
    /// Returns false if `order_id` is not the next order due.
    pub fn complete_delivery(&mut self, order_id: OrderId) -> bool {
        if self.queue.front() == Some(&order_id) {
            self.queue.pop_front();
            true
        } else {
            false
        }
    }

    /// Moves the courier to another node of the map
    pub fn relocate(&mut self, node: NodeId, location: Location) {
        self.node = Some(node);
        self.location = location;
    }
}

/// Rejects capacities outside `1..=MAX_CAPACITY` instead of clamping
pub fn validate_capacity(capacity: usize) -> Result<(), DispatchError> {
    if (1..=MAX_CAPACITY).contains(&capacity) {
        Ok(())
    } else {
        Err(DispatchError::InvalidCapacity {
            capacity,
            max: MAX_CAPACITY,
        })
    }
}
