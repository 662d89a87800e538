// Route models for representing batched pickup and drop-off plans

use serde::Serialize;

use crate::models::{Distance, Fee, NodeId, OrderId};

/// A stop on a courier's route
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Waypoint {
    /// Collect the order at its store
    Pickup { order_id: OrderId, node: NodeId },
    /// Hand the order over at its delivery node
    DropOff { order_id: OrderId, node: NodeId },
}

impl Waypoint {
    pub fn node(&self) -> NodeId {
        match self {
            Waypoint::Pickup { node, .. } | Waypoint::DropOff { node, .. } => *node,
        }
    }

    pub fn order_id(&self) -> OrderId {
        match self {
            Waypoint::Pickup { order_id, .. } | Waypoint::DropOff { order_id, .. } => *order_id,
        }
    }
}

/// Represents a complete visiting order for a batch of orders
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VisitPlan {
    /// Sequence of stops, starting after the courier's current node
    pub waypoints: Vec<Waypoint>,

    /// Total travel distance including the leg from the courier
    pub distance: Distance,
}

impl VisitPlan {
    pub fn new(waypoints: Vec<Waypoint>, distance: Distance) -> Self {
        Self {
            waypoints,
            distance,
        }
    }

    /// Orders in the sequence they are dropped off
    pub fn delivery_sequence(&self) -> Vec<OrderId> {
        self.waypoints
            .iter()
            .filter_map(|waypoint| match waypoint {
                Waypoint::DropOff { order_id, .. } => Some(*order_id),
                Waypoint::Pickup { .. } => None,
            })
            .collect()
    }

    /// Fee earned per unit of distance travelled.
    /// A plan with no travel is infinitely efficient if it earns anything.
    pub fn efficiency(&self, total_fee: Fee) -> f64 {
        if self.distance > 0.0 {
            total_fee / self.distance
        } else if total_fee > 0.0 {
            f64::INFINITY
        } else {
            0.0
        }
    }
}
