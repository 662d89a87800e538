// Store and orderer models: fixed pickup and drop-off points on the map

use crate::models::{Location, NodeId, OrdererId, StoreId};

/// Represents a store where orders are picked up
#[derive(Debug, Clone)]
pub struct Store {
    /// Unique identifier for the store
    pub id: StoreId,

    /// Display name of the store
    pub name: String,

    /// Geographic location of the store
    pub location: Location,

    /// Graph node assigned when the store is registered
    pub node: Option<NodeId>,
}

impl Store {
    /// Creates a new store that is not yet pinned to a graph node
    pub fn new<S: Into<String>>(id: StoreId, name: S, location: Location) -> Self {
        Self {
            id,
            name: name.into(),
            location,
            node: None,
        }
    }

    /// Creates a store already pinned to a graph node
    pub fn at_node<S: Into<String>>(
        id: StoreId,
        name: S,
        location: Location,
        node: NodeId,
    ) -> Self {
        Self {
            node: Some(node),
            ..Self::new(id, name, location)
        }
    }
}

/// Represents the customer placing orders
#[derive(Debug, Clone)]
pub struct Orderer {
    pub id: OrdererId,
    pub name: String,
    pub address: Location,
    pub node: Option<NodeId>,
}

impl Orderer {
    pub fn new<S: Into<String>>(id: OrdererId, name: S, address: Location) -> Self {
        Self {
            id,
            name: name.into(),
            address,
            node: None,
        }
    }
}

/// Looks up a store by id in a registration-ordered slice
pub fn find_store(stores: &[Store], store_id: StoreId) -> Option<&Store> {
    stores.iter().find(|store| store.id == store_id)
}
