//! Registry owning every entity of the delivery simulation.
//!
//! Entities are stored in registration order and refer to each other by id.
//! Every registered location becomes a graph node; registering a new one
//! invalidates the distance network until it is rebuilt.

use tracing::{debug, info, warn};

use crate::algorithms::{DispatchContext, DispatchStrategy};
use crate::config::DispatchConfig;
use crate::error::DispatchError;
use crate::models::{
    find_store, Assignment, Driver, DriverId, Location, NodeId, Order, OrderId, OrderStatus,
    Orderer, Store, StoreId,
};
use crate::utils::{DistanceOracle, LocationGraph};

#[derive(Debug, Clone)]
struct Network {
    graph: LocationGraph,
    oracle: DistanceOracle,
}

#[derive(Debug, Clone, Default)]
pub struct DeliverySystem {
    config: DispatchConfig,
    nodes: Vec<Location>,
    stores: Vec<Store>,
    orderers: Vec<Orderer>,
    drivers: Vec<Driver>,
    orders: Vec<Order>,
    network: Option<Network>,
}

impl DeliverySystem {
    pub fn new(config: DispatchConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &DispatchConfig {
        &self.config
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn stores(&self) -> &[Store] {
        &self.stores
    }

    pub fn orderers(&self) -> &[Orderer] {
        &self.orderers
    }

    pub fn drivers(&self) -> &[Driver] {
        &self.drivers
    }

    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    pub fn order(&self, order_id: OrderId) -> Option<&Order> {
        self.orders.iter().find(|order| order.id == order_id)
    }

    /// Graph node a store was registered at
    pub fn store_node(&self, store_id: StoreId) -> Result<NodeId, DispatchError> {
        find_store(&self.stores, store_id)
            .and_then(|store| store.node)
            .ok_or(DispatchError::UnknownStore(store_id))
    }

    pub fn driver(&self, driver_id: DriverId) -> Option<&Driver> {
        self.drivers.iter().find(|driver| driver.id == driver_id)
    }

    fn register_location(&mut self, location: Location) -> NodeId {
        self.nodes.push(location);
        if self.network.take().is_some() {
            debug!(nodes = self.nodes.len(), "node set changed, network invalidated");
        }
        self.nodes.len() - 1
    }

    pub fn add_store(&mut self, mut store: Store) -> NodeId {
        let node = self.register_location(store.location);
        store.node = Some(node);
        self.stores.push(store);
        node
    }

    pub fn add_orderer(&mut self, mut orderer: Orderer) -> NodeId {
        let node = self.register_location(orderer.address);
        orderer.node = Some(node);
        self.orderers.push(orderer);
        node
    }

    pub fn add_driver(&mut self, mut driver: Driver) -> NodeId {
        let node = self.register_location(driver.location);
        driver.node = Some(node);
        self.drivers.push(driver);
        node
    }

    /// Registers a courier with the configured default capacity
    pub fn register_driver<S: Into<String>>(
        &mut self,
        id: DriverId,
        name: S,
        location: Location,
    ) -> Result<NodeId, DispatchError> {
        let driver = Driver::with_capacity(id, name, location, self.config.default_capacity)?;
        Ok(self.add_driver(driver))
    }

    /// Registers the delivery location and hands the order to its store.
    ///
    /// An order whose store or orderer is unknown is kept but stays
    /// `Requested`, so no dispatch round will pick it up.
    pub fn add_order(&mut self, mut order: Order) -> NodeId {
        let node = self.register_location(order.delivery_location);
        order.delivery_node = Some(node);

        let has_orderer = self.orderers.iter().any(|o| o.id == order.orderer_id);
        if !has_orderer {
            warn!(order = order.id, orderer = order.orderer_id, "orderer not found");
        }

        match find_store(&self.stores, order.store_id) {
            Some(_) if has_orderer => {
                if let Err(err) = order.accept() {
                    warn!(order = order.id, %err, "order not accepted");
                }
            }
            Some(_) => {}
            None => warn!(order = order.id, store = order.store_id, "store not found"),
        }

        self.orders.push(order);
        node
    }

    /// Rebuilds graph and oracle from an N×N connectivity matrix
    pub fn build_network(&mut self, connectivity: &[Vec<bool>]) -> Result<(), DispatchError> {
        let graph = LocationGraph::from_connectivity(&self.nodes, connectivity)?;
        self.install(graph);
        Ok(())
    }

    pub fn build_fully_connected_network(&mut self) {
        let graph = LocationGraph::fully_connected(&self.nodes);
        self.install(graph);
    }

    /// Builds the network the configuration asks for when it is missing.
    /// Without `fully_connected` an explicit matrix is required.
    pub fn ensure_network(&mut self) -> Result<(), DispatchError> {
        if self.network.is_some() {
            return Ok(());
        }
        if !self.config.fully_connected {
            return Err(DispatchError::NetworkNotBuilt);
        }
        self.build_fully_connected_network();
        Ok(())
    }

    fn install(&mut self, graph: LocationGraph) {
        let oracle = DistanceOracle::build(&graph);
        info!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "distance network built"
        );
        self.network = Some(Network { graph, oracle });
    }

    pub fn oracle(&self) -> Result<&DistanceOracle, DispatchError> {
        self.network
            .as_ref()
            .map(|network| &network.oracle)
            .ok_or(DispatchError::NetworkNotBuilt)
    }

    /// Runs one dispatch round with `strategy`
    pub fn dispatch(
        &mut self,
        strategy: DispatchStrategy,
    ) -> Result<Vec<Assignment>, DispatchError> {
        let network = self.network.as_ref().ok_or(DispatchError::NetworkNotBuilt)?;
        let ctx = DispatchContext::new(&network.oracle, &self.stores);
        let dispatcher = strategy.dispatcher();
        debug!(strategy = dispatcher.name(), "starting dispatch round");
        Ok(dispatcher.dispatch(&ctx, &mut self.drivers, &mut self.orders))
    }

    /// Runs one dispatch round with the configured strategy
    pub fn dispatch_default(&mut self) -> Result<Vec<Assignment>, DispatchError> {
        self.dispatch(self.config.strategy)
    }

    pub fn complete_pickup(&mut self, order_id: OrderId) -> Result<(), DispatchError> {
        self.order_mut(order_id)?.complete_pickup()
    }

    /// Marks the order delivered and frees it from its courier's queue
    pub fn complete_delivery(&mut self, order_id: OrderId) -> Result<(), DispatchError> {
        let order = self.order_mut(order_id)?;
        order.complete_delivery()?;
        let driver_id = order.driver_id();

        match self.drivers.iter_mut().find(|d| Some(d.id) == driver_id) {
            Some(driver) => {
                if !driver.complete_delivery(order_id) {
                    warn!(
                        driver = driver.id,
                        order = order_id,
                        "delivered order was not next in queue"
                    );
                }
            }
            None => warn!(order = order_id, "delivering driver not found"),
        }
        Ok(())
    }

    /// Moves a courier one node toward `target`.
    /// Returns the new node, or `None` if it is already there or cannot move.
    pub fn advance_driver(
        &mut self,
        driver_id: DriverId,
        target: NodeId,
    ) -> Result<Option<NodeId>, DispatchError> {
        let network = self.network.as_ref().ok_or(DispatchError::NetworkNotBuilt)?;
        let driver = self
            .drivers
            .iter_mut()
            .find(|d| d.id == driver_id)
            .ok_or(DispatchError::UnknownDriver(driver_id))?;

        let Some(current) = driver.node else {
            return Ok(None);
        };
        let Some(next) = network.oracle.next_hop(&network.graph, current, target) else {
            return Ok(None);
        };
        let Some(location) = network.graph.location(next) else {
            return Ok(None);
        };

        driver.relocate(next, location);
        debug!(driver = driver_id, from = current, to = next, "driver advanced");
        Ok(Some(next))
    }

    /// Applies pickups and deliveries for couriers standing on the right
    /// node. Returns the number of status changes made.
    pub fn sync_order_statuses(&mut self) -> usize {
        let mut changes = 0;

        for order in self.orders.iter_mut() {
            let Some(driver_id) = order.driver_id() else {
                continue;
            };
            let Some(driver) = self.drivers.iter_mut().find(|d| d.id == driver_id) else {
                continue;
            };
            let Some(driver_node) = driver.node else {
                continue;
            };

            if order.status() == OrderStatus::DriverAssigned {
                let store_node = find_store(&self.stores, order.store_id).and_then(|s| s.node);
                if store_node == Some(driver_node) && order.complete_pickup().is_ok() {
                    changes += 1;
                }
            }

            if order.status() == OrderStatus::PickedUp
                && order.delivery_node == Some(driver_node)
                && driver.queue().next() == Some(&order.id)
                && order.complete_delivery().is_ok()
            {
                driver.complete_delivery(order.id);
                changes += 1;
            }
        }

        changes
    }

    fn order_mut(&mut self, order_id: OrderId) -> Result<&mut Order, DispatchError> {
        self.orders
            .iter_mut()
            .find(|order| order.id == order_id)
            .ok_or(DispatchError::UnknownOrder(order_id))
    }
}
