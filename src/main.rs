use delivery_dispatch::{
    DeliverySystem, DispatchConfig, DispatchError, DispatchStrategy, Driver, Location, Order,
    OrderStatus, Orderer, Store,
};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Optional JSON config as the first argument
    let config = match std::env::args().nth(1) {
        Some(path) => match DispatchConfig::from_file(&path) {
            Ok(config) => config,
            Err(e) => {
                error!(%path, error = %e, "could not load config");
                return;
            }
        },
        None => DispatchConfig::default(),
    };

    let mut system = match build_city(config) {
        Ok(system) => system,
        Err(e) => {
            error!(error = %e, "could not build the city");
            return;
        }
    };

    println!(
        "\nCity: {} nodes, {} stores, {} couriers, {} orders",
        system.node_count(),
        system.stores().len(),
        system.drivers().len(),
        system.orders().len()
    );

    for strategy in [
        DispatchStrategy::Greedy,
        DispatchStrategy::BatchGreedy,
        DispatchStrategy::Auction,
    ] {
        // Each strategy starts from the same undispatched state
        let mut round = system.clone();
        match round.dispatch(strategy) {
            Ok(assignments) => {
                let total: f64 = assignments.iter().map(|a| a.cost).sum();
                println!(
                    "\n{:?}: {} assignments, total cost {:.2}",
                    strategy,
                    assignments.len(),
                    total
                );
                match serde_json::to_string_pretty(&assignments) {
                    Ok(json) => println!("{}", json),
                    Err(e) => error!(error = %e, "could not serialise assignments"),
                }
            }
            Err(e) => error!(?strategy, error = %e, "dispatch failed"),
        }
    }

    // Play the configured strategy through to delivery
    if let Err(e) = run_to_completion(&mut system) {
        error!(error = %e, "simulation failed");
    }
}

fn build_city(config: DispatchConfig) -> Result<DeliverySystem, DispatchError> {
    let mut system = DeliverySystem::new(config);

    system.add_store(Store::new(1, "Corner Pizza", Location::new(0.0, 0.0)));
    system.add_store(Store::new(2, "Noodle Bar", Location::new(10.0, 2.0)));

    system.add_orderer(Orderer::new(1, "Kim", Location::new(3.0, 4.0)));
    system.add_orderer(Orderer::new(2, "Lee", Location::new(12.0, 6.0)));
    system.add_orderer(Orderer::new(3, "Park", Location::new(-2.0, 5.0)));

    system.register_driver(1, "Choi", Location::new(1.0, -1.0))?;
    system.register_driver(2, "Jung", Location::new(9.0, 0.0))?;
    system.add_driver(Driver::with_capacity(3, "Kang", Location::new(5.0, 5.0), 3)?);

    system.add_order(Order::new(1, 1, 1, Location::new(3.0, 4.0), 3000.0));
    system.add_order(Order::new(2, 2, 2, Location::new(12.0, 6.0), 4500.0));
    system.add_order(Order::new(3, 3, 1, Location::new(-2.0, 5.0), 2500.0));
    system.add_order(Order::new(4, 1, 2, Location::new(3.0, 4.0), 5000.0));

    system.ensure_network()?;
    Ok(system)
}

fn run_to_completion(system: &mut DeliverySystem) -> Result<(), DispatchError> {
    let mut rounds = 0;

    while system.orders().iter().any(|o| !o.is_delivered()) && rounds < 100 {
        rounds += 1;
        let assignments = system.dispatch_default()?;
        info!(round = rounds, assigned = assignments.len(), "dispatch round");

        // Step every busy courier toward its next stop
        let moves: Vec<(u32, usize)> = system
            .drivers()
            .iter()
            .filter_map(|driver| {
                let order_id = *driver.queue().next()?;
                let order = system.order(order_id)?;
                let target = if order.status() == OrderStatus::PickedUp {
                    order.delivery_node?
                } else {
                    system.store_node(order.store_id).ok()?
                };
                Some((driver.id, target))
            })
            .collect();

        for (driver_id, target) in moves {
            system.advance_driver(driver_id, target)?;
        }
        system.sync_order_statuses();
    }

    let delivered = system.orders().iter().filter(|o| o.is_delivered()).count();
    println!(
        "\nSimulation finished after {} rounds: {}/{} orders delivered",
        rounds,
        delivered,
        system.orders().len()
    );
    Ok(())
}
