// Integration tests running whole dispatch rounds through the delivery system
use std::collections::HashSet;

use delivery_dispatch::{
    Assignment, DeliverySystem, DispatchConfig, DispatchError, DispatchStrategy, Driver,
    Location, Order, OrderStatus, Orderer, Store,
};
use rstest::{fixture, rstest};

fn on_line(x: f64) -> Location {
    Location::new(x, 0.0)
}

// Registers a customer and an order delivered to their address
fn place_order(system: &mut DeliverySystem, id: u32, store_id: u32, x: f64, fee: f64) {
    system.add_orderer(Orderer::new(id, format!("customer-{id}"), on_line(x)));
    system.add_order(Order::new(id, id, store_id, on_line(x), fee));
}

fn add_driver(system: &mut DeliverySystem, id: u32, x: f64, capacity: usize) {
    let driver = Driver::with_capacity(id, format!("driver-{id}"), on_line(x), capacity).unwrap();
    system.add_driver(driver);
}

/// Courier A at 0 and B at 70; o1 is sold and delivered at 10, o2 at 50.
/// A pays 10 and 50, B pays 60 and 20.
#[fixture]
fn two_courier_city() -> DeliverySystem {
    let mut system = DeliverySystem::default();
    system.add_store(Store::new(1, "West", on_line(10.0)));
    system.add_store(Store::new(2, "East", on_line(50.0)));
    add_driver(&mut system, 1, 0.0, 1);
    add_driver(&mut system, 2, 70.0, 1);
    place_order(&mut system, 1, 1, 10.0, 1000.0);
    place_order(&mut system, 2, 2, 50.0, 1000.0);
    system.build_fully_connected_network();
    system
}

/// One capacity-3 courier at 0 and a store at 1. Deliveries at 2 and 3 pay
/// well together; the one at 100 ruins any batch it joins.
#[fixture]
fn batching_city() -> DeliverySystem {
    let mut system = DeliverySystem::default();
    system.add_store(Store::new(1, "Depot", on_line(1.0)));
    add_driver(&mut system, 1, 0.0, 3);
    place_order(&mut system, 1, 1, 2.0, 10.0);
    place_order(&mut system, 2, 1, 3.0, 10.0);
    place_order(&mut system, 3, 1, 100.0, 10.0);
    system.build_fully_connected_network();
    system
}

/// Couriers and orders spread over a line with one shared store
fn crowded_city(drivers: u32, orders: u32, capacity: usize) -> DeliverySystem {
    let mut system = DeliverySystem::default();
    system.add_store(Store::new(1, "Hub", on_line(0.0)));
    for id in 1..=drivers {
        add_driver(&mut system, id, id as f64 * 3.0, capacity);
    }
    for id in 1..=orders {
        place_order(&mut system, id, 1, id as f64 * 2.0 + 1.0, 100.0 + id as f64);
    }
    system.build_fully_connected_network();
    system
}

#[rstest]
#[case::greedy(DispatchStrategy::Greedy)]
#[case::auction(DispatchStrategy::Auction)]
fn test_two_couriers_take_their_near_order(
    two_courier_city: DeliverySystem,
    #[case] strategy: DispatchStrategy,
) {
    let mut system = two_courier_city;
    let assignments = system.dispatch(strategy).unwrap();

    // Auction regrets tie at 40 and the first courier commits first
    assert_eq!(
        assignments,
        vec![Assignment::new(1, 1, 10.0), Assignment::new(2, 2, 20.0)]
    );
    assert_eq!(system.order(1).unwrap().driver_id(), Some(1));
    assert_eq!(system.order(2).unwrap().driver_id(), Some(2));
}

#[rstest]
fn test_batch_prefers_best_pair(batching_city: DeliverySystem) {
    let mut system = batching_city;
    let assignments = system.dispatch(DispatchStrategy::BatchGreedy).unwrap();

    // 20 fee over 3 distance beats 10 over 2 and 30 over 100
    assert_eq!(
        assignments,
        vec![Assignment::new(1, 1, 3.0), Assignment::new(1, 2, 3.0)]
    );
    let driver = system.driver(1).unwrap();
    assert_eq!(driver.queue().copied().collect::<Vec<_>>(), vec![1, 2]);
    assert_eq!(system.order(3).unwrap().status(), OrderStatus::Accepted);
}

#[rstest]
fn test_greedy_ignores_spare_capacity(batching_city: DeliverySystem) {
    let mut system = batching_city;
    let assignments = system.dispatch(DispatchStrategy::Greedy).unwrap();

    assert_eq!(assignments, vec![Assignment::new(1, 1, 2.0)]);
    assert_eq!(system.driver(1).unwrap().queue_len(), 1);
}

#[rstest]
#[case::greedy(DispatchStrategy::Greedy)]
#[case::batch_greedy(DispatchStrategy::BatchGreedy)]
#[case::auction(DispatchStrategy::Auction)]
fn test_round_never_double_assigns(#[case] strategy: DispatchStrategy) {
    let mut system = crowded_city(4, 7, 2);
    let assignments = system.dispatch(strategy).unwrap();
    assert!(!assignments.is_empty());

    let mut seen = HashSet::new();
    for assignment in &assignments {
        assert!(seen.insert(assignment.order_id), "order assigned twice");
        let order = system.order(assignment.order_id).unwrap();
        assert_eq!(order.status(), OrderStatus::DriverAssigned);
        assert_eq!(order.driver_id(), Some(assignment.driver_id));
    }

    for driver in system.drivers() {
        let count = assignments.iter().filter(|a| a.driver_id == driver.id).count();
        let limit = match strategy {
            DispatchStrategy::BatchGreedy => driver.capacity(),
            _ => 1,
        };
        assert!(count <= limit);
        assert_eq!(driver.queue_len(), count);
    }
}

#[rstest]
#[case(3, 2, 2)]
#[case(2, 3, 2)]
#[case(4, 4, 4)]
fn test_auction_assigns_every_possible_pair(
    #[case] drivers: u32,
    #[case] orders: u32,
    #[case] expected: usize,
) {
    let mut system = crowded_city(drivers, orders, 1);
    let assignments = system.dispatch(DispatchStrategy::Auction).unwrap();
    assert_eq!(assignments.len(), expected);
}

#[rstest]
#[case::greedy(DispatchStrategy::Greedy)]
#[case::batch_greedy(DispatchStrategy::BatchGreedy)]
#[case::auction(DispatchStrategy::Auction)]
fn test_rounds_are_deterministic(#[case] strategy: DispatchStrategy) {
    let system = crowded_city(3, 6, 3);
    let first = system.clone().dispatch(strategy).unwrap();
    let second = system.clone().dispatch(strategy).unwrap();
    assert_eq!(first, second);
}

#[rstest]
fn test_busy_couriers_sit_out_next_round(two_courier_city: DeliverySystem) {
    let mut system = two_courier_city;
    system.dispatch(DispatchStrategy::Greedy).unwrap();
    place_order(&mut system, 3, 1, 12.0, 500.0);
    system.build_fully_connected_network();

    assert!(system.dispatch(DispatchStrategy::Auction).unwrap().is_empty());

    system.complete_pickup(1).unwrap();
    system.complete_delivery(1).unwrap();
    let assignments = system.dispatch(DispatchStrategy::Greedy).unwrap();
    assert_eq!(assignments.len(), 1);
    assert_eq!(assignments[0].driver_id, 1);
    assert_eq!(assignments[0].order_id, 3);
}

#[rstest]
fn test_out_of_order_transitions_are_rejected(two_courier_city: DeliverySystem) {
    let mut system = two_courier_city;

    let err = system.complete_delivery(1).unwrap_err();
    assert!(matches!(
        err,
        DispatchError::InvalidTransition {
            order_id: 1,
            from: OrderStatus::Accepted,
            ..
        }
    ));
    assert!(matches!(
        system.complete_pickup(42),
        Err(DispatchError::UnknownOrder(42))
    ));
}

#[test]
fn test_dispatch_without_network_fails() {
    let mut system = DeliverySystem::default();
    system.add_store(Store::new(1, "Hub", on_line(0.0)));
    add_driver(&mut system, 1, 1.0, 1);
    place_order(&mut system, 1, 1, 2.0, 10.0);

    for strategy in [
        DispatchStrategy::Greedy,
        DispatchStrategy::BatchGreedy,
        DispatchStrategy::Auction,
    ] {
        assert!(matches!(
            system.dispatch(strategy),
            Err(DispatchError::NetworkNotBuilt)
        ));
    }
}

#[test]
fn test_disconnected_order_is_left_open() {
    let mut system = DeliverySystem::default();
    system.add_store(Store::new(1, "Hub", on_line(0.0)));
    add_driver(&mut system, 1, 1.0, 1);
    place_order(&mut system, 1, 1, 2.0, 10.0);

    // Courier (1) reaches the store (0), the customer side (2, 3) is cut off
    let mut connectivity = vec![vec![false; 4]; 4];
    connectivity[0][1] = true;
    system.build_network(&connectivity).unwrap();

    for strategy in [
        DispatchStrategy::Greedy,
        DispatchStrategy::BatchGreedy,
        DispatchStrategy::Auction,
    ] {
        let mut round = system.clone();
        assert!(round.dispatch(strategy).unwrap().is_empty());
        assert_eq!(round.order(1).unwrap().status(), OrderStatus::Accepted);
        assert!(round.driver(1).unwrap().is_available());
    }
}

#[test]
fn test_configured_strategy_and_json_output() {
    let config = DispatchConfig::from_json_str(
        r#"{ "strategy": "batch_greedy", "default_capacity": 3 }"#,
    )
    .unwrap();
    let mut system = DeliverySystem::new(config);
    system.add_store(Store::new(1, "Depot", on_line(1.0)));
    system.register_driver(1, "Han", on_line(0.0)).unwrap();
    place_order(&mut system, 1, 1, 2.0, 10.0);
    place_order(&mut system, 2, 1, 3.0, 10.0);
    system.ensure_network().unwrap();

    let assignments = system.dispatch_default().unwrap();
    assert_eq!(assignments.len(), 2);

    let json = serde_json::to_value(&assignments[0]).unwrap();
    assert_eq!(json["driver_id"], 1);
    assert_eq!(json["order_id"], 1);
    assert_eq!(json["cost"], 3.0);
}
