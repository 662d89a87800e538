use criterion::{black_box, criterion_group, criterion_main, Criterion};
use delivery_dispatch::{
    DeliverySystem, DispatchConfig, DispatchStrategy, DistanceOracle, Driver, Location,
    LocationGraph, Order, Orderer, Store,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const SEED: u64 = 42;

fn benchmark_oracle(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(SEED);
    let locations: Vec<Location> = (0..200)
        .map(|_| Location::new(rng.gen_range(0.0..100.0), rng.gen_range(0.0..100.0)))
        .collect();

    // Sparse road-like network: each node links to a handful of random others
    let mut connectivity = vec![vec![false; locations.len()]; locations.len()];
    for i in 0..locations.len() {
        for _ in 0..4 {
            let j = rng.gen_range(0..locations.len());
            connectivity[i][j] = true;
        }
    }
    let sparse = LocationGraph::from_connectivity(&locations, &connectivity)
        .expect("square connectivity");
    let dense = LocationGraph::fully_connected(&locations);

    c.bench_function("oracle_build_sparse_200", |b| {
        b.iter(|| DistanceOracle::build(black_box(&sparse)))
    });
    c.bench_function("oracle_build_dense_200", |b| {
        b.iter(|| DistanceOracle::build(black_box(&dense)))
    });
}

fn benchmark_strategies(c: &mut Criterion) {
    let system = create_benchmark_city(10, 8, 20);

    for strategy in [
        DispatchStrategy::Greedy,
        DispatchStrategy::BatchGreedy,
        DispatchStrategy::Auction,
    ] {
        let name = format!("dispatch_{}", strategy.dispatcher().name());
        c.bench_function(&name, |b| {
            b.iter(|| {
                let mut round = system.clone();
                round.dispatch(black_box(strategy)).expect("network built")
            })
        });
    }
}

// Random city with capacity-3 couriers so batching has room to work
fn create_benchmark_city(stores: u32, drivers: u32, orders: u32) -> DeliverySystem {
    let mut rng = StdRng::seed_from_u64(SEED);
    let mut system = DeliverySystem::new(DispatchConfig::default());
    for id in 1..=stores {
        system.add_store(Store::new(id, format!("store-{id}"), point(&mut rng)));
    }
    for id in 1..=drivers {
        let driver = Driver::with_capacity(id, format!("driver-{id}"), point(&mut rng), 3)
            .expect("valid capacity");
        system.add_driver(driver);
    }
    for id in 1..=orders {
        let address = point(&mut rng);
        system.add_orderer(Orderer::new(id, format!("orderer-{id}"), address));
        let store_id = rng.gen_range(1..=stores);
        let fee = rng.gen_range(1000.0..6000.0);
        system.add_order(Order::new(id, id, store_id, address, fee));
    }
    system.build_fully_connected_network();
    system
}

fn point(rng: &mut StdRng) -> Location {
    Location::new(rng.gen_range(0.0..50.0), rng.gen_range(0.0..50.0))
}

criterion_group!(benches, benchmark_oracle, benchmark_strategies);
criterion_main!(benches);
