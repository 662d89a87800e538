//! Batched greedy dispatch.
//!
//! Each available courier considers every combination of up to `capacity`
//! open orders, finds the shortest pickup/drop-off sequence for each
//! combination and keeps the one earning the most fee per unit of distance.
//!
//! The search is exhaustive: `C(n, k)` combinations, each explored over the
//! precedence-respecting orderings of `2k` waypoints. This is only viable
//! because capacity is capped at [`MAX_CAPACITY`](crate::models::MAX_CAPACITY)
//! and does not scale to large batches.

use std::collections::HashSet;

use tracing::{debug, info, warn};

use crate::algorithms::{commit, is_open, DispatchContext, Dispatcher};
use crate::models::{Assignment, Distance, Driver, Fee, NodeId, Order, OrderId, VisitPlan, Waypoint};
use crate::utils::DistanceOracle;

/// One order of a combination, reduced to what route planning needs
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BatchStop {
    pub order_id: OrderId,
    pub pickup: NodeId,
    pub drop_off: NodeId,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BatchGreedyDispatcher;

// Winning combination for one courier
struct BatchChoice {
    order_indices: Vec<usize>,
    plan: VisitPlan,
    efficiency: f64,
}

impl Dispatcher for BatchGreedyDispatcher {
    fn name(&self) -> &'static str {
        "batch_greedy"
    }

    fn dispatch(
        &self,
        ctx: &DispatchContext<'_>,
        drivers: &mut [Driver],
        orders: &mut [Order],
    ) -> Vec<Assignment> {
        let mut claimed = HashSet::new();
        let mut assignments = Vec::new();

        for driver in drivers.iter_mut().filter(|d| d.is_available()) {
            let Some(driver_node) = driver.node else {
                warn!(driver = driver.id, "driver has no graph node, skipping");
                continue;
            };

            let candidates: Vec<(usize, BatchStop)> = orders
                .iter()
                .enumerate()
                .filter(|(_, order)| is_open(order, &claimed))
                .filter_map(|(index, order)| {
                    let (pickup, drop_off) = ctx.order_endpoints(order)?;
                    Some((
                        index,
                        BatchStop {
                            order_id: order.id,
                            pickup,
                            drop_off,
                        },
                    ))
                })
                .collect();

            let best = best_batch(ctx.oracle, driver_node, driver.capacity(), &candidates, orders);
            let Some(choice) = best else {
                debug!(driver = driver.id, "no feasible batch");
                continue;
            };

            debug!(
                driver = driver.id,
                orders = choice.order_indices.len(),
                distance = choice.plan.distance,
                efficiency = choice.efficiency,
                "batch selected"
            );

            // Queue orders in the sequence they will be delivered
            for order_id in choice.plan.delivery_sequence() {
                let Some(&index) = choice
                    .order_indices
                    .iter()
                    .find(|&&index| orders[index].id == order_id)
                else {
                    continue;
                };
                if claimed.contains(&order_id) {
                    warn!(driver = driver.id, order = order_id, "order already claimed this round");
                    continue;
                }
                if let Some(assignment) = commit(driver, &mut orders[index], choice.plan.distance) {
                    claimed.insert(order_id);
                    assignments.push(assignment);
                }
            }
        }

        info!(
            strategy = self.name(),
            assigned = assignments.len(),
            "dispatch round finished"
        );
        assignments
    }
}

// Highest-efficiency combination; the first enumerated wins ties
fn best_batch(
    oracle: &DistanceOracle,
    start: NodeId,
    capacity: usize,
    candidates: &[(usize, BatchStop)],
    orders: &[Order],
) -> Option<BatchChoice> {
    let mut best: Option<BatchChoice> = None;
    let max_size = capacity.min(candidates.len());

    for size in 1..=max_size {
        for combination in combinations(candidates, size) {
            let stops: Vec<BatchStop> = combination.iter().map(|(_, stop)| *stop).collect();
            let Some(plan) = optimal_visit_plan(oracle, start, &stops) else {
                continue;
            };

            let total_fee: Fee = combination.iter().map(|(index, _)| orders[*index].fee).sum();
            let efficiency = plan.efficiency(total_fee);

            if best.as_ref().map_or(true, |b| efficiency > b.efficiency) {
                best = Some(BatchChoice {
                    order_indices: combination.iter().map(|(index, _)| *index).collect(),
                    plan,
                    efficiency,
                });
            }
        }
    }

    best
}

/// All `size`-element selections of `items`, in lexicographic index order
pub fn combinations<T: Clone>(items: &[T], size: usize) -> Vec<Vec<T>> {
    if size == 0 {
        return vec![vec![]];
    }
    if items.len() < size {
        return Vec::new();
    }

    let mut result = Vec::new();
    for (i, item) in items.iter().enumerate() {
        for mut rest in combinations(&items[i + 1..], size - 1) {
            rest.insert(0, item.clone());
            result.push(rest);
        }
    }
    result
}

/// Shortest route from `start` that picks up and drops off every stop, never
/// dropping an order before its pickup. `None` if no such route is reachable.
pub fn optimal_visit_plan(
    oracle: &DistanceOracle,
    start: NodeId,
    stops: &[BatchStop],
) -> Option<VisitPlan> {
    let mut search = PlanSearch {
        oracle,
        stops,
        picked: vec![false; stops.len()],
        dropped: vec![false; stops.len()],
        path: Vec::with_capacity(stops.len() * 2),
        best: None,
    };
    search.explore(start, 0.0);
    search.best
}

struct PlanSearch<'a> {
    oracle: &'a DistanceOracle,
    stops: &'a [BatchStop],
    picked: Vec<bool>,
    dropped: Vec<bool>,
    path: Vec<Waypoint>,
    best: Option<VisitPlan>,
}

impl PlanSearch<'_> {
    fn explore(&mut self, current: NodeId, travelled: Distance) {
        if let Some(best) = &self.best {
            // Legs are non-negative, so this branch cannot improve
            if travelled >= best.distance {
                return;
            }
        }

        if self.path.len() == self.stops.len() * 2 {
            self.best = Some(VisitPlan::new(self.path.clone(), travelled));
            return;
        }

        for i in 0..self.stops.len() {
            let stop = self.stops[i];
            let waypoint = if !self.picked[i] {
                Waypoint::Pickup {
                    order_id: stop.order_id,
                    node: stop.pickup,
                }
            } else if !self.dropped[i] {
                Waypoint::DropOff {
                    order_id: stop.order_id,
                    node: stop.drop_off,
                }
            } else {
                continue;
            };

            let Some(leg) = self.oracle.distance(current, waypoint.node()) else {
                continue;
            };

            self.mark(i, waypoint, true);
            self.path.push(waypoint);
            self.explore(waypoint.node(), travelled + leg);
            self.path.pop();
            self.mark(i, waypoint, false);
        }
    }

    fn mark(&mut self, i: usize, waypoint: Waypoint, value: bool) {
        match waypoint {
            Waypoint::Pickup { .. } => self.picked[i] = value,
            Waypoint::DropOff { .. } => self.dropped[i] = value,
        }
    }
}
