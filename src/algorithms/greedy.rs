use std::cmp::Ordering;
use std::collections::HashSet;

use tracing::{debug, info, warn};

use crate::algorithms::{commit, is_open, DispatchContext, Dispatcher};
use crate::models::{Assignment, Distance, Driver, Order};

/// Gives every available courier the cheapest open order, one order per
/// courier per round.
#[derive(Debug, Clone, Copy, Default)]
pub struct GreedyDispatcher;

impl Dispatcher for GreedyDispatcher {
    fn name(&self) -> &'static str {
        "greedy"
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

            // (order index, cost) for every reachable open order
            let mut candidates: Vec<(usize, Distance)> = orders
                .iter()
                .enumerate()
                .filter(|(_, order)| is_open(order, &claimed))
                .filter_map(|(index, order)| {
                    ctx.direct_cost(driver_node, order).map(|cost| (index, cost))
                })
                .collect();

            // Stable sort keeps insertion order among equal costs
            candidates.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal));

            let Some(&(index, cost)) = candidates.first() else {
                debug!(driver = driver.id, "no eligible order");
                continue;
            };

            let order = &mut orders[index];
            if let Some(assignment) = commit(driver, order, cost) {
                debug!(driver = driver.id, order = order.id, cost, "greedy assignment");
                claimed.insert(order.id);
                assignments.push(assignment);
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
