//! Regret-based sequential auction.
//!
//! Builds a courier × order cost matrix, reduces every courier row by its
//! minimum and then repeatedly commits the courier whose gap between its best
//! and second-best remaining order (its regret) is smallest. This is a
//! heuristic, not a minimum-cost bipartite matching: a courier with little to
//! lose takes its favourite before a competitor can.

use std::cmp::Ordering;

use tracing::{debug, info, warn};

use crate::algorithms::{commit, DispatchContext, Dispatcher};
use crate::models::{Assignment, Distance, Driver, Order};

/// Cost charged for a courier-order pair that cannot be served
pub const UNREACHABLE_COST: Distance = f64::MAX;

#[derive(Debug, Clone, Copy, Default)]
pub struct AuctionDispatcher;

/// One cell of the cost matrix
#[derive(Debug, Clone, Copy, PartialEq)]
struct Bid {
    driver: usize,
    order: usize,
    cost: Distance,
    reduced: Distance,
}

impl Dispatcher for AuctionDispatcher {
    fn name(&self) -> &'static str {
        "auction"
    }

    fn dispatch(
        &self,
        ctx: &DispatchContext<'_>,
        drivers: &mut [Driver],
        orders: &mut [Order],
    ) -> Vec<Assignment> {
        let order_indices: Vec<usize> = (0..orders.len())
            .filter(|&index| orders[index].is_awaiting_driver())
            .collect();

        let mut rows: Vec<Vec<Bid>> = Vec::new();
        for (driver_index, driver) in drivers.iter().enumerate() {
            if !driver.is_available() {
                continue;
            }
            let Some(driver_node) = driver.node else {
                warn!(driver = driver.id, "driver has no graph node, skipping");
                continue;
            };
            if order_indices.is_empty() {
                break;
            }

            let costs: Vec<Distance> = order_indices
                .iter()
                .map(|&index| {
                    ctx.direct_cost(driver_node, &orders[index])
                        .unwrap_or(UNREACHABLE_COST)
                })
                .collect();
            let row_min = costs.iter().copied().fold(f64::INFINITY, f64::min);
            if row_min >= UNREACHABLE_COST {
                debug!(driver = driver.id, "driver cannot reach any order, skipping");
                continue;
            }

            let mut row: Vec<Bid> = order_indices
                .iter()
                .zip(costs)
                .map(|(&order, cost)| Bid {
                    driver: driver_index,
                    order,
                    cost,
                    reduced: cost - row_min,
                })
                .collect();
            row.sort_by(|a, b| a.reduced.partial_cmp(&b.reduced).unwrap_or(Ordering::Equal));
            rows.push(row);
        }

        let committed = run_auction(rows);

        let mut assignments = Vec::new();
        for bid in committed {
            if bid.cost >= UNREACHABLE_COST {
                debug!(
                    driver = drivers[bid.driver].id,
                    order = orders[bid.order].id,
                    "discarding unreachable pairing"
                );
                continue;
            }
            let assignment = commit(&mut drivers[bid.driver], &mut orders[bid.order], bid.cost);
            if let Some(assignment) = assignment {
                debug!(
                    driver = assignment.driver_id,
                    order = assignment.order_id,
                    cost = assignment.cost,
                    "auction assignment"
                );
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

// Each row is one courier's bids sorted by reduced cost; all rows list the
// same remaining orders.
fn run_auction(mut rows: Vec<Vec<Bid>>) -> Vec<Bid> {
    let mut committed = Vec::new();

    loop {
        // A courier whose cheapest remaining bid is unreachable can serve
        // nothing left and must not take an order from another courier
        rows.retain(|row| row.first().map_or(false, |bid| bid.cost < UNREACHABLE_COST));

        let Some(first_row) = rows.first() else {
            break;
        };
        let Some(&first_bid) = first_row.first() else {
            break;
        };

        // Last courier takes its cheapest remaining order
        if rows.len() == 1 {
            committed.push(first_bid);
            break;
        }

        // Last order goes to the first remaining courier
        if first_row.len() == 1 {
            committed.push(first_bid);
            break;
        }

        let mut min_regret = f64::INFINITY;
        let mut winner = 0;
        for (i, row) in rows.iter().enumerate() {
            let regret = row[1].reduced - row[0].reduced;
            if regret < min_regret {
                min_regret = regret;
                winner = i;
            }
        }

        let bid = rows.remove(winner)[0];
        for row in rows.iter_mut() {
            if let Some(position) = row.iter().position(|b| b.order == bid.order) {
                row.remove(position);
            }
        }
        committed.push(bid);
    }

    committed
}
