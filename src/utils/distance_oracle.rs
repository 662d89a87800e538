use std::cmp::{Ordering, Reverse};

use priority_queue::PriorityQueue;
use rayon::prelude::*;
use tracing::debug;

use crate::models::{Distance, NodeId};
use crate::utils::location_graph::LocationGraph;

// Wrapper to give tentative distances a total order in the frontier
#[derive(PartialEq, Copy, Clone, Debug)]
struct FrontierDistance(Distance);

impl Eq for FrontierDistance {}

impl PartialOrd for FrontierDistance {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FrontierDistance {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

/// All-pairs shortest distances over a [`LocationGraph`].
///
/// Stored as a dense row-major N×N matrix; unreachable pairs hold
/// `f64::INFINITY` and are reported as `None`.
#[derive(Debug, Clone, Default)]
pub struct DistanceOracle {
    costs: Vec<Distance>,
    size: usize,
}

impl DistanceOracle {
    /// Runs a single-source shortest path search from every node.
    pub fn build(graph: &LocationGraph) -> Self {
        let size = graph.node_count();
        let rows: Vec<Vec<Distance>> = (0..size)
            .into_par_iter()
            .map(|source| shortest_distances_from(graph, source))
            .collect();

        let costs: Vec<Distance> = rows.into_iter().flatten().collect();
        debug!(
            nodes = size,
            unreachable_pairs = costs.iter().filter(|d| d.is_infinite()).count(),
            "built distance oracle"
        );

        Self { costs, size }
    }

    /// Number of nodes covered by the oracle
    pub fn node_count(&self) -> usize {
        self.size
    }

    /// Shortest distance from `from` to `to`.
    /// `None` when no path exists or either node is outside the graph.
    pub fn distance(&self, from: NodeId, to: NodeId) -> Option<Distance> {
        if from >= self.size || to >= self.size {
            return None;
        }
        let cost = self.costs[from * self.size + to];
        cost.is_finite().then_some(cost)
    }

    /// Distance of visiting `stops` in order starting at `start`
    pub fn route_distance(&self, start: NodeId, stops: &[NodeId]) -> Option<Distance> {
        let mut total = 0.0;
        let mut current = start;
        for &stop in stops {
            total += self.distance(current, stop)?;
            current = stop;
        }
        // An empty route still requires `start` to exist
        if stops.is_empty() {
            self.distance(start, start)?;
        }
        Some(total)
    }

    /// The neighbour of `from` to move to when heading for `to`.
    ///
    /// Picks the neighbour minimising the direct edge plus the remaining
    /// shortest distance. Returns `None` if already there or `to` cannot be
    /// reached.
    pub fn next_hop(&self, graph: &LocationGraph, from: NodeId, to: NodeId) -> Option<NodeId> {
        if from == to {
            return None;
        }

        let mut best: Option<(NodeId, Distance)> = None;
        for (neighbor, weight) in graph.neighbors(from) {
            let Some(remaining) = self.distance(neighbor, to) else {
                continue;
            };
            let cost = weight + remaining;
            // Lowest node id wins ties
            let better = match best {
                None => true,
                Some((best_node, best_cost)) => {
                    cost < best_cost || (cost == best_cost && neighbor < best_node)
                }
            };
            if better {
                best = Some((neighbor, cost));
            }
        }

        best.map(|(node, _)| node)
    }
}

// Dijkstra from one source with a min-priority frontier
fn shortest_distances_from(graph: &LocationGraph, source: NodeId) -> Vec<Distance> {
    let mut distances = vec![f64::INFINITY; graph.node_count()];
    let mut visited = vec![false; graph.node_count()];
    let mut frontier = PriorityQueue::new();

    distances[source] = 0.0;
    frontier.push(source, Reverse(FrontierDistance(0.0)));

    while let Some((node, Reverse(FrontierDistance(distance)))) = frontier.pop() {
        if visited[node] {
            continue;
        }
        visited[node] = true;

        for (neighbor, weight) in graph.neighbors(node) {
            if visited[neighbor] {
                continue;
            }
            let candidate = distance + weight;
            if candidate < distances[neighbor] {
                distances[neighbor] = candidate;
                // Re-pushing an item updates its priority in place
                frontier.push(neighbor, Reverse(FrontierDistance(candidate)));
            }
        }
    }

    distances
}
