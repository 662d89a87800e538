use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;
use tracing::debug;

use crate::error::DispatchError;
use crate::models::{Distance, Location, NodeId};

/// Undirected location graph. Node `i` is the `i`-th registered location and
/// edge weights are the Euclidean distance between their endpoints.
#[derive(Debug, Clone, Default)]
pub struct LocationGraph {
    graph: UnGraph<Location, Distance>,
}

impl LocationGraph {
    /// Build the graph from node locations and an N×N connectivity matrix.
    ///
    /// `{i, j}` is connected when either `connectivity[i][j]` or
    /// `connectivity[j][i]` is set. The diagonal is ignored.
    pub fn from_connectivity(
        locations: &[Location],
        connectivity: &[Vec<bool>],
    ) -> Result<Self, DispatchError> {
        let n = locations.len();
        if connectivity.len() != n {
            return Err(DispatchError::ConnectivityShape {
                expected: n,
                row: n,
                found: connectivity.len(),
            });
        }
        if let Some((row, flags)) = connectivity
            .iter()
            .enumerate()
            .find(|(_, flags)| flags.len() != n)
        {
            return Err(DispatchError::ConnectivityShape {
                expected: n,
                row,
                found: flags.len(),
            });
        }

        Ok(Self::build(locations, |i, j| {
            connectivity[i][j] || connectivity[j][i]
        }))
    }

    /// Connect every pair of distinct locations
    pub fn fully_connected(locations: &[Location]) -> Self {
        Self::build(locations, |_, _| true)
    }

    fn build(locations: &[Location], connected: impl Fn(usize, usize) -> bool) -> Self {
        let mut graph = UnGraph::with_capacity(locations.len(), 0);
        for location in locations {
            graph.add_node(*location);
        }

        for i in 0..locations.len() {
            for j in (i + 1)..locations.len() {
                if connected(i, j) {
                    let weight = locations[i].distance_to(&locations[j]);
                    graph.add_edge(NodeIndex::new(i), NodeIndex::new(j), weight);
                }
            }
        }

        debug!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "built location graph"
        );
        Self { graph }
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn location(&self, node: NodeId) -> Option<Location> {
        self.graph.node_weight(NodeIndex::new(node)).copied()
    }

    /// Weight of the direct edge between `a` and `b`, if one exists
    pub fn edge_weight(&self, a: NodeId, b: NodeId) -> Option<Distance> {
        if a >= self.node_count() || b >= self.node_count() {
            return None;
        }
        self.graph
            .find_edge(NodeIndex::new(a), NodeIndex::new(b))
            .and_then(|edge| self.graph.edge_weight(edge))
            .copied()
    }

    /// Direct neighbours of `node` with the connecting edge weight
    pub fn neighbors(&self, node: NodeId) -> impl Iterator<Item = (NodeId, Distance)> + '_ {
        let source = NodeIndex::new(node);
        let edges = (node < self.node_count()).then(|| self.graph.edges(source));
        edges.into_iter().flatten().map(move |edge| {
            // Undirected edges may be reported from either endpoint
            let other = if edge.source() == source {
                edge.target()
            } else {
                edge.source()
            };
            (other.index(), *edge.weight())
        })
    }
}
