pub mod distance_oracle;
pub mod location_graph;

pub use distance_oracle::DistanceOracle;
pub use location_graph::LocationGraph;
