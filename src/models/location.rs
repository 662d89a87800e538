// Location model representing coordinates in 2D space

use geo::{EuclideanDistance, Point};
use serde::{Deserialize, Serialize};

/// Represents a location with (x, y) coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub x: f64,
    pub y: f64,
}

impl Location {
    /// Creates a new location with the given coordinates
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Calculates the Euclidean distance between two locations
    pub fn distance_to(&self, other: &Location) -> f64 {
        Point::from(*self).euclidean_distance(&Point::from(*other))
    }

    /// Manhattan distance between two locations
    pub fn manhattan_distance_to(&self, other: &Location) -> f64 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }
}

impl From<Location> for Point<f64> {
    fn from(location: Location) -> Self {
        Point::new(location.x, location.y)
    }
}
