// Dispatch configuration loaded from JSON

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::algorithms::DispatchStrategy;
use crate::error::DispatchError;
use crate::models::validate_capacity;

/// Caller-side settings for a delivery system
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DispatchConfig {
    /// Strategy used when none is given explicitly
    pub strategy: DispatchStrategy,

    /// Capacity given to couriers registered without one
    pub default_capacity: usize,

    /// Connect every pair of nodes when building the network
    pub fully_connected: bool,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            strategy: DispatchStrategy::Greedy,
            default_capacity: 1,
            fully_connected: true,
        }
    }
}

impl DispatchConfig {
    /// Parses and validates a JSON document
    pub fn from_json_str(json: &str) -> Result<Self, DispatchError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, DispatchError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| DispatchError::ReadConfig {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<(), DispatchError> {
        validate_capacity(self.default_capacity)
    }
}
