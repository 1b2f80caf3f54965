// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Construction-time tunables for worlds and broad phases.

use std::path::Path;

use impel_geom::{QuadTreeConfig, QuadTreeConfigError};
use impel_math::{Scalar, Vec2};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// World tunables.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Gravity acceleration in m/s².
    pub gravity: [f32; 2],
    /// Manifold entries reserved up front.
    pub manifold_capacity: usize,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self { gravity: [0.0, -9.81], manifold_capacity: 1000 }
    }
}

impl WorldConfig {
    /// Gravity on the given scalar lane.
    pub fn gravity<S: Scalar>(&self) -> Vec2<S> {
        Vec2::from_f32(self.gravity[0], self.gravity[1])
    }

    /// Checks the values.
    ///
    /// # Errors
    /// [`ConfigError::Gravity`] when a gravity component is not finite.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.gravity.iter().all(|g| g.is_finite()) {
            Ok(())
        } else {
            Err(ConfigError::Gravity(self.gravity))
        }
    }
}

/// Everything needed to stand up a simulation: world plus broad phase.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// World tunables.
    pub world: WorldConfig,
    /// Quadtree shape.
    pub quadtree: QuadTreeConfig,
}

impl SimConfig {
    /// Parses JSON; absent fields keep their defaults.
    ///
    /// # Errors
    /// Malformed JSON or out-of-range values.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses a JSON file.
    ///
    /// # Errors
    /// I/O failure, malformed JSON, or out-of-range values.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Pretty-printed JSON.
    ///
    /// # Errors
    /// Serialization failure.
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Checks both halves.
    ///
    /// # Errors
    /// The first invalid value found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.world.validate()?;
        self.quadtree.validate()?;
        Ok(())
    }
}

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O error while reading.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// Deserialization failure.
    #[error("serde error: {0}")]
    Serde(#[from] serde_json::Error),
    /// Quadtree limits out of range.
    #[error(transparent)]
    QuadTree(#[from] QuadTreeConfigError),
    /// Gravity is not finite.
    #[error("gravity must be finite, got {0:?}")]
    Gravity([f32; 2]),
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)]
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg = SimConfig::from_json(r#"{ "world": { "gravity": [0.0, 9.81] } }"#).expect("valid json");
        assert_eq!(cfg.world.gravity, [0.0, 9.81]);
        assert_eq!(cfg.world.manifold_capacity, 1000);
        assert_eq!(cfg.quadtree, QuadTreeConfig::default());
    }

    #[test]
    fn invalid_quadtree_is_rejected() {
        let err = SimConfig::from_json(r#"{ "quadtree": { "max_depth": 0 } }"#);
        assert!(matches!(err, Err(ConfigError::QuadTree(QuadTreeConfigError::ZeroDepth))));
        assert!(matches!(SimConfig::from_json("{"), Err(ConfigError::Serde(_))));
    }

    #[test]
    fn round_trips_through_json() {
        let cfg = SimConfig::default();
        let text = cfg.to_json().expect("serializable");
        assert_eq!(SimConfig::from_json(&text).expect("parses"), cfg);
    }
}
