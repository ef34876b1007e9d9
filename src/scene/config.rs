//! Campsite configuration: every behavior's declared options plus the seed

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::error::Error;
use crate::core::types::Result;
use crate::interaction::{BoundaryConfig, ProximityConfig};
use crate::lighting::FlickerConfig;

/// Configuration for a campsite scene.
///
/// Missing fields fall back to the defaults, so `{}` is a valid file.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Seed for trees and mountains. `None` draws from entropy.
    pub seed: Option<u64>,
    pub flicker: FlickerConfig,
    pub boundary: BoundaryConfig,
    pub proximity: ProximityConfig,
}

impl SceneConfig {
    /// Parse and validate a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Save to file as pretty JSON
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Reject values no behavior can work with.
    pub fn validate(&self) -> Result<()> {
        check_positive("flicker.speed", self.flicker.speed)?;
        check_finite("flicker.base_intensity", self.flicker.base_intensity)?;
        check_positive("boundary.max_radius", self.boundary.max_radius)?;
        check_positive("proximity.distance", self.proximity.distance)?;
        Ok(())
    }
}

fn check_finite(field: &str, value: f32) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(Error::InvalidConfig(format!("{field} must be finite, got {value}")))
    }
}

fn check_positive(field: &str, value: f32) -> Result<()> {
    check_finite(field, value)?;
    if value > 0.0 {
        Ok(())
    } else {
        Err(Error::InvalidConfig(format!("{field} must be positive, got {value}")))
    }
}
