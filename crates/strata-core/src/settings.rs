// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Configuration for the scheduler and the terrain grid.
//!
//! Both settings types load from RON text. Missing fields fall back to their
//! defaults, so a config file only needs to name what it overrides:
//!
//! ```
//! use strata_core::SchedulerSettings;
//!
//! let settings = SchedulerSettings::from_ron_str("(reclaim_delay_ticks: 5)").unwrap();
//! assert_eq!(settings.reclaim_delay_ticks, 5);
//! assert_eq!(settings.max_batch_size, 128);
//! ```

use crate::terrain::RegionGrid;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Settings that shape how the task scheduler batches and reclaims.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerSettings {
    /// The maximum number of tasks prepared and submitted in one tick.
    pub max_batch_size: usize,
    /// How many ticks a retired resource waits in the graveyard before it is destroyed.
    pub reclaim_delay_ticks: u64,
    /// Insert a barrier between tasks of one batch that share a borrowed owner.
    pub barrier_on_shared_owner: bool,
    /// How many ticks the state of a finished task stays queryable. States a
    /// queued task still depends on are kept regardless.
    pub state_retention_ticks: u64,
}

impl Default for SchedulerSettings {
    fn default() -> Self {
        Self {
            max_batch_size: 128,
            reclaim_delay_ticks: 3,
            barrier_on_shared_owner: true,
            state_retention_ticks: 64,
        }
    }
}

impl SchedulerSettings {
    /// Parses and validates settings from RON text.
    pub fn from_ron_str(text: &str) -> Result<Self, SettingsError> {
        let settings: Self =
            ron::from_str(text).map_err(|e| SettingsError::Parse(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Checks that every value is usable.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.max_batch_size == 0 {
            return Err(SettingsError::Invalid {
                field: "max_batch_size",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

/// Settings describing the region grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainSettings {
    /// The side length of a region, in pixels.
    pub region_size: u32,
    /// The world-space distance between two adjacent pixels.
    pub vertex_spacing: f32,
}

impl Default for TerrainSettings {
    fn default() -> Self {
        Self {
            region_size: 256,
            vertex_spacing: 1.0,
        }
    }
}

impl TerrainSettings {
    /// Parses and validates settings from RON text.
    pub fn from_ron_str(text: &str) -> Result<Self, SettingsError> {
        let settings: Self =
            ron::from_str(text).map_err(|e| SettingsError::Parse(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Checks that every value is usable.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.region_size == 0 {
            return Err(SettingsError::Invalid {
                field: "region_size",
                reason: "must be at least 1".to_string(),
            });
        }
        if !(self.vertex_spacing.is_finite() && self.vertex_spacing > 0.0) {
            return Err(SettingsError::Invalid {
                field: "vertex_spacing",
                reason: format!("must be a positive number, got {}", self.vertex_spacing),
            });
        }
        Ok(())
    }

    /// The grid mapping described by these settings.
    pub fn grid(&self) -> RegionGrid {
        RegionGrid::new(self.region_size, self.vertex_spacing)
    }
}

/// An error produced while loading settings.
#[derive(Debug, Clone, PartialEq)]
pub enum SettingsError {
    /// The text is not valid RON for the settings type.
    Parse(String),
    /// A value is out of range.
    Invalid {
        /// The offending field.
        field: &'static str,
        /// What is wrong with it.
        reason: String,
    },
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingsError::Parse(msg) => write!(f, "Failed to parse settings: {msg}"),
            SettingsError::Invalid { field, reason } => {
                write!(f, "Invalid setting '{field}': {reason}")
            }
        }
    }
}

impl std::error::Error for SettingsError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_struct_yields_defaults() {
        assert_eq!(
            SchedulerSettings::from_ron_str("()").unwrap(),
            SchedulerSettings::default()
        );
        assert_eq!(
            TerrainSettings::from_ron_str("()").unwrap(),
            TerrainSettings::default()
        );
    }

    #[test]
    fn overrides_are_applied() {
        let settings = TerrainSettings::from_ron_str("(region_size: 64, vertex_spacing: 0.5)")
            .unwrap();
        assert_eq!(settings.region_size, 64);
        assert_eq!(settings.grid(), RegionGrid::new(64, 0.5));
    }

    #[test]
    fn retention_can_be_shortened() {
        let settings = SchedulerSettings::from_ron_str("(state_retention_ticks: 0)").unwrap();
        assert_eq!(settings.state_retention_ticks, 0);
        assert_eq!(settings.reclaim_delay_ticks, 3);
    }

    #[test]
    fn zero_batch_size_is_rejected() {
        let err = SchedulerSettings::from_ron_str("(max_batch_size: 0)").unwrap_err();
        assert_eq!(
            err,
            SettingsError::Invalid {
                field: "max_batch_size",
                reason: "must be at least 1".to_string(),
            }
        );
    }

    #[test]
    fn negative_spacing_is_rejected() {
        let err = TerrainSettings::from_ron_str("(vertex_spacing: -1.0)").unwrap_err();
        assert!(matches!(err, SettingsError::Invalid { field: "vertex_spacing", .. }));
    }

    #[test]
    fn malformed_text_is_a_parse_error() {
        let err = SchedulerSettings::from_ron_str("(max_batch_size: \"lots\")").unwrap_err();
        assert!(matches!(err, SettingsError::Parse(_)));
    }
}
