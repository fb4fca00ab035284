//! Engine configuration, loadable from JSON.

use anyhow::{Context, Result};
use camino::Utf8Path;
use serde::{Deserialize, Serialize};

use crate::history::DEFAULT_HISTORY_LIMIT;
use crate::model::StrokeStyle;
use crate::viewport::{DEFAULT_BASE_CELL_SIZE, DEFAULT_MIN_GRID_EXTENT};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Cell edge length in canvas pixels at 100% zoom.
    pub base_cell_size: f32,
    /// Maximum number of retained history snapshots.
    pub history_limit: usize,
    /// Lower bound of the paintable half-extent, in cells.
    pub min_grid_extent: i32,
    /// Salt for the per-edge density draw.
    pub density_seed: u64,
    /// Initial zoom percentage.
    pub zoom_percent: f32,
    pub style: StrokeStyle,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            base_cell_size: DEFAULT_BASE_CELL_SIZE,
            history_limit: DEFAULT_HISTORY_LIMIT,
            min_grid_extent: DEFAULT_MIN_GRID_EXTENT,
            density_seed: 0,
            zoom_percent: 100.0,
            style: StrokeStyle::default(),
        }
    }
}

impl EngineConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let cfg: EngineConfig =
            serde_json::from_str(json).context("Failed to parse engine configuration")?;
        Ok(cfg)
    }

    pub fn from_json_file(path: &Utf8Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).with_context(|| format!("Open {}", path))?;
        Self::from_json_str(&text).with_context(|| format!("Invalid configuration in {}", path))
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
