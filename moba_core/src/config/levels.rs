//! Level table - experience required to advance from each level

use super::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// One row of the level table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelRow {
    pub level: u32,
    /// Experience needed to advance from `level` to `level + 1`
    pub experience: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct LevelsConfig {
    levels: Vec<LevelRow>,
}

/// Level → experience threshold lookup
#[derive(Debug, Clone, Default)]
pub struct LevelTable {
    rows: BTreeMap<u32, f64>,
}

impl LevelTable {
    pub fn new() -> Self {
        LevelTable {
            rows: BTreeMap::new(),
        }
    }

    pub fn from_rows(rows: impl IntoIterator<Item = LevelRow>) -> Self {
        LevelTable {
            rows: rows.into_iter().map(|r| (r.level, r.experience)).collect(),
        }
    }

    /// Threshold for the given level, if the table has a row for it
    pub fn lookup_xp_threshold(&self, level: u32) -> Option<f64> {
        self.rows.get(&level).copied()
    }

    /// Highest level with a row
    pub fn max_level(&self) -> Option<u32> {
        self.rows.keys().next_back().copied()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Total experience to go from level 1 to `level`
    pub fn total_experience_to(&self, level: u32) -> f64 {
        self.rows.range(..level).map(|(_, xp)| xp).sum()
    }
}

fn validate(config: LevelsConfig) -> Result<LevelTable, ConfigError> {
    for row in &config.levels {
        if row.level == 0 {
            return Err(ConfigError::ValidationError(
                "level rows start at 1".to_string(),
            ));
        }
        if row.experience <= 0.0 {
            return Err(ConfigError::ValidationError(format!(
                "level {} needs a positive experience threshold, got {}",
                row.level, row.experience
            )));
        }
    }
    Ok(LevelTable::from_rows(config.levels))
}

/// Load the level table from a TOML file
pub fn load_level_table(path: &Path) -> Result<LevelTable, ConfigError> {
    validate(super::load_toml(path)?)
}

/// Load the level table from a TOML string
pub fn parse_level_table(content: &str) -> Result<LevelTable, ConfigError> {
    validate(super::parse_toml(content)?)
}

/// Bundled level table
pub fn default_levels() -> LevelTable {
    let toml = include_str!("../../config/levels.toml");
    parse_level_table(toml).unwrap_or_else(|e| {
        tracing::warn!("bundled level table failed to parse: {}", e);
        LevelTable::new()
    })
}
