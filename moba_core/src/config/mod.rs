//! Configuration loading from TOML files
//!
//! Every content file has a bundled default compiled into the crate and a
//! loader for overriding it from disk.

mod abilities;
mod constants;
mod effects;
mod items;
mod levels;

pub use abilities::{default_abilities, load_abilities, parse_abilities, AbilityBook};
pub use constants::{CombatConstants, GameConstants, InventoryConstants};
pub use effects::{default_effects, load_effects, parse_effects};
pub use items::{default_items, load_items, parse_items};
pub use levels::{default_levels, load_level_table, parse_level_table, LevelRow, LevelTable};

use crate::inventory::ItemKind;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

/// Configuration loading error
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Configuration validation error: {0}")]
    ValidationError(String),
}

/// Load a TOML file and deserialize it
pub fn load_toml<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: T = toml::from_str(&content)?;
    Ok(config)
}

/// Load a TOML string and deserialize it
pub fn parse_toml<T: serde::de::DeserializeOwned>(content: &str) -> Result<T, ConfigError> {
    let config: T = toml::from_str(content)?;
    Ok(config)
}

/// Every content table a match needs, shared between characters
#[derive(Debug, Clone)]
pub struct ContentPack {
    pub constants: GameConstants,
    pub levels: Arc<LevelTable>,
    pub abilities: Arc<AbilityBook>,
    pub effects: Arc<crate::effect::EffectRegistry>,
    pub items: Arc<crate::inventory::ItemCatalog>,
}

impl ContentPack {
    /// Content compiled into the crate
    pub fn defaults() -> Self {
        ContentPack {
            constants: GameConstants::bundled(),
            levels: Arc::new(default_levels()),
            abilities: Arc::new(default_abilities()),
            effects: Arc::new(default_effects()),
            items: Arc::new(default_items()),
        }
    }

    /// Load content from a directory, falling back to the bundled file for
    /// anything the directory does not provide
    pub fn load_dir(dir: &Path) -> Result<Self, ConfigError> {
        let mut pack = ContentPack::defaults();

        let path = dir.join("constants.toml");
        if path.exists() {
            pack.constants = load_toml(&path)?;
        }
        let path = dir.join("levels.toml");
        if path.exists() {
            pack.levels = Arc::new(load_level_table(&path)?);
        }
        let path = dir.join("abilities.toml");
        if path.exists() {
            pack.abilities = Arc::new(load_abilities(&path)?);
        }
        let path = dir.join("effects.toml");
        if path.exists() {
            pack.effects = Arc::new(load_effects(&path)?);
        }
        let path = dir.join("items.toml");
        if path.exists() {
            pack.items = Arc::new(load_items(&path)?);
        }

        pack.validate()?;
        tracing::info!(
            dir = %dir.display(),
            abilities = pack.abilities.len(),
            effects = pack.effects.len(),
            items = pack.items.len(),
            "content loaded"
        );
        Ok(pack)
    }

    /// Cross-file references must resolve
    pub fn validate(&self) -> Result<(), ConfigError> {
        for item in self.items.iter() {
            for granted in &item.granted_effects {
                let Some(effect) = self.effects.get(&granted.effect) else {
                    return Err(ConfigError::ValidationError(format!(
                        "item '{}' grants unknown effect '{}'",
                        item.id, granted.effect
                    )));
                };
                // Consumables are destroyed on use, leaving no source to revoke
                if item.kind == ItemKind::Consumable && effect.is_persistent() {
                    return Err(ConfigError::ValidationError(format!(
                        "consumable '{}' grants persistent effect '{}'",
                        item.id, granted.effect
                    )));
                }
            }
        }
        Ok(())
    }
}

impl Default for ContentPack {
    fn default() -> Self {
        Self::defaults()
    }
}
