//! Item catalog loading

use super::ConfigError;
use crate::inventory::{ItemCatalog, ItemDefinition, ItemKind};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ItemsConfig {
    items: Vec<ItemDefinition>,
}

fn validate(config: ItemsConfig) -> Result<ItemCatalog, ConfigError> {
    for item in &config.items {
        if item.max_stacks == 0 {
            return Err(ConfigError::ValidationError(format!(
                "item '{}' must allow at least one stack",
                item.id
            )));
        }
        if item.kind != ItemKind::Consumable && item.max_stacks > 1 {
            return Err(ConfigError::ValidationError(format!(
                "equipment '{}' cannot stack ({} stacks)",
                item.id, item.max_stacks
            )));
        }
        if item.kind.is_module() && item.module_slots > 0 {
            return Err(ConfigError::ValidationError(format!(
                "module '{}' cannot host modules",
                item.id
            )));
        }
        if let Some(stats) = item.kind.weapon_stats() {
            if stats.min_damage > stats.max_damage {
                return Err(ConfigError::ValidationError(format!(
                    "weapon '{}' has min damage {} above max {}",
                    item.id, stats.min_damage, stats.max_damage
                )));
            }
        }
    }
    Ok(config.items.into_iter().collect())
}

/// Load item definitions from a TOML file
pub fn load_items(path: &Path) -> Result<ItemCatalog, ConfigError> {
    validate(super::load_toml(path)?)
}

/// Load item definitions from a TOML string
pub fn parse_items(content: &str) -> Result<ItemCatalog, ConfigError> {
    validate(super::parse_toml(content)?)
}

/// Bundled item catalog
pub fn default_items() -> ItemCatalog {
    let toml = include_str!("../../config/items.toml");
    parse_items(toml).unwrap_or_else(|e| {
        tracing::warn!("bundled items failed to parse: {}", e);
        ItemCatalog::new()
    })
}
