//! Ability configuration loading

use super::ConfigError;
use crate::damage::AbilityData;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Container for ability configurations
#[derive(Debug, Clone, Serialize, Deserialize)]
struct AbilitiesConfig {
    abilities: Vec<AbilityData>,
}

/// Every known ability by id
#[derive(Debug, Clone, Default)]
pub struct AbilityBook {
    abilities: HashMap<String, AbilityData>,
}

impl AbilityBook {
    pub fn new() -> Self {
        AbilityBook {
            abilities: HashMap::new(),
        }
    }

    pub fn register(&mut self, ability: AbilityData) {
        self.abilities.insert(ability.id.clone(), ability);
    }

    pub fn get(&self, id: &str) -> Option<&AbilityData> {
        self.abilities.get(id)
    }

    pub fn len(&self) -> usize {
        self.abilities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.abilities.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &AbilityData> {
        self.abilities.values()
    }

    /// The passive regeneration ability, if one is defined
    pub fn health_regen(&self) -> Option<&AbilityData> {
        self.abilities.values().find(|a| a.health_regen)
    }
}

impl FromIterator<AbilityData> for AbilityBook {
    fn from_iter<I: IntoIterator<Item = AbilityData>>(iter: I) -> Self {
        let mut book = AbilityBook::new();
        for ability in iter {
            book.register(ability);
        }
        book
    }
}

fn validate(config: AbilitiesConfig) -> Result<AbilityBook, ConfigError> {
    for ability in &config.abilities {
        if ability.range < 0.0 {
            return Err(ConfigError::ValidationError(format!(
                "ability '{}' has negative range {}",
                ability.id, ability.range
            )));
        }
        if ability.projectile_speed.is_some_and(|s| s <= 0.0) {
            return Err(ConfigError::ValidationError(format!(
                "ability '{}' needs a positive projectile speed",
                ability.id
            )));
        }
    }
    Ok(config.abilities.into_iter().collect())
}

/// Load ability configurations from a TOML file
pub fn load_abilities(path: &Path) -> Result<AbilityBook, ConfigError> {
    validate(super::load_toml(path)?)
}

/// Load ability configurations from a TOML string
pub fn parse_abilities(content: &str) -> Result<AbilityBook, ConfigError> {
    validate(super::parse_toml(content)?)
}

/// Get default ability configurations
pub fn default_abilities() -> AbilityBook {
    let toml = include_str!("../../config/abilities.toml");
    parse_abilities(toml).unwrap_or_else(|e| {
        tracing::warn!("bundled abilities failed to parse: {}", e);
        AbilityBook::from_iter([AbilityData::basic_attack()])
    })
}
