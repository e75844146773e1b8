//! Effect configuration loading

use super::ConfigError;
use crate::effect::{EffectDefinition, EffectRegistry};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct EffectsConfig {
    effects: Vec<EffectDefinition>,
}

fn validate(config: EffectsConfig) -> Result<EffectRegistry, ConfigError> {
    for effect in &config.effects {
        if effect.modifiers.is_empty() {
            return Err(ConfigError::ValidationError(format!(
                "effect '{}' has no modifiers",
                effect.id
            )));
        }
    }
    Ok(config.effects.into_iter().collect())
}

/// Load effect definitions from a TOML file
pub fn load_effects(path: &Path) -> Result<EffectRegistry, ConfigError> {
    validate(super::load_toml(path)?)
}

/// Load effect definitions from a TOML string
pub fn parse_effects(content: &str) -> Result<EffectRegistry, ConfigError> {
    validate(super::parse_toml(content)?)
}

/// Bundled effect definitions
pub fn default_effects() -> EffectRegistry {
    let toml = include_str!("../../config/effects.toml");
    parse_effects(toml).unwrap_or_else(|e| {
        tracing::warn!("bundled effects failed to parse: {}", e);
        EffectRegistry::new()
    })
}
