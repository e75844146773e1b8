//! Effect definitions and the registry that holds them

use super::{Modifier, ModifierOp};
use crate::attribute::Attribute;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Lifetime of an effect
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectDuration {
    /// Changes base values once
    #[default]
    Instant,
    /// Persists until revoked by its source
    Infinite,
}

/// Modifier template with a per-level scaling term
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModifierDef {
    pub attribute: Attribute,
    #[serde(default)]
    pub op: ModifierOp,
    pub magnitude: f64,
    /// Added once for every level above 1
    #[serde(default)]
    pub per_level: f64,
}

impl ModifierDef {
    pub fn at_level(&self, level: u32) -> Modifier {
        let steps = level.saturating_sub(1) as f64;
        Modifier {
            attribute: self.attribute,
            op: self.op,
            magnitude: self.magnitude + self.per_level * steps,
        }
    }
}

/// A named bundle of modifiers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EffectDefinition {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub duration: EffectDuration,
    #[serde(default)]
    pub modifiers: Vec<ModifierDef>,
}

impl EffectDefinition {
    /// Concrete modifiers for the given effect level
    pub fn modifiers_at(&self, level: u32) -> Vec<Modifier> {
        self.modifiers.iter().map(|m| m.at_level(level)).collect()
    }

    pub fn is_persistent(&self) -> bool {
        self.duration == EffectDuration::Infinite
    }
}

/// Registry of all known effects
#[derive(Debug, Clone, Default)]
pub struct EffectRegistry {
    /// Mapping from effect ID to definition
    effects: HashMap<String, EffectDefinition>,
}

impl EffectRegistry {
    pub fn new() -> Self {
        EffectRegistry {
            effects: HashMap::new(),
        }
    }

    pub fn register(&mut self, effect: EffectDefinition) {
        self.effects.insert(effect.id.clone(), effect);
    }

    pub fn get(&self, id: &str) -> Option<&EffectDefinition> {
        self.effects.get(id)
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    /// Registry loaded from the bundled effects file
    pub fn with_defaults() -> Self {
        crate::config::default_effects()
    }
}

impl FromIterator<EffectDefinition> for EffectRegistry {
    fn from_iter<I: IntoIterator<Item = EffectDefinition>>(iter: I) -> Self {
        let mut registry = EffectRegistry::new();
        for effect in iter {
            registry.register(effect);
        }
        registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_per_level_scaling() {
        let def = ModifierDef {
            attribute: Attribute::AttackPower,
            op: ModifierOp::Additive,
            magnitude: 10.0,
            per_level: 2.5,
        };
        assert!((def.at_level(1).magnitude - 10.0).abs() < f64::EPSILON);
        assert!((def.at_level(5).magnitude - 20.0).abs() < f64::EPSILON);
        assert!((def.at_level(0).magnitude - 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_registry_roundtrip() {
        let mut registry = EffectRegistry::new();
        registry.register(EffectDefinition {
            id: "plating".to_string(),
            name: "Plating".to_string(),
            duration: EffectDuration::Infinite,
            modifiers: vec![],
        });
        assert_eq!(registry.len(), 1);
        assert!(registry.get("plating").unwrap().is_persistent());
        assert!(registry.get("missing").is_none());
    }
}
