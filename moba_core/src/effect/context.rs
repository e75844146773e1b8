//! Who caused an effect and where granted modifiers came from

use crate::types::{CharacterId, ItemId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Carried on every application and every change notification
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectContext {
    /// Character that caused the effect
    pub instigator: Option<CharacterId>,
    /// Character receiving the effect
    pub target: Option<CharacterId>,
    /// Ability the effect came from
    pub ability: Option<String>,
}

impl EffectContext {
    pub fn new(instigator: CharacterId, target: CharacterId) -> Self {
        EffectContext {
            instigator: Some(instigator),
            target: Some(target),
            ability: None,
        }
    }

    /// Context for a character affecting itself
    pub fn own(id: CharacterId) -> Self {
        Self::new(id, id)
    }

    pub fn with_ability(mut self, ability: impl Into<String>) -> Self {
        self.ability = Some(ability.into());
        self
    }
}

/// Handle used to revoke every persistent modifier a source granted
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrantSource {
    Item(ItemId),
    Ability(String),
}

impl fmt::Display for GrantSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GrantSource::Item(id) => write!(f, "{}", id),
            GrantSource::Ability(name) => write!(f, "ability:{}", name),
        }
    }
}
