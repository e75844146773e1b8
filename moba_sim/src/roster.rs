//! Roster - character templates loaded from TOML

use moba_core::attribute::{Attribute, AttributeSet};
use moba_core::config::{self, ConfigError, ContentPack};
use moba_core::damage::AbilityData;
use moba_core::inventory::{InventoryError, SlotType};
use moba_core::types::CharacterId;
use moba_core::Character;
use glam::DVec3;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RosterError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("character '{character}' uses unknown ability '{ability}'")]
    UnknownAbility { character: String, ability: String },
    #[error("character '{character}' sets unknown attribute '{attribute}'")]
    UnknownAttribute { character: String, attribute: String },
    #[error("character '{character}' cannot take '{item}': {source}")]
    Item {
        character: String,
        item: String,
        source: InventoryError,
    },
    #[error("roster needs at least two characters, found {0}")]
    TooFewCharacters(usize),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EquipEntry {
    pub item: String,
    pub slot: SlotType,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StackEntry {
    pub item: String,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

fn default_quantity() -> u32 {
    1
}

/// One character as authored in the roster file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CharacterTemplate {
    pub name: String,
    pub abilities: Vec<String>,
    /// Base value overrides keyed by snake_case attribute name
    #[serde(default)]
    pub attributes: BTreeMap<String, f64>,
    /// Equipped in order, so modules follow their host
    #[serde(default)]
    pub equipment: Vec<EquipEntry>,
    #[serde(default)]
    pub inventory: Vec<StackEntry>,
    #[serde(default)]
    pub position: [f64; 3],
}

impl CharacterTemplate {
    /// Build the character and resolve its ability list
    pub fn build(
        &self,
        id: CharacterId,
        content: &ContentPack,
    ) -> Result<(Character, Vec<AbilityData>), RosterError> {
        let overrides = self
            .attributes
            .iter()
            .map(|(name, value)| {
                Attribute::from_str(name)
                    .map(|attribute| (attribute, *value))
                    .map_err(|_| RosterError::UnknownAttribute {
                        character: self.name.clone(),
                        attribute: name.clone(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        let attributes = AttributeSet::builder(content.levels.clone())
            .bases(overrides)
            .build();
        let mut character = Character::with_attributes(id, self.name.clone(), attributes, content);
        character.position = DVec3::from_array(self.position);

        for entry in &self.equipment {
            character
                .give_and_equip(&entry.item, entry.slot)
                .map_err(|source| self.item_error(&entry.item, source))?;
        }
        for entry in &self.inventory {
            character
                .add_item(&entry.item, entry.quantity)
                .map_err(|source| self.item_error(&entry.item, source))?;
        }

        let abilities = self
            .abilities
            .iter()
            .map(|id| {
                content
                    .abilities
                    .get(id)
                    .cloned()
                    .ok_or_else(|| RosterError::UnknownAbility {
                        character: self.name.clone(),
                        ability: id.clone(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok((character, abilities))
    }

    fn item_error(&self, item: &str, source: InventoryError) -> RosterError {
        RosterError::Item {
            character: self.name.clone(),
            item: item.to_string(),
            source,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Roster {
    pub characters: Vec<CharacterTemplate>,
}

fn validate(roster: Roster) -> Result<Roster, RosterError> {
    if roster.characters.len() < 2 {
        return Err(RosterError::TooFewCharacters(roster.characters.len()));
    }
    Ok(roster)
}

pub fn load_roster(path: &Path) -> Result<Roster, RosterError> {
    validate(config::load_toml(path)?)
}

pub fn parse_roster(content: &str) -> Result<Roster, RosterError> {
    validate(config::parse_toml(content)?)
}

/// Bundled two-character roster
pub fn default_roster() -> Result<Roster, RosterError> {
    parse_roster(include_str!("../content/roster.toml"))
}
