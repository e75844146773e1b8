//! Item definitions, runtime instances and equipment slots

use crate::attribute::Attribute;
use crate::effect::Modifier;
use crate::types::{CharacterId, ItemId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Equipment slot category
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum SlotType {
    Armor,
    BrainImplant,
    BodyImplant,
    MainHand,
    OffHand,
}

impl SlotType {
    pub fn is_hand(&self) -> bool {
        matches!(self, SlotType::MainHand | SlotType::OffHand)
    }
}

/// Numbers a weapon contributes to its hand's attributes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeaponStats {
    pub min_damage: f64,
    pub max_damage: f64,
    pub attack_speed: f64,
    pub attack_range: f64,
    /// Attacks travel as projectiles
    #[serde(default)]
    pub projectile: bool,
}

impl WeaponStats {
    /// Hand attributes this weapon sets while held in `slot`
    pub fn modifiers(&self, slot: SlotType) -> Vec<Modifier> {
        let (min, max, speed, range) = match slot {
            SlotType::OffHand => (
                Attribute::OffHandMinDamage,
                Attribute::OffHandMaxDamage,
                Attribute::OffHandAttackSpeed,
                Attribute::OffHandAttackRange,
            ),
            _ => (
                Attribute::MainHandMinDamage,
                Attribute::MainHandMaxDamage,
                Attribute::MainHandAttackSpeed,
                Attribute::MainHandAttackRange,
            ),
        };
        vec![
            Modifier::set(min, self.min_damage),
            Modifier::set(max, self.max_damage),
            Modifier::set(speed, self.attack_speed),
            Modifier::set(range, self.attack_range),
        ]
    }
}

/// What an item is, with kind-specific data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ItemKind {
    Consumable,
    Armor,
    BrainImplant,
    BodyImplant,
    OneHand(WeaponStats),
    TwoHand(WeaponStats),
    /// Off-hand focus item
    Source,
    ArmorModule,
    WeaponModule,
}

impl ItemKind {
    pub fn is_module(&self) -> bool {
        matches!(self, ItemKind::ArmorModule | ItemKind::WeaponModule)
    }

    pub fn is_weapon(&self) -> bool {
        matches!(self, ItemKind::OneHand(_) | ItemKind::TwoHand(_))
    }

    pub fn is_two_handed(&self) -> bool {
        matches!(self, ItemKind::TwoHand(_))
    }

    pub fn weapon_stats(&self) -> Option<&WeaponStats> {
        match self {
            ItemKind::OneHand(stats) | ItemKind::TwoHand(stats) => Some(stats),
            _ => None,
        }
    }

    /// Slots this kind may be equipped into (for modules, the host's slot)
    pub fn compatible_slots(&self) -> &'static [SlotType] {
        match self {
            ItemKind::Consumable => &[],
            ItemKind::Armor | ItemKind::ArmorModule => &[SlotType::Armor],
            ItemKind::BrainImplant => &[SlotType::BrainImplant],
            ItemKind::BodyImplant => &[SlotType::BodyImplant],
            ItemKind::OneHand(_) | ItemKind::WeaponModule => {
                &[SlotType::MainHand, SlotType::OffHand]
            }
            ItemKind::TwoHand(_) => &[SlotType::MainHand],
            ItemKind::Source => &[SlotType::OffHand],
        }
    }

    /// Whether a module of this kind can attach to a host of `host` kind
    pub fn accepts_host(&self, host: &ItemKind) -> bool {
        match self {
            ItemKind::WeaponModule => host.is_weapon(),
            ItemKind::ArmorModule => matches!(host, ItemKind::Armor),
            _ => false,
        }
    }
}

/// An effect an item grants while equipped
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrantedEffect {
    pub effect: String,
    #[serde(default = "default_effect_level")]
    pub level: u32,
}

fn default_effect_level() -> u32 {
    1
}

/// Class-level item data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemDefinition {
    pub id: String,
    pub name: String,
    pub kind: ItemKind,
    #[serde(default = "default_max_stacks")]
    pub max_stacks: u32,
    /// At most one instance per character
    #[serde(default)]
    pub unique: bool,
    /// How many modules this item can host
    #[serde(default)]
    pub module_slots: u32,
    #[serde(default)]
    pub granted_effects: Vec<GrantedEffect>,
}

fn default_max_stacks() -> u32 {
    1
}

/// Runtime item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemInstance {
    pub id: ItemId,
    /// Definition id
    pub class: String,
    pub stacks: u32,
    pub owner: Option<CharacterId>,
    /// Attached module instances
    #[serde(default)]
    pub modules: Vec<ItemInstance>,
}

impl ItemInstance {
    pub fn new(class: impl Into<String>, stacks: u32) -> Self {
        ItemInstance {
            id: ItemId::next(),
            class: class.into(),
            stacks,
            owner: None,
            modules: Vec::new(),
        }
    }

    /// This item and every attached module
    pub fn with_modules(&self) -> impl Iterator<Item = &ItemInstance> {
        std::iter::once(self).chain(self.modules.iter())
    }
}

/// All item definitions by id
#[derive(Debug, Clone, Default)]
pub struct ItemCatalog {
    items: HashMap<String, ItemDefinition>,
}

impl ItemCatalog {
    pub fn new() -> Self {
        ItemCatalog {
            items: HashMap::new(),
        }
    }

    pub fn register(&mut self, item: ItemDefinition) {
        self.items.insert(item.id.clone(), item);
    }

    pub fn get(&self, id: &str) -> Option<&ItemDefinition> {
        self.items.get(id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ItemDefinition> {
        self.items.values()
    }

    /// Catalog loaded from the bundled items file
    pub fn with_defaults() -> Self {
        crate::config::default_items()
    }
}

impl FromIterator<ItemDefinition> for ItemCatalog {
    fn from_iter<I: IntoIterator<Item = ItemDefinition>>(iter: I) -> Self {
        let mut catalog = ItemCatalog::new();
        for item in iter {
            catalog.register(item);
        }
        catalog
    }
}
