//! Character - an attribute set and a loadout under one identity

use crate::attribute::{Attribute, AttributeSet};
use crate::combat::{attack_cooldown, resolve_effect, CombatResult};
use crate::config::{CombatConstants, ContentPack};
use crate::damage::{AbilityData, EffectSpec};
use crate::effect::{EffectContext, Modifier};
use crate::inventory::{InventoryError, Loadout, SlotType};
use crate::types::{CharacterId, ItemId};
use glam::DVec3;
use rand::Rng;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct Character {
    pub id: CharacterId,
    pub name: String,
    pub attributes: AttributeSet,
    pub loadout: Loadout,
    pub position: DVec3,
}

impl Character {
    /// A character at default attribute values
    pub fn new(id: CharacterId, name: impl Into<String>, content: &ContentPack) -> Self {
        Self::with_attributes(id, name, AttributeSet::new(content.levels.clone()), content)
    }

    pub fn with_attributes(
        id: CharacterId,
        name: impl Into<String>,
        attributes: AttributeSet,
        content: &ContentPack,
    ) -> Self {
        Character {
            id,
            name: name.into(),
            attributes,
            loadout: Loadout::new(
                id,
                content.constants.inventory.capacity,
                content.items.clone(),
                content.effects.clone(),
            ),
            position: DVec3::ZERO,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.attributes.is_alive()
    }

    pub fn get(&self, attribute: Attribute) -> f64 {
        self.attributes.get(attribute)
    }

    // === Combat ===

    /// Snapshot this character as the source of an ability aimed at `target`
    pub fn create_spec(
        &self,
        ability: &AbilityData,
        target: CharacterId,
        rng: &mut impl Rng,
    ) -> EffectSpec {
        EffectSpec::new(
            ability,
            &self.attributes,
            EffectContext::new(self.id, target),
            rng,
        )
    }

    /// Resolve an incoming spec against this character
    pub fn receive(&mut self, spec: &EffectSpec) -> CombatResult {
        resolve_effect(spec, &mut self.attributes)
    }

    /// Apply one regeneration period of the passive regen ability to self
    pub fn tick_regen(&mut self, ability: &AbilityData, rng: &mut impl Rng) -> CombatResult {
        let spec = self.create_spec(ability, self.id, rng);
        self.receive(&spec)
    }

    /// Seconds before `ability` can fire again
    pub fn cooldown_for(&self, ability: &AbilityData, constants: &CombatConstants) -> f64 {
        if ability.is_attack() {
            attack_cooldown(ability.weapon_damage_type, &self.attributes, constants)
        } else {
            ability.cooldown
        }
    }

    pub fn can_afford(&self, ability: &AbilityData) -> bool {
        self.get(Attribute::Mana) >= ability.mana_cost
    }

    /// Deduct an ability's mana cost; false when there is not enough mana
    pub fn spend_mana(&mut self, ability: &AbilityData) -> bool {
        if !self.can_afford(ability) {
            return false;
        }
        if ability.mana_cost > 0.0 {
            let ctx = EffectContext::own(self.id).with_ability(ability.id.clone());
            self.attributes
                .apply_modifier(&Modifier::add(Attribute::Mana, -ability.mana_cost), &ctx);
        }
        true
    }

    /// Restore mana for one regeneration period
    pub fn tick_mana(&mut self, periods: f64) {
        let amount = self.get(Attribute::ManaRegen) * periods;
        if amount > 0.0 {
            self.attributes.apply_modifier(
                &Modifier::add(Attribute::Mana, amount),
                &EffectContext::own(self.id),
            );
        }
    }

    // === Items ===

    pub fn add_item(&mut self, class: &str, quantity: u32) -> Result<Vec<ItemId>, InventoryError> {
        self.loadout.add_item(class, quantity, None)
    }

    pub fn equip(&mut self, slot: SlotType, id: ItemId) -> Result<(), InventoryError> {
        self.loadout.equip(slot, id, &mut self.attributes)
    }

    pub fn unequip(&mut self, slot: SlotType) -> Result<ItemId, InventoryError> {
        self.loadout.unequip(slot, &mut self.attributes)
    }

    pub fn swap_equipment(&mut self, a: ItemId, b: ItemId) -> Result<(), InventoryError> {
        self.loadout.swap_equipment(a, b, &mut self.attributes)
    }

    pub fn consume(&mut self, id: ItemId) -> Result<(), InventoryError> {
        self.loadout.consume(id, &mut self.attributes)
    }

    /// Add one of a class and equip it straight away
    pub fn give_and_equip(&mut self, class: &str, slot: SlotType) -> Result<ItemId, InventoryError> {
        let ids = self.add_item(class, 1)?;
        let id = ids.first().copied().ok_or(InventoryError::DoesNotExist)?;
        self.equip(slot, id)?;
        debug!(character = %self.id, class, %slot, "outfitted");
        Ok(id)
    }
}
