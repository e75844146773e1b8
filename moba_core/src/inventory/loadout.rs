//! Loadout - inventory plus equipped slots for one character
//!
//! Every operation checks all of its preconditions before touching any state,
//! so an `Err` means nothing moved. Each successful mutation broadcasts one
//! [`LoadoutChanged`] describing every slot it touched.

use super::error::InventoryError;
use super::item::{ItemCatalog, ItemDefinition, ItemInstance, ItemKind, SlotType};
use super::storage::Inventory;
use crate::effect::{EffectContext, EffectRegistry, EffectTarget, GrantSource};
use crate::events::Broadcaster;
use crate::types::{CharacterId, ItemId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use tokio::sync::broadcast::Receiver;
use tracing::{debug, warn};

/// Summary of the item now occupying a slot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemRef {
    pub id: ItemId,
    pub class: String,
    pub stacks: u32,
    pub modules: Vec<ItemId>,
}

impl From<&ItemInstance> for ItemRef {
    fn from(item: &ItemInstance) -> Self {
        ItemRef {
            id: item.id,
            class: item.class.clone(),
            stacks: item.stacks,
            modules: item.modules.iter().map(|m| m.id).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventorySlotChange {
    pub index: usize,
    pub item: Option<ItemRef>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquipmentSlotChange {
    pub slot: SlotType,
    pub item: Option<ItemRef>,
}

/// One notification per successful operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadoutChanged {
    pub owner: CharacterId,
    pub inventory: Vec<InventorySlotChange>,
    pub equipment: Vec<EquipmentSlotChange>,
}

#[derive(Debug, Default)]
struct Touched {
    indices: BTreeSet<usize>,
    slots: BTreeSet<SlotType>,
}

impl Touched {
    fn index(&mut self, index: usize) {
        self.indices.insert(index);
    }

    fn slot(&mut self, slot: SlotType) {
        self.slots.insert(slot);
    }
}

/// A character's items
#[derive(Debug, Clone)]
pub struct Loadout {
    owner: CharacterId,
    inventory: Inventory,
    equipped: BTreeMap<SlotType, ItemInstance>,
    catalog: Arc<ItemCatalog>,
    effects: Arc<EffectRegistry>,
    events: Broadcaster<LoadoutChanged>,
}

impl Loadout {
    pub fn new(
        owner: CharacterId,
        capacity: usize,
        catalog: Arc<ItemCatalog>,
        effects: Arc<EffectRegistry>,
    ) -> Self {
        Loadout {
            owner,
            inventory: Inventory::new(capacity),
            equipped: BTreeMap::new(),
            catalog,
            effects,
            events: Broadcaster::new(),
        }
    }

    // === Reads ===

    pub fn owner(&self) -> CharacterId {
        self.owner
    }

    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    pub fn equipped(&self, slot: SlotType) -> Option<&ItemInstance> {
        self.equipped.get(&slot)
    }

    pub fn equipped_items(&self) -> impl Iterator<Item = (SlotType, &ItemInstance)> {
        self.equipped.iter().map(|(slot, item)| (*slot, item))
    }

    pub fn catalog(&self) -> &ItemCatalog {
        &self.catalog
    }

    /// Slot an item is equipped in (top-level items only)
    pub fn slot_of(&self, id: ItemId) -> Option<SlotType> {
        self.equipped
            .iter()
            .find(|(_, item)| item.id == id)
            .map(|(slot, _)| *slot)
    }

    /// Whether any owned item or module is of this class
    pub fn contains_class(&self, class: &str) -> bool {
        self.inventory
            .items()
            .map(|(_, item)| item)
            .chain(self.equipped.values())
            .any(|item| item.with_modules().any(|piece| piece.class == class))
    }

    /// Whether the main hand holds a two-handed weapon
    pub fn holds_two_hander(&self) -> bool {
        self.equipped
            .get(&SlotType::MainHand)
            .and_then(|item| self.catalog.get(&item.class))
            .is_some_and(|def| def.kind.is_two_handed())
    }

    pub fn subscribe(&self) -> Receiver<LoadoutChanged> {
        self.events.subscribe()
    }

    // === Inventory ===

    /// Add `quantity` of a class, topping up existing stacks first
    ///
    /// Existing stacks fill lowest index first, then new stacks open in the
    /// lowest empty slots. `existing` is reused as the first new stack and
    /// must be of the same class. Returns the ids of newly placed instances.
    pub fn add_item(
        &mut self,
        class: &str,
        quantity: u32,
        existing: Option<ItemInstance>,
    ) -> Result<Vec<ItemId>, InventoryError> {
        let catalog = Arc::clone(&self.catalog);
        let def = catalog.get(class).ok_or(InventoryError::DoesNotExist)?;
        if existing.as_ref().is_some_and(|item| item.class != class) {
            return Err(InventoryError::DoesNotExist);
        }
        if quantity == 0 {
            return Ok(Vec::new());
        }
        if def.unique && self.contains_class(class) {
            return Err(InventoryError::Unique);
        }

        let max = def.max_stacks.max(1);
        let mut remaining = quantity;
        let mut top_ups = Vec::new();
        for (index, item) in self.inventory.items() {
            if remaining == 0 {
                break;
            }
            if item.class == class && item.stacks < max {
                let add = (max - item.stacks).min(remaining);
                top_ups.push((index, add));
                remaining -= add;
            }
        }

        let new_stacks = remaining.div_ceil(max) as usize;
        if def.unique && new_stacks > 1 {
            return Err(InventoryError::Unique);
        }
        if new_stacks > self.inventory.empty_count() {
            debug!(class, quantity, new_stacks, "add refused, inventory full");
            return Err(InventoryError::InventoryFull);
        }

        let mut touched = Touched::default();
        for (index, add) in top_ups {
            if let Some(item) = self.inventory.get_mut(index) {
                item.stacks += add;
                touched.index(index);
            }
        }

        let mut existing = existing;
        let mut created = Vec::with_capacity(new_stacks);
        while remaining > 0 {
            let stacks = remaining.min(max);
            remaining -= stacks;
            let mut item = existing
                .take()
                .unwrap_or_else(|| ItemInstance::new(class, stacks));
            item.stacks = stacks;
            item.owner = Some(self.owner);
            created.push(item.id);
            let index = self
                .inventory
                .put_first_empty(item)
                .map_err(|_| InventoryError::InventoryFull)?;
            touched.index(index);
        }

        debug!(owner = %self.owner, class, quantity, "added items");
        self.emit(touched);
        Ok(created)
    }

    /// Remove `stacks` from an inventory item
    ///
    /// Removing the whole stack clears the slot and hands the instance back,
    /// unless `delete` is set or the item is a consumable.
    pub fn remove_item(
        &mut self,
        id: ItemId,
        delete: bool,
        stacks: u32,
    ) -> Result<Option<ItemInstance>, InventoryError> {
        let index = self.inventory.find(id).ok_or(InventoryError::DoesNotExist)?;
        if stacks == 0 {
            return Ok(None);
        }

        let mut touched = Touched::default();
        touched.index(index);
        let item = self.inventory.get_mut(index).ok_or(InventoryError::DoesNotExist)?;
        if stacks < item.stacks {
            item.stacks -= stacks;
            self.emit(touched);
            return Ok(None);
        }

        let item = self.inventory.take(index).ok_or(InventoryError::DoesNotExist)?;
        let consumable = self
            .catalog
            .get(&item.class)
            .is_some_and(|def| def.kind == ItemKind::Consumable);
        debug!(owner = %self.owner, item = %item.id, class = %item.class, "removed item");
        self.emit(touched);
        if delete || consumable {
            Ok(None)
        } else {
            Ok(Some(item))
        }
    }

    /// Use one stack of a consumable
    ///
    /// Its effects apply once as instants whatever their declared duration,
    /// since the spent stack is gone and cannot be revoked later.
    pub fn consume(
        &mut self,
        id: ItemId,
        target: &mut impl EffectTarget,
    ) -> Result<(), InventoryError> {
        let index = self.inventory.find(id).ok_or(InventoryError::DoesNotExist)?;
        let def = self.definition_at(index)?;
        if def.kind != ItemKind::Consumable {
            return Err(InventoryError::InvalidEquipment);
        }

        let ctx = EffectContext::own(self.owner);
        for granted in &def.granted_effects {
            match self.effects.get(&granted.effect) {
                Some(effect) => target.apply_effect(effect, granted.level, &ctx),
                None => warn!(item = %def.id, effect = %granted.effect, "unknown effect on item"),
            }
        }
        self.remove_item(id, true, 1).map(|_| ())
    }

    // === Equipment ===

    /// Equip an inventory item into `slot`, granting its effects to `target`
    ///
    /// Anything the item displaces goes back to the inventory; if there is
    /// not room for all of it the call fails with nothing moved. Modules
    /// attach to the item already in `slot`.
    pub fn equip(
        &mut self,
        slot: SlotType,
        id: ItemId,
        target: &mut impl EffectTarget,
    ) -> Result<(), InventoryError> {
        let index = self.inventory.find(id).ok_or(InventoryError::DoesNotExist)?;
        let def = self.definition_at(index)?;
        if def.kind == ItemKind::Consumable {
            return Err(InventoryError::InvalidEquipment);
        }
        if !def.kind.compatible_slots().contains(&slot) {
            return Err(InventoryError::WrongSlot);
        }
        if def.kind.is_module() {
            return self.attach_module(slot, index, &def.kind, target);
        }

        let mut displaced = Vec::new();
        if self.equipped.contains_key(&slot) {
            displaced.push(slot);
        }
        if def.kind.is_two_handed() && self.equipped.contains_key(&SlotType::OffHand) {
            displaced.push(SlotType::OffHand);
        }
        if slot == SlotType::OffHand && self.holds_two_hander() {
            displaced.push(SlotType::MainHand);
        }
        // The equipped item frees its own slot
        if displaced.len() > self.inventory.empty_count() + 1 {
            debug!(owner = %self.owner, %slot, displaced = displaced.len(), "equip refused, inventory full");
            return Err(InventoryError::InventoryFull);
        }

        let mut touched = Touched::default();
        let mut item = self.inventory.take(index).ok_or(InventoryError::DoesNotExist)?;
        touched.index(index);
        for vacated in displaced {
            if let Some(old) = self.equipped.remove(&vacated) {
                self.revoke_item(&old, target);
                touched.slot(vacated);
                touched.index(self.stow(old)?);
            }
        }

        item.owner = Some(self.owner);
        self.grant_item(&item, slot, target);
        debug!(owner = %self.owner, item = %item.id, class = %item.class, %slot, "equipped");
        self.equipped.insert(slot, item);
        touched.slot(slot);
        self.emit(touched);
        Ok(())
    }

    /// Return the item in `slot` to the inventory, revoking its effects
    pub fn unequip(
        &mut self,
        slot: SlotType,
        target: &mut impl EffectTarget,
    ) -> Result<ItemId, InventoryError> {
        if !self.equipped.contains_key(&slot) {
            return Err(InventoryError::DoesNotExist);
        }
        let dest = self.inventory.first_empty().ok_or(InventoryError::InventoryFull)?;
        let item = self.equipped.remove(&slot).ok_or(InventoryError::DoesNotExist)?;

        let id = item.id;
        self.revoke_item(&item, target);
        self.inventory
            .put(dest, item)
            .map_err(|_| InventoryError::InventoryFull)?;

        debug!(owner = %self.owner, item = %id, %slot, "unequipped");
        let mut touched = Touched::default();
        touched.index(dest);
        touched.slot(slot);
        self.emit(touched);
        Ok(id)
    }

    /// Exchange an equipped item with an inventory item of the same slot
    ///
    /// Exactly one of the two must be equipped. The outgoing item takes the
    /// incoming item's inventory slot.
    pub fn swap_equipment(
        &mut self,
        a: ItemId,
        b: ItemId,
        target: &mut impl EffectTarget,
    ) -> Result<(), InventoryError> {
        let (slot, index) = match (
            self.slot_of(a),
            self.slot_of(b),
            self.inventory.find(a),
            self.inventory.find(b),
        ) {
            (Some(slot), None, _, Some(index)) | (None, Some(slot), Some(index), _) => {
                (slot, index)
            }
            (Some(_), Some(_), _, _) | (None, None, Some(_), Some(_)) => {
                return Err(InventoryError::InvalidEquipment)
            }
            _ => return Err(InventoryError::DoesNotExist),
        };

        let def = self.definition_at(index)?;
        if def.kind == ItemKind::Consumable || def.kind.is_module() {
            return Err(InventoryError::InvalidEquipment);
        }
        if !def.kind.compatible_slots().contains(&slot) {
            return Err(InventoryError::WrongSlot);
        }

        let mut extra = Vec::new();
        if def.kind.is_two_handed() && self.equipped.contains_key(&SlotType::OffHand) {
            extra.push(SlotType::OffHand);
        }
        if extra.len() > self.inventory.empty_count() {
            return Err(InventoryError::InventoryFull);
        }

        let mut touched = Touched::default();
        let outgoing = self.equipped.remove(&slot).ok_or(InventoryError::DoesNotExist)?;
        let Some(mut incoming) = self.inventory.take(index) else {
            self.equipped.insert(slot, outgoing);
            return Err(InventoryError::DoesNotExist);
        };

        self.revoke_item(&outgoing, target);
        self.inventory
            .put(index, outgoing)
            .map_err(|_| InventoryError::InventoryFull)?;
        touched.index(index);
        for vacated in extra {
            if let Some(old) = self.equipped.remove(&vacated) {
                self.revoke_item(&old, target);
                touched.slot(vacated);
                touched.index(self.stow(old)?);
            }
        }

        incoming.owner = Some(self.owner);
        self.grant_item(&incoming, slot, target);
        debug!(owner = %self.owner, item = %incoming.id, %slot, "swapped in");
        self.equipped.insert(slot, incoming);
        touched.slot(slot);
        self.emit(touched);
        Ok(())
    }

    /// Move a module off its host in `slot` into the inventory
    pub fn detach_module(
        &mut self,
        slot: SlotType,
        module: ItemId,
        target: &mut impl EffectTarget,
    ) -> Result<ItemId, InventoryError> {
        let position = self
            .equipped
            .get(&slot)
            .and_then(|host| host.modules.iter().position(|m| m.id == module))
            .ok_or(InventoryError::DoesNotExist)?;
        let dest = self.inventory.first_empty().ok_or(InventoryError::InventoryFull)?;

        let host = self.equipped.get_mut(&slot).ok_or(InventoryError::DoesNotExist)?;
        let detached = host.modules.remove(position);
        let ctx = EffectContext::own(self.owner);
        target.remove_effects_from(&GrantSource::Item(detached.id), &ctx);
        self.inventory
            .put(dest, detached)
            .map_err(|_| InventoryError::InventoryFull)?;

        let mut touched = Touched::default();
        touched.index(dest);
        touched.slot(slot);
        self.emit(touched);
        Ok(module)
    }

    // === Internals ===

    fn definition_at(&self, index: usize) -> Result<ItemDefinition, InventoryError> {
        let item = self.inventory.get(index).ok_or(InventoryError::DoesNotExist)?;
        self.catalog
            .get(&item.class)
            .cloned()
            .ok_or(InventoryError::InvalidEquipment)
    }

    fn attach_module(
        &mut self,
        slot: SlotType,
        index: usize,
        kind: &ItemKind,
        target: &mut impl EffectTarget,
    ) -> Result<(), InventoryError> {
        let host = self.equipped.get(&slot).ok_or(InventoryError::InvalidEquipment)?;
        let host_def = self
            .catalog
            .get(&host.class)
            .ok_or(InventoryError::InvalidEquipment)?;
        if !kind.accepts_host(&host_def.kind) {
            return Err(InventoryError::WrongSlot);
        }
        if host.modules.len() >= host_def.module_slots as usize {
            return Err(InventoryError::ModuleSlotsFull);
        }

        let mut module = self.inventory.take(index).ok_or(InventoryError::DoesNotExist)?;
        module.owner = Some(self.owner);
        self.grant_piece(&module, slot, target);
        debug!(owner = %self.owner, module = %module.id, %slot, "module attached");
        if let Some(host) = self.equipped.get_mut(&slot) {
            host.modules.push(module);
        }

        let mut touched = Touched::default();
        touched.index(index);
        touched.slot(slot);
        self.emit(touched);
        Ok(())
    }

    fn stow(&mut self, item: ItemInstance) -> Result<usize, InventoryError> {
        self.inventory
            .put_first_empty(item)
            .map_err(|_| InventoryError::InventoryFull)
    }

    fn grant_effects(
        &self,
        def: &ItemDefinition,
        source: GrantSource,
        target: &mut impl EffectTarget,
        ctx: &EffectContext,
    ) {
        for granted in &def.granted_effects {
            match self.effects.get(&granted.effect) {
                Some(effect) => target.grant_effect(effect, granted.level, source.clone(), ctx),
                None => warn!(item = %def.id, effect = %granted.effect, "unknown effect on item"),
            }
        }
    }

    /// Grant one item's own effects and weapon stats
    fn grant_piece(&self, piece: &ItemInstance, slot: SlotType, target: &mut impl EffectTarget) {
        let Some(def) = self.catalog.get(&piece.class) else {
            warn!(item = %piece.id, class = %piece.class, "no definition for equipped item");
            return;
        };
        let ctx = EffectContext::own(self.owner);
        let source = GrantSource::Item(piece.id);
        if let Some(stats) = def.kind.weapon_stats() {
            target.grant_modifiers(&stats.modifiers(slot), source.clone(), &ctx);
        }
        self.grant_effects(def, source, target, &ctx);
    }

    fn grant_item(&self, item: &ItemInstance, slot: SlotType, target: &mut impl EffectTarget) {
        for piece in item.with_modules() {
            self.grant_piece(piece, slot, target);
        }
    }

    fn revoke_item(&self, item: &ItemInstance, target: &mut impl EffectTarget) {
        let ctx = EffectContext::own(self.owner);
        for piece in item.with_modules() {
            target.remove_effects_from(&GrantSource::Item(piece.id), &ctx);
        }
    }

    fn emit(&mut self, touched: Touched) {
        if touched.indices.is_empty() && touched.slots.is_empty() {
            return;
        }
        let event = LoadoutChanged {
            owner: self.owner,
            inventory: touched
                .indices
                .into_iter()
                .map(|index| InventorySlotChange {
                    index,
                    item: self.inventory.get(index).map(ItemRef::from),
                })
                .collect(),
            equipment: touched
                .slots
                .into_iter()
                .map(|slot| EquipmentSlotChange {
                    slot,
                    item: self.equipped.get(&slot).map(ItemRef::from),
                })
                .collect(),
        };
        self.events.broadcast(&event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attribute::{Attribute, AttributeSet};
    use crate::config::LevelTable;
    use crate::effect::{EffectDefinition, EffectDuration, Modifier, ModifierDef, ModifierOp};
    use crate::inventory::item::{GrantedEffect, WeaponStats};

    /// Records grant and revoke calls
    #[derive(Default)]
    struct Recorder {
        applied: Vec<String>,
        granted: Vec<(String, GrantSource)>,
        modifiers: Vec<(Modifier, GrantSource)>,
        revoked: Vec<GrantSource>,
    }

    impl EffectTarget for Recorder {
        fn grant_effect(
            &mut self,
            effect: &EffectDefinition,
            _level: u32,
            source: GrantSource,
            _ctx: &EffectContext,
        ) {
            self.granted.push((effect.id.clone(), source));
        }

        fn apply_effect(&mut self, effect: &EffectDefinition, _level: u32, _ctx: &EffectContext) {
            self.applied.push(effect.id.clone());
        }

        fn grant_modifiers(
            &mut self,
            modifiers: &[Modifier],
            source: GrantSource,
            _ctx: &EffectContext,
        ) {
            for m in modifiers {
                self.modifiers.push((*m, source.clone()));
            }
        }

        fn remove_effects_from(&mut self, source: &GrantSource, _ctx: &EffectContext) -> usize {
            self.revoked.push(source.clone());
            0
        }
    }

    fn weapon(min: f64, max: f64) -> WeaponStats {
        WeaponStats {
            min_damage: min,
            max_damage: max,
            attack_speed: 1.0,
            attack_range: 150.0,
            projectile: false,
        }
    }

    fn item(id: &str, kind: ItemKind) -> ItemDefinition {
        ItemDefinition {
            id: id.to_string(),
            name: id.to_string(),
            kind,
            max_stacks: 1,
            unique: false,
            module_slots: 0,
            granted_effects: Vec::new(),
        }
    }

    fn catalog() -> Arc<ItemCatalog> {
        let mut potion = item("potion", ItemKind::Consumable);
        potion.max_stacks = 5;
        potion.granted_effects = vec![GrantedEffect {
            effect: "restore".to_string(),
            level: 1,
        }];
        let mut elixir = item("elixir", ItemKind::Consumable);
        elixir.max_stacks = 3;
        elixir.granted_effects = vec![GrantedEffect {
            effect: "plating".to_string(),
            level: 1,
        }];
        let mut plate = item("plate", ItemKind::Armor);
        plate.module_slots = 1;
        plate.granted_effects = vec![GrantedEffect {
            effect: "plating".to_string(),
            level: 1,
        }];
        let mut sword = item("sword", ItemKind::OneHand(weapon(10.0, 14.0)));
        sword.module_slots = 1;
        let mut chip = item("chip", ItemKind::BrainImplant);
        chip.unique = true;
        let mut weave = item("weave", ItemKind::ArmorModule);
        weave.granted_effects = vec![GrantedEffect {
            effect: "plating".to_string(),
            level: 1,
        }];

        Arc::new(ItemCatalog::from_iter([
            potion,
            elixir,
            plate,
            sword,
            chip,
            weave,
            item("dagger", ItemKind::OneHand(weapon(5.0, 7.0))),
            item("greatsword", ItemKind::TwoHand(weapon(30.0, 40.0))),
            item("focus", ItemKind::Source),
            item("scope", ItemKind::WeaponModule),
            item("stim", ItemKind::BodyImplant),
        ]))
    }

    fn effects() -> Arc<EffectRegistry> {
        Arc::new(EffectRegistry::from_iter([
            EffectDefinition {
                id: "plating".to_string(),
                name: "Plating".to_string(),
                duration: EffectDuration::Infinite,
                modifiers: vec![ModifierDef {
                    attribute: Attribute::Armor,
                    op: ModifierOp::Additive,
                    magnitude: 100.0,
                    per_level: 0.0,
                }],
            },
            EffectDefinition {
                id: "restore".to_string(),
                name: "Restore".to_string(),
                duration: EffectDuration::Instant,
                modifiers: vec![ModifierDef {
                    attribute: Attribute::Health,
                    op: ModifierOp::Additive,
                    magnitude: 150.0,
                    per_level: 0.0,
                }],
            },
        ]))
    }

    fn loadout(capacity: usize) -> Loadout {
        Loadout::new(CharacterId(1), capacity, catalog(), effects())
    }

    fn add_one(loadout: &mut Loadout, class: &str) -> ItemId {
        loadout.add_item(class, 1, None).unwrap()[0]
    }

    fn snapshot(loadout: &Loadout) -> (Inventory, Vec<(SlotType, ItemId)>) {
        (
            loadout.inventory().clone(),
            loadout.equipped_items().map(|(s, i)| (s, i.id)).collect(),
        )
    }

    // === Inventory ===

    #[test]
    fn test_add_stacks_then_opens_slots() {
        let mut lo = loadout(6);
        let first = lo.add_item("potion", 3, None).unwrap();
        assert_eq!(first.len(), 1);

        // 2 top up the first stack, 5 open a second, 1 opens a third
        let more = lo.add_item("potion", 8, None).unwrap();
        assert_eq!(more.len(), 2);
        let stacks: Vec<u32> = lo.inventory().items().map(|(_, i)| i.stacks).collect();
        assert_eq!(stacks, vec![5, 5, 1]);
    }

    #[test]
    fn test_add_never_partially_commits() {
        let mut lo = loadout(2);
        lo.add_item("potion", 4, None).unwrap();
        let before = lo.inventory().clone();
        assert_eq!(
            lo.add_item("potion", 12, None),
            Err(InventoryError::InventoryFull)
        );
        assert_eq!(lo.inventory(), &before);
    }

    #[test]
    fn test_add_unknown_class() {
        let mut lo = loadout(6);
        assert_eq!(lo.add_item("relic", 1, None), Err(InventoryError::DoesNotExist));
    }

    #[test]
    fn test_unique_checked_across_equipment() {
        let mut lo = loadout(6);
        let mut target = Recorder::default();
        let chip = add_one(&mut lo, "chip");
        assert_eq!(lo.add_item("chip", 1, None), Err(InventoryError::Unique));

        lo.equip(SlotType::BrainImplant, chip, &mut target).unwrap();
        assert_eq!(lo.add_item("chip", 1, None), Err(InventoryError::Unique));
    }

    #[test]
    fn test_add_reuses_existing_instance() {
        let mut lo = loadout(6);
        let dropped = ItemInstance::new("sword", 1);
        let id = dropped.id;
        assert_eq!(lo.add_item("sword", 1, Some(dropped)).unwrap(), vec![id]);
        assert_eq!(lo.inventory().get(0).unwrap().owner, Some(CharacterId(1)));

        let wrong = ItemInstance::new("dagger", 1);
        assert_eq!(
            lo.add_item("sword", 1, Some(wrong)),
            Err(InventoryError::DoesNotExist)
        );
    }

    #[test]
    fn test_remove_partial_and_whole() {
        let mut lo = loadout(6);
        let potion = lo.add_item("potion", 4, None).unwrap()[0];
        assert_eq!(lo.remove_item(potion, false, 1).unwrap(), None);
        assert_eq!(lo.inventory().get(0).unwrap().stacks, 3);

        // Consumables are destroyed when emptied
        assert_eq!(lo.remove_item(potion, false, 10).unwrap(), None);
        assert!(lo.inventory().get(0).is_none());

        let sword = add_one(&mut lo, "sword");
        let returned = lo.remove_item(sword, false, 1).unwrap().unwrap();
        assert_eq!(returned.id, sword);
        let plate = add_one(&mut lo, "plate");
        assert_eq!(lo.remove_item(plate, true, 1).unwrap(), None);

        assert_eq!(
            lo.remove_item(ItemId(u64::MAX), false, 1),
            Err(InventoryError::DoesNotExist)
        );
    }

    #[test]
    fn test_consume_applies_instant_effect() {
        let mut lo = loadout(6);
        let mut attrs = AttributeSet::new(Arc::new(LevelTable::new()));
        attrs.apply_modifier(
            &Modifier::add(Attribute::Health, -200.0),
            &EffectContext::own(CharacterId(1)),
        );
        let potion = lo.add_item("potion", 2, None).unwrap()[0];

        lo.consume(potion, &mut attrs).unwrap();
        assert!((attrs.get(Attribute::Health) - 450.0).abs() < f64::EPSILON);
        assert_eq!(lo.inventory().get(0).unwrap().stacks, 1);

        let sword = add_one(&mut lo, "sword");
        assert_eq!(lo.consume(sword, &mut attrs), Err(InventoryError::InvalidEquipment));
    }

    #[test]
    fn test_consume_leaves_nothing_to_revoke() {
        let mut lo = loadout(6);
        let mut attrs = AttributeSet::new(Arc::new(LevelTable::new()));
        let elixir = lo.add_item("elixir", 1, None).unwrap()[0];

        lo.consume(elixir, &mut attrs).unwrap();
        assert!(lo.inventory().find(elixir).is_none());
        assert!((attrs.get(Attribute::Armor) - 100.0).abs() < f64::EPSILON);

        // Armor moved into the base value, not a modifier tied to the spent item
        let ctx = EffectContext::own(CharacterId(1));
        assert_eq!(attrs.remove_effects_from(&GrantSource::Item(elixir), &ctx), 0);
        assert!((attrs.get(Attribute::Armor) - 100.0).abs() < f64::EPSILON);

        let mut target = Recorder::default();
        let another = lo.add_item("elixir", 1, None).unwrap()[0];
        lo.consume(another, &mut target).unwrap();
        assert_eq!(target.applied, vec!["plating".to_string()]);
        assert!(target.granted.is_empty());
        assert!(target.modifiers.is_empty());
    }

    // === Equip / Unequip ===

    #[test]
    fn test_equip_grants_and_unequip_revokes() {
        let mut lo = loadout(6);
        let mut target = Recorder::default();
        let plate = add_one(&mut lo, "plate");

        lo.equip(SlotType::Armor, plate, &mut target).unwrap();
        assert_eq!(lo.equipped(SlotType::Armor).unwrap().id, plate);
        assert_eq!(lo.inventory().find(plate), None);
        assert_eq!(target.granted, vec![("plating".to_string(), GrantSource::Item(plate))]);

        let id = lo.unequip(SlotType::Armor, &mut target).unwrap();
        assert_eq!(id, plate);
        assert!(lo.equipped(SlotType::Armor).is_none());
        assert_eq!(lo.inventory().find(plate), Some(0));
        assert_eq!(target.revoked, vec![GrantSource::Item(plate)]);
    }

    #[test]
    fn test_equip_sets_weapon_attributes() {
        let mut lo = loadout(6);
        let mut attrs = AttributeSet::new(Arc::new(LevelTable::new()));
        let dagger = add_one(&mut lo, "dagger");

        lo.equip(SlotType::OffHand, dagger, &mut attrs).unwrap();
        assert!((attrs.get(Attribute::OffHandMinDamage) - 5.0).abs() < f64::EPSILON);
        assert!((attrs.get(Attribute::OffHandAttackSpeed) - 1.0).abs() < f64::EPSILON);
        assert!(attrs.get(Attribute::MainHandMinDamage).abs() < f64::EPSILON);

        lo.unequip(SlotType::OffHand, &mut attrs).unwrap();
        assert!(attrs.get(Attribute::OffHandMinDamage).abs() < f64::EPSILON);
        assert_eq!(attrs.granted_count(), 0);
    }

    #[test]
    fn test_wrong_slot_and_invalid() {
        let mut lo = loadout(6);
        let mut target = Recorder::default();
        let greatsword = add_one(&mut lo, "greatsword");
        let potion = add_one(&mut lo, "potion");
        let focus = add_one(&mut lo, "focus");

        assert_eq!(
            lo.equip(SlotType::OffHand, greatsword, &mut target),
            Err(InventoryError::WrongSlot)
        );
        assert_eq!(
            lo.equip(SlotType::MainHand, focus, &mut target),
            Err(InventoryError::WrongSlot)
        );
        assert_eq!(
            lo.equip(SlotType::Armor, potion, &mut target),
            Err(InventoryError::InvalidEquipment)
        );
        assert_eq!(
            lo.equip(SlotType::Armor, ItemId(u64::MAX), &mut target),
            Err(InventoryError::DoesNotExist)
        );
        assert!(target.granted.is_empty());
    }

    #[test]
    fn test_equip_replaces_occupant() {
        let mut lo = loadout(6);
        let mut target = Recorder::default();
        let sword = add_one(&mut lo, "sword");
        let dagger = add_one(&mut lo, "dagger");

        lo.equip(SlotType::MainHand, sword, &mut target).unwrap();
        lo.equip(SlotType::MainHand, dagger, &mut target).unwrap();
        assert_eq!(lo.equipped(SlotType::MainHand).unwrap().id, dagger);
        assert!(lo.inventory().find(sword).is_some());
        assert_eq!(target.revoked, vec![GrantSource::Item(sword)]);
        let dagger_mods = target
            .modifiers
            .iter()
            .filter(|(_, source)| *source == GrantSource::Item(dagger))
            .count();
        assert_eq!(dagger_mods, 4);
    }

    #[test]
    fn test_equip_into_full_inventory_swaps_through_freed_slot() {
        let mut lo = loadout(2);
        let mut target = Recorder::default();
        let sword = add_one(&mut lo, "sword");
        lo.equip(SlotType::MainHand, sword, &mut target).unwrap();
        let dagger = add_one(&mut lo, "dagger");
        add_one(&mut lo, "plate");
        assert!(lo.inventory().is_full());

        lo.equip(SlotType::MainHand, dagger, &mut target).unwrap();
        assert_eq!(lo.inventory().find(sword), Some(0));
    }

    #[test]
    fn test_two_hander_vacates_both_hands() {
        let mut lo = loadout(6);
        let mut target = Recorder::default();
        let sword = add_one(&mut lo, "sword");
        let dagger = add_one(&mut lo, "dagger");
        let greatsword = add_one(&mut lo, "greatsword");
        lo.equip(SlotType::MainHand, sword, &mut target).unwrap();
        lo.equip(SlotType::OffHand, dagger, &mut target).unwrap();

        lo.equip(SlotType::MainHand, greatsword, &mut target).unwrap();
        assert_eq!(lo.equipped(SlotType::MainHand).unwrap().id, greatsword);
        assert!(lo.equipped(SlotType::OffHand).is_none());
        assert!(lo.inventory().find(sword).is_some());
        assert!(lo.inventory().find(dagger).is_some());
        assert!(lo.holds_two_hander());
    }

    #[test]
    fn test_two_hander_atomic_when_full() {
        let mut lo = loadout(3);
        let mut target = Recorder::default();
        let sword = add_one(&mut lo, "sword");
        let dagger = add_one(&mut lo, "dagger");
        lo.equip(SlotType::MainHand, sword, &mut target).unwrap();
        lo.equip(SlotType::OffHand, dagger, &mut target).unwrap();
        let greatsword = add_one(&mut lo, "greatsword");
        add_one(&mut lo, "plate");
        add_one(&mut lo, "focus");
        assert!(lo.inventory().is_full());

        let before = snapshot(&lo);
        let revoked_before = target.revoked.len();
        assert_eq!(
            lo.equip(SlotType::MainHand, greatsword, &mut target),
            Err(InventoryError::InventoryFull)
        );
        assert_eq!(snapshot(&lo), before);
        assert_eq!(target.revoked.len(), revoked_before);
    }

    #[test]
    fn test_off_hand_unseats_two_hander() {
        let mut lo = loadout(6);
        let mut target = Recorder::default();
        let greatsword = add_one(&mut lo, "greatsword");
        let focus = add_one(&mut lo, "focus");
        lo.equip(SlotType::MainHand, greatsword, &mut target).unwrap();

        lo.equip(SlotType::OffHand, focus, &mut target).unwrap();
        assert!(lo.equipped(SlotType::MainHand).is_none());
        assert_eq!(lo.equipped(SlotType::OffHand).unwrap().id, focus);
        assert!(lo.inventory().find(greatsword).is_some());
    }

    #[test]
    fn test_unequip_needs_free_slot() {
        let mut lo = loadout(1);
        let mut target = Recorder::default();
        let plate = add_one(&mut lo, "plate");
        lo.equip(SlotType::Armor, plate, &mut target).unwrap();
        add_one(&mut lo, "sword");

        assert_eq!(
            lo.unequip(SlotType::Armor, &mut target),
            Err(InventoryError::InventoryFull)
        );
        assert_eq!(lo.equipped(SlotType::Armor).unwrap().id, plate);
        assert_eq!(
            lo.unequip(SlotType::MainHand, &mut target),
            Err(InventoryError::DoesNotExist)
        );
    }

    // === Modules ===

    #[test]
    fn test_module_needs_host() {
        let mut lo = loadout(6);
        let mut target = Recorder::default();
        let weave = add_one(&mut lo, "weave");
        assert_eq!(
            lo.equip(SlotType::Armor, weave, &mut target),
            Err(InventoryError::InvalidEquipment)
        );
    }

    #[test]
    fn test_weapon_module_rejects_non_weapon_host() {
        let mut lo = loadout(6);
        let mut target = Recorder::default();
        let focus = add_one(&mut lo, "focus");
        let scope = add_one(&mut lo, "scope");
        lo.equip(SlotType::OffHand, focus, &mut target).unwrap();
        assert_eq!(
            lo.equip(SlotType::OffHand, scope, &mut target),
            Err(InventoryError::WrongSlot)
        );
    }

    #[test]
    fn test_module_capacity() {
        let mut lo = loadout(6);
        let mut target = Recorder::default();
        let plate = add_one(&mut lo, "plate");
        let first = add_one(&mut lo, "weave");
        let second = add_one(&mut lo, "weave");
        lo.equip(SlotType::Armor, plate, &mut target).unwrap();

        lo.equip(SlotType::Armor, first, &mut target).unwrap();
        assert_eq!(lo.equipped(SlotType::Armor).unwrap().modules.len(), 1);
        assert!(target.granted.contains(&("plating".to_string(), GrantSource::Item(first))));
        assert_eq!(
            lo.equip(SlotType::Armor, second, &mut target),
            Err(InventoryError::ModuleSlotsFull)
        );
    }

    #[test]
    fn test_modules_travel_with_host() {
        let mut lo = loadout(6);
        let mut target = Recorder::default();
        let plate = add_one(&mut lo, "plate");
        let weave = add_one(&mut lo, "weave");
        lo.equip(SlotType::Armor, plate, &mut target).unwrap();
        lo.equip(SlotType::Armor, weave, &mut target).unwrap();

        lo.unequip(SlotType::Armor, &mut target).unwrap();
        assert!(target.revoked.contains(&GrantSource::Item(weave)));
        let index = lo.inventory().find(plate).unwrap();
        assert_eq!(lo.inventory().get(index).unwrap().modules[0].id, weave);
        assert!(lo.contains_class("weave"));
    }

    #[test]
    fn test_detach_module() {
        let mut lo = loadout(6);
        let mut target = Recorder::default();
        let sword = add_one(&mut lo, "sword");
        let scope = add_one(&mut lo, "scope");
        lo.equip(SlotType::MainHand, sword, &mut target).unwrap();
        lo.equip(SlotType::MainHand, scope, &mut target).unwrap();

        assert_eq!(lo.detach_module(SlotType::MainHand, scope, &mut target), Ok(scope));
        assert!(lo.equipped(SlotType::MainHand).unwrap().modules.is_empty());
        assert!(lo.inventory().find(scope).is_some());
        assert_eq!(
            lo.detach_module(SlotType::MainHand, scope, &mut target),
            Err(InventoryError::DoesNotExist)
        );
    }

    // === Swap ===

    #[test]
    fn test_swap_exchanges_places() {
        let mut lo = loadout(6);
        let mut target = Recorder::default();
        let sword = add_one(&mut lo, "sword");
        let dagger = add_one(&mut lo, "dagger");
        lo.equip(SlotType::MainHand, sword, &mut target).unwrap();
        let dagger_index = lo.inventory().find(dagger).unwrap();

        lo.swap_equipment(dagger, sword, &mut target).unwrap();
        assert_eq!(lo.equipped(SlotType::MainHand).unwrap().id, dagger);
        assert_eq!(lo.inventory().find(sword), Some(dagger_index));
        assert_eq!(lo.slot_of(dagger), Some(SlotType::MainHand));
    }

    #[test]
    fn test_swap_rejects() {
        let mut lo = loadout(6);
        let mut target = Recorder::default();
        let sword = add_one(&mut lo, "sword");
        let dagger = add_one(&mut lo, "dagger");
        let plate = add_one(&mut lo, "plate");

        assert_eq!(
            lo.swap_equipment(sword, dagger, &mut target),
            Err(InventoryError::InvalidEquipment)
        );
        lo.equip(SlotType::MainHand, sword, &mut target).unwrap();
        assert_eq!(
            lo.swap_equipment(sword, plate, &mut target),
            Err(InventoryError::WrongSlot)
        );
        assert_eq!(
            lo.swap_equipment(sword, ItemId(u64::MAX), &mut target),
            Err(InventoryError::DoesNotExist)
        );
        assert_eq!(lo.equipped(SlotType::MainHand).unwrap().id, sword);
    }

    #[test]
    fn test_swap_to_two_hander_needs_room_for_off_hand() {
        let mut lo = loadout(2);
        let mut target = Recorder::default();
        let sword = add_one(&mut lo, "sword");
        let dagger = add_one(&mut lo, "dagger");
        lo.equip(SlotType::MainHand, sword, &mut target).unwrap();
        lo.equip(SlotType::OffHand, dagger, &mut target).unwrap();
        let greatsword = add_one(&mut lo, "greatsword");
        add_one(&mut lo, "plate");

        let before = snapshot(&lo);
        assert_eq!(
            lo.swap_equipment(sword, greatsword, &mut target),
            Err(InventoryError::InventoryFull)
        );
        assert_eq!(snapshot(&lo), before);
    }

    // === Notifications ===

    #[test]
    fn test_one_event_per_operation() {
        let mut lo = loadout(6);
        let mut target = Recorder::default();
        let mut rx = lo.subscribe();
        let sword = add_one(&mut lo, "sword");
        let dagger = add_one(&mut lo, "dagger");
        let greatsword = add_one(&mut lo, "greatsword");
        lo.equip(SlotType::MainHand, sword, &mut target).unwrap();
        lo.equip(SlotType::OffHand, dagger, &mut target).unwrap();
        crate::events::drain(&mut rx);

        lo.equip(SlotType::MainHand, greatsword, &mut target).unwrap();
        let events: Vec<_> = crate::events::drain(&mut rx);
        assert_eq!(events.len(), 1);
        let event = &events[0];
        assert_eq!(event.owner, CharacterId(1));
        assert_eq!(event.equipment.len(), 2);
        let main = event
            .equipment
            .iter()
            .find(|c| c.slot == SlotType::MainHand)
            .unwrap();
        assert_eq!(main.item.as_ref().unwrap().id, greatsword);
        let off = event
            .equipment
            .iter()
            .find(|c| c.slot == SlotType::OffHand)
            .unwrap();
        assert!(off.item.is_none());
        // The greatsword's old slot plus the slot the displaced weapon landed in
        assert!(event.inventory.len() >= 2);
    }

    #[test]
    fn test_failed_operation_emits_nothing() {
        let mut lo = loadout(6);
        let mut target = Recorder::default();
        let mut rx = lo.subscribe();
        let _ = lo.equip(SlotType::Armor, ItemId(u64::MAX), &mut target);
        let _ = lo.add_item("relic", 1, None);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_event_serializes() {
        let mut lo = loadout(6);
        let mut rx = lo.subscribe();
        add_one(&mut lo, "potion");
        let event = rx.try_recv().unwrap();
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"potion\""));
    }
}
