//! Inventory - fixed-size ordered slot array

use super::item::ItemInstance;
use crate::types::ItemId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Inventory {
    slots: Vec<Option<ItemInstance>>,
}

impl Inventory {
    pub fn new(capacity: usize) -> Self {
        Inventory {
            slots: vec![None; capacity],
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn get(&self, index: usize) -> Option<&ItemInstance> {
        self.slots.get(index).and_then(Option::as_ref)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut ItemInstance> {
        self.slots.get_mut(index).and_then(Option::as_mut)
    }

    /// Slot index holding the item
    pub fn find(&self, id: ItemId) -> Option<usize> {
        self.slots
            .iter()
            .position(|slot| slot.as_ref().is_some_and(|item| item.id == id))
    }

    pub fn first_empty(&self) -> Option<usize> {
        self.slots.iter().position(Option::is_none)
    }

    pub fn empty_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_none()).count()
    }

    pub fn occupied_count(&self) -> usize {
        self.capacity() - self.empty_count()
    }

    pub fn is_full(&self) -> bool {
        self.empty_count() == 0
    }

    /// Occupied slots with their indices
    pub fn items(&self) -> impl Iterator<Item = (usize, &ItemInstance)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|item| (i, item)))
    }

    pub fn take(&mut self, index: usize) -> Option<ItemInstance> {
        self.slots.get_mut(index).and_then(Option::take)
    }

    /// Place an item into an empty slot, handing it back if the slot is taken
    pub fn put(&mut self, index: usize, item: ItemInstance) -> Result<(), ItemInstance> {
        match self.slots.get_mut(index) {
            Some(slot @ None) => {
                *slot = Some(item);
                Ok(())
            }
            _ => Err(item),
        }
    }

    /// Place an item in the lowest empty slot
    pub fn put_first_empty(&mut self, item: ItemInstance) -> Result<usize, ItemInstance> {
        match self.first_empty() {
            Some(index) => self.put(index, item).map(|_| index),
            None => Err(item),
        }
    }
}
