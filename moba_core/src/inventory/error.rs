//! Inventory and equipment outcomes

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why an inventory or equipment operation was refused
///
/// A refused operation leaves inventory and equipment untouched. Success is
/// the `Ok` side of the returned `Result`.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InventoryError {
    #[error("not enough free inventory slots")]
    InventoryFull,
    #[error("a unique item of this class is already owned")]
    Unique,
    #[error("item or slot does not exist")]
    DoesNotExist,
    #[error("host item has no free module slots")]
    ModuleSlotsFull,
    #[error("item cannot be equipped in that slot")]
    WrongSlot,
    #[error("item cannot be equipped")]
    InvalidEquipment,
}
