//! Wait until the caster is within range of its target

use crate::types::CharacterId;
use glam::DVec3;
use serde::{Deserialize, Serialize};

/// Whether `target` is within `range` of `source`
pub fn in_range_for_ability(source: DVec3, target: DVec3, range: f64) -> bool {
    source.distance(target) <= range
}

/// What the caster is closing in on
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum RangeTarget {
    Character(CharacterId),
    Location(DVec3),
}

/// Tracks caster and target positions until they come within range
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaitInRange {
    pub source: CharacterId,
    pub target: RangeTarget,
    pub range: f64,
    source_position: DVec3,
    target_position: Option<DVec3>,
}

impl WaitInRange {
    pub fn new(source: CharacterId, target: RangeTarget, range: f64, source_position: DVec3) -> Self {
        let target_position = match target {
            RangeTarget::Location(location) => Some(location),
            RangeTarget::Character(_) => None,
        };
        WaitInRange {
            source,
            target,
            range,
            source_position,
            target_position,
        }
    }

    /// Record a character's new position; returns true once in range
    pub fn update_position(&mut self, character: CharacterId, position: DVec3) -> bool {
        if character == self.source {
            self.source_position = position;
        }
        if self.target == RangeTarget::Character(character) {
            self.target_position = Some(position);
        }
        self.is_in_range()
    }

    /// The targeted character touched the caster's range sphere
    pub fn overlaps(&self, other: CharacterId) -> bool {
        self.target == RangeTarget::Character(other)
    }

    /// Target position is unknown until the first update for a character target
    pub fn is_in_range(&self) -> bool {
        self.target_position
            .is_some_and(|target| in_range_for_ability(self.source_position, target, self.range))
    }

    pub fn distance(&self) -> Option<f64> {
        self.target_position
            .map(|target| self.source_position.distance(target))
    }
}
