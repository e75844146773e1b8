//! AttributeSnapshot - frozen copy of captured attribute values

use super::capture::{CaptureDefinition, CapturePhase, CaptureSide};
use crate::attribute::{Attribute, AttributeSet};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Values captured from one side of an exchange
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AttributeSnapshot {
    values: BTreeMap<Attribute, f64>,
}

impl AttributeSnapshot {
    /// Copy every attribute `captures` lists for `side` that is read in `phase`
    pub fn capture(
        set: &AttributeSet,
        side: CaptureSide,
        phase: CapturePhase,
        captures: &[CaptureDefinition],
    ) -> Self {
        let values = captures
            .iter()
            .filter(|c| c.side == side && c.phase() == phase)
            .map(|c| (c.attribute, set.get(c.attribute)))
            .collect();
        AttributeSnapshot { values }
    }

    pub fn from_pairs(pairs: impl IntoIterator<Item = (Attribute, f64)>) -> Self {
        AttributeSnapshot {
            values: pairs.into_iter().collect(),
        }
    }

    /// Captured value, 0 when the attribute was not captured
    pub fn get(&self, attribute: Attribute) -> f64 {
        self.values.get(&attribute).copied().unwrap_or(0.0)
    }

    pub fn contains(&self, attribute: Attribute) -> bool {
        self.values.contains_key(&attribute)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Copy with one value replaced
    pub fn with(mut self, attribute: Attribute, value: f64) -> Self {
        self.values.insert(attribute, value);
        self
    }
}
