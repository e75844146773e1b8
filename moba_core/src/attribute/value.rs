//! AttributeValue - base and current value of one attribute

use crate::effect::ModifierOp;
use serde::{Deserialize, Serialize};

/// Stored state of one attribute
///
/// `base` is changed by instant effects. `current` is `base` folded through
/// every persistent modifier currently granted, then clamped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AttributeValue {
    pub base: f64,
    pub current: f64,
}

impl AttributeValue {
    pub fn with_base(base: f64) -> Self {
        AttributeValue {
            base,
            current: base,
        }
    }
}

/// Sum of persistent modifiers on one attribute
///
/// Current value is the last override if any, otherwise
/// `(base + flat) × (1 + increased)`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Aggregate {
    /// Sum of additive modifiers
    pub flat: f64,
    /// Sum of multiplicative modifiers (as decimal, 0.25 = +25%)
    pub increased: f64,
    /// Absolute value set by an override modifier
    pub overridden: Option<f64>,
}

impl Aggregate {
    pub fn add(&mut self, op: ModifierOp, magnitude: f64) {
        match op {
            ModifierOp::Additive => self.flat += magnitude,
            ModifierOp::Multiplicative => self.increased += magnitude,
            ModifierOp::Override => self.overridden = Some(magnitude),
        }
    }

    pub fn compute(&self, base: f64) -> f64 {
        match self.overridden {
            Some(value) => value,
            None => (base + self.flat) * (1.0 + self.increased),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.flat == 0.0 && self.increased == 0.0 && self.overridden.is_none()
    }
}
