//! Modifier - a single attribute operation

use crate::attribute::Attribute;
use serde::{Deserialize, Serialize};

/// How a modifier combines with the value it targets
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModifierOp {
    /// Add the magnitude
    #[default]
    Additive,
    /// Scale by `1 + magnitude`
    Multiplicative,
    /// Replace the value with the magnitude
    Override,
}

impl ModifierOp {
    /// Apply this operation directly to a value
    pub fn apply(self, value: f64, magnitude: f64) -> f64 {
        match self {
            ModifierOp::Additive => value + magnitude,
            ModifierOp::Multiplicative => value * (1.0 + magnitude),
            ModifierOp::Override => magnitude,
        }
    }
}

/// Operation on one attribute
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Modifier {
    pub attribute: Attribute,
    #[serde(default)]
    pub op: ModifierOp,
    pub magnitude: f64,
}

impl Modifier {
    pub fn add(attribute: Attribute, magnitude: f64) -> Self {
        Modifier {
            attribute,
            op: ModifierOp::Additive,
            magnitude,
        }
    }

    pub fn multiply(attribute: Attribute, magnitude: f64) -> Self {
        Modifier {
            attribute,
            op: ModifierOp::Multiplicative,
            magnitude,
        }
    }

    pub fn set(attribute: Attribute, magnitude: f64) -> Self {
        Modifier {
            attribute,
            op: ModifierOp::Override,
            magnitude,
        }
    }
}
