//! Declared valid ranges for attributes

use super::Attribute;

/// One end of a range
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Bound {
    Unbounded,
    Const(f64),
    /// Current value of another attribute, read at clamp time
    Attribute(Attribute),
}

impl Bound {
    fn resolve(self, lookup: &impl Fn(Attribute) -> f64) -> Option<f64> {
        match self {
            Bound::Unbounded => None,
            Bound::Const(v) => Some(v),
            Bound::Attribute(attr) => Some(lookup(attr)),
        }
    }
}

/// Inclusive [min, max] range
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttributeRange {
    pub min: Bound,
    pub max: Bound,
}

impl AttributeRange {
    pub const UNBOUNDED: AttributeRange = AttributeRange {
        min: Bound::Unbounded,
        max: Bound::Unbounded,
    };

    pub const fn between(min: f64, max: f64) -> Self {
        AttributeRange {
            min: Bound::Const(min),
            max: Bound::Const(max),
        }
    }

    pub const fn at_least(min: f64) -> Self {
        AttributeRange {
            min: Bound::Const(min),
            max: Bound::Unbounded,
        }
    }

    /// Lower constant bound, upper bound taken from another attribute
    pub const fn up_to(min: f64, max: Attribute) -> Self {
        AttributeRange {
            min: Bound::Const(min),
            max: Bound::Attribute(max),
        }
    }

    /// Clamp a value into range
    ///
    /// `lookup` supplies current values for attribute-valued bounds. The upper
    /// bound wins if the two ends cross.
    pub fn clamp(&self, value: f64, lookup: impl Fn(Attribute) -> f64) -> f64 {
        let mut out = value;
        if let Some(min) = self.min.resolve(&lookup) {
            out = out.max(min);
        }
        if let Some(max) = self.max.resolve(&lookup) {
            out = out.min(max);
        }
        out
    }

    pub fn contains(&self, value: f64, lookup: impl Fn(Attribute) -> f64) -> bool {
        let lo = self.min.resolve(&lookup).unwrap_or(f64::NEG_INFINITY);
        let hi = self.max.resolve(&lookup).unwrap_or(f64::INFINITY);
        value >= lo && value <= hi
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_const_range() {
        let range = AttributeRange::between(0.0, 1.0);
        let none = |_: Attribute| 0.0;
        assert!((range.clamp(1.5, none) - 1.0).abs() < f64::EPSILON);
        assert!((range.clamp(-0.2, none) - 0.0).abs() < f64::EPSILON);
        assert!((range.clamp(0.4, none) - 0.4).abs() < f64::EPSILON);
    }

    #[test]
    fn test_attribute_bound_reads_lookup() {
        let range = AttributeRange::up_to(0.0, Attribute::MaxHealth);
        let max_health = |a: Attribute| match a {
            Attribute::MaxHealth => 320.0,
            _ => 0.0,
        };
        assert!((range.clamp(500.0, max_health) - 320.0).abs() < f64::EPSILON);
        assert!(range.contains(320.0, max_health));
        assert!(!range.contains(320.5, max_health));
    }

    #[test]
    fn test_unbounded() {
        let range = AttributeRange::UNBOUNDED;
        assert!((range.clamp(-1.0e6, |_| 0.0) + 1.0e6).abs() < f64::EPSILON);
    }
}
