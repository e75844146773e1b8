//! Reduction curve - diminishing returns for resistance, amplified penalty below zero

use super::constants::{MAX_REDUCTION, RESISTANCE_SCALE};

/// Convert a resistance value into a damage-reduction fraction
///
/// - `r >= 0`: `1 - S / (S + r)` approaching 1 as `r` grows
/// - `r < 0`: `1 - (2 - S / (S - r))` approaching -1 as `r` falls
///
/// where `S` is [`RESISTANCE_SCALE`]. The result is clamped to ±[`MAX_REDUCTION`].
pub fn reduction_from_resistance(resistance: f64) -> f64 {
    let reduction = if resistance >= 0.0 {
        1.0 - RESISTANCE_SCALE / (RESISTANCE_SCALE + resistance)
    } else {
        1.0 - (2.0 - RESISTANCE_SCALE / (RESISTANCE_SCALE - resistance))
    };
    reduction.clamp(-MAX_REDUCTION, MAX_REDUCTION)
}

/// Resistance needed to reach a target reduction
///
/// Inverse of [`reduction_from_resistance`]. Targets at or beyond ±1 are
/// unreachable and return ±infinity.
pub fn resistance_for_reduction(reduction: f64) -> f64 {
    if reduction >= MAX_REDUCTION {
        return f64::INFINITY;
    }
    if reduction <= -MAX_REDUCTION {
        return f64::NEG_INFINITY;
    }

    if reduction >= 0.0 {
        // reduction = 1 - S/(S+r)  =>  r = S*reduction / (1 - reduction)
        RESISTANCE_SCALE * reduction / (1.0 - reduction)
    } else {
        // reduction = S/(S-r) - 1  =>  r = S - S/(reduction + 1)
        RESISTANCE_SCALE - RESISTANCE_SCALE / (reduction + 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_resistance() {
        assert!(reduction_from_resistance(0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_hundred_resistance_halves() {
        assert!((reduction_from_resistance(100.0) - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_negative_resistance_amplifies() {
        // -100 => 1 - (2 - 100/200) = -0.5
        assert!((reduction_from_resistance(-100.0) + 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_diminishing_returns() {
        let first = reduction_from_resistance(100.0) - reduction_from_resistance(0.0);
        let second = reduction_from_resistance(200.0) - reduction_from_resistance(100.0);
        assert!(second < first);
    }

    #[test]
    fn test_bounded() {
        assert!(reduction_from_resistance(1.0e12) <= 1.0);
        assert!(reduction_from_resistance(-1.0e12) >= -1.0);
    }

    #[test]
    fn test_inverse() {
        for r in [-250.0, -40.0, 0.0, 35.0, 100.0, 400.0] {
            let back = resistance_for_reduction(reduction_from_resistance(r));
            assert!((back - r).abs() < 1e-6, "r={} back={}", r, back);
        }
        assert!(resistance_for_reduction(1.0).is_infinite());
    }
}
