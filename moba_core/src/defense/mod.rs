//! Defense - resistance to damage-reduction conversion

mod reduction;

pub use reduction::{reduction_from_resistance, resistance_for_reduction};

/// Defense calculation constants
pub mod constants {
    /// Resistance at which positive reduction reaches 50%
    pub const RESISTANCE_SCALE: f64 = 100.0;

    /// Reduction is clamped to this magnitude either way
    pub const MAX_REDUCTION: f64 = 1.0;
}
