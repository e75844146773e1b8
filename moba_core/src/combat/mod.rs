//! Combat - spec resolution and attack cooldowns

mod cooldown;
mod resolution;
mod result;

pub use cooldown::{attack_cooldown, basic_attack_cooldown, main_hand_cooldown, off_hand_cooldown};
pub use resolution::resolve_effect;
pub use result::CombatResult;
