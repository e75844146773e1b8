//! Effects - modifiers, effect definitions and the grant/revoke seam

mod context;
mod definition;
mod modifier;

pub use context::{EffectContext, GrantSource};
pub use definition::{EffectDefinition, EffectDuration, EffectRegistry, ModifierDef};
pub use modifier::{Modifier, ModifierOp};

/// Anything that can receive granted effects and have them revoked by source
///
/// Equipment calls into this on equip and unequip; it never tracks effect
/// lifetimes itself.
pub trait EffectTarget {
    /// Apply an effect definition at a level on behalf of `source`
    fn grant_effect(
        &mut self,
        effect: &EffectDefinition,
        level: u32,
        source: GrantSource,
        ctx: &EffectContext,
    );

    /// Apply an effect's modifiers once to base values, leaving nothing to revoke
    fn apply_effect(&mut self, effect: &EffectDefinition, level: u32, ctx: &EffectContext);

    /// Grant loose persistent modifiers on behalf of `source`
    fn grant_modifiers(&mut self, modifiers: &[Modifier], source: GrantSource, ctx: &EffectContext);

    /// Revoke everything `source` granted, returning how many modifiers were removed
    fn remove_effects_from(&mut self, source: &GrantSource, ctx: &EffectContext) -> usize;
}
