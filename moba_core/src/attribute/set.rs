//! AttributeSet - one character's stats and the gated mutation pipeline
//!
//! Nothing outside this module writes attribute values. Every change goes
//! through `apply_*`, `grant_*` or `remove_effects_from`, each of which runs
//! compute → clamp → derive → broadcast before returning.

use super::{Aggregate, Attribute, AttributeValue};
use crate::config::LevelTable;
use crate::defense::reduction_from_resistance;
use crate::effect::{EffectContext, EffectDefinition, EffectTarget, GrantSource, Modifier};
use crate::events::Broadcaster;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::broadcast::Receiver;
use tracing::debug;

/// Notification for one attribute touched by a pipeline call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeChanged {
    pub attribute: Attribute,
    pub old_value: f64,
    pub new_value: f64,
    pub context: EffectContext,
}

#[derive(Debug, Clone)]
struct GrantedModifier {
    source: GrantSource,
    modifier: Modifier,
}

#[derive(Debug)]
struct Touched {
    attribute: Attribute,
    old_value: f64,
    /// Targeted by a modifier rather than reached through a side rule
    direct: bool,
}

/// Attributes touched during one pipeline call, in first-touch order
#[derive(Debug, Default)]
struct ChangeBatch {
    entries: Vec<Touched>,
}

impl ChangeBatch {
    fn touch(&mut self, attribute: Attribute, old_value: f64, direct: bool) {
        if let Some(entry) = self.entries.iter_mut().find(|e| e.attribute == attribute) {
            entry.direct |= direct;
            return;
        }
        self.entries.push(Touched {
            attribute,
            old_value,
            direct,
        });
    }
}

/// All attributes of one character
#[derive(Debug, Clone)]
pub struct AttributeSet {
    values: Vec<AttributeValue>,
    granted: Vec<GrantedModifier>,
    levels: Arc<LevelTable>,
    events: Broadcaster<AttributeChanged>,
}

impl AttributeSet {
    /// A set with every attribute at its default
    pub fn new(levels: Arc<LevelTable>) -> Self {
        Self::builder(levels).build()
    }

    pub fn builder(levels: Arc<LevelTable>) -> AttributeSetBuilder {
        AttributeSetBuilder {
            levels,
            overrides: vec![None; Attribute::count()],
        }
    }

    // === Reads ===

    /// Current value (base plus persistent modifiers, clamped)
    pub fn get(&self, attribute: Attribute) -> f64 {
        self.values[attribute.index()].current
    }

    pub fn base(&self, attribute: Attribute) -> f64 {
        self.values[attribute.index()].base
    }

    pub fn value(&self, attribute: Attribute) -> AttributeValue {
        self.values[attribute.index()]
    }

    /// Current values of every attribute
    pub fn iter(&self) -> impl Iterator<Item = (Attribute, f64)> + '_ {
        Attribute::all().map(move |a| (a, self.get(a)))
    }

    pub fn level(&self) -> u32 {
        self.get(Attribute::Level).max(1.0) as u32
    }

    pub fn is_alive(&self) -> bool {
        self.get(Attribute::Health) > 0.0
    }

    pub fn health_fraction(&self) -> f64 {
        let max = self.get(Attribute::MaxHealth);
        if max > 0.0 {
            self.get(Attribute::Health) / max
        } else {
            0.0
        }
    }

    pub fn level_table(&self) -> &LevelTable {
        &self.levels
    }

    /// Number of persistent modifiers currently granted
    pub fn granted_count(&self) -> usize {
        self.granted.len()
    }

    pub fn has_grants_from(&self, source: &GrantSource) -> bool {
        self.granted.iter().any(|g| &g.source == source)
    }

    /// Receive one [`AttributeChanged`] per touched attribute per pipeline call
    pub fn subscribe(&self) -> Receiver<AttributeChanged> {
        self.events.subscribe()
    }

    // === Pipeline entry points ===

    /// Apply one instant modifier, returning the attribute's resulting value
    pub fn apply_modifier(&mut self, modifier: &Modifier, ctx: &EffectContext) -> f64 {
        self.apply_modifiers(std::slice::from_ref(modifier), ctx);
        self.get(modifier.attribute)
    }

    /// Apply instant modifiers in order as a single batch
    pub fn apply_modifiers(&mut self, modifiers: &[Modifier], ctx: &EffectContext) {
        let mut batch = ChangeBatch::default();
        for modifier in modifiers {
            self.mark(&mut batch, modifier.attribute, true);
            let value = &mut self.values[modifier.attribute.index()];
            value.base = modifier.op.apply(value.base, modifier.magnitude);
            self.settle(modifier.attribute, &mut batch);
        }
        self.flush(batch, ctx);
    }

    /// Apply every modifier of an effect to base values
    pub fn apply_effect(&mut self, effect: &EffectDefinition, level: u32, ctx: &EffectContext) {
        debug!(effect = %effect.id, level, "applying effect");
        self.apply_modifiers(&effect.modifiers_at(level), ctx);
    }

    /// Grant an effect on behalf of a source
    ///
    /// Persistent effects become removable modifiers; instant ones change
    /// base values and leave nothing to revoke.
    pub fn grant_effect(
        &mut self,
        effect: &EffectDefinition,
        level: u32,
        source: GrantSource,
        ctx: &EffectContext,
    ) {
        if !effect.is_persistent() {
            self.apply_effect(effect, level, ctx);
            return;
        }
        debug!(effect = %effect.id, level, %source, "granting effect");
        self.grant_modifiers(&effect.modifiers_at(level), source, ctx);
    }

    pub fn grant_modifiers(
        &mut self,
        modifiers: &[Modifier],
        source: GrantSource,
        ctx: &EffectContext,
    ) {
        let mut batch = ChangeBatch::default();
        for modifier in modifiers {
            self.mark(&mut batch, modifier.attribute, true);
            self.granted.push(GrantedModifier {
                source: source.clone(),
                modifier: *modifier,
            });
            self.settle(modifier.attribute, &mut batch);
        }
        self.flush(batch, ctx);
    }

    /// Revoke every persistent modifier granted by `source`
    pub fn remove_effects_from(&mut self, source: &GrantSource, ctx: &EffectContext) -> usize {
        let mut affected = Vec::new();
        self.granted.retain(|g| {
            if &g.source == source {
                affected.push(g.modifier.attribute);
                false
            } else {
                true
            }
        });
        if affected.is_empty() {
            return 0;
        }

        debug!(%source, removed = affected.len(), "revoking effects");
        let removed = affected.len();
        let mut batch = ChangeBatch::default();
        for attribute in affected {
            self.mark(&mut batch, attribute, true);
            self.settle(attribute, &mut batch);
        }
        self.flush(batch, ctx);
        removed
    }

    // === Pipeline internals ===

    fn mark(&self, batch: &mut ChangeBatch, attribute: Attribute, direct: bool) {
        batch.touch(attribute, self.get(attribute), direct);
    }

    fn aggregate(&self, attribute: Attribute) -> Aggregate {
        let mut agg = Aggregate::default();
        for granted in self.granted.iter().filter(|g| g.modifier.attribute == attribute) {
            agg.add(granted.modifier.op, granted.modifier.magnitude);
        }
        agg
    }

    /// Fold persistent modifiers over base and clamp both values
    fn recompute(&mut self, attribute: Attribute) {
        let range = attribute.range();
        let values = &self.values;
        let lookup = |a: Attribute| values[a.index()].current;
        let base = range.clamp(values[attribute.index()].base, lookup);
        let current = range.clamp(self.aggregate(attribute).compute(base), lookup);
        self.values[attribute.index()] = AttributeValue { base, current };
    }

    fn set_base(&mut self, attribute: Attribute, base: f64, batch: &mut ChangeBatch) {
        self.mark(batch, attribute, false);
        self.values[attribute.index()].base = base;
        self.recompute(attribute);
    }

    /// Clamp, then run the attribute's side rule
    fn settle(&mut self, attribute: Attribute, batch: &mut ChangeBatch) {
        self.recompute(attribute);

        if let Some(derived) = attribute.derived() {
            let reduction = reduction_from_resistance(self.get(attribute));
            self.set_base(derived, reduction, batch);
        }
        if let Some(bounded) = attribute.bounds() {
            self.mark(batch, bounded, false);
            self.recompute(bounded);
        }

        match attribute {
            Attribute::Level | Attribute::MaxLevel => self.check_max_level(batch),
            Attribute::Experience => self.try_level_up(batch),
            _ => {}
        }
    }

    fn at_max_level(&self) -> bool {
        self.get(Attribute::Level) >= self.get(Attribute::MaxLevel)
    }

    fn check_max_level(&mut self, batch: &mut ChangeBatch) {
        if self.at_max_level() {
            self.set_base(Attribute::Experience, 0.0, batch);
            self.set_base(Attribute::MaxExperience, 0.0, batch);
        }
    }

    /// Advance at most one level per pipeline call
    fn try_level_up(&mut self, batch: &mut ChangeBatch) {
        if self.at_max_level() {
            self.set_base(Attribute::Experience, 0.0, batch);
            return;
        }

        let level = self.level();
        let Some(threshold) = self.levels.lookup_xp_threshold(level) else {
            debug!(level, "no experience row for level, skipping level-up");
            return;
        };
        if self.get(Attribute::Experience) < threshold {
            return;
        }

        let remaining = self.base(Attribute::Experience) - threshold;
        self.set_base(Attribute::Experience, remaining, batch);
        self.set_base(Attribute::Level, f64::from(level + 1), batch);
        if let Some(next) = self.levels.lookup_xp_threshold(level + 1) {
            self.set_base(Attribute::MaxExperience, next, batch);
        }
        self.check_max_level(batch);
        debug!(from = level, to = self.level(), "level up");
    }

    fn flush(&mut self, batch: ChangeBatch, ctx: &EffectContext) {
        for touched in batch.entries {
            let new_value = self.get(touched.attribute);
            if !touched.direct && new_value == touched.old_value {
                continue;
            }
            debug!(
                attribute = %touched.attribute,
                old = touched.old_value,
                new = new_value,
                "attribute changed"
            );
            self.events.broadcast(&AttributeChanged {
                attribute: touched.attribute,
                old_value: touched.old_value,
                new_value,
                context: ctx.clone(),
            });
        }
    }
}

impl EffectTarget for AttributeSet {
    fn grant_effect(
        &mut self,
        effect: &EffectDefinition,
        level: u32,
        source: GrantSource,
        ctx: &EffectContext,
    ) {
        AttributeSet::grant_effect(self, effect, level, source, ctx);
    }

    fn apply_effect(&mut self, effect: &EffectDefinition, level: u32, ctx: &EffectContext) {
        AttributeSet::apply_effect(self, effect, level, ctx);
    }

    fn grant_modifiers(&mut self, modifiers: &[Modifier], source: GrantSource, ctx: &EffectContext) {
        AttributeSet::grant_modifiers(self, modifiers, source, ctx);
    }

    fn remove_effects_from(&mut self, source: &GrantSource, ctx: &EffectContext) -> usize {
        AttributeSet::remove_effects_from(self, source, ctx)
    }
}

/// Initial base values for a new [`AttributeSet`]
#[derive(Debug, Clone)]
pub struct AttributeSetBuilder {
    levels: Arc<LevelTable>,
    overrides: Vec<Option<f64>>,
}

impl AttributeSetBuilder {
    pub fn base(mut self, attribute: Attribute, value: f64) -> Self {
        self.overrides[attribute.index()] = Some(value);
        self
    }

    pub fn bases(mut self, values: impl IntoIterator<Item = (Attribute, f64)>) -> Self {
        for (attribute, value) in values {
            self.overrides[attribute.index()] = Some(value);
        }
        self
    }

    /// Clamp every value and derive secondary stats once
    pub fn build(self) -> AttributeSet {
        let values = Attribute::all()
            .map(|a| AttributeValue::with_base(self.overrides[a.index()].unwrap_or(a.default_value())))
            .collect();
        let mut set = AttributeSet {
            values,
            granted: Vec::new(),
            levels: self.levels,
            events: Broadcaster::new(),
        };

        // Bounding attributes first so dependants clamp against settled values
        for attribute in Attribute::all().filter(|a| a.bounds().is_some()) {
            set.recompute(attribute);
        }
        for attribute in Attribute::all() {
            set.recompute(attribute);
        }

        let mut batch = ChangeBatch::default();
        for trigger in [Attribute::Armor, Attribute::EnvironmentalResistance] {
            if let Some(derived) = trigger.derived() {
                let reduction = reduction_from_resistance(set.get(trigger));
                set.set_base(derived, reduction, &mut batch);
            }
        }
        if self.overrides[Attribute::MaxExperience.index()].is_none() {
            if let Some(threshold) = set.levels.lookup_xp_threshold(set.level()) {
                set.set_base(Attribute::MaxExperience, threshold, &mut batch);
            }
        }
        set.check_max_level(&mut batch);
        set
    }
}
