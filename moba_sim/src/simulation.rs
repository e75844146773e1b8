//! Duel simulation - two characters trading abilities on a fixed tick

use moba_core::attribute::{Attribute, AttributeChanged};
use moba_core::combat::CombatResult;
use moba_core::config::{CombatConstants, ContentPack};
use moba_core::damage::{AbilityData, EffectSpec};
use moba_core::events;
use moba_core::inventory::ItemKind;
use moba_core::task::{
    in_range_for_ability, Projectile, RangeTarget, TaskEvent, TaskSet, WaitInRange,
};
use moba_core::types::{DamageType, ItemId};
use moba_core::Character;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tokio::sync::broadcast::Receiver;
use tracing::{debug, info};

/// Drink a potion below this health fraction
const POTION_THRESHOLD: f64 = 0.35;
/// Cast heals below this health fraction
const HEAL_THRESHOLD: f64 = 0.6;
/// Movement stops at this fraction of the engage range
const CLOSE_IN: f64 = 0.9;

/// Running totals for one side of the duel
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CombatantStats {
    pub name: String,
    pub damage_dealt: f64,
    pub healing_done: f64,
    pub casts: u32,
    pub potions_used: u32,
    pub health_remaining: f64,
    pub attribute_changes: usize,
}

/// One character plus the bookkeeping the duel needs for it
pub struct Combatant {
    pub character: Character,
    pub abilities: Vec<AbilityData>,
    cooldowns: HashMap<String, f64>,
    approach: TaskSet,
    engaged: bool,
    changes: Receiver<AttributeChanged>,
    stats: CombatantStats,
}

impl Combatant {
    pub fn new(character: Character, abilities: Vec<AbilityData>) -> Self {
        let changes = character.attributes.subscribe();
        let stats = CombatantStats {
            name: character.name.clone(),
            ..CombatantStats::default()
        };
        Combatant {
            character,
            abilities,
            cooldowns: HashMap::new(),
            approach: TaskSet::new("approach"),
            engaged: false,
            changes,
            stats,
        }
    }

    fn count_changes(&mut self) {
        self.stats.attribute_changes += events::drain(&mut self.changes).len();
    }

    fn ready(&self, ability: &AbilityData) -> bool {
        self.cooldowns.get(&ability.id).copied().unwrap_or(0.0) <= 0.0
    }

    /// Close enough for every damaging ability
    fn engage_range(&self) -> f64 {
        self.abilities
            .iter()
            .filter(|a| !a.passive && a.damage_type.is_damage())
            .map(|a| reach(&self.character, a))
            .fold(None, |acc: Option<f64>, r| Some(acc.map_or(r, |m| m.min(r))))
            .unwrap_or_else(|| self.character.get(Attribute::AttackRange))
    }

    fn potion(&self) -> Option<ItemId> {
        let loadout = &self.character.loadout;
        loadout
            .inventory()
            .items()
            .find(|(_, item)| {
                loadout
                    .catalog()
                    .get(&item.class)
                    .is_some_and(|def| def.kind == ItemKind::Consumable)
            })
            .map(|(_, item)| item.id)
    }
}

/// How far an ability reaches for this character
///
/// Attacks use the longest equipped weapon range, or the unarmed range.
pub fn reach(character: &Character, ability: &AbilityData) -> f64 {
    if !ability.is_attack() {
        return ability.range;
    }
    let weapon = character
        .get(Attribute::MainHandAttackRange)
        .max(character.get(Attribute::OffHandAttackRange));
    if weapon > 0.0 {
        weapon
    } else {
        character.get(Attribute::AttackRange)
    }
}

struct InFlight {
    caster: usize,
    target: usize,
    spec: EffectSpec,
    projectile: Projectile,
    tasks: TaskSet,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DuelReport {
    pub duration: f64,
    pub winner: Option<String>,
    pub kill_time: Option<f64>,
    pub combatants: Vec<CombatantStats>,
}

/// A fixed-step duel between two combatants
pub struct DuelSimulation<R: Rng> {
    combatants: [Combatant; 2],
    constants: CombatConstants,
    regen: Option<AbilityData>,
    in_flight: Vec<InFlight>,
    time: f64,
    next_regen: f64,
    kill_time: Option<f64>,
    rng: R,
}

impl<R: Rng> DuelSimulation<R> {
    pub fn new(first: Combatant, second: Combatant, content: &ContentPack, rng: R) -> Self {
        let mut sim = DuelSimulation {
            combatants: [first, second],
            constants: content.constants.combat.clone(),
            regen: content.abilities.health_regen().cloned(),
            in_flight: Vec::new(),
            time: 0.0,
            next_regen: content.constants.combat.regen_period,
            kill_time: None,
            rng,
        };
        for i in 0..2 {
            let opponent = &sim.combatants[1 - i].character;
            let (opponent_id, opponent_pos) = (opponent.id, opponent.position);
            let me = &mut sim.combatants[i];
            let wait = WaitInRange::new(
                me.character.id,
                RangeTarget::Character(opponent_id),
                me.engage_range(),
                me.character.position,
            );
            me.approach.wait_in_range(wait);
            if !me.approach.on_position(opponent_id, opponent_pos).is_empty() {
                me.engaged = true;
            }
        }
        sim
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn combatant(&self, index: usize) -> Option<&Combatant> {
        self.combatants.get(index)
    }

    pub fn is_over(&self) -> bool {
        self.combatants.iter().any(|c| !c.character.is_alive())
    }

    /// Step until someone dies or `duration` elapses
    pub fn run(mut self, duration: f64, tick: f64) -> DuelReport {
        let tick = if tick > 0.0 { tick } else { 0.1 };
        while self.time < duration && !self.is_over() {
            self.step(tick);
        }
        self.report()
    }

    pub fn step(&mut self, dt: f64) {
        self.advance_projectiles(dt);
        for i in 0..2 {
            if self.is_over() {
                break;
            }
            self.act(i, dt);
        }
        self.time += dt;

        if self.time >= self.next_regen {
            self.next_regen += self.constants.regen_period.max(dt);
            self.regenerate();
        }
        for combatant in self.combatants.iter_mut() {
            combatant.count_changes();
        }
        if self.kill_time.is_none() && self.is_over() {
            self.kill_time = Some(self.time);
        }
    }

    pub fn report(mut self) -> DuelReport {
        let winner = match (
            self.combatants[0].character.is_alive(),
            self.combatants[1].character.is_alive(),
        ) {
            (true, false) => Some(self.combatants[0].character.name.clone()),
            (false, true) => Some(self.combatants[1].character.name.clone()),
            _ => None,
        };
        let combatants = self
            .combatants
            .iter_mut()
            .map(|c| {
                c.stats.health_remaining = c.character.get(Attribute::Health);
                c.count_changes();
                c.stats.clone()
            })
            .collect();
        DuelReport {
            duration: self.time,
            winner,
            kill_time: self.kill_time,
            combatants,
        }
    }

    // === Turn logic ===

    fn act(&mut self, i: usize, dt: f64) {
        let j = 1 - i;
        for remaining in self.combatants[i].cooldowns.values_mut() {
            *remaining = (*remaining - dt).max(0.0);
        }

        if !self.combatants[i].engaged {
            self.advance_toward(i, dt);
        }

        if self.combatants[i].character.attributes.health_fraction() < POTION_THRESHOLD {
            if let Some(potion) = self.combatants[i].potion() {
                if self.combatants[i].character.consume(potion).is_ok() {
                    self.combatants[i].stats.potions_used += 1;
                    debug!(who = %self.combatants[i].character.name, "drank a potion");
                }
            }
        }

        let me = &self.combatants[i];
        let opponent_pos = self.combatants[j].character.position;
        let wounded = me.character.attributes.health_fraction() < HEAL_THRESHOLD;
        let choice = me.abilities.iter().find_map(|ability| {
            if ability.passive || !me.ready(ability) || !me.character.can_afford(ability) {
                return None;
            }
            match ability.damage_type {
                DamageType::Heal if wounded => Some((ability.clone(), i)),
                damage if damage.is_damage()
                    && in_range_for_ability(
                        me.character.position,
                        opponent_pos,
                        reach(&me.character, ability),
                    ) =>
                {
                    Some((ability.clone(), j))
                }
                _ => None,
            }
        });

        if let Some((ability, target)) = choice {
            self.fire(i, target, &ability);
        }
    }

    fn advance_toward(&mut self, i: usize, dt: f64) {
        let j = 1 - i;
        let target = self.combatants[j].character.position;
        let me = &mut self.combatants[i];
        let range = me.engage_range();
        let offset = target - me.character.position;
        let distance = offset.length();
        let step = (me.character.get(Attribute::MovementSpeed) * dt)
            .min((distance - range * CLOSE_IN).max(0.0));
        if distance > 0.0 {
            me.character.position += offset / distance * step;
        }

        let (id, position) = (me.character.id, me.character.position);
        for combatant in self.combatants.iter_mut() {
            let fired = combatant.approach.on_position(id, position);
            if fired.iter().any(|e| matches!(e, TaskEvent::InRange { .. })) {
                combatant.engaged = true;
                debug!(who = %combatant.character.name, "in range");
            }
        }
    }

    fn fire(&mut self, caster: usize, target: usize, ability: &AbilityData) {
        let cooldown = self.combatants[caster]
            .character
            .cooldown_for(ability, &self.constants);
        let me = &mut self.combatants[caster];
        if !me.character.spend_mana(ability) {
            return;
        }
        me.cooldowns.insert(ability.id.clone(), cooldown);
        me.stats.casts += 1;

        let target_id = self.combatants[target].character.id;
        let spec = self.combatants[caster]
            .character
            .create_spec(ability, target_id, &mut self.rng);
        debug!(
            caster = %self.combatants[caster].character.name,
            ability = %ability.id,
            t = self.time,
            "cast"
        );

        match ability.projectile_speed.filter(|_| ability.is_projectile()) {
            Some(speed) if target != caster => {
                let projectile =
                    Projectile::launch(self.combatants[caster].character.position, target_id, speed);
                let mut tasks = TaskSet::new(ability.id.clone());
                tasks.wait_for_projectile_hit(projectile.id);
                self.in_flight.push(InFlight {
                    caster,
                    target,
                    spec,
                    projectile,
                    tasks,
                });
            }
            _ => self.apply(caster, target, &spec),
        }
    }

    fn advance_projectiles(&mut self, dt: f64) {
        let flights = std::mem::take(&mut self.in_flight);
        for mut flight in flights {
            let target = &self.combatants[flight.target].character;
            if !target.is_alive() {
                flight.tasks.cancel_all();
                continue;
            }
            if !flight.projectile.advance(target.position, dt) {
                self.in_flight.push(flight);
                continue;
            }
            let hits = flight.tasks.on_projectile_destroyed(flight.projectile.id);
            if hits
                .iter()
                .any(|e| matches!(e, TaskEvent::ProjectileHit { .. }))
            {
                self.apply(flight.caster, flight.target, &flight.spec);
            }
        }
    }

    fn apply(&mut self, caster: usize, target: usize, spec: &EffectSpec) {
        let result: CombatResult = self.combatants[target].character.receive(spec);
        let stats = &mut self.combatants[caster].stats;
        if result.is_heal {
            stats.healing_done += result.healing_done();
        } else {
            stats.damage_dealt += result.damage_dealt();
        }
        if result.is_killing_blow {
            info!(
                killer = %self.combatants[caster].character.name,
                victim = %self.combatants[target].character.name,
                ability = %result.ability_id,
                t = self.time,
                "killing blow"
            );
        }
    }

    fn regenerate(&mut self) {
        for combatant in self.combatants.iter_mut() {
            if !combatant.character.is_alive() {
                continue;
            }
            if let Some(regen) = &self.regen {
                let result = combatant.character.tick_regen(regen, &mut self.rng);
                combatant.stats.healing_done += result.healing_done();
            }
            combatant.character.tick_mana(1.0);
        }
    }
}
