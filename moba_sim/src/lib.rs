//! moba_sim - Headless duel simulator built on moba_core

pub mod roster;
pub mod simulation;

pub use roster::{default_roster, load_roster, CharacterTemplate, Roster, RosterError};
pub use simulation::{reach, Combatant, CombatantStats, DuelReport, DuelSimulation};
