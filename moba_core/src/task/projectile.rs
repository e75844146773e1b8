//! Projectiles and the task that waits for one to land

use crate::types::CharacterId;
use glam::DVec3;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_PROJECTILE: AtomicU64 = AtomicU64::new(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProjectileId(pub u64);

impl ProjectileId {
    pub fn next() -> Self {
        ProjectileId(NEXT_PROJECTILE.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for ProjectileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "proj#{}", self.0)
    }
}

/// A homing projectile flying toward a character
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    pub id: ProjectileId,
    pub target: CharacterId,
    pub position: DVec3,
    pub speed: f64,
}

impl Projectile {
    pub fn launch(origin: DVec3, target: CharacterId, speed: f64) -> Self {
        Projectile {
            id: ProjectileId::next(),
            target,
            position: origin,
            speed,
        }
    }

    /// Move toward `target_position`; returns true on arrival
    pub fn advance(&mut self, target_position: DVec3, dt: f64) -> bool {
        let to_target = target_position - self.position;
        let remaining = to_target.length();
        let step = self.speed * dt;
        if remaining <= step {
            self.position = target_position;
            return true;
        }
        self.position += to_target / remaining * step;
        false
    }

    /// Seconds to cover `distance`, zero for non-positive speeds
    pub fn flight_time(distance: f64, speed: f64) -> f64 {
        if speed <= 0.0 {
            0.0
        } else {
            distance / speed
        }
    }
}

/// Completes when the watched projectile is destroyed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaitForProjectileHit {
    pub projectile: ProjectileId,
}

impl WaitForProjectileHit {
    pub fn new(projectile: ProjectileId) -> Self {
        WaitForProjectileHit { projectile }
    }

    pub fn matches(&self, destroyed: ProjectileId) -> bool {
        self.projectile == destroyed
    }
}
