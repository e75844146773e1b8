//! Ability tasks - deferred conditions an ability waits on
//!
//! An ability owns one [`TaskSet`]. Game code feeds it position updates,
//! overlaps and projectile destructions; each task completes at most once
//! and is then dropped. Ending the ability cancels whatever is still pending
//! without firing.

mod projectile;
mod range;

pub use projectile::{Projectile, ProjectileId, WaitForProjectileHit};
pub use range::{in_range_for_ability, RangeTarget, WaitInRange};

use crate::events::Broadcaster;
use crate::types::CharacterId;
use glam::DVec3;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tokio::sync::broadcast::Receiver;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TaskId(pub u32);

/// A pending wait
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Task {
    InRange(WaitInRange),
    ProjectileHit(WaitForProjectileHit),
}

/// Fired when a task completes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskEvent {
    InRange { task: TaskId, ability: String },
    ProjectileHit {
        task: TaskId,
        ability: String,
        projectile: ProjectileId,
    },
}

impl TaskEvent {
    pub fn task(&self) -> TaskId {
        match self {
            TaskEvent::InRange { task, .. } | TaskEvent::ProjectileHit { task, .. } => *task,
        }
    }
}

/// Tasks registered by one ability activation
#[derive(Debug, Clone)]
pub struct TaskSet {
    ability: String,
    next_id: u32,
    tasks: BTreeMap<TaskId, Task>,
    events: Broadcaster<TaskEvent>,
}

impl TaskSet {
    pub fn new(ability: impl Into<String>) -> Self {
        TaskSet {
            ability: ability.into(),
            next_id: 0,
            tasks: BTreeMap::new(),
            events: Broadcaster::new(),
        }
    }

    pub fn ability(&self) -> &str {
        &self.ability
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn is_pending(&self, id: TaskId) -> bool {
        self.tasks.contains_key(&id)
    }

    pub fn subscribe(&self) -> Receiver<TaskEvent> {
        self.events.subscribe()
    }

    // === Registration ===

    pub fn wait_in_range(&mut self, task: WaitInRange) -> TaskId {
        self.register(Task::InRange(task))
    }

    pub fn wait_for_projectile_hit(&mut self, projectile: ProjectileId) -> TaskId {
        self.register(Task::ProjectileHit(WaitForProjectileHit::new(projectile)))
    }

    fn register(&mut self, task: Task) -> TaskId {
        let id = TaskId(self.next_id);
        self.next_id += 1;
        debug!(ability = %self.ability, task = id.0, "task registered");
        self.tasks.insert(id, task);
        id
    }

    // === Notifications ===

    /// A character moved
    pub fn on_position(&mut self, character: CharacterId, position: DVec3) -> Vec<TaskEvent> {
        let mut done = Vec::new();
        for (id, task) in self.tasks.iter_mut() {
            if let Task::InRange(wait) = task {
                if wait.update_position(character, position) {
                    done.push(*id);
                }
            }
        }
        self.complete(done)
    }

    /// A character entered the caster's range sphere
    pub fn on_overlap(&mut self, other: CharacterId) -> Vec<TaskEvent> {
        let done: Vec<TaskId> = self
            .tasks
            .iter()
            .filter_map(|(id, task)| match task {
                Task::InRange(wait) if wait.overlaps(other) => Some(*id),
                _ => None,
            })
            .collect();
        self.complete(done)
    }

    /// A projectile was destroyed
    pub fn on_projectile_destroyed(&mut self, projectile: ProjectileId) -> Vec<TaskEvent> {
        let done: Vec<TaskId> = self
            .tasks
            .iter()
            .filter_map(|(id, task)| match task {
                Task::ProjectileHit(wait) if wait.matches(projectile) => Some(*id),
                _ => None,
            })
            .collect();
        self.complete(done)
    }

    /// Deregister one task without firing
    pub fn cancel(&mut self, id: TaskId) -> bool {
        self.tasks.remove(&id).is_some()
    }

    /// Ability ended: deregister everything without firing
    pub fn cancel_all(&mut self) -> usize {
        let cancelled = self.tasks.len();
        self.tasks.clear();
        if cancelled > 0 {
            debug!(ability = %self.ability, cancelled, "tasks cancelled");
        }
        cancelled
    }

    fn complete(&mut self, done: Vec<TaskId>) -> Vec<TaskEvent> {
        let mut fired = Vec::with_capacity(done.len());
        for id in done {
            let Some(task) = self.tasks.remove(&id) else {
                continue;
            };
            let event = match task {
                Task::InRange(_) => TaskEvent::InRange {
                    task: id,
                    ability: self.ability.clone(),
                },
                Task::ProjectileHit(wait) => TaskEvent::ProjectileHit {
                    task: id,
                    ability: self.ability.clone(),
                    projectile: wait.projectile,
                },
            };
            debug!(ability = %self.ability, task = id.0, "task completed");
            self.events.broadcast(&event);
            fired.push(event);
        }
        fired
    }
}
