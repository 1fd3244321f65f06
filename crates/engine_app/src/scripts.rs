//! Demo behavior scripts.

use engine_math::{Collision, Transform3D};
use engine_scene::{Entity, FrameTime, Script};
use tracing::{debug, info};

use crate::components::{Health, Velocity};

/// Moves its entity by its velocity every physics step, takes damage from
/// solid contacts, and heals inside trigger volumes.
#[derive(Debug, Clone)]
pub struct Actor {
    /// Damage taken when a solid contact starts.
    pub impact_damage: f32,
    /// Damage taken per physics step while a solid contact persists.
    pub grind_damage: f32,
    /// Health restored when entering a trigger.
    pub pickup_heal: f32,
}

impl Default for Actor {
    fn default() -> Self {
        Self {
            impact_damage: 20.0,
            grind_damage: 1.0,
            pickup_heal: 15.0,
        }
    }
}

impl Actor {
    fn hurt(entity: &mut Entity, amount: f32) {
        if let Some(health) = entity.get_mut::<Health>() {
            health.damage(amount);
        }
    }
}

impl Script for Actor {
    fn on_enable(&mut self, entity: &mut Entity) {
        debug!(entity = %entity.id(), name = entity.name(), "actor enabled");
    }

    fn on_destroy(&mut self, entity: &mut Entity) {
        info!(entity = %entity.id(), name = entity.name(), "actor removed");
    }

    fn physics_update(&mut self, entity: &mut Entity, time: FrameTime) {
        let Some(velocity) = entity.get::<Velocity>().copied() else {
            return;
        };
        if let Some(transform) = entity.get_mut::<Transform3D>() {
            transform.translate(velocity.linear * time.dt as f32);
        }
    }

    fn on_collision_enter(&mut self, entity: &mut Entity, collision: &Collision) {
        info!(entity = %entity.id(), other = %collision.other, "impact");
        Self::hurt(entity, self.impact_damage);
    }

    fn on_collision_stay(&mut self, entity: &mut Entity, _collision: &Collision) {
        Self::hurt(entity, self.grind_damage);
    }

    fn on_trigger_enter(&mut self, entity: &mut Entity, collision: &Collision) {
        let id = entity.id();
        if let Some(health) = entity.get_mut::<Health>() {
            health.heal(self.pickup_heal);
            info!(entity = %id, trigger = %collision.other, hp = health.current, "healed");
        }
    }
}
