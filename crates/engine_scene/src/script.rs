//! Scriptable-entity hooks.
//!
//! A [`Script`] supplies behavior for one entity. Every hook has a no-op
//! default, so an implementation overrides only what it needs. Scripts are
//! registered with [`Scene::attach_script`](crate::Scene::attach_script) and
//! invoked by whatever drives the frame and physics steps.

use engine_math::Collision;

use crate::entity::Entity;

/// Timing of the frame or physics step a hook runs in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameTime {
    /// Step counter, starting at 1 for the first step.
    pub frame: u64,
    /// Seconds covered by this step.
    pub dt: f64,
}

impl FrameTime {
    /// Create frame timing info.
    #[must_use]
    pub const fn new(frame: u64, dt: f64) -> Self {
        Self { frame, dt }
    }
}

/// Whether a contact is a solid collision or a trigger overlap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContactKind {
    /// Two solid bodies touched.
    Collision,
    /// A body overlapped a trigger volume.
    Trigger,
}

/// Where a contact is in its lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContactPhase {
    /// First step of contact.
    Enter,
    /// Contact persists from the previous step.
    Stay,
    /// Contact ended this step.
    Exit,
}

/// Behavior attached to a single entity.
///
/// Hooks run synchronously and must not block: the dispatcher runs them one
/// after another in ascending entity order within a phase.
#[allow(unused_variables)]
pub trait Script: Send {
    /// The script became active: on attach, or when re-enabled.
    fn on_enable(&mut self, entity: &mut Entity) {}

    /// The script was disabled or is about to be detached.
    fn on_disable(&mut self, entity: &mut Entity) {}

    /// The entity (or the script) is being torn down.
    fn on_destroy(&mut self, entity: &mut Entity) {}

    /// Called once per frame.
    fn update(&mut self, entity: &mut Entity, time: FrameTime) {}

    /// Called once per fixed physics step.
    fn physics_update(&mut self, entity: &mut Entity, time: FrameTime) {}

    /// Solid contact started.
    fn on_collision_enter(&mut self, entity: &mut Entity, collision: &Collision) {}

    /// Solid contact ended.
    fn on_collision_exit(&mut self, entity: &mut Entity, collision: &Collision) {}

    /// Solid contact persists.
    fn on_collision_stay(&mut self, entity: &mut Entity, collision: &Collision) {}

    /// Trigger overlap started.
    fn on_trigger_enter(&mut self, entity: &mut Entity, collision: &Collision) {}

    /// Trigger overlap ended.
    fn on_trigger_exit(&mut self, entity: &mut Entity, collision: &Collision) {}

    /// Trigger overlap persists.
    fn on_trigger_stay(&mut self, entity: &mut Entity, collision: &Collision) {}
}

/// Route a contact to the matching hook.
pub(crate) fn dispatch_contact(
    script: &mut dyn Script,
    entity: &mut Entity,
    kind: ContactKind,
    phase: ContactPhase,
    collision: &Collision,
) {
    match (kind, phase) {
        (ContactKind::Collision, ContactPhase::Enter) => script.on_collision_enter(entity, collision),
        (ContactKind::Collision, ContactPhase::Stay) => script.on_collision_stay(entity, collision),
        (ContactKind::Collision, ContactPhase::Exit) => script.on_collision_exit(entity, collision),
        (ContactKind::Trigger, ContactPhase::Enter) => script.on_trigger_enter(entity, collision),
        (ContactKind::Trigger, ContactPhase::Stay) => script.on_trigger_stay(entity, collision),
        (ContactKind::Trigger, ContactPhase::Exit) => script.on_trigger_exit(entity, collision),
    }
}

/// A registered script and its enabled flag.
pub(crate) struct ScriptSlot {
    pub(crate) script: Box<dyn Script>,
    pub(crate) enabled: bool,
}

#[cfg(test)]
mod tests {
    use engine_component::EntityId;
    use uuid::Uuid;

    use super::*;

    /// Script with no overrides: every hook must be callable.
    struct Inert;

    impl Script for Inert {}

    #[derive(Default)]
    struct Recorder {
        seen: Vec<&'static str>,
    }

    impl Script for Recorder {
        fn on_collision_enter(&mut self, _: &mut Entity, _: &Collision) {
            self.seen.push("collision_enter");
        }
        fn on_collision_stay(&mut self, _: &mut Entity, _: &Collision) {
            self.seen.push("collision_stay");
        }
        fn on_collision_exit(&mut self, _: &mut Entity, _: &Collision) {
            self.seen.push("collision_exit");
        }
        fn on_trigger_enter(&mut self, _: &mut Entity, _: &Collision) {
            self.seen.push("trigger_enter");
        }
        fn on_trigger_stay(&mut self, _: &mut Entity, _: &Collision) {
            self.seen.push("trigger_stay");
        }
        fn on_trigger_exit(&mut self, _: &mut Entity, _: &Collision) {
            self.seen.push("trigger_exit");
        }
    }

    fn entity() -> Entity {
        Entity::new(EntityId::from_raw(1), Uuid::new_v4(), None)
    }

    #[test]
    fn test_default_hooks_are_noops() {
        let mut e = entity();
        let c = Collision::between(e.id(), EntityId::from_raw(2));
        let mut s = Inert;
        s.on_enable(&mut e);
        s.update(&mut e, FrameTime::new(1, 0.016));
        s.physics_update(&mut e, FrameTime::new(1, 0.02));
        s.on_trigger_stay(&mut e, &c);
        s.on_disable(&mut e);
        s.on_destroy(&mut e);
        assert!(e.is_empty());
    }

    #[test]
    fn test_dispatch_contact_routes_every_pair() {
        let mut e = entity();
        let c = Collision::between(e.id(), EntityId::from_raw(2));
        let mut r = Recorder::default();
        for kind in [ContactKind::Collision, ContactKind::Trigger] {
            for phase in [ContactPhase::Enter, ContactPhase::Stay, ContactPhase::Exit] {
                dispatch_contact(&mut r, &mut e, kind, phase, &c);
            }
        }
        assert_eq!(
            r.seen,
            vec![
                "collision_enter",
                "collision_stay",
                "collision_exit",
                "trigger_enter",
                "trigger_stay",
                "trigger_exit",
            ]
        );
    }
}
