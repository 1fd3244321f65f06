//! Naive sphere-overlap contact tracking.
//!
//! Stands in for a physics engine: each step it tests every pair of entities
//! that have both a [`Transform3D`] and a [`Collider`], and turns the change
//! in overlapping pairs into enter / stay / exit events for both participants.

use std::collections::{BTreeMap, BTreeSet};

use engine_component::EntityId;
use engine_math::{Collision, Transform3D, Vec3};
use engine_scene::{ContactKind, ContactPhase, Scene};

use crate::components::Collider;

/// A contact ready to hand to [`Scene::dispatch_contact`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactEvent {
    pub kind: ContactKind,
    pub phase: ContactPhase,
    pub collision: Collision,
}

/// Remembers which pairs overlapped on the previous step.
#[derive(Debug, Default)]
pub struct ContactTracker {
    /// Overlapping pairs, smaller ID first.
    active: BTreeSet<(EntityId, EntityId)>,
    /// Kind of each active pair, parallel to `active` by key.
    kinds: BTreeMap<(EntityId, EntityId), ContactKind>,
}

struct Body {
    id: EntityId,
    position: Vec3,
    collider: Collider,
}

impl ContactTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of pairs currently in contact.
    #[must_use]
    pub fn active_pairs(&self) -> usize {
        self.active.len()
    }

    /// Test all pairs and return this step's events, two per pair (one from
    /// each side).
    pub fn step(&mut self, scene: &Scene) -> Vec<ContactEvent> {
        let bodies: Vec<Body> = scene
            .entity_ids()
            .into_iter()
            .filter_map(|id| {
                let entity = scene.entity(id)?;
                Some(Body {
                    id,
                    position: entity.get::<Transform3D>()?.position,
                    collider: *entity.get::<Collider>()?,
                })
            })
            .collect();

        let mut events = Vec::new();
        let mut current = BTreeSet::new();

        for (i, a) in bodies.iter().enumerate() {
            for b in &bodies[i + 1..] {
                let offset = a.position - b.position;
                let reach = a.collider.radius + b.collider.radius;
                if offset.length_squared() > reach * reach {
                    continue;
                }

                let pair = (a.id, b.id);
                let kind = if a.collider.trigger || b.collider.trigger {
                    ContactKind::Trigger
                } else {
                    ContactKind::Collision
                };
                let phase = if self.active.contains(&pair) {
                    ContactPhase::Stay
                } else {
                    ContactPhase::Enter
                };
                let collision = Collision {
                    entity: a.id,
                    other: b.id,
                    contact_point: b.position + offset.normalize_or_zero() * b.collider.radius,
                    normal: offset.normalize_or_zero(),
                };
                push_both(&mut events, kind, phase, collision);
                current.insert(pair);
                self.kinds.insert(pair, kind);
            }
        }

        for pair in self.active.difference(&current) {
            let kind = self
                .kinds
                .get(pair)
                .copied()
                .unwrap_or(ContactKind::Collision);
            push_both(
                &mut events,
                kind,
                ContactPhase::Exit,
                Collision::between(pair.0, pair.1),
            );
        }

        self.kinds.retain(|pair, _| current.contains(pair));
        self.active = current;
        events
    }
}

fn push_both(
    events: &mut Vec<ContactEvent>,
    kind: ContactKind,
    phase: ContactPhase,
    collision: Collision,
) {
    events.push(ContactEvent {
        kind,
        phase,
        collision,
    });
    events.push(ContactEvent {
        kind,
        phase,
        collision: collision.mirrored(),
    });
}
