//! Contact data passed from physics to scripts.

use engine_component::EntityId;
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Describes a contact between two bodies.
///
/// Produced by the physics layer and delivered to scripts as-is. The scene
/// only reads `entity` to decide which script receives it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Collision {
    /// The entity receiving the event.
    pub entity: EntityId,
    /// The other participant.
    pub other: EntityId,
    /// World-space contact point.
    pub contact_point: Vec3,
    /// Contact normal, pointing from `other` towards `entity`.
    pub normal: Vec3,
}

impl Collision {
    /// Create a contact between `entity` and `other` with no geometry.
    #[must_use]
    pub fn between(entity: EntityId, other: EntityId) -> Self {
        Self {
            entity,
            other,
            contact_point: Vec3::ZERO,
            normal: Vec3::ZERO,
        }
    }

    /// The same contact as seen from the other participant.
    #[must_use]
    pub fn mirrored(&self) -> Self {
        Self {
            entity: self.other,
            other: self.entity,
            contact_point: self.contact_point,
            normal: -self.normal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mirrored_swaps_participants() {
        let c = Collision {
            entity: EntityId::from_raw(1),
            other: EntityId::from_raw(2),
            contact_point: Vec3::new(1.0, 0.0, 0.0),
            normal: Vec3::Y,
        };
        let m = c.mirrored();
        assert_eq!(m.entity, EntityId::from_raw(2));
        assert_eq!(m.other, EntityId::from_raw(1));
        assert_eq!(m.contact_point, c.contact_point);
        assert_eq!(m.normal, Vec3::NEG_Y);
        assert_eq!(m.mirrored(), c);
    }

    #[test]
    fn test_serialization_roundtrip() {
        let c = Collision {
            entity: EntityId::from_raw(3),
            other: EntityId::from_raw(9),
            contact_point: Vec3::new(0.5, 0.0, 0.0),
            normal: Vec3::X,
        };
        let bytes = rmp_serde::to_vec(&c).unwrap();
        let restored: Collision = rmp_serde::from_slice(&bytes).unwrap();
        assert_eq!(restored, c);
    }
}
