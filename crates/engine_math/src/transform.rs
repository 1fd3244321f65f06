//! 3D transform component.

use engine_component::Component;
use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Position, rotation, and scale in 3D space.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Transform3D {
    /// World-space position.
    pub position: Vec3,
    /// Rotation as a unit quaternion.
    pub rotation: Quat,
    /// Per-axis scale.
    pub scale: Vec3,
}

impl Transform3D {
    /// The identity transform: origin, no rotation, unit scale.
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };

    /// Create a new transform at `position` with default rotation and scale.
    #[must_use]
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Self::IDENTITY
        }
    }

    /// Compute the 4×4 model matrix for this transform.
    #[must_use]
    pub fn to_matrix(&self) -> glam::Mat4 {
        glam::Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }

    /// Move the transform in place.
    pub fn translate(&mut self, offset: Vec3) {
        self.position += offset;
    }

    /// Returns the transform moved by `offset`.
    #[must_use]
    pub fn translated(mut self, offset: Vec3) -> Self {
        self.translate(offset);
        self
    }

    /// Returns the transform rotated by `rotation`.
    #[must_use]
    pub fn rotated(mut self, rotation: Quat) -> Self {
        self.rotation = rotation * self.rotation;
        self
    }
}

impl Default for Transform3D {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Component for Transform3D {
    fn type_name() -> &'static str {
        "Transform3D"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_transform() {
        let t = Transform3D::default();
        assert_eq!(t.position, Vec3::ZERO);
        assert_eq!(t.rotation, Quat::IDENTITY);
        assert_eq!(t.scale, Vec3::ONE);
        assert_eq!(t.to_matrix(), glam::Mat4::IDENTITY);
    }

    #[test]
    fn test_translate() {
        let mut t = Transform3D::from_position(Vec3::new(1.0, 2.0, 3.0));
        t.translate(Vec3::X);
        assert_eq!(t.position, Vec3::new(2.0, 2.0, 3.0));
        let moved = t.translated(Vec3::NEG_Y);
        assert_eq!(moved.position, Vec3::new(2.0, 1.0, 3.0));
    }

    #[test]
    fn test_rotated_composes() {
        let quarter = Quat::from_rotation_z(std::f32::consts::FRAC_PI_2);
        let t = Transform3D::IDENTITY.rotated(quarter).rotated(quarter);
        let half = Quat::from_rotation_z(std::f32::consts::PI);
        assert!(t.rotation.abs_diff_eq(half, 1e-5));
    }

    #[test]
    fn test_serialization_roundtrip() {
        let t = Transform3D::from_position(Vec3::new(1.0, 2.0, 3.0))
            .rotated(Quat::from_rotation_y(0.5));
        let bytes = rmp_serde::to_vec(&t).unwrap();
        let restored: Transform3D = rmp_serde::from_slice(&bytes).unwrap();
        assert_eq!(t, restored);
    }
}
