//! # engine_math
//!
//! Math types for the scene layer. Re-exports [`glam`] for linear algebra and
//! defines the spatial [`Transform3D`] component plus the [`Collision`] value
//! that physics hands to scripts.

pub mod collision;
pub mod transform;

// Re-export glam types for convenience.
pub use glam::{EulerRot, Mat3, Mat4, Quat, Vec2, Vec3, Vec4};

pub use collision::Collision;
pub use transform::Transform3D;
