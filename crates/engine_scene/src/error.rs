//! Scene-level error types.

use engine_component::EntityId;
use uuid::Uuid;

/// Errors returned by [`Scene`](crate::Scene) lookups and registrations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SceneError {
    /// No entity is registered under this name.
    #[error("no entity named '{0}'")]
    NotFound(String),

    /// Another entity is already registered under this name.
    #[error("an entity named '{0}' already exists")]
    DuplicateName(String),

    /// Another entity already carries this UUID.
    #[error("an entity with uuid {0} already exists")]
    DuplicateUuid(Uuid),

    /// The handle does not resolve to a live entity in this scene.
    #[error("{0} is not registered in this scene")]
    UnknownEntity(EntityId),

    /// Every entity ID this scene can hand out has been used.
    #[error("scene has run out of entity ids")]
    IdsExhausted,

    /// A runner rate is zero, negative, or not finite.
    #[error("{field} must be a positive finite rate, got {rate}")]
    InvalidRate { field: &'static str, rate: f64 },
}
