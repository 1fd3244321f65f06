//! Scene-local entity handles.

use serde::{Deserialize, Serialize};

/// Handle of one entity inside one scene.
///
/// Handles are plain numbers that start at 1 and are never reused by the
/// scene that issued them. A handle kept after its entity was destroyed
/// resolves to nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(u64);

impl EntityId {
    #[must_use]
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Entity({})", self.0)
    }
}

/// Hands out entity handles in increasing order.
///
/// Once `u64::MAX` would be reached the allocator is exhausted and
/// [`EntityAllocator::allocate`] returns `None` from then on, so a handle is
/// never issued twice.
#[derive(Debug, Clone)]
pub struct EntityAllocator {
    next: Option<u64>,
}

impl EntityAllocator {
    #[must_use]
    pub const fn new() -> Self {
        Self { next: Some(1) }
    }

    /// Continue numbering after `last`, e.g. when a scene already holds
    /// handles up to it.
    #[must_use]
    pub const fn resume_after(last: EntityId) -> Self {
        Self {
            next: last.0.checked_add(1),
        }
    }

    pub fn allocate(&mut self) -> Option<EntityId> {
        let id = self.next?;
        self.next = id.checked_add(1);
        Some(EntityId(id))
    }

    /// The most recently issued handle, if any.
    #[must_use]
    pub fn last_issued(&self) -> Option<EntityId> {
        match self.next {
            Some(1) => None,
            Some(next) => Some(EntityId(next - 1)),
            None => Some(EntityId(u64::MAX)),
        }
    }
}

impl Default for EntityAllocator {
    fn default() -> Self {
        Self::new()
    }
}
