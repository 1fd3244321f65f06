//! Unordered, duplicate-permitting component storage for a single entity.
//!
//! A [`Bag`] owns every component attached to one entity. Components are
//! addressed by the [`ComponentHandle`] issued when they were added; removal
//! swap-removes by position, so insertion order is not preserved.

use std::any::Any;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::component::{Component, ComponentTypeId};
use crate::entity::EntityId;

/// Addresses one component inside one entity's [`Bag`].
///
/// Handles are scoped to their owner: a handle issued by one bag never matches
/// a component in another, and serials are never reused by the same bag, not
/// even after [`Bag::clear`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ComponentHandle {
    /// The entity whose bag issued this handle.
    pub owner: EntityId,
    /// Per-bag serial number.
    pub serial: u64,
}

impl std::fmt::Display for ComponentHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}#{}", self.owner, self.serial)
    }
}

/// One stored component with its handle and type metadata.
struct Slot {
    handle: ComponentHandle,
    type_id: ComponentTypeId,
    type_name: &'static str,
    value: Box<dyn Any + Send + Sync>,
}

impl Slot {
    fn is<T: Component>(&self) -> bool {
        self.type_id == T::component_type_id() && self.value.is::<T>()
    }
}

/// The component container owned by a single entity.
pub struct Bag {
    owner: EntityId,
    next_serial: u64,
    slots: Vec<Slot>,
}

impl Bag {
    /// Create an empty bag for the given owner.
    #[must_use]
    pub fn new(owner: EntityId) -> Self {
        Self {
            owner,
            next_serial: 0,
            slots: Vec::new(),
        }
    }

    /// Add a component. No uniqueness check is made: several components of
    /// the same type may coexist.
    pub fn add<T: Component>(&mut self, component: T) -> ComponentHandle {
        let handle = ComponentHandle {
            owner: self.owner,
            serial: self.next_serial,
        };
        self.next_serial += 1;
        self.slots.push(Slot {
            handle,
            type_id: T::component_type_id(),
            type_name: T::type_name(),
            value: Box::new(component),
        });
        handle
    }

    fn position(&self, handle: ComponentHandle) -> Option<usize> {
        if handle.owner != self.owner {
            return None;
        }
        self.slots.iter().position(|slot| slot.handle == handle)
    }

    /// Remove the component addressed by `handle`, dropping it.
    ///
    /// Returns `false` (and changes nothing) if the handle does not address a
    /// component in this bag.
    pub fn remove(&mut self, handle: ComponentHandle) -> bool {
        match self.position(handle) {
            Some(index) => {
                self.slots.swap_remove(index);
                true
            }
            None => {
                trace!(owner = %self.owner, %handle, "remove of absent component ignored");
                false
            }
        }
    }

    /// Remove and return the component addressed by `handle` if it is a `T`.
    ///
    /// The bag is left untouched when the handle is absent or addresses a
    /// component of another type.
    pub fn take<T: Component>(&mut self, handle: ComponentHandle) -> Option<T> {
        let index = self.position(handle)?;
        if !self.slots[index].is::<T>() {
            return None;
        }
        let slot = self.slots.swap_remove(index);
        slot.value.downcast::<T>().ok().map(|boxed| *boxed)
    }

    /// Drop every component. The bag stays usable afterwards.
    pub fn clear(&mut self) {
        self.slots.clear();
    }

    /// Returns `true` if `handle` addresses a component in this bag.
    #[must_use]
    pub fn contains(&self, handle: ComponentHandle) -> bool {
        self.position(handle).is_some()
    }

    /// Returns the first component of type `T`, if any.
    #[must_use]
    pub fn find<T: Component>(&self) -> Option<&T> {
        self.slots
            .iter()
            .find(|slot| slot.is::<T>())
            .and_then(|slot| slot.value.downcast_ref::<T>())
    }

    /// Returns a mutable reference to the first component of type `T`, if any.
    #[must_use]
    pub fn find_mut<T: Component>(&mut self) -> Option<&mut T> {
        self.slots
            .iter_mut()
            .find(|slot| slot.is::<T>())
            .and_then(|slot| slot.value.downcast_mut::<T>())
    }

    /// Returns the component addressed by `handle` if it is a `T`.
    #[must_use]
    pub fn get<T: Component>(&self, handle: ComponentHandle) -> Option<&T> {
        let index = self.position(handle)?;
        self.slots[index].value.downcast_ref::<T>()
    }

    /// Returns a mutable reference to the component addressed by `handle` if
    /// it is a `T`.
    #[must_use]
    pub fn get_mut<T: Component>(&mut self, handle: ComponentHandle) -> Option<&mut T> {
        let index = self.position(handle)?;
        self.slots[index].value.downcast_mut::<T>()
    }

    /// Returns `true` if at least one component of type `T` is present.
    #[must_use]
    pub fn has<T: Component>(&self) -> bool {
        self.slots.iter().any(Slot::is::<T>)
    }

    /// Returns the number of components of type `T`.
    #[must_use]
    pub fn count<T: Component>(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is::<T>()).count()
    }

    /// Iterate over every component of type `T`.
    pub fn iter_of<T: Component>(&self) -> impl Iterator<Item = &T> {
        self.slots
            .iter()
            .filter_map(|slot| slot.value.downcast_ref::<T>())
    }

    /// Iterate over the handle and type ID of every stored component.
    pub fn iter(&self) -> impl Iterator<Item = (ComponentHandle, ComponentTypeId)> + '_ {
        self.slots.iter().map(|slot| (slot.handle, slot.type_id))
    }

    /// Returns the type names of the stored components.
    pub fn type_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.slots.iter().map(|slot| slot.type_name)
    }

    /// Returns the number of stored components.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns `true` if the bag holds no components.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

impl std::fmt::Debug for Bag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bag")
            .field("owner", &self.owner)
            .field("components", &self.type_names().collect::<Vec<_>>())
            .finish()
    }
}
