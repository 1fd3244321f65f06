//! The scene-owned entity: an identity plus a bag of components.

use engine_component::{Bag, Component, ComponentHandle, EntityId, Tag};
use tracing::debug;
use uuid::Uuid;

/// The smallest addressable unit of scene state.
///
/// Entities are only constructed by [`Scene`](crate::Scene), which keeps
/// ownership; callers work with `&mut Entity` borrows or [`EntityId`] handles.
/// The component bag always exists but may be empty.
#[derive(Debug)]
pub struct Entity {
    id: EntityId,
    uuid: Uuid,
    name: Option<String>,
    components: Bag,
}

impl Entity {
    pub(crate) fn new(id: EntityId, uuid: Uuid, name: Option<String>) -> Self {
        Self {
            id,
            uuid,
            name,
            components: Bag::new(id),
        }
    }

    /// Returns the scene-local handle of this entity.
    #[must_use]
    pub fn id(&self) -> EntityId {
        self.id
    }

    /// Returns the globally unique identifier of this entity.
    #[must_use]
    pub fn uuid(&self) -> Uuid {
        self.uuid
    }

    /// Returns the name the entity was registered under, if any.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub(crate) fn set_name(&mut self, name: String) {
        if let Some(tag) = self.components.find_mut::<Tag>() {
            tag.name.clone_from(&name);
        }
        self.name = Some(name);
    }

    /// Returns the entity's component bag.
    #[must_use]
    pub fn components(&self) -> &Bag {
        &self.components
    }

    /// Returns the entity's [`Tag`] component, if still attached.
    #[must_use]
    pub fn tag(&self) -> Option<&Tag> {
        self.components.find::<Tag>()
    }

    /// Attach a component and return the entity for chaining.
    pub fn attach<T: Component>(&mut self, component: T) -> &mut Self {
        let _ = self.insert(component);
        self
    }

    /// Attach a component and return the handle needed to detach it later.
    pub fn insert<T: Component>(&mut self, component: T) -> ComponentHandle {
        let handle = self.components.add(component);
        debug!(entity = %self.id, component = T::type_name(), %handle, "attached component");
        handle
    }

    /// Detach the component addressed by `handle`. Detaching a component that
    /// is not attached changes nothing.
    pub fn detach(&mut self, handle: ComponentHandle) -> &mut Self {
        if self.components.remove(handle) {
            debug!(entity = %self.id, %handle, "detached component");
        }
        self
    }

    /// Detach the component addressed by `handle` and return it, if it is a `T`.
    pub fn take<T: Component>(&mut self, handle: ComponentHandle) -> Option<T> {
        self.components.take(handle)
    }

    /// Release every component. Calling this again is a no-op.
    ///
    /// The entity stays registered with its scene; use
    /// [`Scene::destroy_entity`](crate::Scene::destroy_entity) for full teardown.
    pub fn destroy(&mut self) -> &mut Self {
        if !self.components.is_empty() {
            debug!(entity = %self.id, released = self.components.len(), "released components");
            self.components.clear();
        }
        self
    }

    /// Returns the first component of type `T`, if any.
    #[must_use]
    pub fn get<T: Component>(&self) -> Option<&T> {
        self.components.find()
    }

    /// Returns a mutable reference to the first component of type `T`, if any.
    #[must_use]
    pub fn get_mut<T: Component>(&mut self) -> Option<&mut T> {
        self.components.find_mut()
    }

    /// Returns `true` if a component of type `T` is attached.
    #[must_use]
    pub fn has<T: Component>(&self) -> bool {
        self.components.has::<T>()
    }

    /// Returns `true` if the entity holds no components.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq)]
    struct Health(f32);

    impl Component for Health {
        fn type_name() -> &'static str {
            "Health"
        }
    }

    #[derive(Debug, Clone, Copy, PartialEq)]
    struct Armor(u32);

    impl Component for Armor {
        fn type_name() -> &'static str {
            "Armor"
        }
    }

    fn entity() -> Entity {
        let mut e = Entity::new(EntityId::from_raw(1), Uuid::new_v4(), Some("Player".into()));
        e.attach(Tag::new("Player"));
        e
    }

    fn type_names(e: &Entity) -> Vec<&'static str> {
        let mut names: Vec<_> = e.components().type_names().collect();
        names.sort_unstable();
        names
    }

    #[test]
    fn test_attach_chains_on_same_entity() {
        let mut e = entity();
        let id = e.attach(Health(10.0)).attach(Armor(3)).id();
        assert_eq!(id, e.id());
        assert_eq!(e.components().len(), 3);
        assert!(e.has::<Health>());
        assert!(e.has::<Armor>());
    }

    #[test]
    fn test_attach_detach_round_trip() {
        let mut e = entity();
        let before = type_names(&e);

        let h = e.insert(Health(5.0));
        e.detach(h);

        assert_eq!(type_names(&e), before);
    }

    #[test]
    fn test_detach_never_attached_is_noop() {
        let mut e = entity();
        let mut other = Entity::new(EntityId::from_raw(2), Uuid::new_v4(), None);
        let foreign = other.insert(Health(1.0));

        e.detach(foreign).detach(foreign);
        assert_eq!(e.components().len(), 1);
        assert_eq!(other.components().len(), 1);
    }

    #[test]
    fn test_destroy_is_idempotent() {
        let mut e = entity();
        e.attach(Health(1.0)).attach(Health(2.0));
        assert_eq!(e.components().len(), 3);

        e.destroy();
        assert!(e.is_empty());
        e.destroy();
        assert!(e.is_empty());
        assert_eq!(e.name(), Some("Player"));
    }

    #[test]
    fn test_get_and_take() {
        let mut e = entity();
        let h = e.insert(Health(8.0));
        if let Some(health) = e.get_mut::<Health>() {
            health.0 -= 3.0;
        }
        assert_eq!(e.get::<Health>(), Some(&Health(5.0)));
        assert_eq!(e.take::<Health>(h), Some(Health(5.0)));
        assert!(!e.has::<Health>());
    }

    #[test]
    fn test_set_name_updates_tag() {
        let mut e = entity();
        e.set_name("Hero".to_string());
        assert_eq!(e.name(), Some("Hero"));
        assert_eq!(e.tag().map(|t| t.name.as_str()), Some("Hero"));
    }
}
