//! The scene: factory, owner, and name directory of entities.
//!
//! A [`Scene`] is an explicit value. Construct one per running scene, hand
//! `&mut Scene` to the code that needs it, and drop it (or call
//! [`Scene::clear`]) to release everything it holds.
//!
//! Registration policy:
//!
//! - Names are unique. Creating a second entity under an existing name fails
//!   with [`SceneError::DuplicateName`] and leaves the first one untouched.
//! - Destroying an entity removes its name and UUID registrations, so a later
//!   [`Scene::get_entity`] with that name fails with [`SceneError::NotFound`].

use std::collections::{BTreeMap, HashMap};

use engine_component::{EntityAllocator, EntityId, Tag};
use engine_math::Collision;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::SceneConfig;
use crate::entity::Entity;
use crate::error::SceneError;
use crate::script::{self, ContactKind, ContactPhase, FrameTime, Script, ScriptSlot};

/// Registry of all live entities in one scene.
pub struct Scene {
    name: String,
    allocator: EntityAllocator,
    /// Owning store, keyed by handle.
    entities: HashMap<EntityId, Entity>,
    /// Name index. Every live entity has exactly one entry.
    names: HashMap<String, EntityId>,
    uuids: HashMap<Uuid, EntityId>,
    /// Ordered so hooks fire in ascending entity order.
    scripts: BTreeMap<EntityId, ScriptSlot>,
    unnamed_count: u64,
    frames: u64,
    physics_steps: u64,
}

impl Scene {
    /// Create an empty scene.
    #[must_use]
    pub fn new(config: SceneConfig) -> Self {
        info!(scene = %config.name, capacity = config.capacity, "scene created");
        Self {
            name: config.name,
            allocator: EntityAllocator::new(),
            entities: HashMap::with_capacity(config.capacity),
            names: HashMap::with_capacity(config.capacity),
            uuids: HashMap::with_capacity(config.capacity),
            scripts: BTreeMap::new(),
            unnamed_count: 0,
            frames: 0,
            physics_steps: 0,
        }
    }

    /// Returns the scene name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    // -- Entity lifecycle --

    /// Create an entity, tag it with `name`, and register it.
    ///
    /// Accepts both owned and borrowed strings. An empty name is replaced by
    /// a generated `"Entity<n>"`. Returns the new entity so components can be
    /// chained on directly:
    ///
    /// ```rust
    /// # use engine_scene::{Scene, SceneConfig};
    /// let mut scene = Scene::new(SceneConfig::default());
    /// let id = scene.create_entity("Player")?.id();
    /// assert_eq!(scene.get_entity("Player")?.id(), id);
    /// # Ok::<(), engine_scene::SceneError>(())
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::DuplicateName`] if the name is already taken, or
    /// [`SceneError::IdsExhausted`] if the scene has no handles left.
    pub fn create_entity(&mut self, name: impl Into<String>) -> Result<&mut Entity, SceneError> {
        self.create_entity_with_uuid(Uuid::new_v4(), name)
    }

    /// Create an entity with a caller-chosen UUID.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::DuplicateName`] if the name is already taken,
    /// [`SceneError::DuplicateUuid`] if the UUID is, or
    /// [`SceneError::IdsExhausted`] if the scene has no handles left.
    pub fn create_entity_with_uuid(
        &mut self,
        uuid: Uuid,
        name: impl Into<String>,
    ) -> Result<&mut Entity, SceneError> {
        let mut name = name.into();
        if name.is_empty() {
            name = self.next_unnamed();
        }

        if self.names.contains_key(&name) {
            warn!(scene = %self.name, name = %name, "rejected duplicate entity name");
            return Err(SceneError::DuplicateName(name));
        }
        if self.uuids.contains_key(&uuid) {
            warn!(scene = %self.name, %uuid, "rejected duplicate entity uuid");
            return Err(SceneError::DuplicateUuid(uuid));
        }

        let id = self.allocator.allocate().ok_or(SceneError::IdsExhausted)?;
        let mut entity = Entity::new(id, uuid, Some(name.clone()));
        entity.attach(Tag::new(name.clone()));

        debug!(scene = %self.name, entity = %id, name = %name, "created entity");
        self.names.insert(name, id);
        self.uuids.insert(uuid, id);
        Ok(self.entities.entry(id).or_insert(entity))
    }

    fn next_unnamed(&mut self) -> String {
        loop {
            let candidate = format!("Entity{}", self.unnamed_count);
            self.unnamed_count += 1;
            if !self.names.contains_key(&candidate) {
                return candidate;
            }
        }
    }

    /// Tear down an entity and unregister it.
    ///
    /// Any attached script gets `on_disable` (if enabled) and `on_destroy`
    /// first. The entity's components are then released and the now-empty
    /// entity is returned by value.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::UnknownEntity`] if `id` is not registered.
    pub fn destroy_entity(&mut self, id: EntityId) -> Result<Entity, SceneError> {
        let mut entity = self
            .entities
            .remove(&id)
            .ok_or(SceneError::UnknownEntity(id))?;

        if let Some(slot) = self.scripts.remove(&id) {
            retire_script(slot, &mut entity);
        }
        if let Some(name) = entity.name() {
            self.names.remove(name);
        }
        self.uuids.remove(&entity.uuid());
        entity.destroy();

        debug!(scene = %self.name, entity = %id, name = entity.name(), "destroyed entity");
        Ok(entity)
    }

    /// Destroy the entity registered under `name`.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::NotFound`] if no entity has that name.
    pub fn destroy_entity_named(&mut self, name: &str) -> Result<Entity, SceneError> {
        let id = self.id_of(name)?;
        self.destroy_entity(id)
    }

    /// Give a registered entity a new name, updating its [`Tag`] as well.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::UnknownEntity`] if `id` is not registered, or
    /// [`SceneError::DuplicateName`] if another entity already has the name.
    pub fn rename_entity(
        &mut self,
        id: EntityId,
        new_name: impl Into<String>,
    ) -> Result<(), SceneError> {
        let new_name = new_name.into();
        let entity = self
            .entities
            .get_mut(&id)
            .ok_or(SceneError::UnknownEntity(id))?;

        if entity.name() == Some(new_name.as_str()) {
            return Ok(());
        }
        if self.names.contains_key(&new_name) {
            return Err(SceneError::DuplicateName(new_name));
        }

        if let Some(old) = entity.name() {
            self.names.remove(old);
        }
        debug!(scene = %self.name, entity = %id, old = entity.name(), new = %new_name, "renamed entity");
        self.names.insert(new_name.clone(), id);
        entity.set_name(new_name);
        Ok(())
    }

    // -- Lookup --

    /// Returns the entity registered under `name` (exact, case-sensitive).
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::NotFound`] if no entity has that name.
    pub fn get_entity(&self, name: &str) -> Result<&Entity, SceneError> {
        self.names
            .get(name)
            .and_then(|id| self.entities.get(id))
            .ok_or_else(|| SceneError::NotFound(name.to_string()))
    }

    /// Mutable variant of [`Scene::get_entity`].
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::NotFound`] if no entity has that name.
    pub fn get_entity_mut(&mut self, name: &str) -> Result<&mut Entity, SceneError> {
        let id = self.id_of(name)?;
        self.entities
            .get_mut(&id)
            .ok_or_else(|| SceneError::NotFound(name.to_string()))
    }

    /// Returns the handle of the entity registered under `name`.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::NotFound`] if no entity has that name.
    pub fn id_of(&self, name: &str) -> Result<EntityId, SceneError> {
        self.names
            .get(name)
            .copied()
            .ok_or_else(|| SceneError::NotFound(name.to_string()))
    }

    /// Returns the entity with the given handle.
    #[must_use]
    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(&id)
    }

    /// Returns the entity with the given handle, mutably.
    #[must_use]
    pub fn entity_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(&id)
    }

    /// Returns the entity carrying `uuid`.
    #[must_use]
    pub fn find_by_uuid(&self, uuid: Uuid) -> Option<&Entity> {
        self.uuids.get(&uuid).and_then(|id| self.entities.get(id))
    }

    /// Returns `true` if an entity is registered under `name`.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains_key(name)
    }

    /// Returns the number of registered entities.
    #[must_use]
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Returns `true` if no entities are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Returns the handles of all registered entities in ascending order.
    #[must_use]
    pub fn entity_ids(&self) -> Vec<EntityId> {
        let mut ids: Vec<EntityId> = self.entities.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Iterate over all registered entities in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.values()
    }

    // -- Scripts --

    /// Attach a script to an entity, making it a scriptable entity.
    ///
    /// The script receives `on_enable` immediately. A script already attached
    /// to the entity is retired first (`on_disable`, then `on_destroy`).
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::UnknownEntity`] if `id` is not registered.
    pub fn attach_script<S: Script + 'static>(
        &mut self,
        id: EntityId,
        script: S,
    ) -> Result<(), SceneError> {
        let entity = self
            .entities
            .get_mut(&id)
            .ok_or(SceneError::UnknownEntity(id))?;

        if let Some(old) = self.scripts.remove(&id) {
            retire_script(old, entity);
        }

        let mut script: Box<dyn Script> = Box::new(script);
        script.on_enable(entity);
        self.scripts.insert(
            id,
            ScriptSlot {
                script,
                enabled: true,
            },
        );
        debug!(scene = %self.name, entity = %id, "attached script");
        Ok(())
    }

    /// Detach and return the script of an entity.
    ///
    /// The script receives `on_disable` (if enabled) and `on_destroy` before
    /// it is handed back.
    pub fn detach_script(&mut self, id: EntityId) -> Option<Box<dyn Script>> {
        let mut slot = self.scripts.remove(&id)?;
        if let Some(entity) = self.entities.get_mut(&id) {
            if slot.enabled {
                slot.script.on_disable(entity);
            }
            slot.script.on_destroy(entity);
        }
        debug!(scene = %self.name, entity = %id, "detached script");
        Some(slot.script)
    }

    /// Returns `true` if a script is attached to the entity.
    #[must_use]
    pub fn has_script(&self, id: EntityId) -> bool {
        self.scripts.contains_key(&id)
    }

    /// Returns whether the entity's script is enabled, or `None` if it has none.
    #[must_use]
    pub fn is_script_enabled(&self, id: EntityId) -> Option<bool> {
        self.scripts.get(&id).map(|slot| slot.enabled)
    }

    /// Enable or disable an entity's script.
    ///
    /// Fires `on_enable` / `on_disable` on an actual transition only. Disabled
    /// scripts receive no update or contact hooks. Does nothing if the entity
    /// has no script.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::UnknownEntity`] if `id` is not registered.
    pub fn set_script_enabled(&mut self, id: EntityId, enabled: bool) -> Result<(), SceneError> {
        let entity = self
            .entities
            .get_mut(&id)
            .ok_or(SceneError::UnknownEntity(id))?;
        let Some(slot) = self.scripts.get_mut(&id) else {
            return Ok(());
        };
        if slot.enabled == enabled {
            return Ok(());
        }

        slot.enabled = enabled;
        if enabled {
            slot.script.on_enable(entity);
        } else {
            slot.script.on_disable(entity);
        }
        Ok(())
    }

    /// Run the per-frame hook of every enabled script, in ascending entity order.
    pub fn update(&mut self, time: FrameTime) {
        self.frames += 1;
        for (id, slot) in self.scripts.iter_mut().filter(|(_, slot)| slot.enabled) {
            if let Some(entity) = self.entities.get_mut(id) {
                slot.script.update(entity, time);
            }
        }
    }

    /// Run the fixed-step physics hook of every enabled script, in ascending
    /// entity order.
    pub fn physics_update(&mut self, time: FrameTime) {
        self.physics_steps += 1;
        for (id, slot) in self.scripts.iter_mut().filter(|(_, slot)| slot.enabled) {
            if let Some(entity) = self.entities.get_mut(id) {
                slot.script.physics_update(entity, time);
            }
        }
    }

    /// Deliver a contact to the script of `collision.entity`.
    ///
    /// Returns `true` if an enabled script received it.
    pub fn dispatch_contact(
        &mut self,
        kind: ContactKind,
        phase: ContactPhase,
        collision: &Collision,
    ) -> bool {
        let id = collision.entity;
        let (Some(slot), Some(entity)) = (self.scripts.get_mut(&id), self.entities.get_mut(&id))
        else {
            return false;
        };
        if !slot.enabled {
            return false;
        }
        script::dispatch_contact(slot.script.as_mut(), entity, kind, phase, collision);
        true
    }

    /// Returns the number of frame updates this scene has run.
    #[must_use]
    pub fn frame_count(&self) -> u64 {
        self.frames
    }

    /// Returns the number of physics steps this scene has run.
    #[must_use]
    pub fn physics_step_count(&self) -> u64 {
        self.physics_steps
    }

    // -- Teardown --

    /// Retire every script and release every entity.
    ///
    /// The scene is empty but usable afterwards.
    pub fn clear(&mut self) {
        let scripts = std::mem::take(&mut self.scripts);
        for (id, slot) in scripts {
            if let Some(entity) = self.entities.get_mut(&id) {
                retire_script(slot, entity);
            }
        }

        let released = self.entities.len();
        for entity in self.entities.values_mut() {
            entity.destroy();
        }
        self.entities.clear();
        self.names.clear();
        self.uuids.clear();

        info!(
            scene = %self.name,
            released,
            last_entity = ?self.allocator.last_issued(),
            frames = self.frames,
            physics_steps = self.physics_steps,
            "scene cleared"
        );
    }
}

/// Run the teardown hooks of a script that is leaving its entity.
fn retire_script(mut slot: ScriptSlot, entity: &mut Entity) {
    if slot.enabled {
        slot.script.on_disable(entity);
    }
    slot.script.on_destroy(entity);
}

impl Default for Scene {
    fn default() -> Self {
        Self::new(SceneConfig::default())
    }
}

impl Drop for Scene {
    fn drop(&mut self) {
        if !self.entities.is_empty() {
            self.clear();
        }
    }
}

impl std::fmt::Debug for Scene {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scene")
            .field("name", &self.name)
            .field("entities", &self.entities.len())
            .field("scripts", &self.scripts.len())
            .field("frames", &self.frames)
            .field("physics_steps", &self.physics_steps)
            .finish()
    }
}
