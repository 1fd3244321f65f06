//! # engine_component
//!
//! The "C" in ECS. Defines what a component is and how an entity stores the
//! components it owns.
//!
//! This crate provides:
//!
//! - [`Component`] trait: the contract all attachable data must satisfy.
//! - [`Tag`]: the built-in display-name component.
//! - [`EntityId`]: lightweight `u64` entity identifiers.
//! - [`EntityAllocator`]: monotonically increasing ID allocator.
//! - [`Bag`]: the per-entity component container, addressed by [`ComponentHandle`].

pub mod bag;
pub mod component;
pub mod entity;

pub use bag::{Bag, ComponentHandle};
pub use component::{Component, ComponentTypeId, Tag};
pub use entity::{EntityAllocator, EntityId};
