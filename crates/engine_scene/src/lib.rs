//! # engine_scene
//!
//! The scene layer: a registry that creates, owns, names, and destroys
//! entities, plus the hook surface for scriptable entities.
//!
//! ## Usage
//!
//! ```rust
//! use engine_component::Component;
//! use engine_scene::{Scene, SceneConfig};
//!
//! struct Health(f32);
//!
//! impl Component for Health {
//!     fn type_name() -> &'static str { "Health" }
//! }
//!
//! let mut scene = Scene::new(SceneConfig::new("Level1"));
//! let id = scene.create_entity("Player")?.attach(Health(100.0)).id();
//! assert_eq!(scene.get_entity("Player")?.components().len(), 2);
//!
//! let player = scene.destroy_entity(id)?;
//! assert!(player.is_empty());
//! # Ok::<(), engine_scene::SceneError>(())
//! ```

pub mod config;
pub mod entity;
pub mod error;
pub mod runner;
pub mod scene;
pub mod script;

pub use config::{RunnerConfig, SceneConfig};
pub use entity::Entity;
pub use error::SceneError;
pub use runner::SceneRunner;
pub use scene::Scene;
pub use script::{ContactKind, ContactPhase, FrameTime, Script};
