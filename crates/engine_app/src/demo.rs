//! The demo scene: a stationary player, a line of enemies walking into it,
//! and a pickup trigger on their path.

use anyhow::{Context, Result};
use engine_component::EntityId;
use engine_math::{Transform3D, Vec3};
use engine_scene::{Scene, SceneConfig, SceneRunner};
use tracing::{debug, info};

use crate::components::{Collider, Health, Velocity};
use crate::contacts::ContactTracker;
use crate::scripts::Actor;

const PLAYER_HEALTH: f32 = 300.0;
const ENEMY_HEALTH: f32 = 50.0;
const ENEMY_SPACING: f32 = 2.0;
const ENEMY_SPEED: f32 = 1.0;

/// Build the demo scene with `enemies` enemies named `Enemy1..=EnemyN`.
pub fn build_scene(name: &str, enemies: u32) -> Result<Scene> {
    let mut scene = Scene::new(SceneConfig::new(name).with_capacity(enemies as usize + 2));

    let player = scene
        .create_entity("Player")
        .context("failed to create player")?
        .attach(Transform3D::default())
        .attach(Velocity::default())
        .attach(Health::full(PLAYER_HEALTH))
        .attach(Collider::solid(0.5))
        .id();
    scene.attach_script(player, Actor::default())?;

    for n in 1..=enemies {
        let x = ENEMY_SPACING * n as f32;
        let enemy = scene
            .create_entity(format!("Enemy{n}"))
            .with_context(|| format!("failed to create enemy {n}"))?
            .attach(Transform3D::from_position(Vec3::new(x, 0.0, 0.0)))
            .attach(Velocity::new(-ENEMY_SPEED, 0.0, 0.0))
            .attach(Health::full(ENEMY_HEALTH))
            .attach(Collider::solid(0.5))
            .id();
        scene.attach_script(enemy, Actor::default())?;
    }

    scene
        .create_entity("Pickup")
        .context("failed to create pickup")?
        .attach(Transform3D::from_position(Vec3::new(1.5, 0.0, 0.0)))
        .attach(Collider::trigger(0.25));

    info!(scene = name, entities = scene.entity_count(), "demo scene built");
    Ok(scene)
}

/// A runner plus contact tracking after each physics step and reaping after
/// each frame.
#[derive(Debug)]
pub struct Simulation {
    runner: SceneRunner,
    tracker: ContactTracker,
    contacts: u64,
    destroyed: Vec<String>,
}

impl Simulation {
    #[must_use]
    pub fn new(runner: SceneRunner) -> Self {
        Self {
            runner,
            tracker: ContactTracker::new(),
            contacts: 0,
            destroyed: Vec::new(),
        }
    }

    #[must_use]
    pub fn runner(&self) -> &SceneRunner {
        &self.runner
    }

    #[must_use]
    pub fn scene(&self) -> &Scene {
        self.runner.scene()
    }

    /// Returns the number of contact events delivered to scripts.
    #[must_use]
    pub fn contacts(&self) -> u64 {
        self.contacts
    }

    /// Returns the names of entities removed for running out of health, in
    /// removal order.
    #[must_use]
    pub fn destroyed(&self) -> &[String] {
        &self.destroyed
    }

    #[must_use]
    pub fn into_runner(self) -> SceneRunner {
        self.runner
    }

    /// Advance one frame, resolving contacts after every physics step, then
    /// remove dead entities.
    pub fn step(&mut self, dt: f64) -> Result<()> {
        let tracker = &mut self.tracker;
        let contacts = &mut self.contacts;
        let steps = self.runner.frame_step_with(dt, |scene, time| {
            let events = tracker.step(scene);
            if !events.is_empty() {
                debug!(
                    step = time.frame,
                    events = events.len(),
                    active_pairs = tracker.active_pairs(),
                    "contacts resolved"
                );
            }
            for event in &events {
                if scene.dispatch_contact(event.kind, event.phase, &event.collision) {
                    *contacts += 1;
                }
            }
        });
        if steps == 0 {
            return Ok(());
        }

        self.reap()
    }

    /// Run `frames` frames of `dt` seconds, stopping early if the runner is
    /// stopped.
    pub fn run(&mut self, frames: u64, dt: f64) -> Result<()> {
        for _ in 0..frames {
            if !self.runner.is_running() {
                break;
            }
            self.step(dt)?;
        }
        Ok(())
    }

    fn reap(&mut self) -> Result<()> {
        let scene = self.runner.scene_mut();
        let dead: Vec<EntityId> = scene
            .iter()
            .filter(|entity| entity.get::<Health>().is_some_and(|h| !h.is_alive()))
            .map(|entity| entity.id())
            .collect();

        for id in dead {
            let entity = scene.destroy_entity(id)?;
            let name = entity.name().unwrap_or_default().to_owned();
            debug!(entity = %id, name = %name, "entity died");
            self.destroyed.push(name);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use engine_scene::RunnerConfig;

    use super::*;

    #[test]
    fn test_build_scene() {
        let scene = build_scene("Test", 2).unwrap();
        assert_eq!(scene.entity_count(), 4);
        assert!(scene.contains("Player"));
        assert!(scene.contains("Enemy1"));
        assert!(scene.contains("Enemy2"));
        assert!(!scene.contains("Enemy3"));

        let pickup = scene.get_entity("Pickup").unwrap();
        assert!(pickup.get::<Collider>().unwrap().trigger);
        assert!(!scene.has_script(pickup.id()));

        let enemy = scene.get_entity("Enemy2").unwrap();
        let x = enemy.get::<Transform3D>().unwrap().position.x;
        assert_eq!(x, 4.0);
    }

    #[test]
    fn test_enemies_die_on_player() {
        let scene = build_scene("Test", 2).unwrap();
        let mut sim = Simulation::new(SceneRunner::new(scene, RunnerConfig::default()).unwrap());

        // Five simulated seconds: both enemies reach the player and wear out.
        sim.run(300, 1.0 / 60.0).unwrap();

        assert_eq!(sim.destroyed(), ["Enemy1", "Enemy2"]);
        assert!(sim.contacts() > 0);

        let scene = sim.scene();
        assert!(!scene.contains("Enemy1"));
        assert!(scene.contains("Player"));
        let player = scene.get_entity("Player").unwrap();
        let hp = player.get::<Health>().unwrap().current;
        assert!(hp > 0.0 && hp < PLAYER_HEALTH);
    }

    #[test]
    fn test_contacts_resolve_every_physics_step() {
        let mut scene = Scene::default();
        let mut spawn = |name: &str, x: f32| {
            let id = scene
                .create_entity(name)
                .unwrap()
                .attach(Transform3D::from_position(Vec3::new(x, 0.0, 0.0)))
                .attach(Health::full(100.0))
                .attach(Collider::solid(0.5))
                .id();
            scene.attach_script(id, Actor::default()).unwrap();
        };
        spawn("Left", 0.0);
        spawn("Right", 0.5);

        let config = RunnerConfig::new(60.0, 10.0).unwrap();
        let mut sim = Simulation::new(SceneRunner::new(scene, config).unwrap());
        // 0.35 s at 10 Hz is three physics steps: one enter, then two stays.
        sim.step(0.35).unwrap();

        assert_eq!(sim.runner().physics_step(), 3);
        assert_eq!(sim.contacts(), 6);
        let hp = sim
            .scene()
            .get_entity("Left")
            .unwrap()
            .get::<Health>()
            .unwrap()
            .current;
        assert_eq!(hp, 78.0);
    }

    #[test]
    fn test_paused_simulation_is_frozen() {
        let scene = build_scene("Test", 1).unwrap();
        let mut runner = SceneRunner::new(scene, RunnerConfig::default()).unwrap();
        runner.pause();
        let mut sim = Simulation::new(runner);
        sim.run(120, 1.0 / 60.0).unwrap();

        assert_eq!(sim.runner().frame(), 0);
        let enemy = sim.scene().get_entity("Enemy1").unwrap();
        assert_eq!(enemy.get::<Transform3D>().unwrap().position.x, 2.0);
    }
}
