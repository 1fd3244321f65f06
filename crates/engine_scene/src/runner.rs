//! Frame-driven scene runner.
//!
//! Drives a [`Scene`] with one variable frame update per frame and a fixed
//! number of physics steps derived from an accumulator:
//!
//! 1. Skip everything while stopped or paused.
//! 2. Run `Scene::update` once with the frame's delta time.
//! 3. Add the delta to the physics accumulator and run `Scene::physics_update`
//!    once per whole fixed interval it contains.

use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::config::RunnerConfig;
use crate::error::SceneError;
use crate::scene::Scene;
use crate::script::FrameTime;

/// Upper bound on physics steps per frame, so a long stall cannot trigger an
/// unbounded catch-up burst.
const MAX_PHYSICS_STEPS_PER_FRAME: u32 = 8;

/// Owns a scene and advances it frame by frame.
#[derive(Debug)]
pub struct SceneRunner {
    scene: Scene,
    config: RunnerConfig,
    /// Frames run so far.
    frame: u64,
    /// Physics steps run so far.
    physics_step: u64,
    /// Unconsumed simulated time for the fixed step, in seconds.
    accumulator: f64,
    running: bool,
    paused: bool,
}

impl SceneRunner {
    /// Create a runner for `scene`. The runner starts active.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::InvalidRate`] if either configured rate is not a
    /// positive finite number.
    pub fn new(scene: Scene, config: RunnerConfig) -> Result<Self, SceneError> {
        config.validate()?;
        Ok(Self {
            scene,
            config,
            frame: 0,
            physics_step: 0,
            accumulator: 0.0,
            running: true,
            paused: false,
        })
    }

    /// Returns the number of frames run so far.
    #[must_use]
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Returns the number of physics steps run so far.
    #[must_use]
    pub fn physics_step(&self) -> u64 {
        self.physics_step
    }

    /// Returns a reference to the scene.
    #[must_use]
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Returns a mutable reference to the scene.
    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    /// Consume the runner and hand back its scene.
    #[must_use]
    pub fn into_scene(self) -> Scene {
        self.scene
    }

    /// Returns `true` if the runner is running and not paused.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.running && !self.paused
    }

    /// Returns `true` unless [`SceneRunner::stop`] was called.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Returns `true` while paused.
    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Suspend frame and physics updates.
    pub fn pause(&mut self) {
        if !self.paused {
            info!(scene = self.scene.name(), frame = self.frame, "scene paused");
            self.paused = true;
        }
    }

    /// Resume after [`SceneRunner::pause`].
    pub fn resume(&mut self) {
        if self.paused {
            info!(scene = self.scene.name(), frame = self.frame, "scene resumed");
            self.paused = false;
        }
    }

    /// Stop the runner. [`SceneRunner::run`] returns after the current frame.
    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Advance the scene by one frame of `dt` seconds.
    ///
    /// Returns the number of physics steps taken. Does nothing while inactive
    /// or when `dt` is negative or not finite.
    pub fn frame_step(&mut self, dt: f64) -> u32 {
        self.frame_step_with(dt, |_, _| {})
    }

    /// Like [`SceneRunner::frame_step`], calling `after_physics` with the
    /// scene right after each physics step.
    pub fn frame_step_with<F>(&mut self, dt: f64, mut after_physics: F) -> u32
    where
        F: FnMut(&mut Scene, FrameTime),
    {
        if !self.is_active() {
            return 0;
        }
        if !dt.is_finite() || dt < 0.0 {
            warn!(frame = self.frame, dt, "ignoring invalid frame delta");
            return 0;
        }

        self.frame += 1;
        self.scene.update(FrameTime::new(self.frame, dt));

        let fixed = self.config.fixed_interval();
        self.accumulator += dt;
        let mut steps = 0;
        while self.accumulator >= fixed && steps < MAX_PHYSICS_STEPS_PER_FRAME {
            self.physics_step += 1;
            let time = FrameTime::new(self.physics_step, fixed);
            self.scene.physics_update(time);
            after_physics(&mut self.scene, time);
            self.accumulator -= fixed;
            steps += 1;
        }
        if steps == MAX_PHYSICS_STEPS_PER_FRAME && self.accumulator >= fixed {
            warn!(
                frame = self.frame,
                dropped_secs = self.accumulator,
                "physics fell behind, dropping accumulated time"
            );
            self.accumulator = 0.0;
        }

        debug!(frame = self.frame, dt, physics_steps = steps, "frame complete");
        steps
    }

    /// Run the frame loop for the configured number of frames, or until
    /// [`SceneRunner::stop`] is called.
    ///
    /// This is a blocking loop that sleeps to hold the configured frame rate.
    pub fn run(&mut self) {
        let frame_duration = Duration::from_secs_f64(self.config.frame_interval());
        let mut frame_count = 0u64;

        info!(
            scene = self.scene.name(),
            update_rate = self.config.update_rate,
            fixed_update_rate = self.config.fixed_update_rate,
            max_frames = self.config.max_frames,
            "starting frame loop"
        );

        while self.running {
            let start = Instant::now();

            self.frame_step(frame_duration.as_secs_f64());

            frame_count += 1;
            if self.config.max_frames > 0 && frame_count >= self.config.max_frames {
                break;
            }

            let elapsed = start.elapsed();
            if elapsed < frame_duration {
                std::thread::sleep(frame_duration - elapsed);
            } else {
                warn!(
                    frame = self.frame,
                    elapsed_ms = elapsed.as_millis() as u64,
                    budget_ms = frame_duration.as_millis() as u64,
                    "frame exceeded time budget"
                );
            }
        }

        info!(
            scene = self.scene.name(),
            frames = self.frame,
            physics_steps = self.physics_step,
            "frame loop complete"
        );
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU64, Ordering};

    use super::*;
    use crate::entity::Entity;
    use crate::script::Script;

    #[derive(Clone, Default)]
    struct Counters {
        updates: Arc<AtomicU64>,
        physics: Arc<AtomicU64>,
    }

    impl Script for Counters {
        fn update(&mut self, _: &mut Entity, _: FrameTime) {
            self.updates.fetch_add(1, Ordering::Relaxed);
        }
        fn physics_update(&mut self, _: &mut Entity, _: FrameTime) {
            self.physics.fetch_add(1, Ordering::Relaxed);
        }
    }

    fn runner_with(counters: &Counters, config: RunnerConfig) -> SceneRunner {
        let mut scene = Scene::default();
        let id = scene.create_entity("Counter").unwrap().id();
        scene.attach_script(id, counters.clone()).unwrap();
        SceneRunner::new(scene, config).unwrap()
    }

    fn config(update_rate: f64, fixed_update_rate: f64, max_frames: u64) -> RunnerConfig {
        RunnerConfig {
            update_rate,
            fixed_update_rate,
            max_frames,
        }
    }

    #[test]
    fn test_frame_step_advances_counter() {
        let counters = Counters::default();
        let mut runner = runner_with(&counters, RunnerConfig::default());
        assert_eq!(runner.frame(), 0);
        runner.frame_step(1.0 / 60.0);
        runner.frame_step(1.0 / 60.0);
        assert_eq!(runner.frame(), 2);
        assert_eq!(counters.updates.load(Ordering::Relaxed), 2);
        assert_eq!(runner.scene().frame_count(), 2);
    }

    #[test]
    fn test_fixed_step_accumulates() {
        let counters = Counters::default();
        let mut runner = runner_with(&counters, config(60.0, 10.0, 0));

        // 0.25 s at 10 Hz: two steps, 0.05 s carried over.
        assert_eq!(runner.frame_step(0.25), 2);
        // The carried 0.05 s plus 0.06 s crosses one more interval.
        assert_eq!(runner.frame_step(0.06), 1);
        assert_eq!(runner.physics_step(), 3);
        assert_eq!(counters.physics.load(Ordering::Relaxed), 3);
    }

    #[test]
    fn test_after_physics_runs_once_per_step() {
        let counters = Counters::default();
        let mut runner = runner_with(&counters, config(60.0, 10.0, 0));
        let mut seen = Vec::new();
        let steps = runner.frame_step_with(0.35, |scene, time| {
            seen.push((time.frame, scene.physics_step_count()));
        });
        assert_eq!(steps, 3);
        assert_eq!(seen, vec![(1, 1), (2, 2), (3, 3)]);
    }

    #[test]
    fn test_new_rejects_invalid_rates() {
        let err = SceneRunner::new(Scene::default(), config(0.0, 50.0, 0)).unwrap_err();
        assert_eq!(
            err,
            SceneError::InvalidRate {
                field: "update_rate",
                rate: 0.0
            }
        );
        let err = SceneRunner::new(Scene::default(), config(60.0, -50.0, 0)).unwrap_err();
        assert!(matches!(
            err,
            SceneError::InvalidRate {
                field: "fixed_update_rate",
                ..
            }
        ));
        assert!(SceneRunner::new(Scene::default(), config(f64::NAN, 50.0, 0)).is_err());
    }

    #[test]
    fn test_invalid_delta_is_ignored() {
        let counters = Counters::default();
        let mut runner = runner_with(&counters, RunnerConfig::default());
        assert_eq!(runner.frame_step(-1.0), 0);
        assert_eq!(runner.frame_step(f64::NAN), 0);
        assert_eq!(runner.frame(), 0);
        assert_eq!(counters.physics.load(Ordering::Relaxed), 0);
    }

    #[test]
    fn test_physics_catch_up_is_bounded() {
        let counters = Counters::default();
        let mut runner = runner_with(&counters, config(60.0, 100.0, 0));
        let steps = runner.frame_step(10.0);
        assert_eq!(steps, MAX_PHYSICS_STEPS_PER_FRAME);
        // The backlog was dropped, so a tiny frame adds no steps.
        assert_eq!(runner.frame_step(0.001), 0);
    }

    #[test]
    fn test_pause_skips_updates() {
        let counters = Counters::default();
        let mut runner = runner_with(&counters, RunnerConfig::default());
        runner.pause();
        assert!(runner.is_paused());
        assert!(!runner.is_active());
        assert_eq!(runner.frame_step(1.0), 0);
        assert_eq!(runner.frame(), 0);
        assert_eq!(counters.updates.load(Ordering::Relaxed), 0);

        runner.resume();
        runner.frame_step(1.0 / 60.0);
        assert_eq!(counters.updates.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn test_run_limited_frames() {
        let counters = Counters::default();
        let mut runner = runner_with(&counters, config(1000.0, 1000.0, 5));
        runner.run();
        assert_eq!(runner.frame(), 5);
        assert_eq!(counters.updates.load(Ordering::Relaxed), 5);
    }

    #[test]
    fn test_stopped_runner_does_not_run() {
        let counters = Counters::default();
        let mut runner = runner_with(&counters, config(1000.0, 1000.0, 0));
        runner.stop();
        runner.run();
        assert_eq!(runner.frame(), 0);
        assert!(!runner.is_running());

        let scene = runner.into_scene();
        assert_eq!(scene.entity_count(), 1);
    }
}
