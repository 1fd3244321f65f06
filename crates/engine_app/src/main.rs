//! # engine_app
//!
//! Headless demo driver for the scene layer. Builds a scene with a player,
//! a few enemies, and a pickup, then steps it frame by frame while feeding
//! overlap contacts to the entities' scripts.
//!
//! ## Startup Sequence
//!
//! 1. Parse arguments and initialise logging.
//! 2. Build the demo scene.
//! 3. Run the requested number of frames at the configured rates.
//! 4. Log a summary and tear the scene down.

mod components;
mod contacts;
mod demo;
mod scripts;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use engine_scene::{RunnerConfig, SceneRunner};

use crate::components::Health;
use crate::demo::Simulation;

#[derive(Parser)]
#[command(name = "engine_app", about = "Run the scene demo headlessly")]
struct Args {
    /// Scene name
    #[arg(short, long, default_value = "Demo")]
    name: String,

    /// Number of frames to simulate
    #[arg(short, long, default_value_t = 300)]
    frames: u64,

    /// Frame updates per second
    #[arg(short, long, default_value_t = 60.0)]
    rate: f64,

    /// Physics steps per second
    #[arg(short, long, default_value_t = 50.0)]
    physics_rate: f64,

    /// Number of enemies to spawn
    #[arg(short, long, default_value_t = 3)]
    enemies: u32,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("engine_app=info".parse()?))
        .init();

    let args = Args::parse();
    let config = RunnerConfig::new(args.rate, args.physics_rate)
        .context("invalid rate flags")?
        .with_max_frames(args.frames);
    let dt = config.frame_interval();

    let scene = demo::build_scene(&args.name, args.enemies)?;
    let mut sim = Simulation::new(SceneRunner::new(scene, config)?);
    sim.run(args.frames, dt)?;

    info!(
        frames = sim.runner().frame(),
        physics_steps = sim.runner().physics_step(),
        contacts = sim.contacts(),
        destroyed = sim.destroyed().len(),
        "simulation finished"
    );
    for entity in sim.scene().iter() {
        let hp = entity.get::<Health>().map(|h| h.current);
        info!(entity = %entity.id(), name = entity.name(), hp, "survivor");
    }

    let mut scene = sim.into_runner().into_scene();
    scene.clear();
    Ok(())
}
