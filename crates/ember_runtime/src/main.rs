//! Ember Runtime
//!
//! Headless driver: builds a scene, registers the gameplay systems and
//! runs a fixed-timestep loop for a configured number of frames.

mod render;
mod settings;
mod systems;

use std::collections::VecDeque;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use ember_core::ecs::{Entity, Scene};
use ember_core::time::SimulationTime;
use ember_metrics::FrameTimer;
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use settings::Settings;

/// Ember headless ECS driver
#[derive(Parser, Debug)]
#[command(name = "ember")]
#[command(about = "Run the Ember ECS simulation headless", long_about = None)]
struct Args {
    /// JSON settings file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the number of frames to run
    #[arg(long)]
    frames: Option<u64>,

    /// Override the number of entities spawned at start
    #[arg(long)]
    entities: Option<u32>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let settings =
        Settings::load(args.config.as_deref())?.with_overrides(args.frames, args.entities);

    // Initialize tracing; RUST_LOG wins over the configured filter
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&settings.log_filter)),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Ember v{}", ember_core::VERSION);
    debug!(?settings, "loaded settings");

    run(&settings)
}

fn run(settings: &Settings) -> Result<()> {
    let mut scene = Scene::new(settings.initial_capacity);
    systems::register(&mut scene).context("failed to register systems")?;

    let mut live = VecDeque::with_capacity(settings.entity_count as usize);
    for n in 0..settings.entity_count {
        live.push_back(systems::spawn_actor(&mut scene, n)?);
    }
    info!(
        entities = scene.entity_count(),
        capacity = scene.capacity(),
        archetypes = scene.archetypes().len(),
        "scene ready"
    );

    let mut time = SimulationTime::new(settings.tick_rate_hz);
    let mut frame_timer = FrameTimer::new(60);
    let frame_time = Duration::from_millis(settings.frame_time_ms);
    let mut next_actor = settings.entity_count;
    let mut drawn = 0;

    for frame in 1..=settings.frames {
        frame_timer.begin();

        for _ in 0..time.accumulate(frame_time) {
            scene.update(time.dt());
        }

        if settings.despawn_every > 0 && frame % settings.despawn_every == 0 {
            churn(&mut scene, &mut live, next_actor)?;
            next_actor = next_actor.wrapping_add(1);
        }

        drawn = render::extract(&scene)
            .context("render extraction hit a bad slot")?
            .len();

        frame_timer.end();
    }

    info!(
        frames = settings.frames,
        ticks = time.tick_count(),
        simulated_s = time.total_time().as_secs_f64(),
        entities = scene.entity_count(),
        capacity = scene.capacity(),
        drawn,
        "simulation finished"
    );
    log_metrics(&scene, &frame_timer);
    Ok(())
}

/// Despawn the oldest actor and spawn a fresh one, which reuses its slot.
fn churn(scene: &mut Scene, live: &mut VecDeque<Entity>, n: u32) -> Result<()> {
    if let Some(oldest) = live.pop_front() {
        scene.delete_entity(oldest);
    }
    let entity = systems::spawn_actor(scene, n)?;
    debug!(%entity, "respawned actor");
    live.push_back(entity);
    Ok(())
}

fn log_metrics(scene: &Scene, frame_timer: &FrameTimer) {
    if !ember_metrics::ENABLED {
        return;
    }

    let (min_ms, max_ms) = frame_timer.frame_time_range_ms();
    info!(
        fps = frame_timer.fps(),
        avg_ms = frame_timer.frame_time_ms(),
        min_ms,
        max_ms,
        "frame timing"
    );

    let profiler = scene.dispatcher().profiler();
    for (_, descriptor) in scene.dispatcher().iter() {
        if let Some(timing) = profiler.timing(descriptor.name()) {
            info!(
                system = descriptor.name(),
                runs = timing.runs,
                avg_us = timing.average().as_secs_f64() * 1e6,
                last_entities = timing.last_entities,
                "system timing"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_run_completes() {
        let settings = Settings {
            initial_capacity: 4,
            entity_count: 6,
            frames: 12,
            despawn_every: 3,
            ..Settings::default()
        };
        run(&settings).unwrap();
    }

    #[test]
    fn churn_recycles_oldest_slot() {
        let mut scene = Scene::new(2);
        let mut live: VecDeque<_> = (0..2)
            .map(|n| systems::spawn_actor(&mut scene, n).unwrap())
            .collect();
        let oldest = live[0];

        churn(&mut scene, &mut live, 2).unwrap();

        assert_eq!(live.len(), 2);
        assert_eq!(scene.capacity(), 2);
        assert!(!scene.is_active(oldest));
        let newest = live[1];
        assert_eq!(newest.index(), oldest.index());
        assert_eq!(newest.generation(), oldest.generation() + 1);
    }
}
