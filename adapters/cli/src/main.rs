#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs a headless Undead Survival session.
//!
//! The runner loads optional tuning from a TOML file, drives the player with a
//! scripted autopilot until the configured duration elapses or the player
//! dies, and records the run on the leaderboard when a player name is given.

mod camera;
mod config;
mod pilot;

use std::{path::PathBuf, time::Duration};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;
use undead_survival_core::{format_clock, Command, EntityId, Event, PlayMode, Tag};
use undead_survival_storage::{render_leaderboard, SaveStore, SessionRecord};
use undead_survival_system_bootstrap::Session;
use undead_survival_world::query;

use crate::{config::GameConfig, pilot::Autopilot};

#[derive(Debug, Parser)]
#[command(name = "undead-survival", about = "Runs a headless Undead Survival session")]
struct Args {
    /// TOML file overriding the default tuning.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Simulated seconds to run before stopping.
    #[arg(long, default_value_t = 120.0)]
    duration: f32,
    /// Length of one simulated frame in milliseconds.
    #[arg(long, default_value_t = 20)]
    frame_ms: u64,
    /// Seed shared by the spawner, steering and autopilot.
    #[arg(long, default_value_t = 0x5eed)]
    seed: u64,
    /// Name recorded on the leaderboard. Nothing is saved when omitted.
    #[arg(long)]
    name: Option<String>,
    /// Directory holding the last session and the leaderboard.
    #[arg(long, default_value = "saves")]
    save_dir: PathBuf,
}

/// Entry point for the Undead Survival command-line interface.
fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_level(true)
        .init();

    let args = Args::parse();
    let config = match &args.config {
        Some(path) => config::load(path)?,
        None => GameConfig::default(),
    };
    let limit = Duration::try_from_secs_f32(args.duration)
        .context("`--duration` must be a non-negative number of seconds")?;
    let frame = Duration::from_millis(args.frame_ms.max(1));

    let store = SaveStore::new(&args.save_dir);
    match store.load_last_session() {
        Ok(Some(last)) => println!(
            "Last run: {} survived {}",
            last.player_name(),
            format_clock(last.survived())
        ),
        Ok(None) => {}
        Err(error) => error!("failed to load last session: {error}"),
    }

    let mut session = Session::new(config.session_config(args.seed)?);
    println!("{}", session.welcome_banner());
    session.queue(config.arena_command());
    session.queue(Command::SetPlayMode {
        mode: PlayMode::Running,
    });

    let mut camera = config.camera();
    let mut pilot = Autopilot::new(args.seed);
    let mut stats = RunStats::default();
    while session.outcome().is_none() && query::clock(session.world()) < limit {
        let world = session.world();
        let commands = pilot.plan(
            frame,
            &query::player(world),
            &query::enemy_view(world),
            query::arena(world),
        );
        for command in commands {
            session.queue(command);
        }

        let events = session.step(frame);
        stats.record(query::player(session.world()).id, &events);
        camera.observe(&events);
        camera.follow(query::player(session.world()).position, frame.as_secs_f32());
    }

    let survived = session
        .outcome()
        .unwrap_or_else(|| query::survival_time(session.world()));
    let camera_position = camera.position();
    debug!(
        camera_x = camera_position.x,
        camera_y = camera_position.y,
        shakes = camera.shakes(),
        "final camera state"
    );
    info!(
        survived_secs = survived.as_secs_f32(),
        enemy_deaths = stats.enemy_deaths,
        explosions = stats.explosions,
        damage_taken = stats.damage_taken,
        died = session.outcome().is_some(),
        "run finished"
    );
    println!("Survived {}", format_clock(survived));

    let board = match &args.name {
        Some(name) => save_run(&store, name, survived),
        None => store
            .leaderboard()
            .with_context(|| format!("failed to load leaderboard from {}", store.dir().display())),
    };
    match board {
        Ok(board) => println!("{}", render_leaderboard(&board)),
        Err(error) => error!("{error:#}"),
    }
    Ok(())
}

fn save_run(store: &SaveStore, name: &str, survived: Duration) -> Result<Vec<SessionRecord>> {
    let record = SessionRecord::new(name, survived).context("cannot record this run")?;
    store
        .save_session(&record)
        .with_context(|| format!("failed to save session to {}", store.dir().display()))
}

#[derive(Debug, Default)]
struct RunStats {
    enemy_deaths: u32,
    explosions: u32,
    damage_taken: f32,
}

impl RunStats {
    fn record(&mut self, player: EntityId, events: &[Event]) {
        for event in events {
            match event {
                Event::EntityDied {
                    tag: Tag::Enemy, ..
                } => self.enemy_deaths += 1,
                Event::EnemyDetonated { .. } => self.explosions += 1,
                Event::EntityDamaged { entity, amount, .. } if *entity == player => {
                    self.damage_taken += amount;
                }
                _ => {}
            }
        }
    }
}
