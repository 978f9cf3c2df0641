#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Session bootstrap that assembles the Undead Survival world and its systems.
//!
//! A [`Session`] owns the authoritative world together with every pure system
//! and advances them one frame at a time. Each [`Session::step`] applies queued
//! input commands, ticks the world, dispatches the resulting events to the
//! systems in rounds until no further commands are produced, and finally closes
//! the frame so the pending damage ledger is flushed exactly once.

use std::time::Duration;

use tracing::{debug, info, warn};
use undead_survival_core::{Command, Event};
use undead_survival_system_archery::{self as archery, Archery};
use undead_survival_system_explosion::{self as explosion, Explosions};
use undead_survival_system_melee::{self as melee, Melee};
use undead_survival_system_movement::{self as movement, Movement};
use undead_survival_system_spawning::{self as spawning, Spawning};
use undead_survival_world::{self as world, query, World, WorldConfig};

const DEFAULT_MAX_ROUNDS: usize = 16;

/// Aggregated configuration for the world and every system of a session.
#[derive(Clone, Debug)]
pub struct SessionConfig {
    /// Tuning of the player and world-owned entities.
    pub world: WorldConfig,
    /// Spawn scheduler configuration.
    pub spawning: spawning::Config,
    /// Steering configuration.
    pub movement: movement::Config,
    /// Zombie contact attack configuration.
    pub melee: melee::Config,
    /// Archer shooting configuration.
    pub archery: archery::Config,
    /// Kamikaze explosion configuration.
    pub explosion: explosion::Config,
    /// Upper bound on dispatch rounds within a single tick.
    pub max_rounds: usize,
}

impl SessionConfig {
    /// Creates a configuration with default tuning around the provided spawner.
    #[must_use]
    pub fn new(spawning: spawning::Config) -> Self {
        Self {
            world: WorldConfig::default(),
            spawning,
            movement: movement::Config::default(),
            melee: melee::Config::default(),
            archery: archery::Config::default(),
            explosion: explosion::Config::default(),
            max_rounds: DEFAULT_MAX_ROUNDS,
        }
    }
}

/// Steppable game session composed of the world and its systems.
#[derive(Debug)]
pub struct Session {
    world: World,
    spawning: Spawning,
    movement: Movement,
    melee: Melee,
    archery: Archery,
    explosions: Explosions,
    queued: Vec<Command>,
    max_rounds: usize,
    outcome: Option<Duration>,
}

impl Session {
    /// Creates a paused session using the supplied configuration.
    #[must_use]
    pub fn new(config: SessionConfig) -> Self {
        Self {
            world: World::with_config(config.world),
            spawning: Spawning::new(config.spawning),
            movement: Movement::new(config.movement),
            melee: Melee::new(config.melee),
            archery: Archery::new(config.archery),
            explosions: Explosions::new(config.explosion),
            queued: Vec::new(),
            max_rounds: config.max_rounds.max(1),
            outcome: None,
        }
    }

    /// Queues an input command applied at the start of the next step.
    pub fn queue(&mut self, command: Command) {
        self.queued.push(command);
    }

    /// Provides read-only access to the authoritative world.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Derives the banner that should be shown when the experience starts.
    #[must_use]
    pub fn welcome_banner(&self) -> &'static str {
        query::welcome_banner(&self.world)
    }

    /// Number of enemies the spawner currently accounts for.
    #[must_use]
    pub fn population(&self) -> usize {
        self.spawning.population()
    }

    /// Starts or stops the spawn loop.
    pub fn set_spawning_enabled(&mut self, enabled: bool) {
        self.spawning.set_enabled(enabled);
    }

    /// Survival time recorded when the player died, if the run is over.
    #[must_use]
    pub fn outcome(&self) -> Option<Duration> {
        self.outcome
    }

    /// Advances the session by one frame and returns every event it produced.
    pub fn step(&mut self, dt: Duration) -> Vec<Event> {
        let mut log = Vec::new();

        let mut events = Vec::new();
        for command in std::mem::take(&mut self.queued) {
            world::apply(&mut self.world, command, &mut events);
        }
        world::apply(&mut self.world, Command::Tick { dt }, &mut events);
        self.pump(events, &mut log);

        let mut events = Vec::new();
        world::apply(&mut self.world, Command::EndFrame, &mut events);
        self.pump(events, &mut log);

        log
    }

    fn pump(&mut self, mut events: Vec<Event>, log: &mut Vec<Event>) {
        let mut rounds = 0;
        while !events.is_empty() {
            self.observe(&events);
            let commands = self.dispatch(&events);
            log.append(&mut events);
            if commands.is_empty() {
                break;
            }

            rounds += 1;
            if rounds > self.max_rounds {
                warn!(
                    rounds,
                    dropped = commands.len(),
                    "dispatch did not settle within the round limit"
                );
                break;
            }

            for command in commands {
                world::apply(&mut self.world, command, &mut events);
            }
        }
        debug!(rounds, "frame pump settled");
    }

    fn observe(&mut self, events: &[Event]) {
        for event in events {
            if let Event::SurvivalEnded { survived } = event {
                info!(survived_secs = survived.as_secs_f32(), "player died");
                self.outcome = Some(*survived);
                self.spawning.set_enabled(false);
            }
        }
    }

    fn dispatch(&mut self, events: &[Event]) -> Vec<Command> {
        let enemies = query::enemy_view(&self.world);
        let player = query::player(&self.world);
        let mut commands = Vec::new();

        self.spawning.handle(events, &mut commands);
        self.movement
            .handle(events, &enemies, Some(&player), &mut commands);
        self.melee.handle(events, &enemies, Some(&player), &mut commands);
        self.archery
            .handle(events, &enemies, Some(&player), &mut commands);
        self.explosions
            .handle(events, &enemies, &self.world, &mut commands);

        commands
    }
}
