#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic spawn scheduler that keeps the arena populated with enemies.
//!
//! The scheduler runs spawn cycles on a timer driven by
//! [`Event::TimeAdvanced`]. Each cycle purges dead population entries and
//! then requests up to the current number of entities per spawn, never letting
//! the tracked population (including requests not yet confirmed by the world)
//! exceed the configured maximum. Difficulty is re-evaluated from elapsed
//! simulation time on every tick.

mod curve;

use std::time::Duration;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, warn};
use undead_survival_core::{Command, EnemyKind, EntityId, Event};

pub use curve::{Difficulty, DifficultyCurve};

/// Region inside which spawned enemies appear.
#[derive(Clone, Debug, PartialEq)]
pub enum SpawnArea {
    /// Uniform position inside an axis-aligned rectangle.
    Rect {
        /// Lower-left corner.
        min: Vec2,
        /// Upper-right corner.
        max: Vec2,
    },
    /// Uniformly chosen centre of a precomputed spawnable tile.
    Tiles(Vec<Vec2>),
}

/// Configuration parameters required to construct the spawning system.
#[derive(Clone, Debug)]
pub struct Config {
    area: SpawnArea,
    candidates: Vec<EnemyKind>,
    max_entities: usize,
    curve: DifficultyCurve,
    zombie_speed: (f32, f32),
    rng_seed: u64,
}

impl Config {
    /// Creates a configuration spawning every enemy kind inside `area`.
    #[must_use]
    pub fn new(area: SpawnArea, curve: DifficultyCurve, rng_seed: u64) -> Self {
        Self {
            area,
            candidates: EnemyKind::ALL.to_vec(),
            max_entities: 30,
            curve,
            zombie_speed: (2.0, 4.0),
            rng_seed,
        }
    }

    /// Restricts the kinds that may be spawned.
    #[must_use]
    pub fn with_candidates(mut self, candidates: Vec<EnemyKind>) -> Self {
        self.candidates = candidates;
        self
    }

    /// Overrides the population cap.
    #[must_use]
    pub fn with_max_entities(mut self, max_entities: usize) -> Self {
        self.max_entities = max_entities;
        self
    }

    /// Overrides the range zombie movement speed is rolled from.
    #[must_use]
    pub fn with_zombie_speed(mut self, min: f32, max: f32) -> Self {
        self.zombie_speed = (min.min(max), min.max(max));
        self
    }
}

#[derive(Clone, Copy, Debug)]
struct Tracked {
    id: EntityId,
    alive: bool,
}

/// Pure system that deterministically emits spawn commands while enabled.
#[derive(Debug)]
pub struct Spawning {
    area: SpawnArea,
    candidates: Vec<EnemyKind>,
    max_entities: usize,
    curve: DifficultyCurve,
    zombie_speed: (f32, f32),
    rng: ChaCha8Rng,
    enabled: bool,
    elapsed: Duration,
    until_next_cycle: Duration,
    difficulty: Difficulty,
    population: Vec<Tracked>,
    pending: usize,
    warned_empty_area: bool,
}

impl Spawning {
    /// Creates a new spawning system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        let difficulty = config.curve.at(Duration::ZERO);
        Self {
            area: config.area,
            candidates: config.candidates,
            max_entities: config.max_entities,
            curve: config.curve,
            zombie_speed: config.zombie_speed,
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
            enabled: true,
            elapsed: Duration::ZERO,
            until_next_cycle: Duration::ZERO,
            difficulty,
            population: Vec::new(),
            pending: 0,
            warned_empty_area: false,
        }
    }

    /// Starts or stops the spawn loop.
    ///
    /// Disabling cancels the cycle timer; the next cycle after re-enabling
    /// runs on the first tick.
    pub fn set_enabled(&mut self, enabled: bool) {
        if self.enabled == enabled {
            return;
        }
        self.enabled = enabled;
        self.until_next_cycle = Duration::ZERO;
        debug!(enabled, "spawn loop toggled");
    }

    /// Reports whether the spawn loop is active.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Difficulty evaluated at the most recent tick.
    #[must_use]
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    /// Number of tracked entities, alive or awaiting the next purge, plus
    /// requests not yet confirmed by the world.
    #[must_use]
    pub fn population(&self) -> usize {
        self.population.len() + self.pending
    }

    /// Consumes world events and emits spawn commands.
    pub fn handle(&mut self, events: &[Event], out: &mut Vec<Command>) {
        let mut accumulated = Duration::ZERO;
        for event in events {
            match event {
                Event::TimeAdvanced { dt } => accumulated = accumulated.saturating_add(*dt),
                Event::EnemySpawned { enemy, .. } => self.track(*enemy),
                Event::EntityDied { entity, .. } => self.mark_dead(*entity),
                Event::EntityDespawned { entity } => self.mark_dead(*entity),
                _ => {}
            }
        }

        if accumulated.is_zero() || !self.enabled {
            return;
        }

        self.elapsed = self.elapsed.saturating_add(accumulated);
        self.difficulty = self.curve.at(self.elapsed);

        if self.until_next_cycle > accumulated {
            self.until_next_cycle -= accumulated;
            return;
        }

        self.run_cycle(out);
        self.until_next_cycle = self.difficulty.spawn_interval;
    }

    fn track(&mut self, enemy: EntityId) {
        if self.pending == 0 {
            debug!(enemy = enemy.get(), "spawn confirmed without a pending request");
        }
        self.pending = self.pending.saturating_sub(1);
        self.population.push(Tracked {
            id: enemy,
            alive: true,
        });
    }

    fn mark_dead(&mut self, entity: EntityId) {
        if let Some(tracked) = self
            .population
            .iter_mut()
            .find(|tracked| tracked.id == entity)
        {
            tracked.alive = false;
        }
    }

    fn run_cycle(&mut self, out: &mut Vec<Command>) {
        self.population.retain(|tracked| tracked.alive);

        if self.candidates.is_empty() {
            return;
        }
        if let SpawnArea::Tiles(tiles) = &self.area {
            if tiles.is_empty() {
                if !self.warned_empty_area {
                    warn!("no spawnable tiles configured; spawning nothing");
                    self.warned_empty_area = true;
                }
                return;
            }
        }

        for _ in 0..self.difficulty.entities_per_spawn {
            if self.population() >= self.max_entities {
                debug!(
                    population = self.population(),
                    max = self.max_entities,
                    "spawn refused at population cap"
                );
                break;
            }

            let position = self.roll_position();
            let kind = self.candidates[self.rng.gen_range(0..self.candidates.len())];
            let move_speed = match kind {
                EnemyKind::Zombie => Some(self.roll_zombie_speed()),
                EnemyKind::UndeadArcher | EnemyKind::KamikazeSlime => None,
            };

            self.pending += 1;
            out.push(Command::SpawnEnemy {
                kind,
                position,
                move_speed,
            });
        }
    }

    fn roll_position(&mut self) -> Vec2 {
        match &self.area {
            SpawnArea::Rect { min, max } => {
                let low = min.min(*max);
                let high = min.max(*max);
                Vec2::new(
                    roll_between(&mut self.rng, low.x, high.x),
                    roll_between(&mut self.rng, low.y, high.y),
                )
            }
            SpawnArea::Tiles(tiles) => tiles[self.rng.gen_range(0..tiles.len())],
        }
    }

    fn roll_zombie_speed(&mut self) -> f32 {
        let (min, max) = self.zombie_speed;
        roll_between(&mut self.rng, min, max)
    }
}

/// Uniform draw from `low..=high`. A non-finite bound collapses the range onto
/// the other bound, or onto zero when neither is finite.
fn roll_between(rng: &mut ChaCha8Rng, low: f32, high: f32) -> f32 {
    match (low.is_finite(), high.is_finite()) {
        (true, true) => {}
        (true, false) => return low,
        (false, true) => return high,
        (false, false) => return 0.0,
    }
    if high > low {
        rng.gen_range(low..=high)
    } else {
        low
    }
}
