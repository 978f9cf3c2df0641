#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic steering system that chases the player or wanders.
//!
//! Each tick every living, un-stunned enemy picks a heading: toward the player
//! when it is inside the enemy's detection range (zero once within the
//! stopping distance), otherwise a random wander angle that is re-rolled every
//! wander interval. The enemy's velocity then eases toward
//! `heading * move_speed` and the result is proposed to the world through
//! [`Command::SteerEnemy`].

use std::{collections::BTreeMap, f32::consts::TAU, time::Duration};

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::debug;
use undead_survival_core::{
    Command, EnemySnapshot, EnemyView, EntityId, Event, Facing, PlayerSnapshot,
};

const KICK_THRESHOLD: f32 = 0.1;
const KICK_FACTOR: f32 = 0.5;

/// Configuration parameters required to construct the movement system.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    smoothing: f32,
    rng_seed: u64,
}

impl Config {
    /// Creates a configuration with the provided velocity smoothing factor and
    /// wander seed.
    #[must_use]
    pub const fn new(smoothing: f32, rng_seed: u64) -> Self {
        Self {
            smoothing,
            rng_seed,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(10.0, 0x5eed_0f_d3ad)
    }
}

#[derive(Clone, Copy, Debug)]
struct Wander {
    heading: Vec2,
    next_change: Duration,
}

/// Pure system that reacts to world events and emits steering commands.
#[derive(Debug)]
pub struct Movement {
    smoothing: f32,
    rng: ChaCha8Rng,
    clock: Duration,
    wander: BTreeMap<EntityId, Wander>,
}

impl Movement {
    /// Creates a new movement system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            smoothing: config.smoothing.max(0.0),
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
            clock: Duration::ZERO,
            wander: BTreeMap::new(),
        }
    }

    /// Consumes world events and immutable views to emit steering commands.
    pub fn handle(
        &mut self,
        events: &[Event],
        enemies: &EnemyView,
        player: Option<&PlayerSnapshot>,
        out: &mut Vec<Command>,
    ) {
        let mut dt = Duration::ZERO;
        for event in events {
            match event {
                Event::TimeAdvanced { dt: step } => dt = dt.saturating_add(*step),
                Event::EntityDied { entity, .. } | Event::EntityDespawned { entity } => {
                    let _ = self.wander.remove(entity);
                }
                _ => {}
            }
        }

        if dt.is_zero() {
            return;
        }
        self.clock = self.clock.saturating_add(dt);

        if player.is_none() {
            debug!("no player to track; every enemy wanders");
        }
        let target = player
            .filter(|player| !player.dead)
            .map(|player| player.position);

        for enemy in enemies.iter() {
            if enemy.dead || enemy.stunned {
                continue;
            }

            let heading = self.heading(enemy, target);
            let speed = enemy.move_speed;
            let desired = heading * speed;
            let blend = (dt.as_secs_f32() * self.smoothing).min(1.0);
            let mut velocity = enemy.velocity.lerp(desired, blend);
            if velocity.length() < KICK_THRESHOLD && heading.length() > KICK_THRESHOLD {
                velocity = heading * speed * KICK_FACTOR;
            }

            if velocity == enemy.velocity {
                continue;
            }

            out.push(Command::SteerEnemy {
                enemy: enemy.id,
                velocity,
                facing: Facing::from_horizontal(velocity.x),
            });
        }
    }

    fn heading(&mut self, enemy: &EnemySnapshot, target: Option<Vec2>) -> Vec2 {
        if let Some(target) = target {
            let offset = target - enemy.position;
            let distance = offset.length();
            if distance <= enemy.profile.detection_range {
                let _ = self.wander.remove(&enemy.id);
                if distance <= enemy.profile.stopping_distance {
                    return Vec2::ZERO;
                }
                return offset / distance;
            }
        }

        let now = self.clock;
        let interval = enemy.profile.wander_interval;
        let rng = &mut self.rng;
        let state = self.wander.entry(enemy.id).or_insert_with(|| Wander {
            heading: Vec2::ZERO,
            next_change: now,
        });
        if now >= state.next_change {
            let angle = rng.gen_range(0.0..TAU);
            state.heading = Vec2::from_angle(angle);
            state.next_change = now.saturating_add(interval);
        }
        state.heading
    }
}

impl Default for Movement {
    fn default() -> Self {
        Self::new(Config::default())
    }
}
