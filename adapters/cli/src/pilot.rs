//! Scripted stand-in for keyboard and mouse input.
//!
//! The pilot backs away from the nearest enemy once it comes within
//! [`DANGER_RADIUS`], drifts back toward the arena centre otherwise and fires
//! at the nearest living enemy whenever its trigger cooldown allows.

use std::time::Duration;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use undead_survival_core::{Command, EnemySnapshot, EnemyView, PlayerSnapshot};
use undead_survival_world::Arena;

const DANGER_RADIUS: f32 = 6.0;
const CENTRE_PULL: f32 = 0.3;
const JITTER: f32 = 0.2;
const DEFAULT_FIRE_INTERVAL: Duration = Duration::from_millis(300);

#[derive(Debug)]
pub(crate) struct Autopilot {
    rng: ChaCha8Rng,
    fire_interval: Duration,
    cooldown: Duration,
}

impl Autopilot {
    pub(crate) fn new(seed: u64) -> Self {
        Self::with_fire_interval(seed, DEFAULT_FIRE_INTERVAL)
    }

    pub(crate) fn with_fire_interval(seed: u64, fire_interval: Duration) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            fire_interval,
            cooldown: Duration::ZERO,
        }
    }

    /// Input commands for the next frame.
    pub(crate) fn plan(
        &mut self,
        dt: Duration,
        player: &PlayerSnapshot,
        enemies: &EnemyView,
        arena: &Arena,
    ) -> Vec<Command> {
        if player.dead {
            return Vec::new();
        }

        let nearest = nearest_enemy(player.position, enemies);
        let mut commands = vec![Command::MovePlayer {
            input: self.steer(player.position, nearest, arena),
        }];

        self.cooldown = self.cooldown.saturating_sub(dt);
        if let Some(target) = nearest {
            let aim = target.position - player.position;
            if self.cooldown.is_zero() && aim != Vec2::ZERO {
                commands.push(Command::FireBullet { direction: aim });
                self.cooldown = self.fire_interval;
            }
        }
        commands
    }

    fn steer(&mut self, position: Vec2, nearest: Option<&EnemySnapshot>, arena: &Arena) -> Vec2 {
        let centre = (arena.min() + arena.max()) * 0.5;
        let mut heading = (centre - position).normalize_or_zero() * CENTRE_PULL;
        if let Some(enemy) = nearest {
            let away = position - enemy.position;
            if away.length() < DANGER_RADIUS {
                heading += away.normalize_or_zero();
            }
        }
        heading += Vec2::new(
            self.rng.gen_range(-JITTER..=JITTER),
            self.rng.gen_range(-JITTER..=JITTER),
        );
        heading.clamp_length_max(1.0)
    }
}

fn nearest_enemy(position: Vec2, enemies: &EnemyView) -> Option<&EnemySnapshot> {
    enemies
        .iter()
        .filter(|enemy| !enemy.dead)
        .min_by(|a, b| {
            a.position
                .distance_squared(position)
                .total_cmp(&b.position.distance_squared(position))
        })
}
