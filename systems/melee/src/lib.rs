#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Zombie contact attacks.
//!
//! A zombie touching the player deals damage at most once per attack interval
//! and then stuns itself, which keeps it from chasing while it recovers.

use std::{collections::BTreeMap, time::Duration};

use tracing::debug;
use undead_survival_core::{Command, EnemyKind, EnemyView, EntityId, Event, PlayerSnapshot};

/// Configuration parameters required to construct the melee system.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    damage: f32,
    attack_interval: Duration,
    stun_duration: Duration,
}

impl Config {
    /// Creates a configuration with the provided damage per hit, minimum time
    /// between hits and self-stun applied after each hit.
    #[must_use]
    pub const fn new(damage: f32, attack_interval: Duration, stun_duration: Duration) -> Self {
        Self {
            damage,
            attack_interval,
            stun_duration,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(5.0, Duration::from_millis(500), Duration::from_secs(1))
    }
}

/// Pure system that turns zombie contacts into player damage.
#[derive(Debug)]
pub struct Melee {
    config: Config,
    clock: Duration,
    last_hit: BTreeMap<EntityId, Duration>,
}

impl Melee {
    /// Creates a new melee system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            config,
            clock: Duration::ZERO,
            last_hit: BTreeMap::new(),
        }
    }

    /// Consumes world events and immutable views to emit attack commands.
    pub fn handle(
        &mut self,
        events: &[Event],
        enemies: &EnemyView,
        player: Option<&PlayerSnapshot>,
        out: &mut Vec<Command>,
    ) {
        for event in events {
            match event {
                Event::TimeAdvanced { dt } => self.clock = self.clock.saturating_add(*dt),
                Event::EntityDied { entity, .. } | Event::EntityDespawned { entity } => {
                    let _ = self.last_hit.remove(entity);
                }
                _ => {}
            }
        }

        for event in events {
            let Event::PlayerContact { enemy } = event else {
                continue;
            };
            let Some(attacker) = enemies.get(*enemy) else {
                continue;
            };
            if attacker.kind != EnemyKind::Zombie || attacker.dead || attacker.stunned {
                continue;
            }
            let Some(player) = player.filter(|player| !player.dead) else {
                debug!(enemy = enemy.get(), "zombie contact without a living player");
                continue;
            };

            let ready = self.last_hit.get(enemy).map_or(true, |last| {
                self.clock.saturating_sub(*last) >= self.config.attack_interval
            });
            if !ready {
                continue;
            }

            let _ = self.last_hit.insert(*enemy, self.clock);
            out.push(Command::ApplyDamage {
                target: player.id,
                amount: self.config.damage,
            });
            out.push(Command::StunEnemy {
                enemy: *enemy,
                duration: self.config.stun_duration,
            });
        }
    }
}

impl Default for Melee {
    fn default() -> Self {
        Self::new(Config::default())
    }
}
