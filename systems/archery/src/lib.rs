#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Undead archer shooting sequence.
//!
//! While the player stays inside an archer's detection range the archer counts
//! down its cooldown. At zero it locks its own movement for the whole
//! sequence, requests the shooting animation, fires a projectile at the
//! player's current position after the aim time and returns to idle once the
//! recovery time has passed.

use std::{collections::BTreeMap, time::Duration};

use tracing::debug;
use undead_survival_core::{
    Command, EnemyKind, EnemySnapshot, EnemyView, EntityId, Event, Feedback, PlayerSnapshot,
};

/// Configuration parameters required to construct the archery system.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    shooting_time: Duration,
    aim_time: Duration,
    recovery_time: Duration,
    projectile_speed: f32,
    damage: f32,
}

impl Config {
    /// Creates a configuration with the cooldown between sequences and the
    /// timings of a single sequence.
    #[must_use]
    pub const fn new(shooting_time: Duration, aim_time: Duration, recovery_time: Duration) -> Self {
        Self {
            shooting_time,
            aim_time,
            recovery_time,
            projectile_speed: 5.0,
            damage: 10.0,
        }
    }

    /// Overrides the speed and damage of launched projectiles.
    #[must_use]
    pub const fn with_projectile(mut self, speed: f32, damage: f32) -> Self {
        self.projectile_speed = speed;
        self.damage = damage;
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(
            Duration::from_millis(2_500),
            Duration::from_millis(500),
            Duration::from_millis(500),
        )
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
    Idle { cooldown: Duration },
    Aiming { remaining: Duration },
    Recovering { remaining: Duration },
}

/// Pure system that drives every archer's aim, shoot and recover cycle.
#[derive(Debug)]
pub struct Archery {
    config: Config,
    archers: BTreeMap<EntityId, Phase>,
}

impl Archery {
    /// Creates a new archery system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            config,
            archers: BTreeMap::new(),
        }
    }

    /// Number of archers currently inside a shooting sequence.
    #[must_use]
    pub fn shooting(&self) -> usize {
        self.archers
            .values()
            .filter(|phase| !matches!(phase, Phase::Idle { .. }))
            .count()
    }

    /// Consumes world events and immutable views to emit shooting commands.
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
                    if matches!(
                        self.archers.remove(entity),
                        Some(Phase::Aiming { .. } | Phase::Recovering { .. })
                    ) {
                        debug!(enemy = entity.get(), "archer sequence cancelled");
                    }
                }
                _ => {}
            }
        }

        if dt.is_zero() {
            return;
        }

        let player = player.filter(|player| !player.dead);
        for archer in enemies.iter() {
            if archer.kind != EnemyKind::UndeadArcher || archer.dead {
                continue;
            }
            let phase = self
                .archers
                .get(&archer.id)
                .copied()
                .unwrap_or(Phase::Idle {
                    cooldown: Duration::ZERO,
                });
            let next = self.advance(archer, phase, dt, player, out);
            let _ = self.archers.insert(archer.id, next);
        }
    }

    fn advance(
        &self,
        archer: &EnemySnapshot,
        phase: Phase,
        dt: Duration,
        player: Option<&PlayerSnapshot>,
        out: &mut Vec<Command>,
    ) -> Phase {
        match phase {
            Phase::Idle { cooldown } => {
                let in_range = player.is_some_and(|player| {
                    player.position.distance(archer.position) <= archer.profile.detection_range
                });
                if !in_range {
                    return phase;
                }
                if !cooldown.is_zero() {
                    return Phase::Idle {
                        cooldown: cooldown.saturating_sub(dt),
                    };
                }

                out.push(Command::StunEnemy {
                    enemy: archer.id,
                    duration: self.config.aim_time.saturating_add(self.config.recovery_time),
                });
                out.push(Command::EmitFeedback(Feedback::ShootAnimation {
                    enemy: archer.id,
                }));
                Phase::Aiming {
                    remaining: self.config.aim_time,
                }
            }
            Phase::Aiming { remaining } => {
                let remaining = remaining.saturating_sub(dt);
                if !remaining.is_zero() {
                    return Phase::Aiming { remaining };
                }

                match player {
                    Some(player) => {
                        let direction = (player.position - archer.position).normalize_or_zero();
                        out.push(Command::LaunchProjectile {
                            owner: archer.id,
                            direction,
                            speed: self.config.projectile_speed,
                            damage: self.config.damage,
                        });
                    }
                    None => debug!(enemy = archer.id.get(), "archer lost its target"),
                }
                Phase::Recovering {
                    remaining: self.config.recovery_time,
                }
            }
            Phase::Recovering { remaining } => {
                let remaining = remaining.saturating_sub(dt);
                if remaining.is_zero() {
                    Phase::Idle {
                        cooldown: self.config.shooting_time,
                    }
                } else {
                    Phase::Recovering { remaining }
                }
            }
        }
    }
}

impl Default for Archery {
    fn default() -> Self {
        Self::new(Config::default())
    }
}
