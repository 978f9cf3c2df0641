#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Kamikaze explosion resolver.
//!
//! A kamikaze slime lights its fuse on the first contact with the player.
//! When the fuse burns down the blast is resolved against the slime's trigger
//! circle: player damage is contributed to the world's per-tick damage ledger
//! so simultaneous explosions land as a single hit, every other enemy inside
//! the circle takes splash damage immediately, and finally the slime detonates.

use std::{
    collections::{BTreeMap, BTreeSet},
    time::Duration,
};

use glam::Vec2;
use tracing::{debug, warn};
use undead_survival_core::{
    AudioCue, Command, EnemyKind, EnemySnapshot, EnemyView, EntityId, Event, Feedback,
    SpatialQuery, Tag,
};

/// Blast radius used when a kamikaze carries no trigger circle.
pub const FALLBACK_BLAST_RADIUS: f32 = 1.0;

/// Configuration parameters required to construct the explosion system.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    damage: f32,
    fuse_delay: Duration,
    splash_damage: f32,
}

impl Config {
    /// Creates a configuration with the provided player damage, fuse length
    /// and splash damage dealt to nearby enemies.
    #[must_use]
    pub const fn new(damage: f32, fuse_delay: Duration, splash_damage: f32) -> Self {
        Self {
            damage,
            fuse_delay,
            splash_damage,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(25.0, Duration::from_secs(2), 100.0)
    }
}

/// Pure system that arms kamikaze fuses and resolves their blasts.
#[derive(Debug)]
pub struct Explosions {
    config: Config,
    fuses: BTreeMap<EntityId, Duration>,
    triggered: BTreeSet<EntityId>,
}

impl Explosions {
    /// Creates a new explosion system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            config,
            fuses: BTreeMap::new(),
            triggered: BTreeSet::new(),
        }
    }

    /// Number of fuses currently burning.
    #[must_use]
    pub fn armed(&self) -> usize {
        self.fuses.len()
    }

    /// Consumes world events and immutable views to emit explosion commands.
    ///
    /// Fuses advance before new contacts are processed, so a fuse lit in this
    /// batch starts burning on the next tick.
    pub fn handle<S>(
        &mut self,
        events: &[Event],
        enemies: &EnemyView,
        spatial: &S,
        out: &mut Vec<Command>,
    ) where
        S: SpatialQuery + ?Sized,
    {
        let mut dt = Duration::ZERO;
        for event in events {
            match event {
                Event::TimeAdvanced { dt: step } => dt = dt.saturating_add(*step),
                Event::EntityDied { entity, .. } => {
                    if self.fuses.remove(entity).is_some() {
                        debug!(enemy = entity.get(), "fuse cancelled by death");
                    }
                }
                Event::EntityDespawned { entity } => {
                    let _ = self.fuses.remove(entity);
                    let _ = self.triggered.remove(entity);
                }
                _ => {}
            }
        }

        if !dt.is_zero() {
            let mut expired = Vec::new();
            for (enemy, remaining) in &mut self.fuses {
                *remaining = remaining.saturating_sub(dt);
                if remaining.is_zero() {
                    expired.push(*enemy);
                }
            }
            for enemy in expired {
                let _ = self.fuses.remove(&enemy);
                match enemies.get(enemy).filter(|snapshot| !snapshot.dead) {
                    Some(snapshot) => self.resolve_blast(snapshot, spatial, out),
                    None => debug!(enemy = enemy.get(), "fuse burnt out for a missing enemy"),
                }
            }
        }

        for event in events {
            if let Event::PlayerContact { enemy } = event {
                self.light_fuse(*enemy, enemies, out);
            }
        }
    }

    fn light_fuse(&mut self, enemy: EntityId, enemies: &EnemyView, out: &mut Vec<Command>) {
        let Some(snapshot) = enemies.get(enemy) else {
            return;
        };
        if snapshot.kind != EnemyKind::KamikazeSlime || snapshot.dead {
            return;
        }
        if !self.triggered.insert(enemy) {
            return;
        }

        let _ = self.fuses.insert(enemy, self.config.fuse_delay);
        out.push(Command::EmitFeedback(Feedback::FuseLit { enemy }));
    }

    fn resolve_blast<S>(&self, slime: &EnemySnapshot, spatial: &S, out: &mut Vec<Command>)
    where
        S: SpatialQuery + ?Sized,
    {
        let (center, radius) = blast_circle(slime);

        match spatial.find_by_tag(Tag::Player) {
            Some(player) => {
                let in_range = slime.profile.collider.is_none()
                    || player.position.distance(center) <= radius;
                if in_range {
                    out.push(Command::QueueDamage {
                        target: player.id,
                        amount: self.config.damage,
                    });
                }
            }
            None => warn!(enemy = slime.id.get(), "explosion found no player to damage"),
        }

        for hit in spatial.overlap_circle(center, radius) {
            if hit.tag != Tag::Enemy || hit.id == slime.id {
                continue;
            }
            out.push(Command::ApplyDamage {
                target: hit.id,
                amount: self.config.splash_damage,
            });
        }

        out.push(Command::EmitFeedback(Feedback::CameraShake));
        out.push(Command::EmitFeedback(Feedback::Audio(AudioCue::Explosion)));
        out.push(Command::Detonate { enemy: slime.id });
    }
}

impl Default for Explosions {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

fn blast_circle(slime: &EnemySnapshot) -> (Vec2, f32) {
    match slime.profile.collider {
        Some(collider) => (slime.position + collider.offset(), collider.radius()),
        None => (slime.position, FALLBACK_BLAST_RADIUS),
    }
}
