#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Undead Survival.

mod health;
mod ledger;
mod projectiles;
mod spatial;
mod stun;

use std::time::Duration;

use glam::Vec2;
use tracing::{debug, warn};
use undead_survival_core::{
    AudioCue, Command, EnemyKind, EnemyProfile, EntityId, Event, Facing, Feedback, PlayMode, Tag,
    WELCOME_BANNER,
};

use self::{
    health::{DamageOutcome, Health},
    ledger::PendingDamageLedger,
    projectiles::{Faction, Projectile},
    stun::Stun,
};

const PLAYER_ID: EntityId = EntityId::new(0);

const DEFAULT_ARENA_MIN: Vec2 = Vec2::new(-20.0, -12.0);
const DEFAULT_ARENA_MAX: Vec2 = Vec2::new(20.0, 12.0);

/// Tuning for the player and for world-owned entities.
#[derive(Clone, Debug, PartialEq)]
pub struct WorldConfig {
    /// Health the player starts with.
    pub player_max_health: f32,
    /// Player movement speed in world units per second.
    pub player_speed: f32,
    /// Radius of the player's body.
    pub player_radius: f32,
    /// Speed of player bullets.
    pub bullet_speed: f32,
    /// Time after which an unspent bullet disappears.
    pub bullet_lifetime: Duration,
    /// Damage a bullet deals to the enemy it hits.
    pub bullet_damage: f32,
    /// Radius of a player bullet.
    pub bullet_radius: f32,
    /// Radius of an enemy projectile.
    pub arrow_radius: f32,
    /// Impulse magnitude requested when an arrow hits the player.
    pub knockback_force: f32,
    /// Time a killed enemy stays in the world before it is removed.
    pub death_linger: Duration,
    /// Time a detonated enemy stays in the world before it is removed.
    pub detonation_linger: Duration,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            player_max_health: 100.0,
            player_speed: 5.0,
            player_radius: 0.5,
            bullet_speed: 10.0,
            bullet_lifetime: Duration::from_secs(3),
            bullet_damage: 5.0,
            bullet_radius: 0.1,
            arrow_radius: 0.2,
            knockback_force: 5.0,
            death_linger: Duration::from_secs(1),
            detonation_linger: Duration::from_millis(1_500),
        }
    }
}

/// Axis-aligned playable area. Bodies are clamped inside it and projectiles
/// leaving it are destroyed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Arena {
    min: Vec2,
    max: Vec2,
}

impl Arena {
    pub(crate) fn new(a: Vec2, b: Vec2) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Lower-left corner of the arena.
    #[must_use]
    pub const fn min(&self) -> Vec2 {
        self.min
    }

    /// Upper-right corner of the arena.
    #[must_use]
    pub const fn max(&self) -> Vec2 {
        self.max
    }

    /// Total width of the arena in world units.
    #[must_use]
    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    /// Total height of the arena in world units.
    #[must_use]
    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    /// Reports whether the point lies inside the arena, borders included.
    #[must_use]
    pub fn contains(&self, point: Vec2) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }

    /// Moves the point to the closest position inside the arena.
    #[must_use]
    pub fn clamp(&self, point: Vec2) -> Vec2 {
        point.clamp(self.min, self.max)
    }
}

/// Represents the authoritative Undead Survival world state.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    config: WorldConfig,
    arena: Arena,
    play_mode: PlayMode,
    clock: Duration,
    survived: Duration,
    tick_index: u64,
    next_entity_id: u32,
    player: Player,
    enemies: Vec<Enemy>,
    projectiles: Vec<Projectile>,
    ledger: PendingDamageLedger,
}

impl World {
    /// Creates a paused world with default tuning and arena.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(WorldConfig::default())
    }

    /// Creates a paused world using the provided tuning.
    #[must_use]
    pub fn with_config(config: WorldConfig) -> Self {
        let arena = Arena::new(DEFAULT_ARENA_MIN, DEFAULT_ARENA_MAX);
        let player = Player::new(Vec2::ZERO, config.player_max_health);
        Self {
            banner: WELCOME_BANNER,
            config,
            arena,
            play_mode: PlayMode::Paused,
            clock: Duration::ZERO,
            survived: Duration::ZERO,
            tick_index: 0,
            next_entity_id: PLAYER_ID.get() + 1,
            player,
            enemies: Vec::new(),
            projectiles: Vec::new(),
            ledger: PendingDamageLedger::new(),
        }
    }

    fn allocate_id(&mut self) -> EntityId {
        let id = EntityId::new(self.next_entity_id);
        self.next_entity_id = self.next_entity_id.wrapping_add(1);
        id
    }

    fn enemy_mut(&mut self, enemy: EntityId) -> Option<&mut Enemy> {
        self.enemies.iter_mut().find(|candidate| candidate.id == enemy)
    }

    fn living_enemy_mut(&mut self, enemy: EntityId) -> Option<&mut Enemy> {
        self.enemy_mut(enemy)
            .filter(|candidate| !candidate.health.is_dead())
    }

    fn damage_entity(&mut self, target: EntityId, amount: f32, out_events: &mut Vec<Event>) {
        if target == self.player.id {
            self.damage_player(amount, out_events);
            return;
        }

        let death_linger = self.config.death_linger;
        let Some(enemy) = self.enemy_mut(target) else {
            debug!(target = target.get(), "damage addressed to unknown entity");
            return;
        };

        let outcome = enemy.health.apply_damage(amount);
        if outcome == DamageOutcome::Ignored {
            return;
        }

        out_events.push(Event::EntityDamaged {
            entity: target,
            amount,
            remaining: enemy.health.current(),
        });
        out_events.push(Event::Feedback(Feedback::HitFlash { entity: target }));

        if outcome == DamageOutcome::Died {
            enemy.die(death_linger);
            out_events.push(Event::EntityDied {
                entity: target,
                tag: Tag::Enemy,
            });
        }
    }

    fn damage_player(&mut self, amount: f32, out_events: &mut Vec<Event>) {
        let outcome = self.player.health.apply_damage(amount);
        if outcome == DamageOutcome::Ignored {
            return;
        }

        out_events.push(Event::EntityDamaged {
            entity: self.player.id,
            amount,
            remaining: self.player.health.current(),
        });
        out_events.push(Event::Feedback(Feedback::CameraShake));
        out_events.push(Event::Feedback(Feedback::Audio(AudioCue::PlayerHurt)));

        if outcome == DamageOutcome::Died {
            self.player.input = Vec2::ZERO;
            out_events.push(Event::EntityDied {
                entity: self.player.id,
                tag: Tag::Player,
            });
            out_events.push(Event::SurvivalEnded {
                survived: self.survived,
            });
        }
    }

    fn flush_damage(&mut self, out_events: &mut Vec<Event>) {
        for (target, total) in self.ledger.drain() {
            self.damage_entity(target, total, out_events);
        }
    }

    fn advance(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        if !self.ledger.is_empty() {
            debug!(
                opened_in = self.ledger.tick_index(),
                "flushing damage ledger left open by a previous tick"
            );
            self.flush_damage(out_events);
        }

        self.tick_index = self.tick_index.saturating_add(1);
        self.clock = self.clock.saturating_add(dt);
        out_events.push(Event::TimeAdvanced { dt });

        self.remove_expired_corpses(dt, out_events);
        self.expire_stuns(out_events);
        self.integrate_bodies(dt);
        self.advance_projectiles(dt, out_events);
        self.detect_player_contacts(out_events);

        if !self.player.health.is_dead() {
            self.survived = self.survived.saturating_add(dt);
        }
    }

    fn remove_expired_corpses(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        let mut removed: Vec<EntityId> = Vec::new();
        for enemy in &mut self.enemies {
            if let Some(remaining) = enemy.linger.as_mut() {
                *remaining = remaining.saturating_sub(dt);
                if remaining.is_zero() {
                    removed.push(enemy.id);
                }
            }
        }

        if removed.is_empty() {
            return;
        }

        self.enemies.retain(|enemy| !removed.contains(&enemy.id));
        for entity in removed {
            out_events.push(Event::EntityDespawned { entity });
        }
    }

    fn expire_stuns(&mut self, out_events: &mut Vec<Event>) {
        let now = self.clock;
        for enemy in &mut self.enemies {
            if enemy.health.is_dead() {
                continue;
            }
            if enemy.stun.expire(now) {
                out_events.push(Event::EnemyRecovered { enemy: enemy.id });
            }
        }
    }

    fn integrate_bodies(&mut self, dt: Duration) {
        let seconds = dt.as_secs_f32();
        let arena = self.arena;

        if !self.player.health.is_dead() {
            let step = self.player.input * self.config.player_speed * seconds;
            self.player.position = arena.clamp(self.player.position + step);
        }

        for enemy in &mut self.enemies {
            if enemy.health.is_dead() || enemy.stun.is_stunned() {
                continue;
            }
            enemy.position = arena.clamp(enemy.position + enemy.velocity * seconds);
        }
    }

    fn advance_projectiles(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        if self.projectiles.is_empty() {
            return;
        }

        let player_alive = !self.player.health.is_dead();
        let mut hits: Vec<ProjectileHit> = Vec::new();
        let mut spent: Vec<EntityId> = Vec::new();

        for projectile in &mut self.projectiles {
            let alive = projectile.advance(dt);

            let hit = match projectile.faction {
                Faction::Enemy => (player_alive
                    && projectile.touches(self.player.position, self.config.player_radius))
                .then(|| ProjectileHit {
                    target: self.player.id,
                    damage: projectile.damage,
                    impulse: (self.player.position - projectile.position).normalize_or_zero()
                        * self.config.knockback_force,
                }),
                Faction::Player => self
                    .enemies
                    .iter()
                    .filter(|enemy| !enemy.health.is_dead())
                    .find(|enemy| projectile.touches(enemy.position, enemy.profile.body_radius))
                    .map(|enemy| ProjectileHit {
                        target: enemy.id,
                        damage: projectile.damage,
                        impulse: Vec2::ZERO,
                    }),
            };

            if let Some(hit) = hit {
                hits.push(hit);
                spent.push(projectile.id);
            } else if !alive || !self.arena.contains(projectile.position) {
                spent.push(projectile.id);
            }
        }

        for hit in hits {
            self.damage_entity(hit.target, hit.damage, out_events);
            if hit.impulse != Vec2::ZERO {
                out_events.push(Event::Feedback(Feedback::Knockback {
                    entity: hit.target,
                    impulse: hit.impulse,
                }));
            }
        }

        if spent.is_empty() {
            return;
        }

        self.projectiles
            .retain(|projectile| !spent.contains(&projectile.id));
        for entity in spent {
            out_events.push(Event::EntityDespawned { entity });
        }
    }

    fn detect_player_contacts(&self, out_events: &mut Vec<Event>) {
        if self.player.health.is_dead() {
            return;
        }

        let player_position = self.player.position;
        let player_radius = self.config.player_radius;
        for enemy in self.enemies.iter().filter(|enemy| !enemy.health.is_dead()) {
            let (center, radius) = enemy.contact_circle();
            if center.distance(player_position) <= radius + player_radius {
                out_events.push(Event::PlayerContact { enemy: enemy.id });
            }
        }
    }

    /// Rebuilds the arena. Every cleared body is reported as despawned and
    /// identifiers keep counting up, so systems never see a reused id.
    fn reset(&mut self, min: Vec2, max: Vec2, player_spawn: Vec2, out_events: &mut Vec<Event>) {
        self.arena = Arena::new(min, max);
        self.player = Player::new(
            self.arena.clamp(player_spawn),
            self.config.player_max_health,
        );
        for entity in self
            .enemies
            .drain(..)
            .map(|enemy| enemy.id)
            .chain(self.projectiles.drain(..).map(|projectile| projectile.id))
        {
            out_events.push(Event::EntityDespawned { entity });
        }
        self.ledger.clear();
        self.clock = Duration::ZERO;
        self.survived = Duration::ZERO;
        self.tick_index = 0;
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::ConfigureArena {
            min,
            max,
            player_spawn,
        } => world.reset(min, max, player_spawn, out_events),
        Command::SetPlayMode { mode } => {
            if world.play_mode != mode {
                world.play_mode = mode;
                out_events.push(Event::PlayModeChanged { mode });
            }
        }
        Command::Tick { dt } => {
            if world.play_mode == PlayMode::Running {
                world.advance(dt, out_events);
            }
        }
        Command::EndFrame => world.flush_damage(out_events),
        Command::MovePlayer { input } => {
            world.player.input = input.clamp(Vec2::NEG_ONE, Vec2::ONE);
        }
        Command::FireBullet { direction } => {
            if world.play_mode != PlayMode::Running || world.player.health.is_dead() {
                return;
            }
            let direction = direction.normalize_or_zero();
            if direction == Vec2::ZERO {
                return;
            }

            let projectile = world.allocate_id();
            world.projectiles.push(Projectile {
                id: projectile,
                owner: world.player.id,
                faction: Faction::Player,
                position: world.player.position,
                velocity: direction * world.config.bullet_speed,
                damage: world.config.bullet_damage,
                radius: world.config.bullet_radius,
                lifetime: Some(world.config.bullet_lifetime),
            });
            out_events.push(Event::ProjectileLaunched {
                projectile,
                owner: world.player.id,
            });
            out_events.push(Event::Feedback(Feedback::Audio(AudioCue::Shot)));
        }
        Command::SpawnEnemy {
            kind,
            position,
            move_speed,
        } => {
            let enemy = world.allocate_id();
            let position = world.arena.clamp(position);
            world
                .enemies
                .push(Enemy::spawn(enemy, kind, position, move_speed));
            out_events.push(Event::EnemySpawned {
                enemy,
                kind,
                position,
            });
        }
        Command::SteerEnemy {
            enemy,
            velocity,
            facing,
        } => {
            let Some(target) = world.living_enemy_mut(enemy) else {
                debug!(enemy = enemy.get(), "steering ignored for missing enemy");
                return;
            };
            if target.stun.is_stunned() {
                return;
            }
            target.velocity = velocity;
            if let Some(facing) = facing {
                target.facing = facing;
            }
        }
        Command::StunEnemy { enemy, duration } => {
            let now = world.clock;
            let Some(target) = world.living_enemy_mut(enemy) else {
                debug!(enemy = enemy.get(), "stun ignored for missing enemy");
                return;
            };
            let until = target.stun.begin(now, duration);
            target.velocity = Vec2::ZERO;
            out_events.push(Event::EnemyStunned { enemy, until });
        }
        Command::ApplyDamage { target, amount } => world.damage_entity(target, amount, out_events),
        Command::QueueDamage { target, amount } => {
            let known = target == world.player.id
                || world.enemies.iter().any(|enemy| enemy.id == target);
            if !known {
                warn!(target = target.get(), "queued damage for unknown entity dropped");
                return;
            }
            world.ledger.contribute(world.tick_index, target, amount);
        }
        Command::LaunchProjectile {
            owner,
            direction,
            speed,
            damage,
        } => {
            let radius = world.config.arrow_radius;
            let Some(origin) = world
                .living_enemy_mut(owner)
                .map(|enemy| enemy.position)
            else {
                debug!(owner = owner.get(), "projectile launch ignored for missing owner");
                return;
            };
            let direction = direction.normalize_or_zero();
            if direction == Vec2::ZERO {
                return;
            }

            let projectile = world.allocate_id();
            world.projectiles.push(Projectile {
                id: projectile,
                owner,
                faction: Faction::Enemy,
                position: origin,
                velocity: direction * speed,
                damage,
                radius,
                lifetime: None,
            });
            out_events.push(Event::ProjectileLaunched { projectile, owner });
        }
        Command::Detonate { enemy } => {
            let linger = world.config.detonation_linger;
            let Some(target) = world.enemy_mut(enemy) else {
                debug!(enemy = enemy.get(), "detonation ignored for missing enemy");
                return;
            };
            if !target.health.kill() {
                return;
            }
            target.die(linger);
            out_events.push(Event::EnemyDetonated { enemy });
            out_events.push(Event::EntityDied {
                entity: enemy,
                tag: Tag::Enemy,
            });
        }
        Command::EmitFeedback(feedback) => out_events.push(Event::Feedback(feedback)),
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use std::time::Duration;

    use glam::Vec2;
    use undead_survival_core::{
        EnemySnapshot, EnemyView, EntityId, PlayMode, PlayerSnapshot,
    };

    use super::{projectiles::Faction, Arena, World};

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Reports the currently active play mode.
    #[must_use]
    pub fn play_mode(world: &World) -> PlayMode {
        world.play_mode
    }

    /// Provides read-only access to the playable area.
    #[must_use]
    pub fn arena(world: &World) -> &Arena {
        &world.arena
    }

    /// Simulation time elapsed since the arena was configured.
    #[must_use]
    pub fn clock(world: &World) -> Duration {
        world.clock
    }

    /// Time the player has survived so far.
    #[must_use]
    pub fn survival_time(world: &World) -> Duration {
        world.survived
    }

    /// Captures the player's current state.
    #[must_use]
    pub fn player(world: &World) -> PlayerSnapshot {
        PlayerSnapshot {
            id: world.player.id,
            position: world.player.position,
            health: world.player.health.current(),
            max_health: world.player.health.max(),
            dead: world.player.health.is_dead(),
        }
    }

    /// Captures a read-only view of the enemies inhabiting the arena.
    #[must_use]
    pub fn enemy_view(world: &World) -> EnemyView {
        let snapshots = world
            .enemies
            .iter()
            .map(|enemy| EnemySnapshot {
                id: enemy.id,
                kind: enemy.kind,
                position: enemy.position,
                velocity: enemy.velocity,
                facing: enemy.facing,
                move_speed: enemy.move_speed,
                profile: enemy.profile,
                health: enemy.health.current(),
                stunned: enemy.stun.is_stunned(),
                dead: enemy.health.is_dead(),
            })
            .collect();
        EnemyView::from_snapshots(snapshots)
    }

    /// Captures every projectile in flight.
    #[must_use]
    pub fn projectiles(world: &World) -> Vec<ProjectileSnapshot> {
        world
            .projectiles
            .iter()
            .map(|projectile| ProjectileSnapshot {
                id: projectile.id,
                owner: projectile.owner,
                position: projectile.position,
                velocity: projectile.velocity,
                hostile: projectile.faction == Faction::Enemy,
            })
            .collect()
    }

    /// Damage accumulated for `target` that has not been flushed yet.
    #[must_use]
    pub fn pending_damage(world: &World, target: EntityId) -> Option<f32> {
        world.ledger.pending(target)
    }

    /// Immutable representation of a projectile used for queries.
    #[derive(Clone, Copy, Debug, PartialEq)]
    pub struct ProjectileSnapshot {
        /// Identifier of the projectile.
        pub id: EntityId,
        /// Entity that fired it.
        pub owner: EntityId,
        /// Current position.
        pub position: Vec2,
        /// Current velocity.
        pub velocity: Vec2,
        /// Indicates whether the projectile hurts the player.
        pub hostile: bool,
    }
}

#[derive(Clone, Debug)]
struct Player {
    id: EntityId,
    position: Vec2,
    input: Vec2,
    health: Health,
}

impl Player {
    fn new(position: Vec2, max_health: f32) -> Self {
        Self {
            id: PLAYER_ID,
            position,
            input: Vec2::ZERO,
            health: Health::new(max_health),
        }
    }
}

#[derive(Clone, Debug)]
struct Enemy {
    id: EntityId,
    kind: EnemyKind,
    position: Vec2,
    velocity: Vec2,
    facing: Facing,
    move_speed: f32,
    profile: EnemyProfile,
    health: Health,
    stun: Stun,
    linger: Option<Duration>,
}

impl Enemy {
    fn spawn(id: EntityId, kind: EnemyKind, position: Vec2, move_speed: Option<f32>) -> Self {
        let profile = kind.profile();
        Self {
            id,
            kind,
            position,
            velocity: Vec2::ZERO,
            facing: Facing::Right,
            move_speed: move_speed.unwrap_or(profile.move_speed).max(0.0),
            profile,
            health: Health::new(profile.max_health),
            stun: Stun::Free,
            linger: None,
        }
    }

    fn die(&mut self, linger: Duration) {
        self.velocity = Vec2::ZERO;
        self.linger = Some(linger);
    }

    fn contact_circle(&self) -> (Vec2, f32) {
        match self.profile.collider {
            Some(collider) => (self.position + collider.offset(), collider.radius()),
            None => (self.position, self.profile.body_radius),
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct ProjectileHit {
    target: EntityId,
    damage: f32,
    impulse: Vec2,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn running_world() -> World {
        let mut world = World::new();
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::SetPlayMode {
                mode: PlayMode::Running,
            },
            &mut events,
        );
        world
    }

    fn spawn(world: &mut World, kind: EnemyKind, position: Vec2) -> EntityId {
        let mut events = Vec::new();
        apply(
            world,
            Command::SpawnEnemy {
                kind,
                position,
                move_speed: None,
            },
            &mut events,
        );
        match events.as_slice() {
            [Event::EnemySpawned { enemy, .. }] => *enemy,
            other => panic!("unexpected spawn events: {other:?}"),
        }
    }

    #[test]
    fn paused_world_ignores_ticks() {
        let mut world = World::new();
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::Tick {
                dt: Duration::from_secs(1),
            },
            &mut events,
        );
        assert!(events.is_empty());
        assert_eq!(query::clock(&world), Duration::ZERO);
    }

    #[test]
    fn configure_arena_resets_entities() {
        let mut world = running_world();
        let zombie = spawn(&mut world, EnemyKind::Zombie, Vec2::new(3.0, 3.0));
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::FireBullet {
                direction: Vec2::new(-1.0, 0.0),
            },
            &mut events,
        );
        let bullet = events
            .iter()
            .find_map(|event| match event {
                Event::ProjectileLaunched { projectile, .. } => Some(*projectile),
                _ => None,
            })
            .expect("bullet launched");
        events.clear();
        apply(
            &mut world,
            Command::ConfigureArena {
                min: Vec2::new(5.0, 5.0),
                max: Vec2::new(-5.0, -5.0),
                player_spawn: Vec2::new(9.0, 0.0),
            },
            &mut events,
        );

        assert_eq!(
            events,
            vec![
                Event::EntityDespawned { entity: zombie },
                Event::EntityDespawned { entity: bullet },
            ]
        );
        assert!(query::enemy_view(&world).is_empty());
        assert!(query::projectiles(&world).is_empty());
        assert_eq!(query::arena(&world).min(), Vec2::new(-5.0, -5.0));
        assert_eq!(query::player(&world).position, Vec2::new(5.0, 0.0));
        assert_eq!(query::arena(&world).width(), 10.0);

        let fresh = spawn(&mut world, EnemyKind::Zombie, Vec2::ZERO);
        assert!(fresh > bullet, "identifiers are never reused after a reset");
    }

    #[test]
    fn stun_zeroes_velocity_and_blocks_steering_until_expiry() {
        let mut world = running_world();
        let enemy = spawn(&mut world, EnemyKind::Zombie, Vec2::new(8.0, 0.0));
        let mut events = Vec::new();

        apply(
            &mut world,
            Command::SteerEnemy {
                enemy,
                velocity: Vec2::new(1.0, 0.0),
                facing: Some(Facing::Right),
            },
            &mut events,
        );
        apply(
            &mut world,
            Command::StunEnemy {
                enemy,
                duration: Duration::from_secs(1),
            },
            &mut events,
        );
        apply(
            &mut world,
            Command::SteerEnemy {
                enemy,
                velocity: Vec2::new(-4.0, 0.0),
                facing: Some(Facing::Left),
            },
            &mut events,
        );

        let snapshot = query::enemy_view(&world).into_vec().remove(0);
        assert!(snapshot.stunned);
        assert_eq!(snapshot.velocity, Vec2::ZERO);
        assert_eq!(snapshot.facing, Facing::Right);

        events.clear();
        apply(
            &mut world,
            Command::Tick {
                dt: Duration::from_secs(1),
            },
            &mut events,
        );
        assert!(events.contains(&Event::EnemyRecovered { enemy }));
        assert_eq!(query::enemy_view(&world).into_vec()[0].position, Vec2::new(8.0, 0.0));
    }

    #[test]
    fn ledger_contributions_land_as_one_hit_at_end_of_frame() {
        let mut world = running_world();
        let enemy = spawn(&mut world, EnemyKind::KamikazeSlime, Vec2::new(10.0, 10.0));
        let mut events = Vec::new();

        apply(
            &mut world,
            Command::QueueDamage {
                target: enemy,
                amount: 5.0,
            },
            &mut events,
        );
        apply(
            &mut world,
            Command::QueueDamage {
                target: enemy,
                amount: 6.0,
            },
            &mut events,
        );
        assert!(events.is_empty());
        assert_eq!(query::pending_damage(&world, enemy), Some(11.0));

        apply(&mut world, Command::EndFrame, &mut events);
        apply(&mut world, Command::EndFrame, &mut events);

        let damaged: Vec<_> = events
            .iter()
            .filter(|event| matches!(event, Event::EntityDamaged { .. }))
            .collect();
        assert_eq!(
            damaged,
            vec![&Event::EntityDamaged {
                entity: enemy,
                amount: 11.0,
                remaining: 0.0,
            }]
        );
        let deaths = events
            .iter()
            .filter(|event| matches!(event, Event::EntityDied { .. }))
            .count();
        assert_eq!(deaths, 1);
        assert_eq!(query::pending_damage(&world, enemy), None);
    }

    #[test]
    fn leftover_ledger_is_flushed_by_the_next_tick() {
        let mut world = running_world();
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::QueueDamage {
                target: PLAYER_ID,
                amount: 30.0,
            },
            &mut events,
        );
        apply(
            &mut world,
            Command::Tick {
                dt: Duration::from_millis(16),
            },
            &mut events,
        );
        assert_eq!(query::player(&world).health, 70.0);
        assert!(matches!(events.first(), Some(Event::EntityDamaged { .. })));
    }

    #[test]
    fn corpses_linger_before_despawning() {
        let mut world = running_world();
        let enemy = spawn(&mut world, EnemyKind::Zombie, Vec2::new(10.0, 0.0));
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::ApplyDamage {
                target: enemy,
                amount: 100.0,
            },
            &mut events,
        );
        assert!(events.contains(&Event::EntityDied {
            entity: enemy,
            tag: Tag::Enemy,
        }));

        events.clear();
        apply(
            &mut world,
            Command::Tick {
                dt: Duration::from_millis(500),
            },
            &mut events,
        );
        assert!(query::enemy_view(&world).get(enemy).is_some_and(|s| s.dead));

        apply(
            &mut world,
            Command::Tick {
                dt: Duration::from_millis(500),
            },
            &mut events,
        );
        assert!(events.contains(&Event::EntityDespawned { entity: enemy }));
        assert!(query::enemy_view(&world).is_empty());
    }

    #[test]
    fn detonation_kills_once() {
        let mut world = running_world();
        let enemy = spawn(&mut world, EnemyKind::KamikazeSlime, Vec2::new(4.0, 0.0));
        let mut events = Vec::new();
        apply(&mut world, Command::Detonate { enemy }, &mut events);
        apply(&mut world, Command::Detonate { enemy }, &mut events);
        assert_eq!(
            events,
            vec![
                Event::EnemyDetonated { enemy },
                Event::EntityDied {
                    entity: enemy,
                    tag: Tag::Enemy,
                },
            ]
        );
    }

    #[test]
    fn slime_trigger_reaches_further_than_its_body() {
        let mut world = running_world();
        let slime = spawn(&mut world, EnemyKind::KamikazeSlime, Vec2::new(1.8, 0.0));
        let zombie = spawn(&mut world, EnemyKind::Zombie, Vec2::new(-1.8, 0.0));
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::Tick {
                dt: Duration::from_millis(10),
            },
            &mut events,
        );
        assert!(events.contains(&Event::PlayerContact { enemy: slime }));
        assert!(!events.contains(&Event::PlayerContact { enemy: zombie }));
    }
}
