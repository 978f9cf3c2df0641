//! Versioned TOML tuning file mapped onto the session configuration.
//!
//! Every section and field is optional; anything left out keeps the value the
//! systems use by default.

use std::{fs, path::Path, time::Duration};

use anyhow::{bail, Context, Result};
use glam::Vec2;
use serde::Deserialize;
use undead_survival_core::{Command, EnemyKind};
use undead_survival_system_archery as archery;
use undead_survival_system_bootstrap::SessionConfig;
use undead_survival_system_explosion as explosion;
use undead_survival_system_melee as melee;
use undead_survival_system_movement as movement;
use undead_survival_system_spawning::{self as spawning, DifficultyCurve, SpawnArea};
use undead_survival_world::WorldConfig;

use crate::camera::Camera;

const SUPPORTED_CONFIG_VERSION: u32 = 1;
const MOVEMENT_SEED_SALT: u64 = 0x9e37_79b9_7f4a_7c15;

/// Loads and validates the tuning file at `path`.
pub(crate) fn load(path: &Path) -> Result<GameConfig> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read game config at {}", path.display()))?;
    parse(&contents).with_context(|| format!("invalid game config at {}", path.display()))
}

fn parse(contents: &str) -> Result<GameConfig> {
    let config: GameConfig =
        toml::from_str(contents).context("failed to parse game config toml contents")?;
    if config.version != SUPPORTED_CONFIG_VERSION {
        bail!(
            "unsupported game config version {}; expected {}",
            config.version,
            SUPPORTED_CONFIG_VERSION
        );
    }
    Ok(config)
}

/// Parsed tuning file.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct GameConfig {
    version: u32,
    #[serde(default)]
    arena: ArenaSection,
    #[serde(default)]
    player: PlayerSection,
    #[serde(default)]
    spawner: SpawnerSection,
    #[serde(default)]
    movement: MovementSection,
    #[serde(default)]
    melee: MeleeSection,
    #[serde(default)]
    archery: ArcherySection,
    #[serde(default)]
    explosion: ExplosionSection,
    #[serde(default)]
    camera: CameraSection,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            version: SUPPORTED_CONFIG_VERSION,
            arena: ArenaSection::default(),
            player: PlayerSection::default(),
            spawner: SpawnerSection::default(),
            movement: MovementSection::default(),
            melee: MeleeSection::default(),
            archery: ArcherySection::default(),
            explosion: ExplosionSection::default(),
            camera: CameraSection::default(),
        }
    }
}

impl GameConfig {
    /// Builds the session configuration, deriving every system seed from `seed`.
    pub(crate) fn session_config(&self, seed: u64) -> Result<SessionConfig> {
        let player = &self.player;
        let world = WorldConfig {
            player_max_health: positive("player.max_health", player.max_health)?,
            player_speed: player.speed,
            bullet_speed: player.bullet_speed,
            bullet_damage: player.bullet_damage,
            bullet_lifetime: seconds("player.bullet_lifetime_secs", player.bullet_lifetime_secs)?,
            ..WorldConfig::default()
        };

        let mut config = SessionConfig::new(self.spawner.config(seed)?);
        config.world = world;
        config.movement = movement::Config::new(self.movement.smoothing, seed ^ MOVEMENT_SEED_SALT);
        config.melee = melee::Config::new(
            self.melee.damage,
            seconds("melee.attack_interval_secs", self.melee.attack_interval_secs)?,
            seconds("melee.stun_secs", self.melee.stun_secs)?,
        );
        config.archery = archery::Config::new(
            seconds("archery.shooting_secs", self.archery.shooting_secs)?,
            seconds("archery.aim_secs", self.archery.aim_secs)?,
            seconds("archery.recovery_secs", self.archery.recovery_secs)?,
        )
        .with_projectile(self.archery.projectile_speed, self.archery.damage);
        config.explosion = explosion::Config::new(
            self.explosion.damage,
            seconds("explosion.fuse_secs", self.explosion.fuse_secs)?,
            self.explosion.splash_damage,
        );
        Ok(config)
    }

    /// Command that lays out the arena and places the player.
    pub(crate) fn arena_command(&self) -> Command {
        Command::ConfigureArena {
            min: Vec2::from(self.arena.min),
            max: Vec2::from(self.arena.max),
            player_spawn: Vec2::from(self.arena.player_spawn),
        }
    }

    /// Camera starting on the player spawn point.
    pub(crate) fn camera(&self) -> Camera {
        let offset = Vec2::from(self.camera.offset);
        Camera::new(
            Vec2::from(self.arena.player_spawn) + offset,
            offset,
            self.camera.speed,
        )
    }
}

fn seconds(field: &str, value: f32) -> Result<Duration> {
    Duration::try_from_secs_f32(value)
        .with_context(|| format!("`{field}` must be a non-negative number of seconds, got {value}"))
}

fn interval(field: &str, value: f32) -> Result<Duration> {
    seconds(field, positive(field, value)?)
}

fn finite(field: &str, value: [f32; 2]) -> Result<Vec2> {
    let point = Vec2::from(value);
    if !point.is_finite() {
        bail!("`{field}` must hold finite numbers, got {value:?}");
    }
    Ok(point)
}

fn positive(field: &str, value: f32) -> Result<f32> {
    if !(value.is_finite() && value > 0.0) {
        bail!("`{field}` must be positive, got {value}");
    }
    Ok(value)
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ArenaSection {
    min: [f32; 2],
    max: [f32; 2],
    player_spawn: [f32; 2],
}

impl Default for ArenaSection {
    fn default() -> Self {
        Self {
            min: [-20.0, -12.0],
            max: [20.0, 12.0],
            player_spawn: [0.0, 0.0],
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct PlayerSection {
    max_health: f32,
    speed: f32,
    bullet_speed: f32,
    bullet_damage: f32,
    bullet_lifetime_secs: f32,
}

impl Default for PlayerSection {
    fn default() -> Self {
        let world = WorldConfig::default();
        Self {
            max_health: world.player_max_health,
            speed: world.player_speed,
            bullet_speed: world.bullet_speed,
            bullet_damage: world.bullet_damage,
            bullet_lifetime_secs: world.bullet_lifetime.as_secs_f32(),
        }
    }
}

/// Difficulty ramp, selected by its `shape` key.
#[derive(Debug, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
enum CurveSection {
    Linear(LinearCurve),
    Stepped(SteppedCurve),
}

impl Default for CurveSection {
    fn default() -> Self {
        Self::Linear(LinearCurve::default())
    }
}

impl CurveSection {
    fn curve(&self) -> Result<DifficultyCurve> {
        Ok(match self {
            Self::Linear(linear) => DifficultyCurve::Linear {
                initial_interval: interval(
                    "spawner.curve.initial_interval_secs",
                    linear.initial_interval_secs,
                )?,
                min_interval: interval(
                    "spawner.curve.min_interval_secs",
                    linear.min_interval_secs,
                )?,
                interval_decrease_per_minute: linear.interval_decrease_per_minute,
                initial_per_spawn: linear.initial_per_spawn,
                max_per_spawn: linear.max_per_spawn,
                per_spawn_increase_per_minute: linear.per_spawn_increase_per_minute,
            },
            Self::Stepped(stepped) => DifficultyCurve::Stepped {
                interval: interval("spawner.curve.interval_secs", stepped.interval_secs)?,
                ramp_period: seconds(
                    "spawner.curve.ramp_period_secs",
                    stepped.ramp_period_secs,
                )?,
                initial_per_spawn: stepped.initial_per_spawn,
                max_per_spawn: stepped.max_per_spawn,
            },
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct LinearCurve {
    initial_interval_secs: f32,
    min_interval_secs: f32,
    interval_decrease_per_minute: f32,
    initial_per_spawn: u32,
    max_per_spawn: u32,
    per_spawn_increase_per_minute: f32,
}

impl Default for LinearCurve {
    fn default() -> Self {
        Self {
            initial_interval_secs: 5.0,
            min_interval_secs: 1.0,
            interval_decrease_per_minute: 0.1,
            initial_per_spawn: 3,
            max_per_spawn: 8,
            per_spawn_increase_per_minute: 1.0,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct SteppedCurve {
    interval_secs: f32,
    ramp_period_secs: f32,
    initial_per_spawn: u32,
    max_per_spawn: u32,
}

impl Default for SteppedCurve {
    fn default() -> Self {
        Self {
            interval_secs: 3.0,
            ramp_period_secs: 30.0,
            initial_per_spawn: 1,
            max_per_spawn: u32::MAX,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct SpawnerSection {
    curve: CurveSection,
    area_min: [f32; 2],
    area_max: [f32; 2],
    tiles: Vec<[f32; 2]>,
    enemies: Vec<EnemyKind>,
    max_entities: usize,
    zombie_speed: [f32; 2],
}

impl Default for SpawnerSection {
    fn default() -> Self {
        Self {
            curve: CurveSection::default(),
            area_min: [-18.0, -10.0],
            area_max: [18.0, 10.0],
            tiles: Vec::new(),
            enemies: EnemyKind::ALL.to_vec(),
            max_entities: 30,
            zombie_speed: [2.0, 4.0],
        }
    }
}

impl SpawnerSection {
    fn config(&self, seed: u64) -> Result<spawning::Config> {
        if self.enemies.is_empty() {
            bail!("`spawner.enemies` must list at least one enemy");
        }
        let area = if self.tiles.is_empty() {
            SpawnArea::Rect {
                min: finite("spawner.area_min", self.area_min)?,
                max: finite("spawner.area_max", self.area_max)?,
            }
        } else {
            SpawnArea::Tiles(
                self.tiles
                    .iter()
                    .map(|tile| finite("spawner.tiles", *tile))
                    .collect::<Result<_>>()?,
            )
        };
        let speed = finite("spawner.zombie_speed", self.zombie_speed)?;
        Ok(spawning::Config::new(area, self.curve.curve()?, seed)
            .with_candidates(self.enemies.clone())
            .with_max_entities(self.max_entities)
            .with_zombie_speed(speed.x, speed.y))
    }
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct MovementSection {
    smoothing: f32,
}

impl Default for MovementSection {
    fn default() -> Self {
        Self { smoothing: 10.0 }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct MeleeSection {
    damage: f32,
    attack_interval_secs: f32,
    stun_secs: f32,
}

impl Default for MeleeSection {
    fn default() -> Self {
        Self {
            damage: 5.0,
            attack_interval_secs: 0.5,
            stun_secs: 1.0,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ArcherySection {
    shooting_secs: f32,
    aim_secs: f32,
    recovery_secs: f32,
    projectile_speed: f32,
    damage: f32,
}

impl Default for ArcherySection {
    fn default() -> Self {
        Self {
            shooting_secs: 2.5,
            aim_secs: 0.5,
            recovery_secs: 0.5,
            projectile_speed: 5.0,
            damage: 10.0,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ExplosionSection {
    damage: f32,
    fuse_secs: f32,
    splash_damage: f32,
}

impl Default for ExplosionSection {
    fn default() -> Self {
        Self {
            damage: 25.0,
            fuse_secs: 2.0,
            splash_damage: 100.0,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct CameraSection {
    offset: [f32; 2],
    speed: f32,
}

impl Default for CameraSection {
    fn default() -> Self {
        Self {
            offset: [0.0, 0.0],
            speed: 5.0,
        }
    }
}
