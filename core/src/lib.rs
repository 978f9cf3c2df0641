#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Undead Survival engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to deterministically. Systems consume event streams, query immutable
//! snapshots, and respond exclusively with new command batches.

use std::time::Duration;

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Survive the night. Click to begin.";

/// Describes whether the simulation clock is allowed to advance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PlayMode {
    /// Start screen is visible and simulated time is frozen.
    Paused,
    /// Normal play where ticks advance the world.
    Running,
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Resets the world into an empty arena with the provided bounds. Every
    /// removed enemy and projectile is reported through
    /// [`Event::EntityDespawned`].
    ConfigureArena {
        /// Lower-left corner of the playable area.
        min: Vec2,
        /// Upper-right corner of the playable area.
        max: Vec2,
        /// Position at which the player is placed.
        player_spawn: Vec2,
    },
    /// Requests that the world transition to the provided play mode.
    SetPlayMode {
        /// Mode the world should activate.
        mode: PlayMode,
    },
    /// Advances the simulation clock by the provided delta time.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Closes the current tick, flushing damage accumulated in the ledger.
    EndFrame,
    /// Updates the movement input held by the player.
    MovePlayer {
        /// Raw input axes; each component is expected in `[-1, 1]`.
        input: Vec2,
    },
    /// Fires a bullet from the player's position along the provided aim.
    FireBullet {
        /// Aim direction; normalised by the world.
        direction: Vec2,
    },
    /// Requests that a new enemy be instantiated.
    SpawnEnemy {
        /// Archetype of the enemy.
        kind: EnemyKind,
        /// World position the enemy appears at.
        position: Vec2,
        /// Movement speed override rolled by the spawner, if any.
        move_speed: Option<f32>,
    },
    /// Replaces the velocity and facing of an enemy.
    SteerEnemy {
        /// Enemy being steered.
        enemy: EntityId,
        /// New physical velocity in world units per second.
        velocity: Vec2,
        /// Facing derived from the horizontal velocity, if it changed sign.
        facing: Option<Facing>,
    },
    /// Locks an enemy's movement for the provided duration.
    StunEnemy {
        /// Enemy to stun.
        enemy: EntityId,
        /// Length of the stun window, overwriting any active window.
        duration: Duration,
    },
    /// Applies damage to an entity immediately.
    ApplyDamage {
        /// Entity receiving the damage.
        target: EntityId,
        /// Non-negative amount of damage.
        amount: f32,
    },
    /// Contributes damage to the per-tick ledger, applied at [`Command::EndFrame`].
    QueueDamage {
        /// Entity receiving the damage.
        target: EntityId,
        /// Non-negative amount of damage.
        amount: f32,
    },
    /// Launches an enemy projectile from the owner's position.
    LaunchProjectile {
        /// Enemy that fired the projectile.
        owner: EntityId,
        /// Unit direction of travel.
        direction: Vec2,
        /// Speed in world units per second.
        speed: f32,
        /// Damage dealt to the player on contact.
        damage: f32,
    },
    /// Kills a kamikaze enemy as the final step of its explosion.
    Detonate {
        /// Enemy that exploded.
        enemy: EntityId,
    },
    /// Forwards a presentation request to adapters.
    EmitFeedback(Feedback),
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Announces that the simulation entered a new play mode.
    PlayModeChanged {
        /// Mode that became active after processing commands.
        mode: PlayMode,
    },
    /// Confirms that an enemy was created.
    EnemySpawned {
        /// Identifier assigned to the newly spawned enemy.
        enemy: EntityId,
        /// Archetype of the enemy.
        kind: EnemyKind,
        /// Position the enemy occupies after spawning.
        position: Vec2,
    },
    /// Reports that a living enemy overlaps the living player this tick.
    PlayerContact {
        /// Enemy touching the player.
        enemy: EntityId,
    },
    /// Reports that an entity lost health.
    EntityDamaged {
        /// Entity that was hit.
        entity: EntityId,
        /// Damage requested by the source.
        amount: f32,
        /// Health left after clamping.
        remaining: f32,
    },
    /// Reports that an entity died. Emitted exactly once per entity.
    EntityDied {
        /// Entity that died.
        entity: EntityId,
        /// Tag of the entity that died.
        tag: Tag,
    },
    /// Reports that an enemy entered or refreshed a stun window.
    EnemyStunned {
        /// Enemy that was stunned.
        enemy: EntityId,
        /// Simulation time at which the stun expires.
        until: Duration,
    },
    /// Reports that an enemy's stun window expired.
    EnemyRecovered {
        /// Enemy that can move again.
        enemy: EntityId,
    },
    /// Reports that a kamikaze enemy detonated.
    EnemyDetonated {
        /// Enemy that exploded.
        enemy: EntityId,
    },
    /// Confirms that a projectile entered the world.
    ProjectileLaunched {
        /// Identifier of the projectile.
        projectile: EntityId,
        /// Entity that fired it.
        owner: EntityId,
    },
    /// Reports that an entity was removed from the world.
    EntityDespawned {
        /// Entity that no longer exists.
        entity: EntityId,
    },
    /// Reports that the player died and the survival clock stopped.
    SurvivalEnded {
        /// Total simulated time survived.
        survived: Duration,
    },
    /// Presentation request forwarded to adapters.
    Feedback(Feedback),
}

/// Fire-and-forget presentation requests. No response is expected.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Feedback {
    /// Tint the entity briefly to show it was hit.
    HitFlash {
        /// Entity that was hit.
        entity: EntityId,
    },
    /// Shake the camera.
    CameraShake,
    /// Play a one-shot audio cue.
    Audio(AudioCue),
    /// Start the pulsing glow of a kamikaze fuse.
    FuseLit {
        /// Enemy whose fuse started.
        enemy: EntityId,
    },
    /// Play the archer's shooting animation.
    ShootAnimation {
        /// Archer that started shooting.
        enemy: EntityId,
    },
    /// Push an entity with a physics impulse.
    Knockback {
        /// Entity receiving the impulse.
        entity: EntityId,
        /// Impulse vector in world units.
        impulse: Vec2,
    },
}

/// One-shot audio clips requested by the simulation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AudioCue {
    /// Kamikaze explosion.
    Explosion,
    /// Player took damage.
    PlayerHurt,
    /// Player fired a bullet.
    Shot,
}

/// Unique identifier assigned to an entity by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(u32);

impl EntityId {
    /// Creates a new entity identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Coarse classification used by tag lookups and spatial queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Tag {
    /// The single player avatar.
    Player,
    /// Any hostile creature.
    Enemy,
    /// Bullets and arrows.
    Projectile,
}

/// Horizontal orientation of a sprite.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Facing {
    /// Sprite flipped to look left.
    Left,
    /// Sprite looking right.
    Right,
}

impl Facing {
    /// Derives the facing from the horizontal velocity component.
    ///
    /// Returns `None` when the component is zero so the caller keeps the
    /// previous orientation.
    #[must_use]
    pub fn from_horizontal(x: f32) -> Option<Self> {
        if x < 0.0 {
            Some(Self::Left)
        } else if x > 0.0 {
            Some(Self::Right)
        } else {
            None
        }
    }
}

/// Enemy archetypes that can be spawned.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnemyKind {
    /// Melee enemy that hits the player on contact.
    Zombie,
    /// Ranged enemy that fires arrows.
    UndeadArcher,
    /// Suicide enemy that explodes after touching the player.
    KamikazeSlime,
}

impl EnemyKind {
    /// Every archetype in declaration order.
    pub const ALL: [EnemyKind; 3] = [Self::Zombie, Self::UndeadArcher, Self::KamikazeSlime];

    /// Baseline tuning applied when an enemy of this kind is spawned.
    #[must_use]
    pub const fn profile(self) -> EnemyProfile {
        let base = EnemyProfile {
            max_health: 10.0,
            move_speed: 5.0,
            detection_range: 10.0,
            stopping_distance: 0.3,
            wander_interval: Duration::from_secs(2),
            body_radius: 0.5,
            collider: None,
        };
        match self {
            Self::Zombie | Self::UndeadArcher => base,
            Self::KamikazeSlime => EnemyProfile {
                collider: Some(CircleCollider::new(Vec2::ZERO, 1.5)),
                ..base
            },
        }
    }
}

/// Per-kind enemy tuning.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemyProfile {
    /// Health the enemy starts with.
    pub max_health: f32,
    /// Default movement speed in world units per second.
    pub move_speed: f32,
    /// Distance within which the enemy tracks the player.
    pub detection_range: f32,
    /// Distance at which the enemy stops approaching.
    pub stopping_distance: f32,
    /// Time between random heading changes while wandering.
    pub wander_interval: Duration,
    /// Radius of the enemy's body used for contacts and overlap queries.
    pub body_radius: f32,
    /// Trigger circle used as contact area and blast radius, if any.
    pub collider: Option<CircleCollider>,
}

/// Circle attached to an entity, offset from its position.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CircleCollider {
    offset: Vec2,
    radius: f32,
}

impl CircleCollider {
    /// Creates a collider with the provided offset and radius.
    #[must_use]
    pub const fn new(offset: Vec2, radius: f32) -> Self {
        Self { offset, radius }
    }

    /// Offset of the circle centre from the owning entity's position.
    #[must_use]
    pub const fn offset(&self) -> Vec2 {
        self.offset
    }

    /// Radius of the circle in world units.
    #[must_use]
    pub const fn radius(&self) -> f32 {
        self.radius
    }
}

/// Immutable representation of a single enemy's state used for queries.
#[derive(Clone, Debug, PartialEq)]
pub struct EnemySnapshot {
    /// Unique identifier assigned to the enemy.
    pub id: EntityId,
    /// Archetype of the enemy.
    pub kind: EnemyKind,
    /// Current world position.
    pub position: Vec2,
    /// Current physical velocity.
    pub velocity: Vec2,
    /// Current sprite orientation.
    pub facing: Facing,
    /// Movement speed rolled at spawn time.
    pub move_speed: f32,
    /// Tuning the enemy was spawned with.
    pub profile: EnemyProfile,
    /// Remaining health.
    pub health: f32,
    /// Indicates whether a stun window is active.
    pub stunned: bool,
    /// Indicates whether the enemy died and is lingering before removal.
    pub dead: bool,
}

/// Read-only snapshot describing all enemies within the arena.
#[derive(Clone, Debug, Default)]
pub struct EnemyView {
    snapshots: Vec<EnemySnapshot>,
}

impl EnemyView {
    /// Creates a new enemy view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<EnemySnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured enemy snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &EnemySnapshot> {
        self.snapshots.iter()
    }

    /// Looks up the snapshot of a single enemy.
    #[must_use]
    pub fn get(&self, enemy: EntityId) -> Option<&EnemySnapshot> {
        self.snapshots
            .binary_search_by_key(&enemy, |snapshot| snapshot.id)
            .ok()
            .map(|index| &self.snapshots[index])
    }

    /// Number of captured snapshots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the view is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<EnemySnapshot> {
        self.snapshots
    }
}

/// Immutable representation of the player used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlayerSnapshot {
    /// Identifier of the player entity.
    pub id: EntityId,
    /// Current world position.
    pub position: Vec2,
    /// Remaining health.
    pub health: f32,
    /// Maximum health.
    pub max_health: f32,
    /// Indicates whether the player died.
    pub dead: bool,
}

/// Entity returned by a [`SpatialQuery`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpatialHit {
    /// Identifier of the entity.
    pub id: EntityId,
    /// Tag of the entity.
    pub tag: Tag,
    /// Position of the entity's centre.
    pub position: Vec2,
}

/// Read-only physics queries offered by the world.
pub trait SpatialQuery {
    /// Returns every living body whose circle overlaps the provided circle.
    fn overlap_circle(&self, center: Vec2, radius: f32) -> Vec<SpatialHit>;

    /// Returns the first entity carrying the provided tag, if any.
    fn find_by_tag(&self, tag: Tag) -> Option<SpatialHit>;
}

/// Formats a duration as `HH:MM:SS`, flooring fractional seconds.
#[must_use]
pub fn format_clock(elapsed: Duration) -> String {
    let total_seconds = elapsed.as_secs();
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;
    format!("{hours:02}:{minutes:02}:{seconds:02}")
}
