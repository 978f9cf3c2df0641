//! Authoritative projectile state.

use std::time::Duration;

use glam::Vec2;
use undead_survival_core::EntityId;

/// Side a projectile fights for; decides which bodies it can hit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Faction {
    /// Player bullets that hit enemies.
    Player,
    /// Enemy arrows that hit the player.
    Enemy,
}

/// Projectile travelling in a straight line.
#[derive(Clone, Debug)]
pub(crate) struct Projectile {
    pub(crate) id: EntityId,
    pub(crate) owner: EntityId,
    pub(crate) faction: Faction,
    pub(crate) position: Vec2,
    pub(crate) velocity: Vec2,
    pub(crate) damage: f32,
    pub(crate) radius: f32,
    /// Remaining lifetime; `None` flies until it leaves the arena.
    pub(crate) lifetime: Option<Duration>,
}

impl Projectile {
    /// Moves the projectile and consumes lifetime.
    ///
    /// Returns `false` once the lifetime ran out.
    pub(crate) fn advance(&mut self, dt: Duration) -> bool {
        self.position += self.velocity * dt.as_secs_f32();
        match self.lifetime.as_mut() {
            Some(remaining) => {
                *remaining = remaining.saturating_sub(dt);
                !remaining.is_zero()
            }
            None => true,
        }
    }

    /// Reports whether the projectile's circle touches another circle.
    pub(crate) fn touches(&self, center: Vec2, radius: f32) -> bool {
        self.position.distance(center) <= self.radius + radius
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bullet(lifetime: Option<Duration>) -> Projectile {
        Projectile {
            id: EntityId::new(3),
            owner: EntityId::new(0),
            faction: Faction::Player,
            position: Vec2::ZERO,
            velocity: Vec2::new(10.0, 0.0),
            damage: 5.0,
            radius: 0.1,
            lifetime,
        }
    }

    #[test]
    fn lifetime_expires_after_accumulated_time() {
        let mut projectile = bullet(Some(Duration::from_secs(1)));
        assert!(projectile.advance(Duration::from_millis(600)));
        assert!(!projectile.advance(Duration::from_millis(400)));
        assert!((projectile.position.x - 10.0).abs() < 1e-4);
    }

    #[test]
    fn unbounded_projectiles_never_expire_on_their_own() {
        let mut projectile = bullet(None);
        assert!(projectile.advance(Duration::from_secs(60)));
        assert!(projectile.touches(Vec2::new(600.0, 0.3), 0.2));
    }
}
