//! Circle overlap queries standing in for the engine's physics world.

use glam::Vec2;
use undead_survival_core::{SpatialHit, SpatialQuery, Tag};

use crate::World;

impl SpatialQuery for World {
    fn overlap_circle(&self, center: Vec2, radius: f32) -> Vec<SpatialHit> {
        let mut hits = Vec::new();

        let player = &self.player;
        if !player.health.is_dead()
            && player.position.distance(center) <= radius + self.config.player_radius
        {
            hits.push(SpatialHit {
                id: player.id,
                tag: Tag::Player,
                position: player.position,
            });
        }

        for enemy in self.enemies.iter().filter(|enemy| !enemy.health.is_dead()) {
            if enemy.position.distance(center) <= radius + enemy.profile.body_radius {
                hits.push(SpatialHit {
                    id: enemy.id,
                    tag: Tag::Enemy,
                    position: enemy.position,
                });
            }
        }

        hits
    }

    fn find_by_tag(&self, tag: Tag) -> Option<SpatialHit> {
        match tag {
            Tag::Player => Some(SpatialHit {
                id: self.player.id,
                tag,
                position: self.player.position,
            }),
            Tag::Enemy => self
                .enemies
                .iter()
                .find(|enemy| !enemy.health.is_dead())
                .map(|enemy| SpatialHit {
                    id: enemy.id,
                    tag,
                    position: enemy.position,
                }),
            Tag::Projectile => self.projectiles.first().map(|projectile| SpatialHit {
                id: projectile.id,
                tag,
                position: projectile.position,
            }),
        }
    }
}
