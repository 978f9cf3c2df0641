//! Camera that eases toward the player.

use glam::Vec2;
use undead_survival_core::{Event, Feedback};

/// Follows a target with a fixed offset, closing `speed * dt` of the gap per
/// frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Camera {
    position: Vec2,
    offset: Vec2,
    speed: f32,
    shakes: u32,
}

impl Camera {
    pub(crate) fn new(position: Vec2, offset: Vec2, speed: f32) -> Self {
        Self {
            position,
            offset,
            speed,
            shakes: 0,
        }
    }

    pub(crate) fn position(&self) -> Vec2 {
        self.position
    }

    /// Number of shake requests received so far.
    pub(crate) fn shakes(&self) -> u32 {
        self.shakes
    }

    /// Moves toward `target + offset`. The blend factor is clamped so a long
    /// frame snaps onto the target instead of overshooting it.
    pub(crate) fn follow(&mut self, target: Vec2, dt: f32) {
        let blend = (self.speed * dt).clamp(0.0, 1.0);
        self.position = self.position.lerp(target + self.offset, blend);
    }

    pub(crate) fn observe(&mut self, events: &[Event]) {
        let requested = events
            .iter()
            .filter(|event| matches!(event, Event::Feedback(Feedback::CameraShake)))
            .count();
        self.shakes = self
            .shakes
            .saturating_add(u32::try_from(requested).unwrap_or(u32::MAX));
    }
}
