//! Health bookkeeping shared by the player and enemies.

/// Result of routing damage into a [`Health`] pool.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum DamageOutcome {
    /// The pool was already empty; nothing changed.
    Ignored,
    /// Health decreased but the owner survived.
    Damaged,
    /// Health reached zero during this call.
    Died,
}

/// Mutable health pool clamped to `[0, max]` that dies at most once.
#[derive(Clone, Debug)]
pub(crate) struct Health {
    current: f32,
    max: f32,
    dead: bool,
}

impl Health {
    /// Creates a full pool. Negative maxima are treated as zero.
    pub(crate) fn new(max: f32) -> Self {
        let max = max.max(0.0);
        Self {
            current: max,
            max,
            dead: false,
        }
    }

    pub(crate) fn current(&self) -> f32 {
        self.current
    }

    pub(crate) fn max(&self) -> f32 {
        self.max
    }

    pub(crate) fn is_dead(&self) -> bool {
        self.dead
    }

    /// Subtracts `amount` from the pool.
    ///
    /// Zero, negative and NaN amounts change nothing and report
    /// [`DamageOutcome::Ignored`], as does every call once the pool is dead.
    pub(crate) fn apply_damage(&mut self, amount: f32) -> DamageOutcome {
        if self.dead || !(amount > 0.0) {
            return DamageOutcome::Ignored;
        }

        self.current = (self.current - amount).clamp(0.0, self.max);
        if self.current <= 0.0 {
            self.dead = true;
            DamageOutcome::Died
        } else {
            DamageOutcome::Damaged
        }
    }

    /// Empties the pool regardless of its current value.
    ///
    /// Returns `true` only for the call that performed the transition.
    pub(crate) fn kill(&mut self) -> bool {
        if self.dead {
            return false;
        }
        self.current = 0.0;
        self.dead = true;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn damage_clamps_at_zero_and_dies_once() {
        let mut health = Health::new(10.0);
        assert_eq!(health.apply_damage(4.0), DamageOutcome::Damaged);
        assert!((health.current() - 6.0).abs() < f32::EPSILON);
        assert_eq!(health.apply_damage(50.0), DamageOutcome::Died);
        assert_eq!(health.current(), 0.0);
        assert_eq!(health.apply_damage(1.0), DamageOutcome::Ignored);
        assert!(health.is_dead());
    }

    #[test]
    fn empty_hits_are_ignored() {
        let mut health = Health::new(10.0);
        assert_eq!(health.apply_damage(0.0), DamageOutcome::Ignored);
        assert_eq!(health.apply_damage(-5.0), DamageOutcome::Ignored);
        assert_eq!(health.apply_damage(f32::NAN), DamageOutcome::Ignored);
        assert_eq!(health.current(), health.max());
        assert!(!health.is_dead());
    }

    #[test]
    fn kill_transitions_exactly_once() {
        let mut health = Health::new(10.0);
        assert!(health.kill());
        assert!(!health.kill());
        assert_eq!(health.apply_damage(3.0), DamageOutcome::Ignored);
    }
}
