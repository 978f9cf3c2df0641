//! Timed movement lock applied to enemies.

use std::time::Duration;

/// Stun state machine. A new stun overwrites the active window.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Stun {
    /// Movement allowed.
    Free,
    /// Movement locked until the simulation clock reaches `until`.
    Stunned { until: Duration },
}

impl Stun {
    /// Enters the stunned state for `duration` starting at `now`.
    ///
    /// Returns the expiry time of the new window.
    pub(crate) fn begin(&mut self, now: Duration, duration: Duration) -> Duration {
        let until = now.saturating_add(duration);
        *self = Self::Stunned { until };
        until
    }

    /// Releases the lock once `now` reached the expiry time.
    ///
    /// Returns `true` only for the call that performed the release.
    pub(crate) fn expire(&mut self, now: Duration) -> bool {
        match *self {
            Self::Stunned { until } if now >= until => {
                *self = Self::Free;
                true
            }
            _ => false,
        }
    }

    pub(crate) fn is_stunned(&self) -> bool {
        matches!(self, Self::Stunned { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_stun_overwrites_rather_than_extends() {
        let mut stun = Stun::Free;
        let first = stun.begin(Duration::from_secs(1), Duration::from_secs(3));
        assert_eq!(first, Duration::from_secs(4));

        let second = stun.begin(Duration::from_secs(2), Duration::from_millis(500));
        assert_eq!(second, Duration::from_millis(2_500));
        assert!(stun.expire(Duration::from_millis(2_500)));
        assert!(!stun.is_stunned());
    }

    #[test]
    fn expiry_waits_for_the_window_to_close() {
        let mut stun = Stun::Free;
        let _ = stun.begin(Duration::ZERO, Duration::from_secs(1));
        assert!(!stun.expire(Duration::from_millis(999)));
        assert!(stun.is_stunned());
        assert!(stun.expire(Duration::from_secs(1)));
        assert!(!stun.expire(Duration::from_secs(2)));
    }
}
