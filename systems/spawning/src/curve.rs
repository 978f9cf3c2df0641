//! Difficulty ramps advanced by simulation time.

use std::time::Duration;

/// Spawn cadence and batch size at a point in time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Difficulty {
    /// Time between two spawn cycles.
    pub spawn_interval: Duration,
    /// Number of spawns attempted per cycle.
    pub entities_per_spawn: u32,
}

/// Shape of the difficulty ramp.
///
/// Both shapes keep the interval non-increasing and the batch size
/// non-decreasing as time passes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DifficultyCurve {
    /// Per-minute linear ramps with a floor on the interval and a ceiling on
    /// the batch size.
    Linear {
        /// Interval at time zero.
        initial_interval: Duration,
        /// Lower bound of the interval.
        min_interval: Duration,
        /// Seconds removed from the interval per elapsed minute.
        interval_decrease_per_minute: f32,
        /// Batch size at time zero.
        initial_per_spawn: u32,
        /// Upper bound of the batch size.
        max_per_spawn: u32,
        /// Batch size added per elapsed minute, floored.
        per_spawn_increase_per_minute: f32,
    },
    /// Fixed interval with one more entity per elapsed ramp period.
    Stepped {
        /// Constant interval between cycles.
        interval: Duration,
        /// Time after which the batch size grows by one.
        ramp_period: Duration,
        /// Batch size at time zero.
        initial_per_spawn: u32,
        /// Upper bound of the batch size.
        max_per_spawn: u32,
    },
}

impl Default for DifficultyCurve {
    fn default() -> Self {
        Self::Linear {
            initial_interval: Duration::from_secs(5),
            min_interval: Duration::from_secs(1),
            interval_decrease_per_minute: 0.1,
            initial_per_spawn: 3,
            max_per_spawn: 8,
            per_spawn_increase_per_minute: 1.0,
        }
    }
}

impl DifficultyCurve {
    /// Stepped ramp: 3 s interval, one more entity every 30 s.
    #[must_use]
    pub fn stepped() -> Self {
        Self::Stepped {
            interval: Duration::from_secs(3),
            ramp_period: Duration::from_secs(30),
            initial_per_spawn: 1,
            max_per_spawn: u32::MAX,
        }
    }

    /// Evaluates the curve after `elapsed` simulation time.
    #[must_use]
    pub fn at(&self, elapsed: Duration) -> Difficulty {
        match *self {
            Self::Linear {
                initial_interval,
                min_interval,
                interval_decrease_per_minute,
                initial_per_spawn,
                max_per_spawn,
                per_spawn_increase_per_minute,
            } => {
                let minutes = elapsed.as_secs_f32() / 60.0;
                let reduced = initial_interval.as_secs_f32()
                    - interval_decrease_per_minute.max(0.0) * minutes;
                let floor = min_interval.min(initial_interval);
                let spawn_interval = Duration::try_from_secs_f32(reduced.max(0.0))
                    .unwrap_or(Duration::ZERO)
                    .clamp(floor, initial_interval);

                let growth = (per_spawn_increase_per_minute.max(0.0) * minutes).floor();
                let entities_per_spawn = initial_per_spawn
                    .saturating_add(growth as u32)
                    .min(max_per_spawn.max(initial_per_spawn));

                Difficulty {
                    spawn_interval,
                    entities_per_spawn,
                }
            }
            Self::Stepped {
                interval,
                ramp_period,
                initial_per_spawn,
                max_per_spawn,
            } => {
                let steps = if ramp_period.is_zero() {
                    0
                } else {
                    (elapsed.as_nanos() / ramp_period.as_nanos()).min(u128::from(u32::MAX)) as u32
                };
                Difficulty {
                    spawn_interval: interval,
                    entities_per_spawn: initial_per_spawn
                        .saturating_add(steps)
                        .min(max_per_spawn.max(initial_per_spawn)),
                }
            }
        }
    }
}
