//! Per-tick accumulator for damage that must land as a single hit.

use std::collections::BTreeMap;

use undead_survival_core::EntityId;

/// Damage contributions keyed by target, opened by the first contribution of a
/// tick and closed by [`PendingDamageLedger::drain`].
#[derive(Debug)]
pub(crate) struct PendingDamageLedger {
    tick_index: u64,
    entries: BTreeMap<EntityId, f32>,
}

impl PendingDamageLedger {
    pub(crate) fn new() -> Self {
        Self {
            tick_index: 0,
            entries: BTreeMap::new(),
        }
    }

    pub(crate) fn clear(&mut self) {
        self.tick_index = 0;
        self.entries.clear();
    }

    /// Adds `amount` to the running total for `target`.
    pub(crate) fn contribute(&mut self, tick_index: u64, target: EntityId, amount: f32) {
        if self.entries.is_empty() {
            self.tick_index = tick_index;
        }
        *self.entries.entry(target).or_insert(0.0) += amount.max(0.0);
    }

    /// Tick in which the currently open entries were first contributed.
    pub(crate) fn tick_index(&self) -> u64 {
        self.tick_index
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn pending(&self, target: EntityId) -> Option<f32> {
        self.entries.get(&target).copied()
    }

    /// Removes every entry, yielding totals ordered by target identifier.
    pub(crate) fn drain(&mut self) -> Vec<(EntityId, f32)> {
        std::mem::take(&mut self.entries).into_iter().collect()
    }
}
