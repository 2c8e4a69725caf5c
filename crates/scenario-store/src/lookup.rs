//! Derived identifier lookup over the scenario list
//!
//! The lookup is a cache of positions into the scenario list. It is dropped
//! whenever the list is replaced and rebuilt on the next read.

use once_cell::sync::OnceCell;
use scenario_model::{Scenario, ScenarioUuid};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Default)]
pub(crate) struct ScenarioLookup {
    positions: OnceCell<HashMap<ScenarioUuid, usize>>,
    rebuilds: AtomicU64,
}

impl ScenarioLookup {
    /// Forget the cached positions
    pub(crate) fn invalidate(&mut self) {
        self.positions.take();
    }

    /// Position of `uuid` in `scenarios`, rebuilding the cache if needed
    ///
    /// `scenarios` must be the list the cache was last built from, or the
    /// cache must have been invalidated since.
    pub(crate) fn position(&self, scenarios: &[Scenario], uuid: &ScenarioUuid) -> Option<usize> {
        self.positions(scenarios).get(uuid).copied()
    }

    pub(crate) fn positions(&self, scenarios: &[Scenario]) -> &HashMap<ScenarioUuid, usize> {
        self.positions.get_or_init(|| {
            self.rebuilds.fetch_add(1, Ordering::Relaxed);
            tracing::trace!(count = scenarios.len(), "rebuilding scenario lookup");
            // Later duplicates overwrite earlier ones.
            scenarios
                .iter()
                .enumerate()
                .map(|(pos, scenario)| (scenario.uuid().clone(), pos))
                .collect()
        })
    }

    pub(crate) fn rebuilds(&self) -> u64 {
        self.rebuilds.load(Ordering::Relaxed)
    }
}
