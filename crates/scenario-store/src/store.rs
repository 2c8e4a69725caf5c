//! Scenario store
//!
//! Holds the loaded scenarios, their read errors and the selected scenario.
//! One store is created per editing session and shared by `Arc`; every read
//! goes through an accessor and every write through a named mutation.

use crate::error::StoreError;
use crate::inject_ops::{self, InjectChange, RemovalReport};
use crate::lookup::ScenarioLookup;
use parking_lot::RwLock;
use scenario_model::{Inject, InjectFlow, InjectUuid, ReadError, Scenario, ScenarioIndex, ScenarioUuid};
use std::collections::HashMap;
use tokio::sync::watch;

#[derive(Debug, Default)]
struct StoreState {
    scenarios: Vec<Scenario>,
    read_errors: Vec<ReadError>,
    selected: Option<ScenarioUuid>,
    lookup: ScenarioLookup,
}

impl StoreState {
    fn position(&self, uuid: &ScenarioUuid) -> Option<usize> {
        self.lookup.position(&self.scenarios, uuid)
    }

    fn selected_position(&self) -> Result<usize, StoreError> {
        let uuid = self.selected.as_ref().ok_or(StoreError::NoSelection)?;
        self.position(uuid)
            .ok_or_else(|| StoreError::SelectionNotLoaded(uuid.clone()))
    }

    fn selected_scenario(&self) -> Option<&Scenario> {
        let pos = self.selected_position().ok()?;
        self.scenarios.get(pos)
    }
}

/// Scenario/inject state for one editing session
///
/// The selection is a weak reference: it holds an identifier that is
/// resolved through the lookup on every access. A selection that matches no
/// loaded scenario is allowed; reads then return `None` and mutations fail
/// with [`StoreError::SelectionNotLoaded`].
///
/// Subscribers are notified with the store generation after each mutation.
#[derive(Debug)]
pub struct ScenarioStore {
    state: RwLock<StoreState>,
    changes: watch::Sender<u64>,
}

impl ScenarioStore {
    /// Create an empty store
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        let (changes, _) = watch::channel(0);
        Self {
            state: RwLock::new(StoreState::default()),
            changes,
        }
    }

    /// Create a store already holding `scenarios`
    #[must_use]
    pub fn with_scenarios(scenarios: Vec<Scenario>) -> Self {
        let store = Self::new();
        store.set_scenarios(scenarios, Vec::new());
        store
    }

    // ------------------------------------------------------------------
    // Bulk state
    // ------------------------------------------------------------------

    /// Replace every scenario and read error
    ///
    /// The selection is kept as-is, even if it no longer resolves.
    pub fn set_scenarios(&self, scenarios: Vec<Scenario>, read_errors: Vec<ReadError>) {
        {
            let mut state = self.state.write();
            tracing::debug!(
                scenarios = scenarios.len(),
                read_errors = read_errors.len(),
                "replacing scenario list"
            );
            state.scenarios = scenarios;
            state.read_errors = read_errors;
            state.lookup.invalidate();
        }
        self.notify();
    }

    /// Replace the store content with a server index
    #[inline]
    pub fn replace_index(&self, index: ScenarioIndex) {
        self.set_scenarios(index.scenarios, index.read_errors);
    }

    /// Remove every scenario with this identifier
    ///
    /// Returns `true` if anything was removed.
    pub fn remove_scenario(&self, uuid: &ScenarioUuid) -> bool {
        let removed = {
            let mut state = self.state.write();
            let before = state.scenarios.len();
            state.scenarios.retain(|s| s.uuid() != uuid);
            let removed = state.scenarios.len() != before;
            if removed {
                state.lookup.invalidate();
            }
            removed
        };
        if removed {
            tracing::debug!(%uuid, "removed scenario");
            self.notify();
        }
        removed
    }

    // ------------------------------------------------------------------
    // Selection
    // ------------------------------------------------------------------

    /// Select a scenario, or clear the selection with `None`
    ///
    /// The identifier is not checked against the loaded scenarios.
    pub fn select_scenario(&self, uuid: impl Into<Option<ScenarioUuid>>) {
        let uuid = uuid.into();
        tracing::debug!(selected = ?uuid, "selecting scenario");
        self.state.write().selected = uuid;
        self.notify();
    }

    /// Identifier of the selected scenario, resolved or not
    #[must_use]
    pub fn selected_uuid(&self) -> Option<ScenarioUuid> {
        self.state.read().selected.clone()
    }

    /// True iff the selection resolves to a loaded scenario
    #[must_use]
    pub fn has_scenario(&self) -> bool {
        self.state.read().selected_position().is_ok()
    }

    /// True iff at least one scenario is loaded
    #[must_use]
    pub fn has_scenarios(&self) -> bool {
        !self.state.read().scenarios.is_empty()
    }

    // ------------------------------------------------------------------
    // Reads
    // ------------------------------------------------------------------

    /// Snapshot of all scenarios in list order
    #[must_use]
    pub fn scenarios(&self) -> Vec<Scenario> {
        self.state.read().scenarios.clone()
    }

    /// Snapshot of the read errors of the last load
    #[must_use]
    pub fn read_errors(&self) -> Vec<ReadError> {
        self.state.read().read_errors.clone()
    }

    /// Number of loaded scenarios
    #[must_use]
    pub fn len(&self) -> usize {
        self.state.read().scenarios.len()
    }

    /// True when no scenario is loaded
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot of one scenario
    #[must_use]
    pub fn scenario(&self, uuid: &ScenarioUuid) -> Option<Scenario> {
        self.with_scenario(uuid, Clone::clone)
    }

    /// Run `f` against one scenario without cloning it
    pub fn with_scenario<R>(&self, uuid: &ScenarioUuid, f: impl FnOnce(&Scenario) -> R) -> Option<R> {
        let state = self.state.read();
        let pos = state.position(uuid)?;
        state.scenarios.get(pos).map(f)
    }

    /// Snapshot of the selected scenario
    #[must_use]
    pub fn selected_scenario(&self) -> Option<Scenario> {
        self.with_selected(Clone::clone)
    }

    /// Run `f` against the selected scenario without cloning it
    pub fn with_selected<R>(&self, f: impl FnOnce(&Scenario) -> R) -> Option<R> {
        let state = self.state.read();
        state.selected_scenario().map(f)
    }

    /// Snapshot of the identifier lookup
    #[must_use]
    pub fn scenario_by_uuid(&self) -> HashMap<ScenarioUuid, Scenario> {
        let state = self.state.read();
        state
            .lookup
            .positions(&state.scenarios)
            .iter()
            .map(|(uuid, pos)| (uuid.clone(), state.scenarios[*pos].clone()))
            .collect()
    }

    /// How often the lookup has been rebuilt
    #[must_use]
    pub fn lookup_rebuilds(&self) -> u64 {
        self.state.read().lookup.rebuilds()
    }

    /// Current change generation
    #[must_use]
    pub fn generation(&self) -> u64 {
        *self.changes.borrow()
    }

    /// Receive the generation after every mutation
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.changes.subscribe()
    }

    // ------------------------------------------------------------------
    // Selected scenario mutations
    // ------------------------------------------------------------------

    /// Append an inject and its flow record to the selected scenario
    ///
    /// # Errors
    /// - `StoreError::NoSelection` if nothing is selected
    /// - `StoreError::SelectionNotLoaded` if the selection does not resolve
    pub fn add_inject(&self, inject: Inject, flow: InjectFlow) -> Result<(), StoreError> {
        self.mutate_selected(|scenario| inject_ops::add_inject(scenario, inject, flow))
    }

    /// Replace the entries with matching identifiers in the selected scenario
    ///
    /// Returns `true` if an entry was replaced; nothing is added otherwise.
    ///
    /// # Errors
    /// Same as [`Self::add_inject`].
    pub fn update_inject(&self, inject: &Inject, flow: &InjectFlow) -> Result<bool, StoreError> {
        self.mutate_selected(|scenario| inject_ops::update_inject(scenario, inject, flow))
    }

    /// Add or replace an inject in the selected scenario
    ///
    /// # Errors
    /// Same as [`Self::add_inject`].
    pub fn upsert_inject(&self, inject: Inject, flow: InjectFlow) -> Result<InjectChange, StoreError> {
        self.mutate_selected(|scenario| inject_ops::upsert_inject(scenario, inject, flow))
    }

    /// Remove an inject from the selected scenario
    ///
    /// Also removes its flow record and clears every requirement on it.
    /// Removing an absent inject is a no-op.
    ///
    /// # Errors
    /// Same as [`Self::add_inject`].
    pub fn remove_inject(&self, inject_uuid: &InjectUuid) -> Result<RemovalReport, StoreError> {
        self.mutate_selected(|scenario| inject_ops::remove_inject(scenario, inject_uuid))
    }

    /// Reorder the injects of the selected scenario
    ///
    /// # Errors
    /// Same as [`Self::add_inject`].
    pub fn reorder_injects(&self, order: &[InjectUuid]) -> Result<(), StoreError> {
        self.mutate_selected(|scenario| inject_ops::reorder_injects(scenario, order))
    }

    /// Mutate the selected scenario only while it is still `expected`
    ///
    /// The selection check and the mutation happen under one write lock, so
    /// a concurrent [`Self::select_scenario`] either lands before the check
    /// or after the mutation.
    ///
    /// # Errors
    /// - `StoreError::SelectionChanged` if the selection is not `expected`
    /// - `StoreError::SelectionNotLoaded` if `expected` does not resolve
    pub fn mutate_if_selected<R>(
        &self,
        expected: &ScenarioUuid,
        f: impl FnOnce(&mut Scenario) -> R,
    ) -> Result<R, StoreError> {
        self.mutate_checked(Some(expected), f)
    }

    fn mutate_selected<R>(&self, f: impl FnOnce(&mut Scenario) -> R) -> Result<R, StoreError> {
        self.mutate_checked(None, f)
    }

    fn mutate_checked<R>(
        &self,
        expected: Option<&ScenarioUuid>,
        f: impl FnOnce(&mut Scenario) -> R,
    ) -> Result<R, StoreError> {
        let result = {
            let mut state = self.state.write();
            if let Some(expected) = expected {
                if state.selected.as_ref() != Some(expected) {
                    return Err(StoreError::SelectionChanged {
                        expected: expected.clone(),
                        actual: state.selected.clone(),
                    });
                }
            }
            let pos = match state.selected_position() {
                Ok(pos) => pos,
                Err(e) => {
                    tracing::warn!(error = %e, "inject mutation without a usable selection");
                    return Err(e);
                }
            };
            f(&mut state.scenarios[pos])
        };
        self.notify();
        Ok(result)
    }

    fn notify(&self) {
        self.changes.send_modify(|generation| *generation += 1);
    }
}

impl Default for ScenarioStore {
    fn default() -> Self {
        Self::new()
    }
}
