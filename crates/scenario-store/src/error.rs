//! Error types for the scenario store

use scenario_model::ScenarioUuid;

/// Failures of the selected-scenario mutation helpers
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// No scenario is selected
    #[error("no scenario selected")]
    NoSelection,

    /// The selected identifier is not among the loaded scenarios
    #[error("selected scenario {0} is not loaded")]
    SelectionNotLoaded(ScenarioUuid),

    /// The selection moved away from the scenario a write was meant for
    #[error("selection moved from {expected} to {}", .actual.as_ref().map_or("nothing", ScenarioUuid::as_str))]
    SelectionChanged {
        expected: ScenarioUuid,
        actual: Option<ScenarioUuid>,
    },
}

impl StoreError {
    /// Check if a reload could resolve the error
    #[inline]
    #[must_use]
    pub fn is_reload_recoverable(&self) -> bool {
        matches!(self, Self::SelectionNotLoaded(_))
    }

    /// Check if the error means the selection moved under a write
    #[inline]
    #[must_use]
    pub fn is_selection_changed(&self) -> bool {
        matches!(self, Self::SelectionChanged { .. })
    }
}
