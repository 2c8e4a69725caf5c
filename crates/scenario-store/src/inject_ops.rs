//! Inject mutations on a single scenario
//!
//! These functions keep `injects` and `inject_flow` consistent:
//! - every inject/flow pair is added, replaced or removed together
//! - removing an inject clears every requirement that pointed at it
//! - reordering moves flow records along with their injects

use scenario_model::{Inject, InjectFlow, InjectUuid, Scenario};
use std::collections::HashMap;

/// What [`upsert_inject`] did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InjectChange {
    /// The inject was appended
    Added,
    /// An existing inject was replaced
    Updated,
}

/// What [`remove_inject`] did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemovalReport {
    /// Number of inject entries removed
    pub injects_removed: usize,
    /// Number of flow records removed
    pub flows_removed: usize,
    /// Flow records whose requirements were cleared
    pub requirements_cleared: Vec<InjectUuid>,
}

impl RemovalReport {
    /// True when the scenario was left untouched
    #[inline]
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.injects_removed == 0 && self.flows_removed == 0 && self.requirements_cleared.is_empty()
    }
}

/// Append an inject and its flow record
pub fn add_inject(scenario: &mut Scenario, inject: Inject, flow: InjectFlow) {
    scenario.injects.push(inject);
    scenario.inject_flow.push(flow);
}

/// Replace the inject and flow record with matching identifiers in place
///
/// Returns `true` if any entry was replaced. Entries that match nothing are
/// not added.
pub fn update_inject(scenario: &mut Scenario, inject: &Inject, flow: &InjectFlow) -> bool {
    let mut replaced = false;
    for slot in scenario.injects.iter_mut().filter(|i| i.uuid == inject.uuid) {
        slot.clone_from(inject);
        replaced = true;
    }
    for slot in scenario
        .inject_flow
        .iter_mut()
        .filter(|f| f.inject_uuid == flow.inject_uuid)
    {
        slot.clone_from(flow);
        replaced = true;
    }
    replaced
}

/// Replace matching entries, appending whichever list lacks one
pub fn upsert_inject(scenario: &mut Scenario, inject: Inject, flow: InjectFlow) -> InjectChange {
    let change = if scenario.contains_inject(&inject.uuid) {
        InjectChange::Updated
    } else {
        InjectChange::Added
    };

    if change == InjectChange::Added {
        scenario.injects.push(inject);
    } else {
        for slot in scenario.injects.iter_mut().filter(|i| i.uuid == inject.uuid) {
            slot.clone_from(&inject);
        }
    }

    if scenario.flow(&flow.inject_uuid).is_some() {
        for slot in scenario
            .inject_flow
            .iter_mut()
            .filter(|f| f.inject_uuid == flow.inject_uuid)
        {
            slot.clone_from(&flow);
        }
    } else {
        scenario.inject_flow.push(flow);
    }

    change
}

/// Remove an inject, its flow record and every requirement on it
pub fn remove_inject(scenario: &mut Scenario, inject_uuid: &InjectUuid) -> RemovalReport {
    let injects_before = scenario.injects.len();
    scenario.injects.retain(|i| &i.uuid != inject_uuid);

    let flows_before = scenario.inject_flow.len();
    scenario.inject_flow.retain(|f| &f.inject_uuid != inject_uuid);

    let mut requirements_cleared = Vec::new();
    for flow in &mut scenario.inject_flow {
        if flow.requires(inject_uuid) {
            flow.requirements.clear();
            requirements_cleared.push(flow.inject_uuid.clone());
        }
    }

    RemovalReport {
        injects_removed: injects_before - scenario.injects.len(),
        flows_removed: flows_before - scenario.inject_flow.len(),
        requirements_cleared,
    }
}

/// Reorder injects and flow records to follow `order`
///
/// Unknown identifiers are ignored; entries not named keep their relative
/// order after the named ones.
pub fn reorder_injects(scenario: &mut Scenario, order: &[InjectUuid]) {
    let injects = std::mem::take(&mut scenario.injects);
    scenario.injects = sort_by_rank(injects, order, |i| &i.uuid);

    let flows = std::mem::take(&mut scenario.inject_flow);
    scenario.inject_flow = sort_by_rank(flows, order, |f| &f.inject_uuid);
}

fn sort_by_rank<T>(items: Vec<T>, order: &[InjectUuid], key: impl Fn(&T) -> &InjectUuid) -> Vec<T> {
    // First occurrence of a duplicated identifier wins.
    let rank: HashMap<&InjectUuid, usize> = order
        .iter()
        .enumerate()
        .rev()
        .map(|(pos, uuid)| (uuid, pos))
        .collect();

    let mut ranked: Vec<(usize, T)> = items
        .into_iter()
        .map(|item| (rank.get(key(&item)).copied().unwrap_or(usize::MAX), item))
        .collect();
    ranked.sort_by_key(|(pos, _)| *pos);
    ranked.into_iter().map(|(_, item)| item).collect()
}
