//! Scenarios and their exercise header

use crate::ids::{InjectUuid, ScenarioUuid};
use crate::inject::{Inject, InjectFlow};
use crate::serde_ext::null_as_default;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashSet;

/// Exercise header of a scenario
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Exercise {
    /// Scenario identifier
    #[serde(default, deserialize_with = "null_as_default")]
    pub uuid: ScenarioUuid,

    /// Display name
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,

    /// Namespace the exercise belongs to
    #[serde(default, deserialize_with = "null_as_default")]
    pub namespace: String,

    /// Free-form description
    #[serde(default, deserialize_with = "crate::serde_ext::lenient_string")]
    pub description: String,

    /// Server-assigned version (a date stamp)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    /// Free-form metadata
    #[serde(default, deserialize_with = "null_as_default")]
    pub meta: Map<String, Value>,

    /// Fields the editor does not interpret
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Exercise {
    /// Exercise header with a name and namespace
    #[inline]
    #[must_use]
    pub fn new(uuid: impl Into<ScenarioUuid>, name: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self {
            uuid: uuid.into(),
            name: name.into(),
            namespace: namespace.into(),
            ..Self::default()
        }
    }
}

/// A scenario: an exercise header plus its ordered injects
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    /// Exercise header, carries the scenario identifier
    pub exercise: Exercise,

    /// Injects in display order
    #[serde(default, deserialize_with = "null_as_default")]
    pub injects: Vec<Inject>,

    /// One flow record per inject
    #[serde(default, deserialize_with = "null_as_default")]
    pub inject_flow: Vec<InjectFlow>,

    /// Opaque payloads referenced by injects
    #[serde(default, deserialize_with = "null_as_default")]
    pub inject_payloads: Vec<Value>,

    /// Fields the editor does not interpret
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Scenario {
    /// Empty scenario around an exercise header
    #[inline]
    #[must_use]
    pub fn new(exercise: Exercise) -> Self {
        Self {
            exercise,
            ..Self::default()
        }
    }

    /// Empty scenario with only an identifier
    #[inline]
    #[must_use]
    pub fn with_uuid(uuid: impl Into<ScenarioUuid>) -> Self {
        Self::new(Exercise {
            uuid: uuid.into(),
            ..Exercise::default()
        })
    }

    /// Scenario identifier
    #[inline]
    #[must_use]
    pub fn uuid(&self) -> &ScenarioUuid {
        &self.exercise.uuid
    }

    /// Find an inject by identifier
    #[must_use]
    pub fn inject(&self, uuid: &InjectUuid) -> Option<&Inject> {
        self.injects.iter().find(|i| &i.uuid == uuid)
    }

    /// Find the flow record of an inject
    #[must_use]
    pub fn flow(&self, uuid: &InjectUuid) -> Option<&InjectFlow> {
        self.inject_flow.iter().find(|f| &f.inject_uuid == uuid)
    }

    /// True when an inject with this identifier exists
    #[inline]
    #[must_use]
    pub fn contains_inject(&self, uuid: &InjectUuid) -> bool {
        self.inject(uuid).is_some()
    }

    /// Identifiers of all injects, in order
    #[must_use]
    pub fn inject_order(&self) -> Vec<InjectUuid> {
        self.injects.iter().map(|i| i.uuid.clone()).collect()
    }

    /// Check inject/flow referential integrity
    ///
    /// Scenarios loaded from the server are trusted and never rejected; this
    /// is a read-only report for callers that want to surface problems.
    #[must_use]
    pub fn integrity_report(&self) -> IntegrityReport {
        let injects: HashSet<&InjectUuid> = self.injects.iter().map(|i| &i.uuid).collect();
        let flows: HashSet<&InjectUuid> = self.inject_flow.iter().map(|f| &f.inject_uuid).collect();

        let mut seen = HashSet::new();
        let duplicate_injects = self
            .injects
            .iter()
            .filter(|i| !seen.insert(&i.uuid))
            .map(|i| i.uuid.clone())
            .collect();

        IntegrityReport {
            orphan_flows: self
                .inject_flow
                .iter()
                .filter(|f| !injects.contains(&f.inject_uuid))
                .map(|f| f.inject_uuid.clone())
                .collect(),
            injects_without_flow: self
                .injects
                .iter()
                .filter(|i| !flows.contains(&i.uuid))
                .map(|i| i.uuid.clone())
                .collect(),
            dangling_requirements: self
                .inject_flow
                .iter()
                .filter_map(|f| {
                    f.requirements
                        .inject_uuid
                        .as_ref()
                        .filter(|target| !injects.contains(target))
                        .map(|target| DanglingRequirement {
                            flow: f.inject_uuid.clone(),
                            missing: target.clone(),
                        })
                })
                .collect(),
            duplicate_injects,
        }
    }
}

/// Requirement pointing at an inject that does not exist
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DanglingRequirement {
    /// Flow record holding the requirement
    pub flow: InjectUuid,
    /// Inject the requirement points at
    pub missing: InjectUuid,
}

/// Result of [`Scenario::integrity_report`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IntegrityReport {
    /// Flow records whose inject does not exist
    pub orphan_flows: Vec<InjectUuid>,
    /// Injects with no flow record
    pub injects_without_flow: Vec<InjectUuid>,
    /// Requirements on missing injects
    pub dangling_requirements: Vec<DanglingRequirement>,
    /// Inject identifiers that appear more than once
    pub duplicate_injects: Vec<InjectUuid>,
}

impl IntegrityReport {
    /// True when no problem was found
    #[inline]
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.orphan_flows.is_empty()
            && self.injects_without_flow.is_empty()
            && self.dangling_requirements.is_empty()
            && self.duplicate_injects.is_empty()
    }
}
