//! Injects and their flow records
//!
//! An [`Inject`] is a single event of a scenario. Its ordering and
//! dependency metadata live in a separate [`InjectFlow`] record keyed by
//! `inject_uuid`; the optional [`Requirements`] on a flow record point at
//! another inject of the same scenario.

use crate::ids::InjectUuid;
use crate::serde_ext::null_as_default;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A single event/action within a scenario
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Inject {
    /// Inject identifier
    #[serde(default, deserialize_with = "null_as_default")]
    pub uuid: InjectUuid,

    /// Display name
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,

    /// Action performed by the inject
    #[serde(default, deserialize_with = "null_as_default")]
    pub action: String,

    /// Tool the inject targets, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_tool: Option<String>,

    /// Free-form description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Opaque evaluation records
    #[serde(default, deserialize_with = "null_as_default")]
    pub inject_evaluation: Vec<Value>,

    /// Fields the editor does not interpret
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Inject {
    /// Create an inject with a name and action
    #[inline]
    #[must_use]
    pub fn new(uuid: impl Into<InjectUuid>, name: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            uuid: uuid.into(),
            name: name.into(),
            action: action.into(),
            ..Self::default()
        }
    }

    /// Create an inject carrying only its identifier
    #[inline]
    #[must_use]
    pub fn with_uuid(uuid: impl Into<InjectUuid>) -> Self {
        Self {
            uuid: uuid.into(),
            ..Self::default()
        }
    }

    /// Set the target tool
    #[inline]
    #[must_use]
    pub fn with_target_tool(mut self, tool: impl Into<String>) -> Self {
        self.target_tool = Some(tool.into());
        self
    }
}

/// Dependency of one flow record on another inject
///
/// Only `inject_uuid` is interpreted; every other key (resolution type and
/// the like) is carried through untouched and dropped together with it when
/// the requirement is cleared.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Requirements {
    /// Inject this record depends on
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inject_uuid: Option<InjectUuid>,

    /// Uninterpreted requirement fields
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Requirements {
    /// Requirement on a single inject
    #[inline]
    #[must_use]
    pub fn on(inject_uuid: impl Into<InjectUuid>) -> Self {
        Self {
            inject_uuid: Some(inject_uuid.into()),
            extra: Map::new(),
        }
    }

    /// True when the requirement serializes as `{}`
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inject_uuid.is_none() && self.extra.is_empty()
    }

    /// True when this requirement points at `inject_uuid`
    #[inline]
    #[must_use]
    pub fn references(&self, inject_uuid: &InjectUuid) -> bool {
        self.inject_uuid.as_ref() == Some(inject_uuid)
    }

    /// Drop the requirement entirely
    #[inline]
    pub fn clear(&mut self) {
        self.inject_uuid = None;
        self.extra.clear();
    }
}

/// Ordering and dependency metadata for one inject
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InjectFlow {
    /// Inject this record belongs to
    #[serde(default, deserialize_with = "null_as_default")]
    pub inject_uuid: InjectUuid,

    /// Free-form description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Dependency on another inject (`null` reads as empty)
    #[serde(default, deserialize_with = "null_as_default")]
    pub requirements: Requirements,

    /// Sequencing metadata (triggers, followers)
    #[serde(default, deserialize_with = "null_as_default")]
    pub sequence: Map<String, Value>,

    /// Fields the editor does not interpret
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl InjectFlow {
    /// Flow record with no requirements
    #[inline]
    #[must_use]
    pub fn new(inject_uuid: impl Into<InjectUuid>) -> Self {
        Self {
            inject_uuid: inject_uuid.into(),
            ..Self::default()
        }
    }

    /// Add a requirement on another inject
    #[inline]
    #[must_use]
    pub fn requiring(mut self, inject_uuid: impl Into<InjectUuid>) -> Self {
        self.requirements = Requirements::on(inject_uuid);
        self
    }

    /// True when this record depends on `inject_uuid`
    #[inline]
    #[must_use]
    pub fn requires(&self, inject_uuid: &InjectUuid) -> bool {
        self.requirements.references(inject_uuid)
    }
}
