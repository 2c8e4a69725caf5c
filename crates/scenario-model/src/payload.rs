//! Request bodies sent to the scenario server

use crate::ids::{InjectUuid, ScenarioUuid};
use crate::inject::{Inject, InjectFlow};
use crate::scenario::Exercise;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Body of the add and edit scenario endpoints
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExercisePayload {
    /// Display name
    pub name: String,
    /// Namespace
    pub namespace: String,
    /// Description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Identifier; absent when creating
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uuid: Option<ScenarioUuid>,
    /// Version; the server overwrites it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Free-form metadata
    #[serde(default)]
    pub meta: Map<String, Value>,
}

impl ExercisePayload {
    /// Payload for a new scenario
    #[inline]
    #[must_use]
    pub fn new(name: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
            ..Self::default()
        }
    }

    /// Set the description
    #[inline]
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

impl From<&Exercise> for ExercisePayload {
    fn from(exercise: &Exercise) -> Self {
        Self {
            name: exercise.name.clone(),
            namespace: exercise.namespace.clone(),
            description: Some(exercise.description.clone()),
            uuid: Some(exercise.uuid.clone()),
            version: exercise.version.clone(),
            meta: exercise.meta.clone(),
        }
    }
}

/// Body of the save-inject endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveInjectPayload {
    /// Inject to create or replace
    pub inject: Inject,
    /// Its flow record
    #[serde(rename = "injectFlow")]
    pub inject_flow: InjectFlow,
}

/// Body of the delete-inject endpoint (always `{}`)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmptyPayload {}

/// Body of the order-inject endpoint
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InjectOrderPayload {
    /// Complete inject order
    pub inject_uuids: Vec<InjectUuid>,
}

/// Evaluation strategy named in an inject-test request
///
/// Names the tester adds later pass through as [`Self::Other`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EvaluationStrategy {
    /// Filter the supplied test data
    DataFiltering,
    /// Replay a query against a mirror
    QueryMirror,
    /// Query a search endpoint and evaluate the result
    QuerySearch,
    /// Any other strategy name
    Other(String),
}

impl EvaluationStrategy {
    /// Wire name of the strategy
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::DataFiltering => "data_filtering",
            Self::QueryMirror => "query_mirror",
            Self::QuerySearch => "query_search",
            Self::Other(name) => name,
        }
    }
}

impl From<String> for EvaluationStrategy {
    fn from(name: String) -> Self {
        match name.as_str() {
            "data_filtering" => Self::DataFiltering,
            "query_mirror" => Self::QueryMirror,
            "query_search" => Self::QuerySearch,
            _ => Self::Other(name),
        }
    }
}

impl std::fmt::Display for EvaluationStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for EvaluationStrategy {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for EvaluationStrategy {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(Self::from)
    }
}

/// Body of the inject-test endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InjectTestPayload {
    /// Tool the evaluated inject targets
    pub target_tool: String,
    /// How the inject is evaluated
    pub evaluation_strategy: EvaluationStrategy,
    /// Evaluation parameters
    #[serde(default)]
    pub eval_params: Vec<Value>,
    /// Data evaluated by `data_filtering`
    #[serde(default)]
    pub test_data: Map<String, Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query_mirror_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query_mirror_method: Option<String>,
    #[serde(default)]
    pub query_mirror_payload: Vec<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query_search_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query_search_method: Option<String>,
    #[serde(default)]
    pub query_search_payload: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query_search_misp_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query_search_misp_apikey: Option<String>,

    /// Fields the editor does not interpret
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl InjectTestPayload {
    /// Minimal payload for a strategy
    #[must_use]
    pub fn new(target_tool: impl Into<String>, evaluation_strategy: EvaluationStrategy) -> Self {
        Self {
            target_tool: target_tool.into(),
            evaluation_strategy,
            eval_params: Vec::new(),
            test_data: Map::new(),
            query_mirror_url: None,
            query_mirror_method: None,
            query_mirror_payload: Vec::new(),
            query_search_url: None,
            query_search_method: None,
            query_search_payload: Map::new(),
            query_search_misp_url: None,
            query_search_misp_apikey: None,
            extra: Map::new(),
        }
    }
}

/// Outcome code reported by the inject tester
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvalOutcome {
    /// Evaluation passed (code 1)
    Success,
    /// Evaluation failed (code 2)
    Fail,
    /// Any other code
    Unknown(i64),
}

impl<'de> Deserialize<'de> for EvalOutcome {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match i64::deserialize(deserializer)? {
            1 => Self::Success,
            2 => Self::Fail,
            other => Self::Unknown(other),
        })
    }
}

/// `data` field of an inject-test reply
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct InjectTestResult {
    /// Evaluation outcome
    pub outcome: EvalOutcome,
    /// Evaluator trace
    #[serde(default)]
    pub debug: Vec<Value>,
}
