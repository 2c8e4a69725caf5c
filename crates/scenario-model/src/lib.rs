//! Scenario Model - wire types for the scenario editor
//!
//! Provides the data shared by the store, the API client and the session:
//! - Scenarios and their exercise header
//! - Injects, inject flow records and their requirements
//! - Index responses with per-file read errors
//! - Request payloads for every write endpoint
//!
//! Every record keeps fields it does not interpret, so a scenario loaded
//! from the server and sent back is not silently truncated.

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod ids;
pub mod index;
pub mod inject;
pub mod payload;
pub mod scenario;
pub mod serde_ext;

pub use ids::{InjectUuid, ScenarioUuid};
pub use index::{ReadError, ScenarioIndex};
pub use inject::{Inject, InjectFlow, Requirements};
pub use payload::{
    EmptyPayload, EvalOutcome, EvaluationStrategy, ExercisePayload, InjectOrderPayload,
    InjectTestPayload, InjectTestResult, SaveInjectPayload,
};
pub use scenario::{DanglingRequirement, Exercise, IntegrityReport, Scenario};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
