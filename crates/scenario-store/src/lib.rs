//! Scenario Store - client-side scenario/inject state
//!
//! Keeps the scenarios pulled from the server consistent while they are
//! edited:
//! - Bulk replacement from the list/reload endpoints
//! - A single, weakly referenced selected scenario
//! - Inject add/update/remove/reorder on the selected scenario, keeping
//!   inject flow records and requirements referentially intact
//! - A derived identifier lookup rebuilt lazily after each replacement
//!
//! # Example
//!
//! ```rust
//! use scenario_model::{Inject, InjectFlow, Scenario, ScenarioUuid};
//! use scenario_store::ScenarioStore;
//!
//! let store = ScenarioStore::with_scenarios(vec![Scenario::with_uuid("A")]);
//! store.select_scenario(ScenarioUuid::new("A"));
//! store.add_inject(Inject::with_uuid("i1"), InjectFlow::new("i1")).unwrap();
//!
//! assert_eq!(store.selected_scenario().unwrap().injects.len(), 1);
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod error;
pub mod inject_ops;
mod lookup;
pub mod store;

pub use error::StoreError;
pub use inject_ops::{InjectChange, RemovalReport};
pub use store::ScenarioStore;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
