//! Scenario Session - the editing session around the store
//!
//! Combines the API client and the scenario store:
//! - Writes hit the server first; the store follows only on `success`
//! - Selection-bound writes are refused locally when nothing is selected
//! - Server feedback is collected as toasts
//! - A navigation guard seeds the selection and triggers the initial load
//! - Configuration comes from TOML plus environment overrides
//!
//! # Example
//!
//! ```rust,no_run
//! use scenario_client::ApiClient;
//! use scenario_session::{EditorConfig, ScenarioSession};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = EditorConfig::load("scenario-editor.toml")?.apply_env()?;
//! let session = ScenarioSession::new(ApiClient::new(&config.api)?);
//! session.fetch_scenarios().await?;
//! # Ok(())
//! # }
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod config;
pub mod error;
pub mod router;
pub mod session;
pub mod toast;

pub use config::{ConfigError, EditorConfig, LogConfig};
pub use error::SessionError;
pub use router::{
    match_route, GuardOutcome, Navigation, NavigationGuard, RedirectReason, RouteMatch, RouteName,
    INDEX_PATH, ROUTES,
};
pub use session::ScenarioSession;
pub use toast::{Toast, ToastId, ToastQueue, ToastVariant};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
