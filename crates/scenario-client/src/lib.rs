//! Scenario Client - HTTP access to the scenario server
//!
//! Maps each server endpoint to one typed call:
//! - Reads (`index`, `reload`, `view`) decode into model documents
//! - Writes return a [`WriteOutcome`] that must be checked for `success`
//! - Every request sends JSON `Accept`/`Content-Type` headers
//! - Non-2xx statuses surface as [`ApiError::Transport`]; nothing is retried
//!
//! The network sits behind the [`Transport`] trait so callers can swap in
//! their own implementation.

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod client;
pub mod config;
pub mod endpoint;
pub mod error;
pub mod reply;
pub mod transport;

pub use client::ApiClient;
pub use config::{ClientConfig, Environment, UnknownEnvironment, DEVELOPMENT_BASE_URL};
pub use endpoint::Endpoint;
pub use error::ApiError;
pub use reply::{ServerReply, ViewOutcome, WriteOutcome};
pub use transport::{ApiRequest, ApiResponse, Method, ReqwestTransport, Transport};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
