//! Grafana Provider
//!
//! This crate exposes Grafana resources (teams, users, folder
//! permissions, dashboards) as declarative state objects, backed by a
//! typed client for the Grafana HTTP API. It is the integration layer a
//! declarative infrastructure tool plugs in: the tool owns planning,
//! state storage and diffing; this crate owns turning desired state into
//! Grafana API calls and read-back.
//!
//! # Overview
//!
//! The crate provides:
//!
//! - **[`GrafanaClient`]**: one method per Grafana REST endpoint, typed
//!   request/response structs, a single round trip per call
//! - **[`GrafanaProvider`]**: CRUD adapters (create/read/update/delete/
//!   exists/import) per resource type, dispatched by type name
//! - **Schema types**: descriptions of each resource's declarative
//!   fields for the calling framework
//! - **Error types**: a client layer and an adapter layer, with `404
//!   Not Found` special-cased into "resource absent" where existence
//!   semantics apply
//! - **Logging**: `tracing`-based setup helpers
//!
//! # Quick Start
//!
//! ```ignore
//! use grafana_provider::{GrafanaClient, GrafanaConfig, GrafanaProvider};
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = GrafanaConfig::with_token("http://grafana:3000", "api-key");
//!     let provider = GrafanaProvider::new(GrafanaClient::new(config)?);
//!
//!     // Create a team with two members
//!     let state = provider
//!         .create("grafana_team", json!({"name": "backend", "members": [4, 7]}))
//!         .await?;
//!
//!     // Later: converge membership with one add/remove call per change
//!     let desired = json!({"name": "backend", "members": [7, 9]});
//!     let state = provider.update("grafana_team", state, desired).await?;
//!
//!     provider.delete("grafana_team", state).await?;
//!     Ok(())
//! }
//! ```
//!
//! # Semantics worth knowing
//!
//! - Reads of a deleted resource are drift, not failure: the adapter
//!   clears the stored identifier and succeeds, so the framework can
//!   plan a re-create.
//! - Folder permissions are replace-based end to end: every write
//!   overwrites the folder's whole permission set, and delete writes an
//!   empty set.
//! - There are no retries and no rollback. A team create that fails
//!   while adding members leaves the team behind, partially populated.
//! - The dashboard uid/id derivation helpers read fields out of the
//!   opaque model blob and fail when those fields are missing.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod client;
pub mod config;
pub mod error;
pub mod logging;
pub mod resource;
pub mod schema;
pub mod testing;

// Re-export main types at crate root
pub use client::GrafanaClient;
pub use config::{Auth, GrafanaConfig};
pub use error::{ClientError, ProviderError};
pub use logging::{init_logging, init_logging_with_default, try_init_logging};
pub use resource::{GrafanaProvider, ResourceAdapter};
pub use schema::ProviderSchema;

// Re-export async_trait for adapter implementations outside this crate
pub use async_trait::async_trait;

// Re-export commonly used external types
pub use serde_json;
pub use tracing;
