//! Resource adapters: declarative CRUD over the Grafana client.
//!
//! Each adapter translates a desired-state object into ordered calls
//! against the [`GrafanaClient`](crate::client::GrafanaClient) and folds
//! the server's answers back into the declarative representation. States
//! cross the [`ResourceAdapter`] seam as `serde_json::Value`; inside,
//! each adapter works on its own typed state struct.
//!
//! The adapters share one contract:
//!
//! - **create** reads the desired fields, issues the create call(s), and
//!   stores the server-assigned identifier in the returned state.
//! - **read** refreshes every field from the server. A `404 Not Found`
//!   is drift, not an error: the stored identifier is cleared and the
//!   call succeeds.
//! - **update** re-issues calls only for fields that differ between the
//!   prior and desired states.
//! - **delete** issues the entity's delete call.
//! - **exists** probes by fetch; only the exact `404 Not Found` status
//!   line means "absent", every other failure propagates.
//! - **import** re-invokes read with an externally supplied identifier
//!   and fails if it does not resolve.

mod dashboard;
mod folder_permission;
mod team;
mod user;

pub use dashboard::{DashboardResource, DashboardState};
pub use folder_permission::{FolderPermissionResource, FolderPermissionState, PermissionItem};
pub use team::{TeamResource, TeamState};
pub use user::{UserResource, UserState};

use std::sync::Arc;

use serde_json::Value;

use crate::client::GrafanaClient;
use crate::error::ProviderError;
use crate::schema::{Attribute, AttributeFlags, AttributeType, ProviderSchema, Schema};

/// A CRUD adapter for one Grafana resource type.
///
/// States are `serde_json::Value` objects shaped by the resource's
/// [`schema`](ResourceAdapter::schema); the stored identifier lives in
/// the state's `id` field.
#[async_trait::async_trait]
pub trait ResourceAdapter: Send + Sync {
    /// The resource type name, e.g. `grafana_team`.
    fn type_name(&self) -> &'static str;

    /// The declarative schema of this resource's state fields.
    fn schema(&self) -> Schema;

    /// Create the resource described by `desired` and return the state
    /// with the server-assigned identifier filled in.
    async fn create(&self, desired: Value) -> Result<Value, ProviderError>;

    /// Refresh `state` from the server. Clears the identifier and
    /// succeeds when the resource no longer exists.
    async fn read(&self, state: Value) -> Result<Value, ProviderError>;

    /// Apply the difference between `prior` and `desired` to the server
    /// and return the resulting state.
    async fn update(&self, prior: Value, desired: Value) -> Result<Value, ProviderError>;

    /// Delete the resource held in `state`.
    async fn delete(&self, state: Value) -> Result<(), ProviderError>;

    /// Whether the resource held in `state` still exists remotely.
    async fn exists(&self, state: Value) -> Result<bool, ProviderError>;

    /// Build state for an existing resource from its identifier.
    async fn import(&self, id: &str) -> Result<Value, ProviderError>;
}

/// The provider: all resource adapters over one shared client.
pub struct GrafanaProvider {
    adapters: Vec<Box<dyn ResourceAdapter>>,
}

impl GrafanaProvider {
    /// Create a provider over the given client.
    #[must_use]
    pub fn new(client: GrafanaClient) -> Self {
        let client = Arc::new(client);
        Self {
            adapters: vec![
                Box::new(TeamResource::new(Arc::clone(&client))),
                Box::new(UserResource::new(Arc::clone(&client))),
                Box::new(FolderPermissionResource::new(Arc::clone(&client))),
                Box::new(DashboardResource::new(client)),
            ],
        }
    }

    /// The schema of the provider configuration and every resource.
    #[must_use]
    pub fn schema(&self) -> ProviderSchema {
        let mut schema = ProviderSchema::new().with_provider_config(
            Schema::v0()
                .with_attribute(
                    "url",
                    Attribute::required_string().with_description("Base URL of the Grafana instance"),
                )
                .with_attribute(
                    "auth",
                    Attribute::new(AttributeType::String, AttributeFlags::required().sensitive())
                        .with_description("API key, or username:password for basic auth"),
                ),
        );
        for adapter in &self.adapters {
            schema = schema.with_resource(adapter.type_name(), adapter.schema());
        }
        schema
    }

    /// The resource type names this provider manages.
    #[must_use]
    pub fn resource_types(&self) -> Vec<&'static str> {
        self.adapters.iter().map(|a| a.type_name()).collect()
    }

    fn adapter(&self, resource_type: &str) -> Result<&dyn ResourceAdapter, ProviderError> {
        self.adapters
            .iter()
            .find(|adapter| adapter.type_name() == resource_type)
            .map(|adapter| adapter.as_ref())
            .ok_or_else(|| ProviderError::UnknownResource(resource_type.to_string()))
    }

    /// Create a resource of the given type. See [`ResourceAdapter::create`].
    pub async fn create(
        &self,
        resource_type: &str,
        desired: Value,
    ) -> Result<Value, ProviderError> {
        self.adapter(resource_type)?.create(desired).await
    }

    /// Read a resource of the given type. See [`ResourceAdapter::read`].
    pub async fn read(&self, resource_type: &str, state: Value) -> Result<Value, ProviderError> {
        self.adapter(resource_type)?.read(state).await
    }

    /// Update a resource of the given type. See [`ResourceAdapter::update`].
    pub async fn update(
        &self,
        resource_type: &str,
        prior: Value,
        desired: Value,
    ) -> Result<Value, ProviderError> {
        self.adapter(resource_type)?.update(prior, desired).await
    }

    /// Delete a resource of the given type. See [`ResourceAdapter::delete`].
    pub async fn delete(&self, resource_type: &str, state: Value) -> Result<(), ProviderError> {
        self.adapter(resource_type)?.delete(state).await
    }

    /// Probe a resource of the given type. See [`ResourceAdapter::exists`].
    pub async fn exists(&self, resource_type: &str, state: Value) -> Result<bool, ProviderError> {
        self.adapter(resource_type)?.exists(state).await
    }

    /// Import a resource of the given type. See [`ResourceAdapter::import`].
    pub async fn import(&self, resource_type: &str, id: &str) -> Result<Value, ProviderError> {
        self.adapter(resource_type)?.import(id).await
    }
}

/// The stored identifier, or an invalid-state error naming the resource.
pub(crate) fn require_id<'a>(
    id: &'a Option<String>,
    resource: &str,
) -> Result<&'a str, ProviderError> {
    id.as_deref()
        .filter(|raw| !raw.is_empty())
        .ok_or_else(|| ProviderError::InvalidState(format!("{resource} state has no id")))
}

/// The stored identifier parsed as the numeric id Grafana assigned.
pub(crate) fn require_numeric_id(
    id: &Option<String>,
    resource: &str,
) -> Result<i64, ProviderError> {
    let raw = require_id(id, resource)?;
    raw.parse().map_err(|_| {
        ProviderError::InvalidState(format!("{resource} id {raw:?} is not numeric"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn require_id_rejects_missing_and_empty() {
        assert!(require_id(&None, "team").is_err());
        assert!(require_id(&Some(String::new()), "team").is_err());
        assert_eq!(require_id(&Some("42".to_string()), "team").unwrap(), "42");
    }

    #[test]
    fn require_numeric_id_parses() {
        assert_eq!(
            require_numeric_id(&Some("42".to_string()), "team").unwrap(),
            42
        );
        let err = require_numeric_id(&Some("abc".to_string()), "team").unwrap_err();
        assert!(matches!(err, ProviderError::InvalidState(_)));
    }
}
