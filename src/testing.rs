//! Testing utilities for exercising the provider.
//!
//! [`ProviderHarness`] wraps a [`GrafanaProvider`] and exposes the CRUD
//! surface with a little less ceremony, for tests that drive whole
//! resource lifecycles against a mock Grafana server.
//!
//! # Example
//!
//! ```ignore
//! use grafana_provider::testing::ProviderHarness;
//! use serde_json::json;
//!
//! #[tokio::test]
//! async fn test_create_team() {
//!     let harness = ProviderHarness::new(provider_against_mock().await);
//!
//!     let state = harness
//!         .create("grafana_team", json!({"name": "backend"}))
//!         .await
//!         .unwrap();
//!
//!     assert_eq!(state["name"], "backend");
//! }
//! ```

use serde_json::Value;

use crate::error::ProviderError;
use crate::resource::GrafanaProvider;
use crate::schema::ProviderSchema;

/// A thin test harness around [`GrafanaProvider`].
pub struct ProviderHarness {
    provider: GrafanaProvider,
}

impl ProviderHarness {
    /// Wrap a provider.
    #[must_use]
    pub fn new(provider: GrafanaProvider) -> Self {
        Self { provider }
    }

    /// The wrapped provider.
    #[must_use]
    pub fn provider(&self) -> &GrafanaProvider {
        &self.provider
    }

    /// The provider's full schema.
    #[must_use]
    pub fn schema(&self) -> ProviderSchema {
        self.provider.schema()
    }

    /// The resource type names the provider manages.
    #[must_use]
    pub fn resource_types(&self) -> Vec<&'static str> {
        self.provider.resource_types()
    }

    /// Create a resource.
    pub async fn create(
        &self,
        resource_type: &str,
        desired: Value,
    ) -> Result<Value, ProviderError> {
        self.provider.create(resource_type, desired).await
    }

    /// Read a resource.
    pub async fn read(&self, resource_type: &str, state: Value) -> Result<Value, ProviderError> {
        self.provider.read(resource_type, state).await
    }

    /// Update a resource.
    pub async fn update(
        &self,
        resource_type: &str,
        prior: Value,
        desired: Value,
    ) -> Result<Value, ProviderError> {
        self.provider.update(resource_type, prior, desired).await
    }

    /// Delete a resource.
    pub async fn delete(&self, resource_type: &str, state: Value) -> Result<(), ProviderError> {
        self.provider.delete(resource_type, state).await
    }

    /// Probe a resource for existence.
    pub async fn exists(&self, resource_type: &str, state: Value) -> Result<bool, ProviderError> {
        self.provider.exists(resource_type, state).await
    }

    /// Import a resource by identifier.
    pub async fn import(&self, resource_type: &str, id: &str) -> Result<Value, ProviderError> {
        self.provider.import(resource_type, id).await
    }

    /// Create a resource and immediately read it back, returning the
    /// refreshed state.
    pub async fn lifecycle_create(
        &self,
        resource_type: &str,
        desired: Value,
    ) -> Result<Value, ProviderError> {
        let state = self.create(resource_type, desired).await?;
        self.read(resource_type, state).await
    }
}
