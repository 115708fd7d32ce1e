//! The `grafana_dashboard` resource.
//!
//! The stored identifier is the legacy slug; the uid is kept in state as
//! a computed field. The panel definition travels as `config_json`, an
//! opaque JSON string this adapter parses only to ship it.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use super::{require_id, ResourceAdapter};
use crate::client::{Dashboard, DashboardMeta, GrafanaClient};
use crate::error::ProviderError;
use crate::schema::{Attribute, Schema};

/// Declarative state of a dashboard.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardState {
    /// Slug of the dashboard, absent until created.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Stable external identifier, filled on read.
    #[serde(default)]
    pub uid: String,
    /// Numeric id of the containing folder, 0 for General.
    #[serde(default)]
    pub folder: i64,
    /// The dashboard model as a JSON string. Not interpreted beyond
    /// (de)serialization.
    pub config_json: String,
}

/// Adapter for the `grafana_dashboard` resource type.
pub struct DashboardResource {
    client: Arc<GrafanaClient>,
}

impl DashboardResource {
    /// Create the adapter over a shared client.
    #[must_use]
    pub fn new(client: Arc<GrafanaClient>) -> Self {
        Self { client }
    }

    async fn save(
        &self,
        desired: DashboardState,
        overwrite: bool,
    ) -> Result<DashboardState, ProviderError> {
        let model: Value = serde_json::from_str(&desired.config_json)?;

        let response = self
            .client
            .new_dashboard(&Dashboard {
                meta: DashboardMeta::default(),
                model,
                folder: desired.folder,
                overwrite,
            })
            .await?;

        let mut state = desired;
        state.id = Some(response.slug);
        state.uid = response.uid;
        self.read_state(state).await
    }

    async fn read_state(
        &self,
        mut state: DashboardState,
    ) -> Result<DashboardState, ProviderError> {
        let slug = require_id(&state.id, "dashboard")?.to_string();

        let dashboard = match self.client.dashboard(&slug).await {
            Ok(dashboard) => dashboard,
            Err(err) if err.is_not_found() => {
                warn!(
                    slug,
                    "dashboard no longer exists in grafana, removing it from state"
                );
                state.id = None;
                return Ok(state);
            }
            Err(err) => return Err(err.into()),
        };

        if !dashboard.meta.slug.is_empty() {
            state.id = Some(dashboard.meta.slug.clone());
        }
        state.uid = dashboard.meta.uid.clone();
        state.folder = dashboard.folder;
        state.config_json = serde_json::to_string(&dashboard.model)?;
        Ok(state)
    }

    async fn update_state(
        &self,
        prior: DashboardState,
        desired: DashboardState,
    ) -> Result<DashboardState, ProviderError> {
        if desired.config_json != prior.config_json || desired.folder != prior.folder {
            // A title change moves the slug; save() picks the new one up
            // from the response.
            return self.save(desired, true).await;
        }

        Ok(DashboardState {
            id: prior.id,
            uid: prior.uid,
            ..desired
        })
    }
}

#[async_trait::async_trait]
impl ResourceAdapter for DashboardResource {
    fn type_name(&self) -> &'static str {
        "grafana_dashboard"
    }

    fn schema(&self) -> Schema {
        Schema::v0()
            .with_attribute("id", Attribute::computed_string())
            .with_attribute("uid", Attribute::computed_string())
            .with_attribute(
                "config_json",
                Attribute::required_string().with_description("Dashboard model as a JSON string"),
            )
            .with_attribute("folder", Attribute::optional_int64())
    }

    async fn create(&self, desired: Value) -> Result<Value, ProviderError> {
        let desired: DashboardState = serde_json::from_value(desired)?;
        let state = self.save(desired, false).await?;
        Ok(serde_json::to_value(state)?)
    }

    async fn read(&self, state: Value) -> Result<Value, ProviderError> {
        let state: DashboardState = serde_json::from_value(state)?;
        let state = self.read_state(state).await?;
        Ok(serde_json::to_value(state)?)
    }

    async fn update(&self, prior: Value, desired: Value) -> Result<Value, ProviderError> {
        let prior: DashboardState = serde_json::from_value(prior)?;
        let desired: DashboardState = serde_json::from_value(desired)?;
        let state = self.update_state(prior, desired).await?;
        Ok(serde_json::to_value(state)?)
    }

    async fn delete(&self, state: Value) -> Result<(), ProviderError> {
        let state: DashboardState = serde_json::from_value(state)?;
        let slug = require_id(&state.id, "dashboard")?;
        Ok(self.client.delete_dashboard(slug).await?)
    }

    async fn exists(&self, state: Value) -> Result<bool, ProviderError> {
        let state: DashboardState = serde_json::from_value(state)?;
        let slug = require_id(&state.id, "dashboard")?;
        match self.client.dashboard(slug).await {
            Ok(_) => Ok(true),
            Err(err) if err.is_not_found() => Ok(false),
            Err(err) => Err(err.into()),
        }
    }

    async fn import(&self, id: &str) -> Result<Value, ProviderError> {
        let state = DashboardState {
            id: Some(id.to_string()),
            ..DashboardState::default()
        };
        let state = self.read_state(state).await?;
        if state.id.is_none() {
            return Err(ProviderError::NotFound(format!(
                "no grafana dashboard with slug {id}"
            )));
        }
        Ok(serde_json::to_value(state)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_requires_config_json() {
        let result: Result<DashboardState, _> =
            serde_json::from_value(serde_json::json!({"folder": 3}));
        assert!(result.is_err());
    }

    #[test]
    fn state_round_trips() {
        let state = DashboardState {
            id: Some("requests".into()),
            uid: "abc123".into(),
            folder: 3,
            config_json: r#"{"title":"Requests"}"#.into(),
        };
        let value = serde_json::to_value(&state).unwrap();
        let back: DashboardState = serde_json::from_value(value).unwrap();
        assert_eq!(back, state);
    }
}
