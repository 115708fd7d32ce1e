//! The `grafana_folder_permission` resource.
//!
//! The underlying API is replace-based: every write atomically overwrites
//! the folder's whole permission set. Create and update are therefore the
//! same operation, and delete is a replace with an empty set.
//!
//! Deleting a team or user referenced by an entry does NOT clean the
//! entry up; stale references stay in the folder's permission list until
//! the next replace.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use super::{require_id, ResourceAdapter};
use crate::client::{FolderPermission, GrafanaClient, Grantee, PermissionLevel};
use crate::error::ProviderError;
use crate::schema::{Attribute, AttributeFlags, AttributeType, Schema};

/// One declarative permission item: exactly one of `role`, `team_id`,
/// `user_id`, plus a permission level code. All values are strings, the
/// shape the calling framework hands over.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PermissionItem {
    /// Built-in role name, e.g. `Viewer`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// Team id, as a decimal string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team_id: Option<String>,
    /// User id, as a decimal string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    /// Permission level code (`1`, `2` or `4`), as a string.
    pub permission: String,
}

impl PermissionItem {
    /// Validate the item into a wire entry.
    ///
    /// Exactly one of the grantee fields must be set.
    pub fn to_entry(&self) -> Result<FolderPermission, ProviderError> {
        let grantee = match (&self.role, &self.team_id, &self.user_id) {
            (Some(role), None, None) => Grantee::Role(role.clone()),
            (None, Some(team_id), None) => Grantee::Team(parse_numeric(team_id, "team_id")?),
            (None, None, Some(user_id)) => Grantee::User(parse_numeric(user_id, "user_id")?),
            _ => {
                return Err(ProviderError::InvalidState(
                    "permission item must set exactly one of role, team_id, user_id".to_string(),
                ))
            }
        };

        let code = parse_numeric(&self.permission, "permission")?;
        let permission = PermissionLevel::from_code(code).map_err(ProviderError::Client)?;
        Ok(FolderPermission::new(grantee, permission))
    }

    /// Fold a wire entry back into the declarative shape.
    #[must_use]
    pub fn from_entry(entry: &FolderPermission) -> Self {
        let mut item = Self {
            permission: entry.permission.to_string(),
            ..Self::default()
        };
        match &entry.grantee {
            Grantee::Role(role) => item.role = Some(role.clone()),
            Grantee::Team(id) => item.team_id = Some(id.to_string()),
            Grantee::User(id) => item.user_id = Some(id.to_string()),
        }
        item
    }
}

fn parse_numeric(raw: &str, field: &str) -> Result<i64, ProviderError> {
    raw.parse()
        .map_err(|_| ProviderError::InvalidState(format!("{field} {raw:?} is not numeric")))
}

/// Declarative state of a folder's permission list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FolderPermissionState {
    /// The folder id doubles as the stored identifier once created.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Id of the folder whose permissions are managed.
    pub folder_id: String,
    /// The full permission list, in order.
    #[serde(default)]
    pub items: Vec<PermissionItem>,
}

/// Adapter for the `grafana_folder_permission` resource type.
pub struct FolderPermissionResource {
    client: Arc<GrafanaClient>,
}

impl FolderPermissionResource {
    /// Create the adapter over a shared client.
    #[must_use]
    pub fn new(client: Arc<GrafanaClient>) -> Self {
        Self { client }
    }

    async fn create_state(
        &self,
        desired: FolderPermissionState,
    ) -> Result<FolderPermissionState, ProviderError> {
        let entries = desired
            .items
            .iter()
            .map(PermissionItem::to_entry)
            .collect::<Result<Vec<_>, _>>()?;

        self.client
            .update_folder_permissions(&desired.folder_id, &entries)
            .await?;

        let mut state = desired;
        state.id = Some(state.folder_id.clone());
        Ok(state)
    }

    async fn read_state(
        &self,
        mut state: FolderPermissionState,
    ) -> Result<FolderPermissionState, ProviderError> {
        let folder_id = require_id(&state.id, "folder permission")?.to_string();

        let entries = match self.client.folder_permissions(&folder_id).await {
            Ok(entries) => entries,
            Err(err) if err.is_not_found() => {
                warn!(
                    folder_id,
                    "folder no longer exists in grafana, removing its permissions from state"
                );
                state.id = None;
                return Ok(state);
            }
            Err(err) => return Err(err.into()),
        };

        state.items = entries.iter().map(PermissionItem::from_entry).collect();
        state.folder_id = folder_id;
        Ok(state)
    }
}

#[async_trait::async_trait]
impl ResourceAdapter for FolderPermissionResource {
    fn type_name(&self) -> &'static str {
        "grafana_folder_permission"
    }

    fn schema(&self) -> Schema {
        Schema::v0()
            .with_attribute("folder_id", Attribute::required_string())
            .with_attribute(
                "items",
                Attribute::new(
                    AttributeType::list(AttributeType::map(AttributeType::String)),
                    AttributeFlags::required(),
                )
                .with_description(
                    "Permission entries; each sets one of role, team_id, user_id plus a level",
                ),
            )
    }

    async fn create(&self, desired: Value) -> Result<Value, ProviderError> {
        let desired: FolderPermissionState = serde_json::from_value(desired)?;
        let state = self.create_state(desired).await?;
        Ok(serde_json::to_value(state)?)
    }

    async fn read(&self, state: Value) -> Result<Value, ProviderError> {
        let state: FolderPermissionState = serde_json::from_value(state)?;
        let state = self.read_state(state).await?;
        Ok(serde_json::to_value(state)?)
    }

    async fn update(&self, prior: Value, desired: Value) -> Result<Value, ProviderError> {
        let prior: FolderPermissionState = serde_json::from_value(prior)?;
        let desired: FolderPermissionState = serde_json::from_value(desired)?;

        // The API has no incremental form; any item change is a full
        // replace, i.e. the create path again.
        if desired.items != prior.items {
            let state = self.create_state(desired).await?;
            return Ok(serde_json::to_value(state)?);
        }

        let state = FolderPermissionState {
            id: prior.id,
            ..desired
        };
        Ok(serde_json::to_value(state)?)
    }

    async fn delete(&self, state: Value) -> Result<(), ProviderError> {
        let state: FolderPermissionState = serde_json::from_value(state)?;
        let folder_id = require_id(&state.id, "folder permission")?;

        // No delete endpoint exists; clearing means replacing the
        // permission set with nothing.
        Ok(self
            .client
            .update_folder_permissions(folder_id, &[])
            .await?)
    }

    async fn exists(&self, state: Value) -> Result<bool, ProviderError> {
        let state: FolderPermissionState = serde_json::from_value(state)?;
        let folder_id = require_id(&state.id, "folder permission")?;
        match self.client.folder_permissions(folder_id).await {
            Ok(_) => Ok(true),
            Err(err) if err.is_not_found() => Ok(false),
            Err(err) => Err(err.into()),
        }
    }

    async fn import(&self, id: &str) -> Result<Value, ProviderError> {
        let state = FolderPermissionState {
            id: Some(id.to_string()),
            folder_id: id.to_string(),
            items: Vec::new(),
        };
        let state = self.read_state(state).await?;
        if state.id.is_none() {
            return Err(ProviderError::NotFound(format!(
                "no grafana folder with id {id}"
            )));
        }
        Ok(serde_json::to_value(state)?)
    }
}
