//! Dashboard endpoints.
//!
//! Dashboards carry an opaque JSON model blob (`dashboard` in the wire
//! format) that this layer stores and ships without interpreting, except
//! for the uid/id derivation helpers at the bottom, which reach into the
//! blob by field name. Those two fields are not part of any typed
//! contract with the server; when they are missing the helpers fail with
//! [`ClientError::UnexpectedBody`].

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::GrafanaClient;
use crate::error::ClientError;

/// Search result `type` value for folders.
pub const SEARCH_TYPE_FOLDER: &str = "dash-folder";
/// Search result `type` value for dashboards.
pub const SEARCH_TYPE_DASHBOARD: &str = "dash-db";

/// Server-side metadata attached to a fetched dashboard.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DashboardMeta {
    /// Whether the calling user starred this dashboard.
    #[serde(default, rename = "isStarred")]
    pub is_starred: bool,
    /// URL-safe identifier derived from the title.
    #[serde(default)]
    pub slug: String,
    /// Stable external identifier.
    #[serde(default)]
    pub uid: String,
    /// Numeric id of the containing folder, 0 for the General folder.
    #[serde(default, rename = "folderId")]
    pub folder: i64,
}

/// Response to a dashboard create/overwrite.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardSaveResponse {
    /// Slug of the saved dashboard.
    pub slug: String,
    /// Numeric id of the saved dashboard.
    pub id: i64,
    /// Stable external identifier.
    pub uid: String,
    /// Save status, normally `success`.
    #[serde(default)]
    pub status: String,
    /// Version after the save.
    pub version: i64,
}

/// A dashboard: the opaque model blob plus placement and metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dashboard {
    /// Server metadata, empty on payloads we send.
    #[serde(default)]
    pub meta: DashboardMeta,
    /// The visual/panel definition. Not interpreted by this layer.
    #[serde(rename = "dashboard")]
    pub model: Value,
    /// Numeric id of the containing folder.
    #[serde(default, rename = "folderId")]
    pub folder: i64,
    /// Whether a save may overwrite an existing dashboard.
    #[serde(default)]
    pub overwrite: bool,
}

/// One row of a `GET /api/search` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResultItem {
    /// Numeric dashboard or folder id.
    #[serde(default)]
    pub id: i64,
    /// Stable external identifier.
    #[serde(default)]
    pub uid: String,
    /// Display title.
    #[serde(default)]
    pub title: String,
    /// Browser URL.
    #[serde(default)]
    pub url: String,
    /// Legacy URI, `db/<slug>` for dashboards.
    #[serde(default)]
    pub uri: String,
    /// Result kind, [`SEARCH_TYPE_FOLDER`] or [`SEARCH_TYPE_DASHBOARD`].
    #[serde(default, rename = "type")]
    pub kind: String,
}

impl SearchResultItem {
    /// Whether this row is a folder.
    #[must_use]
    pub fn is_folder(&self) -> bool {
        self.kind == SEARCH_TYPE_FOLDER
    }

    /// The dashboard slug, derived from the legacy URI. Empty for
    /// folders.
    #[must_use]
    pub fn slug(&self) -> String {
        if self.is_folder() {
            return String::new();
        }
        self.uri.replacen("db/", "", 1)
    }
}

/// One entry of a dashboard's version history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardVersionItem {
    /// Version entry id.
    pub id: i64,
    /// Version number.
    pub version: i64,
}

#[derive(Deserialize)]
struct DashboardVersionDetail {
    data: DashboardVersionData,
}

#[derive(Deserialize)]
struct DashboardVersionData {
    #[serde(default)]
    uid: String,
}

impl GrafanaClient {
    /// Create or overwrite a dashboard.
    pub async fn new_dashboard(
        &self,
        dashboard: &Dashboard,
    ) -> Result<DashboardSaveResponse, ClientError> {
        self.post_json("/api/dashboards/db", dashboard).await
    }

    /// Fetch a dashboard by slug.
    pub async fn dashboard(&self, slug: &str) -> Result<Dashboard, ClientError> {
        let dashboard: Dashboard = self.get_json(&format!("/api/dashboards/db/{slug}")).await?;
        normalize_fetched(dashboard)
    }

    /// Fetch a dashboard by uid.
    pub async fn dashboard_by_uid(&self, uid: &str) -> Result<Dashboard, ClientError> {
        let dashboard: Dashboard = self.get_json(&format!("/api/dashboards/uid/{uid}")).await?;
        normalize_fetched(dashboard)
    }

    /// Fetch the organization's home dashboard.
    pub async fn home_dashboard(&self) -> Result<Dashboard, ClientError> {
        let mut dashboard: Dashboard = self.get_json("/api/dashboards/home").await?;
        dashboard.folder = dashboard.meta.folder;
        Ok(dashboard)
    }

    /// Delete a dashboard by slug.
    pub async fn delete_dashboard(&self, slug: &str) -> Result<(), ClientError> {
        self.delete_unit(&format!("/api/dashboards/db/{slug}")).await
    }

    /// List the dashboards in a folder.
    pub async fn dashboards_by_folder(
        &self,
        folder_id: i64,
    ) -> Result<Vec<SearchResultItem>, ClientError> {
        self.get_json_with_query(
            "/api/search",
            &[
                ("folderIds", folder_id.to_string()),
                ("type", SEARCH_TYPE_DASHBOARD.to_string()),
            ],
        )
        .await
    }

    /// Fetch a dashboard's version history, newest first.
    pub async fn dashboard_versions(
        &self,
        id: i64,
    ) -> Result<Vec<DashboardVersionItem>, ClientError> {
        self.get_json(&format!("/api/dashboards/id/{id}/versions/"))
            .await
    }

    /// Derive a dashboard's uid from its numeric id.
    ///
    /// Two round trips: the latest version entry, then that version's
    /// detail, whose payload carries the uid.
    pub async fn dashboard_uid_by_id(&self, id: i64) -> Result<String, ClientError> {
        let versions = self.dashboard_versions(id).await?;
        let latest = versions.first().ok_or_else(|| {
            ClientError::UnexpectedBody(format!("dashboard {id} has no version history"))
        })?;

        let detail: DashboardVersionDetail = self
            .get_json(&format!(
                "/api/dashboards/id/{id}/versions/{}",
                latest.version
            ))
            .await?;
        Ok(detail.data.uid)
    }

    /// Derive a dashboard's numeric id from its uid, by reading the
    /// `id` field embedded in the model blob.
    pub async fn dashboard_id_by_uid(&self, uid: &str) -> Result<i64, ClientError> {
        let dashboard = self.dashboard_by_uid(uid).await?;
        dashboard
            .model
            .get("id")
            .and_then(Value::as_i64)
            .ok_or_else(|| {
                ClientError::UnexpectedBody(
                    "dashboard model has no numeric \"id\" field".to_string(),
                )
            })
    }
}

/// Post-fetch fixups: mirror the folder id out of the metadata and lift
/// the uid out of the model blob.
fn normalize_fetched(mut dashboard: Dashboard) -> Result<Dashboard, ClientError> {
    dashboard.folder = dashboard.meta.folder;
    let uid = dashboard
        .model
        .get("uid")
        .and_then(Value::as_str)
        .ok_or_else(|| {
            ClientError::UnexpectedBody("dashboard model has no string \"uid\" field".to_string())
        })?;
    dashboard.meta.uid = uid.to_string();
    Ok(dashboard)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn search_item_slug_strips_uri_prefix() {
        let item = SearchResultItem {
            id: 163,
            uid: "000000163".into(),
            title: "Requests".into(),
            url: "/d/000000163/requests".into(),
            uri: "db/requests".into(),
            kind: SEARCH_TYPE_DASHBOARD.into(),
        };
        assert!(!item.is_folder());
        assert_eq!(item.slug(), "requests");
    }

    #[test]
    fn search_item_slug_empty_for_folders() {
        let item = SearchResultItem {
            id: 7,
            uid: "f7".into(),
            title: "Platform".into(),
            url: String::new(),
            uri: "db/platform".into(),
            kind: SEARCH_TYPE_FOLDER.into(),
        };
        assert!(item.is_folder());
        assert_eq!(item.slug(), "");
    }

    #[test]
    fn normalize_lifts_uid_from_model() {
        let dashboard: Dashboard = serde_json::from_value(json!({
            "meta": {"slug": "requests", "folderId": 3},
            "dashboard": {"uid": "abc123", "id": 9, "title": "Requests"}
        }))
        .unwrap();
        let dashboard = normalize_fetched(dashboard).unwrap();
        assert_eq!(dashboard.meta.uid, "abc123");
        assert_eq!(dashboard.folder, 3);
    }

    #[test]
    fn normalize_fails_without_model_uid() {
        let dashboard: Dashboard = serde_json::from_value(json!({
            "meta": {"slug": "requests"},
            "dashboard": {"id": 9}
        }))
        .unwrap();
        let err = normalize_fetched(dashboard).unwrap_err();
        assert!(matches!(err, ClientError::UnexpectedBody(_)));
    }

    #[test]
    fn save_payload_uses_wire_names() {
        let dashboard = Dashboard {
            meta: DashboardMeta::default(),
            model: json!({"title": "Requests"}),
            folder: 3,
            overwrite: true,
        };
        let value = serde_json::to_value(&dashboard).unwrap();
        assert_eq!(value["dashboard"]["title"], "Requests");
        assert_eq!(value["folderId"], 3);
        assert_eq!(value["overwrite"], true);
    }
}
