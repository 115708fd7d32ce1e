//! Folder permission endpoints.
//!
//! The permission API is declarative: `update_folder_permissions`
//! atomically replaces the folder's whole permission set server-side.
//! There is no incremental add/remove and no dedicated delete endpoint;
//! deleting means replacing with an empty set.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::GrafanaClient;
use crate::error::ClientError;

/// Access level granted by one permission entry.
///
/// The codes are Grafana's wire values; `Display` renders the numeric
/// code, which is also the string form used in declarative state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionLevel {
    /// Read-only access (code 1).
    Viewer,
    /// Edit access (code 2).
    Editor,
    /// Full control (code 4).
    Admin,
}

impl PermissionLevel {
    /// Parse a wire code. Anything other than 1, 2 or 4 is rejected.
    pub fn from_code(code: i64) -> Result<Self, ClientError> {
        match code {
            1 => Ok(Self::Viewer),
            2 => Ok(Self::Editor),
            4 => Ok(Self::Admin),
            other => Err(ClientError::InvalidPermissionLevel(other)),
        }
    }

    /// The wire code for this level.
    #[must_use]
    pub const fn code(self) -> i64 {
        match self {
            Self::Viewer => 1,
            Self::Editor => 2,
            Self::Admin => 4,
        }
    }
}

impl fmt::Display for PermissionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Who a permission entry applies to: exactly one of a built-in role, a
/// team, or a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Grantee {
    /// A built-in role name, e.g. `Viewer` or `Editor`.
    Role(String),
    /// A team id.
    Team(i64),
    /// A user id.
    User(i64),
}

/// One entry in a folder's permission list.
///
/// The grantee is a tagged union with exactly one variant set; the wire
/// format spreads it over three optional fields (`role`, `teamId`,
/// `userId`), and decoding takes the first non-empty one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawFolderPermission", into = "RawFolderPermission")]
pub struct FolderPermission {
    /// Who the permission applies to.
    pub grantee: Grantee,
    /// The granted access level.
    pub permission: PermissionLevel,
}

impl FolderPermission {
    /// Create an entry granting `permission` to `grantee`.
    #[must_use]
    pub fn new(grantee: Grantee, permission: PermissionLevel) -> Self {
        Self {
            grantee,
            permission,
        }
    }
}

/// Wire shape of a permission entry. Unset grantee fields are omitted on
/// write and come back as `""`/`0` on read.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct RawFolderPermission {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    role: String,
    #[serde(default, rename = "teamId", skip_serializing_if = "is_zero")]
    team_id: i64,
    #[serde(default, rename = "userId", skip_serializing_if = "is_zero")]
    user_id: i64,
    permission: i64,
}

fn is_zero(value: &i64) -> bool {
    *value == 0
}

impl TryFrom<RawFolderPermission> for FolderPermission {
    type Error = ClientError;

    fn try_from(raw: RawFolderPermission) -> Result<Self, Self::Error> {
        // First non-empty field wins, in the order role, team, user.
        let grantee = if !raw.role.is_empty() {
            Grantee::Role(raw.role)
        } else if raw.team_id != 0 {
            Grantee::Team(raw.team_id)
        } else if raw.user_id != 0 {
            Grantee::User(raw.user_id)
        } else {
            return Err(ClientError::UnexpectedBody(
                "permission entry names no role, team or user".to_string(),
            ));
        };

        Ok(Self {
            grantee,
            permission: PermissionLevel::from_code(raw.permission)?,
        })
    }
}

impl From<FolderPermission> for RawFolderPermission {
    fn from(entry: FolderPermission) -> Self {
        let mut raw = Self {
            permission: entry.permission.code(),
            ..Self::default()
        };
        match entry.grantee {
            Grantee::Role(role) => raw.role = role,
            Grantee::Team(id) => raw.team_id = id,
            Grantee::User(id) => raw.user_id = id,
        }
        raw
    }
}

#[derive(Serialize)]
struct UpdatePermissionsRequest<'a> {
    items: &'a [FolderPermission],
}

impl GrafanaClient {
    /// Fetch a folder's permission entries.
    pub async fn folder_permissions(
        &self,
        folder_id: &str,
    ) -> Result<Vec<FolderPermission>, ClientError> {
        self.get_json(&format!("/api/folders/{folder_id}/permissions"))
            .await
    }

    /// Replace a folder's whole permission set.
    pub async fn update_folder_permissions(
        &self,
        folder_id: &str,
        items: &[FolderPermission],
    ) -> Result<(), ClientError> {
        self.post_unit(
            &format!("/api/folders/{folder_id}/permissions"),
            &UpdatePermissionsRequest { items },
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn level_codes_round_trip() {
        for (code, level) in [
            (1, PermissionLevel::Viewer),
            (2, PermissionLevel::Editor),
            (4, PermissionLevel::Admin),
        ] {
            assert_eq!(PermissionLevel::from_code(code).unwrap(), level);
            assert_eq!(level.code(), code);
        }
    }

    #[test]
    fn level_rejects_unknown_codes() {
        for code in [0, 3, 5, -1] {
            assert!(PermissionLevel::from_code(code).is_err());
        }
    }

    #[test]
    fn level_displays_numeric_code() {
        assert_eq!(PermissionLevel::Viewer.to_string(), "1");
        assert_eq!(PermissionLevel::Admin.to_string(), "4");
    }

    #[test]
    fn role_entry_serializes_only_role() {
        let entry = FolderPermission::new(
            Grantee::Role("Viewer".to_string()),
            PermissionLevel::Viewer,
        );
        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value, json!({"role": "Viewer", "permission": 1}));
    }

    #[test]
    fn team_entry_serializes_wire_field() {
        let entry = FolderPermission::new(Grantee::Team(6), PermissionLevel::Editor);
        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value, json!({"teamId": 6, "permission": 2}));
    }

    #[test]
    fn read_entry_takes_first_non_empty_field() {
        // Server responses carry all three fields with zero values for
        // the unset ones.
        let entry: FolderPermission = serde_json::from_value(json!({
            "id": 1,
            "folderId": 42,
            "role": "Viewer",
            "teamId": 0,
            "userId": 0,
            "permission": 1
        }))
        .unwrap();
        assert_eq!(entry.grantee, Grantee::Role("Viewer".to_string()));
        assert_eq!(entry.permission, PermissionLevel::Viewer);

        let entry: FolderPermission = serde_json::from_value(json!({
            "role": "",
            "teamId": 0,
            "userId": 9,
            "permission": 4
        }))
        .unwrap();
        assert_eq!(entry.grantee, Grantee::User(9));
    }

    #[test]
    fn entry_without_grantee_fails_decode() {
        let result: Result<FolderPermission, _> =
            serde_json::from_value(json!({"role": "", "teamId": 0, "userId": 0, "permission": 1}));
        assert!(result.is_err());
    }

    #[test]
    fn entry_with_bad_level_fails_decode() {
        let result: Result<FolderPermission, _> =
            serde_json::from_value(json!({"role": "Viewer", "permission": 3}));
        assert!(result.is_err());
    }
}
