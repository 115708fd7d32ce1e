//! Team endpoints.

use serde::{Deserialize, Serialize};

use super::GrafanaClient;
use crate::error::ClientError;

/// A Grafana team as returned by `GET /api/teams/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Team {
    /// Server-assigned identifier, immutable after creation.
    pub id: i64,
    /// Unique display name.
    pub name: String,
    /// Contact address, empty unless set.
    #[serde(default)]
    pub email: String,
}

/// One membership entry from `GET /api/teams/{id}/members`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamMember {
    /// The member's user id.
    #[serde(rename = "userId")]
    pub user_id: i64,
    /// Login of the member, empty unless the server includes it.
    #[serde(default)]
    pub login: String,
    /// Email of the member, empty unless the server includes it.
    #[serde(default)]
    pub email: String,
}

#[derive(Serialize)]
struct CreateTeamRequest<'a> {
    name: &'a str,
}

#[derive(Deserialize)]
struct CreateTeamResponse {
    #[serde(rename = "teamId")]
    team_id: i64,
}

#[derive(Serialize)]
struct AddTeamMemberRequest {
    #[serde(rename = "userId")]
    user_id: i64,
}

impl GrafanaClient {
    /// Create a team, returning its server-assigned id.
    pub async fn create_team(&self, name: &str) -> Result<i64, ClientError> {
        let response: CreateTeamResponse = self
            .post_json("/api/teams", &CreateTeamRequest { name })
            .await?;
        Ok(response.team_id)
    }

    /// Fetch a team by id.
    pub async fn team(&self, id: i64) -> Result<Team, ClientError> {
        self.get_json(&format!("/api/teams/{id}")).await
    }

    /// Rename a team.
    pub async fn update_team(&self, id: i64, name: &str) -> Result<(), ClientError> {
        self.put_unit(&format!("/api/teams/{id}"), &CreateTeamRequest { name })
            .await
    }

    /// Delete a team. Folder permission entries referencing it are left
    /// untouched.
    pub async fn delete_team(&self, id: i64) -> Result<(), ClientError> {
        self.delete_unit(&format!("/api/teams/{id}")).await
    }

    /// List a team's members.
    pub async fn team_members(&self, id: i64) -> Result<Vec<TeamMember>, ClientError> {
        self.get_json(&format!("/api/teams/{id}/members")).await
    }

    /// Add one user to a team.
    pub async fn add_team_member(&self, id: i64, user_id: i64) -> Result<(), ClientError> {
        self.post_unit(
            &format!("/api/teams/{id}/members"),
            &AddTeamMemberRequest { user_id },
        )
        .await
    }

    /// Remove one user from a team.
    pub async fn remove_team_member(&self, id: i64, user_id: i64) -> Result<(), ClientError> {
        self.delete_unit(&format!("/api/teams/{id}/members/{user_id}"))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn team_decodes_with_missing_email() {
        let team: Team = serde_json::from_str(r#"{"id": 4, "name": "backend"}"#).unwrap();
        assert_eq!(team.id, 4);
        assert_eq!(team.name, "backend");
        assert_eq!(team.email, "");
    }

    #[test]
    fn member_request_uses_wire_field_name() {
        let body = serde_json::to_value(AddTeamMemberRequest { user_id: 12 }).unwrap();
        assert_eq!(body, serde_json::json!({"userId": 12}));
    }

    #[test]
    fn team_member_decodes_from_wire_shape() {
        let member: TeamMember =
            serde_json::from_str(r#"{"orgId":1,"teamId":4,"userId":9,"login":"alice"}"#).unwrap();
        assert_eq!(member.user_id, 9);
        assert_eq!(member.login, "alice");
    }
}
