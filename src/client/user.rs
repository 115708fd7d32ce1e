//! User endpoints.
//!
//! Creation and deletion go through the admin API; reads and profile
//! updates use the regular user endpoints.

use serde::{Deserialize, Serialize};

use super::GrafanaClient;
use crate::error::ClientError;

/// A Grafana user as returned by `GET /api/users/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Server-assigned identifier, immutable after creation.
    pub id: i64,
    /// Unique login name.
    pub login: String,
    /// Display name, empty unless set.
    #[serde(default)]
    pub name: String,
    /// Email address, empty unless set.
    #[serde(default)]
    pub email: String,
}

/// Payload for `POST /api/admin/users`. The password is write-only: the
/// server never returns it.
#[derive(Debug, Clone, Serialize)]
pub struct NewUser {
    /// Unique login name.
    pub login: String,
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: String,
    /// Initial password.
    pub password: String,
}

/// Partial profile update for `PUT /api/users/{id}`.
#[derive(Debug, Clone, Serialize)]
pub struct UserUpdate {
    /// New login name.
    pub login: String,
    /// New display name.
    pub name: String,
    /// New email address.
    pub email: String,
}

#[derive(Deserialize)]
struct CreateUserResponse {
    id: i64,
}

impl GrafanaClient {
    /// Create a user, returning the server-assigned id.
    pub async fn create_user(&self, user: &NewUser) -> Result<i64, ClientError> {
        let response: CreateUserResponse = self.post_json("/api/admin/users", user).await?;
        Ok(response.id)
    }

    /// Fetch a user by id.
    pub async fn user(&self, id: i64) -> Result<User, ClientError> {
        self.get_json(&format!("/api/users/{id}")).await
    }

    /// Update a user's profile fields.
    pub async fn update_user(&self, id: i64, update: &UserUpdate) -> Result<(), ClientError> {
        self.put_unit(&format!("/api/users/{id}"), update).await
    }

    /// Delete a user. Folder permission entries referencing the user are
    /// left untouched.
    pub async fn delete_user(&self, id: i64) -> Result<(), ClientError> {
        self.delete_unit(&format!("/api/admin/users/{id}")).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_decodes_with_defaults() {
        let user: User = serde_json::from_str(r#"{"id": 8, "login": "alice"}"#).unwrap();
        assert_eq!(user.id, 8);
        assert_eq!(user.login, "alice");
        assert_eq!(user.name, "");
        assert_eq!(user.email, "");
    }

    #[test]
    fn new_user_serializes_password() {
        let body = serde_json::to_value(NewUser {
            login: "alice".into(),
            name: "Alice".into(),
            email: "alice@example.com".into(),
            password: "hunter2hun".into(),
        })
        .unwrap();
        assert_eq!(body["password"], "hunter2hun");
    }
}
