//! The `grafana_user` resource.

use std::sync::Arc;

use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use super::{require_numeric_id, ResourceAdapter};
use crate::client::{GrafanaClient, NewUser, UserUpdate};
use crate::error::ProviderError;
use crate::schema::{Attribute, AttributeFlags, AttributeType, Schema};

const PASSWORD_LENGTH: usize = 10;
const PASSWORD_ALPHABET: &[u8] =
    b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

/// Declarative state of a user account.
///
/// The password is write-only: it is sent on create and never read back.
/// When no password is supplied, a random one is generated so the
/// account is never created without credentials.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserState {
    /// Server-assigned user id, absent until created.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Unique login name.
    pub login: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Email address.
    #[serde(default)]
    pub email: String,
    /// Initial password. Write-only; generated when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

/// Adapter for the `grafana_user` resource type.
pub struct UserResource {
    client: Arc<GrafanaClient>,
}

impl UserResource {
    /// Create the adapter over a shared client.
    #[must_use]
    pub fn new(client: Arc<GrafanaClient>) -> Self {
        Self { client }
    }

    async fn create_state(&self, desired: UserState) -> Result<UserState, ProviderError> {
        let password = desired
            .password
            .clone()
            .unwrap_or_else(|| random_string(PASSWORD_LENGTH));

        let id = self
            .client
            .create_user(&NewUser {
                login: desired.login.clone(),
                name: desired.name.clone(),
                email: desired.email.clone(),
                password,
            })
            .await?;

        let mut state = desired;
        state.id = Some(id.to_string());
        self.read_state(state).await
    }

    async fn read_state(&self, mut state: UserState) -> Result<UserState, ProviderError> {
        let id = require_numeric_id(&state.id, "user")?;

        let user = match self.client.user(id).await {
            Ok(user) => user,
            Err(err) if err.is_not_found() => {
                warn!(id, "user no longer exists in grafana, removing it from state");
                state.id = None;
                return Ok(state);
            }
            Err(err) => return Err(err.into()),
        };

        state.id = Some(user.id.to_string());
        state.login = user.login;
        state.name = user.name;
        state.email = user.email;
        Ok(state)
    }

    async fn update_state(
        &self,
        prior: UserState,
        desired: UserState,
    ) -> Result<UserState, ProviderError> {
        let id = require_numeric_id(&prior.id, "user")?;

        if desired.login != prior.login
            || desired.name != prior.name
            || desired.email != prior.email
        {
            self.client
                .update_user(
                    id,
                    &UserUpdate {
                        login: desired.login.clone(),
                        name: desired.name.clone(),
                        email: desired.email.clone(),
                    },
                )
                .await?;
        }

        Ok(UserState {
            id: prior.id,
            ..desired
        })
    }
}

/// A random string of `len` characters drawn from the alphanumeric
/// alphabet.
fn random_string(len: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..len)
        .map(|_| PASSWORD_ALPHABET[rng.gen_range(0..PASSWORD_ALPHABET.len())] as char)
        .collect()
}

#[async_trait::async_trait]
impl ResourceAdapter for UserResource {
    fn type_name(&self) -> &'static str {
        "grafana_user"
    }

    fn schema(&self) -> Schema {
        Schema::v0()
            .with_attribute("id", Attribute::computed_string())
            .with_attribute("login", Attribute::required_string())
            .with_attribute("name", Attribute::optional_string())
            .with_attribute("email", Attribute::optional_string())
            .with_attribute(
                "password",
                Attribute::new(AttributeType::String, AttributeFlags::optional().sensitive())
                    .with_description("Initial password; generated when absent"),
            )
    }

    async fn create(&self, desired: Value) -> Result<Value, ProviderError> {
        let desired: UserState = serde_json::from_value(desired)?;
        let state = self.create_state(desired).await?;
        Ok(serde_json::to_value(state)?)
    }

    async fn read(&self, state: Value) -> Result<Value, ProviderError> {
        let state: UserState = serde_json::from_value(state)?;
        let state = self.read_state(state).await?;
        Ok(serde_json::to_value(state)?)
    }

    async fn update(&self, prior: Value, desired: Value) -> Result<Value, ProviderError> {
        let prior: UserState = serde_json::from_value(prior)?;
        let desired: UserState = serde_json::from_value(desired)?;
        let state = self.update_state(prior, desired).await?;
        Ok(serde_json::to_value(state)?)
    }

    async fn delete(&self, state: Value) -> Result<(), ProviderError> {
        let state: UserState = serde_json::from_value(state)?;
        let id = require_numeric_id(&state.id, "user")?;
        Ok(self.client.delete_user(id).await?)
    }

    async fn exists(&self, state: Value) -> Result<bool, ProviderError> {
        let state: UserState = serde_json::from_value(state)?;
        let id = require_numeric_id(&state.id, "user")?;
        match self.client.user(id).await {
            Ok(_) => Ok(true),
            Err(err) if err.is_not_found() => Ok(false),
            Err(err) => Err(err.into()),
        }
    }

    async fn import(&self, id: &str) -> Result<Value, ProviderError> {
        let state = UserState {
            id: Some(id.to_string()),
            ..UserState::default()
        };
        let state = self.read_state(state).await?;
        if state.id.is_none() {
            return Err(ProviderError::NotFound(format!(
                "no grafana user with id {id}"
            )));
        }
        Ok(serde_json::to_value(state)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_password_has_length_ten() {
        assert_eq!(random_string(PASSWORD_LENGTH).chars().count(), 10);
    }

    #[test]
    fn generated_password_stays_in_alphabet() {
        for _ in 0..50 {
            let password = random_string(PASSWORD_LENGTH);
            assert!(password
                .bytes()
                .all(|b| PASSWORD_ALPHABET.contains(&b)), "bad password {password:?}");
        }
    }

    #[test]
    fn state_never_serializes_absent_password() {
        let state = UserState {
            id: Some("3".into()),
            login: "alice".into(),
            ..UserState::default()
        };
        let value = serde_json::to_value(&state).unwrap();
        assert!(value.get("password").is_none());
    }
}
