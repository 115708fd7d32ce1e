//! The `grafana_team` resource.

use std::collections::BTreeSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use super::{require_numeric_id, ResourceAdapter};
use crate::client::GrafanaClient;
use crate::error::ProviderError;
use crate::schema::{Attribute, AttributeFlags, AttributeType, Schema};

/// Declarative state of a team: a name plus a set of member user ids.
/// Membership is flat, with no per-member roles.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TeamState {
    /// Server-assigned team id, absent until created.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Unique display name.
    pub name: String,
    /// User ids of the members.
    #[serde(default)]
    pub members: BTreeSet<i64>,
}

/// Adapter for the `grafana_team` resource type.
pub struct TeamResource {
    client: Arc<GrafanaClient>,
}

impl TeamResource {
    /// Create the adapter over a shared client.
    #[must_use]
    pub fn new(client: Arc<GrafanaClient>) -> Self {
        Self { client }
    }

    async fn create_state(&self, desired: TeamState) -> Result<TeamState, ProviderError> {
        let id = self.client.create_team(&desired.name).await?;

        let mut state = desired;
        state.id = Some(id.to_string());

        // One add call per member, no batching. A failure part-way
        // through leaves the team created with partial membership and
        // surfaces the add error; there is no rollback.
        for &user_id in &state.members {
            self.client.add_team_member(id, user_id).await?;
        }

        self.read_state(state).await
    }

    async fn read_state(&self, mut state: TeamState) -> Result<TeamState, ProviderError> {
        let id = require_numeric_id(&state.id, "team")?;

        let team = match self.client.team(id).await {
            Ok(team) => team,
            Err(err) if err.is_not_found() => {
                warn!(id, "team no longer exists in grafana, removing it from state");
                state.id = None;
                return Ok(state);
            }
            Err(err) => return Err(err.into()),
        };

        state.id = Some(team.id.to_string());
        state.name = team.name;
        state.members = self.current_members(id).await?;
        Ok(state)
    }

    async fn update_state(
        &self,
        prior: TeamState,
        desired: TeamState,
    ) -> Result<TeamState, ProviderError> {
        let id = require_numeric_id(&prior.id, "team")?;

        if desired.name != prior.name {
            self.client.update_team(id, &desired.name).await?;
        }

        if desired.members != prior.members {
            let current = self.current_members(id).await?;
            let (additions, removals) = member_diff(&current, &desired.members);
            for user_id in additions {
                self.client.add_team_member(id, user_id).await?;
            }
            for user_id in removals {
                self.client.remove_team_member(id, user_id).await?;
            }
        }

        Ok(TeamState {
            id: prior.id,
            ..desired
        })
    }

    async fn current_members(&self, id: i64) -> Result<BTreeSet<i64>, ProviderError> {
        let members = self.client.team_members(id).await?;
        Ok(members.into_iter().map(|m| m.user_id).collect())
    }
}

/// Member ids to add (desired minus current) and remove (current minus
/// desired). Ids in both sets are untouched.
fn member_diff(current: &BTreeSet<i64>, desired: &BTreeSet<i64>) -> (Vec<i64>, Vec<i64>) {
    let additions = desired.difference(current).copied().collect();
    let removals = current.difference(desired).copied().collect();
    (additions, removals)
}

#[async_trait::async_trait]
impl ResourceAdapter for TeamResource {
    fn type_name(&self) -> &'static str {
        "grafana_team"
    }

    fn schema(&self) -> Schema {
        Schema::v0()
            .with_attribute("id", Attribute::computed_string())
            .with_attribute("name", Attribute::required_string())
            .with_attribute(
                "members",
                Attribute::new(
                    AttributeType::set(AttributeType::Int64),
                    AttributeFlags::optional(),
                )
                .with_description("User ids of the team members"),
            )
    }

    async fn create(&self, desired: Value) -> Result<Value, ProviderError> {
        let desired: TeamState = serde_json::from_value(desired)?;
        let state = self.create_state(desired).await?;
        Ok(serde_json::to_value(state)?)
    }

    async fn read(&self, state: Value) -> Result<Value, ProviderError> {
        let state: TeamState = serde_json::from_value(state)?;
        let state = self.read_state(state).await?;
        Ok(serde_json::to_value(state)?)
    }

    async fn update(&self, prior: Value, desired: Value) -> Result<Value, ProviderError> {
        let prior: TeamState = serde_json::from_value(prior)?;
        let desired: TeamState = serde_json::from_value(desired)?;
        let state = self.update_state(prior, desired).await?;
        Ok(serde_json::to_value(state)?)
    }

    async fn delete(&self, state: Value) -> Result<(), ProviderError> {
        let state: TeamState = serde_json::from_value(state)?;
        let id = require_numeric_id(&state.id, "team")?;
        Ok(self.client.delete_team(id).await?)
    }

    async fn exists(&self, state: Value) -> Result<bool, ProviderError> {
        let state: TeamState = serde_json::from_value(state)?;
        let id = require_numeric_id(&state.id, "team")?;
        match self.client.team(id).await {
            Ok(_) => Ok(true),
            Err(err) if err.is_not_found() => Ok(false),
            Err(err) => Err(err.into()),
        }
    }

    async fn import(&self, id: &str) -> Result<Value, ProviderError> {
        let state = TeamState {
            id: Some(id.to_string()),
            ..TeamState::default()
        };
        let state = self.read_state(state).await?;
        if state.id.is_none() {
            return Err(ProviderError::NotFound(format!(
                "no grafana team with id {id}"
            )));
        }
        Ok(serde_json::to_value(state)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(ids: &[i64]) -> BTreeSet<i64> {
        ids.iter().copied().collect()
    }

    #[test]
    fn diff_adds_and_removes_only_changed_members() {
        let (additions, removals) = member_diff(&set(&[1, 2, 3]), &set(&[2, 3, 4]));
        assert_eq!(additions, vec![4]);
        assert_eq!(removals, vec![1]);
    }

    #[test]
    fn diff_of_equal_sets_is_empty() {
        let (additions, removals) = member_diff(&set(&[1, 2]), &set(&[1, 2]));
        assert!(additions.is_empty());
        assert!(removals.is_empty());
    }

    #[test]
    fn diff_from_empty_adds_everything() {
        let (additions, removals) = member_diff(&set(&[]), &set(&[5, 6]));
        assert_eq!(additions, vec![5, 6]);
        assert!(removals.is_empty());
    }

    #[test]
    fn state_omits_absent_id() {
        let state = TeamState {
            id: None,
            name: "backend".into(),
            members: set(&[1]),
        };
        let value = serde_json::to_value(&state).unwrap();
        assert!(value.get("id").is_none());

        let back: TeamState = serde_json::from_value(value).unwrap();
        assert_eq!(back, state);
    }
}
