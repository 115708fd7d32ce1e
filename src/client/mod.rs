//! Typed client for the Grafana HTTP API.
//!
//! [`GrafanaClient`] wraps one `reqwest::Client` plus a [`GrafanaConfig`]
//! and maps each Grafana REST endpoint to a typed method. Every method is
//! a single synchronous-in-spirit round trip: build one authenticated
//! request, execute it, decode the JSON body. There are no retries, no
//! pagination, and no caching; concurrent writes against the same entity
//! are left to the server to serialize.
//!
//! Endpoint methods are grouped per entity in the submodules of this
//! directory; they all funnel through one shared request path.

mod dashboard;
mod folder_permission;
mod team;
mod user;

pub use dashboard::{
    Dashboard, DashboardMeta, DashboardSaveResponse, DashboardVersionItem, SearchResultItem,
    SEARCH_TYPE_DASHBOARD, SEARCH_TYPE_FOLDER,
};
pub use folder_permission::{FolderPermission, Grantee, PermissionLevel};
pub use team::{Team, TeamMember};
pub use user::{NewUser, User, UserUpdate};

use std::time::Duration;

use reqwest::{Method, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::config::{Auth, GrafanaConfig};
use crate::error::ClientError;

/// Client for one Grafana instance.
///
/// Cheap to clone; the underlying connection pool is shared. The
/// configuration is read-only after construction.
#[derive(Debug, Clone)]
pub struct GrafanaClient {
    http: reqwest::Client,
    config: GrafanaConfig,
}

impl GrafanaClient {
    /// Create a client with the transport defaults (30s request timeout).
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(config: GrafanaConfig) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self { http, config })
    }

    /// Create a client around a caller-supplied `reqwest::Client`.
    #[must_use]
    pub fn with_http_client(http: reqwest::Client, config: GrafanaConfig) -> Self {
        Self { http, config }
    }

    /// The configuration this client was built with.
    #[must_use]
    pub fn config(&self) -> &GrafanaConfig {
        &self.config
    }

    /// Execute one authenticated request and surface any non-2xx status
    /// as [`ClientError::Http`] carrying the status line.
    pub(crate) async fn send<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<&B>,
    ) -> Result<Response, ClientError> {
        let url = self.config.url(path);

        let mut request = self.http.request(method.clone(), &url);
        request = match &self.config.auth {
            Auth::Token(token) => request.bearer_auth(token),
            Auth::Basic { username, password } => request.basic_auth(username, Some(password)),
        };
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        debug!(%method, %url, %status, "grafana api round trip");

        if !status.is_success() {
            // The status line ("404 Not Found") is the error message;
            // existence probes match on it verbatim.
            return Err(ClientError::Http(status.to_string()));
        }

        Ok(response)
    }

    pub(crate) async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let response = self.send::<()>(Method::GET, path, &[], None).await?;
        Ok(response.json().await?)
    }

    pub(crate) async fn get_json_with_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ClientError> {
        let response = self.send::<()>(Method::GET, path, query, None).await?;
        Ok(response.json().await?)
    }

    pub(crate) async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ClientError> {
        let response = self.send(Method::POST, path, &[], Some(body)).await?;
        Ok(response.json().await?)
    }

    /// POST where the response body is only an acknowledgement.
    pub(crate) async fn post_unit<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<(), ClientError> {
        self.send(Method::POST, path, &[], Some(body)).await?;
        Ok(())
    }

    /// PUT where the response body is only an acknowledgement.
    pub(crate) async fn put_unit<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<(), ClientError> {
        self.send(Method::PUT, path, &[], Some(body)).await?;
        Ok(())
    }

    pub(crate) async fn delete_unit(&self, path: &str) -> Result<(), ClientError> {
        self.send::<()>(Method::DELETE, path, &[], None).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_keeps_config() {
        let client = GrafanaClient::new(GrafanaConfig::with_token(
            "http://localhost:3000",
            "api-key",
        ))
        .unwrap();
        assert_eq!(client.config().base_url, "http://localhost:3000");
    }
}
