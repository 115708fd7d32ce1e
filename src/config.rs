//! Client configuration.
//!
//! The Grafana endpoint and credentials are carried in an explicit
//! [`GrafanaConfig`] value handed to [`GrafanaClient::new`]; nothing in
//! this crate reads ambient process state. The configuration is read-only
//! after construction.
//!
//! [`GrafanaClient::new`]: crate::client::GrafanaClient::new

/// Credentials for the Grafana HTTP API.
#[derive(Debug, Clone)]
pub enum Auth {
    /// An API key, sent as a bearer token.
    Token(String),
    /// Basic authentication with username and password.
    Basic {
        /// Account name.
        username: String,
        /// Account password.
        password: String,
    },
}

/// Configuration for talking to one Grafana instance.
#[derive(Debug, Clone)]
pub struct GrafanaConfig {
    /// Base URL of the instance, e.g. `http://grafana.example.com:3000`.
    pub base_url: String,
    /// Credentials used on every request.
    pub auth: Auth,
}

impl GrafanaConfig {
    /// Create a configuration from a base URL and credentials.
    pub fn new(base_url: impl Into<String>, auth: Auth) -> Self {
        Self {
            base_url: base_url.into(),
            auth,
        }
    }

    /// Create a configuration authenticating with an API key.
    pub fn with_token(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self::new(base_url, Auth::Token(token.into()))
    }

    /// Create a configuration authenticating with username and password.
    pub fn with_basic_auth(
        base_url: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self::new(
            base_url,
            Auth::Basic {
                username: username.into(),
                password: password.into(),
            },
        )
    }

    /// Join an API path onto the base URL.
    ///
    /// A trailing slash on the base URL is tolerated; `path` must start
    /// with `/`.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_joins_path() {
        let config = GrafanaConfig::with_token("http://localhost:3000", "key");
        assert_eq!(
            config.url("/api/teams/4"),
            "http://localhost:3000/api/teams/4"
        );
    }

    #[test]
    fn url_trims_trailing_slash() {
        let config = GrafanaConfig::with_token("http://localhost:3000/", "key");
        assert_eq!(config.url("/api/teams"), "http://localhost:3000/api/teams");
    }

    #[test]
    fn basic_auth_config() {
        let config = GrafanaConfig::with_basic_auth("http://grafana", "admin", "secret");
        match config.auth {
            Auth::Basic { username, password } => {
                assert_eq!(username, "admin");
                assert_eq!(password, "secret");
            }
            Auth::Token(_) => panic!("expected basic auth"),
        }
    }
}
