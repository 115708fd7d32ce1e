//! Error types for the Grafana client and the resource adapters.

use thiserror::Error;

/// Errors produced by the HTTP client layer.
///
/// Every Grafana call is a single round trip; there are no retries. A
/// non-2xx response is surfaced as [`ClientError::Http`] carrying the
/// status line exactly as the server reported it (`"404 Not Found"`),
/// which is what the adapters match on for existence probes.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The request never completed, or the response body could not be
    /// decoded into the expected shape.
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered with a non-2xx status. The payload is the
    /// status line, e.g. `404 Not Found`.
    #[error("{0}")]
    Http(String),

    /// The response decoded, but a field this client relies on was
    /// missing or had the wrong type. Mostly hit by the dashboard
    /// uid/id derivations, which read into the opaque model blob.
    #[error("unexpected response body: {0}")]
    UnexpectedBody(String),

    /// A permission level outside the codes Grafana accepts (1, 2, 4).
    #[error("invalid permission level: {0}")]
    InvalidPermissionLevel(i64),
}

impl ClientError {
    /// Whether this error is the exact `404 Not Found` status line.
    ///
    /// Read and exists translate precisely this error into "resource
    /// absent"; any other failure, including other 4xx statuses,
    /// propagates unchanged.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Http(status) if status == "404 Not Found")
    }
}

/// Errors surfaced by resource adapters to the calling framework.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// An underlying Grafana API call failed.
    #[error(transparent)]
    Client(#[from] ClientError),

    /// A declarative state value did not (de)serialize.
    #[error("state error: {0}")]
    State(#[from] serde_json::Error),

    /// The stored or supplied state is unusable, e.g. a missing or
    /// non-numeric identifier, or a permission item that does not name
    /// exactly one grantee.
    #[error("invalid resource state: {0}")]
    InvalidState(String),

    /// An import identifier did not resolve to a live resource.
    #[error("resource not found: {0}")]
    NotFound(String),

    /// The requested resource type is not part of this provider.
    #[error("unknown resource type: {0}")]
    UnknownResource(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_error_displays_status_line() {
        let err = ClientError::Http("404 Not Found".to_string());
        assert_eq!(format!("{}", err), "404 Not Found");

        let err = ClientError::Http("500 Internal Server Error".to_string());
        assert_eq!(format!("{}", err), "500 Internal Server Error");
    }

    #[test]
    fn test_is_not_found_matches_exact_status_line() {
        assert!(ClientError::Http("404 Not Found".to_string()).is_not_found());

        // Only the exact status line counts.
        assert!(!ClientError::Http("404 not found".to_string()).is_not_found());
        assert!(!ClientError::Http("Not Found".to_string()).is_not_found());
        assert!(!ClientError::Http("403 Forbidden".to_string()).is_not_found());
        assert!(!ClientError::UnexpectedBody("404 Not Found".to_string()).is_not_found());
    }

    #[test]
    fn test_provider_error_display() {
        let err = ProviderError::UnknownResource("grafana_widget".to_string());
        assert_eq!(format!("{}", err), "unknown resource type: grafana_widget");

        let err = ProviderError::InvalidState("team state has no id".to_string());
        assert_eq!(
            format!("{}", err),
            "invalid resource state: team state has no id"
        );
    }

    #[test]
    fn test_client_error_passes_through_provider_error() {
        let err = ProviderError::from(ClientError::Http("404 Not Found".to_string()));
        // transparent: the status line survives the wrapping
        assert_eq!(format!("{}", err), "404 Not Found");
    }

    #[test]
    fn test_invalid_permission_level_display() {
        let err = ClientError::InvalidPermissionLevel(3);
        assert_eq!(format!("{}", err), "invalid permission level: 3");
    }
}
