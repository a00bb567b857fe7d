use thiserror::Error;

/// Errors the adapter cannot express as a semantic [`bcgw_core::Outcome`]:
/// the upstream was unreachable, timed out, or answered with a body that
/// does not match its own wire contract.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Network, TLS, or timeout failure from the underlying HTTP client.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },
}
