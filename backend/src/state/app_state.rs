// Shared application state
// Holds the pooled HTTP client and the injected upstream base URL

/// Shared, immutable application state
///
/// One instance is built in `main` from the loaded configuration and shared
/// across handlers via `Arc`. The proxy is stateless per call; the only
/// shared resource is the connection-pooled `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Pooled HTTP client for outbound requests
    pub client: reqwest::Client,
    /// Base URL of the upstream chat service
    pub upstream_base: String,
}

impl AppState {
    /// Create application state for the given upstream base URL
    pub fn new(upstream_base: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            upstream_base,
        }
    }
}
