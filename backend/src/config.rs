//! Application configuration
//!
//! Centralized configuration management with environment variable support
//! and sensible defaults. Configuration is loaded once at startup and
//! injected through shared state; handlers never read the environment.

use std::env;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Server configuration
    pub server: ServerConfig,
    /// Upstream chat service configuration
    pub upstream: UpstreamConfig,
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Port to bind the server to
    pub port: u16,
    /// Host address to bind to
    pub host: String,
}

/// Upstream chat service configuration
#[derive(Debug, Clone)]
pub struct UpstreamConfig {
    /// Base URL of the upstream chat service (no trailing `/chat`)
    pub base_url: String,
}

/// Default upstream address when no environment variable is set
pub const DEFAULT_UPSTREAM_URL: &str = "http://localhost:8000";

impl Config {
    /// Load configuration from environment variables with defaults
    ///
    /// The upstream base URL comes from `BACKEND_URL`, falling back to
    /// `NEXT_PUBLIC_BACKEND_URL` (both names are in use across deployments
    /// of the upstream service), then to [`DEFAULT_UPSTREAM_URL`].
    pub fn from_env() -> Self {
        Self {
            server: ServerConfig {
                port: env::var("PORT")
                    .ok()
                    .and_then(|p| p.parse().ok())
                    .unwrap_or(3000),
                host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            },
            upstream: UpstreamConfig {
                base_url: env::var("BACKEND_URL")
                    .or_else(|_| env::var("NEXT_PUBLIC_BACKEND_URL"))
                    .unwrap_or_else(|_| DEFAULT_UPSTREAM_URL.to_string()),
            },
        }
    }

    /// Get the server address as a string
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
