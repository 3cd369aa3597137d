//! Configuration for connecting to an MKE control plane

use crate::error::{ClientError, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

pub const ENV_ENDPOINT: &str = "MKE_ENDPOINT";
pub const ENV_USERNAME: &str = "MKE_USERNAME";
pub const ENV_PASSWORD: &str = "MKE_PASSWORD";
pub const ENV_UNSAFE_SSL: &str = "MKE_UNSAFE_SSL_CLIENT";
pub const ENV_TIMEOUT: &str = "MKE_TIMEOUT";

pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthConfig {
    pub username: String,
    pub password: String,
}

impl AuthConfig {
    pub fn new(username: String, password: String) -> Self {
        Self { username, password }
    }

    pub fn validate(&self) -> Result<()> {
        if self.username.is_empty() {
            return Err(ClientError::Configuration(
                "Username cannot be empty".to_string(),
            ));
        }
        if self.password.is_empty() {
            return Err(ClientError::Configuration(
                "Password cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    pub endpoint: String,
    pub auth: AuthConfig,
    /// Accept invalid certificates and hostnames
    pub unsafe_ssl: bool,
    pub timeout: u64,
    pub verbose: bool,
}

impl ClientConfig {
    pub fn new(endpoint: String, username: String, password: String) -> Self {
        Self {
            endpoint,
            auth: AuthConfig::new(username, password),
            unsafe_ssl: false,
            timeout: DEFAULT_TIMEOUT_SECS,
            verbose: false,
        }
    }

    /// Load settings from `MKE_*` environment variables.
    pub fn from_env() -> Result<Self> {
        let endpoint = env::var(ENV_ENDPOINT)
            .map_err(|_| ClientError::Configuration(format!("{} not set", ENV_ENDPOINT)))?;
        let username = env::var(ENV_USERNAME).unwrap_or_default();
        let password = env::var(ENV_PASSWORD).unwrap_or_default();
        let unsafe_ssl = env::var(ENV_UNSAFE_SSL).map_or(false, |v| parse_flag(&v));
        let timeout = env::var(ENV_TIMEOUT)
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        Ok(Self {
            endpoint,
            auth: AuthConfig::new(username, password),
            unsafe_ssl,
            timeout,
            verbose: false,
        })
    }

    pub fn with_unsafe_ssl(mut self, unsafe_ssl: bool) -> Self {
        self.unsafe_ssl = unsafe_ssl;
        self
    }

    pub fn with_timeout(mut self, timeout: u64) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn timeout_duration(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }

    pub fn has_auth(&self) -> bool {
        !self.auth.username.is_empty() && !self.auth.password.is_empty()
    }

    pub fn validate(&self) -> Result<()> {
        if self.endpoint.is_empty() {
            return Err(ClientError::Configuration(
                "Endpoint cannot be empty".to_string(),
            ));
        }

        if !self.endpoint.starts_with("http://") && !self.endpoint.starts_with("https://") {
            return Err(ClientError::Configuration(format!(
                "Invalid endpoint: {}. Must start with http:// or https://",
                self.endpoint
            )));
        }

        if self.timeout == 0 {
            return Err(ClientError::Configuration(
                "Timeout must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(value.trim().to_ascii_lowercase().as_str(), "true" | "1" | "yes")
}
