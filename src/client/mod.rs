//! Client for the MKE control plane API
//!
//! This module provides the [`MkeClient`], its builder, the login protocol and the typed
//! account and public key operations. Client bundle retrieval lives in
//! [`client_bundle`] and is built on the same request helpers.

pub mod accounts;
pub mod auth;
pub mod client_bundle;
pub mod public_keys;
pub mod transport;

pub use crate::config::{AuthConfig, ClientConfig};
pub use accounts::{AccountFilter, CreateAccount, ResponseAccount, UpdateAccount};
pub use auth::{Auth, LoginResponse, bearer_token_header_value};
pub use public_keys::AccountPublicKey;
pub use transport::{ApiRequest, ApiResponse};

use crate::error::{ClientError, Result};
use crate::logging::Logger;
use reqwest::{Client, Method};
use std::time::Duration;

pub const URL_TARGET_FOR_PING: &str = "_ping";

pub struct MkeClientBuilder {
    endpoint: String,
    auth: Auth,
    unsafe_ssl: bool,
    timeout: Option<Duration>,
    http: Option<Client>,
    logger: Logger,
}

impl MkeClientBuilder {
    pub fn new(endpoint: String) -> Self {
        Self {
            endpoint,
            auth: Auth::default(),
            unsafe_ssl: false,
            timeout: None,
            http: None,
            logger: Logger::default(),
        }
    }

    pub fn with_credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.auth = Auth::new(username, password);
        self
    }

    /// Reuse a token obtained elsewhere
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.auth = self.auth.with_token(token);
        self
    }

    /// Accept invalid certificates and hostnames
    pub fn with_unsafe_ssl(mut self, unsafe_ssl: bool) -> Self {
        self.unsafe_ssl = unsafe_ssl;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Use a preconfigured HTTP client; `with_unsafe_ssl` and `with_timeout` are then ignored
    pub fn with_http_client(mut self, http: Client) -> Self {
        self.http = Some(http);
        self
    }

    pub fn with_logger(mut self, logger: Logger) -> Self {
        self.logger = logger;
        self
    }

    pub fn build(self) -> Result<MkeClient> {
        url::Url::parse(&self.endpoint).map_err(|e| {
            ClientError::Configuration(format!("Invalid endpoint {}: {}", self.endpoint, e))
        })?;

        let http = match self.http {
            Some(http) => http,
            None => {
                let mut builder = Client::builder();
                if self.unsafe_ssl {
                    builder = builder
                        .danger_accept_invalid_certs(true)
                        .danger_accept_invalid_hostnames(true);
                }
                if let Some(timeout) = self.timeout {
                    builder = builder.timeout(timeout);
                }
                builder.build().map_err(|e| {
                    ClientError::Configuration(format!("Failed to create http client: {}", e))
                })?
            }
        };

        Ok(MkeClient {
            http,
            endpoint: self.endpoint,
            auth: self.auth,
            logger: self.logger,
        })
    }
}

/// API client bound to one endpoint and one set of credentials
pub struct MkeClient {
    http: Client,
    endpoint: String,
    auth: Auth,
    logger: Logger,
}

impl MkeClient {
    pub fn new(endpoint: impl Into<String>, username: impl Into<String>, password: impl Into<String>) -> Result<Self> {
        Self::builder(endpoint.into())
            .with_credentials(username, password)
            .build()
    }

    /// Same as [`MkeClient::new`] but skips TLS verification
    pub fn new_unsafe_ssl(
        endpoint: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Self> {
        Self::builder(endpoint.into())
            .with_credentials(username, password)
            .with_unsafe_ssl(true)
            .build()
    }

    pub fn from_config(config: &ClientConfig, logger: Logger) -> Result<Self> {
        config.validate()?;

        Self::builder(config.endpoint.clone())
            .with_credentials(config.auth.username.clone(), config.auth.password.clone())
            .with_unsafe_ssl(config.unsafe_ssl)
            .with_timeout(config.timeout_duration())
            .with_logger(logger)
            .build()
    }

    pub fn builder(endpoint: String) -> MkeClientBuilder {
        MkeClientBuilder::new(endpoint)
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn username(&self) -> &str {
        &self.auth.username
    }

    pub fn auth(&self) -> &Auth {
        &self.auth
    }

    pub fn is_logged_in(&self) -> bool {
        self.auth.has_token()
    }

    pub fn logger(&self) -> &Logger {
        &self.logger
    }

    /// Health check; needs no token
    pub async fn ping(&self) -> Result<()> {
        let request = self.request_with_bytes(Method::GET, URL_TARGET_FOR_PING, Vec::new())?;
        let response = self.execute(request).await?;
        self.logger
            .detail(&format!("Ping answered {}: {}", response.status, response.text().trim()));
        Ok(())
    }
}
