//! Login protocol and credential state

use crate::client::MkeClient;
use crate::error::Result;
use reqwest::Method;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const URL_TARGET_FOR_AUTH: &str = "login";

/// Username, password and the bearer token obtained by [`MkeClient::login`].
///
/// Owned by one client. Only `login` writes the token; the `&mut self` receiver
/// means concurrent logins on a shared client need external synchronization.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct Auth {
    pub username: String,
    pub password: String,
    #[serde(skip)]
    token: String,
}

impl Auth {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            token: String::new(),
        }
    }

    /// Start from an already known token, skipping the login round trip
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = token.into();
        self
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn has_token(&self) -> bool {
        !self.token.is_empty()
    }

    pub(crate) fn set_token(&mut self, token: String) {
        self.token = token;
    }
}

impl fmt::Debug for Auth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Auth")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("has_token", &self.has_token())
            .finish()
    }
}

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

/// Body returned by the login endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub auth_token: String,
}

impl LoginResponse {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            auth_token: token.into(),
        }
    }
}

pub fn bearer_token_header_value(token: &str) -> String {
    format!("Bearer {}", token)
}

impl MkeClient {
    /// Exchange username and password for a bearer token.
    ///
    /// Any prior token is overwritten on success and left untouched on failure.
    pub async fn login(&mut self) -> Result<()> {
        self.logger.verbose(&format!(
            "Attempting authentication for user: {}",
            self.auth.username
        ));

        let body = LoginRequest {
            username: &self.auth.username,
            password: &self.auth.password,
        };
        let request = self.request_with_json(Method::POST, URL_TARGET_FOR_AUTH, &body)?;
        let response = self.execute(request).await?;
        let login: LoginResponse = response.json("login response")?;

        self.logger
            .detail(&format!("Token obtained (length: {} chars)", login.auth_token.len()));
        self.auth.set_token(login.auth_token);

        Ok(())
    }
}
