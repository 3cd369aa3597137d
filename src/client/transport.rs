//! Request construction and execution against the configured endpoint
//!
//! Every operation goes through [`MkeClient::execute`] or [`MkeClient::execute_authorized`].
//! Responses are read fully into memory and classified by status before any decoding
//! happens. Nothing is retried at this layer.

use crate::client::MkeClient;
use crate::client::auth::bearer_token_header_value;
use crate::error::handlers::HttpErrorHandler;
use crate::error::{ClientError, Result};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{Method, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use url::Url;

/// A fully built request, kept around so it can be rendered when something goes wrong
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub url: Url,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl ApiRequest {
    pub fn new(method: Method, url: Url, body: Vec<u8>) -> Self {
        Self {
            method,
            url,
            headers: HeaderMap::new(),
            body,
        }
    }

    /// Append a query parameter, keeping any already present
    pub fn with_query(mut self, key: &str, value: &str) -> Self {
        self.url.query_pairs_mut().append_pair(key, value);
        self
    }

    pub fn query_value(&self, key: &str) -> Option<String> {
        self.url
            .query_pairs()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.into_owned())
    }

    /// Pretty JSON rendering of headers and body for error reports.
    ///
    /// The bearer token is redacted.
    pub fn debug(&self) -> String {
        let mut headers: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for (name, value) in self.headers.iter() {
            let rendered = if *name == AUTHORIZATION {
                "Bearer <redacted>".to_string()
            } else {
                String::from_utf8_lossy(value.as_bytes()).into_owned()
            };
            headers.entry(name.as_str().to_string()).or_default().push(rendered);
        }

        let rendering = serde_json::json!({
            "method": self.method.as_str(),
            "url": self.url.as_str(),
            "headers": headers,
            "body": String::from_utf8_lossy(&self.body),
        });

        serde_json::to_string_pretty(&rendering).unwrap_or_default()
    }
}

/// A successful (status < 400) response with its body already read
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: StatusCode,
    /// Declared content length, when the server sent one
    pub content_length: Option<u64>,
    pub body: Vec<u8>,
}

impl ApiResponse {
    pub fn into_bytes(self) -> Vec<u8> {
        self.body
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Decode the body as JSON, failing with [`ClientError::Unmarshal`]
    pub fn json<T: DeserializeOwned>(&self, context: &str) -> Result<T> {
        serde_json::from_slice(&self.body).map_err(|source| ClientError::Unmarshal {
            context: context.to_string(),
            source,
        })
    }
}

impl MkeClient {
    /// Absolute URL for a target relative to the endpoint
    pub(crate) fn url_for_target(&self, target: &str) -> Result<Url> {
        let joined = format!(
            "{}/{}",
            self.endpoint.trim_end_matches('/'),
            target.trim_start_matches('/')
        );
        Url::parse(&joined).map_err(|e| {
            ClientError::RequestCreation(format!("invalid target {}: {}", joined, e))
        })
    }

    /// Build a request with a raw byte body
    pub fn request_with_bytes(&self, method: Method, target: &str, body: Vec<u8>) -> Result<ApiRequest> {
        Ok(ApiRequest::new(method, self.url_for_target(target)?, body))
    }

    /// Build a request whose body is `body` serialized as JSON
    pub fn request_with_json<T: Serialize + ?Sized>(
        &self,
        method: Method,
        target: &str,
        body: &T,
    ) -> Result<ApiRequest> {
        let bytes = serde_json::to_vec(body).map_err(|e| {
            ClientError::RequestCreation(format!("could not serialize body for {}: {}", target, e))
        })?;

        let mut request = self.request_with_bytes(method, target, bytes)?;
        request
            .headers
            .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Ok(request)
    }

    /// Execute a request as is, without authorization
    pub async fn execute(&self, request: ApiRequest) -> Result<ApiResponse> {
        self.logger
            .detail(&format!("{} {}", request.method, request.url));

        let response = self
            .http
            .request(request.method.clone(), request.url.clone())
            .headers(request.headers.clone())
            .body(request.body.clone())
            .send()
            .await
            .map_err(|source| ClientError::Transport {
                source,
                request: request.debug(),
            })?;

        let status = response.status();
        let content_length = response.content_length();
        let body = response
            .bytes()
            .await
            .map_err(|source| ClientError::Transport {
                source,
                request: request.debug(),
            })?
            .to_vec();

        self.logger.detail(&format!(
            "Response status: {} ({})",
            status,
            self.logger.format_size(body.len() as u64)
        ));

        if HttpErrorHandler::is_failure(status) {
            let error = HttpErrorHandler::classify(status, &body, || request.debug());
            self.logger
                .verbose(&format!("{} {} failed: {}", request.method, request.url, status));
            return Err(error);
        }

        Ok(ApiResponse {
            status,
            content_length,
            body,
        })
    }

    /// Attach the bearer token and execute.
    ///
    /// Fails with [`ClientError::Unauthorized`] before any network call when
    /// no token has been obtained yet.
    pub async fn execute_authorized(&self, mut request: ApiRequest) -> Result<ApiResponse> {
        self.authorize(&mut request)?;
        self.execute(request).await
    }

    fn authorize(&self, request: &mut ApiRequest) -> Result<()> {
        if !self.auth.has_token() {
            return Err(ClientError::not_logged_in());
        }

        let value = HeaderValue::from_str(&bearer_token_header_value(self.auth.token()))
            .map_err(|e| ClientError::RequestCreation(format!("invalid token: {}", e)))?;
        request.headers.insert(AUTHORIZATION, value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn client() -> MkeClient {
        MkeClient::builder("https://localhost/".to_string())
            .build()
            .unwrap()
    }

    #[test]
    fn test_request_body_bytes() {
        let request = client()
            .request_with_bytes(Method::POST, "mypath", b"ABCDEFGHIJKL".to_vec())
            .unwrap();

        assert_eq!(request.body, b"ABCDEFGHIJKL");
        assert_eq!(request.url.as_str(), "https://localhost/mypath");
        assert!(request.headers.get(CONTENT_TYPE).is_none());
    }

    #[test]
    fn test_request_body_json() {
        let mut body = HashMap::new();
        body.insert("first", "one");
        body.insert("second", "two");

        let request = client()
            .request_with_json(Method::POST, "/mypath", &body)
            .unwrap();

        assert!(!request.body.is_empty());
        assert_eq!(request.body, serde_json::to_vec(&body).unwrap());
        assert_eq!(request.headers.get(CONTENT_TYPE).unwrap(), "application/json");
        assert_eq!(request.url.as_str(), "https://localhost/mypath");
    }

    #[test]
    fn test_query_parameters() {
        let request = client()
            .request_with_bytes(Method::POST, "api/clientbundle", Vec::new())
            .unwrap()
            .with_query("label", "my label");

        assert_eq!(request.query_value("label").as_deref(), Some("my label"));
        assert!(request.url.as_str().ends_with("api/clientbundle?label=my+label"));
    }

    #[test]
    fn test_debug_redacts_token() {
        let mut request = client()
            .request_with_json(Method::POST, "accounts", &serde_json::json!({"name": "bob"}))
            .unwrap();
        request
            .headers
            .insert(AUTHORIZATION, HeaderValue::from_static("Bearer secret-token"));

        let rendering = request.debug();
        assert!(rendering.contains("application/json"));
        assert!(rendering.contains("bob"));
        assert!(!rendering.contains("secret-token"));
    }

    #[tokio::test]
    async fn test_authorized_request_requires_token() {
        let client = client();
        let request = client
            .request_with_bytes(Method::GET, "mypath", Vec::new())
            .unwrap();

        // no server is listening; the call must fail before touching the network
        let err = client.execute_authorized(request).await.unwrap_err();
        assert!(matches!(err, ClientError::Unauthorized { status: None, .. }));
    }

    #[test]
    fn test_unmarshal_error() {
        let response = ApiResponse {
            status: StatusCode::OK,
            content_length: None,
            body: b"not json".to_vec(),
        };
        let err = response.json::<HashMap<String, String>>("test body").unwrap_err();
        assert!(matches!(err, ClientError::Unmarshal { .. }));
        assert!(err.to_string().contains("test body"));
    }
}
