//! Error types and handlers for control plane operations

pub mod handlers;

use reqwest::StatusCode;
use std::fmt;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ClientError>;

#[derive(Debug, Error)]
pub enum ClientError {
    /// Network, TLS, timeout or cancellation failure of the underlying transport
    #[error("Error occurred in http request: {source}\nreq: {request}")]
    Transport {
        #[source]
        source: reqwest::Error,
        request: String,
    },

    /// Missing token, or a 401 from the server
    #[error("Unauthorized: {}: {body}", display_status(.status))]
    Unauthorized {
        status: Option<StatusCode>,
        body: String,
    },

    /// HTTP 404
    #[error("Not Found: {}: {body}", .status.as_u16())]
    UnknownTarget { status: StatusCode, body: String },

    /// HTTP 500
    #[error("Server Error: {}: {body}", .status.as_u16())]
    ServerError { status: StatusCode, body: String },

    /// Any other status >= 400
    #[error("Response error: Status code: {} : {body}\nreq: {request}", .status.as_u16())]
    Response {
        status: StatusCode,
        body: String,
        request: String,
    },

    /// Response body did not decode into the expected shape
    #[error("unmarshaling failed for {context}: {source}")]
    Unmarshal {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// A creation call was handed a zero value payload
    #[error("empty input: {0}")]
    EmptyInput(String),

    /// The request could not be constructed
    #[error("request creation failed: {0}")]
    RequestCreation(String),

    /// An archive (outer bundle or nested docker bundle) could not be opened
    #[error("could not open {context} archive: {source}")]
    Archive {
        context: String,
        #[source]
        source: zip::result::ZipError,
    },

    /// One or more archive entries failed to decode
    #[error("failed to retrieve the client bundle from MKE; {}", join_failures(.failures))]
    ClientBundleRetrieval { failures: Vec<EntryFailure> },

    /// No server side public key matches the bundle public key
    #[error(
        "no MKE Public key was found that matches the client bundle; Could not match key: \n{searched}\n in \n{}",
        .candidates.join("\n")
    )]
    PublicKeyNotFound {
        searched: String,
        candidates: Vec<String>,
    },

    /// Invalid or missing settings
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ClientError {
    pub fn not_logged_in() -> Self {
        ClientError::Unauthorized {
            status: None,
            body: "not logged in".to_string(),
        }
    }

    /// HTTP status carried by the error, if any
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ClientError::Unauthorized { status, .. } => *status,
            ClientError::UnknownTarget { status, .. }
            | ClientError::ServerError { status, .. }
            | ClientError::Response { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ClientError::Unauthorized { .. })
    }

    pub fn is_unknown_target(&self) -> bool {
        matches!(self, ClientError::UnknownTarget { .. })
    }
}

fn display_status(status: &Option<StatusCode>) -> String {
    match status {
        Some(status) => status.as_u16().to_string(),
        None => "no status".to_string(),
    }
}

fn join_failures(failures: &[EntryFailure]) -> String {
    failures
        .iter()
        .map(|failure| failure.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Why a single archive entry could not be decoded
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("could not open entry: {0}")]
    Entry(#[from] zip::result::ZipError),
    #[error("could not read entry: {0}")]
    Io(#[from] std::io::Error),
    #[error("entry is not valid UTF-8 text: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
    #[error("invalid kube config yaml: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid meta json: {0}")]
    Json(#[from] serde_json::Error),
}

/// A decode failure tied to the archive entry that produced it
#[derive(Debug)]
pub struct EntryFailure {
    pub entry: String,
    pub source: DecodeError,
}

impl fmt::Display for EntryFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.entry, self.source)
    }
}

impl std::error::Error for EntryFailure {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}
