//! MKE control plane client library
//!
//! A typed async client for the MKE control plane API: login, accounts, public keys
//! and client bundles. Client bundles are downloaded as zip archives and decoded into
//! [`ClientBundle`] values, and can be tied back to the public key the server
//! registered for them.

pub mod bundle;
pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod logging;

pub use bundle::ClientBundle;
pub use client::{MkeClient, MkeClientBuilder};
pub use config::{AuthConfig, ClientConfig};
pub use error::{ClientError, Result};
pub use logging::Logger;
