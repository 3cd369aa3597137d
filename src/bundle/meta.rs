//! Docker context `meta.json` decoding

use crate::bundle::ClientBundleMeta;
use crate::error::DecodeError;
use serde::Deserialize;
use std::collections::HashMap;

pub const ENDPOINT_DOCKER: &str = "docker";
pub const ENDPOINT_KUBERNETES: &str = "kubernetes";

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct MetaDocument {
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "Metadata")]
    metadata: Option<MetaMetadata>,
    #[serde(rename = "Endpoints")]
    endpoints: Option<HashMap<String, MetaEndpoint>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct MetaMetadata {
    #[serde(rename = "Description")]
    description: String,
    #[serde(rename = "StackOrchestrator")]
    stack_orchestrator: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct MetaEndpoint {
    #[serde(rename = "Host")]
    host: String,
    #[serde(rename = "SkipTLSVerify")]
    skip_tls_verify: bool,
}

impl ClientBundleMeta {
    /// Flatten a `meta.json` document. Only the docker and kubernetes endpoints are read.
    pub fn from_meta_json(data: &[u8]) -> Result<Self, DecodeError> {
        let document: MetaDocument = serde_json::from_slice(data)?;
        let metadata = document.metadata.unwrap_or_default();
        let mut endpoints = document.endpoints.unwrap_or_default();

        let mut meta = ClientBundleMeta {
            name: document.name,
            description: metadata.description,
            stack_orchestrator: metadata.stack_orchestrator,
            ..Default::default()
        };

        if let Some(kube) = endpoints.remove(ENDPOINT_KUBERNETES) {
            meta.kubernetes_host = kube.host;
            meta.kubernetes_skip_verify_tls = kube.skip_tls_verify;
        }
        if let Some(docker) = endpoints.remove(ENDPOINT_DOCKER) {
            meta.docker_host = docker.host;
            meta.docker_skip_verify_tls = docker.skip_tls_verify;
        }

        Ok(meta)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_document() {
        let json = br#"{
            "Name": "ucp_mke.example.com_admin",
            "Metadata": {"Description": "Bundle for admin", "StackOrchestrator": "kubernetes"},
            "Endpoints": {
                "docker": {"Host": "tcp://mke.example.com:443", "SkipTLSVerify": false},
                "kubernetes": {"Host": "https://mke.example.com:6443", "SkipTLSVerify": true, "DefaultNamespace": "default"},
                "other": {"Host": "ignored"}
            }
        }"#;

        let meta = ClientBundleMeta::from_meta_json(json).unwrap();
        assert_eq!(meta.name, "ucp_mke.example.com_admin");
        assert_eq!(meta.description, "Bundle for admin");
        assert_eq!(meta.stack_orchestrator, "kubernetes");
        assert_eq!(meta.docker_host, "tcp://mke.example.com:443");
        assert!(!meta.docker_skip_verify_tls);
        assert_eq!(meta.kubernetes_host, "https://mke.example.com:6443");
        assert!(meta.kubernetes_skip_verify_tls);
    }

    #[test]
    fn test_missing_endpoint_stays_zero() {
        let json = br#"{"Name": "n", "Endpoints": {"docker": {"Host": "tcp://h:443"}}}"#;
        let meta = ClientBundleMeta::from_meta_json(json).unwrap();
        assert_eq!(meta.docker_host, "tcp://h:443");
        assert!(meta.kubernetes_host.is_empty());
        assert!(!meta.kubernetes_skip_verify_tls);
        assert!(meta.description.is_empty());
    }

    #[test]
    fn test_null_sections() {
        let json = br#"{"Name": "n", "Metadata": null, "Endpoints": null}"#;
        let meta = ClientBundleMeta::from_meta_json(json).unwrap();
        assert_eq!(meta.name, "n");
    }

    #[test]
    fn test_invalid_json() {
        let err = ClientBundleMeta::from_meta_json(b"{\"Name\": ").unwrap_err();
        assert!(matches!(err, DecodeError::Json(_)));
    }
}
