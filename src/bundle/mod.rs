//! Client bundle model and decoding
//!
//! A client bundle is a zip archive produced by the control plane. It carries the
//! account's TLS material, an optional kube config and a nested docker context
//! archive whose `meta.json` names the bundle. [`archive`] walks the archive,
//! [`kubeconfig`] and [`meta`] decode the structured entries and [`reconcile`]
//! ties a decoded bundle back to its server side public key.

pub mod archive;
pub mod kubeconfig;
pub mod meta;
pub mod reconcile;

pub use archive::{ArchiveReader, BundleEntry, DecodeOutcome, decode_client_bundle};
pub use reconcile::match_public_key;

use serde::{Deserialize, Serialize};

/// Decoded client bundle
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientBundle {
    /// Archive comment, replaced by the meta document name when it has one
    pub id: String,
    pub private_key: String,
    pub public_key: String,
    pub cert: String,
    pub ca_cert: String,
    /// Only present when the archive had a kube config
    pub kube: Option<ClientBundleKube>,
    pub meta: ClientBundleMeta,
}

impl ClientBundle {
    /// JSON rendering for debugging and for persisting a bundle between runs
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }

    pub fn from_json(data: &str) -> serde_json::Result<Self> {
        serde_json::from_str(data)
    }
}

/// Kubernetes connection material resolved from the bundle's kube config
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientBundleKube {
    /// The kube config document, verbatim
    pub config: String,
    pub host: String,
    pub client_key: String,
    pub client_certificate: String,
    pub cluster_ca_certificate: String,
    pub insecure: bool,
}

/// Flattened docker context `meta.json`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientBundleMeta {
    pub name: String,
    pub description: String,
    pub stack_orchestrator: String,
    pub docker_host: String,
    pub docker_skip_verify_tls: bool,
    pub kubernetes_host: String,
    pub kubernetes_skip_verify_tls: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orchestrator {
    Docker,
    Kubernetes,
    /// Unset or unrecognized
    Both,
}

impl ClientBundleMeta {
    pub fn orchestrator(&self) -> Orchestrator {
        match self.stack_orchestrator.as_str() {
            "docker" => Orchestrator::Docker,
            "kubernetes" => Orchestrator::Kubernetes,
            _ => Orchestrator::Both,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_orchestrator() {
        let mut meta = ClientBundleMeta::default();
        assert_eq!(meta.orchestrator(), Orchestrator::Both);

        meta.stack_orchestrator = "kubernetes".into();
        assert_eq!(meta.orchestrator(), Orchestrator::Kubernetes);

        meta.stack_orchestrator = "swarm".into();
        assert_eq!(meta.orchestrator(), Orchestrator::Both);
    }

    #[test]
    fn test_json_rendering_keeps_fields() {
        let bundle = ClientBundle {
            id: "my-bundle".into(),
            public_key: "PUB".into(),
            kube: Some(ClientBundleKube {
                host: "https://kube".into(),
                ..Default::default()
            }),
            ..Default::default()
        };

        let restored = ClientBundle::from_json(&bundle.to_json()).unwrap();
        assert_eq!(restored, bundle);
    }
}
