//! Kube config (`kube.yml`) decoding

use crate::bundle::ClientBundleKube;
use crate::error::DecodeError;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::Deserialize;
use std::collections::BTreeMap;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct KubeConfigDocument {
    // required, otherwise unused
    #[allow(dead_code)]
    #[serde(rename = "apiVersion")]
    api_version: String,
    #[allow(dead_code)]
    kind: String,
    #[allow(dead_code)]
    #[serde(default)]
    preferences: BTreeMap<String, String>,
    #[serde(default)]
    clusters: Vec<NamedCluster>,
    #[serde(default)]
    contexts: Vec<NamedContext>,
    #[serde(rename = "current-context", default)]
    current_context: String,
    #[serde(default)]
    users: Vec<NamedUser>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct NamedCluster {
    name: String,
    cluster: Cluster,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
struct Cluster {
    #[serde(default)]
    certificate_authority_data: String,
    #[serde(default)]
    server: String,
    #[serde(default)]
    insecure_skip_tls_verify: bool,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct NamedContext {
    name: String,
    context: Context,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct Context {
    #[serde(default)]
    cluster: String,
    #[serde(default)]
    user: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct NamedUser {
    name: String,
    user: User,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
struct User {
    #[serde(default)]
    client_certificate_data: String,
    #[serde(default)]
    client_key_data: String,
}

impl ClientBundleKube {
    /// Strictly parse a kube config and resolve the current context.
    ///
    /// Unknown keys are a parse error. A context, cluster or user that cannot be
    /// found only leaves the matching fields empty; `config` always holds the
    /// document text.
    pub fn from_kube_yml(data: Vec<u8>) -> Result<Self, DecodeError> {
        let config = String::from_utf8(data)?;
        let document: KubeConfigDocument = serde_yaml::from_str(&config)?;

        let mut kube = ClientBundleKube {
            config,
            ..Default::default()
        };

        let Some(context) = document
            .contexts
            .iter()
            .find(|c| c.name == document.current_context)
            .map(|c| &c.context)
        else {
            return Ok(kube);
        };

        if let Some(cluster) = document.clusters.iter().find(|c| c.name == context.cluster) {
            kube.host = cluster.cluster.server.clone();
            kube.cluster_ca_certificate = decode_base64(&cluster.cluster.certificate_authority_data);
            kube.insecure = cluster.cluster.insecure_skip_tls_verify;
        }

        if let Some(user) = document.users.iter().find(|u| u.name == context.user) {
            kube.client_certificate = decode_base64(&user.user.client_certificate_data);
            kube.client_key = decode_base64(&user.user.client_key_data);
        }

        Ok(kube)
    }
}

/// Decode a base64 field; malformed data decodes to an empty string
fn decode_base64(value: &str) -> String {
    STANDARD
        .decode(value.trim())
        .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
        .unwrap_or_default()
}
