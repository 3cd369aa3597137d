//! Client bundle retrieval and cleanup

use crate::bundle::{ClientBundle, decode_client_bundle, match_public_key};
use crate::client::{AccountPublicKey, MkeClient};
use crate::error::Result;
use reqwest::Method;

pub const URL_TARGET_FOR_CLIENT_BUNDLE: &str = "api/clientbundle";
pub const CLIENT_BUNDLE_LABEL_QUERY: &str = "label";

impl MkeClient {
    /// Ask the control plane to generate a client bundle for the logged in account.
    ///
    /// Each call registers a new public key server side.
    pub async fn create_client_bundle(&self, label: &str) -> Result<ClientBundle> {
        self.logger
            .verbose(&format!("Requesting client bundle with label '{}'", label));

        let request = self
            .request_with_bytes(Method::POST, URL_TARGET_FOR_CLIENT_BUNDLE, Vec::new())?
            .with_query(CLIENT_BUNDLE_LABEL_QUERY, label);
        let response = self.execute_authorized(request).await?;

        let content_length = response.content_length;
        let bundle = decode_client_bundle(response.into_bytes(), content_length, &self.logger)?;

        self.logger
            .success(&format!("Retrieved client bundle {}", bundle.id));
        Ok(bundle)
    }

    /// The server side key for `bundle`, searched among the logged in account's keys
    pub async fn find_client_bundle_public_key(&self, bundle: &ClientBundle) -> Result<AccountPublicKey> {
        let keys = self.list_public_keys(self.username()).await?;
        match_public_key(keys, &bundle.public_key)
    }

    /// Revoke `bundle` by deleting its public key
    pub async fn delete_client_bundle(&self, bundle: &ClientBundle) -> Result<()> {
        let key = self.find_client_bundle_public_key(bundle).await?;
        self.delete_public_key(self.username(), &key.id).await?;

        self.logger
            .success(&format!("Deleted client bundle key {}", key.id));
        Ok(())
    }
}
