//! Account public key operations

use crate::client::MkeClient;
use crate::error::Result;
use reqwest::Method;
use serde::{Deserialize, Serialize};

/// A public key registered for an account
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AccountPublicKey {
    pub id: String,
    pub public_key: String,
    pub label: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GetKeysResponse {
    pub account_public_keys: Vec<AccountPublicKey>,
    pub next_page_start: String,
}

pub fn public_keys_target(account: &str) -> String {
    format!("accounts/{}/publicKeys", account)
}

pub fn public_key_target(account: &str, key_id: &str) -> String {
    format!("accounts/{}/publicKeys/{}", account, key_id)
}

impl MkeClient {
    /// All public keys of `account`, in server order
    pub async fn list_public_keys(&self, account: &str) -> Result<Vec<AccountPublicKey>> {
        let request = self.request_with_bytes(Method::GET, &public_keys_target(account), Vec::new())?;
        let response = self.execute_authorized(request).await?;
        let keys: GetKeysResponse = response.json(&format!("public keys of {}", account))?;

        self.logger.detail(&format!(
            "Found {} public keys for {}",
            keys.account_public_keys.len(),
            account
        ));
        Ok(keys.account_public_keys)
    }

    pub async fn delete_public_key(&self, account: &str, key_id: &str) -> Result<()> {
        self.logger
            .verbose(&format!("Deleting public key {} of {}", key_id, account));

        let request = self.request_with_bytes(Method::DELETE, &public_key_target(account, key_id), Vec::new())?;
        self.execute_authorized(request).await?;
        Ok(())
    }
}
