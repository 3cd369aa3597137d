//! Account operations

use crate::client::MkeClient;
use crate::error::{ClientError, Result};
use reqwest::Method;
use serde::{Deserialize, Serialize};

pub const URL_TARGET_FOR_ACCOUNTS: &str = "accounts";

/// Payload for creating an account
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAccount {
    pub name: String,
    pub id: String,
    pub password: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub full_name: String,
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_active: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_admin: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_org: bool,
    #[serde(rename = "searchLDAP", default, skip_serializing_if = "is_false")]
    pub search_ldap: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAccount {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub full_name: String,
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_active: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_admin: bool,
}

/// Account as returned by the server
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResponseAccount {
    pub name: String,
    pub id: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub full_name: String,
    pub is_active: bool,
    pub is_admin: bool,
    pub is_org: bool,
    pub is_imported: bool,
    pub on_demand: bool,
    pub otp_enabled: bool,
    pub members_count: i64,
    pub teams_count: i64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResponseAccounts {
    pub users_count: i64,
    pub orgs_count: i64,
    pub resource_count: i64,
    pub next_page_start: String,
    pub accounts: Vec<ResponseAccount>,
}

/// Filter for listing accounts.
///
/// Built from free text with [`AccountFilter::from`]; text that names no known
/// filter lists everything.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AccountFilter {
    Users,
    Orgs,
    Admins,
    NonAdmins,
    ActiveUsers,
    #[default]
    All,
}

impl AccountFilter {
    /// Query parameter value sent to the server
    pub fn api_form(&self) -> &'static str {
        match self {
            AccountFilter::Users => "users",
            AccountFilter::Orgs => "orgs",
            AccountFilter::Admins => "admins",
            AccountFilter::NonAdmins => "non-admins",
            AccountFilter::ActiveUsers => "active-users",
            AccountFilter::All => "all",
        }
    }
}

impl From<&str> for AccountFilter {
    fn from(value: &str) -> Self {
        match value {
            "users" => AccountFilter::Users,
            "orgs" => AccountFilter::Orgs,
            "admins" => AccountFilter::Admins,
            "non-admins" => AccountFilter::NonAdmins,
            "active-users" => AccountFilter::ActiveUsers,
            _ => AccountFilter::All,
        }
    }
}

impl From<Option<&str>> for AccountFilter {
    fn from(value: Option<&str>) -> Self {
        value.map(AccountFilter::from).unwrap_or_default()
    }
}

fn is_false(value: &bool) -> bool {
    !*value
}

fn account_target(id: &str) -> String {
    format!("{}/{}", URL_TARGET_FOR_ACCOUNTS, id)
}

impl MkeClient {
    pub async fn create_account(&self, account: &CreateAccount) -> Result<ResponseAccount> {
        if *account == CreateAccount::default() {
            return Err(ClientError::EmptyInput(format!(
                "creating account failed: {:?}",
                account
            )));
        }

        self.logger
            .verbose(&format!("Creating account {}", account.name));

        let request = self.request_with_json(Method::POST, URL_TARGET_FOR_ACCOUNTS, account)?;
        let response = self.execute_authorized(request).await?;
        response.json(&format!("create account {}", account.name))
    }

    pub async fn read_account(&self, id: &str) -> Result<ResponseAccount> {
        let request = self.request_with_bytes(Method::GET, &account_target(id), Vec::new())?;
        let response = self.execute_authorized(request).await?;
        response.json(&format!("read account {}", id))
    }

    pub async fn update_account(&self, id: &str, account: &UpdateAccount) -> Result<ResponseAccount> {
        self.logger.verbose(&format!("Updating account {}", id));

        let request = self.request_with_json(Method::PATCH, &account_target(id), account)?;
        let response = self.execute_authorized(request).await?;
        response.json(&format!("update account {}", id))
    }

    pub async fn delete_account(&self, id: &str) -> Result<()> {
        self.logger.verbose(&format!("Deleting account {}", id));

        let request = self.request_with_bytes(Method::DELETE, &account_target(id), Vec::new())?;
        self.execute_authorized(request).await?;
        Ok(())
    }

    pub async fn list_accounts(&self, filter: AccountFilter) -> Result<Vec<ResponseAccount>> {
        let request = self
            .request_with_bytes(Method::GET, URL_TARGET_FOR_ACCOUNTS, Vec::new())?
            .with_query("filter", filter.api_form());

        let response = self.execute_authorized(request).await?;
        let accounts: ResponseAccounts =
            response.json(&format!("list accounts '{}'", filter.api_form()))?;

        self.logger.detail(&format!(
            "Listed {} accounts with filter '{}'",
            accounts.accounts.len(),
            filter.api_form()
        ));
        Ok(accounts.accounts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_filter_lists_everything() {
        assert_eq!(AccountFilter::from("bogus").api_form(), "all");
        assert_eq!(AccountFilter::from("bogus"), AccountFilter::from(None));
        assert_eq!(AccountFilter::from("inactive-users"), AccountFilter::All);
    }

    #[test]
    fn test_known_filters() {
        for name in ["users", "orgs", "admins", "non-admins", "active-users", "all"] {
            assert_eq!(AccountFilter::from(name).api_form(), name);
        }
    }

    #[test]
    fn test_create_account_json_omits_empty_optionals() {
        let account = CreateAccount {
            name: "bob".into(),
            id: "1".into(),
            password: "secret".into(),
            search_ldap: true,
            ..Default::default()
        };

        let json = serde_json::to_value(&account).unwrap();
        assert_eq!(json["name"], "bob");
        assert_eq!(json["searchLDAP"], true);
        assert!(json.get("fullName").is_none());
        assert!(json.get("isAdmin").is_none());
    }

    #[test]
    fn test_response_account_tolerates_missing_fields() {
        let account: ResponseAccount =
            serde_json::from_str(r#"{"name":"bob","id":"1","isAdmin":true,"membersCount":3}"#)
                .unwrap();
        assert_eq!(account.name, "bob");
        assert!(account.is_admin);
        assert_eq!(account.members_count, 3);
        assert!(!account.otp_enabled);
    }

    #[tokio::test]
    async fn test_create_empty_account_fails_before_request() {
        // endpoint that would refuse connections; the guard must trip first
        let client = MkeClient::builder("http://127.0.0.1:1".to_string())
            .with_token("mytoken")
            .build()
            .unwrap();

        let err = client
            .create_account(&CreateAccount::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::EmptyInput(_)));
    }
}
