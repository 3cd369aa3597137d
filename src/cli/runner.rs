//! Runner for the command-line tool

use crate::bundle::ClientBundle;
use crate::cli::args::{AccountsCommand, Args, BundleCommand, Command, KeysCommand};
use crate::client::{AccountPublicKey, MkeClient, ResponseAccount};
use crate::config::ClientConfig;
use crate::error::{ClientError, Result};
use crate::logging::Logger;
use std::path::Path;

pub struct Runner {
    args: Args,
    config: ClientConfig,
    logger: Logger,
}

impl Runner {
    pub fn new(args: Args) -> Result<Self> {
        let config = args.client_config()?;
        let logger = if args.quiet {
            Logger::new_quiet()
        } else {
            Logger::new(config.verbose)
        };

        Ok(Self {
            args,
            config,
            logger,
        })
    }

    pub async fn run(&self) -> Result<()> {
        self.logger.section("MKE Client");
        self.logger.info(&format!("Endpoint: {}", self.config.endpoint));
        if self.config.unsafe_ssl {
            self.logger
                .warning("TLS verification is disabled for this endpoint");
        }

        let mut client = MkeClient::from_config(&self.config, self.logger.clone())?;

        if self.args.command.needs_login() {
            self.login(&mut client).await?;
        }

        match &self.args.command {
            Command::Ping => {
                client.ping().await?;
                self.logger.success("Control plane is reachable");
                println!("ok");
            }
            Command::Login => println!("logged in as {}", client.username()),
            Command::Accounts(command) => self.run_accounts(&client, command).await?,
            Command::Keys(command) => self.run_keys(&client, command).await?,
            Command::Bundle(command) => self.run_bundle(&client, command).await?,
        }

        self.logger.success(&format!(
            "Completed in {}",
            self.logger.format_duration(self.logger.elapsed())
        ));
        Ok(())
    }

    async fn login(&self, client: &mut MkeClient) -> Result<()> {
        self.logger.subsection("Authentication");
        self.config.auth.validate()?;

        client.login().await?;
        self.logger
            .step(&format!("Logged in as {}", client.username()));
        Ok(())
    }

    async fn run_accounts(&self, client: &MkeClient, command: &AccountsCommand) -> Result<()> {
        match command {
            AccountsCommand::List { .. } => {
                let filter = command.filter();
                self.logger
                    .subsection(&format!("Accounts ({})", filter.api_form()));

                let accounts = client.list_accounts(filter).await?;
                for account in &accounts {
                    println!("{}", describe_account(account));
                }
                self.logger.info(&format!("{} accounts", accounts.len()));
            }
            AccountsCommand::Get { id } => {
                let account = client.read_account(id).await?;
                self.logger.summary_kv(
                    "Account",
                    &[
                        ("Name", account.name.clone()),
                        ("ID", account.id.clone()),
                        ("Full name", account.full_name.clone()),
                        ("Admin", account.is_admin.to_string()),
                        ("Active", account.is_active.to_string()),
                    ],
                );
                println!("{}", describe_account(&account));
            }
            AccountsCommand::Delete { id } => {
                client.delete_account(id).await?;
                self.logger.success(&format!("Deleted account {}", id));
            }
        }
        Ok(())
    }

    async fn run_keys(&self, client: &MkeClient, command: &KeysCommand) -> Result<()> {
        match command {
            KeysCommand::List { account } => {
                let account = account.as_deref().unwrap_or(client.username());
                let keys = client.list_public_keys(account).await?;

                self.logger.list(
                    &format!("Public keys of {}", account),
                    &keys.iter().map(|k| k.label.clone()).collect::<Vec<_>>(),
                );
                for key in &keys {
                    println!("{}", describe_key(key));
                }
            }
            KeysCommand::Delete { id, account } => {
                let account = account.as_deref().unwrap_or(client.username());
                client.delete_public_key(account, id).await?;
                self.logger
                    .success(&format!("Deleted public key {} of {}", id, account));
            }
        }
        Ok(())
    }

    async fn run_bundle(&self, client: &MkeClient, command: &BundleCommand) -> Result<()> {
        match command {
            BundleCommand::Create { label, out } => {
                self.logger.subsection("Client bundle");
                let bundle = client.create_client_bundle(label).await?;

                self.logger.summary_kv(
                    "Bundle",
                    &[
                        ("ID", bundle.id.clone()),
                        ("Docker host", bundle.meta.docker_host.clone()),
                        ("Kubernetes host", bundle.meta.kubernetes_host.clone()),
                        ("Orchestrator", format!("{:?}", bundle.meta.orchestrator())),
                        ("Has kube config", bundle.kube.is_some().to_string()),
                    ],
                );

                match out {
                    Some(path) => {
                        tokio::fs::write(path, bundle.to_json()).await?;
                        self.logger
                            .success(&format!("Bundle written to {}", path.display()));
                    }
                    None => println!("{}", bundle.to_json()),
                }
            }
            BundleCommand::Key { file } => {
                let bundle = self.read_bundle(file).await?;
                let key = client.find_client_bundle_public_key(&bundle).await?;
                println!("{}", describe_key(&key));
            }
            BundleCommand::Delete { file } => {
                let bundle = self.read_bundle(file).await?;
                client.delete_client_bundle(&bundle).await?;
                println!("deleted bundle {}", bundle.id);
            }
        }
        Ok(())
    }

    async fn read_bundle(&self, path: &Path) -> Result<ClientBundle> {
        self.logger
            .detail(&format!("Reading bundle from {}", path.display()));

        let data = tokio::fs::read_to_string(path).await?;
        ClientBundle::from_json(&data).map_err(|source| ClientError::Unmarshal {
            context: path.display().to_string(),
            source,
        })
    }
}

fn describe_account(account: &ResponseAccount) -> String {
    let kind = if account.is_org { "org" } else { "user" };
    let admin = if account.is_admin { " admin" } else { "" };
    format!("{}\t{}\t{}{}", account.id, account.name, kind, admin)
}

fn describe_key(key: &AccountPublicKey) -> String {
    format!("{}\t{}", key.id, key.label)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_account() {
        let account = ResponseAccount {
            id: "42".into(),
            name: "ops".into(),
            is_org: true,
            ..Default::default()
        };
        assert_eq!(describe_account(&account), "42\tops\torg");

        let account = ResponseAccount {
            id: "1".into(),
            name: "admin".into(),
            is_admin: true,
            ..Default::default()
        };
        assert_eq!(describe_account(&account), "1\tadmin\tuser admin");
    }

    #[test]
    fn test_describe_key() {
        let key = AccountPublicKey {
            id: "ASDF".into(),
            public_key: "PEM".into(),
            label: "ci".into(),
        };
        assert_eq!(describe_key(&key), "ASDF\tci");
    }
}
