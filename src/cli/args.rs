//! Command-line argument parsing

use crate::client::AccountFilter;
use crate::config::{ClientConfig, ENV_PASSWORD, ENV_USERNAME};
use crate::error::Result;
use clap::{Parser, Subcommand};
use std::env;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "mke-client")]
#[command(about = "Talk to an MKE control plane: accounts, public keys and client bundles")]
#[command(version, author)]
pub struct Args {
    /// Control plane endpoint
    #[arg(
        long = "endpoint",
        short = 'e',
        global = true,
        help = "Control plane URL, e.g. https://mke.example.com (defaults to MKE_ENDPOINT)"
    )]
    pub endpoint: Option<String>,

    #[arg(
        long = "username",
        short = 'u',
        global = true,
        help = "Username for login (defaults to MKE_USERNAME)"
    )]
    pub username: Option<String>,

    #[arg(
        long = "password",
        short = 'p',
        global = true,
        help = "Password for login (defaults to MKE_PASSWORD)"
    )]
    pub password: Option<String>,

    /// Skip TLS verification
    #[arg(
        long = "unsafe-ssl",
        short = 'k',
        global = true,
        help = "Accept invalid certificates and host names"
    )]
    pub unsafe_ssl: bool,

    #[arg(
        long = "timeout",
        short = 't',
        global = true,
        help = "Timeout for each request in seconds (default: 300)"
    )]
    pub timeout: Option<u64>,

    #[arg(long = "verbose", short = 'v', global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(
        long = "quiet",
        short = 'q',
        global = true,
        conflicts_with = "verbose",
        help = "Only print command results"
    )]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Check that the control plane answers
    Ping,
    /// Log in and report success
    Login,
    /// Account operations
    #[command(subcommand)]
    Accounts(AccountsCommand),
    /// Public key operations
    #[command(subcommand)]
    Keys(KeysCommand),
    /// Client bundle operations
    #[command(subcommand)]
    Bundle(BundleCommand),
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum AccountsCommand {
    List {
        #[arg(
            long = "filter",
            short = 'f',
            default_value = "all",
            help = "users, orgs, admins, non-admins, active-users or all"
        )]
        filter: String,
    },
    Get { id: String },
    Delete { id: String },
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum KeysCommand {
    List {
        #[arg(long = "account", short = 'a', help = "Account name (defaults to the login user)")]
        account: Option<String>,
    },
    Delete {
        id: String,
        #[arg(long = "account", short = 'a', help = "Account name (defaults to the login user)")]
        account: Option<String>,
    },
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum BundleCommand {
    /// Generate a new client bundle
    Create {
        #[arg(long = "label", short = 'l', help = "Label attached to the bundle key")]
        label: String,
        #[arg(long = "out", short = 'o', help = "Write the decoded bundle as JSON to this file")]
        out: Option<PathBuf>,
    },
    /// Show the server side key of a saved bundle
    Key {
        #[arg(long = "file", short = 'f', help = "Bundle JSON written by `bundle create`")]
        file: PathBuf,
    },
    /// Revoke a saved bundle by deleting its key
    Delete {
        #[arg(long = "file", short = 'f', help = "Bundle JSON written by `bundle create`")]
        file: PathBuf,
    },
}

impl Args {
    pub fn parse_args() -> Self {
        Args::parse()
    }

    /// Client settings: flags first, `MKE_*` environment variables for anything not given
    pub fn client_config(&self) -> Result<ClientConfig> {
        let mut config = match &self.endpoint {
            Some(endpoint) => ClientConfig::new(
                endpoint.clone(),
                env::var(ENV_USERNAME).unwrap_or_default(),
                env::var(ENV_PASSWORD).unwrap_or_default(),
            ),
            None => ClientConfig::from_env()?,
        };

        if let Some(username) = &self.username {
            config.auth.username = username.clone();
        }
        if let Some(password) = &self.password {
            config.auth.password = password.clone();
        }
        if self.unsafe_ssl {
            config.unsafe_ssl = true;
        }
        if let Some(timeout) = self.timeout {
            config.timeout = timeout;
        }
        config.verbose = self.verbose;

        config.validate()?;
        Ok(config)
    }
}

impl Command {
    /// Every subcommand except `ping` runs with a token
    pub fn needs_login(&self) -> bool {
        !matches!(self, Command::Ping)
    }
}

impl AccountsCommand {
    pub fn filter(&self) -> AccountFilter {
        match self {
            AccountsCommand::List { filter } => AccountFilter::from(filter.as_str()),
            _ => AccountFilter::All,
        }
    }
}
