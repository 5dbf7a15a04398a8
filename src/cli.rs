//! Command-line interface parsing for the userdir demo
//!
//! This module handles parsing of CLI arguments using clap and resolving them,
//! together with an optional settings file, into a [`ClientConfig`].

use clap::Parser;
use std::path::PathBuf;
use thiserror::Error;

use crate::config::{ClientConfig, ConfigError, ConfigOverrides, SETTINGS_FILE_NAME};

/// Error types for CLI argument handling
#[derive(Debug, Error)]
pub enum CliError {
    /// The user id is not a non-negative integer
    #[error("Invalid user ID: '{0}'")]
    InvalidUserId(String),

    /// Configuration could not be loaded
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// userdir - List users from a paginated user directory API
#[derive(Parser, Debug)]
#[command(name = "userdir")]
#[command(about = "List users from a paginated user directory API")]
#[command(version)]
pub struct Cli {
    /// Settings file with a ReqresApi section (defaults to ./appsettings.json)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// API root URL, overriding the settings file (e.g. https://reqres.in/api)
    #[arg(long, value_name = "URL")]
    pub base_url: Option<String>,

    /// API key sent as the x-api-key header, overriding the settings file
    #[arg(long, value_name = "KEY")]
    pub api_key: Option<String>,

    /// User to look up after listing; prompts on stdin when omitted
    #[arg(long, value_name = "ID")]
    pub user_id: Option<u32>,
}

impl Cli {
    /// Settings given on the command line
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            base_url: self.base_url.clone(),
            api_key: self.api_key.clone(),
            timeout: None,
        }
    }

    /// Settings file to read, if any
    ///
    /// `--config` wins; otherwise `./appsettings.json` and then the platform
    /// config directory are used if they exist.
    pub fn settings_path(&self) -> Option<PathBuf> {
        if let Some(path) = &self.config {
            return Some(path.clone());
        }

        let local = PathBuf::from(SETTINGS_FILE_NAME);
        if local.exists() {
            return Some(local);
        }

        ClientConfig::default_path().filter(|path| path.exists())
    }
}

/// Builds the client config from the settings file and CLI flags
///
/// Flags override values from the file.
pub fn resolve_config(cli: &Cli) -> Result<ClientConfig, CliError> {
    let from_file = match cli.settings_path() {
        Some(path) => ConfigOverrides::from_file(&path)?,
        None => ConfigOverrides::default(),
    };

    Ok(from_file.merge(cli.overrides()).resolve()?)
}

/// Parses a user id typed at the prompt
pub fn parse_user_id_arg(s: &str) -> Result<u32, CliError> {
    let trimmed = s.trim();
    trimmed
        .parse()
        .map_err(|_| CliError::InvalidUserId(trimmed.to_string()))
}
