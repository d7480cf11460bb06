use crate::notes::PathRule;
use clap::Parser;
use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Environment variable names - single source of truth
pub mod env_vars {
    pub const API_KEY: &str = "OPENAI_API_KEY";
    pub const BASE_URL: &str = "OPENAI_BASE_URL";
    pub const MODEL: &str = "NOTEBOT_MODEL";
    pub const NOTES_DIR: &str = "NOTEBOT_NOTES_DIR";
    /// Set to "true" to validate note paths segment by segment instead of
    /// rejecting every path that contains a dot.
    pub const STRICT_PATHS: &str = "NOTEBOT_STRICT_PATHS";
    pub const MAX_RETRIES: &str = "NOTEBOT_MAX_RETRIES";
    pub const TIMEOUT_SECS: &str = "NOTEBOT_TIMEOUT_SECS";
}

/// Default values
pub mod defaults {
    pub const BASE_URL: &str = "https://api.openai.com/v1";
    pub const MODEL: &str = "gpt-4";
    pub const NOTES_DIR: &str = "./notes";
    pub const MAX_RETRIES: u32 = 3;
    pub const TIMEOUT_SECS: u64 = 120;
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} is not set")]
    MissingEnv(&'static str),
    #[error("failed to create notes directory {path:?}: {source}")]
    NotesDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Command line flags. Every flag falls back to its environment variable.
#[derive(Debug, Parser)]
#[command(name = "notebot", version, about = "A forgetful assistant that keeps notes")]
pub struct Cli {
    /// Root directory of the note tree (created if absent)
    #[arg(long, env = env_vars::NOTES_DIR, default_value = defaults::NOTES_DIR)]
    pub notes_dir: PathBuf,

    /// Chat model to request completions from
    #[arg(long, env = env_vars::MODEL, default_value = defaults::MODEL)]
    pub model: String,

    /// OpenAI-compatible API base URL
    #[arg(long, env = env_vars::BASE_URL, default_value = defaults::BASE_URL)]
    pub base_url: String,

    /// Allow dotted note names; only reject `.`/`..` segments and absolute paths
    #[arg(long, env = env_vars::STRICT_PATHS)]
    pub strict_paths: bool,

    /// Retries for transient completion failures (429, 5xx, network)
    #[arg(long, env = env_vars::MAX_RETRIES, default_value_t = defaults::MAX_RETRIES)]
    pub max_retries: u32,

    /// Per-request timeout in seconds
    #[arg(long, env = env_vars::TIMEOUT_SECS, default_value_t = defaults::TIMEOUT_SECS)]
    pub timeout_secs: u64,
}

#[derive(Clone, Debug)]
pub struct Config {
    pub notes_dir: PathBuf,
    pub path_rule: PathRule,
    pub ai: AiConfig,
}

/// Settings for the completion endpoint
#[derive(Clone, Debug)]
pub struct AiConfig {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
    pub max_retries: u32,
    pub timeout: Duration,
}

impl Config {
    /// Resolve flags against the environment. The API key is only read from
    /// the environment so it never shows up in shell history.
    pub fn from_cli(cli: Cli) -> Result<Self, ConfigError> {
        let api_key = env::var(env_vars::API_KEY)
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or(ConfigError::MissingEnv(env_vars::API_KEY))?;

        let path_rule = if cli.strict_paths {
            PathRule::Strict
        } else {
            PathRule::Legacy
        };

        Ok(Self {
            notes_dir: cli.notes_dir,
            path_rule,
            ai: AiConfig {
                base_url: cli.base_url.trim_end_matches('/').to_string(),
                api_key,
                model: cli.model,
                max_retries: cli.max_retries,
                timeout: Duration::from_secs(cli.timeout_secs),
            },
        })
    }
}

/// Create the notes directory if it doesn't exist
pub fn initialize_notes_dir(notes_dir: &Path) -> Result<(), ConfigError> {
    std::fs::create_dir_all(notes_dir).map_err(|source| ConfigError::NotesDir {
        path: notes_dir.to_path_buf(),
        source,
    })?;
    log::info!("Notes directory: {:?}", notes_dir);
    Ok(())
}
