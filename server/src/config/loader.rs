//! Configuration file loading and parsing
//!
//! This module handles loading repo-lens configuration from RON files with
//! fallback strategies for finding config files in standard locations, and
//! applies the environment overrides read once at process start.

use super::Config;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Standard config file names to search for
const CONFIG_FILENAMES: &[&str] = &["repo-lens.ron", ".repo-lens/config.ron"];

/// Environment variable naming an explicit config file
pub const CONFIG_PATH_ENV: &str = "REPO_LENS_CONFIG_PATH";

/// Environment variable overriding the listen port
pub const PORT_ENV: &str = "PORT";

/// Load configuration from a specific file path
pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Config> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    parse_ron(&content).with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Load configuration with automatic file discovery
///
/// Searches for config files in the following locations (in order):
/// 1. Path specified in REPO_LENS_CONFIG_PATH environment variable
/// 2. repo-lens.ron in current directory
/// 3. .repo-lens/config.ron relative to current directory
///
/// If no config file is found, returns a default configuration.
pub fn load_with_discovery() -> Result<Config> {
    let env_path = std::env::var(CONFIG_PATH_ENV).ok();
    discover(env_path.as_deref())
}

fn discover(env_path: Option<&str>) -> Result<Config> {
    if let Some(env_path) = env_path {
        let path = PathBuf::from(env_path);
        if path.exists() {
            tracing::info!("Loading config from {}: {}", CONFIG_PATH_ENV, path.display());
            return load_from_file(&path);
        } else {
            tracing::warn!(
                "{} specified but file not found: {}",
                CONFIG_PATH_ENV,
                path.display()
            );
        }
    }

    for filename in CONFIG_FILENAMES {
        let path = PathBuf::from(filename);
        if path.exists() {
            tracing::info!("Loading config from: {}", path.display());
            return load_from_file(&path);
        }
    }

    tracing::info!("No config file found, using defaults");
    Ok(Config::default())
}

/// Apply overrides taken from the process environment
pub fn apply_env_overrides(config: Config) -> Result<Config> {
    let port = std::env::var(PORT_ENV).ok();
    apply_overrides(config, port.as_deref())
}

fn apply_overrides(mut config: Config, port: Option<&str>) -> Result<Config> {
    if let Some(raw) = port.map(str::trim).filter(|raw| !raw.is_empty()) {
        config.server.port = raw
            .parse()
            .with_context(|| format!("{} must be a valid port number, got `{}`", PORT_ENV, raw))?;
    }

    Ok(config)
}

/// Parse RON configuration string
fn parse_ron(content: &str) -> Result<Config> {
    ron::from_str(content).context("Failed to parse RON configuration")
}
