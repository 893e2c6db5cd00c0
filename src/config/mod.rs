mod schema;

pub use schema::{Config, DEFAULT_LOG_LEVEL};

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::catalog::Catalog;

/// Get the config directory path (~/.config/qa-feedback/)
pub fn get_config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home.join(".config").join("qa-feedback"))
}

/// Get the default config file path (~/.config/qa-feedback/config.yaml)
pub fn get_config_path() -> Result<PathBuf> {
    Ok(get_config_dir()?.join("config.yaml"))
}

/// Ensure the parent directory of `path` exists
pub fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory at {}", parent.display()))?;
        }
    }
    Ok(())
}

/// Load configuration from a YAML file
///
/// # Arguments
///
/// * `path` - Optional path to config file. If None, uses default path (~/.config/qa-feedback/config.yaml)
///
/// A missing file at the default path yields the default configuration. A
/// missing file at an explicit path is an error.
///
/// # Errors
///
/// Returns an error if:
/// - An explicitly given config file does not exist
/// - The config file cannot be read
/// - The YAML cannot be parsed
pub fn load_config(path: Option<PathBuf>) -> Result<Config> {
    let explicit = path.is_some();
    let config_path = match path {
        Some(p) => p,
        None => get_config_path()?,
    };

    if !config_path.exists() {
        if explicit {
            anyhow::bail!("Config file not found at {}", config_path.display());
        }
        tracing::debug!(path = %config_path.display(), "no config file, using defaults");
        return Ok(Config::default());
    }

    let config_content = fs::read_to_string(&config_path)
        .with_context(|| format!("Failed to read config file at {}", config_path.display()))?;

    let config: Config = serde_saphyr::from_str(&config_content).with_context(|| {
        format!(
            "Failed to parse config: invalid YAML in {}",
            config_path.display()
        )
    })?;

    Ok(config)
}

/// Write a config file, refusing to overwrite unless `force` is set
pub fn write_config(path: &Path, config: &Config, force: bool) -> Result<()> {
    if path.exists() && !force {
        anyhow::bail!(
            "Config already exists at {}. Use --force to overwrite",
            path.display()
        );
    }

    let yaml = serde_saphyr::to_string(config)
        .map_err(|e| anyhow::anyhow!("Failed to serialize config: {}", e))?;

    ensure_parent_dir(path)?;
    fs::write(path, yaml)
        .with_context(|| format!("Failed to write config to {}", path.display()))?;

    Ok(())
}

/// Catalog selected by the config: the override file if set, else the built-in rubric
pub fn load_catalog(config: &Config) -> Result<Catalog> {
    match &config.catalog {
        Some(path) => Catalog::load(path),
        None => Catalog::builtin(),
    }
}

/// Record store path selected by the config
pub fn store_path(config: &Config) -> Result<PathBuf> {
    match &config.store {
        Some(path) => Ok(path.clone()),
        None => crate::records::get_store_path(),
    }
}
