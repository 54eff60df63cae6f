pub mod schema;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::error::SetupError;

pub use schema::{ConfigMessage, SetupConfig};

/// Load configuration from `path`, or from the default location when `path`
/// is `None`.
///
/// An explicit path must exist. A missing default file yields the defaults.
/// Validation warnings are printed to stderr; validation errors fail the load.
pub fn load(path: Option<&Path>) -> Result<SetupConfig> {
    let (config_path, explicit) = match path {
        Some(p) => (p.to_path_buf(), true),
        None => match default_path() {
            Some(p) => (p, false),
            None => return Ok(SetupConfig::default()),
        },
    };

    if !explicit && !config_path.exists() {
        tracing::debug!(path = %config_path.display(), "no config file, using defaults");
        return Ok(SetupConfig::default());
    }

    let contents = std::fs::read_to_string(&config_path)
        .map_err(SetupError::from)
        .with_context(|| format!("could not read config {}", config_path.display()))?;
    let config = parse(&contents)
        .with_context(|| format!("invalid config {}", config_path.display()))?;
    tracing::debug!(path = %config_path.display(), "loaded config");
    Ok(config)
}

/// Parse and validate configuration text.
pub fn parse(contents: &str) -> Result<SetupConfig> {
    let config: SetupConfig = toml::from_str(contents).map_err(SetupError::from)?;

    for msg in config.validate() {
        match msg {
            ConfigMessage::Warning(w) => {
                eprintln!("config warning: {}", w);
            }
            ConfigMessage::Error(e) => {
                return Err(SetupError::Config(e).into());
            }
        }
    }

    Ok(config)
}

/// Return the platform-specific config file (~/.config/pyenv-setup/config.toml on Linux).
pub fn default_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("pyenv-setup").join("config.toml"))
}
