use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::debug;

use tabula_core::AnalysisConfig;

/// Return the default config directory path: ~/.config/tabula/
pub fn default_config_dir() -> Result<PathBuf> {
    let config_dir = dirs::config_dir()
        .context("could not determine user config directory")?
        .join("tabula");
    Ok(config_dir)
}

/// Return the default config file path.
pub fn default_config_path() -> Result<PathBuf> {
    Ok(default_config_dir()?.join("config.toml"))
}

/// Load analysis settings.
///
/// An explicit path must exist. The default path falls back to built-in
/// defaults when absent. Environment overrides are applied on top either way.
pub fn load(path: Option<&Path>) -> Result<AnalysisConfig> {
    let mut config = match path {
        Some(p) => read(p)?,
        None => match default_config_path() {
            Ok(p) if p.exists() => read(&p)?,
            Ok(p) => {
                debug!(config_path = %p.display(), "config file not found, using defaults");
                AnalysisConfig::default()
            }
            Err(e) => {
                debug!(error = %e, "no config directory, using defaults");
                AnalysisConfig::default()
            }
        },
    };
    config.apply_env();
    Ok(config)
}

fn read(path: &Path) -> Result<AnalysisConfig> {
    debug!(config_path = %path.display(), "loading config");
    AnalysisConfig::load(path)
        .with_context(|| format!("failed to load config: {}", path.display()))
}
