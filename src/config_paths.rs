//! Configuration paths for structure-outline
//!
//! All files live under:
//! - Unix/macOS: `~/.config/structure-outline/`
//! - Windows: `%APPDATA%\structure-outline\`

use std::{
    env, fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};

const APP_DIR: &str = "structure-outline";

/// Base config directory
///
/// Unix/macOS:
///   - If XDG_CONFIG_HOME is set: `$XDG_CONFIG_HOME/structure-outline`
///   - Else: `~/.config/structure-outline`
///
/// Windows:
///   - `%APPDATA%\structure-outline`
pub fn config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        env::var("APPDATA")
            .ok()
            .map(|appdata| PathBuf::from(appdata).join(APP_DIR))
    }

    #[cfg(not(target_os = "windows"))]
    {
        env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| dirs::home_dir().map(|h| h.join(".config")))
            .map(|config| config.join(APP_DIR))
    }
}

/// `~/.config/structure-outline/config.yaml`
pub fn config_file() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("config.yaml"))
}

/// `~/.config/structure-outline/logs/`
pub fn logs_dir() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("logs"))
}

fn ensure_dir(path: &Path) -> Result<()> {
    fs::create_dir_all(path)
        .with_context(|| format!("Failed to create directory {}", path.display()))
}

/// Ensure the logs dir exists, returning it
pub fn ensure_logs_dir() -> Result<PathBuf> {
    let logs = logs_dir().context("No config directory available")?;
    ensure_dir(&logs)?;
    Ok(logs)
}
