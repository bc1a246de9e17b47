//! Centralized configuration paths for line-gutter
//!
//! All config files live under:
//! - Unix/macOS: `~/.config/line-gutter/`
//! - Windows: `%APPDATA%\line-gutter\`

use std::{
    env, fs,
    path::{Path, PathBuf},
};

const APP_DIR: &str = "line-gutter";

/// Base config directory for line-gutter
///
/// Unix/macOS:
///   - If XDG_CONFIG_HOME is set: `$XDG_CONFIG_HOME/line-gutter`
///   - Else: `~/.config/line-gutter`
///
/// Windows:
///   - `%APPDATA%\line-gutter`
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

/// `~/.config/line-gutter/themes/`
pub fn themes_dir() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("themes"))
}

/// `~/.config/line-gutter/config.yaml`
pub fn config_file() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("config.yaml"))
}

/// `~/.config/line-gutter/fonts/`, scanned for `.ttf`/`.otf` faces that
/// become available by file stem as gutter font families
pub fn fonts_dir() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("fonts"))
}

/// `~/.config/line-gutter/logs/`
pub fn logs_dir() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("logs"))
}

fn ensure_dir(path: &Path) -> Result<(), String> {
    fs::create_dir_all(path)
        .map_err(|e| format!("Failed to create directory {}: {}", path.display(), e))
}

/// Ensure logs dir exists, returning it
pub fn ensure_logs_dir() -> Result<PathBuf, String> {
    let logs = logs_dir().ok_or_else(|| "No config directory available".to_string())?;
    ensure_dir(&logs)?;
    Ok(logs)
}
