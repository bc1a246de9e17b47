//! Gutter configuration
//!
//! Read from `~/.config/line-gutter/config.yaml`. Every field has a default so
//! a partial file (or no file at all) is always usable.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::font::{DEFAULT_FONT_FAMILY, DEFAULT_FONT_SIZE_PT};

/// Gutter configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GutterConfig {
    /// Show line numbers at all
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Font family used for the numbers
    #[serde(default = "default_font_family")]
    pub font_family: String,

    /// Font size in points
    #[serde(default = "default_font_size")]
    pub font_size: i32,

    /// Theme id (e.g., "classic", "default-dark")
    #[serde(default = "default_theme")]
    pub theme: String,

    /// Horizontal inset of the labels from the gutter's left edge, in pixels
    #[serde(default = "default_left_inset")]
    pub left_inset: i32,

    /// Antialiasing for measuring and drawing; `None` follows the platform
    #[serde(default)]
    pub antialias: Option<bool>,

    /// Font files to register with the font system, keyed by family
    #[serde(default)]
    pub fonts: Vec<FontSource>,
}

/// A font file made available under a family name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FontSource {
    pub family: String,
    pub path: std::path::PathBuf,
}

fn default_enabled() -> bool {
    true
}

fn default_font_family() -> String {
    DEFAULT_FONT_FAMILY.to_string()
}

fn default_font_size() -> i32 {
    DEFAULT_FONT_SIZE_PT
}

fn default_theme() -> String {
    "classic".to_string()
}

fn default_left_inset() -> i32 {
    2
}

/// Platform antialiasing policy: on for macOS and Windows, off elsewhere
pub fn platform_antialias() -> bool {
    cfg!(any(target_os = "macos", target_os = "windows"))
}

impl Default for GutterConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            font_family: default_font_family(),
            font_size: default_font_size(),
            theme: default_theme(),
            left_inset: default_left_inset(),
            antialias: None,
            fonts: Vec::new(),
        }
    }
}

impl GutterConfig {
    /// Load config from the user config directory, or return defaults
    pub fn load() -> Self {
        let Some(path) = crate::config_paths::config_file() else {
            tracing::debug!("No config directory available, using defaults");
            return Self::default();
        };
        Self::load_from(&path)
    }

    /// Load config from a specific file, falling back to defaults on any error
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            tracing::debug!(
                "Config file not found at {}, using defaults",
                path.display()
            );
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => match Self::from_yaml(&content) {
                Ok(config) => {
                    tracing::info!("Loaded config from {}", path.display());
                    config
                }
                Err(e) => {
                    tracing::warn!("Failed to parse config at {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!("Failed to read config at {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn from_yaml(yaml: &str) -> Result<Self, String> {
        serde_yaml::from_str(yaml).map_err(|e| format!("YAML parse error: {}", e))
    }

    /// Write config to a file, creating the parent directory if needed
    pub fn save_to(&self, path: &Path) -> Result<(), String> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create config directory: {}", e))?;
        }

        let content = serde_yaml::to_string(self)
            .map_err(|e| format!("Failed to serialize config: {}", e))?;

        std::fs::write(path, content)
            .map_err(|e| format!("Failed to write config to {}: {}", path.display(), e))?;

        tracing::info!("Saved config to {}", path.display());
        Ok(())
    }

    /// Effective antialiasing policy
    pub fn antialias(&self) -> bool {
        self.antialias.unwrap_or_else(platform_antialias)
    }

    /// Resolve the configured theme, falling back to the classic colors
    pub fn theme(&self) -> crate::theme::Theme {
        match crate::theme::load_theme(&self.theme) {
            Ok(theme) => theme,
            Err(e) => {
                tracing::warn!("Failed to load theme '{}': {}, using classic", self.theme, e);
                crate::theme::Theme::classic()
            }
        }
    }
}
