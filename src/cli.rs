//! Command-line argument parsing for the `line-gutter` preview tool
//!
//! Renders the gutter of a text file into a PNG and optionally dumps the
//! labels of the visible rows as JSON.

use clap::Parser;
use std::path::PathBuf;

use crate::config::{FontSource, GutterConfig};

/// Render the line-number gutter of a text file
#[derive(Parser, Debug)]
#[command(
    name = "line-gutter",
    version,
    about = "Render the line-number gutter of a text file"
)]
pub struct CliArgs {
    /// Text file to number
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Output PNG path
    #[arg(short, long, value_name = "PNG", default_value = "gutter.png")]
    pub out: PathBuf,

    /// Font file (.ttf/.otf) registered under the gutter's font family
    #[arg(long, value_name = "PATH")]
    pub font: Option<PathBuf>,

    /// Font family (overrides the configuration)
    #[arg(long)]
    pub family: Option<String>,

    /// Font size in points (overrides the configuration)
    #[arg(long, value_name = "PT")]
    pub size: Option<i32>,

    /// Theme id (overrides the configuration)
    #[arg(long)]
    pub theme: Option<String>,

    /// Wrap lines at N characters
    #[arg(long, value_name = "N")]
    pub wrap: Option<usize>,

    /// Height of the rendered viewport in pixels (default: whole document)
    #[arg(long, value_name = "PX")]
    pub height: Option<u32>,

    /// Vertical scroll offset of the viewport in pixels
    #[arg(long, value_name = "PX", default_value_t = 0)]
    pub scroll: u32,

    /// Put the caret on line N (1-indexed)
    #[arg(long, value_name = "N")]
    pub caret_line: Option<usize>,

    /// Print the visible labels as JSON to stdout
    #[arg(long)]
    pub labels: bool,

    /// Configuration file (default: ~/.config/line-gutter/config.yaml)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

/// What to render, derived from CLI arguments
#[derive(Debug, Clone, PartialEq)]
pub struct PreviewConfig {
    pub file: PathBuf,
    pub out: PathBuf,
    pub wrap_columns: Option<usize>,
    pub viewport_height: Option<u32>,
    pub scroll_y: u32,
    /// 0-indexed caret line
    pub caret_line: Option<usize>,
    pub print_labels: bool,
}

impl CliArgs {
    /// Validate arguments and split them into the preview settings
    pub fn into_config(self) -> Result<PreviewConfig, String> {
        if self.wrap == Some(0) {
            return Err("--wrap must be at least 1".to_string());
        }
        if self.height == Some(0) {
            return Err("--height must be at least 1".to_string());
        }
        if self.caret_line == Some(0) {
            return Err("--caret-line is 1-indexed".to_string());
        }

        Ok(PreviewConfig {
            file: self.file,
            out: self.out,
            wrap_columns: self.wrap,
            viewport_height: self.height,
            scroll_y: self.scroll,
            // Convert from 1-indexed (user input) to 0-indexed (internal)
            caret_line: self.caret_line.map(|line| line - 1),
            print_labels: self.labels,
        })
    }

    /// Apply font and theme overrides on top of the loaded configuration
    pub fn apply_overrides(&self, config: &mut GutterConfig) {
        if let Some(family) = &self.family {
            config.font_family = family.clone();
        }
        if let Some(size) = self.size {
            config.font_size = size;
        }
        if let Some(theme) = &self.theme {
            config.theme = theme.clone();
        }
        if let Some(path) = &self.font {
            config.fonts.push(FontSource {
                family: config.font_family.clone(),
                path: path.clone(),
            });
        }
    }
}
