//! Line-number gutter for text views
//!
//! This crate provides a gutter widget that numbers the logical lines of a
//! host text view, highlights the caret's line, and keeps its own width in
//! step with the widest number it shows. The host reports changes through
//! per-channel notifiers and receives Elm-style commands back.

pub mod cli;
pub mod commands;
pub mod config;
pub mod config_paths;
pub mod error;
pub mod font;
pub mod gutter;
pub mod host;
pub mod messages;
pub mod model;
pub mod schedule;
pub mod theme;
pub mod tracing;
pub mod view;

// Re-export commonly used types
pub use commands::Cmd;
pub use config::GutterConfig;
pub use error::{GutterError, Result};
pub use font::{FontHandle, FontSpec, FontSystem, FontdueFonts};
pub use gutter::{GutterOptions, GutterWidget, LineLabel};
pub use host::{EditorHost, EditorRef, LineIndexer, MetricsProvider};
pub use messages::{Channel, Notification};
pub use model::TextView;
pub use schedule::{Notifier, RepaintState};
pub use theme::{Color, GutterPalette, Theme};
pub use view::{Canvas, Frame, FramePainter, Rect, Size};
