//! Command types for the Elm-style architecture
//!
//! Commands represent side effects the host should perform after the gutter
//! handled a notification or finished a paint pass.

use crate::view::Size;

/// Side effects requested by the gutter
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Cmd {
    /// No command - do nothing
    #[default]
    None,
    /// The gutter's preferred size changed; the container should re-layout
    Resize(Size),
    /// Repaint the gutter's visible region
    Redraw,
    /// Execute multiple commands
    Batch(Vec<Cmd>),
}

impl Cmd {
    /// Combine commands, dropping `None` and flattening single entries
    pub fn batch(cmds: Vec<Cmd>) -> Self {
        let mut cmds: Vec<Cmd> = cmds.into_iter().filter(|c| !c.is_none()).collect();
        match cmds.len() {
            0 => Cmd::None,
            1 => cmds.remove(0),
            _ => Cmd::Batch(cmds),
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Cmd::None)
    }

    /// Whether this command (or any command in a batch) requests a repaint
    pub fn needs_redraw(&self) -> bool {
        match self {
            Cmd::Redraw => true,
            Cmd::Batch(cmds) => cmds.iter().any(|c| c.needs_redraw()),
            _ => false,
        }
    }

    /// The last resize requested by this command, if any
    pub fn resize(&self) -> Option<Size> {
        match self {
            Cmd::Resize(size) => Some(*size),
            Cmd::Batch(cmds) => cmds.iter().rev().find_map(|c| c.resize()),
            _ => None,
        }
    }
}
