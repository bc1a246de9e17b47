//! Notification types delivered by the host editor
//!
//! Notifications carry no payload beyond "something changed"; the variants
//! only exist so hosts can report what they observed and logs can say so.

/// One of the three independent change sources the gutter listens to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    /// Document text changes
    Document,
    /// Caret movement
    Caret,
    /// Host component geometry and visibility
    Geometry,
}

impl Channel {
    pub const ALL: [Channel; 3] = [Channel::Document, Channel::Caret, Channel::Geometry];
}

/// Kind of document edit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentChange {
    Inserted,
    Removed,
    /// Attribute or bulk replacement of content
    Replaced,
}

/// Kind of host geometry change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeometryChange {
    Resized,
    Moved,
    Shown,
    Hidden,
}

/// A change reported by the host editor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notification {
    Document(DocumentChange),
    CaretMoved,
    Geometry(GeometryChange),
}

impl Notification {
    /// The channel this notification is delivered on
    pub fn channel(&self) -> Channel {
        match self {
            Notification::Document(_) => Channel::Document,
            Notification::CaretMoved => Channel::Caret,
            Notification::Geometry(_) => Channel::Geometry,
        }
    }
}
