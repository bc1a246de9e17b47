//! Coalescing repaint queue
//!
//! The host holds one [`Notifier`] per channel and calls it from its own
//! event handlers. Notifiers never paint: they only record that a resize
//! and/or repaint is due. The widget drains the queue at the next idle point
//! of the UI thread, so a burst of notifications results in one repaint.

use std::cell::Cell;
use std::rc::Rc;

use crate::messages::{Channel, GeometryChange, Notification};

/// How many render-triggered resizes may schedule a follow-up repaint in a
/// row before the queue stops scheduling them. Only document edits and caret
/// moves renew the budget; geometry changes are often the host's reaction to
/// the gutter's own resize.
pub const MAX_SELF_CORRECTIONS: u8 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RepaintState {
    #[default]
    Idle,
    RepaintScheduled,
}

/// Shared between the widget and the notifiers it hands to the host
#[derive(Debug, Default)]
pub struct RepaintQueue {
    state: Cell<RepaintState>,
    resize_pending: Cell<bool>,
    active: Cell<bool>,
    self_corrections: Cell<u8>,
    coalesced: Cell<u64>,
}

impl RepaintQueue {
    pub fn new(active: bool) -> Rc<Self> {
        let queue = Self::default();
        queue.active.set(active);
        Rc::new(queue)
    }

    pub fn state(&self) -> RepaintState {
        self.state.get()
    }

    pub fn is_active(&self) -> bool {
        self.active.get()
    }

    /// Inactive queues ignore notifications but still accept widget requests
    pub fn set_active(&self, active: bool) {
        self.active.set(active);
        if !active {
            self.resize_pending.set(false);
        }
    }

    /// Queue a deferred repaint. Returns false if one was already pending.
    pub fn schedule(&self) -> bool {
        match self.state.get() {
            RepaintState::Idle => {
                self.state.set(RepaintState::RepaintScheduled);
                true
            }
            RepaintState::RepaintScheduled => {
                self.coalesced.set(self.coalesced.get() + 1);
                false
            }
        }
    }

    /// Queue a size update followed by a repaint
    pub fn schedule_resize(&self) {
        self.resize_pending.set(true);
        self.schedule();
    }

    /// Number of repaint requests folded into an already pending repaint
    pub fn coalesced_count(&self) -> u64 {
        self.coalesced.get()
    }

    pub fn is_resize_pending(&self) -> bool {
        self.resize_pending.get()
    }

    pub(crate) fn handle(&self, notification: Notification) {
        if !self.active.get() {
            tracing::trace!(?notification, "gutter disabled, ignoring notification");
            return;
        }

        match notification {
            Notification::Document(_) => {
                self.self_corrections.set(0);
                self.schedule();
            }
            Notification::CaretMoved => {
                self.self_corrections.set(0);
                self.schedule_resize();
            }
            Notification::Geometry(GeometryChange::Resized)
            | Notification::Geometry(GeometryChange::Moved)
            | Notification::Geometry(GeometryChange::Shown) => self.schedule_resize(),
            Notification::Geometry(GeometryChange::Hidden) => {}
        }
    }

    /// Consume a pending repaint, returning the queue to `Idle`
    pub(crate) fn take_repaint(&self) -> bool {
        self.state.replace(RepaintState::Idle) == RepaintState::RepaintScheduled
    }

    pub(crate) fn take_resize(&self) -> bool {
        self.resize_pending.replace(false)
    }

    /// Record a render-triggered resize; false once the budget is spent
    pub(crate) fn try_self_correct(&self) -> bool {
        let used = self.self_corrections.get();
        if used >= MAX_SELF_CORRECTIONS {
            return false;
        }
        self.self_corrections.set(used + 1);
        true
    }

    pub(crate) fn corrections_exhausted(&self) -> bool {
        self.self_corrections.get() >= MAX_SELF_CORRECTIONS
    }

    /// A paint pass ended with an unchanged width
    pub(crate) fn settle(&self) {
        self.self_corrections.set(0);
    }
}

/// Handle registered with the host editor for one channel
#[derive(Debug, Clone)]
pub struct Notifier {
    channel: Channel,
    queue: Rc<RepaintQueue>,
}

impl Notifier {
    pub fn new(channel: Channel, queue: Rc<RepaintQueue>) -> Self {
        Self { channel, queue }
    }

    pub fn channel(&self) -> Channel {
        self.channel
    }

    /// Report a change. Never blocks and never paints.
    pub fn notify(&self, notification: Notification) {
        if notification.channel() != self.channel {
            tracing::warn!(
                ?notification,
                channel = ?self.channel,
                "notification delivered on the wrong channel, ignoring"
            );
            return;
        }
        self.queue.handle(notification);
    }
}
