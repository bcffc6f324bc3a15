// SPDX-License-Identifier: GPL-3.0-only

//! Short, non-blocking user notifications
//!
//! Any thread may post through a [`UiHandle`]; only the UI-owning context
//! reads them from its [`UiContext`].

use crate::constants::messages;
use tokio::sync::mpsc;
use tracing::debug;

/// How long a notification stays visible
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationDuration {
    Short,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Info,
    Error,
}

/// One toast-style message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
    pub duration: NotificationDuration,
}

impl Notification {
    pub fn short(kind: NotificationKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            duration: NotificationDuration::Short,
        }
    }

    pub fn capture_succeeded() -> Self {
        Self::short(NotificationKind::Info, messages::CAPTURE_SUCCEEDED)
    }

    pub fn capture_failed() -> Self {
        Self::short(NotificationKind::Error, messages::CAPTURE_FAILED)
    }

    pub fn permission_required() -> Self {
        Self::short(NotificationKind::Error, messages::PERMISSION_REQUIRED)
    }
}

/// Sending side, cloned into background work
#[derive(Debug, Clone)]
pub struct UiHandle {
    sender: mpsc::UnboundedSender<Notification>,
}

impl UiHandle {
    /// Queue a notification for the UI context
    ///
    /// Dropped silently once the UI context is gone.
    pub fn post(&self, notification: Notification) {
        if self.sender.send(notification).is_err() {
            debug!("UI context closed, notification dropped");
        }
    }
}

/// Receiving side, owned by the UI context
#[derive(Debug)]
pub struct UiContext {
    sender: mpsc::UnboundedSender<Notification>,
    receiver: mpsc::UnboundedReceiver<Notification>,
}

impl UiContext {
    pub fn new() -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        Self { sender, receiver }
    }

    pub fn handle(&self) -> UiHandle {
        UiHandle {
            sender: self.sender.clone(),
        }
    }

    /// Everything posted so far, without waiting
    pub fn drain(&mut self) -> Vec<Notification> {
        let mut pending = Vec::new();
        while let Ok(notification) = self.receiver.try_recv() {
            pending.push(notification);
        }
        pending
    }

    /// Wait for the next notification
    pub async fn next(&mut self) -> Option<Notification> {
        self.receiver.recv().await
    }
}

impl Default for UiContext {
    fn default() -> Self {
        Self::new()
    }
}
