// SPDX-License-Identifier: GPL-3.0-only

//! Text rendering of the camera screen controls

use super::state::SelectionState;
use crate::app::notifications::{Notification, NotificationKind};

/// Label of the shutter button
pub const CAPTURE_BUTTON_LABEL: &str = "Capture Image";

/// One line per destination radio button
pub fn destination_picker(state: &SelectionState) -> Vec<String> {
    state
        .options()
        .map(|(destination, label, selected)| {
            let mark = if selected { "(•)" } else { "( )" };
            format!("{} {:<24} [{}]", mark, label, destination.cli_name())
        })
        .collect()
}

/// Single-line toast
pub fn notification_line(notification: &Notification) -> String {
    let prefix = match notification.kind {
        NotificationKind::Info => "✓",
        NotificationKind::Error => "✗",
    };
    format!("{} {}", prefix, notification.message)
}
