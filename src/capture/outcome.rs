// SPDX-License-Identifier: GPL-3.0-only

//! Capture outcomes and how they reach the user

use crate::app::notifications::{Notification, UiHandle};
use crate::destination::DestinationSelection;
use crate::errors::CaptureFailure;
use crate::storage::{MediaRecord, ProviderUri};
use std::path::{Path, PathBuf};
use tracing::{error, info};

/// Where a successful capture was stored
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SavedLocation {
    File(PathBuf),
    Media(MediaRecord),
}

impl SavedLocation {
    /// Filesystem path of the stored image
    pub fn path(&self) -> &Path {
        match self {
            SavedLocation::File(path) => path,
            SavedLocation::Media(record) => &record.path,
        }
    }
}

/// Details of a stored capture
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedOutput {
    pub request_id: u64,
    pub destination: DestinationSelection,
    pub location: SavedLocation,
    pub provider_uri: Option<ProviderUri>,
    /// Encoded size in bytes
    pub size: usize,
}

/// Result of exactly one capture request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureOutcome {
    Success(SavedOutput),
    Failure(CaptureFailure),
}

impl CaptureOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, CaptureOutcome::Success(_))
    }

    pub fn saved(&self) -> Option<&SavedOutput> {
        match self {
            CaptureOutcome::Success(saved) => Some(saved),
            CaptureOutcome::Failure(_) => None,
        }
    }
}

/// Turns outcomes into log lines and user notifications
///
/// Runs on the capture worker; notifications are posted to the UI context
/// rather than shown directly.
#[derive(Debug, Clone)]
pub struct OutcomeReporter {
    ui: UiHandle,
}

impl OutcomeReporter {
    pub fn new(ui: UiHandle) -> Self {
        Self { ui }
    }

    /// Called once per capture when it completes
    pub fn on_capture_outcome(&self, outcome: &CaptureOutcome) {
        match outcome {
            CaptureOutcome::Success(saved) => {
                info!(
                    request = saved.request_id,
                    destination = %saved.destination,
                    path = %saved.location.path().display(),
                    uri = ?saved.provider_uri.as_ref().map(|u| u.to_string()),
                    "Image saved successfully"
                );
                self.ui.post(Notification::capture_succeeded());
            }
            CaptureOutcome::Failure(failure) => {
                error!(error = %failure, "Image capture failed");
                self.ui.post(Notification::capture_failed());
            }
        }
    }
}
