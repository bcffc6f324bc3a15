// SPDX-License-Identifier: GPL-3.0-only

//! Camera screen controller
//!
//! Opening the screen runs the permission gate first. Only a granted camera
//! capability leads to storage setup, the capture coordinator and the preview
//! binding; a denial posts one notification and stops there.

pub mod notifications;
pub mod state;
pub mod view;

pub use notifications::{Notification, NotificationKind, UiContext, UiHandle};
pub use state::SelectionState;

use crate::backends::camera::{CameraProvider, PreviewSurface, StillCapture};
use crate::capture::{CaptureCoordinator, CaptureTicket, CoordinatorParts, OutcomeReporter};
use crate::config::Config;
use crate::destination::DestinationSelection;
use crate::errors::{AppError, AppResult, BindingError};
use crate::permissions::{Capability, PermissionGate};
use crate::pipelines::photo::PhotoPipeline;
use crate::storage::MediaStore;
use std::sync::Arc;
use tracing::{info, warn};

/// External collaborators the screen is wired to
pub struct ScreenCollaborators {
    pub gate: PermissionGate,
    pub provider: Arc<dyn CameraProvider>,
    pub still: Arc<dyn StillCapture>,
    pub media_store: Arc<dyn MediaStore>,
    pub surface: Arc<dyn PreviewSurface>,
}

/// The single camera screen
pub struct CameraScreen {
    config: Config,
    selection: SelectionState,
    coordinator: CaptureCoordinator,
    surface: Arc<dyn PreviewSurface>,
    preview_error: Option<BindingError>,
}

impl CameraScreen {
    /// Gate on the camera capability, then bring up preview and capture
    ///
    /// # Returns
    /// * `Ok(CameraScreen)` - Capability granted; the preview may still be
    ///   absent if binding failed (see [`CameraScreen::preview_error`])
    /// * `Err(AppError::PermissionDenied)` - Nothing was initialized
    pub async fn open(
        config: Config,
        parts: ScreenCollaborators,
        ui: &UiContext,
    ) -> AppResult<Self> {
        let outcome = parts.gate.ensure_capability(Capability::Camera).await;
        if !outcome.is_granted() {
            ui.handle().post(Notification::permission_required());
            return Err(AppError::PermissionDenied(Capability::Camera));
        }

        config.storage.ensure_dirs()?;

        let mut coordinator = CaptureCoordinator::new(CoordinatorParts {
            provider: parts.provider,
            still: parts.still,
            pipeline: PhotoPipeline::new(config.quality, parts.media_store),
            layout: config.storage.clone(),
            provider_authority: config.provider_authority.clone(),
            selector: config.camera,
            reporter: OutcomeReporter::new(ui.handle()),
        })?;

        let preview_error = match coordinator.initialize_preview(parts.surface.clone()).await {
            Ok(_) => None,
            Err(e) => {
                warn!(error = %e, "Continuing without live preview");
                Some(e)
            }
        };

        info!(
            files = %config.storage.files_dir.display(),
            destination = %config.initial_destination,
            "Camera screen open"
        );

        Ok(Self {
            selection: SelectionState::new(config.initial_destination),
            config,
            coordinator,
            surface: parts.surface,
            preview_error,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    /// Mutable selection for picker widgets
    pub fn selection_mut(&mut self) -> &mut SelectionState {
        &mut self.selection
    }

    pub fn select_destination(&mut self, destination: DestinationSelection) {
        self.selection.select(destination);
    }

    /// Shutter pressed
    pub fn capture(&mut self) -> AppResult<CaptureTicket> {
        self.coordinator.trigger_capture(&self.selection)
    }

    pub fn has_live_preview(&self) -> bool {
        self.surface.attached().is_some()
    }

    /// Why the preview is missing, if it is
    pub fn preview_error(&self) -> Option<&BindingError> {
        self.preview_error.as_ref()
    }

    /// Tear down: release the camera and stop the capture worker
    pub fn close(mut self) {
        self.coordinator.shutdown();
        info!("Camera screen closed");
    }
}

impl std::fmt::Debug for CameraScreen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CameraScreen")
            .field("selection", &self.selection)
            .field("coordinator", &self.coordinator)
            .field("preview_error", &self.preview_error)
            .finish()
    }
}
