// SPDX-License-Identifier: GPL-3.0-only

//! CLI commands for the capture flow
//!
//! This module provides command-line functionality for:
//! - Listing the output destinations
//! - Running the permission → preview → capture flow on the synthetic camera

use shutter::app::view::{CAPTURE_BUTTON_LABEL, destination_picker, notification_line};
use shutter::app::{CameraScreen, ScreenCollaborators, SelectionState, UiContext};
use shutter::backends::camera::{CameraSelector, CaptureSurface, SyntheticCamera};
use shutter::capture::CaptureOutcome;
use shutter::errors::AppError;
use shutter::permissions::{
    AutoPrompt, CapabilityProvider, DeviceNodeCapability, PermissionGate,
    StaticCapabilityProvider,
};
use shutter::pipelines::photo::EncodingQuality;
use shutter::storage::LocalMediaStore;
use shutter::{Config, DestinationSelection};
use std::path::PathBuf;
use std::sync::Arc;

/// Options of the `capture` command
pub struct CaptureArgs {
    pub destination: DestinationSelection,
    pub count: usize,
    pub root: Option<PathBuf>,
    pub front: bool,
    pub source_image: Option<PathBuf>,
    pub quality: EncodingQuality,
    pub deny_permission: bool,
    pub check_devices: bool,
}

/// Print the destination picker
pub fn list_destinations(selected: DestinationSelection) -> Result<(), Box<dyn std::error::Error>> {
    let state = SelectionState::new(selected);
    println!("Destinations:");
    println!();
    for line in destination_picker(&state) {
        println!("  {}", line);
    }
    Ok(())
}

/// Open the camera screen and take `count` photos back to back
pub fn capture(args: CaptureArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = match &args.root {
        Some(root) => Config::with_root(root),
        None => Config::default(),
    };
    config.quality = args.quality;
    config.initial_destination = args.destination;
    if args.front {
        config.camera = CameraSelector::Front;
    }

    let camera = match &args.source_image {
        Some(path) => SyntheticCamera::from_image(path)?,
        None => SyntheticCamera::new(),
    };

    let capability: Arc<dyn CapabilityProvider> = if args.deny_permission {
        Arc::new(StaticCapabilityProvider::denied())
    } else if args.check_devices {
        Arc::new(DeviceNodeCapability::new())
    } else {
        Arc::new(StaticCapabilityProvider::granted())
    };

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(run_capture(config, camera, capability, args.count))
}

async fn run_capture(
    config: Config,
    camera: SyntheticCamera,
    capability: Arc<dyn CapabilityProvider>,
    count: usize,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut ui = UiContext::new();
    let parts = ScreenCollaborators {
        gate: PermissionGate::new(capability, Arc::new(AutoPrompt(true))),
        provider: Arc::new(camera.clone()),
        still: Arc::new(camera),
        media_store: Arc::new(LocalMediaStore::new(&config.storage.media_root)),
        surface: Arc::new(CaptureSurface::new()),
    };

    let mut screen = match CameraScreen::open(config, parts, &ui).await {
        Ok(screen) => screen,
        // The denial notification is the whole report
        Err(AppError::PermissionDenied(_)) => {
            print_notifications(&mut ui);
            return Ok(());
        }
        Err(e) => {
            print_notifications(&mut ui);
            return Err(e.into());
        }
    };

    println!(
        "Saving under {}",
        screen.config().storage.files_dir.display()
    );

    if let Some(err) = screen.preview_error() {
        println!("Preview unavailable: {}", err);
    }

    for line in destination_picker(screen.selection()) {
        println!("  {}", line);
    }
    println!();

    // Fire all captures before waiting on any of them
    let mut tickets = Vec::with_capacity(count);
    for _ in 0..count {
        println!("[{}]", CAPTURE_BUTTON_LABEL);
        tickets.push(screen.capture()?);
    }

    for ticket in tickets {
        let request = ticket.request_id();
        match ticket.await {
            CaptureOutcome::Success(saved) => {
                println!("#{} saved: {}", request, saved.location.path().display());
                if let Some(uri) = &saved.provider_uri {
                    println!("#{} shared as: {}", request, uri);
                }
            }
            CaptureOutcome::Failure(failure) => {
                println!("#{} failed: {}", request, failure);
            }
        }
    }

    screen.close();
    print_notifications(&mut ui);
    Ok(())
}

fn print_notifications(ui: &mut UiContext) {
    for notification in ui.drain() {
        println!("{}", notification_line(&notification));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn denied_permission_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::with_root(dir.path());
        let files_dir = config.storage.files_dir.clone();
        let camera = SyntheticCamera::new();

        let result = run_capture(
            config,
            camera.clone(),
            Arc::new(StaticCapabilityProvider::denied()),
            1,
        )
        .await;

        assert!(result.is_ok());
        assert_eq!(camera.frames_captured(), 0);
        assert!(!files_dir.exists());
    }

    #[tokio::test]
    async fn granted_capture_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::with_root(dir.path());
        let files_dir = config.storage.files_dir.clone();

        run_capture(
            config,
            SyntheticCamera::new().with_frame_size(16, 16),
            Arc::new(StaticCapabilityProvider::granted()),
            1,
        )
        .await
        .unwrap();

        assert!(files_dir.join(shutter::constants::CAPTURED_IMAGE_NAME).exists());
    }
}
