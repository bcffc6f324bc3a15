// SPDX-License-Identifier: MPL-2.0

//! Shutter - camera preview and photo capture with selectable destinations
//!
//! A captured photo can be written to one of four places: a fixed file in
//! the app's private storage, the shared media collection, a private file
//! shared through a provider URI, or a uniquely named temporary file.
//!
//! # Architecture
//!
//! - [`app`]: camera screen controller, selection state and notifications
//! - [`permissions`]: capability gate run before the screen opens
//! - [`capture`]: capture requests, outcomes, worker thread and coordinator
//! - [`backends`]: camera provider / still capture / preview surface traits
//! - [`pipelines`]: JPEG encoding and destination writing
//! - [`storage`]: storage layout, media store and provider URIs
//! - [`destination`]: the destination enumeration
//! - [`config`]: runtime settings
//!
//! # Example
//!
//! ```no_run
//! # async fn demo() -> shutter::errors::AppResult<()> {
//! use shutter::app::{CameraScreen, ScreenCollaborators, UiContext};
//! use shutter::backends::camera::{CaptureSurface, SyntheticCamera};
//! use shutter::permissions::{AutoPrompt, PermissionGate, StaticCapabilityProvider};
//! use shutter::storage::LocalMediaStore;
//! use shutter::{Config, DestinationSelection};
//! use std::sync::Arc;
//!
//! let config = Config::with_root("/tmp/shutter");
//! let camera = SyntheticCamera::new();
//! let ui = UiContext::new();
//! let mut screen = CameraScreen::open(
//!     config.clone(),
//!     ScreenCollaborators {
//!         gate: PermissionGate::new(
//!             Arc::new(StaticCapabilityProvider::granted()),
//!             Arc::new(AutoPrompt(true)),
//!         ),
//!         provider: Arc::new(camera.clone()),
//!         still: Arc::new(camera),
//!         media_store: Arc::new(LocalMediaStore::new(&config.storage.media_root)),
//!         surface: Arc::new(CaptureSurface::new()),
//!     },
//!     &ui,
//! )
//! .await?;
//!
//! screen.select_destination(DestinationSelection::MediaLibrary);
//! let outcome = screen.capture()?.await;
//! assert!(outcome.is_success());
//! # Ok(())
//! # }
//! ```

pub mod app;
pub mod backends;
pub mod capture;
pub mod config;
pub mod constants;
pub mod destination;
pub mod errors;
pub mod permissions;
pub mod pipelines;
pub mod storage;

// Re-export commonly used types
pub use app::{CameraScreen, SelectionState};
pub use capture::{CaptureOutcome, CaptureTicket};
pub use config::Config;
pub use destination::DestinationSelection;
pub use errors::{AppError, AppResult};
