// SPDX-License-Identifier: MPL-2.0

//! Camera backend abstraction
//!
//! The capture flow only talks to the camera through three narrow traits:
//!
//! ```text
//! ┌──────────────────────┐
//! │  CaptureCoordinator  │
//! └──────────┬───────────┘
//!            │
//!     ┌──────┴───────┬────────────────┐
//!     ▼              ▼                ▼
//! ┌──────────┐ ┌──────────────┐ ┌──────────────┐
//! │ Camera   │ │ StillCapture │ │PreviewSurface│
//! │ Provider │ │  (use case)  │ │  (display)   │
//! └──────────┘ └──────────────┘ └──────────────┘
//! ```
//!
//! [`SyntheticCamera`] implements the provider and still capture in-process.

pub mod synthetic;
pub mod types;

pub use synthetic::{CaptureSurface, SyntheticCamera};
pub use types::*;

use futures::future::BoxFuture;
use std::sync::Arc;

/// Display surface a preview feed renders into
pub trait PreviewSurface: Send + Sync {
    /// Start rendering the feed of a binding
    fn attach(&self, binding: BindingId);

    /// Stop rendering
    fn detach(&self);

    /// Binding currently rendered, if any
    fn attached(&self) -> Option<BindingId>;
}

/// Process-wide camera provider that owns use-case bindings
pub trait CameraProvider: Send + Sync {
    /// Resolves once the provider can accept bindings
    fn wait_ready(&self) -> BoxFuture<'_, BackendResult<()>>;

    /// Release every binding and detach their surfaces
    fn unbind_all(&self);

    /// Bind use cases to a camera
    ///
    /// # Returns
    /// * `Ok(BindingId)` - Binding is active; the preview renders to `surface`
    /// * `Err(BackendError)` - The camera or the use-case combination was rejected
    fn bind(
        &self,
        selector: CameraSelector,
        use_cases: &[UseCase],
        surface: Arc<dyn PreviewSurface>,
    ) -> BackendResult<BindingId>;

    /// Number of active bindings
    fn active_bindings(&self) -> usize;
}

/// Still image capture use case
///
/// Called on the capture worker, never on the UI context.
pub trait StillCapture: Send + Sync {
    fn capture_still(&self) -> BackendResult<CapturedImage>;
}
