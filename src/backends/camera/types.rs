// SPDX-License-Identifier: GPL-3.0-only
// Shared types for camera backend abstraction

//! Shared types for camera backends

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;

/// Which physical camera to bind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CameraSelector {
    /// Rear-facing camera
    #[default]
    Back,
    /// User-facing camera
    Front,
}

impl std::fmt::Display for CameraSelector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CameraSelector::Back => write!(f, "back"),
            CameraSelector::Front => write!(f, "front"),
        }
    }
}

/// Use cases bound together to one camera
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UseCase {
    /// Live feed rendered to a surface
    Preview,
    /// Still image capture
    ImageCapture,
}

/// Identifier of one active binding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BindingId(pub u64);

impl std::fmt::Display for BindingId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "binding#{}", self.0)
    }
}

/// Still frame produced by a camera, packed RGB8
#[derive(Debug, Clone)]
pub struct CapturedImage {
    pub width: u32,
    pub height: u32,
    /// Row-major RGB bytes, `width * height * 3` long
    pub data: Arc<[u8]>,
    /// Which camera produced it
    pub selector: CameraSelector,
    pub captured_at: Instant,
}

impl CapturedImage {
    /// Wrap an RGB buffer, checking its length
    pub fn from_rgb(
        width: u32,
        height: u32,
        data: Vec<u8>,
        selector: CameraSelector,
    ) -> BackendResult<Self> {
        let expected = width as usize * height as usize * 3;
        if data.len() != expected {
            return Err(BackendError::Other(format!(
                "RGB buffer is {} bytes, expected {} for {}x{}",
                data.len(),
                expected,
                width,
                height
            )));
        }
        Ok(Self {
            width,
            height,
            data: Arc::from(data),
            selector,
            captured_at: Instant::now(),
        })
    }
}

/// Result type for backend operations
pub type BackendResult<T> = Result<T, BackendError>;

/// Error types for backend operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    /// Provider has not finished starting up
    NotReady(String),
    /// Requested camera does not exist on this device
    DeviceNotFound(String),
    /// Use-case combination cannot be bound
    UnsupportedUseCases(String),
    /// Capture requested without a bound camera
    NotBound,
    /// Backend crashed or became unresponsive
    Crashed(String),
    /// Other errors
    Other(String),
}

impl std::fmt::Display for BackendError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BackendError::NotReady(msg) => write!(f, "Backend not ready: {}", msg),
            BackendError::DeviceNotFound(msg) => write!(f, "Device not found: {}", msg),
            BackendError::UnsupportedUseCases(msg) => write!(f, "Unsupported use cases: {}", msg),
            BackendError::NotBound => write!(f, "Not bound to a valid camera"),
            BackendError::Crashed(msg) => write!(f, "Backend crashed: {}", msg),
            BackendError::Other(msg) => write!(f, "Error: {}", msg),
        }
    }
}

impl std::error::Error for BackendError {}
