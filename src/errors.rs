// SPDX-License-Identifier: MPL-2.0

//! Error types for the capture flow
//!
//! Every platform-layer failure is caught where it happens and converted into
//! one of these variants, logged, and turned into a short user notification.

use crate::backends::camera::BackendError;
use crate::permissions::Capability;
use std::fmt;

/// Result type alias using AppError
pub type AppResult<T> = Result<T, AppError>;

/// Main application error type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppError {
    /// The user refused a capability; the capture flow halts
    PermissionDenied(Capability),
    /// Preview setup failed; the screen keeps running without a live feed
    Binding(BindingError),
    /// Programming error such as an unmapped destination index
    Configuration(String),
    /// Platform-reported capture failure
    Capture(CaptureFailure),
    /// Storage/filesystem errors
    Storage(String),
}

/// Preview binding errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindingError {
    /// Live video source never became ready
    SourceNotReady(String),
    /// Platform rejected the source / use-case combination
    Rejected(String),
}

/// Capture errors, delivered inside a failed outcome
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureFailure {
    /// Still capture use case is not bound to a camera
    NotBound,
    /// Camera failed to produce a frame
    CaptureFailed(String),
    /// Encoding failed
    EncodingFailed(String),
    /// Save failed
    SaveFailed(String),
    /// Capture worker is shut down or died before reporting
    WorkerUnavailable,
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::PermissionDenied(cap) => write!(f, "Permission denied: {}", cap),
            AppError::Binding(e) => write!(f, "Binding error: {}", e),
            AppError::Configuration(msg) => write!(f, "Configuration error: {}", msg),
            AppError::Capture(e) => write!(f, "Capture error: {}", e),
            AppError::Storage(msg) => write!(f, "Storage error: {}", msg),
        }
    }
}

impl fmt::Display for BindingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BindingError::SourceNotReady(msg) => write!(f, "Video source not ready: {}", msg),
            BindingError::Rejected(msg) => write!(f, "Use case binding failed: {}", msg),
        }
    }
}

impl fmt::Display for CaptureFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaptureFailure::NotBound => write!(f, "Not bound to a valid camera"),
            CaptureFailure::CaptureFailed(msg) => write!(f, "Capture failed: {}", msg),
            CaptureFailure::EncodingFailed(msg) => write!(f, "Encoding failed: {}", msg),
            CaptureFailure::SaveFailed(msg) => write!(f, "Save failed: {}", msg),
            CaptureFailure::WorkerUnavailable => write!(f, "Capture worker unavailable"),
        }
    }
}

impl std::error::Error for AppError {}
impl std::error::Error for BindingError {}
impl std::error::Error for CaptureFailure {}

impl From<BindingError> for AppError {
    fn from(err: BindingError) -> Self {
        AppError::Binding(err)
    }
}

impl From<CaptureFailure> for AppError {
    fn from(err: CaptureFailure) -> Self {
        AppError::Capture(err)
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Storage(err.to_string())
    }
}

impl From<std::io::Error> for CaptureFailure {
    fn from(err: std::io::Error) -> Self {
        CaptureFailure::SaveFailed(err.to_string())
    }
}

impl From<BackendError> for BindingError {
    fn from(err: BackendError) -> Self {
        match err {
            BackendError::NotReady(msg) => BindingError::SourceNotReady(msg),
            other => BindingError::Rejected(other.to_string()),
        }
    }
}

impl From<BackendError> for CaptureFailure {
    fn from(err: BackendError) -> Self {
        match err {
            BackendError::NotBound => CaptureFailure::NotBound,
            other => CaptureFailure::CaptureFailed(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_errors_map_to_binding_errors() {
        let err: BindingError = BackendError::NotReady("provider".into()).into();
        assert_eq!(err, BindingError::SourceNotReady("provider".into()));

        let err: BindingError = BackendError::DeviceNotFound("front".into()).into();
        assert!(matches!(err, BindingError::Rejected(_)));
    }

    #[test]
    fn unbound_capture_maps_to_not_bound() {
        let err: CaptureFailure = BackendError::NotBound.into();
        assert_eq!(err, CaptureFailure::NotBound);
    }

    #[test]
    fn io_errors_become_save_failures() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only");
        let err: CaptureFailure = io.into();
        assert!(matches!(err, CaptureFailure::SaveFailed(msg) if msg.contains("read-only")));
    }
}
