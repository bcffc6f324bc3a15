// SPDX-License-Identifier: GPL-3.0-only

//! Capture coordinator
//!
//! Owns the camera provider, the still-capture use case and the capture
//! worker for one screen. All methods are called from the UI context; only
//! the capture job itself runs on the worker.

use super::outcome::{CaptureOutcome, OutcomeReporter};
use super::request::CaptureRequest;
use super::worker::CaptureWorker;
use crate::app::state::SelectionState;
use crate::backends::camera::{
    BindingId, CameraProvider, CameraSelector, PreviewSurface, StillCapture, UseCase,
};
use crate::errors::{AppError, AppResult, BindingError, CaptureFailure};
use crate::pipelines::photo::PhotoPipeline;
use crate::storage::StorageLayout;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use tokio::sync::oneshot;
use tracing::{debug, error, info};

/// Use cases bound for the camera screen
const SCREEN_USE_CASES: [UseCase; 2] = [UseCase::Preview, UseCase::ImageCapture];

/// Collaborators and settings the coordinator needs
pub struct CoordinatorParts {
    pub provider: Arc<dyn CameraProvider>,
    pub still: Arc<dyn StillCapture>,
    pub pipeline: PhotoPipeline,
    pub layout: StorageLayout,
    pub provider_authority: String,
    pub selector: CameraSelector,
    pub reporter: OutcomeReporter,
}

/// Pending outcome of one triggered capture
///
/// Resolves exactly once. If the worker goes away before reporting, the
/// ticket resolves to a `WorkerUnavailable` failure.
#[derive(Debug)]
pub struct CaptureTicket {
    request_id: u64,
    receiver: oneshot::Receiver<CaptureOutcome>,
}

impl CaptureTicket {
    pub fn request_id(&self) -> u64 {
        self.request_id
    }

    fn resolved(request_id: u64, outcome: CaptureOutcome) -> Self {
        let (sender, receiver) = oneshot::channel();
        let _ = sender.send(outcome);
        Self {
            request_id,
            receiver,
        }
    }
}

impl Future for CaptureTicket {
    type Output = CaptureOutcome;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.receiver).poll(cx).map(|result| {
            result.unwrap_or(CaptureOutcome::Failure(CaptureFailure::WorkerUnavailable))
        })
    }
}

/// Binds the preview and issues captures
pub struct CaptureCoordinator {
    provider: Arc<dyn CameraProvider>,
    still: Arc<dyn StillCapture>,
    pipeline: Arc<PhotoPipeline>,
    layout: StorageLayout,
    provider_authority: String,
    selector: CameraSelector,
    reporter: OutcomeReporter,
    worker: CaptureWorker,
    binding: Option<BindingId>,
    next_request: u64,
}

impl CaptureCoordinator {
    /// Create the coordinator and start its capture worker
    pub fn new(parts: CoordinatorParts) -> AppResult<Self> {
        let worker = CaptureWorker::spawn()
            .map_err(|e| AppError::Storage(format!("Failed to start capture worker: {}", e)))?;

        Ok(Self {
            provider: parts.provider,
            still: parts.still,
            pipeline: Arc::new(parts.pipeline),
            layout: parts.layout,
            provider_authority: parts.provider_authority,
            selector: parts.selector,
            reporter: parts.reporter,
            worker,
            binding: None,
            next_request: 1,
        })
    }

    /// Bind the live feed and the still-capture use case
    ///
    /// Waits for the provider, then drops every previous binding before
    /// binding again, so repeated calls leave exactly one binding. On
    /// failure the error is logged and the screen continues without a live
    /// preview. A provider that never becomes ready leaves any existing
    /// binding untouched.
    pub async fn initialize_preview(
        &mut self,
        surface: Arc<dyn PreviewSurface>,
    ) -> Result<BindingId, BindingError> {
        if let Err(e) = self.provider.wait_ready().await {
            let err = BindingError::from(e);
            error!(error = %err, "Camera provider unavailable");
            return Err(err);
        }

        self.provider.unbind_all();
        self.binding = None;

        match self
            .provider
            .bind(self.selector, &SCREEN_USE_CASES, surface)
        {
            Ok(id) => {
                info!(%id, selector = %self.selector, "Preview initialized");
                self.binding = Some(id);
                Ok(id)
            }
            Err(e) => {
                let err = BindingError::from(e);
                error!(error = %err, "Use case binding failed");
                Err(err)
            }
        }
    }

    /// Current preview binding, if any
    pub fn binding(&self) -> Option<BindingId> {
        self.binding
    }

    /// Issue a capture to the currently selected destination
    ///
    /// Returns as soon as the job is queued. An unmapped selection fails with
    /// a configuration error before anything is queued. Captures are not
    /// deduplicated: triggering again while one is in flight queues a second
    /// independent capture.
    pub fn trigger_capture(&mut self, selection: &SelectionState) -> AppResult<CaptureTicket> {
        let destination = selection.resolve()?;

        let request_id = self.next_request;
        let request = CaptureRequest::build(
            request_id,
            destination,
            &self.layout,
            &self.provider_authority,
        )?;
        self.next_request += 1;

        debug!(request = request_id, %destination, output = ?request.target, "Capture requested");

        let (sender, receiver) = oneshot::channel();
        let pipeline = Arc::clone(&self.pipeline);
        let still = Arc::clone(&self.still);
        let reporter = self.reporter.clone();

        let job = Box::new(move || {
            let outcome = std::panic::catch_unwind(AssertUnwindSafe(|| {
                pipeline.capture_and_save(still.as_ref(), &request)
            }))
            .unwrap_or_else(|_| {
                CaptureOutcome::Failure(CaptureFailure::CaptureFailed(
                    "capture panicked".to_string(),
                ))
            });
            reporter.on_capture_outcome(&outcome);
            let _ = sender.send(outcome);
        });

        match self.worker.submit(job) {
            Ok(()) => Ok(CaptureTicket {
                request_id,
                receiver,
            }),
            Err((failure, _job)) => {
                let outcome = CaptureOutcome::Failure(failure);
                self.reporter.on_capture_outcome(&outcome);
                Ok(CaptureTicket::resolved(request_id, outcome))
            }
        }
    }

    /// Release the camera and stop the worker after draining queued captures
    pub fn shutdown(&mut self) {
        self.provider.unbind_all();
        self.binding = None;
        self.worker.shutdown();
    }

    pub fn is_running(&self) -> bool {
        self.worker.is_running()
    }
}

impl Drop for CaptureCoordinator {
    fn drop(&mut self) {
        if self.worker.is_running() {
            self.shutdown();
        }
    }
}

impl std::fmt::Debug for CaptureCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CaptureCoordinator")
            .field("selector", &self.selector)
            .field("binding", &self.binding)
            .field("worker", &self.worker)
            .finish()
    }
}
