// SPDX-License-Identifier: GPL-3.0-only

//! In-process camera used by the CLI and the tests
//!
//! The camera provides:
//! - Back and front cameras (configurable) with binding bookkeeping
//! - A test-pattern or still-image frame source
//! - Fault injection for readiness and capture failures

use super::types::*;
use super::{CameraProvider, PreviewSurface, StillCapture};
use crate::constants::{SYNTHETIC_FRAME_HEIGHT, SYNTHETIC_FRAME_WIDTH};
use futures::FutureExt;
use futures::future::BoxFuture;
use image::RgbImage;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Where frames come from
#[derive(Debug, Clone)]
enum FrameSource {
    /// Generated gradient with a bar that moves on every capture
    TestPattern { width: u32, height: u32 },
    /// Same image for every capture
    Image(Arc<RgbImage>),
}

struct ActiveBinding {
    id: BindingId,
    selector: CameraSelector,
    use_cases: Vec<UseCase>,
    surface: Arc<dyn PreviewSurface>,
}

/// Internal camera state
struct CameraState {
    available: Vec<CameraSelector>,
    online: bool,
    warmup: Duration,
    source: FrameSource,
    bindings: Vec<ActiveBinding>,
    next_binding: u64,
    frames_captured: u64,
    capture_fault: Option<String>,
}

/// Synthetic camera provider and still-capture use case
///
/// Clones share the same state, so one handle can be given to the
/// coordinator as provider and another as still capture.
#[derive(Clone)]
pub struct SyntheticCamera {
    state: Arc<Mutex<CameraState>>,
}

impl SyntheticCamera {
    /// Back and front cameras producing a 640x480 test pattern
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(CameraState {
                available: vec![CameraSelector::Back, CameraSelector::Front],
                online: true,
                warmup: Duration::ZERO,
                source: FrameSource::TestPattern {
                    width: SYNTHETIC_FRAME_WIDTH,
                    height: SYNTHETIC_FRAME_HEIGHT,
                },
                bindings: Vec::new(),
                next_binding: 1,
                frames_captured: 0,
                capture_fault: None,
            })),
        }
    }

    /// Serve a still image instead of the test pattern
    pub fn from_image(path: &Path) -> BackendResult<Self> {
        let image = image::open(path)
            .map_err(|e| BackendError::Other(format!("Failed to load {}: {}", path.display(), e)))?
            .to_rgb8();
        info!(
            path = %path.display(),
            width = image.width(),
            height = image.height(),
            "Using still image as camera source"
        );
        let camera = Self::new();
        camera.lock().source = FrameSource::Image(Arc::new(image));
        Ok(camera)
    }

    /// Restrict the cameras this device has
    pub fn with_cameras(self, cameras: &[CameraSelector]) -> Self {
        self.lock().available = cameras.to_vec();
        self
    }

    /// Test-pattern frame size
    pub fn with_frame_size(self, width: u32, height: u32) -> Self {
        self.lock().source = FrameSource::TestPattern { width, height };
        self
    }

    /// Delay before the provider reports ready
    pub fn with_warmup(self, warmup: Duration) -> Self {
        self.lock().warmup = warmup;
        self
    }

    /// Provider that never becomes ready
    pub fn offline(self) -> Self {
        self.set_online(false);
        self
    }

    /// Toggle whether `wait_ready` succeeds
    pub fn set_online(&self, online: bool) {
        self.lock().online = online;
    }

    /// Make subsequent captures fail with the given platform error
    pub fn set_capture_fault(&self, fault: Option<String>) {
        self.lock().capture_fault = fault;
    }

    /// Frames handed out so far
    pub fn frames_captured(&self) -> u64 {
        self.lock().frames_captured
    }

    /// Use cases of every active binding
    pub fn bound_use_cases(&self) -> Vec<(BindingId, CameraSelector, Vec<UseCase>)> {
        self.lock()
            .bindings
            .iter()
            .map(|b| (b.id, b.selector, b.use_cases.clone()))
            .collect()
    }

    fn lock(&self) -> MutexGuard<'_, CameraState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for SyntheticCamera {
    fn default() -> Self {
        Self::new()
    }
}

impl CameraProvider for SyntheticCamera {
    fn wait_ready(&self) -> BoxFuture<'_, BackendResult<()>> {
        let (warmup, online) = {
            let state = self.lock();
            (state.warmup, state.online)
        };
        async move {
            if !warmup.is_zero() {
                debug!(?warmup, "Waiting for camera provider");
                tokio::time::sleep(warmup).await;
            }
            if online {
                Ok(())
            } else {
                Err(BackendError::NotReady("camera service offline".to_string()))
            }
        }
        .boxed()
    }

    fn unbind_all(&self) {
        let bindings = std::mem::take(&mut self.lock().bindings);
        for binding in &bindings {
            if binding.use_cases.contains(&UseCase::Preview) {
                binding.surface.detach();
            }
        }
        if !bindings.is_empty() {
            debug!(count = bindings.len(), "Unbound all use cases");
        }
    }

    fn bind(
        &self,
        selector: CameraSelector,
        use_cases: &[UseCase],
        surface: Arc<dyn PreviewSurface>,
    ) -> BackendResult<BindingId> {
        let mut state = self.lock();

        if !state.online {
            return Err(BackendError::NotReady("camera service offline".to_string()));
        }
        if !state.available.contains(&selector) {
            return Err(BackendError::DeviceNotFound(format!(
                "No {} camera on this device",
                selector
            )));
        }
        if use_cases.is_empty() {
            return Err(BackendError::UnsupportedUseCases(
                "at least one use case is required".to_string(),
            ));
        }
        for (i, use_case) in use_cases.iter().enumerate() {
            if use_cases[..i].contains(use_case) {
                return Err(BackendError::UnsupportedUseCases(format!(
                    "{:?} listed twice",
                    use_case
                )));
            }
            if let Some(existing) = state
                .bindings
                .iter()
                .find(|b| b.use_cases.contains(use_case))
            {
                return Err(BackendError::UnsupportedUseCases(format!(
                    "{:?} already bound to {}",
                    use_case, existing.id
                )));
            }
        }

        let id = BindingId(state.next_binding);
        state.next_binding += 1;

        if use_cases.contains(&UseCase::Preview) {
            surface.attach(id);
        }
        state.bindings.push(ActiveBinding {
            id,
            selector,
            use_cases: use_cases.to_vec(),
            surface,
        });

        info!(%id, %selector, ?use_cases, "Use cases bound");
        Ok(id)
    }

    fn active_bindings(&self) -> usize {
        self.lock().bindings.len()
    }
}

impl StillCapture for SyntheticCamera {
    fn capture_still(&self) -> BackendResult<CapturedImage> {
        let mut state = self.lock();

        let selector = state
            .bindings
            .iter()
            .find(|b| b.use_cases.contains(&UseCase::ImageCapture))
            .map(|b| b.selector)
            .ok_or(BackendError::NotBound)?;

        if let Some(fault) = &state.capture_fault {
            warn!(fault = %fault, "Injected capture fault");
            return Err(BackendError::Crashed(fault.clone()));
        }

        let sequence = state.frames_captured;
        state.frames_captured += 1;

        let image = match &state.source {
            FrameSource::TestPattern { width, height } => test_pattern(*width, *height, sequence),
            FrameSource::Image(image) => RgbImage::clone(image),
        };
        drop(state);

        let (width, height) = image.dimensions();
        debug!(width, height, sequence, %selector, "Still frame captured");
        CapturedImage::from_rgb(width, height, image.into_raw(), selector)
    }
}

/// Diagonal gradient with a vertical bar whose position depends on `sequence`
fn test_pattern(width: u32, height: u32, sequence: u64) -> RgbImage {
    let bar_width = (width / 16).max(1);
    let bar_x = ((sequence * u64::from(bar_width)) % u64::from(width.max(1))) as u32;

    RgbImage::from_fn(width, height, |x, y| {
        if x >= bar_x && x < bar_x + bar_width {
            return image::Rgb([255, 255, 255]);
        }
        let r = (x * 255 / width.max(1)) as u8;
        let g = (y * 255 / height.max(1)) as u8;
        let b = ((x + y) * 255 / (width + height).max(1)) as u8;
        image::Rgb([r, g, b])
    })
}

/// Preview surface that only remembers which binding it shows
#[derive(Debug, Default)]
pub struct CaptureSurface {
    attached: Mutex<Option<BindingId>>,
    attach_count: Mutex<u64>,
}

impl CaptureSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// How many times a feed was attached over the surface's lifetime
    pub fn attach_count(&self) -> u64 {
        *self.attach_count.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn is_live(&self) -> bool {
        self.attached().is_some()
    }
}

impl PreviewSurface for CaptureSurface {
    fn attach(&self, binding: BindingId) {
        *self.attached.lock().unwrap_or_else(PoisonError::into_inner) = Some(binding);
        *self.attach_count.lock().unwrap_or_else(PoisonError::into_inner) += 1;
    }

    fn detach(&self) {
        *self.attached.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }

    fn attached(&self) -> Option<BindingId> {
        *self.attached.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for SyntheticCamera {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.lock();
        f.debug_struct("SyntheticCamera")
            .field("available", &state.available)
            .field("online", &state.online)
            .field("bindings", &state.bindings.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOTH: [UseCase; 2] = [UseCase::Preview, UseCase::ImageCapture];

    #[test]
    fn bind_attaches_surface() {
        let camera = SyntheticCamera::new();
        let surface = Arc::new(CaptureSurface::new());

        let id = camera
            .bind(CameraSelector::Back, &BOTH, surface.clone())
            .unwrap();

        assert_eq!(surface.attached(), Some(id));
        assert_eq!(camera.active_bindings(), 1);
    }

    #[test]
    fn rebinding_without_unbind_is_rejected() {
        let camera = SyntheticCamera::new();
        let surface = Arc::new(CaptureSurface::new());
        camera
            .bind(CameraSelector::Back, &BOTH, surface.clone())
            .unwrap();

        let err = camera
            .bind(CameraSelector::Back, &BOTH, surface.clone())
            .unwrap_err();
        assert!(matches!(err, BackendError::UnsupportedUseCases(_)));

        camera.unbind_all();
        assert!(!surface.is_live());
        assert!(camera.bind(CameraSelector::Back, &BOTH, surface).is_ok());
        assert_eq!(camera.active_bindings(), 1);
    }

    #[test]
    fn missing_camera_is_rejected() {
        let camera = SyntheticCamera::new().with_cameras(&[CameraSelector::Front]);
        let err = camera
            .bind(CameraSelector::Back, &BOTH, Arc::new(CaptureSurface::new()))
            .unwrap_err();
        assert!(matches!(err, BackendError::DeviceNotFound(_)));
    }

    #[test]
    fn capture_requires_image_capture_binding() {
        let camera = SyntheticCamera::new();
        assert_eq!(camera.capture_still().unwrap_err(), BackendError::NotBound);

        camera
            .bind(
                CameraSelector::Back,
                &[UseCase::Preview],
                Arc::new(CaptureSurface::new()),
            )
            .unwrap();
        assert_eq!(camera.capture_still().unwrap_err(), BackendError::NotBound);
    }

    #[test]
    fn captures_differ_between_frames() {
        let camera = SyntheticCamera::new().with_frame_size(64, 48);
        camera
            .bind(CameraSelector::Back, &BOTH, Arc::new(CaptureSurface::new()))
            .unwrap();

        let first = camera.capture_still().unwrap();
        let second = camera.capture_still().unwrap();

        assert_eq!((first.width, first.height), (64, 48));
        assert_eq!(first.data.len(), 64 * 48 * 3);
        assert_ne!(first.data, second.data);
        assert_eq!(camera.frames_captured(), 2);
    }

    #[test]
    fn capture_fault_is_reported() {
        let camera = SyntheticCamera::new();
        camera
            .bind(CameraSelector::Back, &BOTH, Arc::new(CaptureSurface::new()))
            .unwrap();
        camera.set_capture_fault(Some("sensor timeout".into()));

        assert_eq!(
            camera.capture_still().unwrap_err(),
            BackendError::Crashed("sensor timeout".into())
        );
    }

    #[tokio::test]
    async fn offline_provider_never_ready() {
        let camera = SyntheticCamera::new().offline();
        assert!(matches!(
            camera.wait_ready().await,
            Err(BackendError::NotReady(_))
        ));
    }
}
