// SPDX-License-Identifier: MPL-2.0

//! Capability checks that gate the capture flow
//!
//! The [`PermissionGate`] decides whether the camera may be used before any
//! preview or capture work starts. The OS side sits behind
//! [`CapabilityProvider`] and the explanation dialog behind
//! [`RationalePrompt`], so both can be swapped for fakes.

use crate::constants::messages;
use futures::FutureExt;
use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// OS-mediated permission guarding a sensor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Capability {
    Camera,
}

impl Capability {
    /// Platform permission name
    pub fn permission_name(&self) -> &'static str {
        match self {
            Capability::Camera => "camera",
        }
    }

    /// Text shown before asking again after an earlier refusal
    pub fn rationale(&self) -> &'static str {
        match self {
            Capability::Camera => messages::PERMISSION_RATIONALE,
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.permission_name())
    }
}

/// Current state of a capability, without prompting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapabilityStatus {
    Granted,
    /// Not granted; a request may still show the system dialog
    Denied,
    /// Refused earlier, an explanation should precede the next request
    RationaleRequired,
}

/// Final answer of the gate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapabilityOutcome {
    Granted,
    Denied,
}

impl CapabilityOutcome {
    pub fn is_granted(&self) -> bool {
        matches!(self, CapabilityOutcome::Granted)
    }
}

/// OS permission system
pub trait CapabilityProvider: Send + Sync {
    /// Non-blocking check that never shows UI
    fn status(&self, capability: Capability) -> CapabilityStatus;

    /// Ask the user; may show a system dialog
    fn request(&self, capability: Capability) -> BoxFuture<'_, CapabilityOutcome>;
}

/// Explanation dialog with OK / Cancel buttons
pub trait RationalePrompt: Send + Sync {
    /// Resolves to `true` when the user pressed OK
    fn show(&self, message: &str) -> BoxFuture<'_, bool>;
}

/// Gate run before the camera screen opens
pub struct PermissionGate {
    provider: Arc<dyn CapabilityProvider>,
    prompt: Arc<dyn RationalePrompt>,
}

impl PermissionGate {
    pub fn new(provider: Arc<dyn CapabilityProvider>, prompt: Arc<dyn RationalePrompt>) -> Self {
        Self { provider, prompt }
    }

    /// Make sure a capability is granted
    ///
    /// Already granted resolves immediately. An earlier refusal shows the
    /// rationale first and only asks again if the user accepts it. A denial is
    /// final for this call; nothing is retried.
    pub async fn ensure_capability(&self, capability: Capability) -> CapabilityOutcome {
        let outcome = match self.provider.status(capability) {
            CapabilityStatus::Granted => {
                debug!(%capability, "Capability already granted");
                CapabilityOutcome::Granted
            }
            CapabilityStatus::RationaleRequired => {
                info!(%capability, "Showing permission rationale");
                if self.prompt.show(capability.rationale()).await {
                    self.provider.request(capability).await
                } else {
                    info!(%capability, "Permission rationale dismissed");
                    CapabilityOutcome::Denied
                }
            }
            CapabilityStatus::Denied => self.provider.request(capability).await,
        };

        match outcome {
            CapabilityOutcome::Granted => info!(%capability, "Capability granted"),
            CapabilityOutcome::Denied => warn!(%capability, "Capability denied"),
        }
        outcome
    }
}

impl fmt::Debug for PermissionGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PermissionGate").finish_non_exhaustive()
    }
}

/// Provider with fixed answers
#[derive(Debug, Clone, Copy)]
pub struct StaticCapabilityProvider {
    status: CapabilityStatus,
    answer: CapabilityOutcome,
}

impl StaticCapabilityProvider {
    pub fn new(status: CapabilityStatus, answer: CapabilityOutcome) -> Self {
        Self { status, answer }
    }

    pub fn granted() -> Self {
        Self::new(CapabilityStatus::Granted, CapabilityOutcome::Granted)
    }

    pub fn denied() -> Self {
        Self::new(CapabilityStatus::Denied, CapabilityOutcome::Denied)
    }
}

impl CapabilityProvider for StaticCapabilityProvider {
    fn status(&self, _capability: Capability) -> CapabilityStatus {
        self.status
    }

    fn request(&self, _capability: Capability) -> BoxFuture<'_, CapabilityOutcome> {
        futures::future::ready(self.answer).boxed()
    }
}

/// Prompt that always gives the same answer
#[derive(Debug, Clone, Copy)]
pub struct AutoPrompt(pub bool);

impl RationalePrompt for AutoPrompt {
    fn show(&self, message: &str) -> BoxFuture<'_, bool> {
        debug!(prompt = message, accepted = self.0, "Rationale prompt");
        futures::future::ready(self.0).boxed()
    }
}

/// Camera access derived from V4L2 device node permissions
///
/// Linux has no runtime permission dialog: access is granted when the
/// process can open at least one `/dev/video*` node for reading and writing.
/// A request cannot raise privileges, so it reports the current state.
#[derive(Debug, Clone)]
pub struct DeviceNodeCapability {
    dev_dir: PathBuf,
}

impl DeviceNodeCapability {
    pub fn new() -> Self {
        Self::with_dev_dir("/dev")
    }

    pub fn with_dev_dir(dev_dir: impl Into<PathBuf>) -> Self {
        Self {
            dev_dir: dev_dir.into(),
        }
    }

    fn video_nodes(&self) -> Vec<PathBuf> {
        let Ok(entries) = std::fs::read_dir(&self.dev_dir) else {
            return Vec::new();
        };
        entries
            .flatten()
            .map(|e| e.path())
            .filter(|p| {
                p.file_name()
                    .is_some_and(|n| n.to_string_lossy().starts_with("video"))
            })
            .collect()
    }

    fn any_accessible(&self) -> bool {
        self.video_nodes().iter().any(|p| is_read_write(p))
    }
}

impl Default for DeviceNodeCapability {
    fn default() -> Self {
        Self::new()
    }
}

fn is_read_write(path: &Path) -> bool {
    use std::os::unix::ffi::OsStrExt;

    let Ok(c_path) = std::ffi::CString::new(path.as_os_str().as_bytes()) else {
        return false;
    };
    // SAFETY: c_path is a valid NUL-terminated string for the duration of the call
    unsafe { libc::access(c_path.as_ptr(), libc::R_OK | libc::W_OK) == 0 }
}

impl CapabilityProvider for DeviceNodeCapability {
    fn status(&self, capability: Capability) -> CapabilityStatus {
        match capability {
            Capability::Camera if self.any_accessible() => CapabilityStatus::Granted,
            Capability::Camera => CapabilityStatus::Denied,
        }
    }

    fn request(&self, capability: Capability) -> BoxFuture<'_, CapabilityOutcome> {
        let outcome = match self.status(capability) {
            CapabilityStatus::Granted => CapabilityOutcome::Granted,
            _ => {
                warn!(
                    dev = %self.dev_dir.display(),
                    "No accessible video device; add the user to the 'video' group"
                );
                CapabilityOutcome::Denied
            }
        };
        futures::future::ready(outcome).boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Provider that counts requests
    struct CountingProvider {
        status: CapabilityStatus,
        answer: CapabilityOutcome,
        requests: AtomicUsize,
    }

    impl CapabilityProvider for CountingProvider {
        fn status(&self, _capability: Capability) -> CapabilityStatus {
            self.status
        }

        fn request(&self, _capability: Capability) -> BoxFuture<'_, CapabilityOutcome> {
            self.requests.fetch_add(1, Ordering::SeqCst);
            futures::future::ready(self.answer).boxed()
        }
    }

    /// Prompt that records what it was shown
    struct RecordingPrompt {
        accept: bool,
        shown: Mutex<Vec<String>>,
    }

    impl RationalePrompt for RecordingPrompt {
        fn show(&self, message: &str) -> BoxFuture<'_, bool> {
            self.shown.lock().unwrap().push(message.to_string());
            futures::future::ready(self.accept).boxed()
        }
    }

    fn gate(
        status: CapabilityStatus,
        answer: CapabilityOutcome,
        accept: bool,
    ) -> (PermissionGate, Arc<CountingProvider>, Arc<RecordingPrompt>) {
        let provider = Arc::new(CountingProvider {
            status,
            answer,
            requests: AtomicUsize::new(0),
        });
        let prompt = Arc::new(RecordingPrompt {
            accept,
            shown: Mutex::new(Vec::new()),
        });
        (
            PermissionGate::new(provider.clone(), prompt.clone()),
            provider,
            prompt,
        )
    }

    #[tokio::test]
    async fn granted_skips_request() {
        let (gate, provider, prompt) =
            gate(CapabilityStatus::Granted, CapabilityOutcome::Denied, false);
        assert_eq!(
            gate.ensure_capability(Capability::Camera).await,
            CapabilityOutcome::Granted
        );
        assert_eq!(provider.requests.load(Ordering::SeqCst), 0);
        assert!(prompt.shown.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn denied_requests_once() {
        let (gate, provider, prompt) =
            gate(CapabilityStatus::Denied, CapabilityOutcome::Granted, false);
        assert!(gate.ensure_capability(Capability::Camera).await.is_granted());
        assert_eq!(provider.requests.load(Ordering::SeqCst), 1);
        assert!(prompt.shown.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn rationale_accepted_then_requested() {
        let (gate, provider, prompt) = gate(
            CapabilityStatus::RationaleRequired,
            CapabilityOutcome::Granted,
            true,
        );
        assert!(gate.ensure_capability(Capability::Camera).await.is_granted());
        assert_eq!(provider.requests.load(Ordering::SeqCst), 1);
        assert_eq!(
            *prompt.shown.lock().unwrap(),
            vec![messages::PERMISSION_RATIONALE.to_string()]
        );
    }

    #[tokio::test]
    async fn rationale_cancelled_is_denied_without_request() {
        let (gate, provider, _prompt) = gate(
            CapabilityStatus::RationaleRequired,
            CapabilityOutcome::Granted,
            false,
        );
        assert_eq!(
            gate.ensure_capability(Capability::Camera).await,
            CapabilityOutcome::Denied
        );
        assert_eq!(provider.requests.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn device_nodes_missing_means_denied() {
        let dir = tempfile::tempdir().unwrap();
        let provider = DeviceNodeCapability::with_dev_dir(dir.path());
        assert_eq!(provider.status(Capability::Camera), CapabilityStatus::Denied);
        assert_eq!(
            provider.request(Capability::Camera).await,
            CapabilityOutcome::Denied
        );
    }

    #[tokio::test]
    async fn accessible_device_node_is_granted() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("video0"), b"").unwrap();
        let provider = DeviceNodeCapability::with_dev_dir(dir.path());
        assert_eq!(provider.status(Capability::Camera), CapabilityStatus::Granted);
    }
}
