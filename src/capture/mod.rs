// SPDX-License-Identifier: GPL-3.0-only

//! Capture coordination
//!
//! ```text
//! UI context                         capture worker
//! ──────────                         ──────────────
//! trigger_capture ─ CaptureRequest ─▶ PhotoPipeline
//!       │                                  │
//!  CaptureTicket ◀──── CaptureOutcome ─────┤
//!                                          ▼
//! UiContext ◀──── Notification ──── OutcomeReporter
//! ```

pub mod coordinator;
pub mod outcome;
pub mod request;
pub mod worker;

pub use coordinator::{CaptureCoordinator, CaptureTicket, CoordinatorParts};
pub use outcome::{CaptureOutcome, OutcomeReporter, SavedLocation, SavedOutput};
pub use request::{CaptureRequest, OutputTarget};
pub use worker::CaptureWorker;
