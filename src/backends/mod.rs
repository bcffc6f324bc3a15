// SPDX-License-Identifier: MPL-2.0

//! Backend abstraction layer for the camera
//!
//! - [`camera`]: provider, still-capture and preview-surface traits plus the
//!   synthetic in-process camera

pub mod camera;
