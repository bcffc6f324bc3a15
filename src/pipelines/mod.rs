// SPDX-License-Identifier: MPL-2.0

//! Capture pipelines
//!
//! - [`photo`]: still capture, JPEG encoding and destination writing

pub mod photo;
