// SPDX-License-Identifier: GPL-3.0-only

//! JPEG encoding of captured frames

use crate::backends::camera::CapturedImage;
use crate::constants::JPEG_MIME_TYPE;
use crate::errors::CaptureFailure;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Encoding quality settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EncodingQuality {
    /// Low quality (high compression)
    Low,
    /// Medium quality (balanced)
    Medium,
    /// High quality (low compression)
    #[default]
    High,
    /// Maximum quality (minimal compression)
    Maximum,
}

impl EncodingQuality {
    /// Get JPEG quality value (0-100)
    pub fn jpeg_quality(&self) -> u8 {
        match self {
            EncodingQuality::Low => 60,
            EncodingQuality::Medium => 80,
            EncodingQuality::High => 92,
            EncodingQuality::Maximum => 98,
        }
    }
}

/// Encoded image data ready for saving
#[derive(Debug, Clone)]
pub struct EncodedImage {
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl EncodedImage {
    pub fn mime_type(&self) -> &'static str {
        JPEG_MIME_TYPE
    }
}

/// Photo encoder
#[derive(Debug, Clone, Copy, Default)]
pub struct PhotoEncoder {
    quality: EncodingQuality,
}

impl PhotoEncoder {
    pub fn new(quality: EncodingQuality) -> Self {
        Self { quality }
    }

    pub fn quality(&self) -> EncodingQuality {
        self.quality
    }

    /// Encode an RGB frame as JPEG
    ///
    /// Blocking; runs on the capture worker.
    pub fn encode(&self, frame: &CapturedImage) -> Result<EncodedImage, CaptureFailure> {
        let mut buffer = Vec::new();
        let mut encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(
            &mut buffer,
            self.quality.jpeg_quality(),
        );

        encoder
            .encode(
                &frame.data,
                frame.width,
                frame.height,
                image::ExtendedColorType::Rgb8,
            )
            .map_err(|e| CaptureFailure::EncodingFailed(format!("JPEG encoding failed: {}", e)))?;

        debug!(
            width = frame.width,
            height = frame.height,
            size = buffer.len(),
            "Encoding complete"
        );

        Ok(EncodedImage {
            data: buffer,
            width: frame.width,
            height: frame.height,
        })
    }
}
