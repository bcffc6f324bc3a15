// SPDX-License-Identifier: MPL-2.0

//! Photo capture pipeline
//!
//! Runs entirely on the capture worker:
//!
//! ```text
//! StillCapture → Encoding (JPEG) → Output (file / media store)
//! ```
//!
//! Every stage failure is folded into a [`CaptureOutcome::Failure`], so each
//! request produces exactly one outcome.

pub mod encoding;
pub mod output;

pub use encoding::{EncodedImage, EncodingQuality, PhotoEncoder};
pub use output::OutputWriter;

use crate::backends::camera::StillCapture;
use crate::capture::outcome::CaptureOutcome;
use crate::capture::request::CaptureRequest;
use crate::errors::CaptureFailure;
use crate::storage::MediaStore;
use std::sync::Arc;
use tracing::{debug, info};

/// Complete capture → encode → write workflow
#[derive(Debug, Clone)]
pub struct PhotoPipeline {
    encoder: PhotoEncoder,
    writer: OutputWriter,
}

impl PhotoPipeline {
    pub fn new(quality: EncodingQuality, media_store: Arc<dyn MediaStore>) -> Self {
        Self {
            encoder: PhotoEncoder::new(quality),
            writer: OutputWriter::new(media_store),
        }
    }

    /// Take one picture and store it
    pub fn capture_and_save(
        &self,
        still: &dyn StillCapture,
        request: &CaptureRequest,
    ) -> CaptureOutcome {
        info!(
            request = request.id,
            destination = %request.destination,
            quality = ?self.encoder.quality(),
            "Capturing photo"
        );

        match self.run(still, request) {
            Ok(saved) => CaptureOutcome::Success(saved),
            Err(failure) => CaptureOutcome::Failure(failure),
        }
    }

    fn run(
        &self,
        still: &dyn StillCapture,
        request: &CaptureRequest,
    ) -> Result<crate::capture::outcome::SavedOutput, CaptureFailure> {
        // Stage 1: grab a frame
        let frame = still.capture_still()?;
        debug!(width = frame.width, height = frame.height, "Frame captured");

        // Stage 2: encode
        let encoded = self.encoder.encode(&frame)?;

        // Stage 3: write
        self.writer.write(request, &encoded)
    }
}
