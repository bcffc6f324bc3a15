// SPDX-License-Identifier: GPL-3.0-only

//! Writes encoded photos to the target named by a capture request

use super::encoding::EncodedImage;
use crate::capture::outcome::{SavedLocation, SavedOutput};
use crate::capture::request::{CaptureRequest, OutputTarget};
use crate::errors::CaptureFailure;
use crate::storage::{MediaStore, write_new_file};
use std::sync::Arc;
use tracing::info;

/// Persists encoded images
#[derive(Clone)]
pub struct OutputWriter {
    media_store: Arc<dyn MediaStore>,
}

impl OutputWriter {
    pub fn new(media_store: Arc<dyn MediaStore>) -> Self {
        Self { media_store }
    }

    /// Write `encoded` where `request` says
    ///
    /// Non-exclusive files are replaced if they exist.
    pub fn write(
        &self,
        request: &CaptureRequest,
        encoded: &EncodedImage,
    ) -> Result<SavedOutput, CaptureFailure> {
        let location = match &request.target {
            OutputTarget::File { path, exclusive } => {
                if let Some(parent) = path.parent() {
                    std::fs::create_dir_all(parent)?;
                }
                if *exclusive {
                    write_new_file(path, &encoded.data)?;
                } else {
                    std::fs::write(path, &encoded.data)?;
                }
                SavedLocation::File(path.clone())
            }
            OutputTarget::Media(entry) => {
                let record = self
                    .media_store
                    .insert(entry, &encoded.data)
                    .map_err(|e| CaptureFailure::SaveFailed(e.to_string()))?;
                SavedLocation::Media(record)
            }
        };

        info!(
            request = request.id,
            path = %location.path().display(),
            size = encoded.data.len(),
            mime = encoded.mime_type(),
            "Photo written"
        );

        Ok(SavedOutput {
            request_id: request.id,
            destination: request.destination,
            location,
            provider_uri: request.provider_uri.clone(),
            size: encoded.data.len(),
        })
    }
}

impl std::fmt::Debug for OutputWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OutputWriter").finish_non_exhaustive()
    }
}
