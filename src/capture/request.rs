// SPDX-License-Identifier: GPL-3.0-only

//! Destination-specific output parameters for one capture

use crate::constants::CAPTURED_IMAGE_NAME;
use crate::destination::DestinationSelection;
use crate::errors::AppResult;
use crate::storage::{MediaEntry, ProviderUri, StorageLayout};
use std::path::PathBuf;

/// Where the encoded bytes of one capture go
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    /// Plain file; `exclusive` files must not exist yet
    File { path: PathBuf, exclusive: bool },
    /// New entry in the shared media collection
    Media(MediaEntry),
}

/// Ephemeral request built when the shutter is pressed
///
/// Dropped once its outcome has been delivered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureRequest {
    pub id: u64,
    pub destination: DestinationSelection,
    pub target: OutputTarget,
    /// Set for the provider destination
    pub provider_uri: Option<ProviderUri>,
}

impl CaptureRequest {
    /// Build the output parameters for a destination
    ///
    /// No filesystem access happens here; temporary names are generated
    /// up front and claimed by the writer.
    pub fn build(
        id: u64,
        destination: DestinationSelection,
        layout: &StorageLayout,
        provider_authority: &str,
    ) -> AppResult<Self> {
        let fixed_file = || layout.files_dir.join(CAPTURED_IMAGE_NAME);

        let (target, provider_uri) = match destination {
            DestinationSelection::LocalFile => (
                OutputTarget::File {
                    path: fixed_file(),
                    exclusive: false,
                },
                None,
            ),
            DestinationSelection::MediaLibrary => (
                OutputTarget::Media(MediaEntry::jpeg_picture(CAPTURED_IMAGE_NAME)),
                None,
            ),
            DestinationSelection::ProviderUri => {
                let path = fixed_file();
                let uri = ProviderUri::for_file(provider_authority, &layout.files_dir, &path)?;
                (
                    OutputTarget::File {
                        path,
                        exclusive: false,
                    },
                    Some(uri),
                )
            }
            DestinationSelection::TemporaryFile => (
                OutputTarget::File {
                    path: layout.temp_image_path(),
                    exclusive: true,
                },
                None,
            ),
        };

        Ok(Self {
            id,
            destination,
            target,
            provider_uri,
        })
    }
}
