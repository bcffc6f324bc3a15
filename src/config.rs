// SPDX-License-Identifier: GPL-3.0-only

use crate::backends::camera::CameraSelector;
use crate::constants::DEFAULT_PROVIDER_AUTHORITY;
use crate::destination::DestinationSelection;
use crate::pipelines::photo::EncodingQuality;
use crate::storage::StorageLayout;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Directory name used below the platform data and cache directories
const APP_DIR: &str = "shutter";

/// Runtime settings for the camera screen
///
/// Nothing here is persisted; the binary fills it from defaults and flags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Private files, cache and shared media roots
    pub storage: StorageLayout,
    /// Authority of the provider URIs handed out for private files
    pub provider_authority: String,
    /// JPEG quality preset
    pub quality: EncodingQuality,
    /// Camera bound for preview and capture
    pub camera: CameraSelector,
    /// Destination selected when the screen opens
    pub initial_destination: DestinationSelection,
}

impl Config {
    /// Defaults with every storage root below `root`
    pub fn with_root(root: impl AsRef<Path>) -> Self {
        Self {
            storage: StorageLayout::under(root),
            ..Self::default()
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        let data = dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR);
        let cache = dirs::cache_dir()
            .map(|d| d.join(APP_DIR))
            .unwrap_or_else(|| data.join("cache"));

        Self {
            storage: StorageLayout {
                files_dir: data.join("files"),
                cache_dir: cache,
                media_root: data.join("media"),
            },
            provider_authority: DEFAULT_PROVIDER_AUTHORITY.to_string(),
            quality: EncodingQuality::default(),
            camera: CameraSelector::default(),
            initial_destination: DestinationSelection::default(),
        }
    }
}
