// SPDX-License-Identifier: MPL-2.0

//! Integration tests for configuration module

use shutter::backends::camera::CameraSelector;
use shutter::constants::DEFAULT_PROVIDER_AUTHORITY;
use shutter::{Config, DestinationSelection};
use std::path::Path;

#[test]
fn test_config_default() {
    let config = Config::default();

    assert_eq!(config.camera, CameraSelector::Back);
    assert_eq!(config.initial_destination, DestinationSelection::LocalFile);
    assert_eq!(config.provider_authority, DEFAULT_PROVIDER_AUTHORITY);
}

#[test]
fn test_config_storage_roots_are_distinct() {
    let config = Config::default();
    let storage = &config.storage;

    assert_ne!(storage.files_dir, storage.cache_dir);
    assert_ne!(storage.files_dir, storage.media_root);
    assert_ne!(storage.cache_dir, storage.media_root);
}

#[test]
fn test_config_with_root() {
    let config = Config::with_root("/srv/shutter");

    assert!(config.storage.files_dir.starts_with(Path::new("/srv/shutter")));
    assert!(config.storage.cache_dir.starts_with(Path::new("/srv/shutter")));
    assert!(config.storage.media_root.starts_with(Path::new("/srv/shutter")));
}
