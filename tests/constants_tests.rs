// SPDX-License-Identifier: MPL-2.0

//! Integration tests for constants and destination metadata

use shutter::DestinationSelection;
use shutter::constants::{CAPTURED_IMAGE_NAME, JPEG_MIME_TYPE, TEMP_IMAGE_SUFFIX};

#[test]
fn test_destination_count() {
    // File, MediaStore, URI, Temporary File
    assert_eq!(DestinationSelection::ALL.len(), 4);
}

#[test]
fn test_destination_labels_are_unique() {
    let mut labels: Vec<_> = DestinationSelection::ALL.iter().map(|d| d.label()).collect();
    labels.sort();
    labels.dedup();
    assert_eq!(labels.len(), DestinationSelection::ALL.len());
}

#[test]
fn test_destination_cli_names_round_trip() {
    for destination in DestinationSelection::ALL {
        let parsed: DestinationSelection = destination.to_string().parse().unwrap();
        assert_eq!(parsed, destination);
    }
}

#[test]
fn test_image_names_match_mime_type() {
    assert_eq!(JPEG_MIME_TYPE, "image/jpeg");
    assert!(CAPTURED_IMAGE_NAME.ends_with(".jpg"));
    assert_eq!(TEMP_IMAGE_SUFFIX, ".jpg");
}
