// SPDX-License-Identifier: GPL-3.0-only

//! Application-wide constants

/// File name used by every non-temporary destination
///
/// Repeated captures to the same destination overwrite the previous image.
pub const CAPTURED_IMAGE_NAME: &str = "captured_image.jpg";

/// Prefix and suffix for uniquely named temporary captures
pub const TEMP_IMAGE_PREFIX: &str = "captured_image";
pub const TEMP_IMAGE_SUFFIX: &str = ".jpg";

/// MIME type recorded in the shared media index
pub const JPEG_MIME_TYPE: &str = "image/jpeg";

/// Logical directory of the shared media collection
pub const PICTURES_DIRECTORY: &str = "Pictures";

/// Index file kept at the root of the shared media collection
pub const MEDIA_INDEX_FILE: &str = "media_index.json";

/// Authority of the provider that shares private files
pub const DEFAULT_PROVIDER_AUTHORITY: &str = "com.example.fileprovider";

/// Root name the provider exposes for the private files directory
pub const PROVIDER_FILES_ROOT: &str = "files";

/// Name of the dedicated capture worker thread
pub const CAPTURE_WORKER_THREAD: &str = "shutter-capture";

/// Default frame size produced by the synthetic camera
pub const SYNTHETIC_FRAME_WIDTH: u32 = 640;
pub const SYNTHETIC_FRAME_HEIGHT: u32 = 480;

/// User-facing notification texts
pub mod messages {
    pub const CAPTURE_SUCCEEDED: &str = "Image saved successfully";
    pub const CAPTURE_FAILED: &str = "Image capture failed";
    pub const PERMISSION_REQUIRED: &str = "Camera permission is required to use the camera";
    pub const PERMISSION_RATIONALE: &str =
        "Camera permission is needed to use the camera features of this app.";
}
