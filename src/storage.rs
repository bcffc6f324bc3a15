// SPDX-License-Identifier: MPL-2.0

//! Storage locations for captured photos
//!
//! Three places can receive a capture:
//!
//! - the app's private files directory (fixed name, overwritten each time)
//! - the app's private cache directory (unique temporary names)
//! - the shared media collection, which keeps a JSON index of its entries
//!
//! Private files can also be handed to other components through a
//! [`ProviderUri`] instead of a filesystem path.

use crate::constants::{
    JPEG_MIME_TYPE, MEDIA_INDEX_FILE, PICTURES_DIRECTORY, PROVIDER_FILES_ROOT, TEMP_IMAGE_PREFIX,
    TEMP_IMAGE_SUFFIX,
};
use crate::errors::{AppError, AppResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::Write;
use std::path::{Component, Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, info};

/// Directory roots used by the capture destinations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageLayout {
    /// App-private files directory
    pub files_dir: PathBuf,
    /// App-private cache directory
    pub cache_dir: PathBuf,
    /// Root of the shared media collection
    pub media_root: PathBuf,
}

impl StorageLayout {
    /// Layout with all three roots below a single directory
    pub fn under(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        Self {
            files_dir: root.join("files"),
            cache_dir: root.join("cache"),
            media_root: root.join("media"),
        }
    }

    /// Create every root directory
    pub fn ensure_dirs(&self) -> AppResult<()> {
        for dir in [&self.files_dir, &self.cache_dir, &self.media_root] {
            std::fs::create_dir_all(dir)?;
        }
        debug!(files = %self.files_dir.display(), "Storage directories ready");
        Ok(())
    }

    /// Fresh temporary file path in the cache directory
    ///
    /// The file is not created here; writers open it with `create_new`.
    pub fn temp_image_path(&self) -> PathBuf {
        let unique = uuid::Uuid::new_v4().simple();
        self.cache_dir
            .join(format!("{}{}{}", TEMP_IMAGE_PREFIX, unique, TEMP_IMAGE_SUFFIX))
    }
}

/// Fields describing an entry in the shared media collection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaEntry {
    pub display_name: String,
    pub mime_type: String,
    /// Logical directory, e.g. "Pictures"
    pub relative_path: String,
}

impl MediaEntry {
    /// JPEG image in the Pictures collection
    pub fn jpeg_picture(display_name: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            mime_type: JPEG_MIME_TYPE.to_string(),
            relative_path: PICTURES_DIRECTORY.to_string(),
        }
    }
}

/// Entry as recorded by a media store after insertion
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaRecord {
    pub id: u64,
    #[serde(flatten)]
    pub entry: MediaEntry,
    /// Where the bytes ended up
    pub path: PathBuf,
    pub date_added: DateTime<Utc>,
}

/// Shared, externally indexed media collection
pub trait MediaStore: Send + Sync {
    /// Store image bytes under the given entry and index them
    fn insert(&self, entry: &MediaEntry, bytes: &[u8]) -> AppResult<MediaRecord>;

    /// All indexed entries, oldest first
    fn entries(&self) -> AppResult<Vec<MediaRecord>>;
}

/// Media store backed by a directory tree and a JSON index file
#[derive(Debug)]
pub struct LocalMediaStore {
    root: PathBuf,
    // Serializes index read-modify-write cycles
    index_lock: Mutex<()>,
}

impl LocalMediaStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            index_lock: Mutex::new(()),
        }
    }

    fn index_path(&self) -> PathBuf {
        self.root.join(MEDIA_INDEX_FILE)
    }

    fn read_index(&self) -> AppResult<Vec<MediaRecord>> {
        let path = self.index_path();
        if !path.exists() {
            return Ok(Vec::new());
        }
        let data = std::fs::read(&path)?;
        serde_json::from_slice(&data)
            .map_err(|e| AppError::Storage(format!("Corrupt media index {}: {}", path.display(), e)))
    }

    fn write_index(&self, records: &[MediaRecord]) -> AppResult<()> {
        let data = serde_json::to_vec_pretty(records)
            .map_err(|e| AppError::Storage(format!("Failed to serialize media index: {}", e)))?;
        std::fs::write(self.index_path(), data)?;
        Ok(())
    }
}

impl MediaStore for LocalMediaStore {
    fn insert(&self, entry: &MediaEntry, bytes: &[u8]) -> AppResult<MediaRecord> {
        let relative = checked_relative(&entry.relative_path)?;
        let file_name = checked_relative(&entry.display_name)?;

        let dir = self.root.join(relative);
        std::fs::create_dir_all(&dir)?;
        let path = dir.join(file_name);

        let _guard = self
            .index_lock
            .lock()
            .map_err(|_| AppError::Storage("Media index lock poisoned".to_string()))?;

        std::fs::write(&path, bytes)?;

        let mut records = self.read_index()?;
        let id = records.iter().map(|r| r.id).max().map_or(1, |max| max + 1);
        let record = MediaRecord {
            id,
            entry: entry.clone(),
            path,
            date_added: Utc::now(),
        };
        records.push(record.clone());
        self.write_index(&records)?;

        info!(
            id,
            display_name = %entry.display_name,
            path = %record.path.display(),
            "Media entry inserted"
        );
        Ok(record)
    }

    fn entries(&self) -> AppResult<Vec<MediaRecord>> {
        let _guard = self
            .index_lock
            .lock()
            .map_err(|_| AppError::Storage("Media index lock poisoned".to_string()))?;
        self.read_index()
    }
}

/// Reject absolute paths and parent traversal in store-relative names
fn checked_relative(value: &str) -> AppResult<&Path> {
    let path = Path::new(value);
    let valid = !value.is_empty()
        && path
            .components()
            .all(|c| matches!(c, Component::Normal(_)));
    if valid {
        Ok(path)
    } else {
        Err(AppError::Storage(format!("Invalid media path: {:?}", value)))
    }
}

/// Write a file that must not exist yet
pub fn write_new_file(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut file = std::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)?;
    file.write_all(bytes)?;
    file.sync_all()
}

/// Permission-scoped reference to a private file
///
/// Format: `content://<authority>/<root>/<path relative to the files dir>`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProviderUri {
    authority: String,
    relative: PathBuf,
}

impl ProviderUri {
    const SCHEME: &'static str = "content://";

    /// URI for a file inside the files directory
    pub fn for_file(authority: &str, files_dir: &Path, file: &Path) -> AppResult<Self> {
        let relative = file.strip_prefix(files_dir).map_err(|_| {
            AppError::Storage(format!(
                "{} is outside the shared root {}",
                file.display(),
                files_dir.display()
            ))
        })?;
        if relative.as_os_str().is_empty()
            || !relative
                .components()
                .all(|c| matches!(c, Component::Normal(_)))
        {
            return Err(AppError::Storage(format!(
                "Cannot share {} through the provider",
                file.display()
            )));
        }
        // URIs are text; a lossy name would not parse back to the same file
        if relative.to_str().is_none() {
            return Err(AppError::Storage(format!(
                "File name of {} is not valid UTF-8",
                file.display()
            )));
        }
        Ok(Self {
            authority: authority.to_string(),
            relative: relative.to_path_buf(),
        })
    }

    /// Parse a URI previously produced by [`ProviderUri::for_file`]
    pub fn parse(uri: &str) -> AppResult<Self> {
        let rest = uri
            .strip_prefix(Self::SCHEME)
            .ok_or_else(|| AppError::Storage(format!("Not a content URI: {}", uri)))?;
        let (authority, path) = rest
            .split_once('/')
            .ok_or_else(|| AppError::Storage(format!("Missing path in URI: {}", uri)))?;
        let relative = path
            .strip_prefix(PROVIDER_FILES_ROOT)
            .and_then(|p| p.strip_prefix('/'))
            .ok_or_else(|| AppError::Storage(format!("Unknown provider root in URI: {}", uri)))?;
        let relative = checked_relative(relative)?.to_path_buf();
        if authority.is_empty() {
            return Err(AppError::Storage(format!("Missing authority in URI: {}", uri)));
        }
        Ok(Self {
            authority: authority.to_string(),
            relative,
        })
    }

    pub fn authority(&self) -> &str {
        &self.authority
    }

    /// Filesystem path the URI grants access to
    pub fn resolve(&self, files_dir: &Path) -> PathBuf {
        files_dir.join(&self.relative)
    }
}

impl fmt::Display for ProviderUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let segments: Vec<_> = self
            .relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect();
        write!(
            f,
            "{}{}/{}/{}",
            Self::SCHEME,
            self.authority,
            PROVIDER_FILES_ROOT,
            segments.join("/")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{CAPTURED_IMAGE_NAME, DEFAULT_PROVIDER_AUTHORITY};

    #[test]
    fn temp_paths_are_unique_and_in_cache() {
        let layout = StorageLayout::under("/data/app");
        let a = layout.temp_image_path();
        let b = layout.temp_image_path();
        assert_ne!(a, b);
        assert!(a.starts_with("/data/app/cache"));
        let name = a.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with(TEMP_IMAGE_PREFIX));
        assert!(name.ends_with(TEMP_IMAGE_SUFFIX));
    }

    #[test]
    fn media_store_writes_file_and_index() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalMediaStore::new(dir.path());

        let record = store
            .insert(&MediaEntry::jpeg_picture(CAPTURED_IMAGE_NAME), b"jpeg")
            .unwrap();

        assert_eq!(record.id, 1);
        assert_eq!(record.path, dir.path().join("Pictures").join(CAPTURED_IMAGE_NAME));
        assert_eq!(std::fs::read(&record.path).unwrap(), b"jpeg");

        let entries = store.entries().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].id, record.id);
        assert_eq!(entries[0].entry, record.entry);
        assert_eq!(entries[0].path, record.path);
        assert_eq!(entries[0].entry.mime_type, "image/jpeg");
    }

    #[test]
    fn media_store_overwrites_same_display_name() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalMediaStore::new(dir.path());
        let entry = MediaEntry::jpeg_picture(CAPTURED_IMAGE_NAME);

        let first = store.insert(&entry, b"first").unwrap();
        let second = store.insert(&entry, b"second").unwrap();

        assert_eq!(first.path, second.path);
        assert_eq!(second.id, 2);
        assert_eq!(std::fs::read(&second.path).unwrap(), b"second");
    }

    #[test]
    fn media_store_rejects_traversal() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalMediaStore::new(dir.path());
        let entry = MediaEntry {
            display_name: "../escape.jpg".into(),
            mime_type: JPEG_MIME_TYPE.into(),
            relative_path: PICTURES_DIRECTORY.into(),
        };
        assert!(matches!(store.insert(&entry, b"x"), Err(AppError::Storage(_))));
    }

    #[test]
    fn write_new_file_refuses_existing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("once.jpg");
        write_new_file(&path, b"a").unwrap();
        let err = write_new_file(&path, b"b").unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::AlreadyExists);
    }

    #[test]
    fn provider_uri_format_and_resolution() {
        let files = Path::new("/data/app/files");
        let uri = ProviderUri::for_file(
            DEFAULT_PROVIDER_AUTHORITY,
            files,
            &files.join(CAPTURED_IMAGE_NAME),
        )
        .unwrap();

        assert_eq!(
            uri.to_string(),
            "content://com.example.fileprovider/files/captured_image.jpg"
        );
        assert_eq!(ProviderUri::parse(&uri.to_string()).unwrap(), uri);
        assert_eq!(uri.resolve(files), files.join(CAPTURED_IMAGE_NAME));
    }

    #[test]
    fn provider_uri_rejects_files_outside_root() {
        let err = ProviderUri::for_file(
            DEFAULT_PROVIDER_AUTHORITY,
            Path::new("/data/app/files"),
            Path::new("/data/app/cache/x.jpg"),
        )
        .unwrap_err();
        assert!(matches!(err, AppError::Storage(_)));
        assert!(ProviderUri::parse("file:///etc/passwd").is_err());
        assert!(ProviderUri::parse("content://a/files/../x").is_err());
    }

    #[test]
    fn provider_uri_rejects_non_utf8_names() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let files_dir = Path::new("/data/files");
        let file = files_dir.join(OsStr::from_bytes(b"capture\xff.jpg"));

        let err = ProviderUri::for_file(DEFAULT_PROVIDER_AUTHORITY, files_dir, &file).unwrap_err();

        assert!(matches!(err, AppError::Storage(_)));
    }
}
