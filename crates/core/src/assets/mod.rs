//! Filesystem-backed asset store.
//!
//! Assets are never persisted as records: every listing is derived from the
//! upload and static directories at query time, and an asset's identity is
//! an encoding of its current filename.
//!
//! - [`registry`] derives asset records from directory scans.
//! - [`mutators`] implements upload, rename and delete.
//! - [`id`] encodes and decodes the opaque ids.
//! - [`naming`] holds filename validation and collision suffixing.

pub mod id;
pub mod mutators;
pub mod naming;
pub mod registry;

use std::path::{Path, PathBuf};
use std::sync::atomic::AtomicI64;

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::Serialize;

use crate::types::Timestamp;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// URL prefix under which upload-directory files are served.
pub const UPLOAD_URL_PREFIX: &str = "/uploads";

/// Default upload size ceiling (10 MiB).
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Bytes escaped when a filename becomes a URL path segment. Everything but
/// the RFC 3986 unreserved characters.
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Where an asset lives, which also decides whether it may be mutated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetOrigin {
    /// Mutable upload directory.
    Uploaded,
    /// Read-only, deploy-time static directory.
    Static,
}

impl AssetOrigin {
    pub fn is_uploaded(self) -> bool {
        matches!(self, AssetOrigin::Uploaded)
    }
}

/// A hosted image file as reported to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    /// Opaque id, see [`id::encode`]. Changes whenever the file is renamed.
    pub id: String,
    /// Filename as stored on disk.
    pub name: String,
    /// Path under which the file is served.
    pub url: String,
    /// Size in bytes.
    pub size: u64,
    pub modified_at: Timestamp,
    pub is_uploaded: bool,
}

/// Directory layout and limits for an [`AssetStore`].
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Mutable directory receiving uploads. Created on first upload.
    pub upload_dir: PathBuf,
    /// Read-only directory of deployed files.
    pub static_dir: PathBuf,
    /// Largest accepted upload in bytes.
    pub max_upload_bytes: usize,
}

impl StoreConfig {
    pub fn new(upload_dir: impl Into<PathBuf>, static_dir: impl Into<PathBuf>) -> Self {
        Self {
            upload_dir: upload_dir.into(),
            static_dir: static_dir.into(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

/// Asset registry and mutators over a pair of directories.
///
/// Holds no listing cache; each operation reads the filesystem's current
/// state. Share it behind an `Arc`.
#[derive(Debug)]
pub struct AssetStore {
    config: StoreConfig,
    /// Last collision suffix handed out, kept strictly increasing.
    last_suffix: AtomicI64,
}

impl AssetStore {
    pub fn new(config: StoreConfig) -> Self {
        Self {
            config,
            last_suffix: AtomicI64::new(0),
        }
    }

    /// Directory holding assets of the given origin.
    pub fn dir_for(&self, origin: AssetOrigin) -> &Path {
        match origin {
            AssetOrigin::Uploaded => &self.config.upload_dir,
            AssetOrigin::Static => &self.config.static_dir,
        }
    }
}

/// Public URL of a file with the given origin. The name is percent-encoded
/// as a single path segment.
pub fn url_for(name: &str, origin: AssetOrigin) -> String {
    let segment = utf8_percent_encode(name, PATH_SEGMENT);
    match origin {
        AssetOrigin::Uploaded => format!("{UPLOAD_URL_PREFIX}/{segment}"),
        AssetOrigin::Static => format!("/{segment}"),
    }
}
