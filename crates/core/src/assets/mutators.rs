//! Upload, rename and delete.
//!
//! Only upload-directory assets can be mutated. Every operation is a single
//! filesystem call (create, rename, unlink) and takes no locks; two renames
//! racing for the same destination are not coordinated.

use std::io::ErrorKind;
use std::sync::atomic::Ordering;

use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;

use super::id::{self, AssetRef};
use super::naming::{disambiguate, resolve_rename_target, sanitize_upload_name};
use super::{Asset, AssetOrigin, AssetStore};
use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// MIME types accepted for upload.
pub const ALLOWED_MIME_TYPES: &[&str] = &[
    "image/jpeg",
    "image/png",
    "image/gif",
    "image/webp",
    "image/svg+xml",
];

/// Collision suffixes tried before an upload gives up.
const MAX_NAME_ATTEMPTS: usize = 16;

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validate that `mime_type` is in [`ALLOWED_MIME_TYPES`].
///
/// Parameters (`; charset=...`) and letter case are ignored.
pub fn validate_mime_type(mime_type: &str) -> Result<(), CoreError> {
    let essence = mime_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    if ALLOWED_MIME_TYPES.contains(&essence.as_str()) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Unsupported file type '{mime_type}'. Allowed: {}",
            ALLOWED_MIME_TYPES.join(", ")
        )))
    }
}

fn ensure_mutable(target: &AssetRef) -> Result<(), CoreError> {
    match target.origin {
        AssetOrigin::Uploaded => Ok(()),
        AssetOrigin::Static => Err(CoreError::Forbidden(format!(
            "Static asset '{}' is read-only",
            target.name
        ))),
    }
}

// ---------------------------------------------------------------------------
// Operations
// ---------------------------------------------------------------------------

impl AssetStore {
    /// Reject uploads larger than the configured ceiling.
    pub fn check_upload_size(&self, len: usize) -> Result<(), CoreError> {
        let max = self.config.max_upload_bytes;
        if len > max {
            return Err(CoreError::Validation(format!(
                "File is {len} bytes, larger than the {max} byte limit"
            )));
        }
        Ok(())
    }

    /// Store an uploaded image and return its record.
    ///
    /// Type and size are checked before anything touches the disk. A name
    /// already taken in the upload directory gets a timestamp suffix before
    /// its extension; the file is created with create-new semantics so an
    /// existing file is never overwritten.
    pub async fn upload(
        &self,
        bytes: &[u8],
        declared_name: &str,
        mime_type: &str,
    ) -> Result<Asset, CoreError> {
        validate_mime_type(mime_type)?;
        self.check_upload_size(bytes.len())?;
        if bytes.is_empty() {
            return Err(CoreError::Validation("File is empty".into()));
        }
        let name = sanitize_upload_name(declared_name)?;

        fs::create_dir_all(&self.config.upload_dir).await?;

        let mut candidate = name.clone();
        for _ in 0..MAX_NAME_ATTEMPTS {
            match self.write_new(&candidate, bytes).await {
                Ok(()) => return self.find(&candidate, AssetOrigin::Uploaded).await,
                Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                    candidate = disambiguate(&name, self.next_suffix());
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(CoreError::Conflict(format!(
            "Could not find a free name for '{name}'"
        )))
    }

    /// Rename an uploaded asset, returning the record under its new id.
    pub async fn rename(&self, id: &str, new_name: &str) -> Result<Asset, CoreError> {
        let target = id::decode(id)?;
        ensure_mutable(&target)?;
        let new_name = resolve_rename_target(new_name, &target.name)?;

        let current = self.find(&target.name, AssetOrigin::Uploaded).await?;
        if new_name == target.name {
            return Ok(current);
        }

        let dir = &self.config.upload_dir;
        let destination = dir.join(&new_name);
        if fs::try_exists(&destination).await? {
            return Err(CoreError::Conflict(format!(
                "A file named '{new_name}' already exists"
            )));
        }

        match fs::rename(dir.join(&target.name), &destination).await {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(CoreError::NotFound {
                    entity: "Asset",
                    id: id.to_string(),
                });
            }
            Err(e) => return Err(e.into()),
        }

        self.find(&new_name, AssetOrigin::Uploaded).await
    }

    /// Delete an uploaded asset.
    pub async fn delete(&self, id: &str) -> Result<(), CoreError> {
        let target = id::decode(id)?;
        ensure_mutable(&target)?;

        // Ensures the target is a regular file before unlinking.
        self.find(&target.name, AssetOrigin::Uploaded).await?;

        match fs::remove_file(self.config.upload_dir.join(&target.name)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(CoreError::NotFound {
                entity: "Asset",
                id: id.to_string(),
            }),
            Err(e) => Err(e.into()),
        }
    }

    async fn write_new(&self, name: &str, bytes: &[u8]) -> std::io::Result<()> {
        let path = self.config.upload_dir.join(name);
        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await?;

        let written = async {
            file.write_all(bytes).await?;
            file.flush().await
        }
        .await;

        if written.is_err() {
            drop(file);
            let _ = fs::remove_file(&path).await;
        }
        written
    }

    /// Millisecond timestamp, bumped so it strictly exceeds every suffix
    /// this store has handed out.
    fn next_suffix(&self) -> i64 {
        let now = chrono::Utc::now().timestamp_millis();
        let mut prev = self.last_suffix.load(Ordering::Relaxed);
        loop {
            let next = now.max(prev + 1);
            match self.last_suffix.compare_exchange_weak(
                prev,
                next,
                Ordering::Relaxed,
                Ordering::Relaxed,
            ) {
                Ok(_) => return next,
                Err(actual) => prev = actual,
            }
        }
    }
}
