//! Asset listing.
//!
//! Derives asset records from the upload and static directories on every
//! call. Static entries are filtered by image extension; upload entries are
//! not filtered by type. Names an id could not address are left out.

use std::fs::Metadata;
use std::io::ErrorKind;

use tokio::fs;

use super::id::STATIC_MARKER;
use super::naming::{has_image_extension, is_plain_file_name};
use super::{id, url_for, Asset, AssetOrigin, AssetStore};
use crate::error::CoreError;
use crate::types::Timestamp;

impl AssetStore {
    /// List every asset in both directories, newest first.
    ///
    /// A missing directory contributes nothing; any other read failure is
    /// returned as [`CoreError::Io`].
    pub async fn list(&self) -> Result<Vec<Asset>, CoreError> {
        let mut assets = self.scan(AssetOrigin::Uploaded).await?;
        assets.extend(self.scan(AssetOrigin::Static).await?);

        assets.sort_by(|a, b| {
            b.modified_at
                .cmp(&a.modified_at)
                .then_with(|| a.name.cmp(&b.name))
        });
        Ok(assets)
    }

    /// Build the record for a single file, reading its current metadata.
    pub async fn find(&self, name: &str, origin: AssetOrigin) -> Result<Asset, CoreError> {
        let not_found = || CoreError::NotFound {
            entity: "Asset",
            id: id::encode(name, origin),
        };

        let metadata = match fs::metadata(self.dir_for(origin).join(name)).await {
            Ok(m) => m,
            Err(e) if e.kind() == ErrorKind::NotFound => return Err(not_found()),
            Err(e) => return Err(e.into()),
        };
        if !metadata.is_file() {
            return Err(not_found());
        }

        build_record(name, origin, &metadata)
    }

    async fn scan(&self, origin: AssetOrigin) -> Result<Vec<Asset>, CoreError> {
        let dir = self.dir_for(origin);
        let mut entries = match fs::read_dir(dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut assets = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            // Ids are built from UTF-8 names; anything else cannot be addressed.
            let Ok(name) = entry.file_name().into_string() else {
                continue;
            };
            if !is_addressable(&name, origin) {
                continue;
            }
            if origin == AssetOrigin::Static && !has_image_extension(&name) {
                continue;
            }

            // Follows symlinks. Entries removed mid-scan are skipped.
            let metadata = match fs::metadata(entry.path()).await {
                Ok(m) => m,
                Err(e) if e.kind() == ErrorKind::NotFound => continue,
                Err(e) => return Err(e.into()),
            };
            if !metadata.is_file() {
                continue;
            }

            assets.push(build_record(&name, origin, &metadata)?);
        }

        Ok(assets)
    }
}

/// True when the id built from `name` decodes back to the same file.
fn is_addressable(name: &str, origin: AssetOrigin) -> bool {
    is_plain_file_name(name)
        && !(origin == AssetOrigin::Uploaded && name.starts_with(STATIC_MARKER))
}

fn build_record(name: &str, origin: AssetOrigin, metadata: &Metadata) -> Result<Asset, CoreError> {
    let modified_at: Timestamp = metadata.modified()?.into();

    Ok(Asset {
        id: id::encode(name, origin),
        name: name.to_string(),
        url: url_for(name, origin),
        size: metadata.len(),
        modified_at,
        is_uploaded: origin.is_uploaded(),
    })
}
