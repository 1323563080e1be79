//! Shared response envelope types for API handlers.
//!
//! Successful responses carry `"success": true` next to their payload, the
//! mirror of the `{ "success": false, "error": ... }` body produced by
//! [`AppError`](crate::error::AppError).

use pixhost_core::assets::Asset;
use serde::Serialize;

/// `{ "success": true, "files": [...] }`
#[derive(Debug, Serialize)]
pub struct FilesResponse {
    pub success: bool,
    pub files: Vec<Asset>,
}

impl FilesResponse {
    pub fn new(files: Vec<Asset>) -> Self {
        Self {
            success: true,
            files,
        }
    }
}

/// `{ "success": true, "file": {...} }`
#[derive(Debug, Serialize)]
pub struct FileResponse {
    pub success: bool,
    pub file: Asset,
}

impl FileResponse {
    pub fn new(file: Asset) -> Self {
        Self {
            success: true,
            file,
        }
    }
}

/// `{ "success": true }` for operations without a payload.
#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

impl SuccessResponse {
    pub fn ok() -> Self {
        Self { success: true }
    }
}
