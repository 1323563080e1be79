//! Handlers for the `/files` resource.
//!
//! Files are addressed by opaque ids derived from their filenames, so a
//! rename hands back a record with a new id.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::Json;
use pixhost_core::assets::mutators::validate_mime_type;
use pixhost_core::error::CoreError;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::response::{FileResponse, FilesResponse, SuccessResponse};
use crate::state::AppState;

/// Multipart field carrying the uploaded file.
const FILE_FIELD: &str = "file";

/// Body of `PUT /api/files/{id}/rename`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenameRequest {
    #[serde(default)]
    pub new_name: Option<String>,
}

/// GET /api/files
///
/// List uploaded and static assets, newest first.
pub async fn list_files(State(state): State<AppState>) -> AppResult<Json<FilesResponse>> {
    let files = state.store.list().await?;
    Ok(Json(FilesResponse::new(files)))
}

/// POST /api/files/upload
///
/// Accepts a multipart form with a required `file` field. The declared
/// content type is checked before the body is read, and reading stops as
/// soon as the size ceiling is crossed.
pub async fn upload_file(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<(StatusCode, Json<FileResponse>)> {
    while let Some(mut field) = multipart.next_field().await? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let declared_name = field.file_name().unwrap_or_default().to_string();
        let mime_type = field.content_type().unwrap_or_default().to_string();
        validate_mime_type(&mime_type)?;

        let mut data = Vec::new();
        while let Some(chunk) = field.chunk().await? {
            data.extend_from_slice(&chunk);
            state.store.check_upload_size(data.len())?;
        }

        let file = state.store.upload(&data, &declared_name, &mime_type).await?;

        tracing::info!(
            name = %file.name,
            size = file.size,
            mime_type = %mime_type,
            "File uploaded",
        );

        return Ok((StatusCode::CREATED, Json(FileResponse::new(file))));
    }

    Err(AppError::BadRequest(format!(
        "Missing required '{FILE_FIELD}' field"
    )))
}

/// PUT /api/files/{id}/rename
///
/// Renames an uploaded file. Static files are read-only (403); an existing
/// destination is a conflict (409).
pub async fn rename_file(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<RenameRequest>, JsonRejection>,
) -> AppResult<Json<FileResponse>> {
    let Json(input) = payload?;
    let new_name = input
        .new_name
        .ok_or_else(|| CoreError::Validation("newName is required".into()))?;

    let file = state.store.rename(&id, &new_name).await?;

    tracing::info!(old_id = %id, new_id = %file.id, name = %file.name, "File renamed");

    Ok(Json(FileResponse::new(file)))
}

/// DELETE /api/files/{id}
///
/// Deletes an uploaded file. Static files are read-only (403).
pub async fn delete_file(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<SuccessResponse>> {
    state.store.delete(&id).await?;

    tracing::info!(id = %id, "File deleted");

    Ok(Json(SuccessResponse::ok()))
}
