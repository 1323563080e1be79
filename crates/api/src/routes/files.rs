//! Route definitions for hosted image files.
//!
//! All routes are mounted under `/api/files`.

use axum::routing::{delete, get, post, put};
use axum::Router;

use crate::handlers::files;
use crate::state::AppState;

/// File routes mounted at `/api/files`.
///
/// ```text
/// GET    /              -> list_files
/// POST   /upload        -> upload_file
/// DELETE /{id}          -> delete_file
/// PUT    /{id}/rename   -> rename_file
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(files::list_files))
        .route("/upload", post(files::upload_file))
        .route("/{id}", delete(files::delete_file))
        .route("/{id}/rename", put(files::rename_file))
}
