pub mod files;
pub mod health;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /health                                          service health (GET)
///
/// /files                                           list (GET)
/// /files/upload                                    upload, multipart `file` (POST)
/// /files/{id}                                      delete (DELETE)
/// /files/{id}/rename                               rename (PUT)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .nest("/files", files::router())
}
