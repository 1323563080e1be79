//! Domain logic for the pixhost image-asset service.
//!
//! Everything here works directly against the filesystem via `tokio::fs`;
//! the HTTP layer lives in `pixhost-api`.

pub mod assets;
pub mod error;
pub mod types;
