//! Request handlers.
//!
//! Handlers delegate to the asset store in `pixhost_core` and map errors
//! via [`AppError`](crate::error::AppError).

pub mod files;
