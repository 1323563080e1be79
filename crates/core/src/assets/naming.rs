//! Filename rules for uploaded and renamed assets.

use super::id::STATIC_MARKER;
use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Longest accepted filename in bytes, the usual filesystem limit.
/// [`disambiguate`] shortens the stem so suffixed names stay within it.
pub const MAX_NAME_BYTES: usize = 255;

/// Extensions (lowercase) recognised as images in the static directory.
pub const IMAGE_EXTENSIONS: &[&str] = &[
    "jpg", "jpeg", "png", "gif", "webp", "svg", "avif", "ico", "bmp",
];

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// True when `name` can only ever resolve to an entry directly inside a
/// directory: non-empty, not `.`/`..`, no separators or NUL bytes.
pub fn is_plain_file_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\', '\0'])
}

fn check_name(name: &str) -> Result<(), CoreError> {
    if name.is_empty() {
        return Err(CoreError::Validation("File name must not be empty".into()));
    }
    if !is_plain_file_name(name) {
        return Err(CoreError::Validation(format!("Invalid file name '{name}'")));
    }
    if name.len() > MAX_NAME_BYTES {
        return Err(CoreError::Validation(format!(
            "File name exceeds {MAX_NAME_BYTES} bytes"
        )));
    }
    if name.starts_with(STATIC_MARKER) {
        return Err(CoreError::Validation(format!(
            "File name must not start with '{STATIC_MARKER}'"
        )));
    }
    Ok(())
}

/// Reduce a client-declared upload name to a safe filename.
///
/// Browsers may send a full client-side path; only its last component is
/// kept.
pub fn sanitize_upload_name(declared: &str) -> Result<String, CoreError> {
    let base = declared.rsplit(['/', '\\']).next().unwrap_or_default().trim();
    check_name(base)?;
    Ok(base.to_string())
}

/// Validate a rename target and resolve the final filename.
///
/// Separators are rejected rather than stripped. Trailing dots are dropped,
/// and when what remains has no extension, the extension of `current` is
/// kept.
pub fn resolve_rename_target(new_name: &str, current: &str) -> Result<String, CoreError> {
    let trimmed = new_name.trim();
    if trimmed.contains(['/', '\\']) {
        return Err(CoreError::Validation(
            "File name must not contain path separators".into(),
        ));
    }
    let base = trimmed.trim_end_matches('.');

    let resolved = match (extension(base), extension(current)) {
        (None, Some(ext)) if !base.is_empty() => format!("{base}.{ext}"),
        _ => base.to_string(),
    };

    check_name(&resolved)?;
    Ok(resolved)
}

// ---------------------------------------------------------------------------
// Extensions and suffixes
// ---------------------------------------------------------------------------

/// Split `name` into stem and extension. Leading-dot names (`.hidden`) and
/// trailing dots have no extension.
fn split_extension(name: &str) -> (&str, Option<&str>) {
    match name.rfind('.') {
        Some(i) if i > 0 && i + 1 < name.len() => (&name[..i], Some(&name[i + 1..])),
        _ => (name, None),
    }
}

/// Extension of `name`, without the dot.
pub fn extension(name: &str) -> Option<&str> {
    split_extension(name).1
}

/// Case-insensitive check against [`IMAGE_EXTENSIONS`].
pub fn has_image_extension(name: &str) -> bool {
    extension(name)
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            IMAGE_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}

/// Insert `-{suffix}` before the extension of `name`.
///
/// The stem is shortened (on a character boundary) when the result would
/// exceed [`MAX_NAME_BYTES`]. An extension too long to keep is treated as
/// part of the stem.
///
/// ```
/// use pixhost_core::assets::naming::disambiguate;
///
/// assert_eq!(disambiguate("cat.png", 42), "cat-42.png");
/// assert_eq!(disambiguate("README", 42), "README-42");
/// ```
pub fn disambiguate(name: &str, suffix: i64) -> String {
    let (stem, tail) = match split_extension(name) {
        (stem, Some(ext)) if ext.len() + 1 < MAX_NAME_BYTES / 2 => {
            (stem, format!("-{suffix}.{ext}"))
        }
        _ => (name, format!("-{suffix}")),
    };

    let mut end = stem.len().min(MAX_NAME_BYTES.saturating_sub(tail.len()));
    while !stem.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}{tail}", &stem[..end])
}
