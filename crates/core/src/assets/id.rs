//! Opaque asset ids.
//!
//! An id is the filename (prefixed with [`STATIC_MARKER`] for static files)
//! encoded as URL-safe, unpadded base64, so it fits in a single path segment.
//! It is not a surrogate key: renaming a file changes its id, and the
//! encoding offers no collision resistance.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;

use super::naming;
use super::AssetOrigin;
use crate::error::CoreError;

/// Prefix marking an id as referring to the static directory.
pub const STATIC_MARKER: &str = "static:";

/// A decoded id: the filename plus the directory it refers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetRef {
    pub name: String,
    pub origin: AssetOrigin,
}

/// Encode a filename into an opaque id.
pub fn encode(name: &str, origin: AssetOrigin) -> String {
    match origin {
        AssetOrigin::Uploaded => URL_SAFE_NO_PAD.encode(name),
        AssetOrigin::Static => URL_SAFE_NO_PAD.encode(format!("{STATIC_MARKER}{name}")),
    }
}

/// Decode an opaque id back into the exact filename it was built from.
///
/// Rejects ids that are not valid base64, not UTF-8, or that decode to
/// anything other than a plain filename (no separators, no `..`).
pub fn decode(id: &str) -> Result<AssetRef, CoreError> {
    let malformed = || CoreError::Validation(format!("Malformed asset id '{id}'"));

    let bytes = URL_SAFE_NO_PAD.decode(id).map_err(|_| malformed())?;
    let raw = String::from_utf8(bytes).map_err(|_| malformed())?;

    let (name, origin) = match raw.strip_prefix(STATIC_MARKER) {
        Some(rest) => (rest.to_string(), AssetOrigin::Static),
        None => (raw, AssetOrigin::Uploaded),
    };

    if !naming::is_plain_file_name(&name) {
        return Err(malformed());
    }

    Ok(AssetRef { name, origin })
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn uploaded_name_round_trips() {
        let id = encode("cat.png", AssetOrigin::Uploaded);
        let decoded = decode(&id).unwrap();
        assert_eq!(decoded.name, "cat.png");
        assert_eq!(decoded.origin, AssetOrigin::Uploaded);
    }

    #[test]
    fn static_name_carries_marker() {
        let id = encode("logo.svg", AssetOrigin::Static);
        assert_ne!(id, encode("logo.svg", AssetOrigin::Uploaded));

        let decoded = decode(&id).unwrap();
        assert_eq!(decoded.name, "logo.svg");
        assert_eq!(decoded.origin, AssetOrigin::Static);
    }

    #[test]
    fn non_ascii_names_survive() {
        let name = "фото café 猫.jpg";
        let decoded = decode(&encode(name, AssetOrigin::Uploaded)).unwrap();
        assert_eq!(decoded.name, name);
    }

    #[test]
    fn ids_are_path_safe() {
        // Bytes chosen so standard base64 would emit '+' and '/'.
        let id = encode("??>>.png", AssetOrigin::Uploaded);
        assert!(!id.contains('/'));
        assert!(!id.contains('+'));
        assert!(!id.contains('='));
    }

    #[test]
    fn garbage_is_rejected() {
        assert_matches!(decode("not base64!"), Err(CoreError::Validation(_)));
    }

    #[test]
    fn invalid_utf8_is_rejected() {
        let id = URL_SAFE_NO_PAD.encode([0xff, 0xfe, 0xfd]);
        assert_matches!(decode(&id), Err(CoreError::Validation(_)));
    }

    #[test]
    fn traversal_is_rejected() {
        let id = URL_SAFE_NO_PAD.encode("../secret.png");
        assert_matches!(decode(&id), Err(CoreError::Validation(_)));

        let id = URL_SAFE_NO_PAD.encode("..");
        assert_matches!(decode(&id), Err(CoreError::Validation(_)));
    }

    #[test]
    fn empty_id_is_rejected() {
        assert_matches!(decode(""), Err(CoreError::Validation(_)));
    }
}
