//! Thumbnail filename parsing for the `<name>-<geometry>.<ext>` convention.
//!
//! The final path component is tokenized explicitly: the extension is split
//! off at the last `.`, then the remaining stem is split at the last `-` into
//! the base name and the geometry token.
//!
//! - `photos/cat-64x64.png` → name `cat`, geometry `64x64`
//! - `my-cat-200x200#.jpg` → name `my-cat`, geometry `200x200#`
//! - `v1.2-640x.webp` → name `v1.2`, geometry `640x`
//!
//! Names with no `-`, an empty name, an empty geometry token, or an
//! extension that is missing or not made of word characters are malformed.

use std::path::Path;

use crate::error::ThumbnailError;
use crate::geometry::Geometry;

/// The raw pieces of a thumbnail filename, before geometry parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThumbName<'a> {
    /// Base name of the main image (e.g. `cat`)
    pub name: &'a str,
    /// Unparsed geometry token (e.g. `64x64`)
    pub geometry: &'a str,
    /// Extension without the leading dot (e.g. `png`)
    pub extension: &'a str,
}

/// Split a filename into name, geometry token and extension.
///
/// Returns `None` when the filename does not follow the convention. No
/// geometry validation happens here beyond requiring a non-empty token.
pub fn split_thumb_name(file_name: &str) -> Option<ThumbName<'_>> {
    let (stem, extension) = file_name.rsplit_once('.')?;
    if extension.is_empty() || !extension.chars().all(is_word_char) {
        return None;
    }

    let (name, geometry) = stem.rsplit_once('-')?;
    if name.is_empty() || geometry.is_empty() {
        return None;
    }

    Some(ThumbName {
        name,
        geometry,
        extension,
    })
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Parse a thumbnail path into its base name and geometry.
///
/// Only the final path component is considered. A filename that doesn't
/// match the convention yields [`ThumbnailError::MalformedName`]; a geometry
/// token that doesn't parse yields [`ThumbnailError::Geometry`] carrying the
/// parser's error as is.
pub fn parse_thumb_name(path: &Path) -> Result<(String, Geometry), ThumbnailError> {
    let malformed = || ThumbnailError::MalformedName {
        path: path.to_path_buf(),
    };

    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(malformed)?;
    let parts = split_thumb_name(file_name).ok_or_else(malformed)?;
    let geometry = Geometry::parse(parts.geometry)?;

    Ok((parts.name.to_string(), geometry))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GeometryError;

    fn parse(path: &str) -> Result<(String, Geometry), ThumbnailError> {
        parse_thumb_name(Path::new(path))
    }

    #[test]
    fn test_simple_name() {
        let (name, geometry) = parse("photos/cat-64x64.png").unwrap();
        assert_eq!(name, "cat");
        assert_eq!(geometry.to_string(), "64x64");
    }

    #[test]
    fn test_bare_file_name() {
        let (name, geometry) = parse("42-200x200.jpg").unwrap();
        assert_eq!(name, "42");
        assert_eq!(geometry.to_string(), "200x200");
    }

    #[test]
    fn test_absolute_path() {
        let (name, _) = parse("/users/alice-100x100.jpg").unwrap();
        assert_eq!(name, "alice");
    }

    #[test]
    fn test_multiple_hyphens_split_at_last() {
        let (name, geometry) = parse("my-best-cat-200x200#.jpg").unwrap();
        assert_eq!(name, "my-best-cat");
        assert_eq!(geometry.to_string(), "200x200#");
    }

    #[test]
    fn test_dots_in_name() {
        let (name, geometry) = parse("v1.2-640x.webp").unwrap();
        assert_eq!(name, "v1.2");
        assert_eq!(geometry.to_string(), "640x");
    }

    #[test]
    fn test_hyphenated_directory_is_ignored() {
        let (name, _) = parse("my-photos/cat-64x64.png").unwrap();
        assert_eq!(name, "cat");
    }

    #[test]
    fn test_no_separator_is_malformed() {
        let err = parse("noseparatorhere.jpg").unwrap_err();
        assert!(matches!(err, ThumbnailError::MalformedName { ref path } if path == Path::new("noseparatorhere.jpg")));
    }

    #[test]
    fn test_empty_geometry_is_malformed() {
        assert!(matches!(
            parse("name-.jpg"),
            Err(ThumbnailError::MalformedName { .. })
        ));
    }

    #[test]
    fn test_empty_name_is_malformed() {
        assert!(matches!(
            parse("-64x64.jpg"),
            Err(ThumbnailError::MalformedName { .. })
        ));
    }

    #[test]
    fn test_missing_extension_is_malformed() {
        assert!(matches!(
            parse("cat-64x64"),
            Err(ThumbnailError::MalformedName { .. })
        ));
        assert!(matches!(
            parse("cat-64x64."),
            Err(ThumbnailError::MalformedName { .. })
        ));
    }

    #[test]
    fn test_non_word_extension_is_malformed() {
        assert!(matches!(
            parse("cat-64x64.j-pg"),
            Err(ThumbnailError::MalformedName { .. })
        ));
    }

    #[test]
    fn test_non_ascii_extension_is_malformed() {
        assert!(matches!(
            parse("photos/cat-64x64.jpé"),
            Err(ThumbnailError::MalformedName { .. })
        ));
        assert!(split_thumb_name("cat-64x64.ｐｎｇ").is_none());
    }

    #[test]
    fn test_directory_only_is_malformed() {
        assert!(matches!(
            parse("/"),
            Err(ThumbnailError::MalformedName { .. })
        ));
    }

    #[test]
    fn test_bad_geometry_propagates_parser_error() {
        let err = parse("cat-big.jpg").unwrap_err();
        assert!(matches!(
            err,
            ThumbnailError::Geometry(GeometryError::InvalidNumber { .. })
        ));
    }

    #[test]
    fn test_split_exposes_raw_tokens() {
        let parts = split_thumb_name("cat-064x064.png").unwrap();
        assert_eq!(parts.name, "cat");
        assert_eq!(parts.geometry, "064x064");
        assert_eq!(parts.extension, "png");
    }
}
