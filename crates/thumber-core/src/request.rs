//! Parsed thumbnail requests.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::RequestError;
use crate::geometry::Geometry;
use crate::naming::parse_thumb_name;

/// A requested thumbnail path, broken into the parts needed to find its main
/// image and resize it.
///
/// Every field is derived once, in [`ThumbnailRequest::from_path`]. In
/// particular `main_path` is always `directory/base_name + extension`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ThumbnailRequest {
    request_path: PathBuf,
    directory: PathBuf,
    base_name: String,
    extension: String,
    geometry: Geometry,
    main_path: PathBuf,
}

impl ThumbnailRequest {
    /// Build a request from a path such as `avatars/alice-100x100.jpg`.
    ///
    /// On failure the returned [`RequestError`] carries the requested path
    /// and the naming or geometry error unchanged.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, RequestError> {
        let path = path.as_ref();
        let (base_name, geometry) = parse_thumb_name(path).map_err(|source| RequestError {
            request_path: path.to_path_buf(),
            source,
        })?;

        let directory = path.parent().map(Path::to_path_buf).unwrap_or_default();
        // parse_thumb_name guarantees a word-character extension
        let extension = path
            .extension()
            .map(|ext| format!(".{}", ext.to_string_lossy()))
            .unwrap_or_default();
        let main_path = directory.join(format!("{base_name}{extension}"));

        Ok(Self {
            request_path: path.to_path_buf(),
            directory,
            base_name,
            extension,
            geometry,
            main_path,
        })
    }

    /// The path as requested (e.g. `avatars/alice-100x100.jpg`).
    pub fn request_path(&self) -> &Path {
        &self.request_path
    }

    /// Directory part of the request path; empty for a bare filename.
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Base name of the main image (e.g. `alice`).
    pub fn base_name(&self) -> &str {
        &self.base_name
    }

    /// Extension including the leading dot (e.g. `.jpg`).
    pub fn extension(&self) -> &str {
        &self.extension
    }

    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    /// Relative path of the main image (e.g. `avatars/alice.jpg`).
    pub fn main_path(&self) -> &Path {
        &self.main_path
    }
}
