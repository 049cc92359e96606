//! Resolution of logical request paths under the storage root.

use std::path::{Component, Path, PathBuf};

/// Root directory that main images and thumbnails live under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageRoot {
    root: PathBuf,
}

impl StorageRoot {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Map a logical path to its location under the root.
    ///
    /// Absolute logical paths are taken as relative to the root, `.` is
    /// dropped and `..` never climbs above the root.
    pub fn resolve(&self, logical: &Path) -> PathBuf {
        let mut relative = PathBuf::new();
        for component in logical.components() {
            match component {
                Component::Normal(part) => relative.push(part),
                Component::ParentDir => {
                    relative.pop();
                }
                Component::RootDir | Component::Prefix(_) | Component::CurDir => {}
            }
        }
        self.root.join(relative)
    }
}
