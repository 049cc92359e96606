//! Image loading and resizing backends.
//!
//! The generator only needs two operations: load a main image from disk
//! into a handle, and resize that handle in place to a geometry given in
//! canonical text form. [`ImageBackend`] and [`ImageHandle`] describe that
//! seam so tests can swap in a recording mock.
//!
//! The production implementation is [`RustBackend`], pure Rust on top of
//! the `image` crate (Lanczos3 resampling).

mod calculations;
pub mod rust_backend;

pub use calculations::{plan_resize, ResizePlan};
pub use rust_backend::{LoadedImage, RustBackend};

use std::path::Path;

use crate::error::BackendError;

/// A loaded image that can be resized in place.
pub trait ImageHandle {
    /// Resize to the given canonical geometry text (e.g. `64x64#`).
    fn resize(&mut self, geometry: &str) -> Result<(), BackendError>;
}

/// Loads main images from absolute paths.
pub trait ImageBackend: Send + Sync {
    type Image: ImageHandle;

    fn load(&self, path: &Path) -> Result<Self::Image, BackendError>;
}

#[cfg(test)]
pub(crate) mod mock {
    use super::*;
    use std::path::PathBuf;
    use std::sync::{Arc, Mutex};

    /// Operations observed by the mock, in call order.
    #[derive(Debug, Clone, PartialEq)]
    pub enum RecordedOp {
        Load(PathBuf),
        Resize { source: PathBuf, geometry: String },
    }

    /// Mock backend that records operations without touching the filesystem.
    #[derive(Default)]
    pub struct MockBackend {
        pub operations: Arc<Mutex<Vec<RecordedOp>>>,
        pub fail_load: bool,
        pub fail_resize: bool,
    }

    #[derive(Debug)]
    pub struct MockImage {
        pub source: PathBuf,
        pub resized_to: Option<String>,
        operations: Arc<Mutex<Vec<RecordedOp>>>,
        fail_resize: bool,
    }

    impl MockBackend {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn failing_load() -> Self {
            Self {
                fail_load: true,
                ..Self::default()
            }
        }

        pub fn failing_resize() -> Self {
            Self {
                fail_resize: true,
                ..Self::default()
            }
        }

        pub fn get_operations(&self) -> Vec<RecordedOp> {
            self.operations.lock().unwrap().clone()
        }
    }

    impl ImageBackend for MockBackend {
        type Image = MockImage;

        fn load(&self, path: &Path) -> Result<MockImage, BackendError> {
            self.operations
                .lock()
                .unwrap()
                .push(RecordedOp::Load(path.to_path_buf()));

            if self.fail_load {
                return Err(BackendError::NotFound(path.to_path_buf()));
            }
            Ok(MockImage {
                source: path.to_path_buf(),
                resized_to: None,
                operations: Arc::clone(&self.operations),
                fail_resize: self.fail_resize,
            })
        }
    }

    impl ImageHandle for MockImage {
        fn resize(&mut self, geometry: &str) -> Result<(), BackendError> {
            self.operations.lock().unwrap().push(RecordedOp::Resize {
                source: self.source.clone(),
                geometry: geometry.to_string(),
            });

            if self.fail_resize {
                return Err(BackendError::OutputTooLarge {
                    width: 0,
                    height: 0,
                    max_dim: 0,
                });
            }
            self.resized_to = Some(geometry.to_string());
            Ok(())
        }
    }

    #[test]
    fn test_mock_records_load_and_resize() {
        let backend = MockBackend::new();
        let mut image = backend.load(Path::new("/root/cat.png")).unwrap();
        image.resize("64x64").unwrap();

        assert_eq!(image.resized_to.as_deref(), Some("64x64"));
        assert_eq!(
            backend.get_operations(),
            vec![
                RecordedOp::Load(PathBuf::from("/root/cat.png")),
                RecordedOp::Resize {
                    source: PathBuf::from("/root/cat.png"),
                    geometry: "64x64".to_string(),
                },
            ]
        );
    }

    #[test]
    fn test_mock_failing_load_records_attempt() {
        let backend = MockBackend::failing_load();
        assert!(backend.load(Path::new("/missing.png")).is_err());
        assert_eq!(backend.get_operations().len(), 1);
    }
}
