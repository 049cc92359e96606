//! Thumbnail generation: policy check, main image lookup, resize.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::backend::{ImageBackend, ImageHandle, RustBackend};
use crate::config::Config;
use crate::error::{ConfigError, RequestError, ThumbnailError};
use crate::policy::{AllowList, GeometryPolicy};
use crate::request::ThumbnailRequest;
use crate::storage::StorageRoot;

/// A failed generation, with the loaded image when there is one.
///
/// `image` is only set when loading succeeded and the resize failed, so the
/// caller can inspect or clean up the handle.
pub struct GenerateFailure<H> {
    pub image: Option<H>,
    pub error: ThumbnailError,
}

impl<H> GenerateFailure<H> {
    fn without_image(error: ThumbnailError) -> Self {
        Self { image: None, error }
    }

    pub fn error(&self) -> &ThumbnailError {
        &self.error
    }

    pub fn image(&self) -> Option<&H> {
        self.image.as_ref()
    }

    pub fn into_parts(self) -> (Option<H>, ThumbnailError) {
        (self.image, self.error)
    }

    pub fn into_error(self) -> ThumbnailError {
        self.error
    }
}

impl<H> fmt::Debug for GenerateFailure<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GenerateFailure")
            .field("has_image", &self.image.is_some())
            .field("error", &self.error)
            .finish()
    }
}

impl<H> fmt::Display for GenerateFailure<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.error, f)
    }
}

impl<H> std::error::Error for GenerateFailure<H> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        std::error::Error::source(&self.error)
    }
}

impl<H> From<ThumbnailError> for GenerateFailure<H> {
    fn from(error: ThumbnailError) -> Self {
        Self::without_image(error)
    }
}

/// Derives thumbnails from main images under a storage root.
///
/// Holds only read-only state, so one generator can serve concurrent
/// requests when the backend and policy are `Sync`.
pub struct ThumbnailGenerator<B, P = AllowList> {
    storage: StorageRoot,
    policy: P,
    backend: B,
}

impl ThumbnailGenerator<RustBackend, AllowList> {
    /// Build the production generator from configuration.
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        Ok(Self::new(
            StorageRoot::new(config.storage_root()),
            AllowList::from_config(&config.policy)?,
            RustBackend::from_config(config),
        ))
    }
}

impl<B, P> ThumbnailGenerator<B, P>
where
    B: ImageBackend,
    P: GeometryPolicy,
{
    pub fn new(storage: StorageRoot, policy: P, backend: B) -> Self {
        Self {
            storage,
            policy,
            backend,
        }
    }

    pub fn storage(&self) -> &StorageRoot {
        &self.storage
    }

    pub fn policy(&self) -> &P {
        &self.policy
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Filesystem location of the request's main image.
    pub fn main_full_path(&self, request: &ThumbnailRequest) -> PathBuf {
        self.storage.resolve(request.main_path())
    }

    /// Filesystem location of the requested thumbnail itself.
    pub fn full_path(&self, request: &ThumbnailRequest) -> PathBuf {
        self.storage.resolve(request.request_path())
    }

    /// Whether the policy accepts the request's geometry.
    pub fn is_allowed(&self, request: &ThumbnailRequest) -> bool {
        self.policy.is_allowed(&request.geometry().to_string())
    }

    /// Generate the thumbnail for a parsed request.
    ///
    /// The policy is checked before the main image is touched. A load
    /// failure returns no image; a resize failure returns the loaded image
    /// alongside the error.
    pub fn generate(
        &self,
        request: &ThumbnailRequest,
    ) -> Result<B::Image, GenerateFailure<B::Image>> {
        let geometry = request.geometry().to_string();
        if !self.policy.is_allowed(&geometry) {
            return Err(ThumbnailError::GeometryNotAllowed { geometry }.into());
        }

        let source_path = self.main_full_path(request);
        tracing::debug!("Generating from {}", source_path.display());

        let start = std::time::Instant::now();
        let mut image = self
            .backend
            .load(&source_path)
            .map_err(|e| GenerateFailure::without_image(ThumbnailError::Load(e)))?;
        tracing::trace!("  Load: {:?}", start.elapsed());

        let resize_start = std::time::Instant::now();
        if let Err(e) = image.resize(&geometry) {
            return Err(GenerateFailure {
                image: Some(image),
                error: ThumbnailError::Resize(e),
            });
        }
        tracing::trace!("  Resize: {:?}", resize_start.elapsed());

        Ok(image)
    }

    /// Parse a requested path and generate its thumbnail.
    pub fn generate_path(
        &self,
        path: impl AsRef<Path>,
    ) -> Result<(ThumbnailRequest, B::Image), GenerateFailure<B::Image>> {
        let request = ThumbnailRequest::from_path(path).map_err(RequestError::into_inner)?;
        let image = self.generate(&request)?;
        Ok((request, image))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::mock::{MockBackend, RecordedOp};
    use crate::error::BackendError;

    fn generator(backend: MockBackend) -> ThumbnailGenerator<MockBackend> {
        ThumbnailGenerator::new(
            StorageRoot::new("/srv/public"),
            AllowList::new(["64x64", "200x200#"]).unwrap(),
            backend,
        )
    }

    #[test]
    fn test_generate_loads_main_image_and_resizes() {
        let gen = generator(MockBackend::new());
        let request = ThumbnailRequest::from_path("photos/cat-64x64.png").unwrap();
        assert_eq!(request.main_path(), Path::new("photos/cat.png"));

        let image = gen.generate(&request).unwrap();
        assert_eq!(image.resized_to.as_deref(), Some("64x64"));
        assert_eq!(
            gen.backend().get_operations(),
            vec![
                RecordedOp::Load(PathBuf::from("/srv/public/photos/cat.png")),
                RecordedOp::Resize {
                    source: PathBuf::from("/srv/public/photos/cat.png"),
                    geometry: "64x64".to_string(),
                },
            ]
        );
    }

    #[test]
    fn test_generate_uses_canonical_geometry_text() {
        let gen = generator(MockBackend::new());
        let request = ThumbnailRequest::from_path("photos/cat-064x064.png").unwrap();

        let image = gen.generate(&request).unwrap();
        assert_eq!(image.resized_to.as_deref(), Some("64x64"));
    }

    #[test]
    fn test_disallowed_geometry_touches_nothing() {
        let gen = generator(MockBackend::new());
        let request = ThumbnailRequest::from_path("photos/cat-9999x9999.png").unwrap();

        let failure = gen.generate(&request).unwrap_err();
        assert!(failure.image().is_none());
        assert!(matches!(
            failure.error(),
            ThumbnailError::GeometryNotAllowed { geometry } if geometry == "9999x9999"
        ));
        assert!(gen.backend().get_operations().is_empty());
    }

    #[test]
    fn test_load_failure_propagates_without_image() {
        let gen = generator(MockBackend::failing_load());
        let request = ThumbnailRequest::from_path("photos/cat-64x64.png").unwrap();

        let failure = gen.generate(&request).unwrap_err();
        let (image, error) = failure.into_parts();
        assert!(image.is_none());
        assert!(matches!(
            error,
            ThumbnailError::Load(BackendError::NotFound(ref p)) if p == Path::new("/srv/public/photos/cat.png")
        ));
        assert_eq!(gen.backend().get_operations().len(), 1);
    }

    #[test]
    fn test_resize_failure_returns_loaded_image() {
        let gen = generator(MockBackend::failing_resize());
        let request = ThumbnailRequest::from_path("photos/cat-200x200#.png").unwrap();

        let failure = gen.generate(&request).unwrap_err();
        assert!(matches!(failure.error(), ThumbnailError::Resize(_)));
        let image = failure.image().unwrap();
        assert_eq!(image.source, PathBuf::from("/srv/public/photos/cat.png"));
        assert!(image.resized_to.is_none());
    }

    #[test]
    fn test_derived_paths() {
        let gen = generator(MockBackend::new());
        let request = ThumbnailRequest::from_path("/users/42-200x200.jpg").unwrap();

        assert_eq!(
            gen.main_full_path(&request),
            PathBuf::from("/srv/public/users/42.jpg")
        );
        assert_eq!(
            gen.full_path(&request),
            PathBuf::from("/srv/public/users/42-200x200.jpg")
        );
        assert!(gen.backend().get_operations().is_empty());
    }

    #[test]
    fn test_is_allowed_matches_generate() {
        let gen = generator(MockBackend::new());
        let allowed = ThumbnailRequest::from_path("a/b-200x200#.png").unwrap();
        let denied = ThumbnailRequest::from_path("a/b-200x200.png").unwrap();
        assert!(gen.is_allowed(&allowed));
        assert!(!gen.is_allowed(&denied));
    }

    #[test]
    fn test_generate_path_reports_malformed_name() {
        let gen = generator(MockBackend::new());
        let failure = gen.generate_path("photos/noseparatorhere.jpg").unwrap_err();
        assert!(matches!(
            failure.error(),
            ThumbnailError::MalformedName { .. }
        ));
        assert!(gen.backend().get_operations().is_empty());
    }

    #[test]
    fn test_generate_path_success() {
        let gen = generator(MockBackend::new());
        let (request, image) = gen.generate_path("cat-64x64.png").unwrap();
        assert_eq!(request.main_path(), Path::new("cat.png"));
        assert_eq!(image.source, PathBuf::from("/srv/public/cat.png"));
    }

    #[test]
    fn test_closure_policy() {
        let gen = ThumbnailGenerator::new(
            StorageRoot::new("/r"),
            |g: &str| g == "1x1",
            MockBackend::new(),
        );
        let request = ThumbnailRequest::from_path("a-2x2.png").unwrap();
        assert!(gen.generate(&request).is_err());
        assert!(gen.backend().get_operations().is_empty());
    }

    #[test]
    fn test_failure_display_is_inner_error() {
        let failure: GenerateFailure<()> = ThumbnailError::GeometryNotAllowed {
            geometry: "1x1".into(),
        }
        .into();
        assert_eq!(failure.to_string(), "Geometry not allowed: 1x1");
    }
}
