//! Thumber Core - on-demand thumbnails from geometry-suffixed file names.
//!
//! A client asks for `photos/cat-64x64.png`; Thumber finds the main image
//! `photos/cat.png` under the storage root, checks `64x64` against the
//! geometry policy and resizes the main image.
//!
//! # Architecture
//!
//! ```text
//! path → parse name → ThumbnailRequest → policy check → load main image → resize
//! ```
//!
//! Every step is synchronous and stateless; the storage root, policy and
//! image backend are injected into the [`ThumbnailGenerator`] at
//! construction.
//!
//! # Usage
//!
//! ```rust,ignore
//! use thumber_core::{Config, ThumbnailGenerator, ThumbnailRequest};
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = Config::load()?;
//!     let generator = ThumbnailGenerator::from_config(&config)?;
//!
//!     let request = ThumbnailRequest::from_path("photos/cat-64x64.png")?;
//!     let image = generator.generate(&request).map_err(|f| f.into_error())?;
//!     image.save(&generator.full_path(&request))?;
//!     Ok(())
//! }
//! ```

// Module declarations
pub mod backend;
pub mod config;
pub mod error;
pub mod generator;
pub mod geometry;
pub mod naming;
pub mod output;
pub mod policy;
pub mod request;
pub mod storage;

// Re-exports for convenient access
pub use backend::{ImageBackend, ImageHandle, LoadedImage, RustBackend};
pub use config::Config;
pub use error::{BackendError, ConfigError, GeometryError, RequestError, Result, ThumbnailError};
pub use generator::{GenerateFailure, ThumbnailGenerator};
pub use geometry::{Geometry, ResizeMode};
pub use naming::parse_thumb_name;
pub use output::{OutputFormat, OutputWriter, RequestReport};
pub use policy::{AllowAny, AllowList, GeometryPolicy};
pub use request::ThumbnailRequest;
pub use storage::StorageRoot;

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
