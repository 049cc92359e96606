//! Error types for the Thumber thumbnail pipeline.
//!
//! Errors are organized by stage so callers can branch on them: a malformed
//! name or bad geometry is a client-input problem, a policy rejection is a
//! forbidden request, and backend failures are I/O or processing problems.

use std::path::PathBuf;
use thiserror::Error;

/// Errors produced while deriving a thumbnail from a requested path.
#[derive(Error, Debug)]
pub enum ThumbnailError {
    /// The path does not follow the `<name>-<geometry>.<ext>` convention
    #[error("Bad filename {}", .path.display())]
    MalformedName { path: PathBuf },

    /// The geometry token is present but not a valid geometry
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    /// The geometry is valid but rejected by the policy
    #[error("Geometry not allowed: {geometry}")]
    GeometryNotAllowed { geometry: String },

    /// The main image could not be loaded
    #[error("Failed to load main image: {0}")]
    Load(#[source] BackendError),

    /// The main image loaded but could not be resized
    #[error("Failed to resize image: {0}")]
    Resize(#[source] BackendError),
}

/// Geometry grammar errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GeometryError {
    /// Nothing to parse
    #[error("Empty geometry")]
    Empty,

    /// Neither width nor height was given (e.g. `x` or `x!`)
    #[error("Geometry {geometry:?} has no dimensions")]
    MissingDimensions { geometry: String },

    /// A dimension is not a valid number
    #[error("Invalid dimension {token:?} in geometry {geometry:?}")]
    InvalidNumber { geometry: String, token: String },

    /// A dimension is zero
    #[error("Geometry {geometry:?} has a zero dimension")]
    ZeroDimension { geometry: String },

    /// The modifier needs both width and height
    #[error("Geometry {geometry:?} needs both width and height for {mode} mode")]
    IncompleteForMode {
        geometry: String,
        mode: &'static str,
    },

    /// Unexpected characters
    #[error("Malformed geometry {geometry:?}")]
    Malformed { geometry: String },
}

/// Image backend errors (load, resize, encode).
#[derive(Error, Debug)]
pub enum BackendError {
    /// Source file does not exist
    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),

    /// Reading or writing the file failed
    #[error("IO error for {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File exceeds size limit
    #[error("File too large: {} ({size_mb}MB > {max_mb}MB)", .path.display())]
    FileTooLarge {
        path: PathBuf,
        size_mb: u64,
        max_mb: u64,
    },

    /// Decoded image dimensions exceed limit
    #[error("Image too large: {} ({width}x{height} > {max_dim})", .path.display())]
    ImageTooLarge {
        path: PathBuf,
        width: u32,
        height: u32,
        max_dim: u32,
    },

    /// Decoding failed
    #[error("Decode error for {}: {message}", .path.display())]
    Decode { path: PathBuf, message: String },

    /// Format could not be determined
    #[error("Unsupported format for {}: {format}", .path.display())]
    UnsupportedFormat { path: PathBuf, format: String },

    /// The geometry text handed to resize did not parse
    #[error("Invalid resize geometry: {0}")]
    Geometry(#[from] GeometryError),

    /// The computed output would exceed the dimension limit
    #[error("Resize target too large: {width}x{height} > {max_dim}")]
    OutputTooLarge { width: u32, height: u32, max_dim: u32 },

    /// Encoding or writing the resized image failed
    #[error("Encode error for {}: {message}", .path.display())]
    Encode { path: PathBuf, message: String },
}

/// A request path that could not be turned into a [`ThumbnailRequest`].
///
/// Carries the only field derived before the failure (the requested path)
/// together with the underlying error, unchanged.
///
/// [`ThumbnailRequest`]: crate::request::ThumbnailRequest
#[derive(Error, Debug)]
#[error("Invalid thumbnail request {}: {source}", .request_path.display())]
pub struct RequestError {
    pub request_path: PathBuf,
    #[source]
    pub source: ThumbnailError,
}

impl RequestError {
    /// Drop the partial request and keep the underlying error.
    pub fn into_inner(self) -> ThumbnailError {
        self.source
    }
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file from disk
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse TOML configuration
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Configuration values are invalid
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Convenience type alias for thumbnail results.
pub type Result<T> = std::result::Result<T, ThumbnailError>;
