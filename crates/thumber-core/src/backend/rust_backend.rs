//! Pure-Rust backend built on the `image` crate.

use std::fmt;
use std::fs::File;
use std::io::{BufWriter, Cursor, Seek, Write};
use std::path::{Path, PathBuf};

use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, ImageFormat, ImageReader};

use super::calculations::{plan_resize, ResizePlan};
use super::{ImageBackend, ImageHandle};
use crate::config::{Config, LimitsConfig};
use crate::error::BackendError;
use crate::geometry::Geometry;

const FILTER: FilterType = FilterType::Lanczos3;

/// Loads and resizes images with the `image` crate.
#[derive(Debug, Clone)]
pub struct RustBackend {
    limits: LimitsConfig,
    jpeg_quality: u8,
}

impl RustBackend {
    /// Create a backend with the given limits and the default JPEG quality.
    pub fn new(limits: LimitsConfig) -> Self {
        Self {
            limits,
            jpeg_quality: 85,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.limits.clone()).with_jpeg_quality(config.output.jpeg_quality)
    }

    /// JPEG quality (1-100) for images saved from handles of this backend.
    pub fn with_jpeg_quality(mut self, quality: u8) -> Self {
        self.jpeg_quality = quality.clamp(1, 100);
        self
    }

    /// Check existence and size before reading any pixels.
    fn check_file(&self, path: &Path) -> Result<(), BackendError> {
        let metadata = std::fs::metadata(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                BackendError::NotFound(path.to_path_buf())
            } else {
                BackendError::Io {
                    path: path.to_path_buf(),
                    source: e,
                }
            }
        })?;

        if !metadata.is_file() {
            return Err(BackendError::NotFound(path.to_path_buf()));
        }

        let max_bytes = self.limits.max_file_size_mb.saturating_mul(1024 * 1024);
        if metadata.len() > max_bytes {
            return Err(BackendError::FileTooLarge {
                path: path.to_path_buf(),
                size_mb: metadata.len() / (1024 * 1024),
                max_mb: self.limits.max_file_size_mb,
            });
        }

        Ok(())
    }
}

impl ImageBackend for RustBackend {
    type Image = LoadedImage;

    fn load(&self, path: &Path) -> Result<LoadedImage, BackendError> {
        self.check_file(path)?;

        let io_err = |e| BackendError::Io {
            path: path.to_path_buf(),
            source: e,
        };
        // Content sniffing wins over the extension
        let reader = ImageReader::open(path)
            .map_err(io_err)?
            .with_guessed_format()
            .map_err(io_err)?;
        let format = reader
            .format()
            .ok_or_else(|| BackendError::UnsupportedFormat {
                path: path.to_path_buf(),
                format: path
                    .extension()
                    .and_then(|e| e.to_str())
                    .unwrap_or("unknown")
                    .to_string(),
            })?;
        let image = reader.decode().map_err(|e| BackendError::Decode {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        let (width, height) = image.dimensions();
        let max_dim = self.limits.max_image_dimension;
        if width > max_dim || height > max_dim {
            return Err(BackendError::ImageTooLarge {
                path: path.to_path_buf(),
                width,
                height,
                max_dim,
            });
        }

        tracing::trace!("Decoded {:?} as {:?} ({}x{})", path, format, width, height);

        Ok(LoadedImage {
            path: path.to_path_buf(),
            format,
            image,
            max_dimension: max_dim,
            jpeg_quality: self.jpeg_quality,
        })
    }
}

/// An image decoded by [`RustBackend`].
pub struct LoadedImage {
    path: PathBuf,
    format: ImageFormat,
    image: DynamicImage,
    max_dimension: u32,
    jpeg_quality: u8,
}

impl LoadedImage {
    /// Path the image was loaded from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Format detected at load time.
    pub fn format(&self) -> ImageFormat {
        self.format
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn image(&self) -> &DynamicImage {
        &self.image
    }

    pub fn into_image(self) -> DynamicImage {
        self.image
    }

    /// Write the image to `output`.
    ///
    /// The format follows the output extension, falling back to the format
    /// the image was loaded in. Parent directories are created.
    pub fn save(&self, output: &Path) -> Result<(), BackendError> {
        let format = ImageFormat::from_path(output).unwrap_or(self.format);

        if let Some(parent) = output.parent() {
            std::fs::create_dir_all(parent).map_err(|e| BackendError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let file = File::create(output).map_err(|e| BackendError::Io {
            path: output.to_path_buf(),
            source: e,
        })?;
        let mut writer = BufWriter::new(file);
        self.write_encoded(&mut writer, format)
            .and_then(|()| writer.flush().map_err(image::ImageError::IoError))
            .map_err(|e| BackendError::Encode {
                path: output.to_path_buf(),
                message: e.to_string(),
            })
    }

    /// Encode the image in the format it was loaded in.
    pub fn encode(&self) -> Result<Vec<u8>, BackendError> {
        let mut buffer = Cursor::new(Vec::new());
        self.write_encoded(&mut buffer, self.format)
            .map_err(|e| BackendError::Encode {
                path: self.path.clone(),
                message: e.to_string(),
            })?;
        Ok(buffer.into_inner())
    }

    fn write_encoded<W: Write + Seek>(
        &self,
        writer: &mut W,
        format: ImageFormat,
    ) -> Result<(), image::ImageError> {
        match format {
            ImageFormat::Jpeg => {
                // JPEG has no alpha channel
                let rgb = DynamicImage::ImageRgb8(self.image.to_rgb8());
                rgb.write_with_encoder(JpegEncoder::new_with_quality(writer, self.jpeg_quality))
            }
            _ => self.image.write_to(writer, format),
        }
    }
}

impl ImageHandle for LoadedImage {
    fn resize(&mut self, geometry: &str) -> Result<(), BackendError> {
        let geometry = Geometry::parse(geometry)?;
        let plan = plan_resize(self.image.width(), self.image.height(), &geometry);

        let (width, height) = plan.output_dimensions(self.image.dimensions());
        if width > self.max_dimension || height > self.max_dimension {
            return Err(BackendError::OutputTooLarge {
                width,
                height,
                max_dim: self.max_dimension,
            });
        }

        self.image = match plan {
            ResizePlan::Keep => return Ok(()),
            ResizePlan::Scale { width, height } => self.image.resize_exact(width, height, FILTER),
            ResizePlan::Crop { width, height } => self.image.resize_to_fill(width, height, FILTER),
        };
        Ok(())
    }
}

impl fmt::Debug for LoadedImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadedImage")
            .field("path", &self.path)
            .field("format", &self.format)
            .field("width", &self.image.width())
            .field("height", &self.image.height())
            .finish()
    }
}
