//! Configuration validation with range checks.

use crate::error::ConfigError;
use crate::policy::AllowList;

use super::Config;

/// Upper bound for `limits.max_file_size_mb` (1 TiB).
const MAX_FILE_SIZE_MB: u64 = 1024 * 1024;

impl Config {
    /// Validate configuration values are within acceptable ranges.
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.storage.root.as_os_str().is_empty() {
            return Err(ConfigError::ValidationError(
                "storage.root must not be empty".into(),
            ));
        }
        if self.processing.parallel_workers == 0 {
            return Err(ConfigError::ValidationError(
                "processing.parallel_workers must be > 0".into(),
            ));
        }
        if !(1..=MAX_FILE_SIZE_MB).contains(&self.limits.max_file_size_mb) {
            return Err(ConfigError::ValidationError(format!(
                "limits.max_file_size_mb must be between 1 and {MAX_FILE_SIZE_MB}"
            )));
        }
        if self.limits.max_image_dimension == 0 {
            return Err(ConfigError::ValidationError(
                "limits.max_image_dimension must be > 0".into(),
            ));
        }
        if !(1..=100).contains(&self.output.jpeg_quality) {
            return Err(ConfigError::ValidationError(
                "output.jpeg_quality must be between 1 and 100".into(),
            ));
        }
        AllowList::new(&self.policy.allowed_geometries)?;
        Ok(())
    }
}
