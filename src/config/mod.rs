//! Configuration for split behavior.
//!
//! - [`SplitConfig`] - Read sizes and range parallelism
//!
//! # Example
//!
//! ```
//! use splitrs::SplitConfig;
//!
//! // Custom read size and worker count
//! let config = SplitConfig::new(16 * 1024, 4)?;
//!
//! // Builder pattern
//! let config = SplitConfig::default().with_chunk_size(1024 * 1024);
//!
//! # Ok::<(), splitrs::SplitError>(())
//! ```

use crate::error::SplitError;

/// Default number of bytes requested from a source per read (64 KiB).
pub const DEFAULT_CHUNK_SIZE: usize = 64 * 1024;

/// Fallback range count when the available parallelism cannot be queried.
pub const FALLBACK_PARALLELISM: usize = 4;

/// Configuration for splitting.
///
/// The chunk size is a performance knob only. Results never depend on it: the
/// matcher carries its state across chunk boundaries.
///
/// `parallelism` is the number of ranges an input is partitioned into when the
/// caller does not supply ranges explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SplitConfig {
    chunk_size: usize,
    parallelism: usize,
}

impl SplitConfig {
    /// Creates a new configuration.
    ///
    /// # Errors
    ///
    /// Returns [`SplitError::InvalidArgument`] if either value is zero.
    pub fn new(chunk_size: usize, parallelism: usize) -> Result<Self, SplitError> {
        if chunk_size == 0 {
            return Err(SplitError::InvalidArgument {
                message: "chunk size must be non-zero",
            });
        }

        if parallelism == 0 {
            return Err(SplitError::InvalidArgument {
                message: "parallelism must be non-zero",
            });
        }

        Ok(Self {
            chunk_size,
            parallelism,
        })
    }

    /// Sets the read size.
    ///
    /// Note: This does not validate the configuration. Use [`SplitConfig::validate`]
    /// to check if the configuration is valid.
    pub fn with_chunk_size(mut self, size: usize) -> Self {
        self.chunk_size = size;
        self
    }

    /// Sets the number of ranges used for implicit partitioning.
    pub fn with_parallelism(mut self, parallelism: usize) -> Self {
        self.parallelism = parallelism;
        self
    }

    /// Returns the read size.
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Returns the number of ranges used for implicit partitioning.
    pub fn parallelism(&self) -> usize {
        self.parallelism
    }

    /// Validates the current configuration.
    pub fn validate(&self) -> Result<(), SplitError> {
        Self::new(self.chunk_size, self.parallelism).map(|_| ())
    }
}

impl Default for SplitConfig {
    fn default() -> Self {
        let parallelism = std::thread::available_parallelism()
            .map(|p| p.get())
            .unwrap_or(FALLBACK_PARALLELISM);

        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            parallelism,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SplitConfig::default();
        assert_eq!(config.chunk_size(), DEFAULT_CHUNK_SIZE);
        assert!(config.parallelism() >= 1);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_pattern() {
        let config = SplitConfig::default()
            .with_chunk_size(3)
            .with_parallelism(7);

        assert_eq!(config.chunk_size(), 3);
        assert_eq!(config.parallelism(), 7);
    }

    #[test]
    fn test_invalid_config_zero_chunk_size() {
        assert!(SplitConfig::new(0, 4).is_err());
    }

    #[test]
    fn test_invalid_config_zero_parallelism() {
        assert!(SplitConfig::new(4096, 0).is_err());
    }

    #[test]
    fn test_validate_after_builder() {
        let config = SplitConfig::default().with_chunk_size(0);
        assert!(config.validate().is_err());
    }
}
