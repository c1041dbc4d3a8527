use super::{BackoffPolicy, Resolution};
use crate::domain::errors::{DomainError, Result};

/// JPEG quality used when nothing else is configured.
pub const DEFAULT_JPEG_QUALITY: u8 = 95;

#[derive(Debug, Clone, PartialEq)]
pub struct StreamConfig {
    jpeg_quality: u8,
    capture_resolution: Resolution,
    frame_backoff: BackoffPolicy,
}

impl StreamConfig {
    pub fn new() -> Self {
        Self {
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            capture_resolution: Resolution::FULL_HD,
            frame_backoff: BackoffPolicy::default(),
        }
    }

    pub fn with_jpeg_quality(mut self, quality: u8) -> Self {
        self.jpeg_quality = quality;
        self
    }

    pub fn with_capture_resolution(mut self, resolution: Resolution) -> Self {
        self.capture_resolution = resolution;
        self
    }

    pub fn with_frame_backoff(mut self, backoff: BackoffPolicy) -> Self {
        self.frame_backoff = backoff;
        self
    }

    pub fn jpeg_quality(&self) -> u8 {
        self.jpeg_quality
    }

    pub fn capture_resolution(&self) -> Resolution {
        self.capture_resolution
    }

    pub fn frame_backoff(&self) -> &BackoffPolicy {
        &self.frame_backoff
    }

    pub fn validate(&self) -> Result<()> {
        if !(1..=100).contains(&self.jpeg_quality) {
            return Err(DomainError::InvalidJpegQuality(self.jpeg_quality));
        }

        let resolution = self.capture_resolution;
        Resolution::checked(resolution.width(), resolution.height())?;

        Ok(())
    }
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = StreamConfig::new();

        assert_eq!(config.jpeg_quality(), 95);
        assert_eq!(config.capture_resolution(), Resolution::new(1920, 1080));
        assert_eq!(*config.frame_backoff(), BackoffPolicy::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_with_jpeg_quality() {
        let config = StreamConfig::new().with_jpeg_quality(80);
        assert_eq!(config.jpeg_quality(), 80);
    }

    #[test]
    fn test_validate_rejects_zero_quality() {
        let result = StreamConfig::new().with_jpeg_quality(0).validate();
        assert!(matches!(result, Err(DomainError::InvalidJpegQuality(0))));
    }

    #[test]
    fn test_validate_rejects_quality_above_100() {
        let result = StreamConfig::new().with_jpeg_quality(101).validate();
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_rejects_empty_resolution() {
        let result = StreamConfig::new()
            .with_capture_resolution(Resolution::new(0, 0))
            .validate();
        assert!(matches!(
            result,
            Err(DomainError::InvalidResolution { .. })
        ));
    }
}
