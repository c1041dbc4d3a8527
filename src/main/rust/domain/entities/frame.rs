use image::codecs::jpeg::JpegEncoder;
use image::RgbImage;

use crate::domain::errors::{DomainError, Result};
use crate::domain::value_objects::Resolution;

/// One decoded 8-bit RGB image pulled from the capture device.
#[derive(Debug, Clone)]
pub struct Frame {
    image: RgbImage,
}

impl Frame {
    pub fn new(image: RgbImage) -> Self {
        Self { image }
    }

    /// Wrap a packed RGB buffer of `width * height * 3` bytes.
    pub fn from_rgb(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        RgbImage::from_raw(width, height, data)
            .map(Self::new)
            .ok_or(DomainError::InvalidFrame { width, height })
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn resolution(&self) -> Resolution {
        Resolution::new(self.width(), self.height())
    }

    pub fn encode_jpeg(&self, quality: u8) -> Result<Vec<u8>> {
        let mut buffer = Vec::new();
        JpegEncoder::new_with_quality(&mut buffer, quality)
            .encode_image(&self.image)
            .map_err(|e| DomainError::EncodeFailed(e.to_string()))?;
        Ok(buffer)
    }
}
