// Image codec adapter - JPEG decode/encode using the image crate

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use image::codecs::jpeg::JpegEncoder;
use image::RgbImage;

use crate::domain::errors::*;
use crate::error::TimelapseResult;
use crate::ports::*;

pub const DEFAULT_JPEG_QUALITY: u8 = 90;

/// Still image adapter writing baseline JPEG
#[derive(Debug, Clone)]
pub struct ImageCodecAdapter {
    jpeg_quality: u8,
}

impl ImageCodecAdapter {
    /// Create new adapter; quality must be 1-100
    pub fn new(jpeg_quality: u8) -> Result<Self, DomainError> {
        if !(1..=100).contains(&jpeg_quality) {
            return Err(DomainError::BadArgs(format!(
                "JPEG quality must be between 1 and 100, got {}",
                jpeg_quality
            )));
        }
        Ok(Self { jpeg_quality })
    }

    fn decode_file(path: &Path) -> TimelapseResult<RgbImage> {
        Ok(image::open(path)?.to_rgb8())
    }

    fn encode_file(&self, path: &Path, image: &RgbImage) -> TimelapseResult<()> {
        let writer = BufWriter::new(File::create(path)?);
        let mut encoder = JpegEncoder::new_with_quality(writer, self.jpeg_quality);
        encoder.encode_image(image)?;
        Ok(())
    }
}

impl Default for ImageCodecAdapter {
    fn default() -> Self {
        Self {
            jpeg_quality: DEFAULT_JPEG_QUALITY,
        }
    }
}

impl ImagePort for ImageCodecAdapter {
    fn decode(&self, path: &Path) -> Result<RgbImage, DomainError> {
        Self::decode_file(path).map_err(|e| {
            DomainError::ImageFail(format!("Failed to decode {}: {}", path.display(), e))
        })
    }

    fn encode(&self, path: &Path, image: &RgbImage) -> Result<(), DomainError> {
        tracing::debug!(path = %path.display(), quality = self.jpeg_quality, "encoding jpeg");
        Ok(self.encode_file(path, image)?)
    }
}
