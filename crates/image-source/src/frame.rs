//! Decoded image type handed to the inference pipeline

use image::imageops::{self, FilterType};
use image::RgbImage;

use crate::{ImageSource, ImageSourceError};

/// Decoded RGB image of arbitrary dimensions
///
/// Lives for a single classification request and is dropped once the
/// response has been rendered. Width and height are always non-zero.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifiedImage {
    /// RGB pixel data
    pixels: RgbImage,
    /// Which widget produced the image
    source: ImageSource,
}

impl ClassifiedImage {
    /// Wrap an already decoded RGB buffer
    pub fn from_rgb(pixels: RgbImage, source: ImageSource) -> Result<Self, ImageSourceError> {
        let (width, height) = pixels.dimensions();
        if width == 0 || height == 0 {
            return Err(ImageSourceError::ZeroArea { width, height });
        }
        Ok(Self { pixels, source })
    }

    /// Image width
    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    /// Image height
    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// Where the image came from
    pub fn source(&self) -> ImageSource {
        self.source
    }

    /// Borrow the underlying RGB buffer
    pub fn pixels(&self) -> &RgbImage {
        &self.pixels
    }

    /// Get pixel at (x, y)
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<[u8; 3]> {
        self.pixels.get_pixel_checked(x, y).map(|p| p.0)
    }

    /// Resize to exactly `width` x `height`, ignoring aspect ratio.
    ///
    /// An image already at the requested size is returned unchanged rather
    /// than resampled.
    pub fn resize_exact(&self, width: u32, height: u32, filter: FilterType) -> ClassifiedImage {
        if self.pixels.dimensions() == (width, height) {
            return self.clone();
        }

        ClassifiedImage {
            pixels: imageops::resize(&self.pixels, width, height, filter),
            source: self.source,
        }
    }
}
