//! Upload / capture decoding

use image::ImageFormat;
use tracing::{debug, warn};

use crate::{ClassifiedImage, ImageSource, ImageSourceError};

/// Formats accepted from either widget
pub const SUPPORTED_FORMATS: [ImageFormat; 2] = [ImageFormat::Jpeg, ImageFormat::Png];

/// Detect the container format from the leading magic bytes.
///
/// Only JPEG and PNG are accepted; the file extension or the browser's
/// content type is never trusted.
pub fn sniff_format(bytes: &[u8]) -> Result<ImageFormat, ImageSourceError> {
    if bytes.is_empty() {
        return Err(ImageSourceError::Empty);
    }

    let format = image::guess_format(bytes)
        .map_err(|_| ImageSourceError::UnsupportedFormat("unknown".to_string()))?;

    if SUPPORTED_FORMATS.contains(&format) {
        Ok(format)
    } else {
        Err(ImageSourceError::UnsupportedFormat(format!("{:?}", format).to_lowercase()))
    }
}

/// Decode uploaded or captured bytes into an RGB image
pub fn decode(bytes: &[u8], source: ImageSource) -> Result<ClassifiedImage, ImageSourceError> {
    let format = match sniff_format(bytes) {
        Ok(format) => format,
        Err(e) => {
            warn!("Rejected {} image ({} bytes): {}", source.as_str(), bytes.len(), e);
            return Err(e);
        }
    };

    let decoded = image::load_from_memory_with_format(bytes, format).map_err(|e| {
        warn!("Failed to decode {} image: {}", source.as_str(), e);
        ImageSourceError::Decode(e.to_string())
    })?;

    debug!(
        "Decoded {:?} {} image: {}x{}",
        format,
        source.as_str(),
        decoded.width(),
        decoded.height()
    );

    ClassifiedImage::from_rgb(decoded.to_rgb8(), source)
}
