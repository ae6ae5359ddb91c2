//! Image Source Library for the Face Classifier
//!
//! Turns the bytes handed over by the web UI into an RGB raster.
//! Supports:
//! - File uploads (JPEG, PNG)
//! - Webcam captures (a single still frame, JPEG or PNG encoded by the browser)

pub mod decode;
pub mod frame;

pub use decode::{decode, sniff_format, SUPPORTED_FORMATS};
pub use frame::ClassifiedImage;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Image source error types
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ImageSourceError {
    #[error("Image is empty")]
    Empty,

    #[error("Unsupported image format: {0} (expected JPEG or PNG)")]
    UnsupportedFormat(String),

    #[error("Failed to decode image: {0}")]
    Decode(String),

    #[error("Image has zero area ({width}x{height})")]
    ZeroArea { width: u32, height: u32 },
}

/// Where an image came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageSource {
    /// File picked in the upload tab
    #[default]
    Upload,
    /// Still frame captured from the webcam tab
    Camera,
}

impl ImageSource {
    /// Get string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageSource::Upload => "upload",
            ImageSource::Camera => "camera",
        }
    }

    /// Parse the `source` form field sent by the page
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "upload" | "file" => Some(ImageSource::Upload),
            "camera" | "webcam" => Some(ImageSource::Camera),
            _ => None,
        }
    }
}
