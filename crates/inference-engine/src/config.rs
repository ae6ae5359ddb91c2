//! Model configuration

use image::imageops::FilterType;
use serde::{Deserialize, Serialize};

/// Channel layout of the input tensor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TensorLayout {
    /// `[1, height, width, 3]` (Keras / TensorFlow exports)
    #[default]
    Nhwc,
    /// `[1, 3, height, width]` (PyTorch exports)
    Nchw,
}

impl TensorLayout {
    /// Tensor shape for a single-image batch
    pub fn shape(&self, width: u32, height: u32) -> [usize; 4] {
        let (w, h) = (width as usize, height as usize);
        match self {
            TensorLayout::Nhwc => [1, h, w, 3],
            TensorLayout::Nchw => [1, 3, h, w],
        }
    }
}

/// Interpolation used when resizing to the model input size.
///
/// Must match the preprocessing the model was trained with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResizeFilter {
    Nearest,
    #[default]
    Bilinear,
    Bicubic,
}

impl ResizeFilter {
    /// Matching `image` crate filter
    pub fn filter_type(&self) -> FilterType {
        match self {
            ResizeFilter::Nearest => FilterType::Nearest,
            ResizeFilter::Bilinear => FilterType::Triangle,
            ResizeFilter::Bicubic => FilterType::CatmullRom,
        }
    }
}

fn default_input_size() -> u32 {
    224
}

/// Classifier model configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Path to the ONNX model artifact
    pub path: String,

    /// Class labels in training order (index i names output i)
    pub labels: Vec<String>,

    /// Model input width
    #[serde(default = "default_input_size")]
    pub input_width: u32,

    /// Model input height
    #[serde(default = "default_input_size")]
    pub input_height: u32,

    /// Input tensor layout
    #[serde(default)]
    pub layout: TensorLayout,

    /// Resize interpolation
    #[serde(default)]
    pub resize_filter: ResizeFilter,
}

impl ModelConfig {
    /// Create a config with the default 224x224 NHWC bilinear preprocessing
    pub fn new(path: impl Into<String>, labels: Vec<String>) -> Self {
        Self {
            path: path.into(),
            labels,
            input_width: default_input_size(),
            input_height: default_input_size(),
            layout: TensorLayout::default(),
            resize_filter: ResizeFilter::default(),
        }
    }

    /// Shape of the tensor fed to the model
    pub fn input_shape(&self) -> [usize; 4] {
        self.layout.shape(self.input_width, self.input_height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_shape_is_nhwc_224() {
        let config = ModelConfig::new("model.onnx", vec!["a".into(), "b".into()]);
        assert_eq!(config.input_shape(), [1, 224, 224, 3]);
        assert_eq!(config.resize_filter.filter_type(), FilterType::Triangle);
    }

    #[test]
    fn test_nchw_shape() {
        assert_eq!(TensorLayout::Nchw.shape(128, 96), [1, 3, 96, 128]);
    }

    #[test]
    fn test_deserialize_fills_defaults() {
        let config: ModelConfig = serde_json::from_str(
            r#"{"path": "m.onnx", "labels": ["agung", "farhan"], "layout": "nchw"}"#,
        )
        .unwrap();
        assert_eq!(config.input_width, 224);
        assert_eq!(config.layout, TensorLayout::Nchw);
        assert_eq!(config.resize_filter, ResizeFilter::Bilinear);
    }
}
