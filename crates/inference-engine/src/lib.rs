//! ONNX Face Classification Pipeline
//!
//! Resizes an image to the model's input shape, scales it to [0,1], runs the
//! classifier through tract-onnx and maps the winning index to a label.

mod config;
mod engine;
#[cfg(test)]
mod fixtures;
mod labels;
mod model;
mod preprocess;

pub use config::{ModelConfig, ResizeFilter, TensorLayout};
pub use engine::{select_prediction, InferencePipeline, PredictionResult};
pub use labels::ClassLabels;
pub use model::{ClassifierModel, PredictionVector, StaticModel, TractModel};
pub use preprocess::{normalize, preprocess, NormalizedTensor};

use image_source::ImageSourceError;
use thiserror::Error;

/// Errors during classification
#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("Model unavailable: {0}")]
    ModelUnavailable(String),
    #[error("Invalid image: {0}")]
    InvalidImage(#[from] ImageSourceError),
    #[error("Label mismatch: model produces {actual} scores but {expected} labels are configured")]
    LabelMismatch { expected: usize, actual: usize },
    #[error("Invalid label configuration: {0}")]
    InvalidLabels(String),
    #[error("Inference failed: {0}")]
    InferenceFailed(String),
}

impl InferenceError {
    /// Short machine-readable kind, used for metrics and API error bodies
    pub fn kind(&self) -> &'static str {
        match self {
            InferenceError::ModelUnavailable(_) => "model_unavailable",
            InferenceError::InvalidImage(_) => "invalid_image",
            InferenceError::LabelMismatch { .. } => "label_mismatch",
            InferenceError::InvalidLabels(_) => "invalid_labels",
            InferenceError::InferenceFailed(_) => "inference_failed",
        }
    }
}
