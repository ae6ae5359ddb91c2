//! Classifier model backends

use std::path::Path;

use serde::Serialize;
use tracing::{debug, error, info};
use tract_onnx::prelude::*;

use crate::config::ModelConfig;
use crate::preprocess::NormalizedTensor;
use crate::InferenceError;

/// Per-class scores produced by the model, in label order
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct PredictionVector(Vec<f32>);

impl PredictionVector {
    pub fn new(scores: Vec<f32>) -> Self {
        Self(scores)
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Index of the largest score; ties go to the lowest index.
    ///
    /// NaN scores never win. Returns `None` for an empty or all-NaN vector.
    pub fn argmax(&self) -> Option<usize> {
        let mut best: Option<(usize, f32)> = None;
        for (i, &score) in self.0.iter().enumerate() {
            if score.is_nan() {
                continue;
            }
            match best {
                Some((_, top)) if score <= top => {}
                _ => best = Some((i, score)),
            }
        }
        best.map(|(i, _)| i)
    }
}

impl From<Vec<f32>> for PredictionVector {
    fn from(scores: Vec<f32>) -> Self {
        Self(scores)
    }
}

/// A loaded classifier: a pure function from input tensor to scores.
///
/// Implementations are read-only after construction and shared across
/// request handlers.
pub trait ClassifierModel: Send + Sync {
    /// Run the model on a single-image batch
    fn predict(&self, input: &NormalizedTensor) -> Result<PredictionVector, InferenceError>;

    /// Human-readable identifier (usually the artifact path)
    fn describe(&self) -> &str;
}

/// ONNX model executed with tract
pub struct TractModel {
    model: SimplePlan<TypedFact, Box<dyn TypedOp>, TypedModel>,
    path: String,
    input_shape: [usize; 4],
}

impl TractModel {
    /// Load and optimize the ONNX artifact named in `config`
    pub fn load(config: &ModelConfig) -> Result<Self, InferenceError> {
        let input_shape = config.input_shape();
        info!("Loading classifier model from {} (input {:?})", config.path, input_shape);

        if !Path::new(&config.path).is_file() {
            error!("Model file not found: {}", config.path);
            return Err(InferenceError::ModelUnavailable(format!(
                "model file not found: {}",
                config.path
            )));
        }

        let model = tract_onnx::onnx()
            .model_for_path(&config.path)
            .and_then(|m| m.with_input_fact(0, f32::fact(input_shape).into()))
            .and_then(|m| m.into_optimized())
            .and_then(|m| m.into_runnable())
            .map_err(|e| {
                error!("Failed to load model {}: {}", config.path, e);
                InferenceError::ModelUnavailable(format!("{}: {}", config.path, e))
            })?;

        info!("Model loaded successfully");
        Ok(Self {
            model,
            path: config.path.clone(),
            input_shape,
        })
    }
}

impl ClassifierModel for TractModel {
    fn predict(&self, input: &NormalizedTensor) -> Result<PredictionVector, InferenceError> {
        if input.shape() != &self.input_shape[..] {
            return Err(InferenceError::InferenceFailed(format!(
                "input shape {:?} does not match model input {:?}",
                input.shape(),
                self.input_shape
            )));
        }

        let outputs = self
            .model
            .run(tvec!(input.to_tensor().into_tvalue()))
            .map_err(|e| InferenceError::InferenceFailed(e.to_string()))?;

        let output = outputs
            .first()
            .ok_or_else(|| InferenceError::InferenceFailed("model produced no outputs".to_string()))?;
        let scores = output
            .to_array_view::<f32>()
            .map_err(|e| InferenceError::InferenceFailed(e.to_string()))?;

        debug!("Model output shape {:?}", scores.shape());
        Ok(PredictionVector::new(scores.iter().copied().collect()))
    }

    fn describe(&self) -> &str {
        &self.path
    }
}

/// Model that always returns the same scores (tests and mock mode)
#[derive(Debug, Clone)]
pub struct StaticModel {
    scores: Vec<f32>,
}

impl StaticModel {
    pub fn new(scores: Vec<f32>) -> Self {
        info!("Creating static classifier model: {:?}", scores);
        Self { scores }
    }
}

impl ClassifierModel for StaticModel {
    fn predict(&self, _input: &NormalizedTensor) -> Result<PredictionVector, InferenceError> {
        Ok(PredictionVector::new(self.scores.clone()))
    }

    fn describe(&self) -> &str {
        "static"
    }
}
