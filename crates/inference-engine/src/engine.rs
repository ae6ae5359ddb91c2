//! Inference Pipeline Implementation

use std::sync::Arc;

use image_source::{ClassifiedImage, ImageSource};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::ModelConfig;
use crate::labels::ClassLabels;
use crate::model::{ClassifierModel, PredictionVector, StaticModel, TractModel};
use crate::preprocess::{preprocess, NormalizedTensor};
use crate::InferenceError;

/// Slack allowed on probabilities before they are clamped into [0,1]
const PROBABILITY_TOLERANCE: f32 = 1e-4;

/// Winning class for one image
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    /// Predicted label
    pub label: String,
    /// Index of the label in training order
    pub index: usize,
    /// Confidence score (0.0 to 1.0)
    pub confidence: f32,
    /// Probabilities for each class, in label order
    pub probabilities: Vec<f32>,
}

/// Pick the top-scoring class and pair it with its label.
///
/// The vector must have exactly one score per label, every score finite and
/// within [0,1] (up to a small tolerance). Ties go to the lowest index.
pub fn select_prediction(
    scores: &PredictionVector,
    labels: &ClassLabels,
) -> Result<PredictionResult, InferenceError> {
    if scores.len() != labels.len() {
        return Err(InferenceError::LabelMismatch {
            expected: labels.len(),
            actual: scores.len(),
        });
    }

    let mut probabilities = Vec::with_capacity(scores.len());
    for &score in scores.as_slice() {
        if !score.is_finite()
            || score < -PROBABILITY_TOLERANCE
            || score > 1.0 + PROBABILITY_TOLERANCE
        {
            return Err(InferenceError::InferenceFailed(format!(
                "model output is not a probability vector: {:?}",
                scores.as_slice()
            )));
        }
        probabilities.push(score.clamp(0.0, 1.0));
    }

    let index = PredictionVector::new(probabilities.clone())
        .argmax()
        .ok_or_else(|| InferenceError::InferenceFailed("empty prediction vector".to_string()))?;
    let label = labels
        .get(index)
        .ok_or(InferenceError::LabelMismatch {
            expected: labels.len(),
            actual: scores.len(),
        })?
        .to_string();

    Ok(PredictionResult {
        label,
        index,
        confidence: probabilities[index],
        probabilities,
    })
}

/// Image-to-label pipeline around a loaded model.
///
/// Immutable after construction; cloning shares the model handle.
#[derive(Clone)]
pub struct InferencePipeline {
    model: Arc<dyn ClassifierModel>,
    labels: ClassLabels,
    config: ModelConfig,
}

impl InferencePipeline {
    /// Wrap an already loaded model.
    ///
    /// Runs one probe prediction on a blank image and fails if the model's
    /// output length does not match the configured labels.
    pub fn new(model: Arc<dyn ClassifierModel>, config: ModelConfig) -> Result<Self, InferenceError> {
        let labels = ClassLabels::new(config.labels.clone())?;

        let probe = model.predict(&NormalizedTensor::zeros(&config))?;
        if probe.len() != labels.len() {
            return Err(InferenceError::LabelMismatch {
                expected: labels.len(),
                actual: probe.len(),
            });
        }

        info!(
            "Inference pipeline ready: model={}, labels={:?}, input={:?}, filter={:?}",
            model.describe(),
            config.labels,
            config.input_shape(),
            config.resize_filter
        );

        Ok(Self {
            model,
            labels,
            config,
        })
    }

    /// Load the ONNX model named in `config`
    pub fn load(config: ModelConfig) -> Result<Self, InferenceError> {
        let model = TractModel::load(&config)?;
        Self::new(Arc::new(model), config)
    }

    /// Create a pipeline backed by fixed scores
    pub fn mock(config: ModelConfig, scores: Vec<f32>) -> Result<Self, InferenceError> {
        info!("Creating mock inference pipeline");
        Self::new(Arc::new(StaticModel::new(scores)), config)
    }

    /// Classify a decoded image
    pub fn classify(&self, image: &ClassifiedImage) -> Result<PredictionResult, InferenceError> {
        let start = std::time::Instant::now();

        let input = preprocess(image, &self.config);
        let scores = self.model.predict(&input)?;
        let result = select_prediction(&scores, &self.labels)?;

        debug!(
            "Classified {}x{} {} image as {} (conf={:.3}) in {}ms",
            image.width(),
            image.height(),
            image.source().as_str(),
            result.label,
            result.confidence,
            start.elapsed().as_millis()
        );

        Ok(result)
    }

    /// Decode uploaded or captured bytes, then classify
    pub fn classify_bytes(
        &self,
        bytes: &[u8],
        source: ImageSource,
    ) -> Result<PredictionResult, InferenceError> {
        let image = image_source::decode(bytes, source)?;
        self.classify(&image)
    }

    /// Configured labels in training order
    pub fn labels(&self) -> &ClassLabels {
        &self.labels
    }

    /// Model configuration
    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    /// Model identifier
    pub fn model_name(&self) -> &str {
        self.model.describe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TensorLayout;
    use crate::fixtures;
    use image::{Rgb, RgbImage};
    use image_source::ImageSourceError;
    use proptest::prelude::*;

    fn config() -> ModelConfig {
        ModelConfig::new("mock", vec!["agung".into(), "farhan".into()])
    }

    fn image(width: u32, height: u32) -> ClassifiedImage {
        let pixels = RgbImage::from_fn(width, height, |x, y| Rgb([x as u8, y as u8, 200]));
        ClassifiedImage::from_rgb(pixels, ImageSource::Upload).unwrap()
    }

    fn labels() -> ClassLabels {
        ClassLabels::new(vec!["agung".into(), "farhan".into()]).unwrap()
    }

    #[test]
    fn test_selects_second_class() {
        let pipeline = InferencePipeline::mock(config(), vec![0.2, 0.8]).unwrap();
        let result = pipeline.classify(&image(300, 200)).unwrap();
        assert_eq!(result.index, 1);
        assert_eq!(result.label, "farhan");
        assert!((result.confidence - 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_tie_selects_first_class() {
        let pipeline = InferencePipeline::mock(config(), vec![0.5, 0.5]).unwrap();
        for _ in 0..20 {
            let result = pipeline.classify(&image(64, 64)).unwrap();
            assert_eq!(result.index, 0);
            assert_eq!(result.label, "agung");
        }
    }

    #[test]
    fn test_deterministic() {
        let pipeline = InferencePipeline::mock(config(), vec![0.35, 0.65]).unwrap();
        let img = image(120, 80);
        assert_eq!(pipeline.classify(&img).unwrap(), pipeline.classify(&img).unwrap());
    }

    #[test]
    fn test_label_count_mismatch_rejected_at_construction() {
        match InferencePipeline::mock(config(), vec![0.1, 0.2, 0.7]) {
            Err(InferenceError::LabelMismatch { expected, actual }) => {
                assert_eq!((expected, actual), (2, 3));
            }
            Err(e) => panic!("unexpected error: {e}"),
            Ok(_) => panic!("pipeline should not build"),
        }
    }

    #[test]
    fn test_missing_model_is_unavailable() {
        let mut config = config();
        config.path = "/nonexistent/model.onnx".to_string();
        assert!(matches!(
            InferencePipeline::load(config),
            Err(InferenceError::ModelUnavailable(_))
        ));
    }

    #[test]
    fn test_onnx_pipeline_end_to_end() {
        let path = fixtures::write_classifier(
            "pipeline",
            TensorLayout::Nhwc,
            [[3.0, 0.0], [0.0, 2.0], [0.0, 0.0]],
        );
        let mut config = config();
        config.path = path.to_string_lossy().into_owned();
        let pipeline = InferencePipeline::load(config.clone());

        config.labels.push("third".into());
        let mismatch = InferencePipeline::load(config);
        std::fs::remove_file(&path).ok();

        let pipeline = pipeline.unwrap();
        let red = RgbImage::from_pixel(320, 240, Rgb([255, 0, 0]));
        let result = pipeline
            .classify(&ClassifiedImage::from_rgb(red, ImageSource::Camera).unwrap())
            .unwrap();
        assert_eq!(result.label, "agung");
        assert!((result.confidence - 0.952_574).abs() < 1e-3);

        let green = RgbImage::from_pixel(50, 90, Rgb([0, 255, 0]));
        let result = pipeline
            .classify(&ClassifiedImage::from_rgb(green, ImageSource::Upload).unwrap())
            .unwrap();
        assert_eq!(result.label, "farhan");
        assert!((result.probabilities.iter().sum::<f32>() - 1.0).abs() < 1e-4);

        assert!(matches!(
            mismatch,
            Err(InferenceError::LabelMismatch { expected: 3, actual: 2 })
        ));
    }

    #[test]
    fn test_empty_bytes_are_invalid_image() {
        let pipeline = InferencePipeline::mock(config(), vec![0.2, 0.8]).unwrap();
        match pipeline.classify_bytes(&[], ImageSource::Upload) {
            Err(InferenceError::InvalidImage(ImageSourceError::Empty)) => {}
            other => panic!("unexpected result: {:?}", other.map(|r| r.label)),
        }

        // Pipeline keeps working after a rejected image
        assert!(pipeline.classify(&image(10, 10)).is_ok());
    }

    #[test]
    fn test_select_rejects_logits() {
        let scores = PredictionVector::new(vec![-3.2, 4.1]);
        assert!(matches!(
            select_prediction(&scores, &labels()),
            Err(InferenceError::InferenceFailed(_))
        ));
    }

    #[test]
    fn test_select_rejects_nan() {
        let scores = PredictionVector::new(vec![f32::NAN, 0.4]);
        assert!(matches!(
            select_prediction(&scores, &labels()),
            Err(InferenceError::InferenceFailed(_))
        ));
    }

    #[test]
    fn test_select_clamps_rounding_noise() {
        let scores = PredictionVector::new(vec![-0.00001, 1.00001]);
        let result = select_prediction(&scores, &labels()).unwrap();
        assert_eq!(result.index, 1);
        assert_eq!(result.confidence, 1.0);
        assert_eq!(result.probabilities, vec![0.0, 1.0]);
    }

    #[test]
    fn test_select_length_mismatch() {
        let scores = PredictionVector::new(vec![1.0]);
        assert!(matches!(
            select_prediction(&scores, &labels()),
            Err(InferenceError::LabelMismatch { expected: 2, actual: 1 })
        ));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn prop_result_is_configured_label_with_unit_confidence(
            p in 0.0f32..=1.0,
            w in 1u32..96,
            h in 1u32..96,
        ) {
            let pipeline = InferencePipeline::mock(config(), vec![p, 1.0 - p]).unwrap();
            let result = pipeline.classify(&image(w, h)).unwrap();
            prop_assert!(pipeline.labels().contains(&result.label));
            prop_assert!((0.0..=1.0).contains(&result.confidence));
            prop_assert!(result.confidence >= 0.5);
        }
    }
}
