//! Ordered class labels

use serde::Serialize;

use crate::InferenceError;

/// Class labels in the order the model was trained with.
///
/// Index `i` names output `i` of the prediction vector. At least two
/// distinct, non-empty labels are required.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ClassLabels(Vec<String>);

impl ClassLabels {
    /// Validate and wrap a label list
    pub fn new(labels: Vec<String>) -> Result<Self, InferenceError> {
        if labels.len() < 2 {
            return Err(InferenceError::InvalidLabels(format!(
                "at least 2 labels are required, got {}",
                labels.len()
            )));
        }

        for (i, label) in labels.iter().enumerate() {
            if label.trim().is_empty() {
                return Err(InferenceError::InvalidLabels(format!("label {} is empty", i)));
            }
            if labels[..i].contains(label) {
                return Err(InferenceError::InvalidLabels(format!(
                    "duplicate label '{}'",
                    label
                )));
            }
        }

        Ok(Self(labels))
    }

    /// Label for an output index
    pub fn get(&self, index: usize) -> Option<&str> {
        self.0.get(index).map(String::as_str)
    }

    /// Number of classes
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false; kept for clippy's `len_without_is_empty`
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether `label` is one of the configured labels
    pub fn contains(&self, label: &str) -> bool {
        self.0.iter().any(|l| l == label)
    }

    /// Iterate labels in index order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}
