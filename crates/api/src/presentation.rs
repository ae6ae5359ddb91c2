//! Result presentation: confidence bands and HTML fragments

use inference_engine::PredictionResult;
use serde::{Deserialize, Serialize};

use crate::config::PresentationConfig;

/// Qualitative confidence bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceBand {
    /// Above 0.85
    High,
    /// Above 0.70
    Good,
    Moderate,
}

impl ConfidenceBand {
    /// Bucket a confidence value; both thresholds are exclusive.
    ///
    /// The comparison runs in `f64`, so an `f32` score of `0.85` (stored as
    /// 0.8500000238) counts as high.
    pub fn from_confidence(confidence: f32) -> Self {
        let confidence = f64::from(confidence);
        if confidence > 0.85 {
            ConfidenceBand::High
        } else if confidence > 0.70 {
            ConfidenceBand::Good
        } else {
            ConfidenceBand::Moderate
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ConfidenceBand::High => "high",
            ConfidenceBand::Good => "good",
            ConfidenceBand::Moderate => "moderate",
        }
    }

    /// Sentence shown under the confidence bar
    pub fn message(&self) -> &'static str {
        match self {
            ConfidenceBand::High => "High confidence prediction",
            ConfidenceBand::Good => "Good confidence prediction",
            ConfidenceBand::Moderate => "Moderate confidence prediction",
        }
    }
}

/// Everything the page needs to show one prediction
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultView {
    pub label: String,
    pub display_name: String,
    pub confidence: f32,
    pub confidence_percent: String,
    pub band: ConfidenceBand,
    pub band_message: &'static str,
    pub icon: String,
    pub color: String,
}

impl ResultView {
    pub fn new(result: &PredictionResult, presentation: &PresentationConfig) -> Self {
        let band = ConfidenceBand::from_confidence(result.confidence);
        let style = presentation.style_for(&result.label);
        Self {
            label: result.label.clone(),
            display_name: display_name(&result.label),
            confidence: result.confidence,
            confidence_percent: format_percent(result.confidence),
            band,
            band_message: band.message(),
            icon: style.icon.clone(),
            color: style.color.clone(),
        }
    }
}

/// First character upper-cased, the rest lower-cased ("agung" -> "Agung")
pub fn display_name(label: &str) -> String {
    let mut chars = label.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// Percentage with one decimal ("80.0%")
pub fn format_percent(confidence: f32) -> String {
    format!("{:.1}%", confidence as f64 * 100.0)
}

/// Escape text for HTML element content and quoted attributes
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

/// Result box inserted into the page after a classification
pub fn render_result(view: &ResultView) -> String {
    let color = escape_html(&view.color);
    format!(
        r#"<div class="result-box">
  <h2 class="result-title" style="color: {color};">{icon} It's {name}!</h2>
  <p class="result-confidence">Confidence: <strong>{percent}</strong></p>
  <div class="confidence-bar"><div class="confidence-fill" style="width: {width:.1}%"></div></div>
  <p class="result-band band-{band}">{message}</p>
</div>"#,
        color = color,
        icon = escape_html(&view.icon),
        name = escape_html(&view.display_name),
        percent = view.confidence_percent,
        width = view.confidence as f64 * 100.0,
        band = view.band.as_str(),
        message = view.band_message,
    )
}

/// Error box shown when an image is rejected or inference fails
pub fn render_error(message: &str) -> String {
    format!(
        r#"<div class="result-box error-box">
  <h2 class="result-title">Could not analyze image</h2>
  <p class="result-band">{}</p>
  <p class="result-hint">Try again with a JPG or PNG face photo.</p>
</div>"#,
        escape_html(message)
    )
}
