//! Classification Routes

use std::sync::Arc;
use std::time::Instant;

use axum::{
    body::Bytes,
    extract::{multipart::MultipartRejection, Multipart, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use image_source::ImageSource;
use inference_engine::{InferenceError, PredictionResult};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::ApiError;
use crate::presentation::{self, ConfidenceBand, ResultView};
use crate::AppState;

/// Parsed multipart upload
#[derive(Debug)]
pub struct ClassifyRequest {
    pub image: Bytes,
    pub source: ImageSource,
}

impl ClassifyRequest {
    /// Read the `image` file field and the optional `source` field
    pub async fn from_multipart(mut multipart: Multipart) -> Result<Self, ApiError> {
        let mut image = None;
        let mut source = ImageSource::default();

        while let Some(field) = multipart.next_field().await? {
            let name = field.name().map(str::to_owned);
            match name.as_deref() {
                Some("image") => image = Some(field.bytes().await?),
                Some("source") => {
                    let value = field.text().await?;
                    source = ImageSource::parse(&value).unwrap_or_else(|| {
                        warn!("Unknown image source '{}', treating as upload", value);
                        ImageSource::Upload
                    });
                }
                _ => {}
            }
        }

        Ok(Self {
            image: image.ok_or(ApiError::MissingField("image"))?,
            source,
        })
    }
}

/// One finished classification
#[derive(Debug, Clone)]
pub struct Classified {
    pub request_id: Uuid,
    pub result: PredictionResult,
    pub source: ImageSource,
    pub width: u32,
    pub height: u32,
    pub latency_ms: u64,
    pub classified_at: DateTime<Utc>,
}

/// Response for the JSON classify endpoint
#[derive(Debug, Serialize)]
pub struct ClassifyResponse {
    pub request_id: Uuid,
    pub label: String,
    pub display_name: String,
    pub index: usize,
    pub confidence: f32,
    pub confidence_percent: String,
    pub band: ConfidenceBand,
    pub band_message: &'static str,
    pub probabilities: Vec<f32>,
    pub source: ImageSource,
    pub width: u32,
    pub height: u32,
    pub latency_ms: u64,
    pub classified_at: DateTime<Utc>,
}

/// Decode and classify on the blocking pool
pub async fn run_classification(
    state: Arc<AppState>,
    request: ClassifyRequest,
) -> Result<Classified, ApiError> {
    let request_id = Uuid::new_v4();
    let start = Instant::now();
    let source = request.source;
    let pipeline = state.pipeline.clone();

    let outcome = tokio::task::spawn_blocking(move || {
        let image = image_source::decode(&request.image, source)?;
        let result = pipeline.classify(&image)?;
        Ok::<_, InferenceError>((result, image.width(), image.height()))
    })
    .await
    .map_err(|e| ApiError::Internal(format!("classification task failed: {}", e)))?;

    let latency_ms = start.elapsed().as_millis() as u64;

    match outcome {
        Ok((result, width, height)) => {
            metrics::counter!(
                "classifications_total",
                "label" => result.label.clone(),
                "source" => source.as_str()
            )
            .increment(1);
            metrics::histogram!("classification_latency_ms").record(latency_ms as f64);

            info!(
                %request_id,
                "Classified {} image {}x{} as {} ({:.3}) in {}ms",
                source.as_str(),
                width,
                height,
                result.label,
                result.confidence,
                latency_ms
            );

            Ok(Classified {
                request_id,
                result,
                source,
                width,
                height,
                latency_ms,
                classified_at: Utc::now(),
            })
        }
        Err(e) => {
            metrics::counter!("classification_errors_total", "kind" => e.kind()).increment(1);
            warn!(%request_id, "Classification of {} image failed: {}", source.as_str(), e);
            Err(e.into())
        }
    }
}

/// Classify and return JSON
pub async fn classify_json(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<ClassifyResponse>, ApiError> {
    let request = ClassifyRequest::from_multipart(multipart?).await?;
    let classified = run_classification(state.clone(), request).await?;
    let view = ResultView::new(&classified.result, &state.presentation);

    Ok(Json(ClassifyResponse {
        request_id: classified.request_id,
        label: view.label,
        display_name: view.display_name,
        index: classified.result.index,
        confidence: view.confidence,
        confidence_percent: view.confidence_percent,
        band: view.band,
        band_message: view.band_message,
        probabilities: classified.result.probabilities,
        source: classified.source,
        width: classified.width,
        height: classified.height,
        latency_ms: classified.latency_ms,
        classified_at: classified.classified_at,
    }))
}

/// Classify and return the result box for the page
pub async fn classify_html(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Response {
    let request = match multipart {
        Ok(multipart) => ClassifyRequest::from_multipart(multipart).await,
        Err(rejection) => Err(rejection.into()),
    };
    let outcome = match request {
        Ok(request) => run_classification(state.clone(), request).await,
        Err(e) => Err(e),
    };

    match outcome {
        Ok(classified) => {
            let view = ResultView::new(&classified.result, &state.presentation);
            (StatusCode::OK, Html(presentation::render_result(&view))).into_response()
        }
        Err(e) => (e.status(), Html(presentation::render_error(&e.public_message()))).into_response(),
    }
}
