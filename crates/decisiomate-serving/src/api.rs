//! Request and response bodies of the JSON API.

use crate::error::ServingError;
use decisiomate_model::Prediction;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Body of `POST /api/predict`.
///
/// Values may be JSON numbers or strings; both go through the same coercion
/// as form text. Unknown keys are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct PredictRequest {
    /// Raw values keyed by feature name
    pub fields: HashMap<String, Value>,
}

impl PredictRequest {
    /// Converts the JSON values to the text the feature parser expects.
    ///
    /// `null` is dropped so it surfaces as a missing field. Booleans, arrays
    /// and objects keep their JSON text and fail coercion.
    pub fn to_text_fields(&self) -> HashMap<String, String> {
        self.fields
            .iter()
            .filter_map(|(name, value)| {
                let text = match value {
                    Value::Null => return None,
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                Some((name.clone(), text))
            })
            .collect()
    }
}

/// Successful prediction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictResponse {
    /// Arg-max class, 0 or 1
    pub class_index: usize,
    /// Softmax output
    pub probabilities: Vec<f32>,
    /// Sentence for the class
    pub message: String,
}

impl From<Prediction> for PredictResponse {
    fn from(prediction: Prediction) -> Self {
        Self {
            class_index: prediction.class_index,
            message: prediction.message().to_string(),
            probabilities: prediction.probabilities,
        }
    }
}

/// Error body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Human-readable message
    pub error: String,
    /// `validation`, `artifact` or `inference`
    pub kind: String,
}

impl From<&ServingError> for ErrorResponse {
    fn from(err: &ServingError) -> Self {
        Self {
            error: err.public_message(),
            kind: err.kind_name().to_string(),
        }
    }
}

/// Body of `GET /health`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always `ok` while the server answers
    pub status: String,
    /// Whether both artifact files exist
    pub artifacts_present: bool,
    /// Whether artifacts are held in memory
    pub artifacts_cached: bool,
}
