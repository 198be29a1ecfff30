//! Imagen and Gemini wire formats, and error normalization.

use crate::error::MobiwallError;
use crate::image::types::{WALLPAPER_ASPECT_RATIO, WALLPAPER_COUNT, WALLPAPER_MIME_TYPE};
use serde::{Deserialize, Serialize};

/// Content of the connection probe. Only success or failure matters.
pub(crate) const PROBE_TEXT: &str = "test";

// Request/Response types
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PredictRequest {
    pub(crate) instances: Vec<PredictInstance>,
    pub(crate) parameters: PredictParameters,
}

#[derive(Debug, Serialize)]
pub(crate) struct PredictInstance {
    pub(crate) prompt: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PredictParameters {
    pub(crate) sample_count: u32,
    pub(crate) aspect_ratio: String,
    pub(crate) output_options: OutputOptions,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct OutputOptions {
    pub(crate) mime_type: String,
}

impl PredictRequest {
    /// Builds the fixed wallpaper request: 4 JPEG images at 9:16.
    pub(crate) fn wallpapers(prompt: &str) -> Self {
        Self {
            instances: vec![PredictInstance {
                prompt: prompt.to_string(),
            }],
            parameters: PredictParameters {
                sample_count: WALLPAPER_COUNT,
                aspect_ratio: WALLPAPER_ASPECT_RATIO.to_string(),
                output_options: OutputOptions {
                    mime_type: WALLPAPER_MIME_TYPE.to_string(),
                },
            },
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PredictResponse {
    #[serde(default)]
    pub(crate) predictions: Vec<Prediction>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Prediction {
    #[serde(default)]
    pub(crate) bytes_base64_encoded: Option<String>,
    #[serde(default)]
    pub(crate) rai_filtered_reason: Option<String>,
}

impl PredictResponse {
    /// Returns the base64 payloads in service order, skipping filtered
    /// predictions that carry no bytes.
    pub(crate) fn into_images(self) -> Vec<String> {
        self.predictions
            .into_iter()
            .filter_map(|p| {
                if p.bytes_base64_encoded.is_none() {
                    if let Some(reason) = p.rai_filtered_reason {
                        tracing::debug!(%reason, "image filtered by service");
                    }
                }
                p.bytes_base64_encoded.filter(|data| !data.is_empty())
            })
            .collect()
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct ProbeRequest {
    pub(crate) contents: Vec<ProbeContent>,
}

#[derive(Debug, Serialize)]
pub(crate) struct ProbeContent {
    pub(crate) parts: Vec<ProbePart>,
}

#[derive(Debug, Serialize)]
pub(crate) struct ProbePart {
    pub(crate) text: String,
}

impl ProbeRequest {
    pub(crate) fn minimal() -> Self {
        Self {
            contents: vec![ProbeContent {
                parts: vec![ProbePart {
                    text: PROBE_TEXT.to_string(),
                }],
            }],
        }
    }
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    status: Option<String>,
}

/// Extracts the service's error message from a failed response body.
///
/// Falls back to the raw body (trimmed, never shortened), then to the HTTP
/// status.
pub(crate) fn error_message(status: u16, body: &str) -> String {
    if let Ok(envelope) = serde_json::from_str::<ErrorEnvelope>(body) {
        match (envelope.error.message, envelope.error.status) {
            (Some(message), _) if !message.trim().is_empty() => return message,
            (_, Some(status_text)) => return status_text,
            _ => {}
        }
    }

    let body = body.trim();
    if body.is_empty() {
        return format!("HTTP {}", status);
    }
    body.to_string()
}

/// Returns true if the message says the API key is invalid or missing.
pub(crate) fn indicates_bad_credential(message: &str) -> bool {
    let lower = message.to_lowercase();
    lower.contains("api key")
        || lower.contains("api_key")
        || lower.contains("apikey")
        || lower.contains("unauthenticated")
}

/// Maps a failed HTTP response to a user-facing error.
pub(crate) fn normalize_http_error(status: u16, body: &str) -> MobiwallError {
    let message = error_message(status, body);
    if status == 401 || indicates_bad_credential(&message) {
        return MobiwallError::Credential;
    }
    MobiwallError::Service(message)
}

/// Maps a transport failure to a user-facing error.
pub(crate) fn normalize_transport_error(err: &reqwest::Error) -> MobiwallError {
    let message = err.to_string();
    if indicates_bad_credential(&message) {
        return MobiwallError::Credential;
    }
    MobiwallError::Service(message)
}
