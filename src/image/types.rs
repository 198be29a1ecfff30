//! Core types for wallpaper generation.

use crate::error::{MobiwallError, Result};
use base64::Engine;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Number of images requested per generation.
pub const WALLPAPER_COUNT: u32 = 4;

/// Aspect ratio of every generated wallpaper (vertical, phone screens).
pub const WALLPAPER_ASPECT_RATIO: &str = "9:16";

/// MIME type requested from the image service.
pub const WALLPAPER_MIME_TYPE: &str = "image/jpeg";

/// A generated wallpaper.
///
/// Serializes with the field names used by the web front-end
/// (`id`, `base64`, `prompt`, `aspectRatio`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[must_use = "generated image should be shown or saved"]
pub struct GeneratedImage {
    /// `gen-<request timestamp in ms>-<index in batch>`.
    pub id: String,
    /// Base64-encoded JPEG bytes.
    pub base64: String,
    /// Prompt that produced this image.
    pub prompt: String,
    /// Aspect ratio, always `9:16`.
    pub aspect_ratio: String,
}

impl GeneratedImage {
    /// Creates the `index`-th image of a batch requested at `timestamp_ms`.
    pub fn new(
        timestamp_ms: i64,
        index: usize,
        base64: impl Into<String>,
        prompt: impl Into<String>,
    ) -> Self {
        Self {
            id: format!("gen-{}-{}", timestamp_ms, index),
            base64: base64.into(),
            prompt: prompt.into(),
            aspect_ratio: WALLPAPER_ASPECT_RATIO.to_string(),
        }
    }

    /// Decodes the image bytes.
    pub fn decode(&self) -> Result<Vec<u8>> {
        base64::engine::general_purpose::STANDARD
            .decode(self.base64.trim())
            .map_err(|e| MobiwallError::Export(e.to_string()))
    }

    /// Returns true if the decoded data starts with the JPEG magic bytes.
    pub fn is_jpeg(&self) -> bool {
        self.decode()
            .map(|data| data.starts_with(&[0xFF, 0xD8, 0xFF]))
            .unwrap_or(false)
    }

    /// Returns the image as a data URL.
    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", WALLPAPER_MIME_TYPE, self.base64)
    }

    /// Returns a file name for downloading this image
    /// (`mobiwall-<unix ms>.jpg`).
    pub fn download_file_name(&self) -> String {
        format!("mobiwall-{}.jpg", chrono::Utc::now().timestamp_millis())
    }

    /// Saves the decoded image to the specified path.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let data = self.decode()?;
        std::fs::write(path, data).map_err(|e| MobiwallError::Export(e.to_string()))
    }
}

/// UI state of the generation flow. Never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationState {
    /// A generation request is in flight.
    pub is_loading: bool,
    /// Message of the last failed generation.
    pub error: Option<String>,
}

impl GenerationState {
    /// State while a request is in flight.
    pub fn loading() -> Self {
        Self {
            is_loading: true,
            error: None,
        }
    }

    /// State after a failed request.
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            is_loading: false,
            error: Some(message.into()),
        }
    }
}
