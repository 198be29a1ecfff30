//! Wallpaper service trait.

use crate::error::Result;
use crate::image::types::GeneratedImage;
use async_trait::async_trait;

/// Operations the UI drives: generation and the connection probe.
#[async_trait]
pub trait WallpaperService: Send + Sync {
    /// Generates a batch of wallpapers for `prompt`.
    ///
    /// Errors are always one of `Configuration`, `Credential`,
    /// `EmptyResult` or `Service`.
    async fn generate_wallpapers(&self, prompt: &str) -> Result<Vec<GeneratedImage>>;

    /// Checks that the service is reachable and accepts the credential.
    ///
    /// `candidate_key` takes priority over every other source and is never
    /// persisted. Never fails; any error maps to `false`.
    async fn validate_connection(&self, candidate_key: Option<&str>) -> bool;
}
