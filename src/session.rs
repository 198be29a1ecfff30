//! Wallpaper session state: the current batch, prompt and loading flag.

use crate::image::{GeneratedImage, GenerationState, WallpaperService};
use std::sync::Arc;

/// In-memory state of one browsing session. Nothing here is persisted.
pub struct WallpaperSession {
    service: Arc<dyn WallpaperService>,
    images: Vec<GeneratedImage>,
    selected: Option<String>,
    prompt_text: String,
    state: GenerationState,
}

impl WallpaperSession {
    /// Creates an empty session.
    pub fn new(service: Arc<dyn WallpaperService>) -> Self {
        Self {
            service,
            images: Vec::new(),
            selected: None,
            prompt_text: String::new(),
            state: GenerationState::default(),
        }
    }

    /// Generates a new batch for `prompt`.
    ///
    /// Blank prompts and submissions while loading are ignored and return
    /// `false`. Otherwise the batch replaces the current images on success,
    /// the error message is recorded on failure, and loading is always
    /// cleared before returning. Dropping the returned future mid-request
    /// also clears loading.
    pub async fn submit(&mut self, prompt: &str) -> bool {
        let prompt = prompt.trim();
        if prompt.is_empty() || self.state.is_loading {
            return false;
        }

        self.prompt_text = prompt.to_string();
        self.state = GenerationState::loading();

        let loading = LoadingGuard(&mut self.state);
        let result = self.service.generate_wallpapers(prompt).await;
        drop(loading);

        match result {
            Ok(images) => {
                self.images = images;
                self.selected = None;
                self.state = GenerationState::default();
            }
            Err(e) => {
                self.state = GenerationState::failed(e.to_string());
            }
        }
        true
    }

    /// Seeds the prompt input with an image's originating prompt.
    pub fn remix(&mut self, image: &GeneratedImage) {
        self.prompt_text = image.prompt.clone();
        self.selected = None;
    }

    /// Opens an image from the current batch in the viewer.
    pub fn select(&mut self, id: &str) -> Option<&GeneratedImage> {
        let image = self.images.iter().find(|image| image.id == id)?;
        self.selected = Some(image.id.clone());
        Some(image)
    }

    /// Closes the viewer.
    pub fn close_viewer(&mut self) {
        self.selected = None;
    }

    /// Returns the image open in the viewer.
    pub fn selected(&self) -> Option<&GeneratedImage> {
        let id = self.selected.as_deref()?;
        self.images.iter().find(|image| image.id == id)
    }

    /// Returns the current batch.
    pub fn images(&self) -> &[GeneratedImage] {
        &self.images
    }

    /// Returns the generation state.
    pub fn state(&self) -> &GenerationState {
        &self.state
    }

    /// Returns the text of the prompt input.
    pub fn prompt_text(&self) -> &str {
        &self.prompt_text
    }

    /// Sets the text of the prompt input.
    pub fn set_prompt_text(&mut self, text: impl Into<String>) {
        self.prompt_text = text.into();
    }

    /// Returns true if nothing has been generated and nothing is pending.
    pub fn is_empty(&self) -> bool {
        self.images.is_empty() && !self.state.is_loading && self.state.error.is_none()
    }
}

/// Clears the loading flag when dropped, including when the request
/// future is cancelled.
struct LoadingGuard<'a>(&'a mut GenerationState);

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.0.is_loading = false;
    }
}
