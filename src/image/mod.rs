//! Wallpaper generation module.

mod client;
mod imagen;
mod service;
mod types;

pub use client::{GenerationClient, GenerationClientBuilder};
pub use service::WallpaperService;
pub use types::{
    GeneratedImage, GenerationState, WALLPAPER_ASPECT_RATIO, WALLPAPER_COUNT, WALLPAPER_MIME_TYPE,
};
