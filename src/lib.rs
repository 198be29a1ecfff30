#![warn(missing_docs)]
//! Mobiwall - vertical phone wallpapers from Google Imagen.
//!
//! This crate manages the user's API key and orchestrates the two calls the
//! wallpaper app makes: generating a batch of four 9:16 JPEG wallpapers, and
//! probing the service to check that a key works.
//!
//! # Quick Start
//!
//! ```no_run
//! use mobiwall::{GenerationClient, MemoryCredentialStore, WallpaperService};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> mobiwall::Result<()> {
//!     let client = GenerationClient::builder()
//!         .store(Arc::new(MemoryCredentialStore::with_key("AIza...")))
//!         .build()?;
//!     let images = client.generate_wallpapers("Neon signs on a rainy street").await?;
//!     for image in &images {
//!         image.save(format!("{}.jpg", image.id))?;
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Key resolution
//!
//! The active key is resolved on every call, in this order:
//! 1. a key passed to [`WallpaperService::validate_connection`],
//! 2. the key persisted in the [`CredentialStore`],
//! 3. the fallback key from [`ClientConfig`] (e.g. `API_KEY`).
//!
//! The persisted key is base64-obfuscated, not encrypted.
//!
//! # Features
//!
//! - `cli` (default): the `mobiwall` command-line interface

pub mod config;
pub mod credential;
mod error;
pub mod image;
pub mod session;
pub mod settings;

// Re-export error types at crate root
pub use error::{
    MobiwallError, Result, CONFIGURATION_MESSAGE, CREDENTIAL_MESSAGE, EMPTY_RESULT_MESSAGE,
};

pub use config::{ClientConfig, ImagenModel};
pub use credential::{
    CredentialSource, CredentialStore, FileCredentialStore, MemoryCredentialStore,
    ResolvedCredential,
};
pub use image::{
    GeneratedImage, GenerationClient, GenerationClientBuilder, GenerationState, WallpaperService,
};
pub use session::WallpaperSession;
pub use settings::{KeyEntry, KeySelector, SettingsFlow, TestStatus};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::credential::{CredentialStore, FileCredentialStore, MemoryCredentialStore};
    pub use crate::error::{MobiwallError, Result};
    pub use crate::image::{GeneratedImage, GenerationClient, WallpaperService};
    pub use crate::session::WallpaperSession;
    pub use crate::settings::{SettingsFlow, TestStatus};
}
