//! Error types for wallpaper generation and key management.

/// Message shown when no API key can be resolved from any source.
pub const CONFIGURATION_MESSAGE: &str =
    "No API key is configured. Add your Google AI Studio API key in Settings.";

/// Message shown when the service rejects the API key.
pub const CREDENTIAL_MESSAGE: &str =
    "The API key was rejected or is missing. Check your key in Settings.";

/// Message shown when the service answers without any images.
pub const EMPTY_RESULT_MESSAGE: &str =
    "No images were generated. Try again with a different description.";

/// Errors surfaced to the UI.
///
/// The generation client only ever returns `Configuration`, `Credential`,
/// `EmptyResult` or `Service`. `Storage` comes from credential store writes
/// and `Export` from saving generated images.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MobiwallError {
    /// No credential could be resolved from any source.
    #[error("{}", CONFIGURATION_MESSAGE)]
    Configuration,

    /// The service rejected the credential.
    #[error("{}", CREDENTIAL_MESSAGE)]
    Credential,

    /// The service succeeded but produced no images.
    #[error("{}", EMPTY_RESULT_MESSAGE)]
    EmptyResult,

    /// Any other service or transport failure, with the underlying message.
    #[error("{0}")]
    Service(String),

    /// The local credential record could not be written or removed.
    #[error("failed to store API key: {0}")]
    Storage(String),

    /// A generated image could not be decoded or written out.
    #[error("failed to export image: {0}")]
    Export(String),
}

impl MobiwallError {
    /// Returns true if resubmitting the same request may succeed.
    ///
    /// Configuration and credential failures need the user to change
    /// settings first.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::EmptyResult | Self::Service(_))
    }

    /// Returns true if the user has to visit settings to recover.
    pub fn needs_settings(&self) -> bool {
        matches!(self, Self::Configuration | Self::Credential)
    }
}

/// Result type alias for mobiwall operations.
pub type Result<T> = std::result::Result<T, MobiwallError>;
