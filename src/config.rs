//! Client configuration.

/// Default endpoint of the Gemini Developer API.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Environment variables checked, in order, by [`ClientConfig::from_env`].
pub const FALLBACK_KEY_ENV_VARS: [&str; 2] = ["API_KEY", "GOOGLE_API_KEY"];

/// Imagen model variants used for wallpaper generation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ImagenModel {
    /// Imagen 4 (standard quality).
    #[default]
    Imagen4,
    /// Imagen 4 Fast (lower latency, cheaper).
    Imagen4Fast,
    /// Imagen 4 Ultra (highest quality).
    Imagen4Ultra,
}

impl ImagenModel {
    /// Returns the API model identifier.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Imagen4 => "imagen-4.0-generate-001",
            Self::Imagen4Fast => "imagen-4.0-fast-generate-001",
            Self::Imagen4Ultra => "imagen-4.0-ultra-generate-001",
        }
    }
}

/// Configuration for a [`GenerationClient`](crate::GenerationClient).
///
/// The fallback key is the lowest-priority credential source. It is only
/// read here, at construction time, never during an operation.
#[derive(Clone, Default)]
pub struct ClientConfig {
    /// Key used when neither a transient nor a stored key is available.
    pub fallback_api_key: Option<String>,
    /// API base URL, without a trailing slash.
    pub base_url: Option<String>,
    /// Image model.
    pub image_model: ImagenModel,
    /// Text model used for the connection probe.
    pub probe_model: Option<String>,
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field(
                "fallback_api_key",
                &self.fallback_api_key.as_ref().map(|_| "<redacted>"),
            )
            .field("base_url", &self.base_url)
            .field("image_model", &self.image_model)
            .field("probe_model", &self.probe_model)
            .finish()
    }
}

impl ClientConfig {
    /// Default text model for the connection probe.
    pub const DEFAULT_PROBE_MODEL: &'static str = "gemini-2.5-flash";

    /// Creates an empty configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a configuration whose fallback key comes from `API_KEY`
    /// or `GOOGLE_API_KEY`.
    pub fn from_env() -> Self {
        let fallback_api_key = FALLBACK_KEY_ENV_VARS
            .iter()
            .filter_map(|var| std::env::var(var).ok())
            .find(|value| !value.trim().is_empty());
        Self {
            fallback_api_key,
            ..Self::default()
        }
    }

    /// Sets the fallback API key.
    pub fn with_fallback_api_key(mut self, key: impl Into<String>) -> Self {
        self.fallback_api_key = Some(key.into());
        self
    }

    /// Sets the API base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Sets the image model.
    pub fn with_image_model(mut self, model: ImagenModel) -> Self {
        self.image_model = model;
        self
    }

    /// Sets the probe model.
    pub fn with_probe_model(mut self, model: impl Into<String>) -> Self {
        self.probe_model = Some(model.into());
        self
    }

    /// Returns the effective base URL.
    pub fn effective_base_url(&self) -> &str {
        self.base_url
            .as_deref()
            .map(|url| url.trim_end_matches('/'))
            .unwrap_or(DEFAULT_BASE_URL)
    }

    /// Returns the effective probe model.
    pub fn effective_probe_model(&self) -> &str {
        self.probe_model
            .as_deref()
            .unwrap_or(Self::DEFAULT_PROBE_MODEL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_imagen_model_as_str() {
        assert_eq!(ImagenModel::Imagen4.as_str(), "imagen-4.0-generate-001");
        assert_eq!(ImagenModel::default(), ImagenModel::Imagen4);
    }

    #[test]
    fn test_defaults() {
        let config = ClientConfig::new();
        assert_eq!(config.effective_base_url(), DEFAULT_BASE_URL);
        assert_eq!(config.effective_probe_model(), "gemini-2.5-flash");
        assert!(config.fallback_api_key.is_none());
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let config = ClientConfig::new().with_base_url("http://127.0.0.1:8080/");
        assert_eq!(config.effective_base_url(), "http://127.0.0.1:8080");
    }

    #[test]
    fn test_debug_redacts_fallback_key() {
        let config = ClientConfig::new().with_fallback_api_key("secret-key");
        let debug = format!("{:?}", config);
        assert!(!debug.contains("secret-key"));
        assert!(debug.contains("<redacted>"));
    }
}
