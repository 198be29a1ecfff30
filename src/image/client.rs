//! Generation client: credential resolution plus the two service calls.

use crate::config::ClientConfig;
use crate::credential::{
    resolve_credential, CredentialStore, FileCredentialStore, ResolvedCredential,
};
use crate::error::{MobiwallError, Result};
use crate::image::imagen::{
    normalize_http_error, normalize_transport_error, PredictRequest, PredictResponse, ProbeRequest,
};
use crate::image::service::WallpaperService;
use crate::image::types::GeneratedImage;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Instant;

/// Builder for [`GenerationClient`].
#[derive(Default)]
pub struct GenerationClientBuilder {
    store: Option<Arc<dyn CredentialStore>>,
    config: ClientConfig,
    http: Option<reqwest::Client>,
}

impl GenerationClientBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the credential store. Defaults to [`FileCredentialStore::default_location`].
    pub fn store(mut self, store: Arc<dyn CredentialStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Replaces the whole configuration.
    pub fn config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the lowest-priority fallback API key.
    pub fn fallback_api_key(mut self, key: impl Into<String>) -> Self {
        self.config.fallback_api_key = Some(key.into());
        self
    }

    /// Sets the API base URL.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = Some(url.into());
        self
    }

    /// Uses an existing HTTP client.
    pub fn http_client(mut self, client: reqwest::Client) -> Self {
        self.http = Some(client);
        self
    }

    /// Builds the client.
    pub fn build(self) -> Result<GenerationClient> {
        let store = match self.store {
            Some(store) => store,
            None => Arc::new(FileCredentialStore::default_location()?),
        };

        Ok(GenerationClient {
            http: self.http.unwrap_or_default(),
            store,
            config: self.config,
        })
    }
}

/// Client for the wallpaper and probe endpoints.
///
/// No key is held by the client itself. Every call resolves the active
/// credential and binds it to a short-lived request scope, so a key saved
/// in settings is picked up by the very next request.
pub struct GenerationClient {
    http: reqwest::Client,
    store: Arc<dyn CredentialStore>,
    config: ClientConfig,
}

impl GenerationClient {
    /// Creates a new `GenerationClientBuilder`.
    pub fn builder() -> GenerationClientBuilder {
        GenerationClientBuilder::new()
    }

    /// Returns the credential store this client reads from.
    pub fn store(&self) -> Arc<dyn CredentialStore> {
        Arc::clone(&self.store)
    }

    /// Returns the client configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Resolves the active credential. `transient` has the highest priority.
    pub fn active_credential(&self, transient: Option<&str>) -> Option<ResolvedCredential> {
        resolve_credential(
            transient,
            self.store.as_ref(),
            self.config.fallback_api_key.as_deref(),
        )
    }

    fn bind(&self, transient: Option<&str>) -> Option<BoundClient<'_>> {
        self.active_credential(transient).map(|credential| BoundClient {
            http: &self.http,
            config: &self.config,
            credential,
        })
    }

    async fn generate_impl(&self, prompt: &str) -> Result<Vec<GeneratedImage>> {
        let bound = self.bind(None).ok_or(MobiwallError::Configuration)?;
        tracing::debug!(source = %bound.credential.source(), "resolved API key");

        let timestamp_ms = chrono::Utc::now().timestamp_millis();
        let start = Instant::now();

        let images = bound.predict(prompt).await?;
        if images.is_empty() {
            return Err(MobiwallError::EmptyResult);
        }

        tracing::debug!(
            count = images.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "wallpaper generation complete"
        );

        Ok(images
            .into_iter()
            .enumerate()
            .map(|(index, data)| GeneratedImage::new(timestamp_ms, index, data, prompt))
            .collect())
    }
}

#[async_trait]
impl WallpaperService for GenerationClient {
    async fn generate_wallpapers(&self, prompt: &str) -> Result<Vec<GeneratedImage>> {
        let result = self.generate_impl(prompt).await;
        if let Err(ref e) = result {
            tracing::warn!("wallpaper generation failed: {e}");
        }
        result
    }

    async fn validate_connection(&self, candidate_key: Option<&str>) -> bool {
        let Some(bound) = self.bind(candidate_key) else {
            tracing::warn!("connection check skipped: no API key available");
            return false;
        };

        match bound.probe().await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(source = %bound.credential.source(), "connection check failed: {e}");
                false
            }
        }
    }
}

/// A client bound to one resolved credential for the duration of a call.
struct BoundClient<'a> {
    http: &'a reqwest::Client,
    config: &'a ClientConfig,
    credential: ResolvedCredential,
}

impl BoundClient<'_> {
    fn model_url(&self, model: &str, method: &str) -> String {
        format!(
            "{}/v1beta/models/{}:{}",
            self.config.effective_base_url(),
            model,
            method
        )
    }

    /// Requests a wallpaper batch and returns the base64 payloads.
    async fn predict(&self, prompt: &str) -> Result<Vec<String>> {
        let url = self.model_url(self.config.image_model.as_str(), "predict");
        let body = PredictRequest::wallpapers(prompt);

        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", self.credential.key())
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| normalize_transport_error(&e))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(normalize_http_error(status.as_u16(), &text));
        }

        let text = response
            .text()
            .await
            .map_err(|e| normalize_transport_error(&e))?;
        let parsed: PredictResponse = serde_json::from_str(&text).map_err(|e| {
            MobiwallError::Service(format!("unexpected response from image service: {e}"))
        })?;

        Ok(parsed.into_images())
    }

    /// Sends the minimal text request used as a connectivity check.
    async fn probe(&self) -> Result<()> {
        let url = self.model_url(self.config.effective_probe_model(), "generateContent");

        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", self.credential.key())
            .header("Content-Type", "application/json")
            .json(&ProbeRequest::minimal())
            .send()
            .await
            .map_err(|e| normalize_transport_error(&e))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(normalize_http_error(status.as_u16(), &text));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credential::MemoryCredentialStore;
    use serde_json::json;
    use std::collections::HashSet;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const PREDICT_PATH: &str = "/v1beta/models/imagen-4.0-generate-001:predict";
    const PROBE_PATH: &str = "/v1beta/models/gemini-2.5-flash:generateContent";

    fn test_client(server: &MockServer, store: Arc<MemoryCredentialStore>) -> GenerationClient {
        GenerationClient::builder()
            .store(store)
            .base_url(server.uri())
            .build()
            .unwrap()
    }

    fn predictions(count: usize) -> serde_json::Value {
        let items: Vec<_> = (0..count)
            .map(|i| {
                json!({
                    "bytesBase64Encoded": format!("/9j/{i}AAA"),
                    "mimeType": "image/jpeg"
                })
            })
            .collect();
        json!({ "predictions": items })
    }

    #[tokio::test]
    async fn test_generate_without_credential_makes_no_request() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(predictions(4)))
            .expect(0)
            .mount(&server)
            .await;

        let client = test_client(&server, Arc::new(MemoryCredentialStore::new()));
        let err = client
            .generate_wallpapers("neon city at night")
            .await
            .unwrap_err();
        assert_eq!(err, MobiwallError::Configuration);
    }

    #[tokio::test]
    async fn test_generate_maps_batch() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(PREDICT_PATH))
            .and(header("x-goog-api-key", "stored-key"))
            .and(body_partial_json(json!({
                "instances": [{ "prompt": "neon city at night" }],
                "parameters": {
                    "sampleCount": 4,
                    "aspectRatio": "9:16",
                    "outputOptions": { "mimeType": "image/jpeg" }
                }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(predictions(4)))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server, Arc::new(MemoryCredentialStore::with_key("stored-key")));
        let images = client
            .generate_wallpapers("neon city at night")
            .await
            .unwrap();

        assert_eq!(images.len(), 4);
        let ids: HashSet<_> = images.iter().map(|i| i.id.clone()).collect();
        assert_eq!(ids.len(), 4);
        for (index, image) in images.iter().enumerate() {
            assert_eq!(image.prompt, "neon city at night");
            assert_eq!(image.aspect_ratio, "9:16");
            assert!(image.id.starts_with("gen-"));
            assert!(image.id.ends_with(&format!("-{index}")));
            assert_eq!(image.base64, format!("/9j/{index}AAA"));
        }
    }

    #[tokio::test]
    async fn test_generate_returns_every_image_the_service_sent() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(PREDICT_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(predictions(2)))
            .mount(&server)
            .await;

        let client = test_client(&server, Arc::new(MemoryCredentialStore::with_key("k")));
        let images = client.generate_wallpapers("forest").await.unwrap();
        assert_eq!(images.len(), 2);
    }

    #[tokio::test]
    async fn test_generate_uses_fallback_key() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(PREDICT_PATH))
            .and(header("x-goog-api-key", "env-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(predictions(4)))
            .expect(1)
            .mount(&server)
            .await;

        let client = GenerationClient::builder()
            .store(Arc::new(MemoryCredentialStore::new()))
            .base_url(server.uri())
            .fallback_api_key("env-key")
            .build()
            .unwrap();
        assert_eq!(client.generate_wallpapers("dunes").await.unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_generate_empty_result() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(PREDICT_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .mount(&server)
            .await;

        let client = test_client(&server, Arc::new(MemoryCredentialStore::with_key("k")));
        let err = client.generate_wallpapers("void").await.unwrap_err();
        assert_eq!(err, MobiwallError::EmptyResult);
    }

    #[tokio::test]
    async fn test_generate_all_filtered_is_empty_result() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(PREDICT_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "predictions": [{ "raiFilteredReason": "filtered" }]
            })))
            .mount(&server)
            .await;

        let client = test_client(&server, Arc::new(MemoryCredentialStore::with_key("k")));
        let err = client.generate_wallpapers("something").await.unwrap_err();
        assert_eq!(err, MobiwallError::EmptyResult);
    }

    #[tokio::test]
    async fn test_generate_rejected_key_is_credential_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(PREDICT_PATH))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "error": {
                    "code": 400,
                    "message": "API key not valid. Please pass a valid API key.",
                    "status": "INVALID_ARGUMENT"
                }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server, Arc::new(MemoryCredentialStore::with_key("bad-key")));
        let err = client.generate_wallpapers("city").await.unwrap_err();
        assert_eq!(err, MobiwallError::Credential);
        assert!(err.needs_settings());
    }

    #[tokio::test]
    async fn test_generate_service_error_is_verbatim_and_not_retried() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(PREDICT_PATH))
            .respond_with(ResponseTemplate::new(429).set_body_json(json!({
                "error": {
                    "code": 429,
                    "message": "Resource has been exhausted (e.g. check quota).",
                    "status": "RESOURCE_EXHAUSTED"
                }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server, Arc::new(MemoryCredentialStore::with_key("k")));
        let err = client.generate_wallpapers("city").await.unwrap_err();
        assert_eq!(
            err,
            MobiwallError::Service("Resource has been exhausted (e.g. check quota).".into())
        );
    }

    #[tokio::test]
    async fn test_generate_malformed_body_is_service_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(PREDICT_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let client = test_client(&server, Arc::new(MemoryCredentialStore::with_key("k")));
        let err = client.generate_wallpapers("city").await.unwrap_err();
        assert!(matches!(err, MobiwallError::Service(_)));
    }

    #[tokio::test]
    async fn test_generate_transport_failure_is_service_error() {
        let client = GenerationClient::builder()
            .store(Arc::new(MemoryCredentialStore::with_key("k")))
            .base_url("http://127.0.0.1:1")
            .build()
            .unwrap();

        let err = client.generate_wallpapers("city").await.unwrap_err();
        assert!(matches!(err, MobiwallError::Service(_)));
    }

    #[tokio::test]
    async fn test_validate_with_stored_key_leaves_store_unchanged() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(PROBE_PATH))
            .and(header("x-goog-api-key", "stored-key"))
            .and(body_partial_json(json!({
                "contents": [{ "parts": [{ "text": "test" }] }]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "candidates": [] })))
            .expect(1)
            .mount(&server)
            .await;

        let store = Arc::new(MemoryCredentialStore::with_key("stored-key"));
        let before = store.raw_record();
        let client = test_client(&server, Arc::clone(&store));

        assert!(client.validate_connection(None).await);
        assert_eq!(store.raw_record(), before);
    }

    #[tokio::test]
    async fn test_validate_rejected_candidate_is_false_and_not_persisted() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(PROBE_PATH))
            .and(header("x-goog-api-key", "bad-key"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "error": {
                    "code": 400,
                    "message": "API key not valid.",
                    "status": "INVALID_ARGUMENT"
                }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let store = Arc::new(MemoryCredentialStore::with_key("stored-key"));
        let client = test_client(&server, Arc::clone(&store));

        assert!(!client.validate_connection(Some("bad-key")).await);
        assert_eq!(store.load().as_deref(), Some("stored-key"));
    }

    #[tokio::test]
    async fn test_validate_good_candidate_is_not_persisted() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(PROBE_PATH))
            .and(header("x-goog-api-key", "good-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .mount(&server)
            .await;

        let store = Arc::new(MemoryCredentialStore::new());
        let client = test_client(&server, Arc::clone(&store));

        assert!(client.validate_connection(Some("good-key")).await);
        assert_eq!(store.load(), None);
    }

    #[tokio::test]
    async fn test_validate_without_any_key_is_false_without_request() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let client = test_client(&server, Arc::new(MemoryCredentialStore::new()));
        assert!(!client.validate_connection(None).await);
    }

    #[tokio::test]
    async fn test_validate_server_error_is_false() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(PROBE_PATH))
            .respond_with(ResponseTemplate::new(503).set_body_string("unavailable"))
            .mount(&server)
            .await;

        let client = test_client(&server, Arc::new(MemoryCredentialStore::with_key("k")));
        assert!(!client.validate_connection(None).await);
    }

    #[test]
    fn test_active_credential_priority() {
        let client = GenerationClient::builder()
            .store(Arc::new(MemoryCredentialStore::with_key("stored-key")))
            .fallback_api_key("env-key")
            .build()
            .unwrap();

        assert_eq!(client.active_credential(Some("typed")).unwrap().key(), "typed");
        assert_eq!(client.active_credential(None).unwrap().key(), "stored-key");

        client.store().clear().unwrap();
        assert_eq!(client.active_credential(None).unwrap().key(), "env-key");
    }
}
