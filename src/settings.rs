//! Settings flow for managing the API key.
//!
//! A candidate key is probed first and only persisted when the probe
//! succeeds:
//!
//! ```text
//! Idle -> Testing -> Success -> (display delay) -> Idle
//!                 -> Failure -> (edit or retry) -> Idle / Testing
//! ```

use crate::credential::CredentialStore;
use crate::error::Result;
use crate::image::WallpaperService;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// How long a successful test result stays visible before returning to idle.
pub const SUCCESS_DISPLAY_DELAY: Duration = Duration::from_secs(2);

/// State of the key test.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TestStatus {
    /// Nothing tested, or the result was dismissed.
    #[default]
    Idle,
    /// A probe is in flight.
    Testing,
    /// The probe succeeded.
    Success,
    /// The probe failed.
    Failure,
}

/// Outcome of [`SettingsFlow::change_key`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyEntry {
    /// The host's key selector was opened.
    SelectorOpened,
    /// No selector is available; the user types the key manually.
    Manual,
}

/// Key selection offered by the host platform, when it has one.
#[async_trait]
pub trait KeySelector: Send + Sync {
    /// Opens the platform's key picker.
    async fn open_key_selector(&self) -> Result<()>;
}

/// Drives the settings screen: save-and-test, connection test, clear and
/// key selection.
pub struct SettingsFlow {
    service: Arc<dyn WallpaperService>,
    store: Arc<dyn CredentialStore>,
    selector: Option<Arc<dyn KeySelector>>,
    status: TestStatus,
}

impl SettingsFlow {
    /// Creates a flow that probes through `service` and persists to `store`.
    pub fn new(service: Arc<dyn WallpaperService>, store: Arc<dyn CredentialStore>) -> Self {
        Self {
            service,
            store,
            selector: None,
            status: TestStatus::Idle,
        }
    }

    /// Injects the host's key selector.
    pub fn with_key_selector(mut self, selector: Arc<dyn KeySelector>) -> Self {
        self.selector = Some(selector);
        self
    }

    /// Returns the current test status.
    pub fn status(&self) -> TestStatus {
        self.status
    }

    /// Returns true while a probe is in flight; the test action is disabled.
    pub fn is_testing(&self) -> bool {
        self.status == TestStatus::Testing
    }

    /// Returns true if a key is currently persisted.
    pub fn has_saved_key(&self) -> bool {
        self.store
            .load()
            .is_some_and(|key| !key.trim().is_empty())
    }

    /// Probes `candidate` and persists it only if the probe succeeds.
    ///
    /// Surrounding whitespace is trimmed; a blank candidate fails without a
    /// request.
    pub async fn save_and_test(&mut self, candidate: &str) -> TestStatus {
        let candidate = candidate.trim();
        if candidate.is_empty() {
            self.status = TestStatus::Failure;
            return self.status;
        }

        let testing = TestingGuard::enter(&mut self.status);
        let ok = self.service.validate_connection(Some(candidate)).await;
        drop(testing);

        self.status = if !ok {
            TestStatus::Failure
        } else {
            match self.store.save(candidate) {
                Ok(()) => {
                    debug!(backend = self.store.backend_name(), "API key verified and saved");
                    TestStatus::Success
                }
                Err(e) => {
                    warn!("API key verified but could not be saved: {e}");
                    TestStatus::Failure
                }
            }
        };
        self.status
    }

    /// Probes the currently active key without persisting anything.
    pub async fn test_connection(&mut self) -> TestStatus {
        let testing = TestingGuard::enter(&mut self.status);
        let ok = self.service.validate_connection(None).await;
        drop(testing);

        self.status = if ok {
            TestStatus::Success
        } else {
            TestStatus::Failure
        };
        self.status
    }

    /// Waits out the success display delay, then returns to idle.
    pub async fn finish_success_display(&mut self) {
        if self.status != TestStatus::Success {
            return;
        }
        tokio::time::sleep(SUCCESS_DISPLAY_DELAY).await;
        self.status = TestStatus::Idle;
    }

    /// The user edited the key input; any previous result is dismissed.
    pub fn edit_input(&mut self) {
        if self.status != TestStatus::Testing {
            self.status = TestStatus::Idle;
        }
    }

    /// Removes the persisted key.
    pub fn clear_key(&mut self) -> Result<()> {
        self.store.clear()?;
        self.status = TestStatus::Idle;
        debug!("API key cleared");
        Ok(())
    }

    /// Opens the host's key selector, or asks for manual entry when there
    /// is none.
    pub async fn change_key(&mut self) -> KeyEntry {
        let Some(selector) = self.selector.as_ref() else {
            return KeyEntry::Manual;
        };

        match selector.open_key_selector().await {
            Ok(()) => {
                self.status = TestStatus::Idle;
                KeyEntry::SelectorOpened
            }
            Err(e) => {
                warn!("failed to open key selector: {e}");
                KeyEntry::Manual
            }
        }
    }
}

/// Holds the status at `Testing` while a key check is in flight. If that
/// future is dropped, the status falls back to `Idle`.
struct TestingGuard<'a>(&'a mut TestStatus);

impl<'a> TestingGuard<'a> {
    fn enter(status: &'a mut TestStatus) -> Self {
        *status = TestStatus::Testing;
        Self(status)
    }
}

impl Drop for TestingGuard<'_> {
    fn drop(&mut self) {
        if *self.0 == TestStatus::Testing {
            *self.0 = TestStatus::Idle;
        }
    }
}
