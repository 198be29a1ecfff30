//! Credential store trait.

/// Fixed storage key of the persisted credential record.
pub const STORAGE_KEY: &str = "mobiwall_api_key";

/// Persistence for the single user-managed API key.
///
/// Implementations hold one obfuscated record under [`STORAGE_KEY`].
/// `load` never fails: missing, unreadable or malformed records degrade to
/// `None` or to the raw stored text.
pub trait CredentialStore: Send + Sync {
    /// Persists `key`, replacing any previous record.
    ///
    /// An empty key removes the record.
    fn save(&self, key: &str) -> crate::Result<()>;

    /// Returns the persisted key, if any.
    fn load(&self) -> Option<String>;

    /// Removes the persisted key.
    fn clear(&self) -> crate::Result<()> {
        self.save("")
    }

    /// Returns a human-readable name for this backend.
    fn backend_name(&self) -> &'static str;
}
