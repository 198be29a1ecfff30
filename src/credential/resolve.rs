//! Active credential resolution.

use super::store::CredentialStore;

/// Where the active credential came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialSource {
    /// A key supplied for a single validation attempt.
    Transient,
    /// The key persisted in the credential store.
    Stored,
    /// The fallback key from process configuration.
    Fallback,
}

impl std::fmt::Display for CredentialSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Transient => write!(f, "transient"),
            Self::Stored => write!(f, "stored"),
            Self::Fallback => write!(f, "fallback"),
        }
    }
}

/// A resolved API key and its source.
#[derive(Clone, PartialEq, Eq)]
pub struct ResolvedCredential {
    key: String,
    source: CredentialSource,
}

impl ResolvedCredential {
    /// Returns the API key.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Returns where the key came from.
    pub fn source(&self) -> CredentialSource {
        self.source
    }

    /// Returns the key with all but the last four characters hidden.
    pub fn masked(&self) -> String {
        let chars: Vec<char> = self.key.chars().collect();
        if chars.len() <= 4 {
            return "*".repeat(chars.len());
        }
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{}{}", "*".repeat(chars.len() - 4), tail)
    }
}

impl std::fmt::Debug for ResolvedCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolvedCredential")
            .field("key", &self.masked())
            .field("source", &self.source)
            .finish()
    }
}

/// Resolves the active credential.
///
/// Priority: `transient`, then the store, then `fallback`. Blank values are
/// skipped at every tier.
pub fn resolve_credential(
    transient: Option<&str>,
    store: &dyn CredentialStore,
    fallback: Option<&str>,
) -> Option<ResolvedCredential> {
    let usable = |key: &str| !key.trim().is_empty();

    if let Some(key) = transient.filter(|k| usable(k)) {
        return Some(ResolvedCredential {
            key: key.to_string(),
            source: CredentialSource::Transient,
        });
    }
    if let Some(key) = store.load().filter(|k| usable(k)) {
        return Some(ResolvedCredential {
            key,
            source: CredentialSource::Stored,
        });
    }
    fallback.filter(|k| usable(k)).map(|key| ResolvedCredential {
        key: key.to_string(),
        source: CredentialSource::Fallback,
    })
}
