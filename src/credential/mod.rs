//! API key persistence and resolution.
//!
//! The stored key is base64-encoded so it does not sit on disk as plain
//! visible text. This is obfuscation only: anyone who can read the store
//! can decode the key. Deployments that need real confidentiality should
//! use an OS keychain instead.

mod file;
mod memory;
mod obfuscation;
mod resolve;
mod store;

pub use file::FileCredentialStore;
pub use memory::MemoryCredentialStore;
pub use obfuscation::{deobfuscate, obfuscate};
pub use resolve::{resolve_credential, CredentialSource, ResolvedCredential};
pub use store::{CredentialStore, STORAGE_KEY};
