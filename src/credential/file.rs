//! File-backed credential store.

use super::obfuscation::{deobfuscate, obfuscate};
use super::store::{CredentialStore, STORAGE_KEY};
use crate::error::{MobiwallError, Result};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Stores the obfuscated key in a single file named after [`STORAGE_KEY`].
#[derive(Debug, Clone)]
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    /// Creates a store that keeps its record inside `dir`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(STORAGE_KEY),
        }
    }

    /// Creates a store in the platform config directory
    /// (e.g. `~/.config/mobiwall` on Linux).
    pub fn default_location() -> Result<Self> {
        let dirs = directories::ProjectDirs::from("", "", "mobiwall").ok_or_else(|| {
            MobiwallError::Storage("could not determine a config directory".into())
        })?;
        Ok(Self::in_dir(dirs.config_dir()))
    }

    /// Returns the path of the record file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn remove(&self) -> Result<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => {
                debug!(path = %self.path.display(), "removed stored API key");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(storage_error(e)),
        }
    }
}

fn storage_error(err: std::io::Error) -> MobiwallError {
    MobiwallError::Storage(err.to_string())
}

/// Writes `contents` to a file readable only by the current user.
fn write_private(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    let mut options = std::fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let mut file = options.open(path)?;
    // `mode` only applies on creation; tighten a leftover temp file too.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        file.set_permissions(std::fs::Permissions::from_mode(0o600))?;
    }
    file.write_all(contents)?;
    file.sync_all()
}

impl CredentialStore for FileCredentialStore {
    fn save(&self, key: &str) -> Result<()> {
        if key.is_empty() {
            return self.remove();
        }

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(storage_error)?;
        }

        // Write atomically using temp file
        let temp_path = self.path.with_extension("tmp");
        write_private(&temp_path, obfuscate(key).as_bytes()).map_err(storage_error)?;
        std::fs::rename(&temp_path, &self.path).map_err(storage_error)?;

        debug!(path = %self.path.display(), "saved API key");
        Ok(())
    }

    fn load(&self) -> Option<String> {
        match std::fs::read_to_string(&self.path) {
            Ok(record) => Some(deobfuscate(&record)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => {
                warn!(path = %self.path.display(), "could not read stored API key: {e}");
                None
            }
        }
    }

    fn backend_name(&self) -> &'static str {
        "file"
    }
}
