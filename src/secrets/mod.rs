//! Secret lookup with environment fallback.
//!
//! Secrets are read from an optional managed store first and from the
//! process environment second. A missing secret is not an error: callers
//! get `None` and disable the feature that needed it.

use crate::error::{AppError, Result};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};
use zeroize::Zeroizing;

/// A source of named secrets.
pub trait SecretStore: Send + Sync {
    /// Fetch a secret by name. `Ok(None)` means the store does not hold it.
    fn fetch(&self, name: &str) -> Result<Option<Zeroizing<String>>>;

    /// Human-readable description for logs.
    fn describe(&self) -> String;
}

/// Secrets held in a JSON object file (`{"NAME": "value", ...}`).
///
/// The file must not be readable by group or others.
pub struct FileSecretStore {
    path: PathBuf,
    secrets: HashMap<String, Zeroizing<String>>,
}

impl FileSecretStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(AppError::Secret(format!(
                "Secrets file not found: {}",
                path.display()
            )));
        }

        Self::validate_permissions(path)?;

        let contents = Zeroizing::new(fs::read_to_string(path).map_err(|e| {
            AppError::Secret(format!("Failed to read secrets file: {}", e))
        })?);

        let raw: HashMap<String, String> = serde_json::from_str(&contents).map_err(|e| {
            AppError::Secret(format!("Secrets file is not a JSON object of strings: {}", e))
        })?;

        debug!("Loaded {} secrets from {}", raw.len(), path.display());

        Ok(Self {
            path: path.to_path_buf(),
            secrets: raw
                .into_iter()
                .map(|(name, value)| (name, Zeroizing::new(value)))
                .collect(),
        })
    }

    #[cfg(unix)]
    fn validate_permissions(path: &Path) -> Result<()> {
        use std::os::unix::fs::PermissionsExt;

        let mode = fs::metadata(path)?.permissions().mode();
        if mode & 0o077 != 0 {
            return Err(AppError::Secret(format!(
                "Secrets file {} has insecure permissions {:o}; expected 600",
                path.display(),
                mode & 0o777
            )));
        }
        Ok(())
    }

    #[cfg(not(unix))]
    fn validate_permissions(_path: &Path) -> Result<()> {
        Ok(())
    }
}

impl SecretStore for FileSecretStore {
    fn fetch(&self, name: &str) -> Result<Option<Zeroizing<String>>> {
        Ok(self.secrets.get(name).cloned())
    }

    fn describe(&self) -> String {
        format!("secrets file {}", self.path.display())
    }
}

/// Store-then-environment secret accessor.
pub struct SecretAccessor {
    store: Option<Box<dyn SecretStore>>,
}

impl SecretAccessor {
    pub fn new(store: Option<Box<dyn SecretStore>>) -> Self {
        Self { store }
    }

    /// Environment variables only.
    pub fn env_only() -> Self {
        Self { store: None }
    }

    /// Open the configured store. A store that fails to open is logged and
    /// skipped so startup continues on environment variables.
    pub fn from_store_path(path: Option<&str>) -> Self {
        let Some(path) = path else {
            info!("No secret store configured, using environment variables");
            return Self::env_only();
        };

        match FileSecretStore::open(path) {
            Ok(store) => {
                info!("Secret store initialized: {}", store.describe());
                Self::new(Some(Box::new(store)))
            }
            Err(e) => {
                error!("Failed to initialize secret store: {}", e);
                Self::env_only()
            }
        }
    }

    /// Look up `name` in the store, then `fallback_env` (or `name` itself) in
    /// the environment.
    pub fn get_secret(&self, name: &str, fallback_env: Option<&str>) -> Option<Zeroizing<String>> {
        if let Some(store) = &self.store {
            match store.fetch(name) {
                Ok(Some(value)) => {
                    debug!("Retrieved secret '{}' from {}", name, store.describe());
                    return Some(value);
                }
                Ok(None) => {}
                Err(e) => warn!("Failed to retrieve '{}' from {}: {}", name, store.describe(), e),
            }
        }

        let env_name = fallback_env.unwrap_or(name);
        match std::env::var(env_name) {
            Ok(value) if !value.is_empty() => {
                debug!("Using environment variable '{}' as fallback", env_name);
                Some(Zeroizing::new(value))
            }
            _ => {
                error!("Secret '{}' not found in secret store or environment variables", name);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn secrets_file(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(file.path(), fs::Permissions::from_mode(0o600)).unwrap();
        }
        file
    }

    #[test]
    fn test_file_store_lookup() {
        let file = secrets_file(r#"{"AZURE-OPENAI-API-KEY": "from-store"}"#);
        let store = FileSecretStore::open(file.path()).unwrap();

        assert_eq!(
            store.fetch("AZURE-OPENAI-API-KEY").unwrap().as_deref().map(String::as_str),
            Some("from-store")
        );
        assert!(store.fetch("OTHER").unwrap().is_none());
    }

    #[cfg(unix)]
    #[test]
    fn test_file_store_rejects_world_readable() {
        use std::os::unix::fs::PermissionsExt;

        let file = secrets_file(r#"{"A": "b"}"#);
        fs::set_permissions(file.path(), fs::Permissions::from_mode(0o644)).unwrap();

        let err = FileSecretStore::open(file.path()).err().unwrap();
        assert!(err.to_string().contains("insecure permissions"));
    }

    #[test]
    fn test_file_store_rejects_malformed_json() {
        let file = secrets_file("not json");
        assert!(FileSecretStore::open(file.path()).is_err());
    }

    #[test]
    fn test_store_wins_over_environment() {
        std::env::set_var("COUNSEL_AI_TEST_STORE_WINS", "from-env");
        let file = secrets_file(r#"{"store-wins": "from-store"}"#);
        let accessor = SecretAccessor::from_store_path(file.path().to_str());

        let value = accessor.get_secret("store-wins", Some("COUNSEL_AI_TEST_STORE_WINS"));
        assert_eq!(value.as_deref().map(String::as_str), Some("from-store"));
    }

    #[test]
    fn test_environment_fallback() {
        std::env::set_var("COUNSEL_AI_TEST_ENV_FALLBACK", "from-env");
        let accessor = SecretAccessor::env_only();

        let value = accessor.get_secret("missing-in-store", Some("COUNSEL_AI_TEST_ENV_FALLBACK"));
        assert_eq!(value.as_deref().map(String::as_str), Some("from-env"));

        // Without an explicit fallback the secret name is used as the variable
        let value = accessor.get_secret("COUNSEL_AI_TEST_ENV_FALLBACK", None);
        assert!(value.is_some());
    }

    #[test]
    fn test_missing_secret_is_none() {
        let accessor = SecretAccessor::from_store_path(Some("/nonexistent/secrets.json"));
        assert!(accessor
            .get_secret("COUNSEL_AI_TEST_NOT_SET", Some("COUNSEL_AI_TEST_NOT_SET_EITHER"))
            .is_none());
    }
}
