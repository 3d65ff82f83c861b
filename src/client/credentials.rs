use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::client::ClientError;
use crate::models::AdminProfile;

/// Client-held auth state: the credential and the profile it was issued for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredSession {
    pub token: String,
    pub admin: AdminProfile,
    pub server_url: String,
    pub saved_at: DateTime<Utc>,
}

/// Pluggable storage back-end. The CLI writes to disk, tests keep it in memory.
pub trait CredentialStore: Send + Sync {
    fn save(&self, session: &StoredSession) -> Result<(), ClientError>;
    fn load(&self) -> Result<Option<StoredSession>, ClientError>;
    /// Removing an absent session is not an error.
    fn delete(&self) -> Result<(), ClientError>;
}

/// Stores the session in `<config_dir>/gatekeeper/session.json`.
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    pub fn default_path() -> PathBuf {
        let base = std::env::var("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|_| std::env::var("HOME").map(|h| PathBuf::from(h).join(".config")))
            .unwrap_or_else(|_| PathBuf::from("."));

        base.join("gatekeeper").join("session.json")
    }

    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn with_default_path() -> Self {
        Self::new(Self::default_path())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CredentialStore for FileCredentialStore {
    fn save(&self, session: &StoredSession) -> Result<(), ClientError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(session)
            .map_err(|e| ClientError::Store(format!("Failed to serialize session: {e}")))?;
        std::fs::write(&self.path, json)?;

        // Owner read/write only
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&self.path, std::fs::Permissions::from_mode(0o600))?;
        }

        Ok(())
    }

    fn load(&self) -> Result<Option<StoredSession>, ClientError> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(&self.path)?;
        let session = serde_json::from_str(&content)
            .map_err(|e| ClientError::Store(format!("Corrupt session file: {e}")))?;

        Ok(Some(session))
    }

    fn delete(&self) -> Result<(), ClientError> {
        if self.path.exists() {
            std::fs::remove_file(&self.path)?;
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryCredentialStore {
    inner: Mutex<Option<StoredSession>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_session(session: StoredSession) -> Self {
        Self {
            inner: Mutex::new(Some(session)),
        }
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn save(&self, session: &StoredSession) -> Result<(), ClientError> {
        *self.inner.lock() = Some(session.clone());
        Ok(())
    }

    fn load(&self) -> Result<Option<StoredSession>, ClientError> {
        Ok(self.inner.lock().clone())
    }

    fn delete(&self) -> Result<(), ClientError> {
        *self.inner.lock() = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> StoredSession {
        StoredSession {
            token: "header.payload.signature".to_string(),
            admin: AdminProfile {
                id: "a1".to_string(),
                name: "Alice".to_string(),
                email: "alice@shop.test".to_string(),
            },
            server_url: "http://127.0.0.1:8000".to_string(),
            saved_at: Utc::now(),
        }
    }

    #[test]
    fn test_file_store_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileCredentialStore::new(dir.path().join("nested").join("session.json"));

        store.save(&session()).unwrap();
        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded.token, "header.payload.signature");
        assert_eq!(loaded.admin.email, "alice@shop.test");
    }

    #[test]
    fn test_file_store_load_nonexistent() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileCredentialStore::new(dir.path().join("missing.json"));
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_file_store_delete_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        let store = FileCredentialStore::new(path.clone());

        store.save(&session()).unwrap();
        store.delete().unwrap();
        assert!(!path.exists());
        assert!(store.delete().is_ok());
    }

    #[test]
    fn test_file_store_corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "{not json").unwrap();

        let store = FileCredentialStore::new(path);
        assert!(matches!(store.load(), Err(ClientError::Store(_))));
    }

    #[cfg(unix)]
    #[test]
    fn test_file_store_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        FileCredentialStore::new(path.clone()).save(&session()).unwrap();

        let perms = std::fs::metadata(&path).unwrap().permissions();
        assert_eq!(perms.mode() & 0o777, 0o600);
    }

    #[test]
    fn test_default_path_contains_gatekeeper() {
        let path = FileCredentialStore::default_path();
        let path = path.to_string_lossy();
        assert!(path.contains("gatekeeper"));
        assert!(path.ends_with("session.json"));
    }

    #[test]
    fn test_memory_store_roundtrip() {
        let store = MemoryCredentialStore::new();
        assert!(store.load().unwrap().is_none());

        store.save(&session()).unwrap();
        assert!(store.load().unwrap().is_some());

        store.delete().unwrap();
        assert!(store.load().unwrap().is_none());
    }
}
