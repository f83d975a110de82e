//! Persistent session storage: the auth token and cached tenant record that
//! survive restarts. Both keys absent means logged out.

use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};

use crate::models::Tenant;

/// Token file name in the data directory
const TOKEN_FILE: &str = "auth_token";

/// Cached tenant file name in the data directory
const TENANT_FILE: &str = "current_tenant.json";

/// Key-value persistence for session state. Writes are last-write-wins and
/// atomic per key; there is no cross-key transaction - `initialize()` repairs
/// a half-written pair on the next load.
pub trait SessionStore: Send + Sync {
    fn token(&self) -> Option<String>;
    fn set_token(&self, token: &str) -> Result<()>;
    fn tenant(&self) -> Option<Tenant>;
    fn set_tenant(&self, tenant: &Tenant) -> Result<()>;

    /// Remove both keys. Clearing an already-empty store is a no-op.
    fn clear(&self) -> Result<()>;
}

/// Disk-backed store, one file per key under the given directory.
pub struct FileSessionStore {
    dir: PathBuf,
}

impl FileSessionStore {
    pub fn new(dir: PathBuf) -> Result<Self> {
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create session directory {}", dir.display()))?;
        Ok(Self { dir })
    }

    fn token_path(&self) -> PathBuf {
        self.dir.join(TOKEN_FILE)
    }

    fn tenant_path(&self) -> PathBuf {
        self.dir.join(TENANT_FILE)
    }

    /// Write via a sibling temp file and rename so a crash mid-write never
    /// leaves a torn value behind.
    fn write_atomic(&self, path: &PathBuf, contents: &str) -> Result<()> {
        let tmp = path.with_extension("tmp");
        std::fs::write(&tmp, contents)
            .with_context(|| format!("Failed to write {}", tmp.display()))?;
        std::fs::rename(&tmp, path)
            .with_context(|| format!("Failed to replace {}", path.display()))?;
        Ok(())
    }

    fn remove_if_present(path: &PathBuf) -> Result<()> {
        if path.exists() {
            std::fs::remove_file(path)
                .with_context(|| format!("Failed to remove {}", path.display()))?;
        }
        Ok(())
    }
}

impl SessionStore for FileSessionStore {
    fn token(&self) -> Option<String> {
        let raw = std::fs::read_to_string(self.token_path()).ok()?;
        let token = raw.trim().to_string();
        if token.is_empty() {
            None
        } else {
            Some(token)
        }
    }

    fn set_token(&self, token: &str) -> Result<()> {
        self.write_atomic(&self.token_path(), token)
    }

    fn tenant(&self) -> Option<Tenant> {
        let raw = std::fs::read_to_string(self.tenant_path()).ok()?;
        match serde_json::from_str(&raw) {
            Ok(tenant) => Some(tenant),
            Err(e) => {
                tracing::warn!(error = %e, "Discarding unparseable cached tenant");
                None
            }
        }
    }

    fn set_tenant(&self, tenant: &Tenant) -> Result<()> {
        let contents = serde_json::to_string_pretty(tenant)?;
        self.write_atomic(&self.tenant_path(), &contents)
    }

    fn clear(&self) -> Result<()> {
        Self::remove_if_present(&self.token_path())?;
        Self::remove_if_present(&self.tenant_path())?;
        Ok(())
    }
}

/// In-memory store for tests and embedded consumers with no disk.
#[derive(Default)]
pub struct MemorySessionStore {
    inner: Mutex<MemoryEntries>,
}

#[derive(Default)]
struct MemoryEntries {
    token: Option<String>,
    tenant: Option<Tenant>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySessionStore {
    fn token(&self) -> Option<String> {
        self.inner.lock().expect("session store poisoned").token.clone()
    }

    fn set_token(&self, token: &str) -> Result<()> {
        self.inner.lock().expect("session store poisoned").token = Some(token.to_string());
        Ok(())
    }

    fn tenant(&self) -> Option<Tenant> {
        self.inner.lock().expect("session store poisoned").tenant.clone()
    }

    fn set_tenant(&self, tenant: &Tenant) -> Result<()> {
        self.inner.lock().expect("session store poisoned").tenant = Some(tenant.clone());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        let mut entries = self.inner.lock().expect("session store poisoned");
        entries.token = None;
        entries.tenant = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_tenant() -> Tenant {
        serde_json::from_str(r#"{"name": "Acme", "email": "a@acme.com"}"#).unwrap()
    }

    #[test]
    fn file_store_round_trips_both_keys() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSessionStore::new(dir.path().to_path_buf()).unwrap();

        assert!(store.token().is_none());
        assert!(store.tenant().is_none());

        store.set_token("tok-123").unwrap();
        store.set_tenant(&sample_tenant()).unwrap();

        assert_eq!(store.token().as_deref(), Some("tok-123"));
        assert_eq!(store.tenant().unwrap().name, "Acme");

        // A second store over the same directory sees the same session
        let reopened = FileSessionStore::new(dir.path().to_path_buf()).unwrap();
        assert_eq!(reopened.token().as_deref(), Some("tok-123"));
    }

    #[test]
    fn clear_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSessionStore::new(dir.path().to_path_buf()).unwrap();

        store.set_token("tok").unwrap();
        store.set_tenant(&sample_tenant()).unwrap();

        store.clear().unwrap();
        store.clear().unwrap();

        assert!(store.token().is_none());
        assert!(store.tenant().is_none());
    }

    #[test]
    fn corrupt_tenant_reads_as_absent() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSessionStore::new(dir.path().to_path_buf()).unwrap();

        std::fs::write(dir.path().join(TENANT_FILE), "{not json").unwrap();
        assert!(store.tenant().is_none());
    }

    #[test]
    fn memory_store_clear_drops_both_keys() {
        let store = MemorySessionStore::new();
        store.set_token("t").unwrap();
        store.set_tenant(&sample_tenant()).unwrap();

        store.clear().unwrap();
        assert!(store.token().is_none());
        assert!(store.tenant().is_none());
    }
}
