use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Holder of the one session token shared by the request client and the
/// navigation guard.
///
/// Clones share the same register, so a `set` through any handle is seen by
/// every other handle on its next read. A persistent store also writes the
/// token to disk so the session survives a restart; disk errors are logged
/// and the in-memory value stays authoritative.
#[derive(Debug, Clone, Default)]
pub struct CredentialStore {
    inner: Arc<RwLock<Option<String>>>,
    path: Option<Arc<PathBuf>>,
}

#[derive(Debug, Serialize, Deserialize)]
struct SessionFile {
    token: String,
    saved_at: DateTime<Utc>,
}

impl CredentialStore {
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Store backed by `path`, seeded with whatever token an earlier process
    /// saved there.
    pub fn persistent(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let token = load_session(&path);
        Self {
            inner: Arc::new(RwLock::new(token)),
            path: Some(Arc::new(path)),
        }
    }

    /// `<config dir>/taskboard/session.json`, if the platform has a config dir.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("taskboard").join("session.json"))
    }

    pub fn get(&self) -> Option<String> {
        match self.inner.read() {
            Ok(token) => token.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn set(&self, token: impl Into<String>) {
        let token = token.into();
        let mut current = self.write();
        if let Some(path) = &self.path {
            save_session(path, &token);
        }
        *current = Some(token);
    }

    pub fn clear(&self) {
        let mut current = self.write();
        if let Some(path) = &self.path {
            remove_session(path);
        }
        *current = None;
    }

    /// Clear only if the stored token is still `expected`.
    ///
    /// Returns whether the token was cleared. A token set after `expected`
    /// was read is left in place.
    pub fn clear_if(&self, expected: &str) -> bool {
        let mut current = self.write();
        if current.as_deref() != Some(expected) {
            return false;
        }
        if let Some(path) = &self.path {
            remove_session(path);
        }
        *current = None;
        true
    }

    pub fn is_authenticated(&self) -> bool {
        self.get().is_some()
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Option<String>> {
        match self.inner.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

fn load_session(path: &Path) -> Option<String> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
        Err(e) => {
            warn!("Failed to read session file {}: {}", path.display(), e);
            return None;
        }
    };

    match serde_json::from_str::<SessionFile>(&raw) {
        Ok(session) => {
            debug!("Restored session saved at {}", session.saved_at);
            Some(session.token)
        }
        Err(e) => {
            warn!("Ignoring malformed session file {}: {}", path.display(), e);
            None
        }
    }
}

fn save_session(path: &Path, token: &str) {
    let session = SessionFile {
        token: token.to_string(),
        saved_at: Utc::now(),
    };

    if let Err(e) = write_session(path, &session) {
        warn!("Failed to persist session to {}: {}", path.display(), e);
    }
}

fn write_session(path: &Path, session: &SessionFile) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string(session)?;
    fs::write(path, json)
}

fn remove_session(path: &Path) {
    match fs::remove_file(path) {
        Ok(()) => {}
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => warn!("Failed to remove session file {}: {}", path.display(), e),
    }
}
