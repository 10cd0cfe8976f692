//! File-backed token store. Survives restarts.
//!
//! DESIGN
//! ======
//! One JSON document per state directory. Every mutation is a full
//! read-modify-write under a process-local mutex, written to a temporary
//! sibling and renamed into place so a crash never leaves a torn file.
//! Temp names carry the pid and a sequence number, so concurrent processes
//! never share one; a failed write removes its temp file.
//!
//! A missing file is an empty store. A corrupt or unreadable file is also
//! treated as empty (logged at warn) so a damaged session degrades to
//! "logged out" instead of blocking startup.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};

use super::{StoredCredentials, TokenStore};
use crate::error::StoreError;
use crate::net::types::{CredentialPair, UserProfile};

static TMP_SEQ: AtomicU64 = AtomicU64::new(0);

#[derive(Debug)]
pub struct FileTokenStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileTokenStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), write_lock: Mutex::new(()) }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> StoredCredentials {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return StoredCredentials::default(),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "session file unreadable; treating as logged out");
                return StoredCredentials::default();
            }
        };

        match serde_json::from_str(&raw) {
            Ok(creds) => creds,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "session file corrupt; treating as logged out");
                StoredCredentials::default()
            }
        }
    }

    fn write(&self, creds: &StoredCredentials) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let body = serde_json::to_vec_pretty(creds)?;
        let tmp = self.tmp_path();
        let written = write_synced(&tmp, &body).and_then(|()| fs::rename(&tmp, &self.path));
        if let Err(e) = written {
            match fs::remove_file(&tmp) {
                Err(cleanup) if cleanup.kind() != ErrorKind::NotFound => {
                    tracing::warn!(path = %tmp.display(), error = %cleanup, "failed to remove temporary session file");
                }
                _ => {}
            }
            return Err(StoreError::Io(e));
        }
        Ok(())
    }

    /// Sibling temp path, unique per process and per write.
    fn tmp_path(&self) -> PathBuf {
        let seq = TMP_SEQ.fetch_add(1, Ordering::Relaxed);
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(format!(".{}.{seq}.tmp", std::process::id()));
        self.path.with_file_name(name)
    }

    fn update(&self, apply: impl FnOnce(&mut StoredCredentials)) -> Result<(), StoreError> {
        let _lock = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut creds = self.read();
        apply(&mut creds);
        self.write(&creds)
    }
}

fn write_synced(path: &Path, body: &[u8]) -> std::io::Result<()> {
    let mut file = open_private(path)?;
    file.write_all(body)?;
    file.sync_all()
}

#[cfg(unix)]
fn open_private(path: &Path) -> std::io::Result<fs::File> {
    use std::os::unix::fs::OpenOptionsExt;
    fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)
}

#[cfg(not(unix))]
fn open_private(path: &Path) -> std::io::Result<fs::File> {
    fs::File::create(path)
}

impl TokenStore for FileTokenStore {
    fn get(&self) -> StoredCredentials {
        self.read()
    }

    fn set(&self, pair: &CredentialPair) -> Result<(), StoreError> {
        self.update(|creds| creds.apply_pair(pair))
    }

    fn set_user(&self, user: &UserProfile) -> Result<(), StoreError> {
        self.update(|creds| creds.user = Some(user.clone()))
    }

    fn clear(&self) -> Result<(), StoreError> {
        let _lock = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::Io(e)),
        }
    }
}

#[cfg(test)]
#[path = "file_test.rs"]
mod tests;
