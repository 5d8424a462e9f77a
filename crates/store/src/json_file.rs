//! File-based lead store: the whole lead history as one JSON array.
//!
//! Layout: `[ {name, company, email, role, use_case, team_size, timeline, timestamp}, ... ]`
//! with unset fields written as `null`, indented for humans.
//!
//! Every commit is a read-modify-write of the full array. Commits on the same
//! file are serialized twice: through one async mutex per path inside the
//! process, then through an advisory lock on the sibling `<file>.lock` across
//! processes (each `leadline bridge` is its own process). The new array is
//! written to a temporary sibling and renamed over the old file, so readers
//! only ever see a complete array.
//!
//! Storage location: `~/.leadline/leads_db.json`

use async_trait::async_trait;
use fs4::fs_std::FileExt;
use leadline_core::error::StoreError;
use leadline_core::lead::{LeadProfile, LeadRecord};
use leadline_core::store::LeadStore;
use once_cell::sync::Lazy;
use serde::Serialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::time::Instant;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// One guard per store file, shared by every handle on that file in this process.
static PATH_GUARDS: Lazy<std::sync::Mutex<HashMap<PathBuf, Arc<Mutex<()>>>>> =
    Lazy::new(|| std::sync::Mutex::new(HashMap::new()));

const DEFAULT_LOCK_TIMEOUT: Duration = Duration::from_secs(5);
const LOCK_RETRY_INTERVAL: Duration = Duration::from_millis(10);

/// Holds the cross-process lock until dropped. Closing the file releases it too.
struct FileLock {
    file: std::fs::File,
}

impl Drop for FileLock {
    fn drop(&mut self) {
        let _ = FileExt::unlock(&self.file);
    }
}

/// A JSON-array lead store backed by a single file.
pub struct JsonFileLeadStore {
    path: PathBuf,
    guard: Arc<Mutex<()>>,
    lock_timeout: Duration,
}

impl JsonFileLeadStore {
    /// Open a store at the given path.
    ///
    /// The file does not need to exist; it is created on the first commit.
    pub fn new(path: PathBuf) -> Self {
        let guard = guard_for(&path);
        debug!(path = %path.display(), "JSON lead store opened");
        Self {
            path,
            guard,
            lock_timeout: DEFAULT_LOCK_TIMEOUT,
        }
    }

    /// Bound how long a commit waits for exclusive access.
    pub fn with_lock_timeout(mut self, timeout: Duration) -> Self {
        self.lock_timeout = timeout;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read and parse the file. A missing or blank file is an empty store;
    /// anything else that is not a record array (including bytes that are not
    /// UTF-8) is malformed.
    async fn read_records(&self) -> Result<Vec<LeadRecord>, StoreError> {
        let content = match tokio::fs::read(&self.path).await {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(StoreError::Persistence {
                    path: self.path.clone(),
                    reason: format!("Failed to read lead store: {e}"),
                });
            }
        };

        if content.iter().all(u8::is_ascii_whitespace) {
            return Ok(Vec::new());
        }

        serde_json::from_slice(&content).map_err(|e| StoreError::MalformedData {
            path: self.path.clone(),
            reason: e.to_string(),
        })
    }

    async fn ensure_parent_dir(&self) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| self.persistence(format!("Failed to create store directory: {e}")))?;
        }
        Ok(())
    }

    fn lock_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".lock");
        self.path.with_file_name(name)
    }

    /// Take the advisory lock on `<file>.lock`, polling until `deadline`.
    async fn lock_file(&self, deadline: Instant) -> Result<FileLock, StoreError> {
        let lock_path = self.lock_path();
        let file = tokio::fs::OpenOptions::new()
            .create(true)
            .truncate(false)
            .read(true)
            .write(true)
            .open(&lock_path)
            .await
            .map_err(|e| self.persistence(format!("Failed to open {}: {e}", lock_path.display())))?
            .into_std()
            .await;

        loop {
            match FileExt::try_lock_exclusive(&file) {
                Ok(true) => return Ok(FileLock { file }),
                Ok(false) => {}
                Err(e) => {
                    return Err(self.persistence(format!(
                        "Failed to lock {}: {e}",
                        lock_path.display()
                    )));
                }
            }
            if Instant::now() >= deadline {
                return Err(self.lock_timeout_error());
            }
            tokio::time::sleep(LOCK_RETRY_INTERVAL).await;
        }
    }

    fn lock_timeout_error(&self) -> StoreError {
        StoreError::LockTimeout {
            path: self.path.clone(),
            waited_ms: self.lock_timeout.as_millis() as u64,
        }
    }

    /// Replace the file with the full record array.
    async fn write_records(&self, records: &[LeadRecord]) -> Result<(), StoreError> {
        let payload = encode(records)
            .map_err(|e| self.persistence(format!("Failed to serialize lead records: {e}")))?;

        let temp_path = self
            .path
            .with_extension(format!("{}.tmp", Uuid::new_v4().simple()));

        if let Err(e) = write_synced(&temp_path, &payload).await {
            let _ = tokio::fs::remove_file(&temp_path).await;
            return Err(self.persistence(format!("Failed to write lead store: {e}")));
        }

        if let Err(e) = tokio::fs::rename(&temp_path, &self.path).await {
            let _ = tokio::fs::remove_file(&temp_path).await;
            return Err(self.persistence(format!("Failed to replace lead store: {e}")));
        }

        Ok(())
    }

    fn persistence(&self, reason: String) -> StoreError {
        StoreError::Persistence {
            path: self.path.clone(),
            reason,
        }
    }
}

#[async_trait]
impl LeadStore for JsonFileLeadStore {
    fn name(&self) -> &str {
        "json_file"
    }

    async fn load(&self) -> Result<Vec<LeadRecord>, StoreError> {
        self.read_records().await
    }

    async fn commit(&self, profile: &LeadProfile) -> Result<LeadRecord, StoreError> {
        let deadline = Instant::now() + self.lock_timeout;

        let _guard = tokio::time::timeout_at(deadline, self.guard.lock())
            .await
            .map_err(|_| self.lock_timeout_error())?;
        self.ensure_parent_dir().await?;
        let _file_lock = self.lock_file(deadline).await?;

        // Stamped under both locks so file order and timestamp order agree.
        let record = LeadRecord::snapshot(profile);

        let mut records = match self.read_records().await {
            Ok(records) => records,
            Err(e) if e.is_malformed() => {
                warn!(error = %e, "Discarding unreadable lead store contents and starting a new one");
                Vec::new()
            }
            Err(e) => return Err(e),
        };

        records.push(record.clone());
        self.write_records(&records).await?;

        info!(
            path = %self.path.display(),
            total = records.len(),
            qualified = record.profile.is_qualified(),
            "Lead committed"
        );
        Ok(record)
    }
}

/// Look up (or create) the guard for a path. Relative and absolute spellings of
/// the same file share a guard.
fn guard_for(path: &Path) -> Arc<Mutex<()>> {
    let key = canonical_key(path);
    let mut guards = PATH_GUARDS.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    guards.entry(key).or_default().clone()
}

fn canonical_key(path: &Path) -> PathBuf {
    let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
    match (
        absolute.parent().and_then(|p| p.canonicalize().ok()),
        absolute.file_name(),
    ) {
        (Some(dir), Some(name)) => dir.join(name),
        _ => absolute,
    }
}

/// Pretty JSON with four-space indentation.
fn encode(records: &[LeadRecord]) -> Result<Vec<u8>, serde_json::Error> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    records.serialize(&mut serializer)?;
    buf.push(b'\n');
    Ok(buf)
}

async fn write_synced(path: &Path, payload: &[u8]) -> std::io::Result<()> {
    let mut file = tokio::fs::File::create(path).await?;
    file.write_all(payload).await?;
    file.sync_all().await?;
    Ok(())
}
