//! Key-value persistence and the debounced writer in front of it.
//!
//! State is stored as JSON strings under string keys. The concrete store is
//! a directory of files, but everything above it goes through the [`KvStore`]
//! trait so tests can substitute their own. Rapid layout churn is coalesced
//! by [`DebouncedWriter`]: each schedule replaces the pending value and
//! pushes the deadline out, and the host's event loop polls the writer.

use super::EditorState;
use anyhow::{Context, Result};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Storage key for a project's workspace document.
pub fn editor_state_key(project_id: &str) -> String {
    format!("editor-state/{project_id}")
}

/// String-keyed blob store.
pub trait KvStore: Send + Sync {
    /// Read a value. Missing keys are `Ok(None)`, not errors.
    fn read(&self, key: &str) -> Result<Option<String>>;
    fn write(&self, key: &str, value: &str) -> Result<()>;
}

/// Directory-backed store: one file per key, key sanitized into a file name.
pub struct FileKvStore {
    dir: PathBuf,
}

impl FileKvStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Per-user default location for the store.
    pub fn default_dir() -> Result<PathBuf> {
        let base = dirs::config_dir().context("no config directory on this platform")?;
        Ok(base.join("workdeck").join("state"))
    }

    fn path_for(&self, key: &str) -> PathBuf {
        let name: String = key
            .chars()
            .map(|c| if c.is_alphanumeric() || c == '-' || c == '.' { c } else { '_' })
            .collect();
        self.dir.join(format!("{name}.json"))
    }
}

impl KvStore for FileKvStore {
    fn read(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key);
        match std::fs::read_to_string(&path) {
            Ok(contents) if contents.trim().is_empty() => Ok(None),
            Ok(contents) => Ok(Some(contents)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => {
                Err(err).with_context(|| format!("failed to read {}", path.display()))
            }
        }
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("failed to create {}", self.dir.display()))?;
        let path = self.path_for(key);
        std::fs::write(&path, value)
            .with_context(|| format!("failed to write {}", path.display()))
    }
}

struct PendingWrite {
    key: String,
    value: String,
    due: Instant,
}

/// Deadline-based write coalescer. The host polls [`DebouncedWriter::poll`]
/// from its event loop; there is no timer thread.
pub struct DebouncedWriter {
    kv: Arc<dyn KvStore>,
    delay: Duration,
    pending: Option<PendingWrite>,
}

impl DebouncedWriter {
    pub fn new(kv: Arc<dyn KvStore>, delay: Duration) -> Self {
        Self {
            kv,
            delay,
            pending: None,
        }
    }

    /// Queue a write. A pending write for any key is replaced wholesale and
    /// the deadline restarts, so a burst of mutations lands as one write.
    pub fn schedule(&mut self, key: &str, value: String) {
        self.pending = Some(PendingWrite {
            key: key.to_string(),
            value,
            due: Instant::now() + self.delay,
        });
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Flush the pending write if its deadline has passed.
    pub fn poll(&mut self) -> Result<()> {
        self.poll_at(Instant::now())
    }

    /// Deadline check against an explicit clock, for tests.
    pub fn poll_at(&mut self, now: Instant) -> Result<()> {
        if self.pending.as_ref().is_some_and(|p| now >= p.due) {
            return self.flush();
        }
        Ok(())
    }

    /// Write the pending value immediately, regardless of its deadline.
    pub fn flush(&mut self) -> Result<()> {
        if let Some(pending) = self.pending.take() {
            self.kv.write(&pending.key, &pending.value)?;
            log::debug!("flushed pending write for {}", pending.key);
        }
        Ok(())
    }

    /// Bypass the queue entirely: drop any pending write and write `value`
    /// now. Used when leaving a project, where the outgoing state must be on
    /// disk before the incoming one loads.
    pub fn write_now(&mut self, key: &str, value: &str) -> Result<()> {
        self.pending = None;
        self.kv.write(key, value)
    }

    /// Drop the pending write without persisting it.
    pub fn discard(&mut self) {
        self.pending = None;
    }
}

/// Load and decode a persisted document. Every failure mode degrades to
/// `None`: a missing key, an unreadable store, or corrupt JSON all mean "no
/// saved state", with the failure logged.
pub fn load_editor_state(kv: &dyn KvStore, key: &str) -> Option<EditorState> {
    let raw = match kv.read(key) {
        Ok(raw) => raw?,
        Err(err) => {
            log::warn!("failed to read {key}: {err:#}");
            return None;
        }
    };
    match serde_json::from_str(&raw) {
        Ok(state) => Some(state),
        Err(err) => {
            log::warn!("discarding corrupt state under {key}: {err}");
            None
        }
    }
}

/// Encode and persist a document immediately.
pub fn save_editor_state(kv: &dyn KvStore, key: &str, state: &EditorState) -> Result<()> {
    let raw = serde_json::to_string(state).context("failed to encode editor state")?;
    kv.write(key, &raw)
}

/// Encode a document and queue it on the debounced writer.
pub fn schedule_editor_state(
    writer: &mut DebouncedWriter,
    key: &str,
    state: &EditorState,
) -> Result<()> {
    let raw = serde_json::to_string(state).context("failed to encode editor state")?;
    writer.schedule(key, raw);
    Ok(())
}
