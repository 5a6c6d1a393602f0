//! Snapshot persistence
//!
//! The session and queue are written through to a key-value store after every
//! meaningful change while a track is loaded, and read back once at startup.
//! Snapshots older than the expiry window are discarded instead of restored,
//! and a restored session never starts playing on its own.

use crate::clock::{duration_millis, Clock};
use crate::error::{PlaybackError, Result};
use crate::queue::Queue;
use crate::session::Session;
use crate::types::RepeatMode;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::{debug, warn};
use tunes_core::Track;

/// Serialized session + queue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub current_track: Option<Track>,

    /// Ignored on load; a restored session is always paused
    pub is_playing: bool,

    pub current_time: f64,
    pub duration: f64,
    pub volume: f32,
    pub is_muted: bool,
    pub last_known_time: f64,
    pub queue: QueueSnapshot,

    /// Epoch millis
    pub saved_at_timestamp: i64,
}

/// Serialized queue; `current_index` is -1 when no position is selected
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueSnapshot {
    pub tracks: Vec<Track>,
    pub current_index: i64,
    pub shuffle: bool,
    pub repeat: RepeatMode,
}

impl Snapshot {
    /// Capture the current state
    pub fn capture(session: &Session, queue: &Queue, saved_at_timestamp: i64) -> Self {
        Self {
            current_track: session.current_track.clone(),
            is_playing: session.is_playing,
            current_time: session.current_time,
            duration: session.duration,
            volume: session.volume.level(),
            is_muted: session.volume.is_muted(),
            last_known_time: session.last_known_time,
            queue: QueueSnapshot {
                tracks: queue.tracks().to_vec(),
                current_index: queue
                    .current_index()
                    .and_then(|index| i64::try_from(index).ok())
                    .unwrap_or(-1),
                shuffle: queue.shuffle(),
                repeat: queue.repeat(),
            },
            saved_at_timestamp,
        }
    }
}

impl QueueSnapshot {
    /// `current_index` as a position, `None` for -1 (or any negative value)
    pub fn position(&self) -> Option<usize> {
        usize::try_from(self.current_index).ok()
    }
}

/// Key-value slot holding one serialized snapshot
///
/// Implementations may be shared with other processes (e.g. other tabs);
/// last writer wins.
pub trait SnapshotStore: Send {
    /// Read the stored blob, `None` when nothing is stored
    fn read(&self) -> Result<Option<String>>;

    fn write(&mut self, blob: &str) -> Result<()>;

    /// Delete the stored blob; deleting nothing is not an error
    fn delete(&mut self) -> Result<()>;
}

/// In-memory snapshot store; clones share the same slot
#[derive(Debug, Clone, Default)]
pub struct MemorySnapshotStore {
    inner: Arc<Mutex<MemorySlot>>,
}

#[derive(Debug, Default)]
struct MemorySlot {
    blob: Option<String>,
    fail_writes: bool,
}

impl MemorySnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current contents of the slot
    pub fn contents(&self) -> Option<String> {
        self.lock().ok().and_then(|slot| slot.blob.clone())
    }

    /// Overwrite the slot directly
    pub fn put(&self, blob: impl Into<String>) {
        if let Ok(mut slot) = self.lock() {
            slot.blob = Some(blob.into());
        }
    }

    /// Make subsequent writes fail (simulates a full or unavailable store)
    pub fn set_fail_writes(&self, fail: bool) {
        if let Ok(mut slot) = self.lock() {
            slot.fail_writes = fail;
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, MemorySlot>> {
        self.inner
            .lock()
            .map_err(|_| PlaybackError::PersistenceWriteFailure("store lock poisoned".into()))
    }
}

impl SnapshotStore for MemorySnapshotStore {
    fn read(&self) -> Result<Option<String>> {
        Ok(self.lock()?.blob.clone())
    }

    fn write(&mut self, blob: &str) -> Result<()> {
        let mut slot = self.lock()?;
        if slot.fail_writes {
            return Err(PlaybackError::PersistenceWriteFailure(
                "store rejected write".into(),
            ));
        }
        slot.blob = Some(blob.to_string());
        Ok(())
    }

    fn delete(&mut self) -> Result<()> {
        self.lock()?.blob = None;
        Ok(())
    }
}

/// Snapshot stored as a JSON file
///
/// Writes go to a sibling temp file that is renamed over the target, so a
/// crash mid-write leaves the previous snapshot intact.
#[derive(Debug, Clone)]
pub struct JsonFileSnapshotStore {
    path: PathBuf,
}

impl JsonFileSnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl SnapshotStore for JsonFileSnapshotStore {
    fn read(&self) -> Result<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(blob) => Ok(Some(blob)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&mut self, blob: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let temp = self.temp_path();
        fs::write(&temp, blob)?;
        fs::rename(&temp, &self.path)?;
        Ok(())
    }

    fn delete(&mut self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Reads, writes and expires session snapshots
pub struct PersistenceGateway {
    store: Box<dyn SnapshotStore>,
    clock: Arc<dyn Clock>,
    expiry: Duration,
}

impl PersistenceGateway {
    pub fn new(store: Box<dyn SnapshotStore>, clock: Arc<dyn Clock>, expiry: Duration) -> Self {
        Self {
            store,
            clock,
            expiry,
        }
    }

    /// Write a snapshot stamped with the current time
    ///
    /// Returns the timestamp written. Callers treat failure as non-fatal.
    pub fn save(&mut self, session: &Session, queue: &Queue) -> Result<i64> {
        let now = self.clock.now_millis();
        let snapshot = Snapshot::capture(session, queue, now);
        let blob = serde_json::to_string(&snapshot)
            .map_err(|e| PlaybackError::PersistenceWriteFailure(e.to_string()))?;

        self.store.write(&blob).map_err(|e| match e {
            PlaybackError::PersistenceWriteFailure(_) => e,
            other => PlaybackError::PersistenceWriteFailure(other.to_string()),
        })?;
        Ok(now)
    }

    /// Read the stored snapshot once at startup
    ///
    /// Returns `None` when nothing is stored, when the snapshot is older than
    /// the expiry window, or when it cannot be decoded. Expired and corrupt
    /// snapshots are deleted. A returned snapshot always has `is_playing` off.
    pub fn load(&mut self) -> Option<Snapshot> {
        let blob = match self.store.read() {
            Ok(Some(blob)) => blob,
            Ok(None) => return None,
            Err(e) => {
                warn!("Could not read playback snapshot, starting empty: {}", e);
                return None;
            }
        };

        let mut snapshot: Snapshot = match serde_json::from_str(&blob) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                let err = PlaybackError::PersistenceReadCorrupt(e.to_string());
                warn!("{}; discarding", err);
                self.clear();
                return None;
            }
        };

        let Some(age) = self
            .clock
            .now_millis()
            .checked_sub(snapshot.saved_at_timestamp)
        else {
            let err = PlaybackError::PersistenceReadCorrupt(format!(
                "timestamp {} out of range",
                snapshot.saved_at_timestamp
            ));
            warn!("{}; discarding", err);
            self.clear();
            return None;
        };
        if age > duration_millis(self.expiry) {
            debug!("Playback snapshot expired ({} ms old); discarding", age);
            self.clear();
            return None;
        }

        snapshot.is_playing = false;
        Some(snapshot)
    }

    /// Delete the stored snapshot
    pub fn clear(&mut self) {
        if let Err(e) = self.store.delete() {
            warn!("Failed to delete playback snapshot: {}", e);
        }
    }
}
