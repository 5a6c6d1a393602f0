//! Playback resource adapter traits
//!
//! Abstracts the platform audio sink (an HTML media element, a native
//! player, ...). The manager owns the single live handle; events coming back
//! from the platform are tagged with the generation the handle was created
//! with, so events from a disposed handle can be recognised and dropped.

use crate::error::Result;
use std::fmt;

/// Creation counter identifying one resource handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Generation(u64);

impl Generation {
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn value(self) -> u64 {
        self.0
    }

    pub(crate) fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Outcome of asking a handle to start
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayStatus {
    /// Audio is running
    Started,

    /// The platform will answer later with `ResourceEventKind::PlayResolved`
    Pending,
}

/// Event reported by a resource handle
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceEvent {
    /// Generation of the handle that produced the event
    pub generation: Generation,
    pub kind: ResourceEventKind,
}

impl ResourceEvent {
    pub fn new(generation: Generation, kind: ResourceEventKind) -> Self {
        Self { generation, kind }
    }
}

/// Kinds of resource events
#[derive(Debug, Clone, PartialEq)]
pub enum ResourceEventKind {
    /// Metadata is available; `duration` is authoritative from here on
    Loaded { duration: f64 },

    /// Periodic position update
    Progress { time: f64 },

    /// Playback reached the end of the track
    Ended,

    /// The resource failed (bad locator, decode error, network)
    Error { reason: String },

    /// Data stopped arriving; playback may recover on its own
    Stalled,

    /// Late answer to a `play()` that returned `PlayStatus::Pending`
    PlayResolved {
        result: std::result::Result<(), String>,
    },
}

/// Controller for one track's live playback
pub trait ResourceHandle: Send {
    /// Request playback
    ///
    /// # Returns
    /// * `Ok(Started)` - audio is running
    /// * `Ok(Pending)` - outcome arrives later as `PlayResolved`
    /// * `Err(_)` - rejected immediately
    fn play(&mut self) -> Result<PlayStatus>;

    fn pause(&mut self);

    /// Move to `time` seconds from the start
    fn seek(&mut self, time: f64);

    /// Effective output gain in `[0, 1]` (already 0 when muted)
    fn set_volume(&mut self, volume: f32);

    /// Release the sink. No events from this handle are honored afterwards.
    fn dispose(&mut self);

    /// Whether `seek`/`play` may be issued before `Loaded` arrives
    fn supports_eager_play(&self) -> bool {
        false
    }
}

/// Factory for resource handles
pub trait ResourceAdapter: Send {
    /// Create a handle for `source_locator`
    ///
    /// Events produced by the handle must carry `generation`.
    ///
    /// # Errors
    /// Returns an error when the locator cannot be opened at all.
    fn create(
        &mut self,
        source_locator: &str,
        generation: Generation,
    ) -> Result<Box<dyn ResourceHandle>>;
}
