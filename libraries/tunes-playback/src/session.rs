//! Session state
//!
//! The continuous and discrete state of the single running session, and the
//! slot holding the (at most one) live resource handle.

use crate::resource::{Generation, ResourceHandle};
use crate::volume::Volume;
use tunes_core::Track;

/// Mutable state of the running session
///
/// `current_track == None` implies `is_playing == false` and an empty
/// resource slot.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub current_track: Option<Track>,
    pub is_playing: bool,

    /// Seconds into the current track
    pub current_time: f64,

    /// Seconds; the track's duration hint until the resource reports
    /// `Loaded`, authoritative from then on (0 when unknown)
    pub duration: f64,

    pub volume: Volume,

    /// Mirrors `current_time` but survives disposal of the handle
    pub last_known_time: f64,

    /// Epoch millis of the last persisted change
    pub last_activity_timestamp: Option<i64>,
}

impl Session {
    pub fn new(volume: Volume) -> Self {
        Self {
            current_track: None,
            is_playing: false,
            current_time: 0.0,
            duration: 0.0,
            volume,
            last_known_time: 0.0,
            last_activity_timestamp: None,
        }
    }

    /// Drop the track and reset the position; volume is kept
    pub(crate) fn clear_track(&mut self) {
        self.current_track = None;
        self.is_playing = false;
        self.current_time = 0.0;
        self.duration = 0.0;
        self.last_known_time = 0.0;
    }

    /// Mirror a new position into both time fields
    pub(crate) fn set_position(&mut self, time: f64) {
        self.current_time = time;
        self.last_known_time = time;
    }

    /// Clamp a requested position to `[0, duration]`
    ///
    /// With no duration (and no hint) only the lower bound applies.
    pub fn clamp_time(&self, time: f64) -> f64 {
        let time = if time.is_nan() { 0.0 } else { time.max(0.0) };
        if self.duration > 0.0 {
            time.min(self.duration)
        } else {
            time
        }
    }
}

/// A resource handle together with the generation it was created with
pub(crate) struct LiveHandle {
    pub generation: Generation,
    pub handle: Box<dyn ResourceHandle>,
}

/// Lifecycle of the single resource handle
#[derive(Default)]
pub(crate) enum ResourceSlot {
    #[default]
    Idle,
    Loading(LiveHandle),
    Ready(LiveHandle),
}

impl ResourceSlot {
    pub fn live_mut(&mut self) -> Option<&mut LiveHandle> {
        match self {
            ResourceSlot::Idle => None,
            ResourceSlot::Loading(live) | ResourceSlot::Ready(live) => Some(live),
        }
    }

    pub fn generation(&self) -> Option<Generation> {
        match self {
            ResourceSlot::Idle => None,
            ResourceSlot::Loading(live) | ResourceSlot::Ready(live) => Some(live.generation),
        }
    }

    pub fn is_live(&self) -> bool {
        !matches!(self, ResourceSlot::Idle)
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, ResourceSlot::Loading(_))
    }

    /// Move a loading handle to ready; no-op otherwise
    pub fn mark_ready(&mut self) {
        if !self.is_loading() {
            return;
        }
        if let ResourceSlot::Loading(live) = std::mem::take(self) {
            *self = ResourceSlot::Ready(live);
        }
    }

    /// Dispose the live handle (if any) and leave the slot idle
    pub fn dispose(&mut self) -> Option<Generation> {
        match std::mem::take(self) {
            ResourceSlot::Idle => None,
            ResourceSlot::Loading(mut live) | ResourceSlot::Ready(mut live) => {
                live.handle.dispose();
                Some(live.generation)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_respects_known_duration() {
        let mut session = Session::new(Volume::default());
        assert_eq!(session.clamp_time(-3.0), 0.0);
        assert_eq!(session.clamp_time(42.0), 42.0);

        session.duration = 30.0;
        assert_eq!(session.clamp_time(42.0), 30.0);
        assert_eq!(session.clamp_time(f64::NAN), 0.0);
    }

    #[test]
    fn clear_track_keeps_volume() {
        let mut session = Session::new(Volume::new(0.4));
        session.current_track = Some(Track::new("a", "/a.mp3", "A"));
        session.is_playing = true;
        session.set_position(12.0);

        session.clear_track();

        assert!(session.current_track.is_none());
        assert!(!session.is_playing);
        assert_eq!(session.last_known_time, 0.0);
        assert_eq!(session.volume.level(), 0.4);
    }
}
