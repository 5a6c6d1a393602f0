//! Playback manager - core orchestration
//!
//! Owns the session, the queue, the single live resource handle and the
//! persistence gateway. Every public method is one serialized operation:
//! the host calls them in order from its UI thread, feeds resource events
//! through `handle_resource_event`, and calls `tick` from its timer loop.
//!
//! ```text
//! Idle ──play_track──> Loading ──Loaded──> Ready/Paused <──> Ready/Playing
//!   ^                     │                      │
//!   └──── Error / stop ───┴──────── Ended ───────┴──> Loading (next track)
//! ```

use crate::{
    clock::{duration_millis, Clock},
    error::{PlaybackError, Result},
    events::PlaybackEvent,
    persistence::{PersistenceGateway, SnapshotStore},
    queue::Queue,
    resource::{Generation, PlayStatus, ResourceAdapter, ResourceEvent, ResourceEventKind},
    session::{LiveHandle, ResourceSlot, Session},
    types::{PlaybackConfig, PlaybackState, RepeatMode},
    volume::Volume,
};
use std::sync::Arc;
use tracing::{debug, error, warn};
use tunes_core::Track;

const STALLED_MESSAGE: &str = "Audio playback stalled. Check your internet connection.";

/// Central playback management
///
/// Guarantees:
/// - at most one live resource handle; a new one is only created after the
///   previous one was disposed
/// - events from a disposed handle are ignored (generation mismatch)
/// - a late `play()` success never marks playback active after the listener
///   paused or stopped in the meantime
pub struct PlaybackManager {
    config: PlaybackConfig,

    // Resource
    adapter: Box<dyn ResourceAdapter>,
    slot: ResourceSlot,
    last_generation: Generation,

    // State
    session: Session,
    queue: Queue,

    /// What the listener asked for most recently (play vs pause)
    wants_playing: bool,

    /// A `play()` answered `Pending` and has not resolved yet
    play_pending: bool,

    /// Position to seek to once the loading handle reports `Loaded`
    pending_start: f64,

    /// Epoch millis at which a paused session is torn down
    idle_deadline: Option<i64>,

    last_error: Option<String>,

    // Persistence and time
    persistence: PersistenceGateway,
    clock: Arc<dyn Clock>,

    // Event queue for UI synchronization
    pending_events: Vec<PlaybackEvent>,
    reported_state: PlaybackState,
}

impl PlaybackManager {
    /// Create new playback manager
    pub fn new(
        config: PlaybackConfig,
        adapter: Box<dyn ResourceAdapter>,
        store: Box<dyn SnapshotStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let mut queue = Queue::new(config.history_size);
        Self::apply_queue_config(&mut queue, &config);
        Self::build(config, adapter, store, clock, queue)
    }

    /// Create a manager whose shuffle order is reproducible
    pub fn with_shuffle_seed(
        config: PlaybackConfig,
        adapter: Box<dyn ResourceAdapter>,
        store: Box<dyn SnapshotStore>,
        clock: Arc<dyn Clock>,
        seed: u64,
    ) -> Self {
        let mut queue = Queue::with_seed(config.history_size, seed);
        Self::apply_queue_config(&mut queue, &config);
        Self::build(config, adapter, store, clock, queue)
    }

    fn apply_queue_config(queue: &mut Queue, config: &PlaybackConfig) {
        queue.set_repeat(config.repeat);
        if config.shuffle {
            queue.toggle_shuffle();
        }
    }

    fn build(
        config: PlaybackConfig,
        adapter: Box<dyn ResourceAdapter>,
        store: Box<dyn SnapshotStore>,
        clock: Arc<dyn Clock>,
        queue: Queue,
    ) -> Self {
        let persistence =
            PersistenceGateway::new(store, Arc::clone(&clock), config.snapshot_expiry);
        Self {
            session: Session::new(Volume::new(config.initial_volume)),
            config,
            adapter,
            slot: ResourceSlot::Idle,
            last_generation: Generation::new(0),
            queue,
            wants_playing: false,
            play_pending: false,
            pending_start: 0.0,
            idle_deadline: None,
            last_error: None,
            persistence,
            clock,
            pending_events: Vec::new(),
            reported_state: PlaybackState::Idle,
        }
    }

    // ===== Startup =====

    /// Rehydrate from the stored snapshot, if a fresh one exists
    ///
    /// The restored session is paused and has no live handle; `resume()`
    /// creates one and continues from `last_known_time`.
    pub fn restore(&mut self) -> bool {
        let Some(snapshot) = self.persistence.load() else {
            return false;
        };

        let position = snapshot.queue.position();
        self.queue.restore(
            snapshot.queue.tracks,
            position,
            snapshot.queue.shuffle,
            snapshot.queue.repeat,
        );

        self.session.current_track = snapshot.current_track;
        self.session.is_playing = false;
        self.session.current_time = snapshot.current_time;
        self.session.duration = snapshot.duration;
        self.session.volume = Volume::with_mute(snapshot.volume, snapshot.is_muted);
        self.session.last_known_time = snapshot.last_known_time;
        self.session.last_activity_timestamp = Some(snapshot.saved_at_timestamp);

        if let Some(track) = self.session.current_track.clone() {
            debug!("Restored session for track {}", track.id);
            self.emit(PlaybackEvent::TrackChanged {
                track_id: track.id,
                previous_track_id: None,
            });
            self.start_idle_timer();
        }
        self.emit_queue_changed();
        self.emit_volume_changed();
        self.sync_state();
        true
    }

    // ===== Playback Control =====

    /// Play `track` from `start_at` seconds
    ///
    /// If `track` is already current and its handle is still live this is a
    /// resume: seek to `start_at` (or `last_known_time` when `None`) and play,
    /// without creating a new resource. Otherwise any existing handle is
    /// disposed first and a new one is created.
    pub fn play_track(&mut self, track: Track, start_at: Option<f64>) -> Result<()> {
        let is_current = self
            .session
            .current_track
            .as_ref()
            .is_some_and(|current| current.is_same_track(&track));

        let result = if is_current && self.slot.is_live() {
            let target = start_at.unwrap_or(self.session.last_known_time);
            self.cancel_idle_timer();
            self.seek_live(target);
            self.request_play()
        } else {
            self.load_track(track, start_at.unwrap_or(0.0))
        };

        self.after_change();
        result
    }

    fn load_track(&mut self, track: Track, start_at: f64) -> Result<()> {
        self.dispose_resource();
        self.cancel_idle_timer();

        let previous_track_id = self.session.current_track.take().map(|t| t.id);
        self.session.is_playing = false;
        self.session.current_time = 0.0;
        self.session.duration = track
            .known_duration_hint
            .filter(|hint| hint.is_finite() && *hint > 0.0)
            .unwrap_or(0.0);
        self.session.last_known_time = self.session.clamp_time(start_at);
        self.session.current_track = Some(track.clone());
        self.last_error = None;
        self.align_queue(&track);

        self.emit(PlaybackEvent::TrackChanged {
            track_id: track.id.clone(),
            previous_track_id,
        });

        let generation = self.last_generation.next();
        self.last_generation = generation;

        let mut handle = match self.adapter.create(&track.source_locator, generation) {
            Ok(handle) => handle,
            Err(e) => {
                let reason = match e {
                    PlaybackError::ResourceLoadFailure { reason, .. } => reason,
                    other => other.to_string(),
                };
                let err = PlaybackError::load_failure(&track.source_locator, reason);
                error!("Resource creation failed for track {}: {}", track.id, err);
                self.fail_session(&err);
                return Err(err);
            }
        };

        debug!("Created resource {} for track {}", generation, track.id);
        handle.set_volume(self.session.volume.gain());
        let eager = handle.supports_eager_play();
        self.slot = ResourceSlot::Loading(LiveHandle { generation, handle });

        self.wants_playing = true;
        self.pending_start = self.session.last_known_time;

        if eager {
            self.seek_live(self.pending_start);
            return self.request_play();
        }
        Ok(())
    }

    /// Line the queue position up with a track started directly
    fn align_queue(&mut self, track: &Track) {
        let already_current = self
            .queue
            .current()
            .is_some_and(|current| current.is_same_track(track));
        if !already_current {
            if let Some(index) = self.queue.position_of(track) {
                self.queue.align_to(index);
                self.emit_queue_changed();
            }
        }
    }

    /// Pause playback
    pub fn pause(&mut self) {
        self.wants_playing = false;
        if let Some(live) = self.slot.live_mut() {
            live.handle.pause();
        }

        if self.session.is_playing {
            self.session.is_playing = false;
            self.session.last_known_time = self.session.current_time;
        }
        if self.session.current_track.is_some() && self.idle_deadline.is_none() {
            self.start_idle_timer();
        }
        self.after_change();
    }

    /// Resume playback of the current track
    ///
    /// A restored session (no live handle yet) creates the resource and
    /// continues from `last_known_time`.
    pub fn resume(&mut self) -> Result<()> {
        let Some(track) = self.session.current_track.clone() else {
            return Err(PlaybackError::NoTrackLoaded);
        };

        self.cancel_idle_timer();
        let result = if self.slot.is_live() {
            self.request_play()
        } else {
            let start_at = self.session.last_known_time;
            self.load_track(track, start_at)
        };

        self.after_change();
        result
    }

    /// Stop playback
    ///
    /// Disposes the resource, clears the current track and position and
    /// deletes the snapshot. Queue contents and volume are kept.
    pub fn stop(&mut self) {
        self.clear_session();
        self.after_change();
    }

    fn clear_session(&mut self) {
        self.dispose_resource();
        self.cancel_idle_timer();
        self.wants_playing = false;
        self.pending_start = 0.0;
        self.session.clear_track();
        self.session.last_activity_timestamp = None;
        if self.queue.current_index().is_some() {
            self.queue.reset_position();
            self.emit_queue_changed();
        }
        self.persistence.clear();
    }

    /// Seek to `time` seconds, clamped to `[0, duration]`
    pub fn seek(&mut self, time: f64) -> Result<()> {
        if self.session.current_track.is_none() {
            return Err(PlaybackError::NoTrackLoaded);
        }
        self.seek_live(time);
        self.after_change();
        Ok(())
    }

    fn seek_live(&mut self, time: f64) {
        let time = self.session.clamp_time(time);
        match &mut self.slot {
            ResourceSlot::Ready(live) => live.handle.seek(time),
            ResourceSlot::Loading(live) => {
                if live.handle.supports_eager_play() {
                    live.handle.seek(time);
                }
                self.pending_start = time;
            }
            ResourceSlot::Idle => {}
        }
        self.session.set_position(time);
        self.emit_position_changed();
    }

    /// Set volume (clamped to 0.0-1.0); kept for later tracks
    pub fn set_volume(&mut self, volume: f32) {
        self.session.volume.set_level(volume);
        self.apply_volume();
    }

    pub fn toggle_mute(&mut self) -> bool {
        let muted = self.session.volume.toggle_mute();
        self.apply_volume();
        muted
    }

    fn apply_volume(&mut self) {
        let gain = self.session.volume.gain();
        if let Some(live) = self.slot.live_mut() {
            live.handle.set_volume(gain);
        }
        self.emit_volume_changed();
        self.after_change();
    }

    // ===== Transport =====

    /// Skip to the next track; stops at the end of the queue
    ///
    /// Returns the track now playing, if any.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Result<Option<Track>> {
        let advanced = self.queue.advance();
        self.emit_queue_changed();
        match advanced {
            Some(track) => {
                self.play_track(track.clone(), Some(0.0))?;
                Ok(Some(track))
            }
            None => {
                self.stop();
                Ok(None)
            }
        }
    }

    /// Go to the previous track
    ///
    /// Undoes the most recent advance exactly (shuffle jumps included),
    /// however far into the current track playback is. A no-op when the
    /// queue has nowhere to go back to.
    pub fn previous(&mut self) -> Result<()> {
        let Some(track) = self.queue.retreat() else {
            return Ok(());
        };
        self.emit_queue_changed();
        self.play_track(track, Some(0.0))
    }

    // ===== Queue =====

    /// Replace the queue without starting playback
    pub fn set_queue(&mut self, tracks: Vec<Track>, start_index: usize) -> Result<()> {
        self.queue
            .set_queue(tracks, start_index)
            .map_err(PlaybackError::IndexOutOfBounds)?;
        self.emit_queue_changed();
        self.after_change();
        Ok(())
    }

    /// Replace the queue and play from `start_index`
    pub fn set_queue_and_play(&mut self, tracks: Vec<Track>, start_index: usize) -> Result<()> {
        self.set_queue(tracks, start_index)?;
        let track = self.queue.current().cloned().ok_or(PlaybackError::QueueEmpty)?;
        self.play_track(track, Some(0.0))
    }

    /// Jump to the queue entry at `index` and play it
    pub fn play_queue_index(&mut self, index: usize) -> Result<()> {
        let track = self
            .queue
            .skip_to(index)
            .ok_or(PlaybackError::IndexOutOfBounds(index))?;
        self.emit_queue_changed();
        self.play_track(track, Some(0.0))
    }

    pub fn enqueue(&mut self, track: Track) {
        self.queue.enqueue(track);
        self.emit_queue_changed();
        self.after_change();
    }

    /// Remove a queue entry; the playing track keeps playing
    pub fn remove_from_queue(&mut self, index: usize) -> Result<Track> {
        let removed = self
            .queue
            .remove(index)
            .ok_or(PlaybackError::IndexOutOfBounds(index))?;
        self.emit_queue_changed();
        self.after_change();
        Ok(removed)
    }

    pub fn toggle_shuffle(&mut self) -> bool {
        let shuffle = self.queue.toggle_shuffle();
        self.emit_queue_changed();
        self.after_change();
        shuffle
    }

    pub fn cycle_repeat(&mut self) -> RepeatMode {
        let repeat = self.queue.cycle_repeat();
        self.emit_queue_changed();
        self.after_change();
        repeat
    }

    pub fn set_repeat(&mut self, mode: RepeatMode) {
        self.queue.set_repeat(mode);
        self.emit_queue_changed();
        self.after_change();
    }

    // ===== Resource events =====

    /// Apply an event reported by a resource handle
    ///
    /// Events from any handle other than the live one are ignored.
    ///
    /// # Errors
    /// - `ResourceLoadFailure` when the live resource reports an error
    /// - `PlaybackRejected` when starting playback after load is refused
    pub fn handle_resource_event(&mut self, event: ResourceEvent) -> Result<()> {
        if self.slot.generation() != Some(event.generation) {
            debug!(
                "Ignoring {:?} from stale resource {}",
                event.kind, event.generation
            );
            return Ok(());
        }

        let result = match event.kind {
            ResourceEventKind::Loaded { duration } => self.on_loaded(duration),
            ResourceEventKind::Progress { time } => {
                self.session.set_position(time.max(0.0));
                self.emit_position_changed();
                Ok(())
            }
            ResourceEventKind::Ended => self.on_ended(),
            ResourceEventKind::Error { reason } => Err(self.on_error(reason)),
            ResourceEventKind::Stalled => {
                warn!("Resource {} stalled", event.generation);
                self.surface_error(STALLED_MESSAGE.to_string());
                Ok(())
            }
            ResourceEventKind::PlayResolved { result } => self.on_play_resolved(result),
        };

        self.after_change();
        result
    }

    fn on_loaded(&mut self, duration: f64) -> Result<()> {
        if duration.is_finite() && duration > 0.0 {
            self.session.duration = duration;
        }

        if !self.slot.is_loading() {
            self.emit_position_changed();
            return Ok(());
        }

        let eager = self
            .slot
            .live_mut()
            .is_some_and(|live| live.handle.supports_eager_play());
        self.slot.mark_ready();

        if eager {
            self.emit_position_changed();
            return Ok(());
        }

        self.seek_live(self.pending_start);
        if self.wants_playing {
            self.request_play()
        } else {
            Ok(())
        }
    }

    fn on_ended(&mut self) -> Result<()> {
        self.session.is_playing = false;

        if self.queue.repeat() == RepeatMode::One {
            self.seek_live(0.0);
            return self.request_play();
        }

        let advanced = self.queue.advance();
        self.emit_queue_changed();
        match advanced {
            Some(track) => {
                let same = self
                    .session
                    .current_track
                    .as_ref()
                    .is_some_and(|current| current.is_same_track(&track));
                if same && self.slot.is_live() {
                    self.seek_live(0.0);
                    self.request_play()
                } else {
                    self.load_track(track, 0.0)
                }
            }
            None => {
                debug!("Queue finished; clearing session");
                self.clear_session();
                Ok(())
            }
        }
    }

    fn on_error(&mut self, reason: String) -> PlaybackError {
        let locator = self
            .session
            .current_track
            .as_ref()
            .map(|t| t.source_locator.clone())
            .unwrap_or_default();
        let err = PlaybackError::load_failure(locator, reason);
        error!("Playback resource failed: {}", err);
        self.fail_session(&err);
        err
    }

    fn on_play_resolved(&mut self, result: std::result::Result<(), String>) -> Result<()> {
        if !self.play_pending {
            return Ok(());
        }
        self.play_pending = false;

        match result {
            Ok(()) if self.wants_playing => {
                self.mark_playing();
                Ok(())
            }
            Ok(()) => {
                debug!("Late play success after pause; keeping playback paused");
                if let Some(live) = self.slot.live_mut() {
                    live.handle.pause();
                }
                Ok(())
            }
            Err(reason) if self.wants_playing => {
                Err(self.reject_play(PlaybackError::PlaybackRejected(reason)))
            }
            Err(reason) => {
                debug!("Late play rejection after pause ignored: {}", reason);
                Ok(())
            }
        }
    }

    // ===== Timers =====

    /// Fire due timers
    ///
    /// Returns `true` when the idle-expiry timer tore the session down.
    pub fn tick(&mut self) -> bool {
        let Some(deadline) = self.idle_deadline else {
            return false;
        };
        if self.clock.now_millis() < deadline {
            return false;
        }

        debug!("Idle expiry reached; clearing session and queue");
        self.clear_session();
        self.queue.clear();
        self.session.volume = Volume::new(self.config.initial_volume);
        self.last_error = None;
        self.emit(PlaybackEvent::SessionExpired);
        self.emit_queue_changed();
        self.emit_volume_changed();
        self.after_change();
        true
    }

    fn start_idle_timer(&mut self) {
        let deadline = self
            .clock
            .now_millis()
            .saturating_add(duration_millis(self.config.idle_expiry));
        self.idle_deadline = Some(deadline);
    }

    fn cancel_idle_timer(&mut self) {
        self.idle_deadline = None;
    }

    // ===== State Queries =====

    /// Get current playback state
    pub fn state(&self) -> PlaybackState {
        match &self.slot {
            ResourceSlot::Loading(_) => PlaybackState::Loading,
            ResourceSlot::Ready(_) if self.session.is_playing => PlaybackState::Playing,
            _ if self.session.current_track.is_some() => PlaybackState::Paused,
            _ => PlaybackState::Idle,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn queue(&self) -> &Queue {
        &self.queue
    }

    pub fn current_track(&self) -> Option<&Track> {
        self.session.current_track.as_ref()
    }

    pub fn is_playing(&self) -> bool {
        self.session.is_playing
    }

    /// Message of the last surfaced error, if not cleared since
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn clear_error(&mut self) {
        self.last_error = None;
    }

    /// Epoch millis at which the idle-expiry timer fires, if armed
    pub fn idle_deadline(&self) -> Option<i64> {
        self.idle_deadline
    }

    /// Generation of the live handle, if any
    pub fn live_generation(&self) -> Option<Generation> {
        self.slot.generation()
    }

    pub fn config(&self) -> &PlaybackConfig {
        &self.config
    }

    // ===== Events =====

    /// Take all queued events (oldest first)
    pub fn drain_events(&mut self) -> Vec<PlaybackEvent> {
        std::mem::take(&mut self.pending_events)
    }

    pub fn has_pending_events(&self) -> bool {
        !self.pending_events.is_empty()
    }

    // ===== Internal =====

    fn request_play(&mut self) -> Result<()> {
        self.wants_playing = true;
        let loading = self.slot.is_loading();
        let Some(live) = self.slot.live_mut() else {
            return Err(PlaybackError::NoTrackLoaded);
        };
        if loading && !live.handle.supports_eager_play() {
            // Played once Loaded arrives
            return Ok(());
        }

        match live.handle.play() {
            Ok(PlayStatus::Started) => {
                self.mark_playing();
                Ok(())
            }
            Ok(PlayStatus::Pending) => {
                self.play_pending = true;
                Ok(())
            }
            Err(e) => {
                let reason = match e {
                    PlaybackError::PlaybackRejected(reason) => reason,
                    other => other.to_string(),
                };
                Err(self.reject_play(PlaybackError::PlaybackRejected(reason)))
            }
        }
    }

    fn mark_playing(&mut self) {
        self.play_pending = false;
        self.session.is_playing = true;
        self.last_error = None;
        self.cancel_idle_timer();
    }

    /// Playback refused: stay paused, surface the error, arm the idle timer
    fn reject_play(&mut self, err: PlaybackError) -> PlaybackError {
        warn!("{}", err);
        self.play_pending = false;
        self.wants_playing = false;
        self.session.is_playing = false;
        self.surface_error(err.to_string());
        if self.session.current_track.is_some() {
            self.start_idle_timer();
        }
        err
    }

    /// Fatal resource failure: back to idle with the error surfaced
    fn fail_session(&mut self, err: &PlaybackError) {
        self.clear_session();
        self.surface_error(err.to_string());
    }

    fn surface_error(&mut self, message: String) {
        self.last_error = Some(message.clone());
        self.emit(PlaybackEvent::Error { message });
    }

    fn dispose_resource(&mut self) {
        if let Some(generation) = self.slot.dispose() {
            debug!("Disposed resource {}", generation);
        }
        self.play_pending = false;
    }

    /// Write-through persistence and state-change notification
    fn after_change(&mut self) {
        if self.session.current_track.is_some() {
            match self.persistence.save(&self.session, &self.queue) {
                Ok(saved_at) => self.session.last_activity_timestamp = Some(saved_at),
                Err(e) => warn!("{}", e),
            }
        }
        self.sync_state();
    }

    fn sync_state(&mut self) {
        let state = self.state();
        if state != self.reported_state {
            self.reported_state = state;
            self.emit(PlaybackEvent::StateChanged { state });
        }
    }

    fn emit(&mut self, event: PlaybackEvent) {
        self.pending_events.push(event);
    }

    fn emit_queue_changed(&mut self) {
        self.emit(PlaybackEvent::QueueChanged {
            length: self.queue.len(),
            current_index: self.queue.current_index(),
            shuffle: self.queue.shuffle(),
            repeat: self.queue.repeat(),
        });
    }

    fn emit_volume_changed(&mut self) {
        self.emit(PlaybackEvent::VolumeChanged {
            volume: self.session.volume.level(),
            is_muted: self.session.volume.is_muted(),
        });
    }

    fn emit_position_changed(&mut self) {
        self.emit(PlaybackEvent::PositionChanged {
            current_time: self.session.current_time,
            duration: self.session.duration,
        });
    }
}
