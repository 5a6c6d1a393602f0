//! Shared fixtures for playback integration tests

#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;
use tunes_core::Track;
use tunes_playback::{
    Generation, ManualClock, MemorySnapshotStore, PlayStatus, PlaybackConfig, PlaybackError,
    PlaybackManager, ResourceAdapter, ResourceEvent, ResourceEventKind, ResourceHandle, Result,
};

pub const START_MILLIS: i64 = 1_700_000_000_000;

/// Call recorded by a fake handle
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Play(Generation),
    Pause(Generation),
    Seek(Generation, f64),
    Volume(Generation, f32),
    Dispose(Generation),
}

/// How fake handles answer `play()`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PlayResponse {
    #[default]
    Started,
    Pending,
    Rejected,
}

#[derive(Debug, Default)]
struct AdapterState {
    live: usize,
    max_live: usize,
    created: Vec<(String, Generation)>,
    calls: Vec<Call>,
    play_response: PlayResponse,
    fail_create: bool,
    eager: bool,
}

/// Scripted resource adapter; clones share state with the handles it creates
#[derive(Debug, Clone, Default)]
pub struct FakeAdapter {
    state: Arc<Mutex<AdapterState>>,
}

impl FakeAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_play_response(&self, response: PlayResponse) {
        self.state.lock().unwrap().play_response = response;
    }

    pub fn set_fail_create(&self, fail: bool) {
        self.state.lock().unwrap().fail_create = fail;
    }

    pub fn set_eager(&self, eager: bool) {
        self.state.lock().unwrap().eager = eager;
    }

    /// Handles created and not yet disposed
    pub fn live_count(&self) -> usize {
        self.state.lock().unwrap().live
    }

    /// Highest number of simultaneously live handles ever observed
    pub fn max_live(&self) -> usize {
        self.state.lock().unwrap().max_live
    }

    pub fn created_count(&self) -> usize {
        self.state.lock().unwrap().created.len()
    }

    pub fn created_locators(&self) -> Vec<String> {
        self.state
            .lock()
            .unwrap()
            .created
            .iter()
            .map(|(locator, _)| locator.clone())
            .collect()
    }

    pub fn last_generation(&self) -> Generation {
        self.state
            .lock()
            .unwrap()
            .created
            .last()
            .map(|(_, generation)| *generation)
            .expect("no resource created yet")
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn last_call(&self) -> Option<Call> {
        self.state.lock().unwrap().calls.last().cloned()
    }

    pub fn clear_calls(&self) {
        self.state.lock().unwrap().calls.clear();
    }
}

impl ResourceAdapter for FakeAdapter {
    fn create(
        &mut self,
        source_locator: &str,
        generation: Generation,
    ) -> Result<Box<dyn ResourceHandle>> {
        let mut state = self.state.lock().unwrap();
        if state.fail_create {
            return Err(PlaybackError::load_failure(source_locator, "unsupported source"));
        }
        state.live += 1;
        state.max_live = state.max_live.max(state.live);
        state.created.push((source_locator.to_string(), generation));

        Ok(Box::new(FakeHandle {
            generation,
            disposed: false,
            eager: state.eager,
            state: Arc::clone(&self.state),
        }))
    }
}

struct FakeHandle {
    generation: Generation,
    disposed: bool,
    eager: bool,
    state: Arc<Mutex<AdapterState>>,
}

impl FakeHandle {
    fn record(&self, call: Call) {
        self.state.lock().unwrap().calls.push(call);
    }
}

impl ResourceHandle for FakeHandle {
    fn play(&mut self) -> Result<PlayStatus> {
        self.record(Call::Play(self.generation));
        match self.state.lock().unwrap().play_response {
            PlayResponse::Started => Ok(PlayStatus::Started),
            PlayResponse::Pending => Ok(PlayStatus::Pending),
            PlayResponse::Rejected => Err(PlaybackError::PlaybackRejected(
                "autoplay blocked".to_string(),
            )),
        }
    }

    fn pause(&mut self) {
        self.record(Call::Pause(self.generation));
    }

    fn seek(&mut self, time: f64) {
        self.record(Call::Seek(self.generation, time));
    }

    fn set_volume(&mut self, volume: f32) {
        self.record(Call::Volume(self.generation, volume));
    }

    fn dispose(&mut self) {
        assert!(!self.disposed, "handle {} disposed twice", self.generation);
        self.disposed = true;
        let mut state = self.state.lock().unwrap();
        state.live -= 1;
        state.calls.push(Call::Dispose(self.generation));
    }

    fn supports_eager_play(&self) -> bool {
        self.eager
    }
}

/// Manager wired to fakes, with handles to drive and inspect them
pub struct Harness {
    pub manager: PlaybackManager,
    pub adapter: FakeAdapter,
    pub store: MemorySnapshotStore,
    pub clock: ManualClock,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_config(PlaybackConfig::default())
    }

    pub fn with_config(config: PlaybackConfig) -> Self {
        Self::with_parts(config, MemorySnapshotStore::new(), ManualClock::new(START_MILLIS))
    }

    /// Fresh manager sharing an existing store and clock (a "reload")
    pub fn with_parts(
        config: PlaybackConfig,
        store: MemorySnapshotStore,
        clock: ManualClock,
    ) -> Self {
        let adapter = FakeAdapter::new();
        let manager = PlaybackManager::with_shuffle_seed(
            config,
            Box::new(adapter.clone()),
            Box::new(store.clone()),
            Arc::new(clock.clone()),
            42,
        );
        Self {
            manager,
            adapter,
            store,
            clock,
        }
    }

    /// Send an event as the most recently created handle
    pub fn send(&mut self, kind: ResourceEventKind) -> Result<()> {
        let generation = self.adapter.last_generation();
        self.manager
            .handle_resource_event(ResourceEvent::new(generation, kind))
    }

    pub fn loaded(&mut self, duration: f64) {
        self.send(ResourceEventKind::Loaded { duration }).unwrap();
    }

    pub fn progress(&mut self, time: f64) {
        self.send(ResourceEventKind::Progress { time }).unwrap();
    }

    /// Play `track` and let its resource finish loading
    pub fn play_loaded(&mut self, track: Track, duration: f64) {
        self.manager.play_track(track, None).unwrap();
        self.loaded(duration);
    }

    pub fn advance(&self, by: Duration) {
        self.clock.advance(by);
    }

    pub fn current_id(&self) -> Option<String> {
        self.manager
            .current_track()
            .map(|track| track.id.as_str().to_string())
    }
}

pub fn track(id: &str) -> Track {
    Track::new(id, format!("https://cdn.example.com/{}.mp3", id), format!("Track {}", id))
        .with_artist("Test Artist")
}

pub fn tracks(ids: &[&str]) -> Vec<Track> {
    ids.iter().map(|id| track(id)).collect()
}
