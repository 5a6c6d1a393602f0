//! Queue manager
//!
//! Ordered track list with a current position, shuffle flag, repeat mode
//! and a single history stack of visited positions:
//!
//! ```text
//! tracks:   [A, B, C, D, E]
//! current:         ^ (2)
//! history:  [0, 4]         <- "previous" pops 4, then 0
//! ```
//!
//! Shuffle does not reorder `tracks`; it only changes how the next position
//! is chosen. Every advance (shuffled or sequential) pushes the prior position
//! onto the history, so `retreat` undoes exactly one step either way.

use crate::history::History;
use crate::shuffle::{pick_any_other, pick_unvisited};
use crate::types::RepeatMode;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashSet;
use tunes_core::Track;

/// Ordered playback queue
#[derive(Debug, Clone)]
pub struct Queue {
    tracks: Vec<Track>,

    /// `None` when the queue is empty or no position is selected
    current_index: Option<usize>,

    shuffle: bool,
    repeat: RepeatMode,
    history: History,

    /// History length when the current shuffle pass began
    pass_start: usize,

    rng: StdRng,
}

impl Queue {
    /// Create new empty queue
    pub fn new(history_size: usize) -> Self {
        Self::with_rng(history_size, StdRng::from_entropy())
    }

    /// Create a queue with a fixed shuffle seed
    pub fn with_seed(history_size: usize, seed: u64) -> Self {
        Self::with_rng(history_size, StdRng::seed_from_u64(seed))
    }

    fn with_rng(history_size: usize, rng: StdRng) -> Self {
        Self {
            tracks: Vec::new(),
            current_index: None,
            shuffle: false,
            repeat: RepeatMode::Off,
            history: History::new(history_size),
            pass_start: 0,
            rng,
        }
    }

    /// Replace the list and select `start_index`
    ///
    /// History is reset; shuffle and repeat are kept. An empty list leaves
    /// no position selected and `start_index` is ignored.
    ///
    /// # Errors
    /// Returns the offending index when it is outside a non-empty list.
    pub fn set_queue(&mut self, tracks: Vec<Track>, start_index: usize) -> Result<(), usize> {
        if !tracks.is_empty() && start_index >= tracks.len() {
            return Err(start_index);
        }

        self.current_index = if tracks.is_empty() {
            None
        } else {
            Some(start_index)
        };
        self.tracks = tracks;
        self.reset_history();
        Ok(())
    }

    /// Rehydrate from a snapshot; an out-of-range index is dropped
    pub fn restore(
        &mut self,
        tracks: Vec<Track>,
        current_index: Option<usize>,
        shuffle: bool,
        repeat: RepeatMode,
    ) {
        self.current_index = current_index.filter(|&index| index < tracks.len());
        self.tracks = tracks;
        self.shuffle = shuffle;
        self.repeat = repeat;
        self.reset_history();
    }

    /// Select the next track
    ///
    /// - `repeat == One`: the current track, position unchanged
    /// - shuffle: a random unvisited position of the current pass; once the
    ///   pass is exhausted, `repeat == All` starts a new pass and `Off` ends
    /// - sequential: `current + 1`, wrapping to 0 only with `repeat == All`
    ///
    /// Returns `None` (and leaves the position alone) when nothing follows.
    pub fn advance(&mut self) -> Option<Track> {
        if self.tracks.is_empty() {
            return None;
        }

        if self.repeat == RepeatMode::One {
            if let Some(track) = self.current() {
                return Some(track.clone());
            }
        }

        let next = if self.shuffle {
            self.next_shuffled()
        } else {
            self.next_sequential()
        }?;

        self.move_to(next);
        self.current().cloned()
    }

    fn next_sequential(&self) -> Option<usize> {
        match self.current_index {
            None => Some(0),
            Some(index) if index + 1 < self.tracks.len() => Some(index + 1),
            Some(_) if self.repeat == RepeatMode::All => Some(0),
            Some(_) => None,
        }
    }

    fn next_shuffled(&mut self) -> Option<usize> {
        let len = self.tracks.len();
        let visited: HashSet<usize> = self.history.since(self.pass_start).collect();

        if let Some(index) = pick_unvisited(len, self.current_index, &visited, &mut self.rng) {
            return Some(index);
        }

        if self.repeat != RepeatMode::All {
            return None;
        }

        // New pass: everything except the current track is eligible again
        self.pass_start = self.history.len() + 1;
        pick_any_other(len, self.current_index, &mut self.rng).or(self.current_index)
    }

    /// Step back
    ///
    /// Pops the history when it is non-empty, restoring exactly the position
    /// before the last advance. Otherwise moves to `current - 1`, wrapping to
    /// the last track only with `repeat == All`.
    ///
    /// Returns `None` when there is nowhere to go.
    pub fn retreat(&mut self) -> Option<Track> {
        if let Some(index) = self.history.pop() {
            self.pass_start = self.pass_start.min(self.history.len());
            self.current_index = Some(index);
            return self.current().cloned();
        }

        let index = self.current_index?;
        let previous = if index > 0 {
            index - 1
        } else if self.repeat == RepeatMode::All {
            self.tracks.len() - 1
        } else {
            return None;
        };

        self.current_index = Some(previous);
        self.current().cloned()
    }

    /// Jump straight to `index`, remembering the prior position
    pub fn skip_to(&mut self, index: usize) -> Option<Track> {
        if index >= self.tracks.len() {
            return None;
        }
        self.move_to(index);
        self.current().cloned()
    }

    /// Select `index` without touching the history
    ///
    /// Used to line the queue up with a track that started playing directly.
    pub fn align_to(&mut self, index: usize) -> bool {
        if index >= self.tracks.len() {
            return false;
        }
        self.current_index = Some(index);
        true
    }

    fn move_to(&mut self, index: usize) {
        if let Some(previous) = self.current_index {
            if self.history.push(previous) {
                self.pass_start = self.pass_start.saturating_sub(1);
            }
        }
        self.current_index = Some(index);
    }

    /// Flip shuffle; the history no longer describes the upcoming order
    pub fn toggle_shuffle(&mut self) -> bool {
        self.shuffle = !self.shuffle;
        self.reset_history();
        self.shuffle
    }

    /// `off -> all -> one -> off`
    pub fn cycle_repeat(&mut self) -> RepeatMode {
        self.repeat = self.repeat.cycle();
        self.repeat
    }

    pub fn set_repeat(&mut self, mode: RepeatMode) {
        self.repeat = mode;
    }

    /// Append without changing the current position
    pub fn enqueue(&mut self, track: Track) {
        self.tracks.push(track);
    }

    /// Remove the track at `index`
    ///
    /// Positions after it shift down. Removing at or before the current
    /// position moves the current position back by one (never below 0).
    pub fn remove(&mut self, index: usize) -> Option<Track> {
        if index >= self.tracks.len() {
            return None;
        }

        let removed = self.tracks.remove(index);
        self.history.remove_index(index);
        self.pass_start = self.pass_start.min(self.history.len());

        self.current_index = match self.current_index {
            _ if self.tracks.is_empty() => None,
            Some(current) if index <= current => Some(current.saturating_sub(1)),
            other => other,
        };

        Some(removed)
    }

    /// Forget the current position (tracks are kept)
    pub fn reset_position(&mut self) {
        self.current_index = None;
        self.reset_history();
    }

    /// Clear entire queue
    pub fn clear(&mut self) {
        self.tracks.clear();
        self.reset_position();
    }

    fn reset_history(&mut self) {
        self.history.clear();
        self.pass_start = 0;
    }

    /// Track at the current position
    pub fn current(&self) -> Option<&Track> {
        self.current_index.and_then(|index| self.tracks.get(index))
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current_index
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    /// First position holding the given track
    pub fn position_of(&self, track: &Track) -> Option<usize> {
        self.tracks.iter().position(|t| t.is_same_track(track))
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn shuffle(&self) -> bool {
        self.shuffle
    }

    pub fn repeat(&self) -> RepeatMode {
        self.repeat
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}

impl Default for Queue {
    fn default() -> Self {
        Self::new(1000)
    }
}
