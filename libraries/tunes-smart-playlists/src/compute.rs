//! Pure candidate computations
//!
//! Each job's membership is a function of the play events (and, for
//! discovery, catalog data). No I/O happens here.

use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::{HashMap, HashSet};
use tunes_core::{PlayEvent, TrackId};

/// Distinct tracks, most recent play first
///
/// Events with identical `played_at` keep their input order.
pub fn recently_played(events: &[PlayEvent], limit: usize) -> Vec<TrackId> {
    let mut ordered: Vec<&PlayEvent> = events.iter().collect();
    ordered.sort_by(|a, b| b.played_at.cmp(&a.played_at));

    let mut seen = HashSet::new();
    ordered
        .into_iter()
        .filter(|event| seen.insert(&event.track_id))
        .map(|event| event.track_id.clone())
        .take(limit)
        .collect()
}

/// Tracks by play count, descending; ties by track id ascending
pub fn weekly_top(events: &[PlayEvent], limit: usize) -> Vec<TrackId> {
    ranked(events.iter().map(|event| &event.track_id), limit)
        .into_iter()
        .cloned()
        .collect()
}

/// Artists by play count, descending; ties by name ascending
///
/// Plays of tracks without a known artist are ignored.
pub fn top_artists(
    events: &[PlayEvent],
    artists: &HashMap<TrackId, String>,
    count: usize,
) -> Vec<String> {
    ranked(
        events.iter().filter_map(|event| artists.get(&event.track_id)),
        count,
    )
    .into_iter()
    .cloned()
    .collect()
}

/// Distinct track ids in first-seen order
pub fn distinct_tracks(events: &[PlayEvent]) -> Vec<TrackId> {
    let mut seen = HashSet::new();
    events
        .iter()
        .filter(|event| seen.insert(&event.track_id))
        .map(|event| event.track_id.clone())
        .collect()
}

/// Shuffle the candidates and keep at most `limit`
pub fn discover_weekly<R: Rng + ?Sized>(
    mut candidates: Vec<TrackId>,
    limit: usize,
    rng: &mut R,
) -> Vec<TrackId> {
    candidates.shuffle(rng);
    candidates.truncate(limit);
    candidates
}

fn ranked<'a, T>(items: impl Iterator<Item = &'a T>, limit: usize) -> Vec<&'a T>
where
    T: Ord + std::hash::Hash + 'a,
{
    let mut counts: HashMap<&T, usize> = HashMap::new();
    for item in items {
        *counts.entry(item).or_default() += 1;
    }

    let mut ranked: Vec<(&T, usize)> = counts.into_iter().collect();
    ranked.sort_by(|(a, a_count), (b, b_count)| b_count.cmp(a_count).then_with(|| a.cmp(b)));
    ranked.into_iter().take(limit).map(|(item, _)| item).collect()
}
