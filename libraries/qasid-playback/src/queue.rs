//! Queue resolution
//!
//! Pure functions deciding which track follows or precedes the current one
//! under a repeat mode. The controller decides what to do with the result.

use crate::shuffle;
use qasid_core::{RepeatMode, Track, TrackId};
use rand::Rng;

/// Outcome of a next/previous lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Play this track
    Track(Track),
    /// Sequential playback ran past the last track
    EndOfQueue,
    /// Nothing to resolve: empty queue or current track not queued
    Unavailable,
}

impl Resolution {
    pub fn track(&self) -> Option<&Track> {
        match self {
            Self::Track(track) => Some(track),
            Self::EndOfQueue | Self::Unavailable => None,
        }
    }
}

fn position(queue: &[Track], current: &TrackId) -> Option<usize> {
    queue.iter().position(|track| &track.id == current)
}

/// Track after `current`
///
/// - sequential: the following track, or [`Resolution::EndOfQueue`] after the last
/// - shuffle: a random other track
/// - repeat-one: `current` itself
pub fn resolve_next<R: Rng + ?Sized>(
    queue: &[Track],
    current: &TrackId,
    mode: RepeatMode,
    rng: &mut R,
) -> Resolution {
    let Some(index) = position(queue, current) else {
        return Resolution::Unavailable;
    };

    match mode {
        RepeatMode::RepeatOne => Resolution::Track(queue[index].clone()),
        RepeatMode::Shuffle => shuffle::pick_other(queue, index, rng)
            .cloned()
            .map_or(Resolution::Unavailable, Resolution::Track),
        RepeatMode::Sequential => queue
            .get(index + 1)
            .cloned()
            .map_or(Resolution::EndOfQueue, Resolution::Track),
    }
}

/// Track before `current`
///
/// Sequential mode wraps from the first track to the last; shuffle and
/// repeat-one behave as in [`resolve_next`].
pub fn resolve_previous<R: Rng + ?Sized>(
    queue: &[Track],
    current: &TrackId,
    mode: RepeatMode,
    rng: &mut R,
) -> Resolution {
    let Some(index) = position(queue, current) else {
        return Resolution::Unavailable;
    };

    match mode {
        RepeatMode::RepeatOne => Resolution::Track(queue[index].clone()),
        RepeatMode::Shuffle => shuffle::pick_other(queue, index, rng)
            .cloned()
            .map_or(Resolution::Unavailable, Resolution::Track),
        RepeatMode::Sequential => {
            let previous = index.checked_sub(1).unwrap_or(queue.len() - 1);
            Resolution::Track(queue[previous].clone())
        }
    }
}
