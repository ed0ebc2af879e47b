//! Random selection for shuffle mode
//!
//! Shuffle does not reorder the queue; each advance picks a uniformly random
//! track other than the current one.

use qasid_core::Track;
use rand::seq::SliceRandom;
use rand::Rng;

/// Pick a random track from `queue` that is not at `current_index`
///
/// A single-track queue yields that track (it is the only candidate).
/// Returns `None` only for an empty queue.
pub fn pick_other<'a, R: Rng + ?Sized>(
    queue: &'a [Track],
    current_index: usize,
    rng: &mut R,
) -> Option<&'a Track> {
    if queue.len() <= 1 {
        return queue.first();
    }

    let candidates: Vec<&Track> = queue
        .iter()
        .enumerate()
        .filter(|(index, _)| *index != current_index)
        .map(|(_, track)| track)
        .collect();

    candidates.choose(rng).copied()
}
