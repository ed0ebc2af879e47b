//! Command implementations
//!
//! Commands write to a caller-supplied writer so they can be tested without
//! capturing stdout.
use anyhow::Context;
use qasid_catalog::{nasheed_queue, reciter_queue, Nasheed, Reciter};
use qasid_core::{ProgressEntry, StorageUrlResolver, Track, TrackId};
use qasid_playback::{ClearOutcome, PlaybackConfig, ProgressStore};
use std::io::Write;
use std::path::Path;

/// `mm:ss`, or `h:mm:ss` past an hour
pub fn format_millis(millis: u64) -> String {
    let total = millis / 1_000;
    let (hours, minutes, seconds) = (total / 3_600, (total % 3_600) / 60, total % 60);
    if hours > 0 {
        format!("{hours}:{minutes:02}:{seconds:02}")
    } else {
        format!("{minutes}:{seconds:02}")
    }
}

fn describe(entry: &ProgressEntry, config: &PlaybackConfig) -> String {
    let percent = entry
        .percent()
        .map_or_else(|| "?".to_string(), |p| format!("{p}%"));
    let state = if entry.is_resumable_with_margin(config.resume_margin_ms) {
        "resumable"
    } else {
        "finished"
    };
    format!(
        "{} / {}  {percent}  {state}",
        format_millis(entry.position_ms),
        format_millis(entry.duration_ms)
    )
}

/// Print every saved progress entry
pub async fn list_progress(
    store: &ProgressStore,
    config: &PlaybackConfig,
    out: &mut impl Write,
) -> anyhow::Result<usize> {
    let map = store.load().await;
    if map.is_empty() {
        writeln!(out, "No saved progress")?;
        return Ok(0);
    }

    for (track_id, entry) in &map {
        writeln!(out, "{track_id}  {}", describe(entry, config))?;
    }
    Ok(map.len())
}

/// Remove the saved progress of one track
pub async fn clear_progress(
    store: &ProgressStore,
    track_id: &TrackId,
    out: &mut impl Write,
) -> anyhow::Result<bool> {
    match store.clear_entry(track_id).await {
        ClearOutcome::Missing => {
            writeln!(out, "No saved progress for {track_id}")?;
            Ok(false)
        }
        ClearOutcome::Cleared => {
            writeln!(out, "Cleared progress for {track_id}")?;
            Ok(true)
        }
        ClearOutcome::Failed => anyhow::bail!("Failed to persist progress"),
    }
}

/// Remove all saved progress
pub async fn reset_progress(store: &ProgressStore, out: &mut impl Write) -> anyhow::Result<()> {
    if !store.save(&Default::default()).await {
        anyhow::bail!("Failed to persist progress");
    }
    writeln!(out, "Cleared all saved progress")?;
    Ok(())
}

/// Resolve a storage path and print the URL
pub async fn resolve(
    resolver: &dyn StorageUrlResolver,
    path: &str,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let url = resolver.resolve(path).await?;
    writeln!(out, "{url}")?;
    Ok(())
}

fn print_queue(queue: &[Track], out: &mut impl Write) -> anyhow::Result<()> {
    for (index, track) in queue.iter().enumerate() {
        writeln!(
            out,
            "{:>3}. {}  {}  ({})  {}",
            index + 1,
            track.id,
            track.title,
            track.artist.as_deref().unwrap_or("-"),
            track.audio.as_str()
        )?;
    }
    Ok(())
}

/// Print the queue built from a reciter JSON document
pub fn reciter_queue_from_file(path: &Path, out: &mut impl Write) -> anyhow::Result<usize> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let reciter: Reciter = serde_json::from_str(&raw).context("Invalid reciter document")?;

    let queue = reciter_queue(&reciter);
    print_queue(&queue, out)?;
    Ok(queue.len())
}

/// Print the queue built from a JSON array of nasheed documents
pub fn nasheed_queue_from_file(path: &Path, out: &mut impl Write) -> anyhow::Result<usize> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let nasheeds: Vec<Nasheed> =
        serde_json::from_str(&raw).context("Invalid nasheed documents")?;

    let queue = nasheed_queue(&nasheeds);
    print_queue(&queue, out)?;
    Ok(queue.len())
}
