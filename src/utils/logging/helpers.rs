//! Outcome lines for tracks, rungs and whole packages

use std::path::Path;
use std::time::Duration;

/// Logs a track that produced a rendition, e.g. `Audio #1 ready (copy)`
pub fn log_track_ok(kind: &str, index: u32, detail: &str) {
    tracing::info!("{} #{} ready ({})", kind, index, detail);
}

/// Logs a track left out by policy (bitmap subtitles and the like)
pub fn log_track_skipped(kind: &str, index: u32, reason: &str) {
    tracing::info!("{} #{} skipped: {}", kind, index, reason);
}

/// Logs a track dropped after every strategy failed
pub fn log_track_failed(kind: &str, index: u32, reason: &str) {
    tracing::warn!("{} #{} failed, track dropped", kind, index);
    tracing::warn!("  -> {}", reason);
}

pub fn log_rung_ok(label: &str, resolution: &str, bandwidth: u64) {
    tracing::info!("Rung {} ready ({}, {} bps)", label, resolution, bandwidth);
}

pub fn log_rung_failed(label: &str, reason: &str) {
    tracing::warn!("Rung {} failed, continuing with the next rung", label);
    tracing::warn!("  -> {}", reason);
}

pub fn log_package_summary(
    output_root: &Path,
    audio: usize,
    subtitles: usize,
    rungs: usize,
    elapsed: Duration,
) {
    tracing::info!(
        "Package complete: {} ({} audio, {} subtitle, {} video rendition(s) in {:.1}s)",
        output_root.display(),
        audio,
        subtitles,
        rungs,
        elapsed.as_secs_f64()
    );
}
