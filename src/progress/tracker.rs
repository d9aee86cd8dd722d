use crate::config::ProgressConfig;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::{Duration, Instant};
use tracing::debug;

/// Fields of the encoder's `-progress` stream that carry elapsed media time.
/// Both are reported in microseconds despite the `_ms` name.
const ELAPSED_TIME_KEYS: &[&str] = &["out_time_us", "out_time_ms"];

const BAR_LENGTH: u64 = 10000;

/// Elapsed media time in seconds from one progress line, or `None` for lines
/// that carry no usable elapsed-time field (`N/A`, negative values, other keys).
pub fn parse_progress_line(line: &str) -> Option<f64> {
    let (key, value) = line.trim().split_once('=')?;
    if !ELAPSED_TIME_KEYS.contains(&key.trim()) {
        return None;
    }

    let micros: i64 = value.trim().parse().ok()?;
    if micros < 0 {
        return None;
    }

    Some(micros as f64 / 1_000_000.0)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressSnapshot {
    pub media_elapsed: f64,
    pub percent: f64,
    pub speed: f64,
    pub eta_seconds: f64,
}

impl ProgressSnapshot {
    /// Percentage is 0 when the total is unknown; ETA is 0 when no speed can
    /// be derived yet.
    pub fn estimate(media_elapsed: f64, total_duration: f64, wall_elapsed: f64) -> Self {
        let percent = if total_duration > 0.0 {
            (media_elapsed / total_duration * 100.0).clamp(0.0, 100.0)
        } else {
            0.0
        };

        let speed = if wall_elapsed > 0.0 {
            media_elapsed / wall_elapsed
        } else {
            0.0
        };

        let eta_seconds = if speed > 0.0 {
            ((total_duration - media_elapsed) / speed).max(0.0)
        } else {
            0.0
        };

        Self {
            media_elapsed,
            percent,
            speed,
            eta_seconds,
        }
    }
}

pub fn format_hms(seconds: f64) -> String {
    let total = seconds.max(0.0) as u64;
    format!("{:02}:{:02}:{:02}", total / 3600, (total % 3600) / 60, total % 60)
}

/// Minimum spacing between display refreshes.
#[derive(Debug, Clone)]
pub struct Throttle {
    interval: Duration,
    last: Option<Instant>,
}

impl Throttle {
    pub fn new(interval: Duration) -> Self {
        Self { interval, last: None }
    }

    pub fn ready(&mut self, now: Instant) -> bool {
        match self.last {
            Some(last) if now.duration_since(last) < self.interval => false,
            _ => {
                self.last = Some(now);
                true
            }
        }
    }
}

/// Display sink for one operation's progress. Every recognised line updates
/// the snapshot; only the bar redraw is throttled.
pub struct ProgressTracker {
    bar: ProgressBar,
    start_time: Instant,
    total_duration: f64,
    throttle: Throttle,
    latest: Option<ProgressSnapshot>,
}

impl ProgressTracker {
    pub fn new(description: &str, total_duration: f64, config: &ProgressConfig) -> Self {
        let bar = if config.enabled {
            ProgressBar::new(BAR_LENGTH)
        } else {
            ProgressBar::hidden()
        };

        let template = format!(
            "{}: [{{bar:40.cyan/blue}}] {{msg}}",
            description.replace('{', "(").replace('}', ")")
        );
        let style = ProgressStyle::with_template(&template)
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▉▊▋▌▍▎▏ ");
        bar.set_style(style);

        Self {
            bar,
            start_time: Instant::now(),
            total_duration,
            throttle: Throttle::new(Duration::from_millis(config.update_interval_ms)),
            latest: None,
        }
    }

    pub fn record(&mut self, media_elapsed: f64) -> ProgressSnapshot {
        let now = Instant::now();
        let wall = now.duration_since(self.start_time).as_secs_f64();
        let snapshot = ProgressSnapshot::estimate(media_elapsed, self.total_duration, wall);
        self.latest = Some(snapshot);

        if self.throttle.ready(now) {
            self.bar
                .set_position((snapshot.percent / 100.0 * BAR_LENGTH as f64) as u64);
            self.bar.set_message(format!(
                "{:5.1}% | {} elapsed | ETA {} | {:.2}x",
                snapshot.percent,
                format_hms(snapshot.media_elapsed),
                format_hms(snapshot.eta_seconds),
                snapshot.speed
            ));
        }

        snapshot
    }

    pub fn latest(&self) -> Option<ProgressSnapshot> {
        self.latest
    }

    pub fn finish_successfully(&self) {
        let elapsed = self.start_time.elapsed().as_secs_f64();
        self.bar.set_position(BAR_LENGTH);
        self.bar
            .finish_with_message(format!("done in {}", format_hms(elapsed)));
        debug!("Operation finished in {:.1} seconds", elapsed);
    }

    pub fn finish_with_error(&self, error: &str) {
        let elapsed = self.start_time.elapsed().as_secs_f64();
        self.bar.abandon_with_message(format!(
            "failed after {} - {}",
            format_hms(elapsed),
            error
        ));
    }
}
