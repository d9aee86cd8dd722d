use crate::config::ToolsConfig;
use crate::stream::ProbeResult;
use crate::utils::{Error, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;
use std::process::Stdio;
use tokio::process::{Child, Command as TokioCommand};
use tracing::debug;

static DURATION_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"Duration: (\d{2}):(\d{2}):(\d{2})\.(\d{2})").expect("valid duration regex")
});

/// Flags placed before every encoder operation: machine-readable progress on
/// stdout, no interactive stats, overwrite outputs.
const ENCODER_GLOBAL_ARGS: &[&str] = &["-hide_banner", "-nostats", "-progress", "pipe:1", "-y"];

#[derive(Debug, Clone)]
pub struct FfmpegWrapper {
    ffmpeg_path: String,
    ffprobe_path: String,
}

impl FfmpegWrapper {
    pub fn new(ffmpeg_path: String, ffprobe_path: String) -> Self {
        Self {
            ffmpeg_path,
            ffprobe_path,
        }
    }

    pub fn from_config(tools: &ToolsConfig) -> Self {
        Self::new(tools.ffmpeg.clone(), tools.ffprobe.clone())
    }

    pub async fn check_availability(&self) -> Result<()> {
        for (name, path) in [("FFmpeg", &self.ffmpeg_path), ("FFprobe", &self.ffprobe_path)] {
            let check = TokioCommand::new(path)
                .arg("-version")
                .stdin(Stdio::null())
                .output()
                .await
                .map_err(|e| Error::ffmpeg(format!("{} not found at '{}': {}", name, path, e)))?;

            if !check.status.success() {
                return Err(Error::ffmpeg(format!(
                    "{} is not available or not executable",
                    name
                )));
            }
        }

        Ok(())
    }

    pub async fn probe<P: AsRef<Path>>(&self, input_path: P) -> Result<ProbeResult> {
        let input_path = input_path.as_ref();
        let input = input_path.to_string_lossy();

        debug!("Probing {}", input_path.display());

        let output = TokioCommand::new(&self.ffprobe_path)
            .args([
                "-v",
                "quiet",
                "-print_format",
                "json",
                "-show_streams",
                "-show_format",
                &input,
            ])
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| Error::probe(format!("Failed to run ffprobe: {}", e)))?;

        if !output.status.success() {
            let error_msg = String::from_utf8_lossy(&output.stderr);
            return Err(Error::probe(format!(
                "ffprobe failed on {}: {}",
                input_path.display(),
                error_msg.trim()
            )));
        }

        let json_output = String::from_utf8_lossy(&output.stdout);
        let mut result = ProbeResult::from_ffprobe_json(&json_output)
            .map_err(|e| Error::probe(format!("Failed to parse ffprobe output: {}", e)))?;

        if result.duration.is_none() {
            debug!("Duration not found in JSON, attempting banner fallback");
            result.duration = self.duration_from_banner(&input).await;
        }

        Ok(result)
    }

    /// Reads the `Duration:` line ffprobe prints in its default banner.
    async fn duration_from_banner(&self, input: &str) -> Option<f64> {
        let output = TokioCommand::new(&self.ffprobe_path)
            .args(["-hide_banner", input])
            .stdin(Stdio::null())
            .output()
            .await
            .ok()?;

        parse_duration_text(&String::from_utf8_lossy(&output.stderr))
    }

    /// Spawns the encoder with piped stdout/stderr. The child is killed if the
    /// handle is dropped.
    pub fn spawn_ffmpeg(&self, args: &[String]) -> Result<Child> {
        debug!("Running: {} {}", self.ffmpeg_path, args.join(" "));

        let child = TokioCommand::new(&self.ffmpeg_path)
            .args(ENCODER_GLOBAL_ARGS)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()?;

        Ok(child)
    }
}

pub fn parse_duration_text(text: &str) -> Option<f64> {
    let captures = DURATION_REGEX.captures(text)?;
    let hours: f64 = captures[1].parse().ok()?;
    let minutes: f64 = captures[2].parse().ok()?;
    let seconds: f64 = captures[3].parse().ok()?;
    let centiseconds: f64 = captures[4].parse().ok()?;

    let total = hours * 3600.0 + minutes * 60.0 + seconds + centiseconds / 100.0;
    (total > 0.0).then_some(total)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_duration_text() {
        let banner = "Input #0, matroska,webm, from 'movie.mkv':\n  Duration: 01:42:07.52, start: 0.000000, bitrate: 9000 kb/s";
        assert_eq!(parse_duration_text(banner), Some(6127.52));
        assert_eq!(parse_duration_text("Duration: N/A, bitrate: N/A"), None);
        assert_eq!(parse_duration_text("Duration: 00:00:00.00"), None);
    }

    #[tokio::test]
    async fn test_missing_tools_are_reported() {
        let ffmpeg = FfmpegWrapper::new(
            "/nonexistent/ffmpeg".to_string(),
            "/nonexistent/ffprobe".to_string(),
        );

        assert!(matches!(
            ffmpeg.check_availability().await,
            Err(Error::Ffmpeg { .. })
        ));
        assert!(matches!(
            ffmpeg.probe("/tmp/input.mkv").await,
            Err(Error::Probe { .. })
        ));
    }
}
