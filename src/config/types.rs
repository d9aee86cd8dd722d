use crate::ladder::{default_ladder, Bitrate, LadderRung, ScaleAxis};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    /// Leave inputs whose output root already exists untouched.
    #[serde(default)]
    pub skip_existing: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("input"),
            output_dir: PathBuf::from("output"),
            skip_existing: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolsConfig {
    pub ffmpeg: String,
    pub ffprobe: String,
    /// Kill an encoder operation that runs longer than this. Unset means
    /// operations may run indefinitely.
    #[serde(default)]
    pub operation_timeout_seconds: Option<u64>,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            ffmpeg: "ffmpeg".to_string(),
            ffprobe: "ffprobe".to_string(),
            operation_timeout_seconds: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub show_timestamps: bool,
    pub colored_output: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            show_timestamps: true,
            colored_output: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressConfig {
    pub update_interval_ms: u64,
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl Default for ProgressConfig {
    fn default() -> Self {
        Self {
            update_interval_ms: 200,
            enabled: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HlsConfig {
    /// Target segment duration in seconds (`-hls_time`).
    pub segment_duration: u32,
    pub playlist_type: String,
    pub segment_type: String,
    pub segment_extension: String,
}

impl Default for HlsConfig {
    fn default() -> Self {
        Self {
            segment_duration: 4,
            playlist_type: "vod".to_string(),
            segment_type: "fmp4".to_string(),
            segment_extension: "m4s".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoConfig {
    pub codec: String,
    pub preset: String,
    /// Keyframe interval in frames; also used as the minimum interval.
    pub gop_size: u32,
    #[serde(default)]
    pub scale_axis: ScaleAxis,
    pub ladder: Vec<LadderRung>,
}

impl Default for VideoConfig {
    fn default() -> Self {
        Self {
            codec: "libsvtav1".to_string(),
            preset: "13".to_string(),
            gop_size: 48,
            scale_axis: ScaleAxis::Height,
            ladder: default_ladder(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioConfig {
    /// Codec used when a bit-exact copy of the source track fails.
    pub fallback_codec: String,
    pub fallback_bitrate: Bitrate,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            fallback_codec: "aac".to_string(),
            fallback_bitrate: Bitrate::from_kbps(128),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubtitleConfig {
    /// Image-based codecs that cannot become WebVTT.
    pub bitmap_codecs: Vec<String>,
}

impl Default for SubtitleConfig {
    fn default() -> Self {
        Self {
            bitmap_codecs: vec![
                "hdmv_pgs_subtitle".to_string(),
                "dvd_subtitle".to_string(),
                "dvb_subtitle".to_string(),
                "xsub".to_string(),
            ],
        }
    }
}

fn default_true() -> bool {
    true
}
