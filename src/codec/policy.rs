use crate::config::{AudioConfig, Config, SubtitleConfig};
use crate::ladder::Bitrate;
use crate::stream::SourceStream;

/// Source audio codecs the decision table distinguishes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AudioCodec {
    Aac,
    Ac3,
    Eac3,
    TrueHd,
    Dts,
    Other(String),
}

impl AudioCodec {
    pub fn from_codec_name(name: &str) -> Self {
        let name = name.trim().to_lowercase();
        match name.as_str() {
            "aac" => Self::Aac,
            "ac3" => Self::Ac3,
            "eac3" => Self::Eac3,
            "truehd" => Self::TrueHd,
            "dts" | "dts-hd" | "dts_hd" | "dts_hd_ma" | "dts-ma" | "dtshd" => Self::Dts,
            _ => Self::Other(name),
        }
    }

    /// Codecs HLS players accept in fMP4 without re-encoding.
    pub fn is_hls_native(&self) -> bool {
        matches!(self, Self::Aac | Self::Ac3 | Self::Eac3)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AudioStrategy {
    Copy,
    Transcode { codec: String, bitrate: Bitrate },
}

impl AudioStrategy {
    fn eac3(kbps: u64) -> Self {
        Self::Transcode {
            codec: "eac3".to_string(),
            bitrate: Bitrate::from_kbps(kbps),
        }
    }

    /// Value for `-c:a`.
    pub fn codec_arg(&self) -> &str {
        match self {
            Self::Copy => "copy",
            Self::Transcode { codec, .. } => codec,
        }
    }

    pub fn bitrate(&self) -> Option<&Bitrate> {
        match self {
            Self::Copy => None,
            Self::Transcode { bitrate, .. } => Some(bitrate),
        }
    }

    pub fn is_copy(&self) -> bool {
        matches!(self, Self::Copy)
    }

    pub fn describe(&self) -> String {
        match self {
            Self::Copy => "copy".to_string(),
            Self::Transcode { codec, bitrate } => format!("{} @ {}", codec, bitrate),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubtitleKind {
    Text,
    Bitmap,
    /// Not in either list; extraction is attempted and the cascade decides.
    Unknown,
}

/// How the intermediate SubRip file is produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubtitleExtraction {
    /// `-c:s copy` into the intermediate container.
    Copy,
    /// `-c:s srt`, forcing a conversion.
    ForceSrt,
}

impl SubtitleExtraction {
    pub fn codec_arg(&self) -> &'static str {
        match self {
            Self::Copy => "copy",
            Self::ForceSrt => "srt",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Copy => "copy",
            Self::ForceSrt => "forced",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubtitleDecision {
    Skip { reason: String },
    /// Try each extraction in order, then convert the intermediate to WebVTT.
    Extract(Vec<SubtitleExtraction>),
}

const TEXT_SUBTITLE_CODECS: &[&str] = &[
    "subrip", "srt", "ass", "ssa", "webvtt", "mov_text", "text", "microdvd", "subviewer",
    "subviewer1", "sami", "realtext", "jacosub", "mpl2", "pjs", "vplayer", "stl",
];

/// Per-track encode decisions, built once from configuration.
#[derive(Debug, Clone)]
pub struct CodecPolicy {
    copy_fallback: AudioStrategy,
    bitmap_codecs: Vec<String>,
}

impl CodecPolicy {
    pub fn new(audio: &AudioConfig, subtitles: &SubtitleConfig) -> Self {
        Self {
            copy_fallback: AudioStrategy::Transcode {
                codec: audio.fallback_codec.clone(),
                bitrate: audio.fallback_bitrate.clone(),
            },
            bitmap_codecs: subtitles
                .bitmap_codecs
                .iter()
                .map(|c| c.trim().to_lowercase())
                .collect(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.audio, &config.subtitles)
    }

    pub fn audio_decision(&self, codec: &AudioCodec) -> AudioStrategy {
        match codec {
            c if c.is_hls_native() => AudioStrategy::Copy,
            AudioCodec::TrueHd => AudioStrategy::eac3(1536),
            AudioCodec::Dts => AudioStrategy::eac3(896),
            _ => AudioStrategy::eac3(640),
        }
    }

    /// Ordered strategies for one audio track. A failed copy gets exactly one
    /// retry with the fallback codec; a failed transcode drops the track.
    pub fn audio_strategies(&self, stream: &SourceStream) -> Vec<AudioStrategy> {
        let codec = AudioCodec::from_codec_name(&stream.codec_name);
        match self.audio_decision(&codec) {
            AudioStrategy::Copy => vec![AudioStrategy::Copy, self.copy_fallback.clone()],
            transcode => vec![transcode],
        }
    }

    pub fn subtitle_kind(&self, codec_name: &str) -> SubtitleKind {
        let codec = codec_name.trim().to_lowercase();
        if self.bitmap_codecs.iter().any(|b| *b == codec) {
            SubtitleKind::Bitmap
        } else if TEXT_SUBTITLE_CODECS.contains(&codec.as_str()) {
            SubtitleKind::Text
        } else {
            SubtitleKind::Unknown
        }
    }

    pub fn subtitle_decision(&self, stream: &SourceStream) -> SubtitleDecision {
        match self.subtitle_kind(&stream.codec_name) {
            SubtitleKind::Bitmap => SubtitleDecision::Skip {
                reason: format!(
                    "{} is bitmap-based and cannot be converted to text",
                    stream.codec_name
                ),
            },
            SubtitleKind::Text | SubtitleKind::Unknown => SubtitleDecision::Extract(vec![
                SubtitleExtraction::Copy,
                SubtitleExtraction::ForceSrt,
            ]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stream::StreamKind;

    fn policy() -> CodecPolicy {
        CodecPolicy::new(&AudioConfig::default(), &SubtitleConfig::default())
    }

    fn stream(kind: StreamKind, codec: &str) -> SourceStream {
        SourceStream {
            index: 1,
            kind,
            codec_name: codec.to_string(),
            language: None,
            title: None,
            width: None,
            height: None,
        }
    }

    #[test]
    fn test_audio_codec_normalization() {
        assert_eq!(AudioCodec::from_codec_name("AAC"), AudioCodec::Aac);
        assert_eq!(AudioCodec::from_codec_name(" EAC3 "), AudioCodec::Eac3);
        assert_eq!(AudioCodec::from_codec_name("TrueHD"), AudioCodec::TrueHd);
        assert_eq!(AudioCodec::from_codec_name("dts_hd_ma"), AudioCodec::Dts);
        assert_eq!(AudioCodec::from_codec_name("DTS-HD"), AudioCodec::Dts);
        assert_eq!(
            AudioCodec::from_codec_name("FLAC"),
            AudioCodec::Other("flac".to_string())
        );
        assert!(AudioCodec::Ac3.is_hls_native());
        assert!(!AudioCodec::Dts.is_hls_native());
    }

    #[test]
    fn test_audio_decision_table() {
        let policy = policy();

        for codec in ["aac", "ac3", "eac3"] {
            let decision = policy.audio_decision(&AudioCodec::from_codec_name(codec));
            assert_eq!(decision, AudioStrategy::Copy);
            assert!(decision.bitrate().is_none());
        }

        let truehd = policy.audio_decision(&AudioCodec::TrueHd);
        assert_eq!(truehd.codec_arg(), "eac3");
        assert_eq!(truehd.bitrate().unwrap().as_ffmpeg_arg(), "1536k");

        let dts = policy.audio_decision(&AudioCodec::Dts);
        assert_eq!(dts.describe(), "eac3 @ 896k");

        let flac = policy.audio_decision(&AudioCodec::Other("flac".to_string()));
        assert_eq!(flac.describe(), "eac3 @ 640k");
    }

    #[test]
    fn test_copy_gets_single_aac_retry() {
        let strategies = policy().audio_strategies(&stream(StreamKind::Audio, "ac3"));

        assert_eq!(strategies.len(), 2);
        assert!(strategies[0].is_copy());
        assert_eq!(strategies[1].describe(), "aac @ 128k");
    }

    #[test]
    fn test_transcode_has_no_retry() {
        let strategies = policy().audio_strategies(&stream(StreamKind::Audio, "truehd"));
        assert_eq!(strategies, vec![AudioStrategy::eac3(1536)]);
    }

    #[test]
    fn test_bitmap_subtitles_are_skipped() {
        let policy = policy();

        for codec in ["hdmv_pgs_subtitle", "dvd_subtitle", "DVB_SUBTITLE", "xsub"] {
            assert!(matches!(
                policy.subtitle_decision(&stream(StreamKind::Subtitle, codec)),
                SubtitleDecision::Skip { .. }
            ));
        }
    }

    #[test]
    fn test_text_subtitles_cascade_copy_then_force() {
        let policy = policy();

        assert_eq!(policy.subtitle_kind("subrip"), SubtitleKind::Text);
        assert_eq!(policy.subtitle_kind("ass"), SubtitleKind::Text);
        assert_eq!(policy.subtitle_kind("eia_608"), SubtitleKind::Unknown);

        assert_eq!(
            policy.subtitle_decision(&stream(StreamKind::Subtitle, "subrip")),
            SubtitleDecision::Extract(vec![SubtitleExtraction::Copy, SubtitleExtraction::ForceSrt])
        );
    }
}
