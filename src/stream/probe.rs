use crate::utils::{Error, Result};
use serde_json::Value;
use std::fmt;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StreamKind {
    Video,
    Audio,
    Subtitle,
}

impl StreamKind {
    pub fn from_codec_type(codec_type: &str) -> Option<Self> {
        match codec_type {
            "video" => Some(Self::Video),
            "audio" => Some(Self::Audio),
            "subtitle" => Some(Self::Subtitle),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Video => "video",
            Self::Audio => "audio",
            Self::Subtitle => "subtitle",
        }
    }
}

impl fmt::Display for StreamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One probed elementary stream. `index` is the container-global stream
/// index, which is what the encoder's `-map 0:<index>` selector expects.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceStream {
    pub index: u32,
    pub kind: StreamKind,
    pub codec_name: String,
    pub language: Option<String>,
    pub title: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

impl SourceStream {
    pub fn dimensions(&self) -> Option<(u32, u32)> {
        match (self.width, self.height) {
            (Some(w), Some(h)) if w > 0 && h > 0 => Some((w, h)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProbeResult {
    pub streams: Vec<SourceStream>,
    /// Container duration in seconds, when the prober reports one.
    pub duration: Option<f64>,
}

impl ProbeResult {
    /// Parses `ffprobe -print_format json -show_streams -show_format` output.
    pub fn from_ffprobe_json(output: &str) -> Result<Self> {
        let json: Value = serde_json::from_str(output)?;

        let stream_array = json["streams"]
            .as_array()
            .ok_or_else(|| Error::probe("No streams array in ffprobe output"))?;

        let mut streams = Vec::with_capacity(stream_array.len());

        for (position, stream) in stream_array.iter().enumerate() {
            let codec_type = stream["codec_type"].as_str().unwrap_or("unknown");
            let Some(kind) = StreamKind::from_codec_type(codec_type) else {
                debug!("Ignoring {} stream at position {}", codec_type, position);
                continue;
            };

            // Cover art is reported as a video stream with attached_pic set.
            if kind == StreamKind::Video
                && stream["disposition"]["attached_pic"].as_i64() == Some(1)
            {
                debug!("Ignoring attached picture stream at position {}", position);
                continue;
            }

            let Some(index) = stream["index"]
                .as_u64()
                .or_else(|| u64::try_from(position).ok())
                .and_then(|i| u32::try_from(i).ok())
            else {
                debug!("Ignoring stream at position {} with out-of-range index", position);
                continue;
            };

            let source = SourceStream {
                index,
                kind,
                codec_name: stream["codec_name"]
                    .as_str()
                    .unwrap_or("unknown")
                    .to_string(),
                language: tag(stream, "language"),
                title: tag(stream, "title"),
                width: dimension(&stream["width"]),
                height: dimension(&stream["height"]),
            };

            debug!(
                "Stream {}: {} ({}) - Lang: {:?}, Title: {:?}",
                source.index, source.kind, source.codec_name, source.language, source.title
            );
            streams.push(source);
        }

        let duration = json["format"]["duration"]
            .as_str()
            .and_then(|d| d.parse::<f64>().ok())
            .filter(|d| d.is_finite() && *d > 0.0);

        Ok(Self { streams, duration })
    }
}

/// Width or height in pixels; values that do not fit a `u32` count as absent.
fn dimension(value: &Value) -> Option<u32> {
    value.as_u64().and_then(|v| u32::try_from(v).ok())
}

fn tag(stream: &Value, name: &str) -> Option<String> {
    stream
        .get("tags")
        .and_then(|tags| tags.get(name))
        .and_then(|value| value.as_str())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "streams": [
            {"index": 0, "codec_type": "video", "codec_name": "h264", "width": 1920, "height": 1080},
            {"index": 1, "codec_type": "audio", "codec_name": "aac", "tags": {"language": "eng", "title": "Stereo"}},
            {"index": 2, "codec_type": "attachment", "codec_name": "ttf"},
            {"index": 4, "codec_type": "subtitle", "codec_name": "subrip", "tags": {"language": "fre"}},
            {"index": 5, "codec_type": "video", "codec_name": "mjpeg", "width": 600, "height": 600,
             "disposition": {"attached_pic": 1}}
        ],
        "format": {"duration": "5400.250000"}
    }"#;

    #[test]
    fn test_parse_ffprobe_output() {
        let probe = ProbeResult::from_ffprobe_json(SAMPLE).unwrap();

        assert_eq!(probe.streams.len(), 3);
        assert_eq!(probe.duration, Some(5400.25));

        let video = &probe.streams[0];
        assert_eq!(video.kind, StreamKind::Video);
        assert_eq!(video.dimensions(), Some((1920, 1080)));

        let audio = &probe.streams[1];
        assert_eq!(audio.language.as_deref(), Some("eng"));
        assert_eq!(audio.title.as_deref(), Some("Stereo"));

        // Global index is preserved even when it is not contiguous
        assert_eq!(probe.streams[2].index, 4);
        assert_eq!(probe.streams[2].kind, StreamKind::Subtitle);
    }

    #[test]
    fn test_missing_duration_is_none() {
        let probe = ProbeResult::from_ffprobe_json(r#"{"streams": [], "format": {}}"#).unwrap();
        assert!(probe.streams.is_empty());
        assert_eq!(probe.duration, None);
    }

    #[test]
    fn test_missing_streams_is_probe_error() {
        let err = ProbeResult::from_ffprobe_json(r#"{"format": {}}"#).unwrap_err();
        assert!(matches!(err, Error::Probe { .. }));
    }

    #[test]
    fn test_out_of_range_values_are_not_truncated() {
        let json = r#"{
            "streams": [
                {"index": 0, "codec_type": "video", "codec_name": "h264",
                 "width": 4294968216, "height": 1080},
                {"index": 4294967297, "codec_type": "audio", "codec_name": "aac"}
            ]
        }"#;
        let probe = ProbeResult::from_ffprobe_json(json).unwrap();

        assert_eq!(probe.streams.len(), 1);
        assert_eq!(probe.streams[0].width, None);
        assert_eq!(probe.streams[0].height, Some(1080));
        assert_eq!(probe.streams[0].dimensions(), None);
    }

    #[test]
    fn test_invalid_json() {
        assert!(ProbeResult::from_ffprobe_json("not json").is_err());
    }
}
