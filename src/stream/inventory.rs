use super::probe::{SourceStream, StreamKind};
use crate::utils::{Error, Result};
use tracing::{info, warn};

/// Probed streams grouped by kind, each group in discovery order.
#[derive(Debug, Clone)]
pub struct StreamInventory {
    pub video: Vec<SourceStream>,
    pub audio: Vec<SourceStream>,
    pub subtitle: Vec<SourceStream>,
}

impl StreamInventory {
    pub fn classify(streams: &[SourceStream]) -> Result<Self> {
        let of_kind = |kind: StreamKind| -> Vec<SourceStream> {
            streams.iter().filter(|s| s.kind == kind).cloned().collect()
        };

        let inventory = Self {
            video: of_kind(StreamKind::Video),
            audio: of_kind(StreamKind::Audio),
            subtitle: of_kind(StreamKind::Subtitle),
        };

        if inventory.video.is_empty() {
            return Err(Error::NoVideoStream);
        }

        info!(
            "Stream analysis complete: {} video, {} audio, {} subtitle",
            inventory.video.len(),
            inventory.audio.len(),
            inventory.subtitle.len()
        );

        if inventory.audio.is_empty() {
            warn!("No audio streams found - package will be video-only");
        }

        Ok(inventory)
    }

    /// The stream the ladder is encoded from.
    pub fn primary_video(&self) -> &SourceStream {
        // classify() guarantees at least one video stream
        &self.video[0]
    }

    pub fn source_dimensions(&self) -> Result<(u32, u32)> {
        let video = self.primary_video();
        video.dimensions().ok_or_else(|| {
            Error::probe(format!(
                "Video stream {} has no usable dimensions",
                video.index
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stream(index: u32, kind: StreamKind, codec: &str) -> SourceStream {
        SourceStream {
            index,
            kind,
            codec_name: codec.to_string(),
            language: None,
            title: None,
            width: (kind == StreamKind::Video).then_some(1920),
            height: (kind == StreamKind::Video).then_some(1080),
        }
    }

    #[test]
    fn test_classify_preserves_discovery_order() {
        let streams = vec![
            stream(0, StreamKind::Video, "hevc"),
            stream(1, StreamKind::Audio, "truehd"),
            stream(2, StreamKind::Subtitle, "subrip"),
            stream(3, StreamKind::Audio, "aac"),
            stream(7, StreamKind::Subtitle, "ass"),
        ];

        let inventory = StreamInventory::classify(&streams).unwrap();

        let audio: Vec<u32> = inventory.audio.iter().map(|s| s.index).collect();
        let subs: Vec<u32> = inventory.subtitle.iter().map(|s| s.index).collect();
        assert_eq!(audio, vec![1, 3]);
        assert_eq!(subs, vec![2, 7]);
        assert_eq!(inventory.primary_video().index, 0);
        assert_eq!(inventory.source_dimensions().unwrap(), (1920, 1080));
    }

    #[test]
    fn test_classify_without_video_fails() {
        let streams = vec![
            stream(0, StreamKind::Audio, "aac"),
            stream(1, StreamKind::Subtitle, "subrip"),
        ];

        let err = StreamInventory::classify(&streams).unwrap_err();
        assert!(matches!(err, Error::NoVideoStream));
    }

    #[test]
    fn test_video_without_dimensions() {
        let mut video = stream(0, StreamKind::Video, "h264");
        video.width = None;

        let inventory = StreamInventory::classify(&[video]).unwrap();
        assert!(inventory.source_dimensions().is_err());
    }
}
