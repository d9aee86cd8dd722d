use crate::codec::{CodecPolicy, SubtitleDecision};
use crate::encoding::{OperationBuilder, OperationRunner};
use crate::progress::OperationOutcome;
use crate::rendition::{AudioRendition, SubtitleRendition};
use crate::stream::SourceStream;
use crate::utils::filesystem::{file_is_non_empty, OutputLayout};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Result of running one track through its strategy cascade.
#[derive(Debug, Clone, PartialEq)]
pub enum TrackOutcome<T> {
    Produced(T),
    /// Left out by policy before any operation ran.
    Skipped { reason: String },
    /// Every strategy was attempted and none produced a rendition.
    Failed { reason: String },
}

/// Intermediate file removed when the guard goes out of scope, whichever way
/// the cascade exits.
#[derive(Debug)]
pub struct ScratchFile {
    path: PathBuf,
}

impl ScratchFile {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for ScratchFile {
    fn drop(&mut self) {
        if self.path.exists() {
            if let Err(e) = std::fs::remove_file(&self.path) {
                debug!("Could not remove {}: {}", self.path.display(), e);
            }
        }
    }
}

pub fn audio_display_name(stream: &SourceStream, language: &str) -> String {
    if language == "und" {
        format!("Audio {}", stream.index)
    } else {
        format!("Audio {}", language)
    }
}

fn failure_reason(outcome: OperationOutcome) -> Option<String> {
    match outcome {
        OperationOutcome::Completed => None,
        OperationOutcome::Failed(failure) => Some(failure.reason),
    }
}

/// Runs audio and subtitle tracks through their cascades for one input.
pub struct TrackPackager<'a, R: OperationRunner + ?Sized> {
    runner: &'a R,
    policy: &'a CodecPolicy,
    builder: &'a OperationBuilder<'a>,
    layout: &'a OutputLayout,
    total_duration: f64,
}

impl<'a, R: OperationRunner + ?Sized> TrackPackager<'a, R> {
    pub fn new(
        runner: &'a R,
        policy: &'a CodecPolicy,
        builder: &'a OperationBuilder<'a>,
        layout: &'a OutputLayout,
        total_duration: f64,
    ) -> Self {
        Self {
            runner,
            policy,
            builder,
            layout,
            total_duration,
        }
    }

    /// Extract to SubRip (copy, then forced conversion if the copy produced
    /// nothing), then convert to WebVTT. The SubRip file never survives.
    pub async fn package_subtitle(&self, stream: &SourceStream) -> TrackOutcome<SubtitleRendition> {
        let extractions = match self.policy.subtitle_decision(stream) {
            SubtitleDecision::Skip { reason } => return TrackOutcome::Skipped { reason },
            SubtitleDecision::Extract(extractions) => extractions,
        };

        let target = self.layout.subtitle_track(
            stream.index,
            stream.language.as_deref(),
            stream.title.as_deref(),
        );
        let scratch = ScratchFile::new(target.intermediate.clone());

        let mut last_reason = String::from("no extraction strategy available");
        let mut extracted = false;

        for extraction in extractions {
            let operation = self
                .builder
                .subtitle_extract(stream.index, extraction, scratch.path());

            match failure_reason(self.runner.run(&operation, self.total_duration).await) {
                None if file_is_non_empty(scratch.path()) => {
                    debug!(
                        "Subtitle #{} extracted via {}",
                        stream.index,
                        extraction.as_str()
                    );
                    extracted = true;
                    break;
                }
                None => {
                    last_reason =
                        format!("{} extraction produced an empty file", extraction.as_str());
                }
                Some(reason) => {
                    last_reason = format!("{} extraction failed: {}", extraction.as_str(), reason);
                }
            }
            debug!("Subtitle #{}: {}", stream.index, last_reason);
        }

        if !extracted {
            return TrackOutcome::Failed {
                reason: last_reason,
            };
        }

        let convert = self.builder.subtitle_convert(scratch.path(), &target.output);
        if let Some(reason) = failure_reason(self.runner.run(&convert, self.total_duration).await) {
            return TrackOutcome::Failed {
                reason: format!("WebVTT conversion failed: {}", reason),
            };
        }
        if !file_is_non_empty(&target.output) {
            return TrackOutcome::Failed {
                reason: "WebVTT conversion produced no output".to_string(),
            };
        }

        TrackOutcome::Produced(SubtitleRendition {
            source_index: stream.index,
            output_path: target.output,
            language: stream.language.clone(),
            display_name: stream.title.clone().unwrap_or(target.stem),
        })
    }

    /// Tries each strategy from the codec policy in order; the first success
    /// becomes the rendition.
    pub async fn package_audio(&self, stream: &SourceStream) -> TrackOutcome<AudioRendition> {
        let language = stream.language.clone().unwrap_or_else(|| "und".to_string());
        let target = self.layout.audio_track(stream.index, &language);

        if let Err(e) = target.ensure_dir() {
            return TrackOutcome::Failed {
                reason: format!("cannot create {}: {}", target.dir.display(), e),
            };
        }

        let strategies = self.policy.audio_strategies(stream);
        let mut last_reason = String::from("no audio strategy available");

        for (attempt, strategy) in strategies.iter().enumerate() {
            let operation = self.builder.audio_rendition(stream.index, strategy, &target);

            match failure_reason(self.runner.run(&operation, self.total_duration).await) {
                None => {
                    return TrackOutcome::Produced(AudioRendition {
                        source_index: stream.index,
                        output_codec: strategy.codec_arg().to_string(),
                        output_bitrate: strategy.bitrate().cloned(),
                        playlist_path: target.playlist.clone(),
                        segment_pattern: target.segment_pattern.clone(),
                        display_name: audio_display_name(stream, &language),
                        language,
                        is_default: false,
                    });
                }
                Some(reason) => {
                    if let Some(next) = strategies.get(attempt + 1) {
                        warn!(
                            "Audio #{} {} failed, retrying with {}",
                            stream.index,
                            strategy.describe(),
                            next.describe()
                        );
                    }
                    last_reason = format!("{}: {}", strategy.describe(), reason);
                }
            }
        }

        TrackOutcome::Failed {
            reason: last_reason,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_scratch_file_removed_on_drop() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("sub_3.srt");
        std::fs::write(&path, "1\n00:00:01,000 --> 00:00:02,000\nHi\n").unwrap();

        {
            let scratch = ScratchFile::new(path.clone());
            assert!(scratch.path().exists());
        }
        assert!(!path.exists());

        // Missing file is not an error
        drop(ScratchFile::new(dir.path().join("never_written.srt")));
    }

    #[test]
    fn test_audio_display_name() {
        let mut stream = SourceStream {
            index: 4,
            kind: crate::stream::StreamKind::Audio,
            codec_name: "aac".to_string(),
            language: Some("ger".to_string()),
            title: None,
            width: None,
            height: None,
        };
        assert_eq!(audio_display_name(&stream, "ger"), "Audio ger");

        stream.language = None;
        assert_eq!(audio_display_name(&stream, "und"), "Audio 4");
    }
}
