pub mod tracks;

pub use tracks::{ScratchFile, TrackOutcome, TrackPackager};

use crate::{
    codec::CodecPolicy,
    config::Config,
    encoding::{OperationBuilder, OperationRunner},
    ladder::LadderPlanner,
    manifest::ManifestWriter,
    progress::OperationOutcome,
    rendition::{assign_default_audio, AudioRendition, SubtitleRendition, VideoRendition},
    stream::StreamInventory,
    utils::{
        logging::{
            log_package_summary, log_rung_failed, log_rung_ok, log_track_failed, log_track_ok,
            log_track_skipped,
        },
        OutputLayout, Result,
    },
};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// What one input's run produced.
#[derive(Debug, Clone)]
pub struct PackageReport {
    pub input: PathBuf,
    pub output_root: PathBuf,
    pub manifest_path: PathBuf,
    pub audio: Vec<AudioRendition>,
    pub subtitles: Vec<SubtitleRendition>,
    pub video: Vec<VideoRendition>,
    pub skipped_tracks: usize,
    pub failed_tracks: usize,
    pub failed_rungs: Vec<String>,
    pub elapsed: Duration,
}

impl PackageReport {
    /// A package without any video variant is not playable.
    pub fn is_playable(&self) -> bool {
        !self.video.is_empty()
    }
}

/// Drives one input at a time from probe to finished master playlist.
pub struct HlsPackager<'a, R: OperationRunner + ?Sized> {
    config: &'a Config,
    runner: &'a R,
    policy: CodecPolicy,
    planner: LadderPlanner,
}

impl<'a, R: OperationRunner + ?Sized> HlsPackager<'a, R> {
    pub fn new(config: &'a Config, runner: &'a R) -> Self {
        Self {
            config,
            runner,
            policy: CodecPolicy::from_config(config),
            planner: LadderPlanner::new(config.video.scale_axis),
        }
    }

    pub fn output_layout(&self, input: &Path) -> OutputLayout {
        OutputLayout::for_input(
            &self.config.app.output_dir,
            input,
            &self.config.hls.segment_extension,
        )
    }

    /// True when `skip_existing` is on and this input's output root exists.
    pub fn should_skip(&self, input: &Path) -> bool {
        self.config.app.skip_existing && self.output_layout(input).root().exists()
    }

    /// Probe, inventory, subtitles, audio, manifest header, then the ladder.
    /// Errors returned here abort this input only; track and rung failures are
    /// recorded in the report instead.
    pub async fn package(&self, input: &Path) -> Result<PackageReport> {
        let start_time = Instant::now();
        debug!("Packaging {}", input.display());

        let probe = self.runner.probe(input).await?;
        let inventory = StreamInventory::classify(&probe.streams)?;
        let (source_width, source_height) = inventory.source_dimensions()?;
        let total_duration = probe.duration.unwrap_or(0.0);

        let layout = self.output_layout(input);
        layout.create_dirs()?;

        let builder = OperationBuilder::new(self.config, input);
        let tracks = TrackPackager::new(
            self.runner,
            &self.policy,
            &builder,
            &layout,
            total_duration,
        );

        let mut skipped_tracks = 0;
        let mut failed_tracks = 0;

        let mut subtitles = Vec::new();
        if !inventory.subtitle.is_empty() {
            info!("Packaging subtitle tracks ({})", inventory.subtitle.len());
        }
        for stream in &inventory.subtitle {
            match tracks.package_subtitle(stream).await {
                TrackOutcome::Produced(rendition) => {
                    log_track_ok("Subtitle", stream.index, &rendition.display_name);
                    subtitles.push(rendition);
                }
                TrackOutcome::Skipped { reason } => {
                    log_track_skipped("Subtitle", stream.index, &reason);
                    skipped_tracks += 1;
                }
                TrackOutcome::Failed { reason } => {
                    log_track_failed("Subtitle", stream.index, &reason);
                    failed_tracks += 1;
                }
            }
        }

        let mut audio = Vec::new();
        if !inventory.audio.is_empty() {
            info!("Packaging audio tracks ({})", inventory.audio.len());
        }
        for stream in &inventory.audio {
            match tracks.package_audio(stream).await {
                TrackOutcome::Produced(rendition) => {
                    let detail = match &rendition.output_bitrate {
                        Some(bitrate) => format!("{} @ {}", rendition.output_codec, bitrate),
                        None => rendition.output_codec.clone(),
                    };
                    log_track_ok("Audio", stream.index, &detail);
                    audio.push(rendition);
                }
                TrackOutcome::Skipped { reason } => {
                    log_track_skipped("Audio", stream.index, &reason);
                    skipped_tracks += 1;
                }
                TrackOutcome::Failed { reason } => {
                    log_track_failed("Audio", stream.index, &reason);
                    failed_tracks += 1;
                }
            }
        }
        assign_default_audio(&mut audio);

        info!("Writing master manifest");
        let mut manifest =
            ManifestWriter::write_header(layout.manifest_path(), &audio, &subtitles)?;

        let planned = self
            .planner
            .plan(&self.config.video.ladder, source_width, source_height);
        if planned.is_empty() {
            warn!(
                "No ladder rung fits the {}x{} source",
                source_width, source_height
            );
        } else {
            let labels: Vec<&str> = planned.iter().map(|p| p.label()).collect();
            info!("Encoding video ladder: {}", labels.join(", "));
        }

        let video_index = inventory.primary_video().index;
        let mut video = Vec::new();
        let mut failed_rungs = Vec::new();

        for rung in &planned {
            let target = layout.video_rung(rung.label());
            if let Err(e) = target.ensure_dir() {
                log_rung_failed(rung.label(), &e.to_string());
                failed_rungs.push(rung.label().to_string());
                continue;
            }

            let operation = builder.video_rung(video_index, rung, &target);
            match self.runner.run(&operation, total_duration).await {
                OperationOutcome::Completed => {
                    let rendition = VideoRendition {
                        label: rung.label().to_string(),
                        playlist_path: target.playlist,
                        bandwidth: rung.bitrate().bits_per_second(),
                        width: rung.output_width,
                        height: rung.output_height,
                    };
                    manifest.append_stream(&rendition)?;
                    log_rung_ok(&rendition.label, &rendition.resolution(), rendition.bandwidth);
                    video.push(rendition);
                }
                OperationOutcome::Failed(failure) => {
                    log_rung_failed(rung.label(), &failure.reason);
                    failed_rungs.push(rung.label().to_string());
                }
            }
        }

        let elapsed = start_time.elapsed();
        log_package_summary(
            layout.root(),
            audio.len(),
            subtitles.len(),
            video.len(),
            elapsed,
        );

        Ok(PackageReport {
            input: input.to_path_buf(),
            output_root: layout.root().to_path_buf(),
            manifest_path: manifest.path().to_path_buf(),
            audio,
            subtitles,
            video,
            skipped_tracks,
            failed_tracks,
            failed_rungs,
            elapsed,
        })
    }
}
