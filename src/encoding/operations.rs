use crate::codec::{AudioStrategy, SubtitleExtraction};
use crate::config::Config;
use crate::ladder::PlannedRung;
use crate::utils::filesystem::HlsTarget;
use std::fmt;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationKind {
    Audio,
    SubtitleExtract,
    SubtitleConvert,
    Video,
}

impl OperationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Audio => "audio",
            Self::SubtitleExtract => "subtitle extract",
            Self::SubtitleConvert => "subtitle convert",
            Self::Video => "video",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One encoder invocation. `args` holds everything after the encoder's global
/// flags; the runner adds progress reporting and overwrite flags itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodeOperation {
    pub kind: OperationKind,
    pub label: String,
    pub args: Vec<String>,
    pub output: PathBuf,
}

impl EncodeOperation {
    pub fn command_line(&self) -> String {
        self.args.join(" ")
    }
}

pub struct OperationBuilder<'a> {
    config: &'a Config,
    input: &'a Path,
}

impl<'a> OperationBuilder<'a> {
    pub fn new(config: &'a Config, input: &'a Path) -> Self {
        Self { config, input }
    }

    fn input_args(&self, source: &Path) -> Vec<String> {
        vec!["-i".to_string(), source.to_string_lossy().into_owned()]
    }

    fn map_args(stream_index: u32) -> Vec<String> {
        vec!["-map".to_string(), format!("0:{}", stream_index)]
    }

    /// HLS muxer flags shared by audio and video renditions.
    pub fn hls_args(&self, target: &HlsTarget) -> Vec<String> {
        let hls = &self.config.hls;
        vec![
            "-f".to_string(),
            "hls".to_string(),
            "-hls_time".to_string(),
            hls.segment_duration.to_string(),
            "-hls_playlist_type".to_string(),
            hls.playlist_type.clone(),
            "-hls_segment_type".to_string(),
            hls.segment_type.clone(),
            "-hls_segment_filename".to_string(),
            target.segment_pattern.to_string_lossy().into_owned(),
            target.playlist.to_string_lossy().into_owned(),
        ]
    }

    pub fn audio_rendition(
        &self,
        stream_index: u32,
        strategy: &AudioStrategy,
        target: &HlsTarget,
    ) -> EncodeOperation {
        let mut args = self.input_args(self.input);
        args.extend(Self::map_args(stream_index));
        args.extend(["-c:a".to_string(), strategy.codec_arg().to_string()]);

        if let Some(bitrate) = strategy.bitrate() {
            args.extend(["-b:a".to_string(), bitrate.as_ffmpeg_arg().to_string()]);
        }

        args.push("-vn".to_string());
        args.extend(self.hls_args(target));

        EncodeOperation {
            kind: OperationKind::Audio,
            label: format!("audio #{} ({})", stream_index, strategy.describe()),
            args,
            output: target.playlist.clone(),
        }
    }

    pub fn subtitle_extract(
        &self,
        stream_index: u32,
        extraction: SubtitleExtraction,
        intermediate: &Path,
    ) -> EncodeOperation {
        let mut args = self.input_args(self.input);
        args.extend(Self::map_args(stream_index));
        args.extend(["-c:s".to_string(), extraction.codec_arg().to_string()]);
        args.push(intermediate.to_string_lossy().into_owned());

        EncodeOperation {
            kind: OperationKind::SubtitleExtract,
            label: format!("subtitle #{} ({})", stream_index, extraction.as_str()),
            args,
            output: intermediate.to_path_buf(),
        }
    }

    pub fn subtitle_convert(&self, intermediate: &Path, output: &Path) -> EncodeOperation {
        let mut args = self.input_args(intermediate);
        args.push(output.to_string_lossy().into_owned());

        let name = output
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        EncodeOperation {
            kind: OperationKind::SubtitleConvert,
            label: format!("convert {}", name),
            args,
            output: output.to_path_buf(),
        }
    }

    pub fn video_rung(
        &self,
        stream_index: u32,
        rung: &PlannedRung,
        target: &HlsTarget,
    ) -> EncodeOperation {
        let video = &self.config.video;
        let gop = video.gop_size.to_string();

        let mut args = self.input_args(self.input);
        args.extend(Self::map_args(stream_index));
        args.extend([
            "-vf".to_string(),
            format!("scale={}:{}", rung.output_width, rung.output_height),
            "-c:v".to_string(),
            video.codec.clone(),
            "-preset".to_string(),
            video.preset.clone(),
            "-b:v".to_string(),
            rung.bitrate().as_ffmpeg_arg().to_string(),
            "-g".to_string(),
            gop.clone(),
            "-keyint_min".to_string(),
            gop,
            "-an".to_string(),
            "-sn".to_string(),
        ]);
        args.extend(self.hls_args(target));

        EncodeOperation {
            kind: OperationKind::Video,
            label: format!("{} ({})", rung.label(), rung.resolution()),
            args,
            output: target.playlist.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ladder::{Bitrate, LadderPlanner, LadderRung, ScaleAxis};
    use crate::utils::filesystem::OutputLayout;
    use pretty_assertions::assert_eq;

    fn layout() -> OutputLayout {
        OutputLayout::for_input(Path::new("/out"), Path::new("/in/movie.mkv"), "m4s")
    }

    fn strings(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_audio_copy_has_no_bitrate() {
        let config = Config::default();
        let builder = OperationBuilder::new(&config, Path::new("/in/movie.mkv"));
        let target = layout().audio_track(1, "eng");

        let op = builder.audio_rendition(1, &AudioStrategy::Copy, &target);

        assert_eq!(op.kind, OperationKind::Audio);
        assert_eq!(
            op.args,
            strings(&[
                "-i",
                "/in/movie.mkv",
                "-map",
                "0:1",
                "-c:a",
                "copy",
                "-vn",
                "-f",
                "hls",
                "-hls_time",
                "4",
                "-hls_playlist_type",
                "vod",
                "-hls_segment_type",
                "fmp4",
                "-hls_segment_filename",
                "/out/movie/audio/audio_1_eng/audio_1_eng_%03d.m4s",
                "/out/movie/audio/audio_1_eng/audio_1_eng.m3u8",
            ])
        );
        assert_eq!(op.output, target.playlist);
    }

    #[test]
    fn test_audio_transcode_sets_bitrate() {
        let config = Config::default();
        let builder = OperationBuilder::new(&config, Path::new("/in/movie.mkv"));
        let target = layout().audio_track(2, "und");
        let strategy = AudioStrategy::Transcode {
            codec: "eac3".to_string(),
            bitrate: Bitrate::from_kbps(896),
        };

        let op = builder.audio_rendition(2, &strategy, &target);
        let position = op.args.iter().position(|a| a == "-b:a").unwrap();
        assert_eq!(op.args[position - 1], "eac3");
        assert_eq!(op.args[position + 1], "896k");
        assert_eq!(op.label, "audio #2 (eac3 @ 896k)");
    }

    #[test]
    fn test_subtitle_operations() {
        let config = Config::default();
        let builder = OperationBuilder::new(&config, Path::new("/in/movie.mkv"));
        let target = layout().subtitle_track(3, Some("eng"), None);

        let forced =
            builder.subtitle_extract(3, SubtitleExtraction::ForceSrt, &target.intermediate);
        assert_eq!(
            forced.args,
            strings(&[
                "-i",
                "/in/movie.mkv",
                "-map",
                "0:3",
                "-c:s",
                "srt",
                "/out/movie/subtitles/sub_3_eng.srt",
            ])
        );

        let convert = builder.subtitle_convert(&target.intermediate, &target.output);
        assert_eq!(
            convert.args,
            strings(&[
                "-i",
                "/out/movie/subtitles/sub_3_eng.srt",
                "/out/movie/subtitles/sub_3_eng.vtt",
            ])
        );
        assert_eq!(convert.kind, OperationKind::SubtitleConvert);
    }

    #[test]
    fn test_video_rung_args() {
        let config = Config::default();
        let builder = OperationBuilder::new(&config, Path::new("/in/movie.mkv"));
        let rungs = [LadderRung::new("720p", 720, Bitrate::from_kbps(1500))];
        let planned = LadderPlanner::new(ScaleAxis::Height).plan(&rungs, 1920, 1080);
        let target = layout().video_rung("720p");

        let op = builder.video_rung(0, &planned[0], &target);
        let line = op.command_line();

        assert!(line.starts_with("-i /in/movie.mkv -map 0:0 -vf scale=1280:720 -c:v libsvtav1"));
        assert!(line.contains("-preset 13 -b:v 1500k -g 48 -keyint_min 48 -an"));
        assert!(line.ends_with("/out/movie/video/720p/720p.m3u8"));
        assert_eq!(op.label, "720p (1280x720)");
    }
}
