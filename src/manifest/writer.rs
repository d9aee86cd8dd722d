use crate::rendition::{AudioRendition, SubtitleRendition, VideoRendition};
use crate::utils::{Error, Result};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Component, Path, PathBuf};
use tracing::debug;

pub const AUDIO_GROUP_ID: &str = "audio";
pub const SUBTITLE_GROUP_ID: &str = "subs";

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "YES"
    } else {
        "NO"
    }
}

/// Quoted-string attribute values may not contain double quotes.
fn quoted(value: &str) -> String {
    format!("\"{}\"", value.replace(['"', '\n', '\r'], "'"))
}

/// URI of `target` relative to `manifest_dir`, with `/` separators. Both are
/// made absolute against the current directory first so the result does not
/// depend on how the paths were spelled.
pub fn relative_uri(manifest_dir: &Path, target: &Path) -> String {
    let base = std::path::absolute(manifest_dir).unwrap_or_else(|_| manifest_dir.to_path_buf());
    let target_abs = std::path::absolute(target).unwrap_or_else(|_| target.to_path_buf());

    let relative = pathdiff::diff_paths(&target_abs, &base).unwrap_or(target_abs);

    relative
        .components()
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            Component::ParentDir => Some("..".to_string()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

pub fn render_header(
    manifest_dir: &Path,
    audio: &[AudioRendition],
    subtitles: &[SubtitleRendition],
) -> String {
    let mut out = String::from("#EXTM3U\n\n");

    for rendition in audio {
        out.push_str(&format!(
            "#EXT-X-MEDIA:TYPE=AUDIO,GROUP-ID=\"{}\",NAME={},LANGUAGE={},DEFAULT={},AUTOSELECT={},URI={}\n",
            AUDIO_GROUP_ID,
            quoted(&rendition.display_name),
            quoted(&rendition.language),
            yes_no(rendition.is_default),
            yes_no(rendition.is_default),
            quoted(&relative_uri(manifest_dir, &rendition.playlist_path)),
        ));
    }
    out.push('\n');

    for rendition in subtitles {
        out.push_str(&format!(
            "#EXT-X-MEDIA:TYPE=SUBTITLES,GROUP-ID=\"{}\",NAME={},LANGUAGE={},DEFAULT=NO,AUTOSELECT=NO,FORCED=NO,URI={}\n",
            SUBTITLE_GROUP_ID,
            quoted(&rendition.display_name),
            quoted(rendition.language.as_deref().unwrap_or("und")),
            quoted(&relative_uri(manifest_dir, &rendition.output_path)),
        ));
    }
    out.push('\n');

    out
}

/// One `#EXT-X-STREAM-INF` variant entry followed by its playlist URI.
///
/// This deliberately departs from the fixed `AUDIO="audio",SUBTITLES="subs"`
/// attribute list: each group reference is written only when the header
/// declares that group, so an input without audio or text subtitles gets a
/// variant without the reference. Players reject a STREAM-INF that names an
/// undeclared group.
pub fn render_stream_entry(
    manifest_dir: &Path,
    video: &VideoRendition,
    has_audio: bool,
    has_subtitles: bool,
) -> String {
    let mut attributes = format!(
        "BANDWIDTH={},RESOLUTION={}",
        video.bandwidth,
        video.resolution()
    );
    if has_audio {
        attributes.push_str(&format!(",AUDIO=\"{}\"", AUDIO_GROUP_ID));
    }
    if has_subtitles {
        attributes.push_str(&format!(",SUBTITLES=\"{}\"", SUBTITLE_GROUP_ID));
    }

    format!(
        "#EXT-X-STREAM-INF:{}\n{}\n\n",
        attributes,
        relative_uri(manifest_dir, &video.playlist_path)
    )
}

/// Sole owner of one input's master playlist. The header is written exactly
/// once on construction; afterwards the file only grows through
/// [`ManifestWriter::append_stream`].
#[derive(Debug)]
pub struct ManifestWriter {
    path: PathBuf,
    manifest_dir: PathBuf,
    has_audio: bool,
    has_subtitles: bool,
    stream_count: usize,
}

impl ManifestWriter {
    /// Creates or truncates `path` and writes the preamble plus every audio
    /// and subtitle media entry.
    pub fn write_header<P: AsRef<Path>>(
        path: P,
        audio: &[AudioRendition],
        subtitles: &[SubtitleRendition],
    ) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let manifest_dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));

        let header = render_header(&manifest_dir, audio, subtitles);
        std::fs::write(&path, header).map_err(|e| Error::manifest_write(&path, e))?;

        debug!(
            "Wrote manifest header to {} ({} audio, {} subtitle entries)",
            path.display(),
            audio.len(),
            subtitles.len()
        );

        Ok(Self {
            path,
            manifest_dir,
            has_audio: !audio.is_empty(),
            has_subtitles: !subtitles.is_empty(),
            stream_count: 0,
        })
    }

    pub fn append_stream(&mut self, video: &VideoRendition) -> Result<()> {
        let entry = render_stream_entry(
            &self.manifest_dir,
            video,
            self.has_audio,
            self.has_subtitles,
        );

        let mut file = OpenOptions::new()
            .append(true)
            .open(&self.path)
            .map_err(|e| Error::manifest_write(&self.path, e))?;
        file.write_all(entry.as_bytes())
            .and_then(|_| file.flush())
            .map_err(|e| Error::manifest_write(&self.path, e))?;

        self.stream_count += 1;
        debug!("Appended {} to {}", video.label, self.path.display());
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn stream_count(&self) -> usize {
        self.stream_count
    }
}
