use crate::utils::{Error, Result};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

pub const MASTER_PLAYLIST_NAME: &str = "master.m3u8";

/// Inputs to process: the single `path` if it is a file, otherwise every
/// regular file directly inside the directory, sorted by name.
pub fn find_input_files<P: AsRef<Path>>(path: P) -> Result<Vec<PathBuf>> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(Error::validation(format!(
            "Path does not exist: {}",
            path.display()
        )));
    }

    if path.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }

    let mut files: Vec<PathBuf> = WalkDir::new(path)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| !is_hidden(e.path()))
        .map(|e| e.into_path())
        .collect();

    files.sort();
    Ok(files)
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.starts_with('.'))
}

/// Keeps alphanumerics, `-` and `_`; everything else becomes `_`.
pub fn sanitize_component(text: &str) -> String {
    text.chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Playlist plus segment filename pattern for one HLS rendition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HlsTarget {
    pub dir: PathBuf,
    pub playlist: PathBuf,
    pub segment_pattern: PathBuf,
}

impl HlsTarget {
    fn new(dir: PathBuf, stem: &str, segment_extension: &str) -> Self {
        Self {
            playlist: dir.join(format!("{}.m3u8", stem)),
            segment_pattern: dir.join(format!("{}_%03d.{}", stem, segment_extension)),
            dir,
        }
    }

    pub fn ensure_dir(&self) -> Result<()> {
        std::fs::create_dir_all(&self.dir)?;
        Ok(())
    }
}

/// Paths for one subtitle track: the intermediate SubRip file and the WebVTT
/// rendition it is converted into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubtitleTarget {
    pub stem: String,
    pub intermediate: PathBuf,
    pub output: PathBuf,
}

/// Directory tree of one input's package, rooted at
/// `<output_dir>/<input file stem>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLayout {
    root: PathBuf,
    segment_extension: String,
}

impl OutputLayout {
    pub fn for_input(output_dir: &Path, input: &Path, segment_extension: &str) -> Self {
        let stem = input
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "output".to_string());

        Self {
            root: output_dir.join(stem),
            segment_extension: segment_extension.to_string(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.root.join(MASTER_PLAYLIST_NAME)
    }

    pub fn video_dir(&self) -> PathBuf {
        self.root.join("video")
    }

    pub fn audio_dir(&self) -> PathBuf {
        self.root.join("audio")
    }

    pub fn subtitle_dir(&self) -> PathBuf {
        self.root.join("subtitles")
    }

    pub fn create_dirs(&self) -> Result<()> {
        for dir in [self.video_dir(), self.audio_dir(), self.subtitle_dir()] {
            std::fs::create_dir_all(dir)?;
        }
        Ok(())
    }

    pub fn video_rung(&self, label: &str) -> HlsTarget {
        HlsTarget::new(self.video_dir().join(label), label, &self.segment_extension)
    }

    pub fn audio_track(&self, source_index: u32, language: &str) -> HlsTarget {
        let stem = format!("audio_{}_{}", source_index, sanitize_component(language));
        HlsTarget::new(self.audio_dir().join(&stem), &stem, &self.segment_extension)
    }

    pub fn subtitle_track(
        &self,
        source_index: u32,
        language: Option<&str>,
        title: Option<&str>,
    ) -> SubtitleTarget {
        let mut stem = format!("sub_{}", source_index);
        if let Some(language) = language {
            stem.push('_');
            stem.push_str(&sanitize_component(language));
        }
        if let Some(title) = title {
            stem.push('_');
            stem.push_str(&sanitize_component(title));
        }

        let dir = self.subtitle_dir();
        SubtitleTarget {
            intermediate: dir.join(format!("{}.srt", stem)),
            output: dir.join(format!("{}.vtt", stem)),
            stem,
        }
    }
}

pub fn file_is_non_empty<P: AsRef<Path>>(path: P) -> bool {
    std::fs::metadata(path)
        .map(|m| m.is_file() && m.len() > 0)
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_sanitize_component() {
        assert_eq!(sanitize_component("English (SDH)"), "English__SDH_");
        assert_eq!(sanitize_component("fr-CA_forced"), "fr-CA_forced");
        assert_eq!(sanitize_component("Français"), "Français");
        assert_eq!(sanitize_component("a/b\\c"), "a_b_c");
    }

    #[test]
    fn test_layout_paths() {
        let layout = OutputLayout::for_input(
            Path::new("/srv/out"),
            Path::new("/media/in/Movie.2024.mkv"),
            "m4s",
        );

        assert_eq!(layout.root(), Path::new("/srv/out/Movie.2024"));
        assert_eq!(
            layout.manifest_path(),
            PathBuf::from("/srv/out/Movie.2024/master.m3u8")
        );

        let rung = layout.video_rung("720p");
        assert_eq!(rung.playlist, PathBuf::from("/srv/out/Movie.2024/video/720p/720p.m3u8"));
        assert_eq!(
            rung.segment_pattern,
            PathBuf::from("/srv/out/Movie.2024/video/720p/720p_%03d.m4s")
        );

        let audio = layout.audio_track(2, "eng");
        assert_eq!(
            audio.playlist,
            PathBuf::from("/srv/out/Movie.2024/audio/audio_2_eng/audio_2_eng.m3u8")
        );

        let sub = layout.subtitle_track(5, Some("fre"), Some("Forced Signs"));
        assert_eq!(sub.stem, "sub_5_fre_Forced_Signs");
        assert_eq!(
            sub.output,
            PathBuf::from("/srv/out/Movie.2024/subtitles/sub_5_fre_Forced_Signs.vtt")
        );
        assert_eq!(
            layout.subtitle_track(6, None, None).intermediate,
            PathBuf::from("/srv/out/Movie.2024/subtitles/sub_6.srt")
        );
    }

    #[test]
    fn test_find_input_files() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("b.mkv"), b"x").unwrap();
        std::fs::write(dir.path().join("a.mp4"), b"x").unwrap();
        std::fs::write(dir.path().join(".DS_Store"), b"x").unwrap();
        std::fs::create_dir(dir.path().join("nested")).unwrap();
        std::fs::write(dir.path().join("nested").join("c.mkv"), b"x").unwrap();

        let files = find_input_files(dir.path()).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.mp4", "b.mkv"]);

        let single = find_input_files(dir.path().join("b.mkv")).unwrap();
        assert_eq!(single.len(), 1);

        assert!(find_input_files(dir.path().join("missing")).is_err());
    }

    #[test]
    fn test_file_is_non_empty() {
        let dir = tempdir().unwrap();
        let empty = dir.path().join("empty.srt");
        let full = dir.path().join("full.srt");
        std::fs::write(&empty, b"").unwrap();
        std::fs::write(&full, b"1\n").unwrap();

        assert!(!file_is_non_empty(&empty));
        assert!(file_is_non_empty(&full));
        assert!(!file_is_non_empty(dir.path().join("missing.srt")));
    }
}
