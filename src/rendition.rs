use crate::ladder::Bitrate;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq)]
pub struct AudioRendition {
    pub source_index: u32,
    pub output_codec: String,
    pub output_bitrate: Option<Bitrate>,
    pub playlist_path: PathBuf,
    pub segment_pattern: PathBuf,
    pub language: String,
    pub display_name: String,
    pub is_default: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SubtitleRendition {
    pub source_index: u32,
    pub output_path: PathBuf,
    pub language: Option<String>,
    pub display_name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VideoRendition {
    pub label: String,
    pub playlist_path: PathBuf,
    pub bandwidth: u64,
    pub width: u32,
    pub height: u32,
}

impl VideoRendition {
    pub fn resolution(&self) -> String {
        format!("{}x{}", self.width, self.height)
    }
}

/// Marks the first rendition (discovery order among those produced) as the
/// default and every other one as non-default.
pub fn assign_default_audio(renditions: &mut [AudioRendition]) {
    for (position, rendition) in renditions.iter_mut().enumerate() {
        rendition.is_default = position == 0;
    }
}
