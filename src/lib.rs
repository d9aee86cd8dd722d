pub mod cli;
pub mod codec;
pub mod config;
pub mod encoding;
pub mod ladder;
pub mod manifest;
pub mod processing;
pub mod progress;
pub mod rendition;
pub mod stream;
pub mod utils;

pub use codec::CodecPolicy;
pub use config::Config;
pub use encoding::{FfmpegRunner, OperationRunner};
pub use ladder::{Bitrate, LadderPlanner, LadderRung, ScaleAxis};
pub use manifest::ManifestWriter;
pub use processing::{HlsPackager, PackageReport};
pub use rendition::{AudioRendition, SubtitleRendition, VideoRendition};
pub use stream::{ProbeResult, SourceStream, StreamInventory, StreamKind};
pub use utils::{Error, FfmpegWrapper, Result};
