pub mod error;
pub mod ffmpeg;
pub mod filesystem;
pub mod logging;

pub use error::{Error, Result};
pub use ffmpeg::FfmpegWrapper;
pub use filesystem::{find_input_files, sanitize_component, OutputLayout};
pub use logging::setup_logging;
