use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] serde_yaml::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("FFmpeg error: {message}")]
    Ffmpeg { message: String },

    #[error("Probe failed: {message}")]
    Probe { message: String },

    #[error("No video stream found in input")]
    NoVideoStream,

    #[error("Encoding error: {message}")]
    Encode { message: String },

    #[error("Manifest write failed for {}: {source}", path.display())]
    ManifestWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Parse error: {message}")]
    Parse { message: String },

    #[error("Validation error: {message}")]
    Validation { message: String },
}

impl Error {
    pub fn ffmpeg<T: Into<String>>(message: T) -> Self {
        Self::Ffmpeg {
            message: message.into(),
        }
    }

    pub fn probe<T: Into<String>>(message: T) -> Self {
        Self::Probe {
            message: message.into(),
        }
    }

    pub fn encode<T: Into<String>>(message: T) -> Self {
        Self::Encode {
            message: message.into(),
        }
    }

    pub fn manifest_write<P: Into<PathBuf>>(path: P, source: std::io::Error) -> Self {
        Self::ManifestWrite {
            path: path.into(),
            source,
        }
    }

    pub fn parse<T: Into<String>>(message: T) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }

    pub fn validation<T: Into<String>>(message: T) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Kinds that end one input's pipeline while the batch moves on. Anything
    /// else stops the batch. Track and rung failures are outcomes, not errors.
    pub fn aborts_input(&self) -> bool {
        matches!(
            self,
            Self::Probe { .. }
                | Self::NoVideoStream
                | Self::ManifestWrite { .. }
                | Self::Io(_)
                | Self::Json(_)
                | Self::Ffmpeg { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::NoVideoStream;
        assert_eq!(err.to_string(), "No video stream found in input");

        let err = Error::probe("ffprobe exited with status 1");
        assert_eq!(err.to_string(), "Probe failed: ffprobe exited with status 1");
    }

    #[test]
    fn test_input_fatal_kinds() {
        assert!(Error::probe("x").aborts_input());
        assert!(Error::NoVideoStream.aborts_input());
        assert!(Error::manifest_write(
            "master.m3u8",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied")
        )
        .aborts_input());
        assert!(!Error::encode("rung failed").aborts_input());
        assert!(!Error::validation("bad ladder").aborts_input());
    }
}
