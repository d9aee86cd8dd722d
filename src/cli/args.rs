use crate::config::Config;
use crate::utils::{Error, Result};
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version)]
#[command(name = "hls-packager")]
#[command(about = "Package media files as HLS adaptive-bitrate ladders with alternate audio and subtitles")]
#[command(long_about = "
Probes each input with ffprobe, packages every audio track (copying HLS-native
codecs, transcoding the rest) and every text subtitle track (as WebVTT), encodes
a resolution ladder with ffmpeg and writes a master.m3u8 tying it all together.

EXAMPLES:
  # Package every file in the configured input directory
  hls-packager

  # Package a single file into a custom output directory
  hls-packager movie.mkv --output-dir /srv/hls

  # Re-run a batch, leaving already packaged inputs alone
  hls-packager --input-dir ~/Videos/Incoming --skip-existing

  # Show which ladder rungs the configuration defines
  hls-packager --show-ladder
")]
pub struct CliArgs {
    /// Single input file to package (default: every file in the input directory)
    #[arg(value_name = "INPUT")]
    pub input: Option<PathBuf>,

    /// Configuration file path
    #[arg(short, long, default_value = "config.yaml", value_name = "FILE")]
    pub config: PathBuf,

    /// Directory scanned for inputs when INPUT is not given
    #[arg(short, long, value_name = "DIR")]
    pub input_dir: Option<PathBuf>,

    /// Root directory for packaged output
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Skip inputs whose output directory already exists
    #[arg(long)]
    pub skip_existing: bool,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Validate configuration file and exit
    #[arg(long)]
    pub validate_config: bool,

    /// Print the configured ladder and exit
    #[arg(long)]
    pub show_ladder: bool,
}

impl CliArgs {
    pub fn get_log_level<'a>(&self, config_level: &'a str) -> &'a str {
        if self.debug {
            "debug"
        } else {
            config_level
        }
    }

    pub fn should_use_color(&self) -> bool {
        !self.no_color
    }

    pub fn is_info_command(&self) -> bool {
        self.validate_config || self.show_ladder
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(input) = &self.input {
            if !input.is_file() {
                return Err(Error::validation(format!(
                    "Input file does not exist: {}",
                    input.display()
                )));
            }
        }

        Ok(())
    }

    /// Folds command-line overrides into the loaded configuration.
    pub fn apply_overrides(&self, config: &mut Config) {
        if let Some(dir) = &self.input_dir {
            config.app.input_dir = dir.clone();
        }
        if let Some(dir) = &self.output_dir {
            config.app.output_dir = dir.clone();
        }
        if self.skip_existing {
            config.app.skip_existing = true;
        }
    }

    /// The explicit input, or the configured input directory to scan.
    pub fn input_source(&self, config: &Config) -> PathBuf {
        self.input
            .clone()
            .unwrap_or_else(|| config.app.input_dir.clone())
    }
}
