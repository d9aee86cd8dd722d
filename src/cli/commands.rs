use crate::{
    cli::CliArgs,
    config::Config,
    ladder::LadderPlanner,
    utils::Result,
};
use std::path::Path;

pub async fn handle_commands(args: &CliArgs, config: &Config) -> Result<bool> {
    if !args.is_info_command() {
        return Ok(false);
    }

    if args.validate_config {
        validate_config(&args.config)?;
        return Ok(true);
    }

    if args.show_ladder {
        show_ladder(config);
        return Ok(true);
    }

    Ok(false)
}

fn validate_config(config_path: &Path) -> Result<()> {
    let loaded = if config_path.exists() {
        Config::load(config_path)
    } else {
        Config::load_with_fallback(config_path)
    };

    match loaded {
        Ok(config) => {
            if config_path.exists() {
                println!("✓ Configuration file is valid: {}", config_path.display());
            } else {
                println!("✓ Configuration is valid (using discovered/default config)");
            }
            println!();

            println!("Configuration Summary:");
            println!("{:-<40}", "");
            println!("Ladder rungs: {}", config.video.ladder.len());
            println!(
                "Video codec: {} (preset {}, GOP {})",
                config.video.codec, config.video.preset, config.video.gop_size
            );
            println!(
                "Segments: {}s {} ({})",
                config.hls.segment_duration, config.hls.segment_type, config.hls.segment_extension
            );
            println!(
                "Audio fallback: {} @ {}",
                config.audio.fallback_codec, config.audio.fallback_bitrate
            );
            println!(
                "Operation timeout: {}",
                config
                    .tools
                    .operation_timeout_seconds
                    .map(|s| format!("{}s", s))
                    .unwrap_or_else(|| "none".to_string())
            );

            Ok(())
        }
        Err(e) => {
            println!("✗ Configuration validation failed: {}", e);
            Err(e)
        }
    }
}

/// Rung table as configured, plus what a 1920x1080 source would get.
pub fn render_ladder(config: &Config) -> String {
    let axis = config.video.scale_axis;
    let mut out = String::new();

    out.push_str(&format!("Video ladder (keyed by {}):\n", axis.as_str()));
    out.push_str(&format!("{:-<56}\n", ""));
    out.push_str(&format!(
        "{:<10} {:>8} {:>12} {:>20}\n",
        "Label", "Target", "Bitrate", "For 1920x1080"
    ));
    out.push_str(&format!("{:-<56}\n", ""));

    let (ref_width, ref_height) = (1920, 1080);
    let planned = LadderPlanner::new(axis).plan(&config.video.ladder, ref_width, ref_height);

    let mut rungs: Vec<_> = config.video.ladder.iter().collect();
    rungs.sort_by_key(|r| r.target_dimension);

    for rung in rungs {
        let example = planned
            .iter()
            .find(|p| p.label() == rung.label)
            .map(|p| p.resolution())
            .unwrap_or_else(|| "skipped (upscale)".to_string());

        out.push_str(&format!(
            "{:<10} {:>8} {:>12} {:>20}\n",
            rung.label,
            rung.target_dimension,
            rung.bitrate.as_ffmpeg_arg(),
            example
        ));
    }

    out
}

fn show_ladder(config: &Config) {
    print!("{}", render_ladder(config));
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[tokio::test]
    async fn test_only_info_flags_are_handled() {
        let config = Config::default();

        let args = CliArgs::try_parse_from(["hls-packager"]).unwrap();
        assert!(!handle_commands(&args, &config).await.unwrap());

        let args = CliArgs::try_parse_from(["hls-packager", "--show-ladder"]).unwrap();
        assert!(handle_commands(&args, &config).await.unwrap());
    }

    #[test]
    fn test_render_default_ladder() {
        let table = render_ladder(&Config::default());

        assert!(table.starts_with("Video ladder (keyed by height):"));
        assert!(table.contains("1280x720"));
        assert!(table.contains("1500k"));
        assert_eq!(table.matches("skipped (upscale)").count(), 2);
    }
}
