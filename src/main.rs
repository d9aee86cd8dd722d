use clap::Parser;
use std::path::PathBuf;
use tracing::info;

use hls_packager::{
    cli::{handle_commands, CliArgs},
    config::Config,
    encoding::FfmpegRunner,
    processing::HlsPackager,
    utils::{find_input_files, setup_logging, Error, Result},
};

#[tokio::main]
async fn main() -> Result<()> {
    let args = CliArgs::parse();

    if !args.is_info_command() {
        args.validate()?;
    }

    let mut config = Config::load_with_fallback(&args.config)?;
    args.apply_overrides(&mut config);

    setup_logging(
        args.get_log_level(&config.logging.level),
        config.logging.show_timestamps,
        config.logging.colored_output && args.should_use_color(),
    )?;

    if handle_commands(&args, &config).await? {
        return Ok(());
    }

    handle_packaging(&args, &config).await
}

async fn handle_packaging(args: &CliArgs, config: &Config) -> Result<()> {
    let runner = FfmpegRunner::new(config);

    runner
        .ffmpeg()
        .check_availability()
        .await
        .map_err(|e| Error::ffmpeg(format!("FFmpeg tools not available: {}", e)))?;

    let input_files = find_input_files(args.input_source(config))?;
    info!("Found {} file(s) to process", input_files.len());

    let packager = HlsPackager::new(config, &runner);

    let mut successful_files = 0;
    let mut skipped_files = 0;
    let mut failed_files: Vec<(PathBuf, String)> = Vec::new();

    for (index, input_path) in input_files.iter().enumerate() {
        info!(
            "Processing file {}/{}: {}",
            index + 1,
            input_files.len(),
            input_path.display()
        );

        if packager.should_skip(input_path) {
            info!("Skipping {}: output already exists", input_path.display());
            skipped_files += 1;
            continue;
        }

        match packager.package(input_path).await {
            Ok(report) if report.is_playable() => {
                successful_files += 1;
            }
            Ok(report) => {
                let error_msg = format!(
                    "No video rendition produced ({} rung(s) failed)",
                    report.failed_rungs.len()
                );
                tracing::error!("{}: {}", input_path.display(), error_msg);
                failed_files.push((input_path.clone(), error_msg));
            }
            Err(e) if !e.aborts_input() => return Err(e),
            Err(e) => {
                let error_msg = format!("Failed to package {}: {}", input_path.display(), e);
                tracing::error!("{}", error_msg);
                failed_files.push((input_path.clone(), error_msg));
            }
        }
    }

    info!(
        "Batch complete: {} successful, {} skipped, {} failed",
        successful_files,
        skipped_files,
        failed_files.len()
    );

    if !failed_files.is_empty() {
        info!("Failed files:");
        for (path, error) in &failed_files {
            info!("  - {}: {}", path.display(), error);
        }
    }

    if successful_files == 0 && !failed_files.is_empty() {
        return Err(Error::encode("All files failed to package"));
    }

    Ok(())
}
