use super::operations::EncodeOperation;
use crate::config::Config;
use crate::progress::{OperationOutcome, ProgressMonitor};
use crate::stream::ProbeResult;
use crate::utils::{FfmpegWrapper, Result};
use async_trait::async_trait;
use std::path::Path;
use std::time::Duration;
use tracing::debug;

/// The external collaborators of a packaging run: the prober and the encoder.
#[async_trait]
pub trait OperationRunner: Send + Sync {
    async fn probe(&self, input: &Path) -> Result<ProbeResult>;

    /// Runs one encoder operation to completion. Failures are outcomes, not
    /// errors; the caller decides whether to fall back or skip.
    async fn run(&self, operation: &EncodeOperation, total_duration: f64) -> OperationOutcome;
}

pub struct FfmpegRunner {
    ffmpeg: FfmpegWrapper,
    config: Config,
}

impl FfmpegRunner {
    pub fn new(config: &Config) -> Self {
        Self {
            ffmpeg: FfmpegWrapper::from_config(&config.tools),
            config: config.clone(),
        }
    }

    pub fn ffmpeg(&self) -> &FfmpegWrapper {
        &self.ffmpeg
    }

    fn timeout(&self) -> Option<Duration> {
        self.config
            .tools
            .operation_timeout_seconds
            .map(Duration::from_secs)
    }
}

#[async_trait]
impl OperationRunner for FfmpegRunner {
    async fn probe(&self, input: &Path) -> Result<ProbeResult> {
        self.ffmpeg.probe(input).await
    }

    async fn run(&self, operation: &EncodeOperation, total_duration: f64) -> OperationOutcome {
        debug!("Starting {} operation: {}", operation.kind, operation.label);

        let child = match self.ffmpeg.spawn_ffmpeg(&operation.args) {
            Ok(child) => child,
            Err(e) => {
                return OperationOutcome::failed(None, format!("failed to start encoder: {}", e))
            }
        };

        let mut monitor = ProgressMonitor::new(
            &operation.label,
            total_duration,
            &self.config.progress,
            self.timeout(),
        );
        monitor.run(child).await
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::encoding::OperationKind;
    use std::path::PathBuf;

    fn operation(args: &[&str]) -> EncodeOperation {
        EncodeOperation {
            kind: OperationKind::Video,
            label: "test".to_string(),
            args: args.iter().map(|a| a.to_string()).collect(),
            output: PathBuf::from("/dev/null"),
        }
    }

    #[tokio::test]
    async fn test_missing_encoder_is_a_failed_outcome() {
        let mut config = Config::default();
        config.tools.ffmpeg = "/nonexistent/ffmpeg".to_string();
        config.progress.enabled = false;
        let runner = FfmpegRunner::new(&config);

        match runner.run(&operation(&["-i", "in.mkv", "out.m3u8"]), 10.0).await {
            OperationOutcome::Failed(failure) => {
                assert_eq!(failure.exit_code, None);
                assert!(failure.reason.contains("failed to start encoder"));
            }
            other => panic!("expected failure, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_runner_reports_exit_status() {
        // `false` ignores its arguments and exits 1, standing in for a failing encoder.
        let mut config = Config::default();
        config.tools.ffmpeg = "false".to_string();
        config.progress.enabled = false;
        let runner = FfmpegRunner::new(&config);

        match runner.run(&operation(&[]), 10.0).await {
            OperationOutcome::Failed(failure) => assert_eq!(failure.exit_code, Some(1)),
            other => panic!("expected failure, got {:?}", other),
        }

        config.tools.ffmpeg = "true".to_string();
        let runner = FfmpegRunner::new(&config);
        assert!(runner.run(&operation(&[]), 10.0).await.is_success());
    }
}
