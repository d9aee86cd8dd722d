use super::tracker::{parse_progress_line, ProgressTracker};
use crate::config::ProgressConfig;
use std::collections::VecDeque;
use std::fmt;
use std::process::ExitStatus;
use std::time::Duration;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::process::Child;
use tracing::{debug, warn};

/// Diagnostic lines kept from the encoder's stderr for failure reasons.
const STDERR_TAIL_LINES: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MonitorState {
    NotStarted,
    Running,
    Completed,
    Failed { exit_code: Option<i32> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationFailure {
    /// `None` when the process was killed or never started.
    pub exit_code: Option<i32>,
    pub reason: String,
}

impl fmt::Display for OperationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.reason)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperationOutcome {
    Completed,
    Failed(OperationFailure),
}

impl OperationOutcome {
    pub fn failed<T: Into<String>>(exit_code: Option<i32>, reason: T) -> Self {
        Self::Failed(OperationFailure {
            exit_code,
            reason: reason.into(),
        })
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Completed)
    }
}

/// Watches one encoder process until it exits. Never retries; callers decide
/// what to do with a failure.
pub struct ProgressMonitor {
    state: MonitorState,
    tracker: ProgressTracker,
    timeout: Option<Duration>,
}

impl ProgressMonitor {
    pub fn new(
        description: &str,
        total_duration: f64,
        config: &ProgressConfig,
        timeout: Option<Duration>,
    ) -> Self {
        Self {
            state: MonitorState::NotStarted,
            tracker: ProgressTracker::new(description, total_duration, config),
            timeout,
        }
    }

    pub fn state(&self) -> &MonitorState {
        &self.state
    }

    pub fn tracker(&self) -> &ProgressTracker {
        &self.tracker
    }

    pub async fn run(&mut self, mut child: Child) -> OperationOutcome {
        self.state = MonitorState::Running;

        let stderr_tail = child.stderr.take().map(|stderr| {
            tokio::spawn(async move {
                let mut tail = VecDeque::with_capacity(STDERR_TAIL_LINES);
                let mut reader = BufReader::new(stderr);
                let mut buf = Vec::new();
                while let Some(line) = next_lossy_line(&mut reader, &mut buf).await {
                    if line.trim().is_empty() {
                        continue;
                    }
                    if tail.len() == STDERR_TAIL_LINES {
                        tail.pop_front();
                    }
                    tail.push_back(line);
                }
                tail
            })
        });

        let stdout = child.stdout.take();
        let tracker = &mut self.tracker;
        let drive = async {
            if let Some(stdout) = stdout {
                let mut reader = BufReader::new(stdout);
                let mut buf = Vec::new();
                while let Some(line) = next_lossy_line(&mut reader, &mut buf).await {
                    if let Some(elapsed) = parse_progress_line(&line) {
                        tracker.record(elapsed);
                    }
                }
            }
            child.wait().await
        };

        let waited = match self.timeout {
            Some(limit) => match tokio::time::timeout(limit, drive).await {
                Ok(waited) => waited,
                Err(_) => {
                    warn!("Operation exceeded {}s, terminating encoder", limit.as_secs());
                    if let Err(e) = child.kill().await {
                        debug!("Failed to kill timed out encoder: {}", e);
                    }
                    let reason = format!("timed out after {} seconds", limit.as_secs());
                    return self.fail(None, reason);
                }
            },
            None => drive.await,
        };

        let tail = match stderr_tail {
            Some(handle) => handle.await.unwrap_or_default(),
            None => VecDeque::new(),
        };

        match waited {
            Ok(status) if status.success() => {
                self.state = MonitorState::Completed;
                self.tracker.finish_successfully();
                OperationOutcome::Completed
            }
            Ok(status) => {
                let reason = failure_reason(&status, &tail);
                self.fail(status.code(), reason)
            }
            Err(e) => self.fail(None, format!("failed waiting for encoder: {}", e)),
        }
    }

    fn fail(&mut self, exit_code: Option<i32>, reason: String) -> OperationOutcome {
        self.state = MonitorState::Failed { exit_code };
        self.tracker.finish_with_error(&reason);
        OperationOutcome::failed(exit_code, reason)
    }
}

/// Reads one line, replacing invalid UTF-8 instead of stopping. Encoders echo
/// input metadata verbatim, and closing the pipe early would kill them.
async fn next_lossy_line<R: AsyncBufRead + Unpin>(
    reader: &mut R,
    buf: &mut Vec<u8>,
) -> Option<String> {
    buf.clear();
    match reader.read_until(b'\n', buf).await {
        Ok(0) => None,
        Ok(_) => {
            let line = String::from_utf8_lossy(buf);
            Some(line.trim_end_matches(['\n', '\r']).to_string())
        }
        Err(e) => {
            debug!("Encoder output read failed: {}", e);
            None
        }
    }
}

fn failure_reason(status: &ExitStatus, stderr_tail: &VecDeque<String>) -> String {
    let mut reason = match status.code() {
        Some(code) => format!("encoder exited with code {}", code),
        None => "encoder terminated by signal".to_string(),
    };

    if !stderr_tail.is_empty() {
        let detail: Vec<&str> = stderr_tail.iter().map(|l| l.trim()).collect();
        reason.push_str(": ");
        reason.push_str(&detail.join(" | "));
    }

    reason
}
