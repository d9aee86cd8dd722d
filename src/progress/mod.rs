pub mod monitor;
pub mod tracker;

pub use monitor::{MonitorState, OperationFailure, OperationOutcome, ProgressMonitor};
pub use tracker::{format_hms, parse_progress_line, ProgressSnapshot, ProgressTracker, Throttle};
