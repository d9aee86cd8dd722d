pub mod inventory;
pub mod probe;

pub use inventory::StreamInventory;
pub use probe::{ProbeResult, SourceStream, StreamKind};
