pub mod operations;
pub mod runner;

pub use operations::{EncodeOperation, OperationBuilder, OperationKind};
pub use runner::{FfmpegRunner, OperationRunner};
