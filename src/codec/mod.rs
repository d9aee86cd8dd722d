pub mod policy;

pub use policy::{
    AudioCodec, AudioStrategy, CodecPolicy, SubtitleDecision, SubtitleExtraction, SubtitleKind,
};
