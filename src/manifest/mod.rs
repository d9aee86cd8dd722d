pub mod writer;

pub use writer::{
    relative_uri, render_header, render_stream_entry, ManifestWriter, AUDIO_GROUP_ID,
    SUBTITLE_GROUP_ID,
};
