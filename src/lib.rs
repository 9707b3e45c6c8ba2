//! Recode CLI Media Pipeline Library
//!
//! A command-line media transcoding and remuxing pipeline: per elementary
//! stream it either re-encodes through a decoder/encoder bridge or copies
//! packets unchanged, keeping timestamps consistent across container and
//! codec boundaries.

pub mod cli;
pub mod engine;
pub mod error;
pub mod probe;

// Re-export commonly used types
pub use engine::transcoder::Transcoder;
pub use engine::{StreamParams, TranscodeReport};
pub use error::{RecodeError, RecodeResult};
pub use probe::{MediaInfo, MediaInspector};

/// Initialize the FFmpeg engine
pub fn init() -> RecodeResult<()> {
    ffmpeg_next::init().map_err(|e| RecodeError::FFmpegInitError {
        message: e.to_string(),
    })?;

    Ok(())
}
