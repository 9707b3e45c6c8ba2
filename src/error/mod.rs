//! Error handling module for Recode

use thiserror::Error;

/// Main error type for Recode operations
#[derive(Error, Debug)]
pub enum RecodeError {
    /// Input container could not be opened or probed
    #[error("Failed to open input file '{path}': {message}")]
    OpenInput { path: String, message: String },

    /// Output container could not be allocated or opened for writing
    #[error("Failed to open output file '{path}': {message}")]
    OpenOutput { path: String, message: String },

    /// No decoder exists for a stream's codec
    #[error("No decoder available for codec {codec}")]
    DecoderUnavailable { codec: String },

    /// No encoder matches the requested name
    #[error("No encoder named '{name}' is available")]
    EncoderUnavailable { name: String },

    /// A codec could not be opened or negotiated
    #[error("Failed to open {kind} codec: {message}")]
    CodecNegotiation { kind: &'static str, message: String },

    /// An expected audio/video stream is missing from the input
    #[error("Input has no {kind} stream")]
    MissingStream { kind: &'static str },

    /// A codec call failed outside the needs-more-input/end-of-stream sentinels
    #[error("Codec protocol error: {message}")]
    CodecProtocol { message: String },

    /// Container header could not be written
    #[error("Failed to write output header: {message}")]
    HeaderWrite { message: String },

    /// The interleaved writer rejected a packet
    #[error("Failed to write packet: {message}")]
    PacketWrite { message: String },

    /// Container trailer could not be written
    #[error("Failed to write output trailer: {message}")]
    TrailerWrite { message: String },

    /// FFmpeg initialization error
    #[error("Failed to initialize FFmpeg: {message}")]
    FFmpegInitError { message: String },

    /// I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// FFmpeg error
    #[error("FFmpeg error: {0}")]
    FFmpegError(#[from] ffmpeg_next::Error),
}

/// Result type alias for Recode operations
pub type RecodeResult<T> = std::result::Result<T, RecodeError>;
