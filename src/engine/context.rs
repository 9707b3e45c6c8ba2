//! Per-file stream context types
//!
//! The decode side owns opened decoders, the encode side owns opened
//! encoders or copy targets. Stream handles from `format::context` cannot
//! be held across the read loop, so each track stores its stream index and
//! a copy of the time bases it needs.

use ffmpeg_next::codec::{decoder, encoder};
use ffmpeg_next::Rational;

/// Decode-side video track: selected stream plus its opened decoder
pub struct VideoInput {
    /// Index of the stream in the input container
    pub stream_index: usize,
    /// Container time base of the input stream
    pub time_base: Rational,
    /// Frame rate of the input stream, used for encoder time base and
    /// duration derivation
    pub frame_rate: Rational,
    pub decoder: decoder::Video,
}

/// Decode-side audio track
pub struct AudioInput {
    pub stream_index: usize,
    pub time_base: Rational,
    pub decoder: decoder::Audio,
}

/// All decode-side state for one input file
pub struct InputTracks {
    pub video: Option<VideoInput>,
    pub audio: Option<AudioInput>,
}

impl InputTracks {
    /// Stream index of the selected video track, if any
    pub fn video_index(&self) -> Option<usize> {
        self.video.as_ref().map(|v| v.stream_index)
    }

    /// Stream index of the selected audio track, if any
    pub fn audio_index(&self) -> Option<usize> {
        self.audio.as_ref().map(|a| a.stream_index)
    }
}

/// Copy target: an output stream that receives rescaled packets verbatim
pub struct CopyTarget {
    /// Index of the stream in the output container
    pub stream_index: usize,
    /// Time base of the source stream, the "from" side of the rescale
    pub source_time_base: Rational,
}

/// Encode target for video: an opened, negotiated encoder
pub struct VideoEncodeTarget {
    pub stream_index: usize,
    /// Time base the encoder stamps packets in (1/frame-rate)
    pub time_base: Rational,
    pub encoder: encoder::video::Encoder,
}

/// Encode target for audio
pub struct AudioEncodeTarget {
    pub stream_index: usize,
    /// Codec time base of the encoder (1/sample-rate); audio sync follows
    /// the codec clock, not the container clock
    pub time_base: Rational,
    pub encoder: encoder::audio::Encoder,
}

/// Encode-side video lane
pub enum VideoOutput {
    Encode(VideoEncodeTarget),
    Copy(CopyTarget),
}

/// Encode-side audio lane
pub enum AudioOutput {
    Encode(AudioEncodeTarget),
    Copy(CopyTarget),
}

/// All encode-side state for one output file
pub struct OutputTracks {
    pub video: Option<VideoOutput>,
    pub audio: Option<AudioOutput>,
}
