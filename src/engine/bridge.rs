//! Decode/encode bridge
//!
//! Drives one packet at a time through decoder and encoder, draining each
//! side until it signals that it needs more input. Timestamps cross exactly
//! two boundaries: decoder stream -> encoder (frame pts) and encoder ->
//! output stream (packet pts/dts/duration), with one rescale per crossing.

use ffmpeg_next::util::error::EAGAIN;
use ffmpeg_next::{format, frame, picture, Error, Packet, Rational, Rescale};
use tracing::trace;

use crate::engine::context::{AudioEncodeTarget, AudioInput, VideoEncodeTarget, VideoInput};
use crate::error::{RecodeError, RecodeResult};

/// Outcome of a single non-blocking codec pull.
///
/// The two sentinel values are normal control flow; anything else the codec
/// reports becomes a `CodecProtocol` error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodecPoll {
    /// A frame or packet was produced
    Produced,
    /// The codec wants more input before it can produce output
    NeedsMoreInput,
    /// The codec is fully drained
    EndOfStream,
}

/// Map a codec call result onto the explicit protocol states
pub fn classify_poll(status: Result<(), Error>) -> RecodeResult<CodecPoll> {
    match status {
        Ok(()) => Ok(CodecPoll::Produced),
        Err(Error::Other { errno }) if errno == EAGAIN => Ok(CodecPoll::NeedsMoreInput),
        Err(Error::Eof) => Ok(CodecPoll::EndOfStream),
        Err(e) => Err(RecodeError::CodecProtocol {
            message: e.to_string(),
        }),
    }
}

/// Run one compressed video packet through decode -> encode -> write.
///
/// Returns the number of packets written to the output.
pub fn transcode_video_packet(
    input: &mut VideoInput,
    target: &mut VideoEncodeTarget,
    octx: &mut format::context::Output,
    packet: &Packet,
) -> RecodeResult<u64> {
    input
        .decoder
        .send_packet(packet)
        .map_err(|e| RecodeError::CodecProtocol {
            message: format!("video decoder rejected packet: {}", e),
        })?;

    drain_video_decoder(input, target, octx)
}

/// Run one compressed audio packet through decode -> encode -> write
pub fn transcode_audio_packet(
    input: &mut AudioInput,
    target: &mut AudioEncodeTarget,
    octx: &mut format::context::Output,
    packet: &Packet,
) -> RecodeResult<u64> {
    input
        .decoder
        .send_packet(packet)
        .map_err(|e| RecodeError::CodecProtocol {
            message: format!("audio decoder rejected packet: {}", e),
        })?;

    drain_audio_decoder(input, target, octx)
}

/// Drain remaining frames out of both codecs after the input is exhausted.
///
/// The decoder is sent EOF and drained first so frames it still buffers are
/// not lost, then the encoder receives its one flush signal and is drained
/// the same way. Skipping either step truncates trailing output.
pub fn flush_video(
    input: &mut VideoInput,
    target: &mut VideoEncodeTarget,
    octx: &mut format::context::Output,
) -> RecodeResult<u64> {
    input
        .decoder
        .send_eof()
        .map_err(|e| RecodeError::CodecProtocol {
            message: format!("video decoder rejected end of stream: {}", e),
        })?;

    let mut written = drain_video_decoder(input, target, octx)?;
    written += encode_video_frame(target, octx, None, input.frame_rate)?;
    Ok(written)
}

/// Audio counterpart of [`flush_video`]
pub fn flush_audio(
    input: &mut AudioInput,
    target: &mut AudioEncodeTarget,
    octx: &mut format::context::Output,
) -> RecodeResult<u64> {
    input
        .decoder
        .send_eof()
        .map_err(|e| RecodeError::CodecProtocol {
            message: format!("audio decoder rejected end of stream: {}", e),
        })?;

    let source_time_base = input.decoder.time_base();
    let mut written = drain_audio_decoder(input, target, octx)?;
    written += encode_audio_frame(target, octx, None, source_time_base)?;
    Ok(written)
}

fn drain_video_decoder(
    input: &mut VideoInput,
    target: &mut VideoEncodeTarget,
    octx: &mut format::context::Output,
) -> RecodeResult<u64> {
    let mut written = 0;
    let mut frame = frame::Video::empty();
    loop {
        match classify_poll(input.decoder.receive_frame(&mut frame))? {
            CodecPoll::Produced => {
                // Let the encoder choose frame types instead of inheriting
                // the decoder's.
                frame.set_kind(picture::Type::None);
                let ts = frame.timestamp();
                frame.set_pts(ts.map(|t| t.rescale(input.time_base, target.time_base)));
                written += encode_video_frame(target, octx, Some(&frame), input.frame_rate)?;
            }
            CodecPoll::NeedsMoreInput | CodecPoll::EndOfStream => break,
        }
    }
    Ok(written)
}

fn drain_audio_decoder(
    input: &mut AudioInput,
    target: &mut AudioEncodeTarget,
    octx: &mut format::context::Output,
) -> RecodeResult<u64> {
    let source_time_base = input.decoder.time_base();
    let mut written = 0;
    let mut frame = frame::Audio::empty();
    loop {
        match classify_poll(input.decoder.receive_frame(&mut frame))? {
            CodecPoll::Produced => {
                let ts = frame.timestamp();
                frame.set_pts(ts.map(|t| t.rescale(input.time_base, target.time_base)));
                written += encode_audio_frame(target, octx, Some(&frame), source_time_base)?;
            }
            CodecPoll::NeedsMoreInput | CodecPoll::EndOfStream => break,
        }
    }
    Ok(written)
}

/// Feed one frame (or the EOF flush signal, when `frame` is `None`) to the
/// video encoder and write out everything it produces
fn encode_video_frame(
    target: &mut VideoEncodeTarget,
    octx: &mut format::context::Output,
    frame: Option<&frame::Video>,
    source_rate: Rational,
) -> RecodeResult<u64> {
    match frame {
        Some(f) => target.encoder.send_frame(f),
        None => target.encoder.send_eof(),
    }
    .map_err(|e| RecodeError::CodecProtocol {
        message: format!("video encoder rejected input: {}", e),
    })?;

    let mut written = 0;
    let mut encoded = Packet::empty();
    loop {
        match classify_poll(target.encoder.receive_packet(&mut encoded))? {
            CodecPoll::Produced => {
                encoded.set_stream(target.stream_index);
                let ost_time_base = output_time_base(octx, target.stream_index)?;
                encoded.rescale_ts(target.time_base, ost_time_base);
                if encoded.duration() == 0 {
                    // One frame, expressed in the output stream time base.
                    encoded.set_duration(1i64.rescale(source_rate.invert(), ost_time_base));
                }
                encoded.set_position(-1);
                encoded
                    .write_interleaved(octx)
                    .map_err(|e| RecodeError::PacketWrite {
                        message: e.to_string(),
                    })?;
                written += 1;
            }
            CodecPoll::NeedsMoreInput | CodecPoll::EndOfStream => break,
        }
    }

    trace!("video encoder produced {} packet(s)", written);
    Ok(written)
}

/// Audio counterpart of [`encode_video_frame`].
///
/// Sample-accurate sync follows the codec clock, so timestamps are rescaled
/// between the raw decoder and encoder time bases rather than the container
/// stream time bases.
fn encode_audio_frame(
    target: &mut AudioEncodeTarget,
    octx: &mut format::context::Output,
    frame: Option<&frame::Audio>,
    source_time_base: Rational,
) -> RecodeResult<u64> {
    match frame {
        Some(f) => target.encoder.send_frame(f),
        None => target.encoder.send_eof(),
    }
    .map_err(|e| RecodeError::CodecProtocol {
        message: format!("audio encoder rejected input: {}", e),
    })?;

    let mut written = 0;
    let mut encoded = Packet::empty();
    loop {
        match classify_poll(target.encoder.receive_packet(&mut encoded))? {
            CodecPoll::Produced => {
                encoded.set_stream(target.stream_index);
                encoded.rescale_ts(source_time_base, target.time_base);
                encoded.set_position(-1);
                encoded
                    .write_interleaved(octx)
                    .map_err(|e| RecodeError::PacketWrite {
                        message: e.to_string(),
                    })?;
                written += 1;
            }
            CodecPoll::NeedsMoreInput | CodecPoll::EndOfStream => break,
        }
    }

    trace!("audio encoder produced {} packet(s)", written);
    Ok(written)
}

fn output_time_base(octx: &format::context::Output, index: usize) -> RecodeResult<Rational> {
    octx.stream(index)
        .map(|s| s.time_base())
        .ok_or_else(|| RecodeError::PacketWrite {
            message: format!("no output stream at index {}", index),
        })
}
