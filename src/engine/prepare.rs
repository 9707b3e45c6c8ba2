//! Stream context preparation
//!
//! Classifies input streams, opens a decoder for the first video and first
//! audio stream, and builds the encode side: either a negotiated encoder
//! seeded from the decoder, or a copy target carrying the input stream's
//! codec parameters verbatim.

use ffmpeg_next::codec::{self, Compliance};
use ffmpeg_next::{encoder, format, media, ChannelLayout, Dictionary, Rational};
use tracing::{debug, warn};

use crate::engine::context::{
    AudioEncodeTarget, AudioInput, AudioOutput, CopyTarget, InputTracks, OutputTracks,
    VideoEncodeTarget, VideoInput, VideoOutput,
};
use crate::engine::StreamParams;
use crate::error::{RecodeError, RecodeResult};

/// Default video bit rate in bit/s
const VIDEO_BIT_RATE: usize = 3_000_000;
/// Default video rate-control buffer size
const VIDEO_RC_BUFFER_SIZE: i32 = 6_200_000;
/// Default video rate-control ceiling in bit/s
const VIDEO_RC_MAX_RATE: usize = 4_700_000;
/// Default video rate-control floor in bit/s
const VIDEO_RC_MIN_RATE: i64 = 3_000_000;
/// Encoder preset applied unless the private codec option overrides it
const VIDEO_PRESET: &str = "fast";

/// Default audio bit rate in bit/s
const AUDIO_BIT_RATE: usize = 196_000;

/// Open a decoder for the first video and first audio stream of the input.
///
/// Streams of any other media type are skipped; later streams of an already
/// selected type are skipped as well.
pub fn open_decoders(ictx: &format::context::Input) -> RecodeResult<InputTracks> {
    let mut video: Option<VideoInput> = None;
    let mut audio: Option<AudioInput> = None;

    for stream in ictx.streams() {
        let medium = stream.parameters().medium();
        match medium {
            media::Type::Video => {
                if video.is_some() {
                    debug!("stream {}: additional video stream, skipping", stream.index());
                    continue;
                }
                let codec_id = stream.parameters().id();
                let decoder = codec::context::Context::from_parameters(stream.parameters())?
                    .decoder()
                    .video()
                    .map_err(|e| decoder_error("video", codec_id, e))?;
                debug!(
                    "stream {}: video, {}x{}, decoding with {}",
                    stream.index(),
                    decoder.width(),
                    decoder.height(),
                    codec_name(codec_id)
                );
                video = Some(VideoInput {
                    stream_index: stream.index(),
                    time_base: stream.time_base(),
                    frame_rate: stream.rate(),
                    decoder,
                });
            }
            media::Type::Audio => {
                if audio.is_some() {
                    debug!("stream {}: additional audio stream, skipping", stream.index());
                    continue;
                }
                let codec_id = stream.parameters().id();
                let decoder = codec::context::Context::from_parameters(stream.parameters())?
                    .decoder()
                    .audio()
                    .map_err(|e| decoder_error("audio", codec_id, e))?;
                debug!(
                    "stream {}: audio, {} Hz, decoding with {}",
                    stream.index(),
                    decoder.rate(),
                    codec_name(codec_id)
                );
                audio = Some(AudioInput {
                    stream_index: stream.index(),
                    time_base: stream.time_base(),
                    decoder,
                });
            }
            _ => {
                debug!("stream {} is neither audio nor video, skipping", stream.index());
            }
        }
    }

    Ok(InputTracks { video, audio })
}

/// Build the encode side of the pipeline.
///
/// Output streams are created in the order their sources appear in the
/// input, so the two kept streams preserve their relative order.
pub fn prepare_outputs(
    octx: &mut format::context::Output,
    ictx: &format::context::Input,
    inputs: &InputTracks,
    params: &StreamParams,
) -> RecodeResult<OutputTracks> {
    // Must be read before add_stream borrows the output context.
    let global_header = octx
        .format()
        .flags()
        .contains(format::Flags::GLOBAL_HEADER);

    enum Lane<'a> {
        Video(&'a VideoInput),
        Audio(&'a AudioInput),
    }

    let mut lanes: Vec<(usize, Lane)> = Vec::new();
    if let Some(v) = &inputs.video {
        lanes.push((v.stream_index, Lane::Video(v)));
    }
    if let Some(a) = &inputs.audio {
        lanes.push((a.stream_index, Lane::Audio(a)));
    }
    lanes.sort_by_key(|(index, _)| *index);

    let mut video: Option<VideoOutput> = None;
    let mut audio: Option<AudioOutput> = None;

    for (_, lane) in lanes {
        match lane {
            Lane::Video(input) => {
                video = Some(if params.copy_video {
                    VideoOutput::Copy(prepare_copy(octx, ictx, input.stream_index)?)
                } else {
                    VideoOutput::Encode(prepare_video_encoder(octx, input, params, global_header)?)
                });
            }
            Lane::Audio(input) => {
                audio = Some(if params.copy_audio {
                    AudioOutput::Copy(prepare_copy(octx, ictx, input.stream_index)?)
                } else {
                    AudioOutput::Encode(prepare_audio_encoder(octx, input, params, global_header)?)
                });
            }
        }
    }

    if video.is_none() {
        if params.copy_video {
            warn!("input has no video stream, nothing to copy");
        } else {
            return Err(RecodeError::MissingStream { kind: "video" });
        }
    }
    if audio.is_none() {
        if params.copy_audio {
            warn!("input has no audio stream, nothing to copy");
        } else {
            return Err(RecodeError::MissingStream { kind: "audio" });
        }
    }

    Ok(OutputTracks { video, audio })
}

/// Create an output stream and negotiate a video encoder seeded from the decoder
fn prepare_video_encoder(
    octx: &mut format::context::Output,
    input: &VideoInput,
    params: &StreamParams,
    global_header: bool,
) -> RecodeResult<VideoEncodeTarget> {
    let codec = encoder::find_by_name(&params.video_codec).ok_or_else(|| {
        RecodeError::EncoderUnavailable {
            name: params.video_codec.clone(),
        }
    })?;

    let mut ost = octx.add_stream(codec)?;
    let stream_index = ost.index();

    let mut enc = codec::context::Context::new_with_codec(codec)
        .encoder()
        .video()
        .map_err(|e| RecodeError::CodecNegotiation {
            kind: "video encoder",
            message: e.to_string(),
        })?;

    let decoder = &input.decoder;
    enc.set_height(decoder.height());
    enc.set_width(decoder.width());
    enc.set_aspect_ratio(decoder.aspect_ratio());
    enc.set_format(select_pixel_format(codec, decoder.format()));

    enc.set_bit_rate(params.video_bit_rate.unwrap_or(VIDEO_BIT_RATE));
    enc.set_max_bit_rate(VIDEO_RC_MAX_RATE);
    // rc_buffer_size and rc_min_rate have no safe setters.
    unsafe {
        let ctx = enc.as_mut_ptr();
        (*ctx).rc_buffer_size = VIDEO_RC_BUFFER_SIZE;
        (*ctx).rc_min_rate = VIDEO_RC_MIN_RATE;
    }

    let time_base = input.frame_rate.invert();
    enc.set_frame_rate(Some(input.frame_rate));
    enc.set_time_base(time_base);

    if global_header {
        enc.set_flags(codec::Flags::GLOBAL_HEADER);
    }

    let mut opts = Dictionary::new();
    opts.set("preset", VIDEO_PRESET);
    if let Some((key, value)) = params.codec_option() {
        opts.set(key, value);
    }

    let opened = enc
        .open_with(opts)
        .map_err(|e| RecodeError::CodecNegotiation {
            kind: "video encoder",
            message: e.to_string(),
        })?;

    ost.set_time_base(time_base);
    ost.set_parameters(&opened);

    Ok(VideoEncodeTarget {
        stream_index,
        time_base,
        encoder: opened,
    })
}

/// Create an output stream and negotiate a stereo audio encoder
fn prepare_audio_encoder(
    octx: &mut format::context::Output,
    input: &AudioInput,
    params: &StreamParams,
    global_header: bool,
) -> RecodeResult<AudioEncodeTarget> {
    let codec = encoder::find_by_name(&params.audio_codec).ok_or_else(|| {
        RecodeError::EncoderUnavailable {
            name: params.audio_codec.clone(),
        }
    })?;

    let mut ost = octx.add_stream(codec)?;
    let stream_index = ost.index();

    let mut enc = codec::context::Context::new_with_codec(codec)
        .encoder()
        .audio()
        .map_err(|e| RecodeError::CodecNegotiation {
            kind: "audio encoder",
            message: e.to_string(),
        })?;

    let sample_rate = input.decoder.rate() as i32;
    let time_base = Rational::new(1, sample_rate);

    enc.set_rate(sample_rate);
    enc.set_channel_layout(ChannelLayout::STEREO);
    enc.set_format(select_sample_format(codec).unwrap_or_else(|| input.decoder.format()));
    enc.set_bit_rate(AUDIO_BIT_RATE);
    enc.set_time_base(time_base);
    // Some encoders (notably the native aac) gate formats behind this.
    enc.compliance(Compliance::Experimental);

    if global_header {
        enc.set_flags(codec::Flags::GLOBAL_HEADER);
    }

    let opened = enc.open().map_err(|e| RecodeError::CodecNegotiation {
        kind: "audio encoder",
        message: e.to_string(),
    })?;

    ost.set_time_base(time_base);
    ost.set_parameters(&opened);

    Ok(AudioEncodeTarget {
        stream_index,
        time_base,
        encoder: opened,
    })
}

/// Create an output stream that copies the input stream's codec parameters
fn prepare_copy(
    octx: &mut format::context::Output,
    ictx: &format::context::Input,
    input_index: usize,
) -> RecodeResult<CopyTarget> {
    let ist = ictx
        .stream(input_index)
        .ok_or(RecodeError::MissingStream { kind: "copy source" })?;

    let mut ost = octx.add_stream(encoder::find(codec::Id::None))?;
    let stream_index = ost.index();
    ost.set_parameters(ist.parameters());
    ost.set_time_base(ist.time_base());

    Ok(CopyTarget {
        stream_index,
        source_time_base: ist.time_base(),
    })
}

/// Keep the decoder's pixel format when the encoder supports it, otherwise
/// fall back to the encoder's first supported format
fn select_pixel_format(codec: ffmpeg_next::Codec, decoded: format::Pixel) -> format::Pixel {
    match codec.video().ok().and_then(|v| v.formats()) {
        Some(formats) => {
            let supported: Vec<format::Pixel> = formats.collect();
            if supported.contains(&decoded) {
                decoded
            } else {
                supported.first().copied().unwrap_or(decoded)
            }
        }
        None => decoded,
    }
}

/// The encoder's first supported sample format, if it advertises any
fn select_sample_format(codec: ffmpeg_next::Codec) -> Option<format::Sample> {
    codec.audio().ok().and_then(|a| a.formats()).and_then(|mut f| f.next())
}

fn decoder_error(kind: &'static str, id: codec::Id, e: ffmpeg_next::Error) -> RecodeError {
    if matches!(e, ffmpeg_next::Error::DecoderNotFound) {
        RecodeError::DecoderUnavailable {
            codec: codec_name(id),
        }
    } else {
        RecodeError::CodecNegotiation {
            kind,
            message: e.to_string(),
        }
    }
}

fn codec_name(id: codec::Id) -> String {
    ffmpeg_next::decoder::find(id)
        .map(|c| c.name().to_string())
        .unwrap_or_else(|| format!("{:?}", id).to_lowercase())
}
