//! Pipeline orchestrator
//!
//! Owns the end-to-end lifecycle of one transcode call: open, prepare,
//! read loop, flush, trailer. Both stream contexts live on this call's
//! stack and are released on every exit path; a failed call additionally
//! removes the partially written output file.

use std::path::Path;

use ffmpeg_next::{format, Dictionary};
use tracing::{debug, info, trace};

use crate::engine::context::{AudioOutput, VideoOutput};
use crate::engine::{bridge, prepare, remux, StreamParams, TranscodeReport};
use crate::error::{RecodeError, RecodeResult};

/// One-shot transcoding pipeline configured by [`StreamParams`]
pub struct Transcoder {
    params: StreamParams,
}

impl Transcoder {
    pub fn new(params: StreamParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &StreamParams {
        &self.params
    }

    /// Transcode `input` into `output`.
    ///
    /// There is no partial success: any failure aborts the call and the
    /// output file is removed so no finalized container bytes remain.
    pub fn run(&self, input: &Path, output: &Path) -> RecodeResult<TranscodeReport> {
        crate::init()?;

        let result = self.run_inner(input, output);
        if result.is_err() {
            let _ = std::fs::remove_file(output);
        }
        result
    }

    fn run_inner(&self, input: &Path, output: &Path) -> RecodeResult<TranscodeReport> {
        info!("transcoding {} -> {}", input.display(), output.display());
        debug!("stream parameters: {:?}", self.params);

        let mut ictx = format::input(input).map_err(|e| RecodeError::OpenInput {
            path: input.display().to_string(),
            message: e.to_string(),
        })?;

        let mut inputs = prepare::open_decoders(&ictx)?;

        let mut octx = format::output(output).map_err(|e| RecodeError::OpenOutput {
            path: output.display().to_string(),
            message: e.to_string(),
        })?;

        let mut outputs = prepare::prepare_outputs(&mut octx, &ictx, &inputs, &self.params)?;

        write_header(&mut octx, &self.params)?;

        let video_index = inputs.video_index();
        let audio_index = inputs.audio_index();
        let mut report = TranscodeReport::default();

        for (stream, mut packet) in ictx.packets() {
            let index = stream.index();
            if Some(index) == video_index {
                match (&mut inputs.video, &mut outputs.video) {
                    (_, Some(VideoOutput::Copy(target))) => {
                        remux::copy_packet(&mut packet, &mut octx, target)?;
                        report.packets_copied += 1;
                    }
                    (Some(input), Some(VideoOutput::Encode(target))) => {
                        report.packets_encoded +=
                            bridge::transcode_video_packet(input, target, &mut octx, &packet)?;
                    }
                    _ => {}
                }
            } else if Some(index) == audio_index {
                match (&mut inputs.audio, &mut outputs.audio) {
                    (_, Some(AudioOutput::Copy(target))) => {
                        remux::copy_packet(&mut packet, &mut octx, target)?;
                        report.packets_copied += 1;
                    }
                    (Some(input), Some(AudioOutput::Encode(target))) => {
                        report.packets_encoded +=
                            bridge::transcode_audio_packet(input, target, &mut octx, &packet)?;
                    }
                    _ => {}
                }
            } else {
                trace!("dropping packet from stream {}", index);
                report.packets_dropped += 1;
            }
        }

        // One flush per active encoder; copy lanes have nothing buffered.
        if let (Some(input), Some(VideoOutput::Encode(target))) =
            (&mut inputs.video, &mut outputs.video)
        {
            report.packets_encoded += bridge::flush_video(input, target, &mut octx)?;
        }
        if let (Some(input), Some(AudioOutput::Encode(target))) =
            (&mut inputs.audio, &mut outputs.audio)
        {
            report.packets_encoded += bridge::flush_audio(input, target, &mut octx)?;
        }

        octx.write_trailer().map_err(|e| RecodeError::TrailerWrite {
            message: e.to_string(),
        })?;

        info!(
            "transcode complete: {} packet(s) encoded, {} copied, {} dropped",
            report.packets_encoded, report.packets_copied, report.packets_dropped
        );
        Ok(report)
    }
}

/// Write the container header, passing the muxer option through when set
fn write_header(octx: &mut format::context::Output, params: &StreamParams) -> RecodeResult<()> {
    let result = match params.muxer_option() {
        Some((key, value)) => {
            let mut opts = Dictionary::new();
            opts.set(key, value);
            octx.write_header_with(opts).map(|_| ())
        }
        None => octx.write_header(),
    };

    result.map_err(|e| RecodeError::HeaderWrite {
        message: e.to_string(),
    })
}
