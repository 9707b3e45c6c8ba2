//! Packet copy path and whole-file remuxer
//!
//! Copying never touches a codec: packets are rescaled into the output
//! stream's time base and handed to the interleaved writer unchanged.

use std::path::Path;

use ffmpeg_next::{codec, encoder, format, media, Packet};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::engine::context::CopyTarget;
use crate::error::{RecodeError, RecodeResult};

/// Rescale a packet into its output stream and submit it to the writer.
///
/// The output time base is read from the live stream because the muxer may
/// have replaced the one set before the header was written. The packet's
/// container position is unknown in the new container and cleared.
pub fn copy_packet(
    packet: &mut Packet,
    octx: &mut format::context::Output,
    target: &CopyTarget,
) -> RecodeResult<()> {
    let ost_time_base = octx
        .stream(target.stream_index)
        .map(|s| s.time_base())
        .ok_or_else(|| RecodeError::PacketWrite {
            message: format!("no output stream at index {}", target.stream_index),
        })?;

    packet.set_stream(target.stream_index);
    packet.rescale_ts(target.source_time_base, ost_time_base);
    packet.set_position(-1);
    packet
        .write_interleaved(octx)
        .map_err(|e| RecodeError::PacketWrite {
            message: e.to_string(),
        })
}

/// Counters describing a finished remux run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RemuxReport {
    /// Streams carried over into the output container
    pub streams_mapped: usize,
    /// Packets copied into the output
    pub packets_copied: u64,
    /// Packets belonging to dropped streams
    pub packets_dropped: u64,
}

/// Whole-file remuxer: changes the container without re-encoding payload.
///
/// Video, audio and subtitle streams are kept; every other stream type is
/// dropped. The output container format is inferred from the output path.
pub struct Remuxer;

impl Remuxer {
    pub fn new() -> Self {
        Self
    }

    /// Remux `input` into `output`, removing the output file on failure
    pub fn run(&self, input: &Path, output: &Path) -> RecodeResult<RemuxReport> {
        crate::init()?;

        let result = self.run_inner(input, output);
        if result.is_err() {
            let _ = std::fs::remove_file(output);
        }
        result
    }

    fn run_inner(&self, input: &Path, output: &Path) -> RecodeResult<RemuxReport> {
        let mut ictx = format::input(input).map_err(|e| RecodeError::OpenInput {
            path: input.display().to_string(),
            message: e.to_string(),
        })?;
        let mut octx = format::output(output).map_err(|e| RecodeError::OpenOutput {
            path: output.display().to_string(),
            message: e.to_string(),
        })?;

        // Input stream index -> copy target, None for dropped streams.
        let mut mapping: Vec<Option<CopyTarget>> = Vec::with_capacity(ictx.nb_streams() as usize);
        for stream in ictx.streams() {
            let medium = stream.parameters().medium();
            let keep = matches!(
                medium,
                media::Type::Video | media::Type::Audio | media::Type::Subtitle
            );
            if !keep {
                debug!("dropping stream {} ({:?})", stream.index(), medium);
                mapping.push(None);
                continue;
            }

            let mut ost = octx.add_stream(encoder::find(codec::Id::None))?;
            ost.set_parameters(stream.parameters());
            ost.set_time_base(stream.time_base());
            mapping.push(Some(CopyTarget {
                stream_index: ost.index(),
                source_time_base: stream.time_base(),
            }));
        }

        let streams_mapped = mapping.iter().flatten().count();
        if streams_mapped == 0 {
            return Err(RecodeError::MissingStream {
                kind: "audio, video or subtitle",
            });
        }

        octx.write_header().map_err(|e| RecodeError::HeaderWrite {
            message: e.to_string(),
        })?;

        let mut report = RemuxReport {
            streams_mapped,
            ..Default::default()
        };

        for (stream, mut packet) in ictx.packets() {
            match mapping.get(stream.index()).and_then(|t| t.as_ref()) {
                Some(target) => {
                    copy_packet(&mut packet, &mut octx, target)?;
                    report.packets_copied += 1;
                }
                None => report.packets_dropped += 1,
            }
        }

        octx.write_trailer().map_err(|e| RecodeError::TrailerWrite {
            message: e.to_string(),
        })?;

        info!(
            "remuxed {} stream(s), {} packet(s) copied, {} dropped",
            report.streams_mapped, report.packets_copied, report.packets_dropped
        );
        Ok(report)
    }
}

impl Default for Remuxer {
    fn default() -> Self {
        Self::new()
    }
}
