//! Command implementations

use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use crate::cli::args::{InspectArgs, RemuxArgs, TranscodeArgs};
use crate::engine::remux::Remuxer;
use crate::engine::transcoder::Transcoder;
use crate::engine::StreamParams;
use crate::probe::{MediaInfo, MediaInspector};

/// Execute the transcode command
pub fn transcode(args: TranscodeArgs) -> Result<()> {
    info!("Starting transcode operation");
    info!("Input: {}", args.input);
    info!("Output: {}", args.output);
    info!("Video codec: {} (copy: {})", args.video_codec, args.copy_video);
    info!("Audio codec: {} (copy: {})", args.audio_codec, args.copy_audio);

    // Validate input file exists
    if !Path::new(&args.input).exists() {
        return Err(anyhow::anyhow!("Input file does not exist: {}", args.input));
    }

    let (muxer_opt_key, muxer_opt_value) = match &args.muxer_opt {
        Some(pair) => (pair.first().cloned(), pair.get(1).cloned()),
        None => (None, None),
    };

    let params = StreamParams {
        copy_video: args.copy_video,
        copy_audio: args.copy_audio,
        video_codec: args.video_codec,
        audio_codec: args.audio_codec,
        codec_opt_key: args.codec_opt_key,
        codec_opt_value: args.codec_opt_value,
        muxer_opt_key,
        muxer_opt_value,
        video_bit_rate: args.bitrate,
    };

    let transcoder = Transcoder::new(params);
    let report = transcoder
        .run(Path::new(&args.input), Path::new(&args.output))
        .context("Failed to transcode input file")?;

    info!(
        "Transcode completed: {} packet(s) encoded, {} copied, {} dropped",
        report.packets_encoded, report.packets_copied, report.packets_dropped
    );
    Ok(())
}

/// Execute the remux command
pub fn remux(args: RemuxArgs) -> Result<()> {
    info!("Starting remux operation");
    info!("Input: {}", args.input);
    info!("Output: {}", args.output);

    // Validate input file exists
    if !Path::new(&args.input).exists() {
        return Err(anyhow::anyhow!("Input file does not exist: {}", args.input));
    }

    let remuxer = Remuxer::new();
    let report = remuxer
        .run(Path::new(&args.input), Path::new(&args.output))
        .context("Failed to remux input file")?;

    info!(
        "Remux completed: {} stream(s) kept, {} packet(s) copied",
        report.streams_mapped, report.packets_copied
    );
    Ok(())
}

/// Execute the inspect command
pub fn inspect(args: InspectArgs) -> Result<()> {
    info!("Starting inspect operation");
    info!("Input: {}", args.input);

    // Validate input file exists
    if !Path::new(&args.input).exists() {
        return Err(anyhow::anyhow!("Input file does not exist: {}", args.input));
    }

    let inspector = MediaInspector::new()?;
    let media_info = inspector
        .inspect(Path::new(&args.input))
        .context("Failed to inspect input file")?;

    if args.json {
        let json = serde_json::to_string_pretty(&media_info)
            .context("Failed to serialize media info to JSON")?;
        println!("{}", json);
    } else {
        display_media_info(&media_info);
    }

    Ok(())
}

/// Display media information in human-readable format
fn display_media_info(media_info: &MediaInfo) {
    println!("Media Information");
    println!("=================");
    println!("File: {}", media_info.file_path);
    println!("Format: {}", media_info.format);
    match media_info.duration {
        Some(duration) => println!("Duration: {:.3}s", duration),
        None => println!("Duration: unknown"),
    }
    println!("Bit Rate: {} bps", media_info.bit_rate);
    println!("Streams: {}", media_info.total_streams());
    println!();

    if !media_info.video_streams.is_empty() {
        println!("Video Streams:");
        for stream in &media_info.video_streams {
            println!(
                "  Stream {}: {}x{} @ {:.2} fps",
                stream.index, stream.width, stream.height, stream.frame_rate
            );
            println!("    Codec: {}", stream.codec);
            println!("    Time Base: {}", stream.time_base);
        }
        println!();
    }

    if !media_info.audio_streams.is_empty() {
        println!("Audio Streams:");
        for stream in &media_info.audio_streams {
            println!(
                "  Stream {}: {} Hz, {} channels",
                stream.index, stream.sample_rate, stream.channels
            );
            println!("    Codec: {}", stream.codec);
            println!("    Time Base: {}", stream.time_base);
        }
        println!();
    }

    if media_info.other_streams > 0 {
        println!("Other Streams: {}", media_info.other_streams);
    }
}
