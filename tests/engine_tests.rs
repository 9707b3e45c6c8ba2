//! Integration tests for the transcoding engine configuration surface

use recode_cli::cli::{Cli, Commands};
use recode_cli::engine::remux::RemuxReport;
use recode_cli::engine::{StreamParams, TranscodeReport};
use recode_cli::error::RecodeError;

use clap::Parser;

// Test utilities

/// Parse a full CLI invocation, panicking on parse errors
fn parse(args: &[&str]) -> Cli {
    Cli::try_parse_from(args).expect("CLI arguments should parse")
}

// Stream parameter tests

#[test]
fn test_default_stream_params() {
    let params = StreamParams::default();

    assert!(!params.copy_video);
    assert!(params.copy_audio);
    assert_eq!(params.video_codec, "libx264");
    assert_eq!(params.audio_codec, "aac");
    assert!(params.video_bit_rate.is_none());
}

#[test]
fn test_stream_params_clone_keeps_options() {
    let original = StreamParams {
        codec_opt_key: Some("x264-params".to_string()),
        codec_opt_value: Some("keyint=60".to_string()),
        muxer_opt_key: Some("movflags".to_string()),
        muxer_opt_value: Some("faststart".to_string()),
        ..Default::default()
    };

    let cloned = original.clone();
    assert_eq!(cloned.codec_option(), Some(("x264-params", "keyint=60")));
    assert_eq!(cloned.muxer_option(), Some(("movflags", "faststart")));
}

#[test]
fn test_stream_params_serde_round_trip() {
    let params = StreamParams {
        copy_video: true,
        video_bit_rate: Some(4_500_000),
        ..Default::default()
    };

    let json = serde_json::to_string(&params).unwrap();
    let back: StreamParams = serde_json::from_str(&json).unwrap();
    assert!(back.copy_video);
    assert_eq!(back.video_bit_rate, Some(4_500_000));
}

// CLI surface tests

#[test]
fn test_transcode_cli_defaults() {
    let cli = parse(&["recode", "transcode", "in.mkv", "out.mp4"]);

    match cli.command {
        Commands::Transcode(args) => {
            assert_eq!(args.input, "in.mkv");
            assert_eq!(args.output, "out.mp4");
            assert_eq!(args.video_codec, "libx264");
            assert_eq!(args.audio_codec, "aac");
            assert!(args.copy_audio);
            assert!(!args.copy_video);
            assert!(args.codec_opt_key.is_none());
        }
        _ => panic!("expected transcode command"),
    }
}

#[test]
fn test_transcode_cli_full_positional_surface() {
    let cli = parse(&[
        "recode",
        "transcode",
        "in.mkv",
        "out.mp4",
        "libx265",
        "x265-params",
        "keyint=48",
        "false",
        "true",
    ]);

    match cli.command {
        Commands::Transcode(args) => {
            assert_eq!(args.video_codec, "libx265");
            assert_eq!(args.codec_opt_key.as_deref(), Some("x265-params"));
            assert_eq!(args.codec_opt_value.as_deref(), Some("keyint=48"));
            assert!(!args.copy_audio);
            assert!(args.copy_video);
        }
        _ => panic!("expected transcode command"),
    }
}

#[test]
fn test_transcode_cli_bitrate_si_suffix() {
    let cli = parse(&[
        "recode",
        "transcode",
        "in.mkv",
        "out.mp4",
        "--bitrate",
        "3M",
    ]);

    match cli.command {
        Commands::Transcode(args) => assert_eq!(args.bitrate, Some(3_000_000)),
        _ => panic!("expected transcode command"),
    }
}

#[test]
fn test_transcode_cli_muxer_opt_takes_key_value() {
    let cli = parse(&[
        "recode",
        "transcode",
        "in.mkv",
        "out.mp4",
        "--muxer-opt",
        "movflags",
        "faststart",
    ]);

    match cli.command {
        Commands::Transcode(args) => {
            let pair = args.muxer_opt.expect("muxer option should be present");
            assert_eq!(pair, vec!["movflags".to_string(), "faststart".to_string()]);
        }
        _ => panic!("expected transcode command"),
    }
}

#[test]
fn test_remux_and_inspect_cli_parse() {
    let cli = parse(&["recode", "remux", "in.mkv", "out.mp4"]);
    assert!(matches!(cli.command, Commands::Remux(_)));

    let cli = parse(&["recode", "inspect", "in.mp4", "--json"]);
    match cli.command {
        Commands::Inspect(args) => assert!(args.json),
        _ => panic!("expected inspect command"),
    }
}

#[test]
fn test_transcode_cli_rejects_missing_output() {
    let result = Cli::try_parse_from(["recode", "transcode", "in.mkv"]);
    assert!(result.is_err());
}

// Report tests

#[test]
fn test_reports_start_empty() {
    let report = TranscodeReport::default();
    assert_eq!(report.packets_encoded, 0);
    assert_eq!(report.packets_copied, 0);
    assert_eq!(report.packets_dropped, 0);

    let report = RemuxReport::default();
    assert_eq!(report.streams_mapped, 0);
    assert_eq!(report.packets_copied, 0);
}

// Error taxonomy tests

#[test]
fn test_error_variants_cover_the_failure_taxonomy() {
    let open = RecodeError::OpenInput {
        path: "a.mp4".to_string(),
        message: "denied".to_string(),
    };
    let classify = RecodeError::MissingStream { kind: "video" };
    let protocol = RecodeError::CodecProtocol {
        message: "broken".to_string(),
    };
    let write = RecodeError::PacketWrite {
        message: "sink closed".to_string(),
    };

    for err in [open, classify, protocol, write] {
        assert!(!err.to_string().is_empty());
    }
}
