//! End-to-end tests for the recode CLI and pipeline
//!
//! Tests that need real media files follow the sample-file guard pattern:
//! they are `#[ignore]`d by default and return early when the sample is not
//! present next to the repository.

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

use recode_cli::engine::remux::Remuxer;
use recode_cli::engine::transcoder::Transcoder;
use recode_cli::engine::StreamParams;
use recode_cli::error::RecodeError;
use recode_cli::probe::MediaInspector;

/// Sample used by the ignored end-to-end tests
const SAMPLE_FILE: &str = "sample video.mp4";

fn recode() -> Command {
    Command::cargo_bin("recode").expect("binary should build")
}

/// Create a file that is not a valid media container
fn create_garbage_input(path: &Path) {
    fs::write(path, b"this is not a media file").unwrap();
}

// CLI exit-code tests

#[test]
fn test_no_arguments_prints_usage() {
    recode()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn test_transcode_rejects_missing_input() {
    recode()
        .args(["transcode", "/nonexistent/input.mp4", "/tmp/out.mp4"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("does not exist"));
}

#[test]
fn test_inspect_rejects_missing_input() {
    recode()
        .args(["inspect", "/nonexistent/input.mp4"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("does not exist"));
}

#[test]
fn test_transcode_unreadable_input_leaves_no_output() {
    let temp_dir = TempDir::new().unwrap();
    let input_path = temp_dir.path().join("input.mp4");
    let output_path = temp_dir.path().join("output.mp4");

    create_garbage_input(&input_path);

    recode()
        .args([
            "transcode",
            input_path.to_str().unwrap(),
            output_path.to_str().unwrap(),
        ])
        .assert()
        .failure();

    assert!(!output_path.exists());
}

#[test]
fn test_remux_unreadable_input_leaves_no_output() {
    let temp_dir = TempDir::new().unwrap();
    let input_path = temp_dir.path().join("input.mkv");
    let output_path = temp_dir.path().join("output.mp4");

    create_garbage_input(&input_path);

    recode()
        .args([
            "remux",
            input_path.to_str().unwrap(),
            output_path.to_str().unwrap(),
        ])
        .assert()
        .failure();

    assert!(!output_path.exists());
}

// Library-level failure tests

#[test]
fn test_transcoder_reports_open_failure() {
    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().join("output.mp4");

    let transcoder = Transcoder::new(StreamParams::default());
    let result = transcoder.run(Path::new("/nonexistent/input.mp4"), &output_path);

    assert!(matches!(result, Err(RecodeError::OpenInput { .. })));
    assert!(!output_path.exists());
}

#[test]
fn test_remuxer_reports_open_failure() {
    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().join("output.mp4");

    let remuxer = Remuxer::new();
    let result = remuxer.run(Path::new("/nonexistent/input.mkv"), &output_path);

    assert!(matches!(result, Err(RecodeError::OpenInput { .. })));
}

// End-to-end tests (require real video files)

#[test]
#[ignore] // Ignored by default since it requires real video files
fn test_transcode_video_copy_audio_end_to_end() {
    if !Path::new(SAMPLE_FILE).exists() {
        return; // Skip if sample file not available
    }

    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().join("output.mp4");

    let inspector = MediaInspector::new().unwrap();
    let input_info = inspector.inspect(Path::new(SAMPLE_FILE)).unwrap();

    let transcoder = Transcoder::new(StreamParams::default());
    let report = transcoder.run(Path::new(SAMPLE_FILE), &output_path).unwrap();

    assert!(output_path.exists());
    assert!(report.packets_encoded > 0);

    // Re-encoded video matches the requested codec; copied audio keeps the
    // input's codec parameters.
    let output_info = inspector.inspect(&output_path).unwrap();
    assert_eq!(output_info.video_streams.len(), 1);
    assert_eq!(output_info.video_streams[0].codec, "h264");
    assert_eq!(output_info.audio_streams.len(), 1);
    assert_eq!(
        output_info.audio_streams[0].codec,
        input_info.audio_streams[0].codec
    );
    assert_eq!(
        output_info.audio_streams[0].sample_rate,
        input_info.audio_streams[0].sample_rate
    );
}

#[test]
#[ignore] // Ignored by default since it requires real video files
fn test_unknown_encoder_fails_before_output_is_finalized() {
    if !Path::new(SAMPLE_FILE).exists() {
        return;
    }

    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().join("output.mp4");

    let params = StreamParams {
        video_codec: "no_such_encoder".to_string(),
        ..Default::default()
    };
    let transcoder = Transcoder::new(params);
    let result = transcoder.run(Path::new(SAMPLE_FILE), &output_path);

    assert!(matches!(result, Err(RecodeError::EncoderUnavailable { .. })));
    assert!(!output_path.exists());
}

#[test]
#[ignore] // Ignored by default since it requires real video files
fn test_flush_keeps_trailing_frames() {
    // 50-frame 25 fps sample: a missed flush would drop the frames still
    // buffered in the codecs and the count would come up short.
    let sample = "samples/countdown_50f_25fps.mp4";
    if !Path::new(sample).exists() {
        return;
    }

    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().join("output.mp4");

    let params = StreamParams {
        copy_audio: true,
        ..Default::default()
    };
    let transcoder = Transcoder::new(params);
    let report = transcoder.run(Path::new(sample), &output_path).unwrap();

    assert_eq!(report.packets_encoded, 50);
}

#[test]
#[ignore] // Ignored by default since it requires real video files
fn test_remux_is_deterministic() {
    if !Path::new(SAMPLE_FILE).exists() {
        return;
    }

    let temp_dir = TempDir::new().unwrap();
    let first = temp_dir.path().join("first.mp4");
    let second = temp_dir.path().join("second.mp4");

    let remuxer = Remuxer::new();
    remuxer.run(Path::new(SAMPLE_FILE), &first).unwrap();
    remuxer.run(Path::new(SAMPLE_FILE), &second).unwrap();

    // Same input and config produce byte-identical containers.
    assert_eq!(fs::read(&first).unwrap(), fs::read(&second).unwrap());
}

#[test]
#[ignore] // Ignored by default since it requires real video files
fn test_remux_drops_data_streams_and_keeps_order() {
    let sample = "samples/mixed_streams.mkv";
    if !Path::new(sample).exists() {
        return;
    }

    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().join("output.mkv");

    let remuxer = Remuxer::new();
    let report = remuxer.run(Path::new(sample), &output_path).unwrap();

    let inspector = MediaInspector::new().unwrap();
    let input_info = inspector.inspect(Path::new(sample)).unwrap();
    let output_info = inspector.inspect(&output_path).unwrap();

    // Audio and video survive, data streams do not.
    assert_eq!(
        output_info.video_streams.len(),
        input_info.video_streams.len()
    );
    assert_eq!(
        output_info.audio_streams.len(),
        input_info.audio_streams.len()
    );
    assert!(report.packets_dropped > 0 || input_info.other_streams == 0);
}
