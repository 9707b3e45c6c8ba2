//! Command-line argument definitions

use clap::Args;
use clap_num::si_number;

/// Arguments for the transcode command
#[derive(Args, Debug)]
pub struct TranscodeArgs {
    /// Input media file path
    pub input: String,

    /// Output media file path; the container format follows the extension
    pub output: String,

    /// Video encoder name used when the video stream is re-encoded
    #[arg(default_value = "libx264")]
    pub video_codec: String,

    /// Private codec option key (e.g. "x264-params")
    pub codec_opt_key: Option<String>,

    /// Private codec option value (e.g. "keyint=60:min-keyint=30")
    pub codec_opt_value: Option<String>,

    /// Copy the audio stream instead of re-encoding it
    #[arg(default_value_t = true, action = clap::ArgAction::Set)]
    pub copy_audio: bool,

    /// Copy the video stream instead of re-encoding it
    #[arg(default_value_t = false, action = clap::ArgAction::Set)]
    pub copy_video: bool,

    /// Audio encoder name used when the audio stream is re-encoded
    #[arg(long, default_value = "aac")]
    pub audio_codec: String,

    /// Muxer option passed to the container writer
    #[arg(long, num_args = 2, value_names = ["KEY", "VALUE"])]
    pub muxer_opt: Option<Vec<String>>,

    /// Video bit rate in bit/s, SI suffixes allowed (e.g. 3M)
    #[arg(long, value_parser = si_number::<usize>)]
    pub bitrate: Option<usize>,
}

/// Arguments for the remux command
#[derive(Args, Debug)]
pub struct RemuxArgs {
    /// Input media file path
    pub input: String,

    /// Output media file path; the container format follows the extension
    pub output: String,
}

/// Arguments for the inspect command
#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Input media file path
    pub input: String,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}
