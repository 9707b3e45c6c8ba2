//! Core transcoding engine module

use serde::{Deserialize, Serialize};

pub mod bridge;
pub mod context;
pub mod prepare;
pub mod remux;
pub mod transcoder;

/// Per-call stream configuration, immutable once a transcode starts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamParams {
    /// Remux the video stream instead of re-encoding it
    pub copy_video: bool,
    /// Remux the audio stream instead of re-encoding it
    pub copy_audio: bool,
    /// Encoder name used when transcoding video (e.g. "libx264")
    pub video_codec: String,
    /// Encoder name used when transcoding audio (e.g. "aac")
    pub audio_codec: String,
    /// Private codec option key (e.g. "x264-params")
    pub codec_opt_key: Option<String>,
    /// Private codec option value (e.g. "keyint=60:min-keyint=30")
    pub codec_opt_value: Option<String>,
    /// Muxer option key passed through to the container writer
    pub muxer_opt_key: Option<String>,
    /// Muxer option value
    pub muxer_opt_value: Option<String>,
    /// Video bit rate override in bit/s; falls back to the engine default
    pub video_bit_rate: Option<usize>,
}

impl Default for StreamParams {
    fn default() -> Self {
        Self {
            copy_video: false,
            copy_audio: true,
            video_codec: "libx264".to_string(),
            audio_codec: "aac".to_string(),
            codec_opt_key: None,
            codec_opt_value: None,
            muxer_opt_key: None,
            muxer_opt_value: None,
            video_bit_rate: None,
        }
    }
}

impl StreamParams {
    /// Private codec option as a pair, present only when both halves are set
    pub fn codec_option(&self) -> Option<(&str, &str)> {
        match (self.codec_opt_key.as_deref(), self.codec_opt_value.as_deref()) {
            (Some(k), Some(v)) if !k.is_empty() => Some((k, v)),
            _ => None,
        }
    }

    /// Muxer option as a pair, present only when both halves are set
    pub fn muxer_option(&self) -> Option<(&str, &str)> {
        match (self.muxer_opt_key.as_deref(), self.muxer_opt_value.as_deref()) {
            (Some(k), Some(v)) if !k.is_empty() => Some((k, v)),
            _ => None,
        }
    }
}

/// Counters describing what a finished pipeline run did
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TranscodeReport {
    /// Packets forwarded unchanged by the copy path
    pub packets_copied: u64,
    /// Packets produced by encoders and written out
    pub packets_encoded: u64,
    /// Packets belonging to dropped (non-audio/video) streams
    pub packets_dropped: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_params_match_cli_surface() {
        let params = StreamParams::default();
        assert!(params.copy_audio);
        assert!(!params.copy_video);
        assert_eq!(params.video_codec, "libx264");
        assert_eq!(params.audio_codec, "aac");
        assert!(params.codec_option().is_none());
        assert!(params.muxer_option().is_none());
    }

    #[test]
    fn test_codec_option_requires_both_halves() {
        let mut params = StreamParams {
            codec_opt_key: Some("x264-params".to_string()),
            ..Default::default()
        };
        assert!(params.codec_option().is_none());

        params.codec_opt_value = Some("keyint=60".to_string());
        assert_eq!(params.codec_option(), Some(("x264-params", "keyint=60")));

        params.codec_opt_key = Some(String::new());
        assert!(params.codec_option().is_none());
    }

    #[test]
    fn test_report_roundtrips_through_serde() {
        let report = TranscodeReport {
            packets_copied: 3,
            packets_encoded: 7,
            packets_dropped: 1,
        };
        let json = serde_json::to_string(&report).unwrap();
        let back: TranscodeReport = serde_json::from_str(&json).unwrap();
        assert_eq!(back.packets_encoded, 7);
    }
}
