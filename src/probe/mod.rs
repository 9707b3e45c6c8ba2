//! Media probing module
//!
//! ffprobe-style container and stream inspection used by the `inspect`
//! command.

use serde::{Deserialize, Serialize};

pub mod inspector;

pub use inspector::MediaInspector;

/// Video stream information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoStreamInfo {
    pub index: usize,
    pub codec: String,
    pub width: u32,
    pub height: u32,
    pub frame_rate: f64,
    /// Time base as "num/den"
    pub time_base: String,
}

/// Audio stream information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioStreamInfo {
    pub index: usize,
    pub codec: String,
    pub sample_rate: u32,
    pub channels: u32,
    /// Time base as "num/den"
    pub time_base: String,
}

/// Complete media file information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaInfo {
    pub file_path: String,
    /// Container format name, e.g. "mov,mp4,m4a,3gp,3g2,mj2"
    pub format: String,
    /// Duration in seconds; None if the container does not know it
    pub duration: Option<f64>,
    /// Overall bit rate in bit/s; 0 if unknown
    pub bit_rate: i64,
    pub video_streams: Vec<VideoStreamInfo>,
    pub audio_streams: Vec<AudioStreamInfo>,
    /// Count of streams that are neither audio nor video
    pub other_streams: usize,
}

impl MediaInfo {
    /// Total number of streams in the container
    pub fn total_streams(&self) -> usize {
        self.video_streams.len() + self.audio_streams.len() + self.other_streams
    }
}
