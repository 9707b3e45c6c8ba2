//! Media file inspector backed by the FFmpeg demuxer

use std::path::Path;

use ffmpeg_next::{codec, format, media};

use crate::error::{RecodeError, RecodeResult};
use crate::probe::{AudioStreamInfo, MediaInfo, VideoStreamInfo};

/// Probes media files for container and stream information
pub struct MediaInspector;

impl MediaInspector {
    pub fn new() -> RecodeResult<Self> {
        crate::init()?;
        Ok(Self)
    }

    /// Open `path` and collect container format, duration and per-stream info
    pub fn inspect(&self, path: &Path) -> RecodeResult<MediaInfo> {
        let ictx = format::input(path).map_err(|e| RecodeError::OpenInput {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        let format_name = ictx.format().name().to_string();
        let bit_rate = ictx.bit_rate();
        let duration = {
            let d = ictx.duration();
            if d == ffmpeg_next::ffi::AV_NOPTS_VALUE || d <= 0 {
                None
            } else {
                Some(d as f64 / f64::from(ffmpeg_next::ffi::AV_TIME_BASE))
            }
        };

        let mut video_streams = Vec::new();
        let mut audio_streams = Vec::new();
        let mut other_streams = 0;

        for stream in ictx.streams() {
            let params = stream.parameters();
            let time_base = stream.time_base();
            match params.medium() {
                media::Type::Video => {
                    let (width, height) = video_size(&params);
                    video_streams.push(VideoStreamInfo {
                        index: stream.index(),
                        codec: codec_name(params.id()),
                        width,
                        height,
                        frame_rate: f64::from(stream.rate()),
                        time_base: format!(
                            "{}/{}",
                            time_base.numerator(),
                            time_base.denominator()
                        ),
                    });
                }
                media::Type::Audio => {
                    let (sample_rate, channels) = audio_layout(&params);
                    audio_streams.push(AudioStreamInfo {
                        index: stream.index(),
                        codec: codec_name(params.id()),
                        sample_rate,
                        channels,
                        time_base: format!(
                            "{}/{}",
                            time_base.numerator(),
                            time_base.denominator()
                        ),
                    });
                }
                _ => other_streams += 1,
            }
        }

        Ok(MediaInfo {
            file_path: path.display().to_string(),
            format: format_name,
            duration,
            bit_rate,
            video_streams,
            audio_streams,
            other_streams,
        })
    }
}

/// Reads video width/height from codec parameters (not exposed by ffmpeg-next)
fn video_size(params: &codec::Parameters) -> (u32, u32) {
    unsafe {
        let ptr = params.as_ptr();
        let w = (*ptr).width;
        let h = (*ptr).height;
        (w.max(0) as u32, h.max(0) as u32)
    }
}

/// Reads audio sample rate and channel count from codec parameters
fn audio_layout(params: &codec::Parameters) -> (u32, u32) {
    unsafe {
        let ptr = params.as_ptr();
        let sample_rate = (*ptr).sample_rate;
        let channels = (*ptr).ch_layout.nb_channels;
        (sample_rate.max(0) as u32, channels.max(0) as u32)
    }
}

fn codec_name(id: codec::Id) -> String {
    ffmpeg_next::decoder::find(id)
        .map(|c| c.name().to_string())
        .unwrap_or_else(|| format!("{:?}", id).to_lowercase())
}
