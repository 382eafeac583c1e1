//! WAV 时长探测 - 基于 symphonia
//!
//! 只读取容器头，不解码 PCM

use std::io::Cursor;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

/// 返回音频时长（毫秒），无法识别时为 None
pub fn probe_duration_ms(data: &[u8]) -> Option<u64> {
    let cursor = Cursor::new(data.to_vec());
    let mss = MediaSourceStream::new(Box::new(cursor), Default::default());

    let mut hint = Hint::new();
    hint.with_extension("wav");

    let probed = symphonia::default::get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|e| tracing::debug!(error = %e, "Audio probe failed"))
        .ok()?;

    let track = probed.format.default_track()?;
    let sample_rate = track.codec_params.sample_rate.filter(|r| *r > 0)?;
    let frames = track.codec_params.n_frames?;

    Some(frames * 1000 / sample_rate as u64)
}
