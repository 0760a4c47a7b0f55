use crate::error::Result;
use hound::{SampleFormat, WavReader};
use std::io::Read;
use std::path::Path;

/// A decoded ambient recording, always interleaved stereo.
#[derive(Debug, Clone)]
pub struct AmbientClip {
    pub samples: Vec<f32>,
    pub frames: usize,
    pub source_channels: u16,
    pub sample_rate: u32,
}

pub fn load_ambient(path: &Path) -> Result<AmbientClip> {
    let reader = WavReader::open(path)?;
    decode(reader)
}

/// Decodes any hound reader; split out so tests can feed in-memory WAVs.
pub fn decode<R: Read>(mut reader: WavReader<R>) -> Result<AmbientClip> {
    let spec = reader.spec();
    let raw: Vec<f32> = match spec.sample_format {
        SampleFormat::Float => reader.samples::<f32>().collect::<hound::Result<_>>()?,
        SampleFormat::Int => {
            let scale = (1i64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f32 / scale))
                .collect::<hound::Result<_>>()?
        }
    };

    let channels = spec.channels.max(1) as usize;
    let frames = raw.len() / channels;
    let mut samples = Vec::with_capacity(frames * 2);
    for frame in raw.chunks_exact(channels) {
        let left = frame[0];
        let right = if channels > 1 { frame[1] } else { frame[0] };
        samples.push(left);
        samples.push(right);
    }

    Ok(AmbientClip {
        samples,
        frames,
        source_channels: spec.channels,
        sample_rate: spec.sample_rate,
    })
}
