use crate::synth::Mixer;
use cpal::{FromSample, Sample};

/// Adapts the stereo mixer to whatever channel layout the device opened with.
///
/// The scratch buffer is sized once; callbacks larger than it are rendered in
/// several passes, so the audio thread never allocates.
pub struct StreamRenderer {
    mixer: Mixer,
    scratch: Vec<f32>,
    channels: usize,
}

impl StreamRenderer {
    pub fn new(mixer: Mixer, max_frames: usize, channels: usize) -> Self {
        Self {
            mixer,
            scratch: vec![0.0; max_frames.max(1) * 2],
            channels: channels.max(1),
        }
    }

    pub fn mixer(&self) -> &Mixer {
        &self.mixer
    }

    /// Fills one device buffer of interleaved samples.
    pub fn render<T: Sample + FromSample<f32>>(&mut self, data: &mut [T]) {
        let channels = self.channels;
        let max_frames = self.scratch.len() / 2;

        for chunk in data.chunks_mut(max_frames * channels) {
            let frames = chunk.len() / channels;
            let mixed = &mut self.scratch[..frames * 2];
            self.mixer.produce_buffer(mixed);

            let mut out_frames = chunk.chunks_exact_mut(channels);
            for (out, stereo) in (&mut out_frames).zip(mixed.chunks_exact(2)) {
                write_frame(out, stereo[0], stereo[1]);
            }
            for sample in out_frames.into_remainder() {
                *sample = T::EQUILIBRIUM;
            }
        }
    }
}

#[inline]
fn write_frame<T: Sample + FromSample<f32>>(out: &mut [T], left: f32, right: f32) {
    match out.len() {
        1 => out[0] = T::from_sample(0.5 * (left + right)),
        _ => {
            out[0] = T::from_sample(left);
            out[1] = T::from_sample(right);
            for extra in out[2..].iter_mut() {
                *extra = T::EQUILIBRIUM;
            }
        }
    }
}
