use super::ambient::AmbientLooper;
use super::oscillator::OscillatorBank;
use super::params::ControlParams;
use std::sync::Arc;

/// Parameter values read once at the top of a buffer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MixSnapshot {
    pub ambient_gain: f32,
    pub oscillator_gain: f32,
    pub chord_index: usize,
    pub sample_rate: f32,
}

/// Sums the oscillator bank and the ambient looper into stereo frames.
///
/// Owns all audio-rate state. Moved into the stream callback on start, so
/// nothing else touches phases or the ambient cursor while it runs.
pub struct Mixer {
    oscillators: OscillatorBank,
    ambient: AmbientLooper,
    params: Arc<ControlParams>,
}

impl Mixer {
    pub fn new(
        oscillators: OscillatorBank,
        ambient: AmbientLooper,
        params: Arc<ControlParams>,
    ) -> Self {
        Self {
            oscillators,
            ambient,
            params,
        }
    }

    pub fn params(&self) -> &Arc<ControlParams> {
        &self.params
    }

    pub fn oscillators(&self) -> &OscillatorBank {
        &self.oscillators
    }

    pub fn ambient(&self) -> &AmbientLooper {
        &self.ambient
    }

    /// Independent reads of each parameter, chord index clamped to the table.
    pub fn snapshot(&self) -> MixSnapshot {
        let chord = self.params.selected_chord();
        MixSnapshot {
            ambient_gain: self.params.ambient_gain(),
            oscillator_gain: self.params.oscillator_gain(),
            chord_index: self.oscillators.table().clamp_index(chord),
            sample_rate: self.params.sample_rate(),
        }
    }

    /// Fills `output` with interleaved stereo frames and returns the frame
    /// count (`output.len() / 2`). A trailing odd sample is zeroed.
    pub fn produce_buffer(&mut self, output: &mut [f32]) -> usize {
        let snap = self.snapshot();
        // A broken rate would turn every phase into NaN; keep the bank still instead.
        let oscillators_live = snap.sample_rate.is_finite() && snap.sample_rate > 0.0;

        let mut frames = output.chunks_exact_mut(2);
        let mut produced = 0;
        for frame in &mut frames {
            let (amb_l, amb_r) = self.ambient.next_frame();
            let (osc_l, osc_r) = if oscillators_live {
                self.oscillators
                    .sample_and_advance(snap.chord_index, snap.sample_rate)
            } else {
                (0.0, 0.0)
            };

            let left = amb_l * snap.ambient_gain + osc_l * snap.oscillator_gain;
            let right = amb_r * snap.ambient_gain + osc_r * snap.oscillator_gain;
            frame[0] = limit(left);
            frame[1] = limit(right);
            produced += 1;
        }
        for sample in frames.into_remainder() {
            *sample = 0.0;
        }
        produced
    }
}

/// Hard clamp to the output range; NaN becomes silence.
#[inline]
fn limit(sample: f32) -> f32 {
    if sample.is_nan() {
        0.0
    } else {
        sample.clamp(-1.0, 1.0)
    }
}
