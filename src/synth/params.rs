//! Control parameters shared between the control loop and the audio callback.
//!
//! Each field is its own atomic. Writers update them one at a time, so the
//! audio side may see a mix of old and new values for one buffer.

use atomic_float::AtomicF32;
use std::sync::atomic::{AtomicI32, Ordering};

pub const DEFAULT_SAMPLE_RATE: f32 = 44_100.0;

#[derive(Debug)]
pub struct ControlParams {
    ambient_gain: AtomicF32,
    oscillator_gain: AtomicF32,
    selected_chord: AtomicI32,
    sample_rate: AtomicF32,
}

impl ControlParams {
    pub fn new(ambient_gain: f32, oscillator_gain: f32, sample_rate: f32) -> Self {
        Self {
            ambient_gain: AtomicF32::new(ambient_gain),
            oscillator_gain: AtomicF32::new(oscillator_gain),
            selected_chord: AtomicI32::new(0),
            sample_rate: AtomicF32::new(sample_rate),
        }
    }

    #[inline]
    pub fn set_ambient_gain(&self, gain: f32) {
        self.ambient_gain.store(gain, Ordering::Release);
    }

    #[inline]
    pub fn set_oscillator_gain(&self, gain: f32) {
        self.oscillator_gain.store(gain, Ordering::Release);
    }

    /// Not range-checked; the mixer clamps on read.
    #[inline]
    pub fn set_selected_chord(&self, index: i32) {
        self.selected_chord.store(index, Ordering::Release);
    }

    #[inline]
    pub fn set_sample_rate(&self, sample_rate: f32) {
        self.sample_rate.store(sample_rate, Ordering::Release);
    }

    #[inline]
    pub fn ambient_gain(&self) -> f32 {
        self.ambient_gain.load(Ordering::Acquire)
    }

    #[inline]
    pub fn oscillator_gain(&self) -> f32 {
        self.oscillator_gain.load(Ordering::Acquire)
    }

    #[inline]
    pub fn selected_chord(&self) -> i32 {
        self.selected_chord.load(Ordering::Acquire)
    }

    #[inline]
    pub fn sample_rate(&self) -> f32 {
        self.sample_rate.load(Ordering::Acquire)
    }
}

impl Default for ControlParams {
    fn default() -> Self {
        Self::new(0.5, 0.5, DEFAULT_SAMPLE_RATE)
    }
}
