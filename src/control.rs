//! Control-rate side: turns knob positions into mixer parameters.

use crate::input::KnobSource;
use crate::synth::ControlParams;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

pub const KNOB_AMBIENT_GAIN: usize = 0;
pub const KNOB_CHORD_GROUP: usize = 1;
pub const KNOB_CHORD_IN_GROUP: usize = 2;
pub const KNOB_OSCILLATOR_GAIN: usize = 3;

/// Splits the chord table into equal groups picked by two knobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChordSelector {
    pub groups: u32,
    pub per_group: u32,
}

impl ChordSelector {
    pub fn new(groups: u32, per_group: u32) -> Self {
        Self {
            groups: groups.max(1),
            per_group: per_group.max(1),
        }
    }

    /// Maps a normalized knob onto `[0, count - 1]`.
    #[inline]
    pub fn bucket(normalized: f32, count: u32) -> u32 {
        let n = if normalized.is_nan() { 0.0 } else { normalized.clamp(0.0, 1.0) };
        (n * (count as f32 - 0.01)).floor() as u32
    }

    /// Returns `(group, chord_in_group, chord_index)`.
    ///
    /// The index saturates at `i32::MAX`; the mixer clamps it to the table anyway.
    pub fn select(&self, group_knob: f32, chord_knob: f32) -> (u32, u32, i32) {
        let group = Self::bucket(group_knob, self.groups);
        let chord = Self::bucket(chord_knob, self.per_group);
        let index = i64::from(group) * i64::from(self.per_group) + i64::from(chord);
        (group, chord, index.min(i64::from(i32::MAX)) as i32)
    }
}

impl Default for ChordSelector {
    fn default() -> Self {
        Self::new(3, 4)
    }
}

/// What one poll pushed into the parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KnobReading {
    pub ambient_gain: f32,
    pub group: u32,
    pub chord_in_group: u32,
    pub chord_index: i32,
    pub oscillator_gain: f32,
}

pub struct ControlLoop<K: KnobSource> {
    source: K,
    params: Arc<ControlParams>,
    selector: ChordSelector,
    poll_interval: Duration,
    status_every: u32,
    polls: u64,
}

impl<K: KnobSource> ControlLoop<K> {
    pub fn new(source: K, params: Arc<ControlParams>, selector: ChordSelector) -> Self {
        Self {
            source,
            params,
            selector,
            poll_interval: Duration::from_millis(10),
            status_every: 100,
            polls: 0,
        }
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn with_status_every(mut self, every: u32) -> Self {
        self.status_every = every;
        self
    }

    pub fn polls(&self) -> u64 {
        self.polls
    }

    /// Reads the knobs once and writes the three control parameters.
    pub fn poll_once(&mut self) -> KnobReading {
        let raw = self.source.read();
        let full_scale = f32::from(self.source.full_scale().max(1));
        let norm = |knob: usize| (f32::from(raw[knob]) / full_scale).min(1.0);

        let ambient_gain = norm(KNOB_AMBIENT_GAIN);
        let (group, chord_in_group, chord_index) =
            self.selector.select(norm(KNOB_CHORD_GROUP), norm(KNOB_CHORD_IN_GROUP));
        let oscillator_gain = norm(KNOB_OSCILLATOR_GAIN);

        self.params.set_ambient_gain(ambient_gain);
        self.params.set_selected_chord(chord_index);
        self.params.set_oscillator_gain(oscillator_gain);

        let reading = KnobReading {
            ambient_gain,
            group,
            chord_in_group,
            chord_index,
            oscillator_gain,
        };

        if self.status_every > 0 && self.polls % u64::from(self.status_every) == 0 {
            log::info!(
                "River Vol: {:.3} | Group: {} | Chord: {} | Total: {} | Sine Vol: {:.3}",
                reading.ambient_gain,
                reading.group,
                reading.chord_in_group,
                reading.chord_index,
                reading.oscillator_gain
            );
        }
        self.polls += 1;

        reading
    }

    /// Polls until `running` is cleared or the source asks to quit.
    pub fn run(&mut self, running: &AtomicBool) {
        while running.load(Ordering::Acquire) {
            self.poll_once();
            if self.source.quit_requested() {
                log::info!("Quit requested from knob source");
                running.store(false, Ordering::Release);
                break;
            }
            std::thread::sleep(self.poll_interval);
        }
    }
}
