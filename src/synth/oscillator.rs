use super::chord::ChordTable;
use core::f32::consts::TAU;

/// Weight of a single partial before the oscillator gain is applied.
pub const DEFAULT_PARTIAL_WEIGHT: f32 = 0.1;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Channel {
    Left,
    Right,
}

/// Phase accumulators for every partial of one chord.
#[derive(Clone, Debug)]
struct ChordPhases {
    left: Vec<f32>,
    right: Vec<f32>,
}

/// Sine partial generator for the whole chord table.
///
/// Phase state is allocated for every chord up front, so switching chords
/// never allocates and a deselected chord resumes exactly where it stopped.
pub struct OscillatorBank {
    table: ChordTable,
    phases: Vec<ChordPhases>,
    partial_weight: f32,
}

impl OscillatorBank {
    pub fn new(table: ChordTable) -> Self {
        Self::with_partial_weight(table, DEFAULT_PARTIAL_WEIGHT)
    }

    pub fn with_partial_weight(table: ChordTable, partial_weight: f32) -> Self {
        let phases = table
            .iter()
            .map(|chord| ChordPhases {
                left: vec![0.0; chord.left.len()],
                right: vec![0.0; chord.right.len()],
            })
            .collect();
        Self {
            table,
            phases,
            partial_weight,
        }
    }

    pub fn table(&self) -> &ChordTable {
        &self.table
    }

    /// Evaluates every partial of `chord_index` at its current phase, then
    /// advances those phases by one frame. Other chords are untouched.
    ///
    /// `chord_index` must already be within the table.
    #[inline]
    pub fn sample_and_advance(&mut self, chord_index: usize, sample_rate: f32) -> (f32, f32) {
        let chord = self.table.get(chord_index);
        let phases = &mut self.phases[chord_index];
        let left = Self::run_partials(&chord.left, &mut phases.left, sample_rate);
        let right = Self::run_partials(&chord.right, &mut phases.right, sample_rate);
        (left * self.partial_weight, right * self.partial_weight)
    }

    #[inline]
    fn run_partials(freqs: &[f32], phases: &mut [f32], sample_rate: f32) -> f32 {
        let mut sum = 0.0;
        for (freq, phase) in freqs.iter().zip(phases.iter_mut()) {
            sum += phase.sin();
            *phase = (*phase + TAU * freq / sample_rate).rem_euclid(TAU);
        }
        sum
    }

    /// Current phase of one partial, or `None` if it doesn't exist.
    pub fn phase(&self, chord_index: usize, channel: Channel, partial: usize) -> Option<f32> {
        let phases = self.phases.get(chord_index)?;
        match channel {
            Channel::Left => phases.left.get(partial).copied(),
            Channel::Right => phases.right.get(partial).copied(),
        }
    }

    pub fn partial_weight(&self) -> f32 {
        self.partial_weight
    }
}
