use crate::error::{HemiError, Result};
use serde::Deserialize;

/// A pair of partial-frequency lists, one per ear.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Chord {
    pub left: Vec<f32>,
    pub right: Vec<f32>,
}

impl Chord {
    pub fn new(left: &[f32], right: &[f32]) -> Self {
        Self {
            left: left.to_vec(),
            right: right.to_vec(),
        }
    }

    fn validate(&self, index: usize) -> Result<()> {
        if self.left.is_empty() || self.right.is_empty() {
            return Err(HemiError::InvalidConfig(format!(
                "chord {} needs at least one partial per channel",
                index
            )));
        }
        let bad = self
            .left
            .iter()
            .chain(self.right.iter())
            .find(|f| !f.is_finite() || **f <= 0.0);
        if let Some(freq) = bad {
            return Err(HemiError::InvalidConfig(format!(
                "chord {} has invalid frequency {}",
                index, freq
            )));
        }
        Ok(())
    }
}

/// Fixed catalog of chords, built once and never mutated.
#[derive(Debug, Clone)]
pub struct ChordTable {
    chords: Vec<Chord>,
}

impl ChordTable {
    pub fn new(chords: Vec<Chord>) -> Result<Self> {
        if chords.is_empty() {
            return Err(HemiError::InvalidConfig("chord table is empty".into()));
        }
        for (i, chord) in chords.iter().enumerate() {
            chord.validate(i)?;
        }
        Ok(Self { chords })
    }

    /// The built-in table: three groups of four chords
    /// (simple beats, complex stacks, mid-range stacks).
    pub fn hemi_sync() -> Self {
        let chords = vec![
            // Group 0: single-partial beats
            Chord::new(&[300.0], &[310.0]),
            Chord::new(&[300.0], &[316.0]),
            Chord::new(&[150.0], &[152.0]),
            Chord::new(&[150.0], &[156.0]),
            // Group 1
            Chord::new(
                &[88.2, 176.4, 441.0, 529.2, 705.6, 882.0],
                &[94.5, 183.4, 463.0, 592.2, 775.6, 922.0],
            ),
            Chord::new(
                &[272.2, 332.0, 421.3, 289.4, 367.5, 442.0, 295.7, 414.7],
                &[280.53, 340.03, 428.83, 297.23, 374.83, 449.83, 303.53, 422.53],
            ),
            Chord::new(&[110.0, 250.0, 400.0], &[117.83, 270.215, 438.0]),
            Chord::new(&[99.5, 202.7], &[101.0, 204.2]),
            // Group 2
            Chord::new(
                &[100.0, 200.0, 250.0, 300.0, 400.0, 500.0, 600.0],
                &[101.5, 204.0, 254.0, 304.0, 410.0, 510.1, 604.8],
            ),
            Chord::new(
                &[50.0, 400.0, 503.0, 600.0, 750.0, 900.0],
                &[50.8, 404.0, 507.2, 604.0, 754.0, 904.0],
            ),
            Chord::new(
                &[200.0, 250.0, 300.0, 600.0, 750.0, 900.0],
                &[204.0, 254.0, 304.0, 616.2, 765.9, 916.2],
            ),
            Chord::new(&[308.0, 500.0], &[322.0, 515.0]),
        ];
        Self { chords }
    }

    pub fn len(&self) -> usize {
        self.chords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chords.is_empty()
    }

    /// Panics on an index outside the table; resolve with `clamp_index` first.
    pub fn get(&self, index: usize) -> &Chord {
        &self.chords[index]
    }

    /// Maps any requested index onto `[0, len - 1]`.
    #[inline]
    pub fn clamp_index(&self, index: i32) -> usize {
        let last = self.chords.len() as i64 - 1;
        (index as i64).clamp(0, last) as usize
    }

    pub fn iter(&self) -> impl Iterator<Item = &Chord> {
        self.chords.iter()
    }

    /// Largest partial count in any chord, for either channel.
    pub fn max_partials(&self) -> usize {
        self.chords
            .iter()
            .map(|c| c.left.len().max(c.right.len()))
            .max()
            .unwrap_or(0)
    }
}

impl Default for ChordTable {
    fn default() -> Self {
        Self::hemi_sync()
    }
}
