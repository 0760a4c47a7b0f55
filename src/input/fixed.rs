use super::{KnobFrame, KnobSource};

/// Knobs that never move. Useful for headless runs.
#[derive(Debug, Clone)]
pub struct FixedKnobs {
    values: KnobFrame,
    full_scale: u16,
}

impl FixedKnobs {
    pub fn new(values: KnobFrame, full_scale: u16) -> Self {
        Self { values, full_scale }
    }

    pub fn set(&mut self, knob: usize, value: u16) {
        if let Some(slot) = self.values.get_mut(knob) {
            *slot = value.min(self.full_scale);
        }
    }
}

impl KnobSource for FixedKnobs {
    fn read(&mut self) -> KnobFrame {
        self.values
    }

    fn full_scale(&self) -> u16 {
        self.full_scale
    }
}
