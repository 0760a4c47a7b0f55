mod fixed;
mod keyboard;
mod mcp3008;
mod midi;
pub use self::fixed::FixedKnobs;
pub use self::keyboard::KeyboardKnobs;
pub use self::mcp3008::{Mcp3008, SpiSettings};
pub use self::midi::MidiKnobs;

/// Number of knobs the control loop reads.
pub const KNOB_COUNT: usize = 4;

/// Raw knob positions in source units (`0..=full_scale`).
pub type KnobFrame = [u16; KNOB_COUNT];

/// Anything that can be polled for four knob positions.
pub trait KnobSource {
    fn read(&mut self) -> KnobFrame;

    /// Value a fully open knob reports.
    fn full_scale(&self) -> u16;

    fn quit_requested(&self) -> bool {
        false
    }
}

impl<K: KnobSource + ?Sized> KnobSource for Box<K> {
    fn read(&mut self) -> KnobFrame {
        (**self).read()
    }

    fn full_scale(&self) -> u16 {
        (**self).full_scale()
    }

    fn quit_requested(&self) -> bool {
        (**self).quit_requested()
    }
}
