pub mod ambient;
pub mod chord;
pub mod mixer;
pub mod oscillator;
pub mod params;

pub use ambient::AmbientLooper;
pub use chord::{Chord, ChordTable};
pub use mixer::{MixSnapshot, Mixer};
pub use oscillator::{Channel, OscillatorBank, DEFAULT_PARTIAL_WEIGHT};
pub use params::ControlParams;
