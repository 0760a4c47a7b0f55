pub mod audio;
pub mod config;
pub mod control;
pub mod error;
pub mod input;
pub mod runtime;
pub mod synth;

pub use error::{HemiError, Result};
