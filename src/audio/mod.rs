mod cpal_backend;
pub mod loader;
pub mod render;

pub use self::cpal_backend::CpalBackend;
pub use self::loader::{load_ambient, AmbientClip};
pub use self::render::StreamRenderer;

use crate::error::Result;

/// Owns the periodic callback that pulls buffers from the mixer.
pub trait AudioBackend {
    fn start(&mut self) -> Result<()>;
    fn stop(&mut self);
}

/// What the stream driver asks the device for.
#[derive(Debug, Clone)]
pub struct StreamSettings {
    pub sample_rate: u32,
    pub buffer_frames: u32,
    pub device_name: Option<String>,
}

impl Default for StreamSettings {
    fn default() -> Self {
        Self {
            sample_rate: 44_100,
            buffer_frames: 256,
            device_name: None,
        }
    }
}
