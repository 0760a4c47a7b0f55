//! Error types.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, HemiError>;

#[derive(Error, Debug)]
pub enum HemiError {
    #[error("Failed to read config file: {0}")]
    ConfigIo(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ConfigParse(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("No output device available")]
    NoOutputDevice,

    #[error("Failed to enumerate audio devices: {0}")]
    Devices(#[from] cpal::DevicesError),

    #[error("Failed to get default output config: {0}")]
    DefaultStreamConfig(#[from] cpal::DefaultStreamConfigError),

    #[error("Failed to query supported output configs: {0}")]
    SupportedStreamConfigs(#[from] cpal::SupportedStreamConfigsError),

    #[error("Failed to build audio stream: {0}")]
    BuildStream(#[from] cpal::BuildStreamError),

    #[error("Failed to start audio stream: {0}")]
    PlayStream(#[from] cpal::PlayStreamError),

    #[error("Unsupported sample format: {0:?}")]
    UnsupportedSampleFormat(cpal::SampleFormat),

    #[error("Audio backend already started")]
    AlreadyStarted,

    #[error("Failed to decode ambient file: {0}")]
    Ambient(#[from] hound::Error),

    #[error("Knob source unavailable: {0}")]
    Knobs(String),
}
