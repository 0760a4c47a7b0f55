use crate::error::{HemiError, Result};
use crate::synth::{Chord, ChordTable, DEFAULT_PARTIAL_WEIGHT};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KnobKind {
    Keyboard,
    Midi,
    Mcp3008,
}

/// Runtime configuration. Every field has a default, so a config file only
/// needs the values it changes.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HemiConfig {
    pub ambient_path: PathBuf,
    pub sample_rate: u32,
    pub buffer_frames: u32,
    /// Substring of the output device name; default device when unset.
    pub output_device: Option<String>,
    pub poll_interval_ms: u64,
    /// Log a status line every this many polls (0 disables it).
    pub status_every: u32,
    pub ambient_gain: f32,
    pub oscillator_gain: f32,
    pub partial_weight: f32,
    pub knobs: KnobKind,
    pub midi_port: Option<usize>,
    pub midi_controllers: [u8; 4],
    pub spi_device: PathBuf,
    pub spi_speed_hz: u32,
    pub chord_groups: u32,
    pub chords_per_group: u32,
    pub chords: Option<Vec<Chord>>,
}

impl HemiConfig {
    pub fn from_json(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn validate(&self) -> Result<()> {
        if self.sample_rate == 0 {
            return Err(HemiError::InvalidConfig("sample_rate must be positive".into()));
        }
        if self.buffer_frames == 0 {
            return Err(HemiError::InvalidConfig("buffer_frames must be positive".into()));
        }
        if self.poll_interval_ms == 0 {
            return Err(HemiError::InvalidConfig("poll_interval_ms must be positive".into()));
        }
        if self.chord_groups == 0 || self.chords_per_group == 0 {
            return Err(HemiError::InvalidConfig(
                "chord_groups and chords_per_group must be positive".into(),
            ));
        }
        let slots = self.chord_groups.checked_mul(self.chords_per_group);
        if slots.map_or(true, |n| i32::try_from(n).is_err()) {
            return Err(HemiError::InvalidConfig(format!(
                "{} groups of {} chords overflows the chord index",
                self.chord_groups, self.chords_per_group
            )));
        }
        if self.spi_speed_hz == 0 {
            return Err(HemiError::InvalidConfig("spi_speed_hz must be positive".into()));
        }
        if !self.partial_weight.is_finite() {
            return Err(HemiError::InvalidConfig("partial_weight must be finite".into()));
        }
        self.chord_table().map(|_| ())
    }

    /// The configured chord table, or the built-in one.
    pub fn chord_table(&self) -> Result<ChordTable> {
        match &self.chords {
            Some(chords) => ChordTable::new(chords.clone()),
            None => Ok(ChordTable::hemi_sync()),
        }
    }

    /// Applies command-line flags on top of the loaded values.
    ///
    /// Accepts `--midi`, `--adc` and `--ambient <path>`; `--config` is consumed by the caller.
    pub fn apply_args(&mut self, args: &[String]) -> Result<()> {
        let mut iter = args.iter();
        while let Some(arg) = iter.next() {
            match arg.as_str() {
                "--midi" => self.knobs = KnobKind::Midi,
                "--adc" => self.knobs = KnobKind::Mcp3008,
                "--ambient" => {
                    let path = iter.next().ok_or_else(|| {
                        HemiError::InvalidArgument("--ambient needs a path".into())
                    })?;
                    self.ambient_path = PathBuf::from(path);
                }
                "--config" => {
                    iter.next();
                }
                other => {
                    return Err(HemiError::InvalidArgument(format!("unknown flag {}", other)));
                }
            }
        }
        Ok(())
    }
}

impl Default for HemiConfig {
    fn default() -> Self {
        Self {
            ambient_path: PathBuf::from("river2.wav"),
            sample_rate: 44_100,
            buffer_frames: 256,
            output_device: None,
            poll_interval_ms: 10,
            status_every: 100,
            ambient_gain: 0.5,
            oscillator_gain: 0.5,
            partial_weight: DEFAULT_PARTIAL_WEIGHT,
            knobs: KnobKind::Keyboard,
            midi_port: None,
            midi_controllers: [20, 21, 22, 23],
            spi_device: PathBuf::from("/dev/spidev0.0"),
            spi_speed_hz: 1_000_000,
            chord_groups: 3,
            chords_per_group: 4,
            chords: None,
        }
    }
}

/// Finds the value following `--config`, if any.
pub fn config_path(args: &[String]) -> Result<Option<PathBuf>> {
    match args.iter().position(|a| a == "--config") {
        Some(i) => args
            .get(i + 1)
            .map(|p| Some(PathBuf::from(p)))
            .ok_or_else(|| HemiError::InvalidArgument("--config needs a path".into())),
        None => Ok(None),
    }
}
