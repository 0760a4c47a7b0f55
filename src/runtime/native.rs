use crate::audio::{load_ambient, AudioBackend, CpalBackend, StreamSettings};
use crate::config::{HemiConfig, KnobKind};
use crate::control::{ChordSelector, ControlLoop};
use crate::error::Result;
use crate::input::{KeyboardKnobs, KnobSource, Mcp3008, MidiKnobs, SpiSettings};
use crate::synth::{AmbientLooper, ControlParams, Mixer, OscillatorBank};
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Duration;

/// Loads the ambient file, degrading to silence when it can't be read.
pub fn ambient_or_silence(path: &Path, stream_rate: u32) -> AmbientLooper {
    match load_ambient(path) {
        Ok(clip) => {
            log::info!(
                "Loaded ambient sound {}: {} frames, {} channels",
                path.display(),
                clip.frames,
                clip.source_channels
            );
            if clip.sample_rate != stream_rate {
                log::warn!(
                    "Ambient file is {} Hz but the stream runs at {} Hz; it will play off-speed",
                    clip.sample_rate,
                    stream_rate
                );
            }
            AmbientLooper::new(clip.samples)
        }
        Err(e) => {
            log::warn!(
                "Could not load {} ({}) - continuing without ambient sound",
                path.display(),
                e
            );
            AmbientLooper::silent()
        }
    }
}

/// Builds the mixer and its shared parameters from the config.
pub fn build_mixer(config: &HemiConfig, ambient: AmbientLooper) -> Result<Mixer> {
    let table = config.chord_table()?;
    log::info!(
        "Chord table: {} chords, up to {} partials per channel",
        table.len(),
        table.max_partials()
    );
    let params = Arc::new(ControlParams::new(
        config.ambient_gain,
        config.oscillator_gain,
        config.sample_rate as f32,
    ));
    let oscillators = OscillatorBank::with_partial_weight(table, config.partial_weight);
    Ok(Mixer::new(oscillators, ambient, params))
}

fn open_knobs(config: &HemiConfig) -> Result<Box<dyn KnobSource>> {
    match config.knobs {
        KnobKind::Keyboard => {
            KeyboardKnobs::print_help();
            let scale = 1023.0;
            let initial = [
                (config.ambient_gain.clamp(0.0, 1.0) * scale) as u16,
                0,
                0,
                (config.oscillator_gain.clamp(0.0, 1.0) * scale) as u16,
            ];
            Ok(Box::new(KeyboardKnobs::new(initial)))
        }
        KnobKind::Midi => Ok(Box::new(MidiKnobs::new(
            config.midi_port,
            config.midi_controllers,
        )?)),
        KnobKind::Mcp3008 => Ok(Box::new(Mcp3008::open(
            &config.spi_device,
            SpiSettings {
                speed_hz: config.spi_speed_hz,
            },
        )?)),
    }
}

fn print_legend(selector: &ChordSelector) {
    log::info!("Knob 0: River Volume");
    log::info!(
        "Knob 1: Chord Group (0=Simple, 1=Complex, 2=Mid-range, {} groups)",
        selector.groups
    );
    log::info!("Knob 2: Chord within Group (0-{})", selector.per_group - 1);
    log::info!("Knob 3: Sine Wave Volume");
}

/// Runs until the knob source asks to quit or `running` is cleared,
/// then closes the stream.
pub fn run(config: &HemiConfig, running: &AtomicBool) -> Result<()> {
    config.validate()?;

    let ambient = ambient_or_silence(&config.ambient_path, config.sample_rate);
    let mixer = build_mixer(config, ambient)?;
    let params = mixer.params().clone();

    let settings = StreamSettings {
        sample_rate: config.sample_rate,
        buffer_frames: config.buffer_frames,
        device_name: config.output_device.clone(),
    };
    let mut backend = CpalBackend::new(mixer, settings);
    backend.start()?;

    // Backend is dropped (and the stream closed) if this fails.
    let knobs = open_knobs(config)?;

    let selector = ChordSelector::new(config.chord_groups, config.chords_per_group);
    print_legend(&selector);
    log::info!("System initialized. Reading knobs...");

    let mut control = ControlLoop::new(knobs, params, selector)
        .with_poll_interval(Duration::from_millis(config.poll_interval_ms))
        .with_status_every(config.status_every);
    control.run(running);

    backend.stop();
    Ok(())
}
