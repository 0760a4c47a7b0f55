use hemisync::control::{ChordSelector, ControlLoop};
use hemisync::input::{FixedKnobs, KnobFrame, KnobSource};
use hemisync::synth::ControlParams;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Duration;

#[test]
fn test_bucket_edges() {
    assert_eq!(ChordSelector::bucket(0.0, 3), 0);
    assert_eq!(ChordSelector::bucket(0.33, 3), 0);
    assert_eq!(ChordSelector::bucket(0.34, 3), 1);
    assert_eq!(ChordSelector::bucket(1.0, 3), 2);
    assert_eq!(ChordSelector::bucket(1.0, 4), 3);
    assert_eq!(ChordSelector::bucket(0.5, 4), 1);
    assert_eq!(ChordSelector::bucket(1.7, 4), 3);
    assert_eq!(ChordSelector::bucket(-0.2, 4), 0);
    assert_eq!(ChordSelector::bucket(f32::NAN, 4), 0);
}

#[test]
fn test_select_combines_group_and_chord() {
    let selector = ChordSelector::default();
    assert_eq!(selector.select(0.0, 0.0), (0, 0, 0));
    assert_eq!(selector.select(0.5, 0.0), (1, 0, 4));
    assert_eq!(selector.select(0.5, 1.0), (1, 3, 7));
    assert_eq!(selector.select(1.0, 1.0), (2, 3, 11));
    assert_eq!(selector.select(1.0, 0.3), (2, 1, 9));
}

#[test]
fn test_every_knob_position_maps_into_table() {
    let selector = ChordSelector::default();
    for g in 0..=1023u16 {
        for c in [0u16, 255, 256, 511, 512, 767, 768, 1023] {
            let (_, _, index) = selector.select(f32::from(g) / 1023.0, f32::from(c) / 1023.0);
            assert!((0..12).contains(&index));
        }
    }
}

#[test]
fn test_poll_once_writes_params() {
    let params = Arc::new(ControlParams::default());
    let knobs = FixedKnobs::new([1023, 512, 1023, 0], 1023);
    let mut control = ControlLoop::new(knobs, params.clone(), ChordSelector::default()).with_status_every(0);

    let reading = control.poll_once();
    assert_eq!(reading.group, 1);
    assert_eq!(reading.chord_in_group, 3);
    assert_eq!(reading.chord_index, 7);
    assert_eq!(params.ambient_gain(), 1.0);
    assert_eq!(params.oscillator_gain(), 0.0);
    assert_eq!(params.selected_chord(), 7);
    assert_eq!(control.polls(), 1);
}

#[test]
fn test_midi_scale_knobs_normalize() {
    let params = Arc::new(ControlParams::default());
    let knobs = FixedKnobs::new([127, 127, 0, 64], 127);
    let mut control = ControlLoop::new(knobs, params.clone(), ChordSelector::default());
    let reading = control.poll_once();
    assert_eq!(reading.chord_index, 8);
    assert!((params.oscillator_gain() - 64.0 / 127.0).abs() < 1e-6);
}

struct QuitAfter {
    remaining: u32,
}

impl KnobSource for QuitAfter {
    fn read(&mut self) -> KnobFrame {
        self.remaining = self.remaining.saturating_sub(1);
        [0, 0, 0, 0]
    }

    fn full_scale(&self) -> u16 {
        1023
    }

    fn quit_requested(&self) -> bool {
        self.remaining == 0
    }
}

#[test]
fn test_run_stops_when_source_quits() {
    let params = Arc::new(ControlParams::default());
    let running = AtomicBool::new(true);
    let mut control = ControlLoop::new(QuitAfter { remaining: 5 }, params, ChordSelector::default())
        .with_poll_interval(Duration::from_millis(1));
    control.run(&running);
    assert_eq!(control.polls(), 5);
    assert!(!running.load(std::sync::atomic::Ordering::Acquire));
}

#[test]
fn test_run_exits_immediately_when_not_running() {
    let params = Arc::new(ControlParams::default());
    let running = AtomicBool::new(false);
    let mut control = ControlLoop::new(FixedKnobs::new([0; 4], 1023), params, ChordSelector::default());
    control.run(&running);
    assert_eq!(control.polls(), 0);
}

#[test]
fn test_params_visible_across_threads() {
    let params = Arc::new(ControlParams::default());
    let writer = params.clone();
    std::thread::spawn(move || {
        writer.set_selected_chord(9);
        writer.set_ambient_gain(0.25);
        writer.set_sample_rate(48_000.0);
    })
    .join()
    .unwrap();
    assert_eq!(params.selected_chord(), 9);
    assert_eq!(params.ambient_gain(), 0.25);
    assert_eq!(params.sample_rate(), 48_000.0);
}

#[test]
fn test_fixed_knobs_set_clamps_to_full_scale() {
    let mut knobs = FixedKnobs::new([0; 4], 127);
    knobs.set(2, 500);
    knobs.set(9, 1);
    assert_eq!(knobs.read(), [0, 0, 127, 0]);
}

#[test]
fn test_midi_control_change_moves_mapped_knob() {
    use hemisync::input::MidiKnobs;
    let controllers = [20, 21, 22, 23];
    let mut values: KnobFrame = [0; 4];

    assert!(MidiKnobs::apply_message(&controllers, &mut values, 0xB3, 22, 100));
    assert_eq!(values, [0, 0, 100, 0]);
    // Note-on and unmapped controllers are ignored.
    assert!(!MidiKnobs::apply_message(&controllers, &mut values, 0x90, 20, 64));
    assert!(!MidiKnobs::apply_message(&controllers, &mut values, 0xB0, 7, 64));
    assert_eq!(values, [0, 0, 100, 0]);
}

#[test]
fn test_run_stops_when_flag_cleared_from_another_thread() {
    let params = Arc::new(ControlParams::default());
    let running = Arc::new(AtomicBool::new(true));
    let stopper = running.clone();
    let handle = std::thread::spawn(move || {
        std::thread::sleep(Duration::from_millis(30));
        stopper.store(false, std::sync::atomic::Ordering::Release);
    });

    let mut control = ControlLoop::new(FixedKnobs::new([0; 4], 1023), params, ChordSelector::default())
        .with_poll_interval(Duration::from_millis(1))
        .with_status_every(0);
    control.run(&running);
    handle.join().unwrap();

    assert!(control.polls() > 0);
    assert!(!running.load(std::sync::atomic::Ordering::Acquire));
}

#[test]
fn test_select_saturates_huge_layouts() {
    let selector = ChordSelector::new(70_000, 70_000);
    let (group, chord, index) = selector.select(1.0, 1.0);
    assert_eq!((group, chord), (69_999, 69_999));
    assert_eq!(index, i32::MAX);
}

#[test]
fn test_mcp3008_request_frame() {
    use hemisync::input::Mcp3008;
    assert_eq!(Mcp3008::request_frame(0), Some([0x01, 0x80, 0x00]));
    assert_eq!(Mcp3008::request_frame(3), Some([0x01, 0xB0, 0x00]));
    assert_eq!(Mcp3008::request_frame(7), Some([0x01, 0xF0, 0x00]));
    assert_eq!(Mcp3008::request_frame(8), None);
}

#[test]
fn test_mcp3008_decode_reply() {
    use hemisync::input::Mcp3008;
    assert_eq!(Mcp3008::decode_reply(&[0x00, 0x00, 0x00]), 0);
    assert_eq!(Mcp3008::decode_reply(&[0x00, 0x03, 0xFF]), 1023);
    assert_eq!(Mcp3008::decode_reply(&[0x00, 0x02, 0x01]), 513);
    // Bits above the 10-bit result are ignored.
    assert_eq!(Mcp3008::decode_reply(&[0xFF, 0xFD, 0x10]), 0x110);
}

#[test]
fn test_mcp3008_open_failure_is_knob_error() {
    use hemisync::input::{Mcp3008, SpiSettings};
    use hemisync::HemiError;
    let result = Mcp3008::open(std::path::Path::new("/nonexistent/spidev9.9"), SpiSettings::default());
    assert!(matches!(result, Err(HemiError::Knobs(_))));
}
