use hemisync::synth::{AmbientLooper, ChordTable, ControlParams, Mixer, OscillatorBank};
use std::sync::Arc;

#[test]
fn test_empty_looper_is_silent_and_still() {
    let mut looper = AmbientLooper::silent();
    assert!(looper.is_empty());
    for _ in 0..10 {
        assert_eq!(looper.next_frame(), (0.0, 0.0));
    }
    assert_eq!(looper.position(), 0);
}

#[test]
fn test_wraps_after_last_frame() {
    let mut looper = AmbientLooper::new(vec![0.1, 0.2, 0.3, 0.4, 0.5, 0.6]);
    assert_eq!(looper.frame_count(), 3);
    assert_eq!(looper.next_frame(), (0.1, 0.2));
    assert_eq!(looper.next_frame(), (0.3, 0.4));
    assert_eq!(looper.next_frame(), (0.5, 0.6));
    assert_eq!(looper.position(), 0);
    assert_eq!(looper.next_frame(), (0.1, 0.2));
}

#[test]
fn test_trailing_half_frame_is_never_read() {
    let mut looper = AmbientLooper::new(vec![0.1, 0.2, 0.3, 0.4, 0.9]);
    assert_eq!(looper.frame_count(), 2);
    let frames: Vec<_> = (0..4).map(|_| looper.next_frame()).collect();
    assert_eq!(frames, vec![(0.1, 0.2), (0.3, 0.4), (0.1, 0.2), (0.3, 0.4)]);
}

#[test]
fn test_single_sample_buffer_is_silent() {
    let mut looper = AmbientLooper::new(vec![0.7]);
    assert!(looper.is_empty());
    assert_eq!(looper.next_frame(), (0.0, 0.0));
}

#[test]
fn test_mixer_loops_buffer_twice_in_order() {
    let frames = 37;
    let samples: Vec<f32> = (0..frames * 2)
        .map(|i| ((i as f32) * 0.37).sin() * 0.8)
        .collect();

    let params = Arc::new(ControlParams::new(1.0, 0.0, 44_100.0));
    let mut mixer = Mixer::new(
        OscillatorBank::new(ChordTable::hemi_sync()),
        AmbientLooper::new(samples.clone()),
        params,
    );

    // Odd chunk sizes so the wrap lands mid-buffer.
    let mut produced = Vec::new();
    for chunk in [5usize, 30, 1, 38] {
        let mut out = vec![0.0; chunk * 2];
        mixer.produce_buffer(&mut out);
        produced.extend_from_slice(&out);
    }

    let expected: Vec<f32> = samples.iter().chain(samples.iter()).copied().collect();
    assert_eq!(produced.len(), expected.len());
    assert_eq!(produced, expected);
}
