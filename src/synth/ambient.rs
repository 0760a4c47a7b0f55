/// Loops a pre-decoded interleaved stereo buffer under the oscillators.
///
/// An empty looper is a silent source; the cursor is never touched.
#[derive(Debug, Default, Clone)]
pub struct AmbientLooper {
    samples: Vec<f32>,
    cursor: usize,
}

impl AmbientLooper {
    /// Takes ownership of interleaved `[l, r, l, r, ...]` samples.
    /// A trailing half frame is dropped and never read.
    pub fn new(mut samples: Vec<f32>) -> Self {
        let whole = samples.len() - samples.len() % 2;
        samples.truncate(whole);
        Self { samples, cursor: 0 }
    }

    pub fn silent() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn frame_count(&self) -> usize {
        self.samples.len() / 2
    }

    /// Index of the next frame to be read.
    pub fn position(&self) -> usize {
        self.cursor / 2
    }

    #[inline]
    pub fn next_frame(&mut self) -> (f32, f32) {
        if self.samples.is_empty() {
            return (0.0, 0.0);
        }
        let frame = (self.samples[self.cursor], self.samples[self.cursor + 1]);
        self.cursor += 2;
        if self.cursor + 2 > self.samples.len() {
            self.cursor = 0;
        }
        frame
    }
}
