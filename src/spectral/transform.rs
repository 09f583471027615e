use std::sync::Arc;

use rustfft::num_complex::Complex32;
use rustfft::{Fft, FftPlanner};

/// A forward transform of `size()` real samples into `size() / 2 + 1`
/// complex bins (the non-negative frequency half of the spectrum).
///
/// Output is unnormalised, with standard DFT sign conventions.
pub trait SpectralTransform: Send {
    fn size(&self) -> usize;

    /// `input.len()` must equal `size()` and `output.len()` must be
    /// `size() / 2 + 1`.
    fn forward(&mut self, input: &[f32], output: &mut [Complex32]);
}

/// `rustfft`-backed transform. The plan and buffers are reused across calls.
pub struct RustFftTransform {
    size: usize,
    fft: Arc<dyn Fft<f32>>,
    buffer: Vec<Complex32>,
    scratch: Vec<Complex32>,
}

impl RustFftTransform {
    pub fn new(size: usize) -> Self {
        let mut planner = FftPlanner::<f32>::new();
        let fft = planner.plan_fft_forward(size);
        let scratch = vec![Complex32::new(0.0, 0.0); fft.get_inplace_scratch_len()];
        Self {
            size,
            fft,
            buffer: vec![Complex32::new(0.0, 0.0); size],
            scratch,
        }
    }
}

impl std::fmt::Debug for RustFftTransform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RustFftTransform")
            .field("size", &self.size)
            .finish()
    }
}

impl SpectralTransform for RustFftTransform {
    fn size(&self) -> usize {
        self.size
    }

    fn forward(&mut self, input: &[f32], output: &mut [Complex32]) {
        debug_assert_eq!(input.len(), self.size);
        debug_assert_eq!(output.len(), self.size / 2 + 1);

        for (c, &s) in self.buffer.iter_mut().zip(input.iter()) {
            *c = Complex32::new(s, 0.0);
        }
        self.fft.process_with_scratch(&mut self.buffer, &mut self.scratch);
        output.copy_from_slice(&self.buffer[..self.size / 2 + 1]);
    }
}
