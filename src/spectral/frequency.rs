//! Phase-vocoder frequency refinement.
//!
//! At bin `y` of an `N`-point transform, a sinusoid exactly at the bin
//! centre advances its phase by `2π·y·H/N` over a hop of `H` samples. The
//! deviation of the measured advance from that expectation, wrapped into
//! `(-π, π]`, gives the offset of the true frequency from the bin centre.
//! The result is meaningless for bins that do not hold a single stable
//! sinusoid.

use std::f64::consts::PI;

/// Wrap a phase into `(-π, π]`.
pub fn princarg(a: f64) -> f64 {
    let period = -2.0 * PI;
    let x = a + PI;
    x - period * (x / period).floor() + PI
}

/// Centre frequency of `bin` in Hz.
pub fn bin_frequency(bin: usize, sample_rate: f64, fft_size: usize) -> f64 {
    bin as f64 * sample_rate / fft_size as f64
}

/// Refined frequency for `bin` from its phase in two consecutive columns
/// `hop` samples apart.
pub fn stable_frequency(
    bin: usize,
    old_phase: f64,
    new_phase: f64,
    hop: usize,
    fft_size: usize,
    sample_rate: f64,
) -> f64 {
    let hop = hop as f64;
    let expected = old_phase + (2.0 * PI * bin as f64 * hop) / fft_size as f64;
    let error = princarg(new_phase - expected);
    sample_rate * (expected + error - old_phase) / (2.0 * PI * hop)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_princarg_range() {
        assert_abs_diff_eq!(princarg(0.0), 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(princarg(PI), PI, epsilon = 1e-12);
        assert_abs_diff_eq!(princarg(-PI), PI, epsilon = 1e-12);
        assert_abs_diff_eq!(princarg(3.0 * PI), PI, epsilon = 1e-9);
        assert_abs_diff_eq!(princarg(2.0 * PI + 0.25), 0.25, epsilon = 1e-12);
        assert_abs_diff_eq!(princarg(-2.0 * PI - 0.25), -0.25, epsilon = 1e-12);

        for i in -100..100 {
            let p = princarg(i as f64 * 0.37);
            assert!(p > -PI && p <= PI, "{} out of range", p);
        }
    }

    #[test]
    fn test_bin_centre_is_unchanged() {
        let sr = 44100.0;
        let (n, hop, bin) = (1024, 256, 10);
        let old = 0.3;
        let new = old + 2.0 * PI * bin as f64 * hop as f64 / n as f64;
        let f = stable_frequency(bin, old, new, hop, n, sr);
        assert_abs_diff_eq!(f, bin_frequency(bin, sr, n), epsilon = 1e-6);
    }

    #[test]
    fn test_offset_from_bin_centre() {
        let sr = 48000.0;
        let (n, hop, bin) = (2048, 512, 40);
        let true_freq = bin_frequency(bin, sr, n) + 7.5;
        let old = -1.2;
        let new = princarg(old + 2.0 * PI * true_freq * hop as f64 / sr);
        let f = stable_frequency(bin, old, new, hop, n, sr);
        assert_abs_diff_eq!(f, true_freq, epsilon = 1e-6);
    }
}
