//! The spectral analysis engine.
//!
//! [`FftModel`] presents a time-domain [`SampleSource`] as a grid of complex
//! spectra: `width()` columns spaced one window increment apart, each with
//! `height()` bins. Columns are computed on demand and held in two caches:
//! the most recently read range of source samples, and a small ring of
//! recent spectra.
//!
//! Reads fill those caches, so every accessor takes `&mut self`. The engine
//! does no locking of its own; share it behind a lock or keep it on one
//! thread.

use std::fmt;
use std::sync::Arc;

use rustfft::num_complex::Complex32;
use serde::{Deserialize, Serialize};

use super::columns::{ColumnCache, DEFAULT_COLUMN_CACHE_SIZE};
use super::frequency::{bin_frequency, stable_frequency};
use super::observer::{CacheKind, CacheObserver, CacheOutcome};
use super::peaks::{PeakLocationSet, PeakPickType, PeakPicker, PeakSet};
use super::source::{ChannelSelector, Frame, SampleSource, SourceSampleCache};
use super::transform::{RustFftTransform, SpectralTransform};
use super::window::{Window, WindowShape};
use crate::error::{AnalysisError, Result};

/// Window, hop and transform configuration for one engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisParameters {
    pub window: WindowShape,
    pub window_size: usize,
    pub window_increment: usize,
    /// At least `window_size`; larger values zero-pad each column.
    pub fft_size: usize,
    pub channel: ChannelSelector,
}

impl Default for AnalysisParameters {
    fn default() -> Self {
        Self {
            window: WindowShape::Hann,
            window_size: 2048,
            window_increment: 512,
            fft_size: 2048,
            channel: ChannelSelector::Mixdown,
        }
    }
}

impl AnalysisParameters {
    pub fn new(window: WindowShape, window_size: usize, window_increment: usize, fft_size: usize) -> Self {
        Self {
            window,
            window_size,
            window_increment,
            fft_size,
            channel: ChannelSelector::Mixdown,
        }
    }

    pub fn with_channel(mut self, channel: ChannelSelector) -> Self {
        self.channel = channel;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.window_size == 0 {
            return Err(AnalysisError::EmptyWindow);
        }
        if self.window_increment == 0 {
            return Err(AnalysisError::ZeroIncrement);
        }
        if self.window_size > self.fft_size {
            return Err(AnalysisError::WindowExceedsTransform {
                window_size: self.window_size,
                fft_size: self.fft_size,
            });
        }
        Ok(())
    }
}

pub struct FftModel {
    source: Option<Arc<dyn SampleSource>>,
    params: AnalysisParameters,
    window: Window,
    transform: Box<dyn SpectralTransform>,
    source_cache: SourceSampleCache,
    columns: ColumnCache,
    buffer: Vec<f32>,
    observer: Option<Arc<dyn CacheObserver>>,
}

impl fmt::Debug for FftModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FftModel")
            .field("params", &self.params)
            .field("source_available", &self.source.is_some())
            .field("cached_columns", &self.columns.cached_columns().collect::<Vec<_>>())
            .finish()
    }
}

impl FftModel {
    /// Engine over `source` using the `rustfft` transform.
    pub fn new(source: Arc<dyn SampleSource>, params: AnalysisParameters) -> Result<Self> {
        params.validate()?;
        let transform = Box::new(RustFftTransform::new(params.fft_size));
        Self::with_transform(source, params, transform)
    }

    /// Engine with a caller-supplied transform of size `params.fft_size`.
    pub fn with_transform(
        source: Arc<dyn SampleSource>,
        params: AnalysisParameters,
        transform: Box<dyn SpectralTransform>,
    ) -> Result<Self> {
        params.validate()?;
        if transform.size() != params.fft_size {
            return Err(AnalysisError::TransformSizeMismatch {
                expected: params.fft_size,
                actual: transform.size(),
            });
        }
        if let ChannelSelector::Channel(channel) = params.channel {
            let available = source.channel_count();
            if channel >= available {
                return Err(AnalysisError::ChannelOutOfRange { channel, available });
            }
        }

        log::debug!(
            "FftModel: {} window {} / increment {} / fft {}, channel {}",
            params.window,
            params.window_size,
            params.window_increment,
            params.fft_size,
            params.channel
        );

        let bins = params.fft_size / 2 + 1;
        Ok(Self {
            source: Some(source),
            window: Window::new(params.window, params.window_size),
            transform,
            source_cache: SourceSampleCache::new(params.channel),
            columns: ColumnCache::new(DEFAULT_COLUMN_CACHE_SIZE, bins),
            buffer: vec![0.0; params.fft_size],
            observer: None,
            params,
        })
    }

    pub fn with_observer(mut self, observer: Arc<dyn CacheObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Replace the column ring with one of `capacity` slots (at least 1).
    pub fn with_column_cache_size(mut self, capacity: usize) -> Self {
        self.columns = ColumnCache::new(capacity, self.height());
        self
    }

    // ------------------------------------------------------------------
    // Parameters and extent
    // ------------------------------------------------------------------

    pub fn parameters(&self) -> &AnalysisParameters {
        &self.params
    }

    pub fn channel(&self) -> ChannelSelector {
        self.params.channel
    }

    pub fn window_shape(&self) -> WindowShape {
        self.params.window
    }

    pub fn window_size(&self) -> usize {
        self.params.window_size
    }

    pub fn window_increment(&self) -> usize {
        self.params.window_increment
    }

    pub fn fft_size(&self) -> usize {
        self.params.fft_size
    }

    /// Frames per column.
    pub fn resolution(&self) -> usize {
        self.params.window_increment
    }

    /// Whether the source is still attached.
    pub fn is_ok(&self) -> bool {
        self.source.is_some()
    }

    /// False while the source is still being filled in.
    pub fn is_ready(&self) -> bool {
        self.completion() >= 100
    }

    pub fn completion(&self) -> u8 {
        match &self.source {
            Some(source) => source.completion().min(100),
            None => 100,
        }
    }

    /// Sample rate of the source, 0 once it is gone.
    pub fn sample_rate(&self) -> u32 {
        self.source.as_ref().map_or(0, |s| s.sample_rate())
    }

    /// Number of columns: one per window increment, plus one.
    pub fn width(&self) -> usize {
        match &self.source {
            Some(source) => (source.len() / self.params.window_increment as u64) as usize + 1,
            None => 0,
        }
    }

    /// Number of bins per column.
    pub fn height(&self) -> usize {
        self.params.fft_size / 2 + 1
    }

    pub fn start_frame(&self) -> Frame {
        0
    }

    pub fn end_frame(&self) -> Frame {
        let increment = self.params.window_increment as Frame;
        self.width() as Frame * increment + increment
    }

    /// Source frames `[start, end)` read for column `x`. Columns are centred
    /// on `x * increment`, so column 0 starts before frame 0.
    pub fn source_range(&self, x: usize) -> (Frame, Frame) {
        let half = (self.params.window_size / 2) as Frame;
        let start = x as Frame * self.params.window_increment as Frame - half;
        (start, start + self.params.window_size as Frame)
    }

    /// Centre frequency of bin `y` in Hz, 0 once the source is gone.
    pub fn bin_frequency(&self, y: usize) -> f64 {
        bin_frequency(y, self.sample_rate() as f64, self.params.fft_size)
    }

    /// Display name for bin `y`, e.g. `"43.06640625 Hz"`.
    pub fn bin_frequency_label(&self, y: usize) -> String {
        let sr = self.sample_rate();
        let denominator = (self.height() - 1) * 2;
        if sr == 0 || denominator == 0 {
            return String::new();
        }
        format!("{} Hz", (y as f64 * sr as f64) / denominator as f64)
    }

    // ------------------------------------------------------------------
    // Source notifications
    // ------------------------------------------------------------------

    /// The source's content changed: drop everything cached.
    pub fn invalidate(&mut self) {
        self.columns.clear();
        self.source_cache.clear();
    }

    /// The source grew. Cached spectra near the old end are stale, and so
    /// may be the last sample of the held source range.
    pub fn source_appended(&mut self) {
        self.columns.clear();
        self.source_cache.mark_tail_stale();
    }

    /// The source is gone for good. Every read returns zero/empty from now on.
    pub fn source_removed(&mut self) {
        if self.source.take().is_some() {
            log::debug!("FftModel: source removed");
        }
        self.columns.clear();
        self.source_cache.clear();
    }

    // ------------------------------------------------------------------
    // Single values
    // ------------------------------------------------------------------

    fn in_range(&self, x: usize, y: usize) -> bool {
        x < self.width() && y < self.height()
    }

    pub fn magnitude(&mut self, x: usize, y: usize) -> f32 {
        if !self.in_range(x, y) {
            return 0.0;
        }
        self.fft_column(x)[y].norm()
    }

    /// Phase in `(-π, π]`.
    pub fn phase(&mut self, x: usize, y: usize) -> f32 {
        if !self.in_range(x, y) {
            return 0.0;
        }
        principal_arg(self.fft_column(x)[y])
    }

    pub fn complex_value(&mut self, x: usize, y: usize) -> Complex32 {
        if !self.in_range(x, y) {
            return Complex32::new(0.0, 0.0);
        }
        self.fft_column(x)[y]
    }

    pub fn maximum_magnitude(&mut self, x: usize) -> f32 {
        if x >= self.width() {
            return 0.0;
        }
        self.fft_column(x)
            .iter()
            .map(|c| c.norm())
            .fold(0.0f32, f32::max)
    }

    // ------------------------------------------------------------------
    // Whole columns and bulk reads
    // ------------------------------------------------------------------

    /// Magnitudes of column `x`, empty if out of range.
    pub fn column(&mut self, x: usize) -> Vec<f32> {
        if x >= self.width() {
            return Vec::new();
        }
        self.fft_column(x).iter().map(|c| c.norm()).collect()
    }

    /// Phases of column `x`, empty if out of range.
    pub fn phases(&mut self, x: usize) -> Vec<f32> {
        if x >= self.width() {
            return Vec::new();
        }
        self.fft_column(x).iter().map(|&c| principal_arg(c)).collect()
    }

    /// Write `count` magnitudes of column `x`, starting at `min_bin`, into
    /// `out[..count]`. `count == 0` means through the last bin.
    ///
    /// Returns false, writing nothing, if the bin range does not fit the
    /// spectrum or `out`. An out-of-range column writes zeros.
    pub fn magnitudes_at(&mut self, x: usize, min_bin: usize, count: usize, out: &mut [f32]) -> bool {
        self.bulk_read(x, min_bin, count, out, |c| c.norm())
    }

    /// As [`FftModel::magnitudes_at`], for phases.
    pub fn phases_at(&mut self, x: usize, min_bin: usize, count: usize, out: &mut [f32]) -> bool {
        self.bulk_read(x, min_bin, count, out, principal_arg)
    }

    /// As [`FftModel::magnitudes_at`], for real and imaginary parts.
    pub fn values_at(
        &mut self,
        x: usize,
        min_bin: usize,
        count: usize,
        reals: &mut [f32],
        imaginaries: &mut [f32],
    ) -> bool {
        let Some(count) = self.bulk_count(min_bin, count) else {
            return false;
        };
        if reals.len() < count || imaginaries.len() < count {
            return false;
        }
        let reals = &mut reals[..count];
        let imaginaries = &mut imaginaries[..count];

        if x >= self.width() {
            reals.fill(0.0);
            imaginaries.fill(0.0);
            return true;
        }

        let col = &self.fft_column(x)[min_bin..min_bin + count];
        for ((re, im), c) in reals.iter_mut().zip(imaginaries.iter_mut()).zip(col) {
            *re = c.re;
            *im = c.im;
        }
        true
    }

    fn bulk_count(&self, min_bin: usize, count: usize) -> Option<usize> {
        let height = self.height();
        let count = if count == 0 {
            height.checked_sub(min_bin)?
        } else {
            count
        };
        (min_bin + count <= height).then_some(count)
    }

    fn bulk_read(
        &mut self,
        x: usize,
        min_bin: usize,
        count: usize,
        out: &mut [f32],
        f: impl Fn(Complex32) -> f32,
    ) -> bool {
        let Some(count) = self.bulk_count(min_bin, count) else {
            return false;
        };
        if out.len() < count {
            return false;
        }
        let out = &mut out[..count];

        if x >= self.width() {
            out.fill(0.0);
            return true;
        }

        let col = &self.fft_column(x)[min_bin..min_bin + count];
        for (o, &c) in out.iter_mut().zip(col) {
            *o = f(c);
        }
        true
    }

    // ------------------------------------------------------------------
    // Frequency estimation and peaks
    // ------------------------------------------------------------------

    fn has_successor(&self, x: usize) -> bool {
        x.checked_add(1).is_some_and(|next| next < self.width())
    }

    /// Frequency of a stable sinusoid in bin `y`, from the phase advance
    /// between columns `x` and `x + 1`.
    ///
    /// `None` when there is no column `x + 1` or the source is gone. The
    /// value is only meaningful if the bin holds a single steady partial.
    pub fn estimate_stable_frequency(&mut self, x: usize, y: usize) -> Option<f64> {
        if !self.is_ok() || y >= self.height() || !self.has_successor(x) {
            return None;
        }
        let old_phase = self.phase(x, y) as f64;
        let new_phase = self.phase(x + 1, y) as f64;
        Some(stable_frequency(
            y,
            old_phase,
            new_phase,
            self.params.window_increment,
            self.params.fft_size,
            self.sample_rate() as f64,
        ))
    }

    /// Peak bins of column `x` within `[ymin, ymax]` (`ymax == 0` meaning
    /// the last bin).
    pub fn peaks(&mut self, kind: PeakPickType, x: usize, ymin: usize, ymax: usize) -> PeakLocationSet {
        if !self.is_ok() || x >= self.width() {
            return PeakLocationSet::new();
        }
        let picker = PeakPicker::new(kind, self.sample_rate() as f64, self.params.fft_size);
        let magnitudes: Vec<f32> = self.fft_column(x).iter().map(|c| c.norm()).collect();
        picker.pick(&magnitudes, ymin, ymax)
    }

    /// Peak bins of column `x` with their stable-frequency estimates.
    ///
    /// Empty for the last column, which has no successor to measure phase
    /// advance against; no nominal bin frequencies are substituted.
    pub fn peak_frequencies(&mut self, kind: PeakPickType, x: usize, ymin: usize, ymax: usize) -> PeakSet {
        let mut result = PeakSet::new();
        if !self.is_ok() || !self.has_successor(x) {
            if self.is_ok() && x < self.width() {
                log::debug!("FftModel: no successor for column {}, peak frequencies omitted", x);
            }
            return result;
        }

        let locations = self.peaks(kind, x, ymin, ymax);

        // Read all of column x, then all of x + 1, rather than alternating
        let old_phases: Vec<f64> = {
            let col = self.fft_column(x);
            locations.iter().map(|&y| principal_arg(col[y]) as f64).collect()
        };
        let new_phases: Vec<f64> = {
            let col = self.fft_column(x + 1);
            locations.iter().map(|&y| principal_arg(col[y]) as f64).collect()
        };

        let sample_rate = self.sample_rate() as f64;
        for ((&bin, old), new) in locations.iter().zip(old_phases).zip(new_phases) {
            let frequency = stable_frequency(
                bin,
                old,
                new,
                self.params.window_increment,
                self.params.fft_size,
                sample_rate,
            );
            result.insert(bin, frequency);
        }
        result
    }

    // ------------------------------------------------------------------
    // Column computation
    // ------------------------------------------------------------------

    fn record(&self, cache: CacheKind, outcome: CacheOutcome) {
        if let Some(observer) = &self.observer {
            observer.record(cache, outcome);
        }
    }

    /// Spectrum of column `x`, from the ring if present. The slice is only
    /// valid until the next read.
    fn fft_column(&mut self, x: usize) -> &[Complex32] {
        if let Some(slot) = self.columns.find(x) {
            self.record(CacheKind::Column, CacheOutcome::Hit);
            return self.columns.spectrum(slot);
        }
        self.record(CacheKind::Column, CacheOutcome::Miss);

        self.fill_buffer(x);
        let slot = self.columns.claim(x);
        self.transform.forward(&self.buffer, self.columns.spectrum_mut(slot));
        self.columns.spectrum(slot)
    }

    /// Load the windowed, padded and phase-centred input for column `x`.
    fn fill_buffer(&mut self, x: usize) {
        let (start, end) = self.source_range(x);
        let fft_size = self.params.fft_size;
        let window_size = self.params.window_size;
        // Any odd padding remainder goes after the samples
        let offset = (fft_size - window_size) / 2;

        self.buffer.fill(0.0);
        if let Some(source) = &self.source {
            let samples = self.source_cache.get(
                source.as_ref(),
                start,
                end,
                self.observer.as_deref(),
            );
            self.buffer[offset..offset + window_size].copy_from_slice(samples);
        }

        self.window.cut(&mut self.buffer[offset..offset + window_size]);
        self.buffer.rotate_left(fft_size / 2);
    }
}

fn principal_arg(c: Complex32) -> f32 {
    let p = c.arg();
    if p <= -std::f32::consts::PI {
        std::f32::consts::PI
    } else {
        p
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spectral::observer::HitCounter;
    use approx::assert_abs_diff_eq;

    struct Mono {
        samples: Vec<f32>,
        sample_rate: u32,
    }

    impl SampleSource for Mono {
        fn sample_rate(&self) -> u32 {
            self.sample_rate
        }
        fn channel_count(&self) -> usize {
            1
        }
        fn len(&self) -> u64 {
            self.samples.len() as u64
        }
        fn read(&self, _channel: usize, start: u64, count: usize) -> Vec<f32> {
            let start = (start as usize).min(self.samples.len());
            let end = (start + count).min(self.samples.len());
            self.samples[start..end].to_vec()
        }
    }

    fn mono(samples: Vec<f32>, sample_rate: u32) -> Arc<dyn SampleSource> {
        Arc::new(Mono {
            samples,
            sample_rate,
        })
    }

    fn sine(freq: f64, sample_rate: u32, len: usize) -> Vec<f32> {
        (0..len)
            .map(|i| (2.0 * std::f64::consts::PI * freq * i as f64 / sample_rate as f64).sin() as f32)
            .collect()
    }

    #[test]
    fn test_rejects_window_larger_than_fft() {
        let err = FftModel::new(mono(vec![0.0; 16], 8), AnalysisParameters::new(WindowShape::Hann, 16, 4, 8))
            .unwrap_err();
        assert_eq!(
            err,
            AnalysisError::WindowExceedsTransform {
                window_size: 16,
                fft_size: 8
            }
        );
    }

    #[test]
    fn test_rejects_zero_increment_and_bad_channel() {
        let src = mono(vec![0.0; 16], 8);
        assert_eq!(
            FftModel::new(src.clone(), AnalysisParameters::new(WindowShape::Hann, 8, 0, 8)).unwrap_err(),
            AnalysisError::ZeroIncrement
        );
        let params = AnalysisParameters::new(WindowShape::Hann, 8, 4, 8).with_channel(ChannelSelector::Channel(1));
        assert!(matches!(
            FftModel::new(src, params).unwrap_err(),
            AnalysisError::ChannelOutOfRange { channel: 1, available: 1 }
        ));
    }

    #[test]
    fn test_extent() {
        let model = FftModel::new(mono(vec![0.0; 100], 1000), AnalysisParameters::new(WindowShape::Hann, 16, 10, 32)).unwrap();
        assert_eq!(model.width(), 11);
        assert_eq!(model.height(), 17);
        assert_eq!(model.end_frame(), 120);
        assert_eq!(model.source_range(0), (-8, 8));
        assert_eq!(model.source_range(3), (22, 38));
    }

    #[test]
    fn test_out_of_range_reads_are_zero() {
        let mut model = FftModel::new(mono(vec![1.0; 64], 8), AnalysisParameters::new(WindowShape::Hann, 8, 8, 8)).unwrap();
        let w = model.width();
        assert_eq!(model.magnitude(w, 0), 0.0);
        assert_eq!(model.magnitude(0, 5), 0.0);
        assert_eq!(model.phase(w, 0), 0.0);
        assert_eq!(model.complex_value(0, 99), Complex32::new(0.0, 0.0));
        assert!(model.column(w).is_empty());
        assert_eq!(model.maximum_magnitude(w), 0.0);
        assert!(model.peaks(PeakPickType::AllPeaks, w, 0, 0).is_empty());
    }

    #[test]
    fn test_bulk_bounds() {
        let mut model = FftModel::new(mono(vec![1.0; 64], 8), AnalysisParameters::new(WindowShape::Hann, 8, 8, 8)).unwrap();
        let mut out = [7.0f32; 8];
        // Range past the last bin is refused without writing
        assert!(!model.magnitudes_at(2, 3, 3, &mut out));
        assert_eq!(out, [7.0; 8]);
        // Output too short
        assert!(!model.magnitudes_at(2, 0, 0, &mut out[..4]));
        // count == 0 reads through the last bin
        assert!(model.magnitudes_at(2, 2, 0, &mut out));
        assert_eq!(&out[3..], &[7.0; 5]);
        // Out of range column writes zeros
        let mut out = [7.0f32; 8];
        let w = model.width();
        assert!(model.magnitudes_at(w, 0, 2, &mut out));
        assert_eq!(&out[..3], &[0.0, 0.0, 7.0]);
    }

    #[test]
    fn test_peaks_and_frequency_of_sine() {
        let sr = 8000;
        let freq = 1010.0;
        let params = AnalysisParameters::new(WindowShape::Hann, 512, 128, 512);
        let mut model = FftModel::new(mono(sine(freq, sr, 8000), sr), params).unwrap();

        let x = 20;
        let peaks = model.peaks(PeakPickType::MajorPeaks, x, 0, 0);
        let expected_bin = (freq * 512.0 / sr as f64).round() as usize;
        assert!(peaks.contains(&expected_bin), "peaks {:?}", peaks);

        let est = model.estimate_stable_frequency(x, expected_bin).unwrap();
        assert_abs_diff_eq!(est, freq, epsilon = 1.0);

        let freqs = model.peak_frequencies(PeakPickType::MajorPeaks, x, 0, 0);
        assert_abs_diff_eq!(freqs[&expected_bin], freq, epsilon = 1.0);
        assert!(model.bin_frequency(expected_bin) != freqs[&expected_bin]);
    }

    #[test]
    fn test_last_column_has_no_estimate() {
        let sr = 8000;
        let params = AnalysisParameters::new(WindowShape::Hann, 64, 32, 64);
        let mut model = FftModel::new(mono(sine(1000.0, sr, 640), sr), params).unwrap();
        let last = model.width() - 1;
        assert_eq!(model.estimate_stable_frequency(last, 8), None);
        assert!(model.estimate_stable_frequency(last - 1, 8).is_some());
        assert!(model.peak_frequencies(PeakPickType::AllPeaks, last, 0, 0).is_empty());
    }

    #[test]
    fn test_largest_column_index_has_no_estimate() {
        let sr = 8000;
        let params = AnalysisParameters::new(WindowShape::Hann, 64, 32, 64);
        let mut model = FftModel::new(mono(sine(1000.0, sr, 640), sr), params).unwrap();
        assert_eq!(model.estimate_stable_frequency(usize::MAX, 8), None);
        assert!(model.peak_frequencies(PeakPickType::MajorPeaks, usize::MAX, 0, 0).is_empty());
        assert!(model.peaks(PeakPickType::MajorPeaks, usize::MAX, 0, 0).is_empty());
        assert_eq!(model.magnitude(usize::MAX, 8), 0.0);
    }

    #[test]
    fn test_column_cache_serves_adjacent_pairs() {
        let counter = Arc::new(HitCounter::new());
        let sr = 8000;
        let params = AnalysisParameters::new(WindowShape::Hann, 256, 64, 256);
        let mut model = FftModel::new(mono(sine(440.0, sr, 4000), sr), params)
            .unwrap()
            .with_observer(counter.clone());

        model.peak_frequencies(PeakPickType::MajorPeaks, 10, 0, 0);
        let stats = counter.stats(CacheKind::Column);
        // Column 10 computed once for peaks, reused for phases; 11 computed once
        assert_eq!(stats.misses, 2);
        assert_eq!(stats.hits, 1);

        // Consecutive overlapping columns reuse held source samples
        let source = counter.stats(CacheKind::Source);
        assert_eq!(source.misses, 1);
        assert_eq!(source.partials, 1);
    }

    #[test]
    fn test_source_removed_degrades_to_zero() {
        let mut model = FftModel::new(mono(vec![1.0; 64], 8), AnalysisParameters::new(WindowShape::Hann, 8, 8, 8)).unwrap();
        assert!(model.magnitude(2, 0) > 0.0);

        model.source_removed();
        assert!(!model.is_ok());
        assert_eq!(model.width(), 0);
        assert_eq!(model.sample_rate(), 0);
        assert_eq!(model.magnitude(2, 0), 0.0);
        assert_eq!(model.bin_frequency_label(1), "");
        assert_eq!(model.estimate_stable_frequency(0, 0), None);
        assert!(model.peak_frequencies(PeakPickType::MajorPeaks, 0, 0, 0).is_empty());
        let mut out = [5.0f32; 5];
        assert!(model.magnitudes_at(0, 0, 0, &mut out));
        assert_eq!(out, [0.0; 5]);
    }

    #[test]
    fn test_bin_label() {
        let model = FftModel::new(mono(vec![0.0; 64], 44100), AnalysisParameters::new(WindowShape::Hann, 1024, 512, 1024)).unwrap();
        assert_eq!(model.bin_frequency_label(1), "43.06640625 Hz");
        assert_eq!(model.bin_frequency_label(0), "0 Hz");
    }

    #[test]
    fn test_zero_padding_is_centred() {
        // A single impulse at the centre of column 1's window lands at the
        // centre of the padded buffer and rotates to index 0: flat spectrum
        let mut samples = vec![0.0f32; 32];
        samples[8] = 1.0;
        let params = AnalysisParameters::new(WindowShape::Rectangular, 8, 8, 16);
        let mut model = FftModel::new(mono(samples, 16), params).unwrap();
        for y in 0..model.height() {
            let c = model.complex_value(1, y);
            assert_abs_diff_eq!(c.re, 0.5, epsilon = 1e-6);
            assert_abs_diff_eq!(c.im, 0.0, epsilon = 1e-6);
        }
    }
}
