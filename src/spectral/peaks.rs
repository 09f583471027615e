//! Spectral peak picking.
//!
//! `AllPeaks` is a plain local-maximum test. The two "major" strategies run
//! a trailing sliding window over the magnitudes, take a percentile of the
//! window (nominally the median) as the local floor for the bin at the
//! window's centre, and collapse each contiguous run of bins above their
//! floor into a single peak at the run's loudest bin.
//!
//! The pitch-adaptive variant widens the window with frequency so it spans
//! roughly four semitones, and raises the percentile towards the top of the
//! spectrum.

use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AnalysisError;
use crate::pitch::frequency_for_pitch;

/// Peak bins, ascending.
pub type PeakLocationSet = BTreeSet<usize>;

/// Peak bin to estimated frequency in Hz.
pub type PeakSet = BTreeMap<usize, f64>;

const MAJOR_PEAK_WINDOW: usize = 10;
const MIN_ADAPTIVE_WINDOW: usize = 3;
/// MIDI pitch whose frequency, relative to a reference at A4 (69), lies
/// four semitones above the reference.
const ADAPTIVE_SPAN_PITCH: i32 = 73;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PeakPickType {
    /// Any bin exceeding both immediate neighbours
    AllPeaks,
    /// Loudest bin of each run above a 10-bin sliding median
    #[default]
    MajorPeaks,
    /// As `MajorPeaks`, with a window that widens for higher frequencies
    MajorPitchAdaptivePeaks,
}

impl fmt::Display for PeakPickType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PeakPickType::AllPeaks => write!(f, "all"),
            PeakPickType::MajorPeaks => write!(f, "major"),
            PeakPickType::MajorPitchAdaptivePeaks => write!(f, "adaptive"),
        }
    }
}

impl FromStr for PeakPickType {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" | "all-peaks" => Ok(PeakPickType::AllPeaks),
            "major" | "major-peaks" => Ok(PeakPickType::MajorPeaks),
            "adaptive" | "pitch-adaptive" | "major-pitch-adaptive-peaks" => {
                Ok(PeakPickType::MajorPitchAdaptivePeaks)
            }
            _ => Err(AnalysisError::UnknownPeakPickType(s.to_string())),
        }
    }
}

/// Peak picker for columns of an `fft_size`-point transform.
#[derive(Debug, Clone, Copy)]
pub struct PeakPicker {
    kind: PeakPickType,
    sample_rate: f64,
    fft_size: usize,
}

impl PeakPicker {
    pub fn new(kind: PeakPickType, sample_rate: f64, fft_size: usize) -> Self {
        Self {
            kind,
            sample_rate,
            fft_size,
        }
    }

    pub fn kind(&self) -> PeakPickType {
        self.kind
    }

    /// Sliding window size and percentile used for the floor at `bin`.
    pub fn window_size(&self, bin: usize) -> (usize, f64) {
        match self.kind {
            PeakPickType::AllPeaks | PeakPickType::MajorPeaks => (MAJOR_PEAK_WINDOW, 0.5),
            PeakPickType::MajorPitchAdaptivePeaks => {
                if bin == 0 || self.sample_rate <= 0.0 {
                    return (MIN_ADAPTIVE_WINDOW, 0.5);
                }
                let n = self.fft_size as f64;
                let bin_freq = self.sample_rate * bin as f64 / n;
                let hi_freq = frequency_for_pitch(ADAPTIVE_SPAN_PITCH, 0.0, bin_freq);
                let hi_bin = (hi_freq * n / self.sample_rate).round() as usize;
                let size = hi_bin.saturating_sub(bin).max(MIN_ADAPTIVE_WINDOW);
                (size, 0.5 + bin_freq / self.sample_rate)
            }
        }
    }

    /// Peak bins of `magnitudes` within `[ymin, ymax]`.
    ///
    /// `ymax == 0`, or any value past the last bin, means the last bin.
    pub fn pick(&self, magnitudes: &[f32], ymin: usize, ymax: usize) -> PeakLocationSet {
        let height = magnitudes.len();
        if height == 0 {
            return PeakLocationSet::new();
        }
        let ymax = if ymax == 0 || ymax > height - 1 {
            height - 1
        } else {
            ymax
        };
        if ymin > ymax {
            return PeakLocationSet::new();
        }

        match self.kind {
            PeakPickType::AllPeaks => local_maxima(magnitudes, ymin, ymax),
            PeakPickType::MajorPeaks | PeakPickType::MajorPitchAdaptivePeaks => {
                self.median_peaks(magnitudes, ymin, ymax)
            }
        }
    }

    fn median_peaks(&self, values: &[f32], ymin: usize, ymax: usize) -> PeakLocationSet {
        let last = values.len() - 1;

        let (initial_size, _) = self.window_size(ymin);
        let bin_min = ymin.saturating_sub(initial_size / 2);

        let mut window: VecDeque<f32> = VecDeque::new();
        let mut runs = RunCollapser::new(ymin, ymax);
        let mut next_centre = bin_min;
        let mut floor = 0.0f32;

        let mut bin = bin_min;
        while bin <= last && runs.wants(next_centre) {
            window.push_back(values[bin]);

            let (size, percentile) = self.window_size(bin);
            while window.len() > size {
                window.pop_front();
            }

            floor = percentile_of(&window, percentile);

            // Trailing window: the bin it is centred on lags the newest bin
            let centre = bin - window.len() / 2;
            while next_centre <= centre && runs.wants(next_centre) {
                runs.classify(next_centre, values[next_centre], floor);
                next_centre += 1;
            }

            bin += 1;
        }

        // Bins near the top of the spectrum never become a window centre;
        // judge them against the last floor.
        while next_centre <= last && runs.wants(next_centre) {
            runs.classify(next_centre, values[next_centre], floor);
            next_centre += 1;
        }

        runs.finish()
    }
}

/// Accumulates runs of above-floor bins and emits each run's loudest bin
/// if it lies in `[ymin, ymax]`. Runs crossing a range limit are followed
/// to their end.
struct RunCollapser {
    ymin: usize,
    ymax: usize,
    best: Option<(usize, f32)>,
    peaks: PeakLocationSet,
}

impl RunCollapser {
    fn new(ymin: usize, ymax: usize) -> Self {
        Self {
            ymin,
            ymax,
            best: None,
            peaks: PeakLocationSet::new(),
        }
    }

    /// Whether `bin` still needs classifying: inside the range, or
    /// continuing a run that started inside or below it.
    fn wants(&self, bin: usize) -> bool {
        bin <= self.ymax || self.best.is_some()
    }

    fn classify(&mut self, bin: usize, value: f32, floor: f32) {
        if value > floor {
            match self.best {
                Some((_, best)) if best >= value => {}
                _ => self.best = Some((bin, value)),
            }
        } else {
            self.flush();
        }
    }

    fn flush(&mut self) {
        if let Some((bin, _)) = self.best.take() {
            if (self.ymin..=self.ymax).contains(&bin) {
                self.peaks.insert(bin);
            }
        }
    }

    fn finish(mut self) -> PeakLocationSet {
        self.flush();
        self.peaks
    }
}

fn local_maxima(values: &[f32], ymin: usize, ymax: usize) -> PeakLocationSet {
    let last = values.len() - 1;
    let min_bin = ymin.saturating_sub(1);
    let max_bin = if ymax < last { ymax + 1 } else { ymax };

    (ymin..=ymax)
        .filter(|&bin| bin != min_bin && bin != max_bin)
        .filter(|&bin| values[bin] > values[bin - 1] && values[bin] > values[bin + 1])
        .collect()
}

fn percentile_of(window: &VecDeque<f32>, percentile: f64) -> f32 {
    let mut sorted: Vec<f32> = window.iter().copied().collect();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let index = ((sorted.len() as f64 * percentile) as usize).min(sorted.len() - 1);
    sorted[index]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bumpy(len: usize, bumps: &[(usize, f32)]) -> Vec<f32> {
        let mut v = vec![1.0f32; len];
        for &(centre, height) in bumps {
            v[centre] = height;
            if centre > 0 {
                v[centre - 1] = height / 2.0;
            }
            if centre + 1 < len {
                v[centre + 1] = height / 2.0;
            }
        }
        v
    }

    fn set(bins: &[usize]) -> PeakLocationSet {
        bins.iter().copied().collect()
    }

    #[test]
    fn test_all_peaks_local_maxima() {
        let picker = PeakPicker::new(PeakPickType::AllPeaks, 8.0, 8);
        let values = [1.0, 5.0, 2.0, 5.0, 1.0];
        assert_eq!(picker.pick(&values, 0, 4), set(&[1, 3]));
        assert_eq!(picker.pick(&values, 0, 0), set(&[1, 3]));
        assert_eq!(picker.pick(&values, 2, 3), set(&[3]));
        assert_eq!(picker.pick(&values, 2, 2), set(&[]));
    }

    #[test]
    fn test_all_peaks_edges_never_peak() {
        let picker = PeakPicker::new(PeakPickType::AllPeaks, 8.0, 8);
        let values = [9.0, 1.0, 1.0, 1.0, 9.0];
        assert!(picker.pick(&values, 0, 4).is_empty());
    }

    #[test]
    fn test_all_peaks_plateau_is_not_a_peak() {
        let picker = PeakPicker::new(PeakPickType::AllPeaks, 8.0, 8);
        let values = [1.0, 3.0, 3.0, 1.0, 1.0];
        assert!(picker.pick(&values, 0, 0).is_empty());
    }

    #[test]
    fn test_major_peaks_collapse_runs() {
        let picker = PeakPicker::new(PeakPickType::MajorPeaks, 1000.0, 126);
        let values = bumpy(64, &[(20, 10.0), (45, 8.0)]);
        assert_eq!(picker.pick(&values, 0, 0), set(&[20, 45]));
    }

    #[test]
    fn test_major_peaks_clip_to_range() {
        let picker = PeakPicker::new(PeakPickType::MajorPeaks, 1000.0, 126);
        let values = bumpy(64, &[(20, 10.0), (45, 8.0)]);
        assert_eq!(picker.pick(&values, 30, 0), set(&[45]));
        assert_eq!(picker.pick(&values, 0, 30), set(&[20]));
        assert_eq!(picker.pick(&values, 20, 20), set(&[20]));
    }

    #[test]
    fn test_major_peaks_ignore_shoulders_of_outside_peaks() {
        let picker = PeakPicker::new(PeakPickType::MajorPeaks, 1000.0, 126);
        let values = bumpy(64, &[(20, 10.0)]);
        // Bins 19 and 21 are above the floor but belong to the run peaking at 20
        assert!(picker.pick(&values, 0, 19).is_empty());
        assert!(picker.pick(&values, 21, 40).is_empty());
        assert!(picker.pick(&values, 19, 19).is_empty());
    }

    #[test]
    fn test_major_peaks_flat_spectrum_has_no_peaks() {
        let picker = PeakPicker::new(PeakPickType::MajorPeaks, 1000.0, 126);
        assert!(picker.pick(&[1.0f32; 64], 0, 0).is_empty());
        assert!(picker.pick(&[0.0f32; 64], 0, 0).is_empty());
    }

    #[test]
    fn test_major_peaks_at_spectrum_end() {
        let picker = PeakPicker::new(PeakPickType::MajorPeaks, 1000.0, 126);
        let mut values = vec![1.0f32; 64];
        values[62] = 4.0;
        values[63] = 6.0;
        assert_eq!(picker.pick(&values, 0, 0), set(&[63]));
    }

    #[test]
    fn test_adaptive_window_sizes() {
        let picker = PeakPicker::new(PeakPickType::MajorPitchAdaptivePeaks, 44100.0, 1024);
        assert_eq!(picker.window_size(0), (3, 0.5));
        assert_eq!(picker.window_size(5).0, 3);

        let (size, percentile) = picker.window_size(200);
        assert_eq!(size, 52);
        assert!((percentile - (0.5 + 200.0 / 1024.0)).abs() < 1e-9);

        let major = PeakPicker::new(PeakPickType::MajorPeaks, 44100.0, 1024);
        assert_eq!(major.window_size(200), (10, 0.5));
    }

    #[test]
    fn test_adaptive_finds_isolated_peaks() {
        let picker = PeakPicker::new(PeakPickType::MajorPitchAdaptivePeaks, 1000.0, 126);
        let values = bumpy(64, &[(10, 10.0), (40, 8.0)]);
        assert_eq!(picker.pick(&values, 0, 0), set(&[10, 40]));
        assert!(picker.pick(&[2.0f32; 64], 0, 0).is_empty());
    }

    #[test]
    fn test_adaptive_respects_range() {
        let picker = PeakPicker::new(PeakPickType::MajorPitchAdaptivePeaks, 1000.0, 126);
        let values = bumpy(64, &[(10, 10.0), (40, 8.0)]);
        assert_eq!(picker.pick(&values, 30, 50), set(&[40]));
        assert_eq!(picker.pick(&values, 0, 30), set(&[10]));
        assert_eq!(picker.pick(&values, 0, 39), set(&[10]));
        assert!(picker.pick(&values, 41, 63).is_empty());
        assert!(picker.pick(&values, 0, 9).is_empty());
    }

    #[test]
    fn test_adaptive_run_ending_at_range_limit() {
        let picker = PeakPicker::new(PeakPickType::MajorPitchAdaptivePeaks, 1000.0, 126);
        let values = bumpy(64, &[(10, 10.0), (40, 8.0)]);
        assert_eq!(picker.pick(&values, 0, 40), set(&[10, 40]));
        assert_eq!(picker.pick(&values, 40, 40), set(&[40]));
    }

    #[test]
    fn test_adaptive_percentile_saturates_at_nyquist() {
        let mut values = vec![1.0f32; 64];
        values[60] = 2.0;
        values[61] = 3.0;
        values[62] = 4.0;
        values[63] = 5.0;

        // The percentile reaches the top of the window at the last bin, so
        // a rising edge into Nyquist stays at the floor
        let adaptive = PeakPicker::new(PeakPickType::MajorPitchAdaptivePeaks, 1000.0, 126);
        assert_eq!(adaptive.window_size(63).0, 16);
        assert!(adaptive.pick(&values, 0, 0).is_empty());
        assert!(adaptive.pick(&values, 50, 63).is_empty());

        let major = PeakPicker::new(PeakPickType::MajorPeaks, 1000.0, 126);
        assert_eq!(major.pick(&values, 0, 0), set(&[63]));
        assert_eq!(major.pick(&values, 60, 63), set(&[63]));
    }

    #[test]
    fn test_inverted_range_is_empty() {
        let picker = PeakPicker::new(PeakPickType::MajorPeaks, 1000.0, 126);
        let values = bumpy(64, &[(20, 10.0)]);
        assert!(picker.pick(&values, 40, 30).is_empty());
        assert!(picker.pick(&[], 0, 0).is_empty());
    }

    #[test]
    fn test_parse_kind() {
        assert_eq!("all".parse::<PeakPickType>().unwrap(), PeakPickType::AllPeaks);
        assert_eq!(
            "adaptive".parse::<PeakPickType>().unwrap(),
            PeakPickType::MajorPitchAdaptivePeaks
        );
        assert!("some".parse::<PeakPickType>().is_err());
    }
}
