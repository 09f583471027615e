use serde::Serialize;
use stft_model::{AnalysisParameters, PeakPickType};

/// One picked peak with its refined frequency
#[derive(Clone, Debug, Serialize)]
pub struct PeakFeature {
    pub bin: usize,
    /// Phase-vocoder frequency estimate (Hz)
    pub frequency: f64,
    /// Linear magnitude of the bin
    pub magnitude: f32,
    /// Nearest equal-tempered pitch, e.g. "A4+3c"
    pub pitch: String,
}

/// Peaks of one analysis column
#[derive(Clone, Debug, Serialize)]
pub struct ColumnFeatures {
    pub column: usize,
    /// Source frame the column is centred on
    pub frame: u64,
    /// Column centre in seconds
    pub time: f64,
    pub peaks: Vec<PeakFeature>,
}

#[derive(Clone, Debug, Serialize)]
pub struct GlobalAnalysis {
    pub sample_rate: u32,
    pub channels: usize,
    pub total_frames: usize,
    pub duration: f32,
    pub parameters: AnalysisParameters,
    pub peak_type: PeakPickType,
    pub width: usize,
    pub height: usize,
    pub concert_a: f64,
    pub total_peaks: usize,
}
