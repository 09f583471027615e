use std::sync::Arc;

use anyhow::Result;
use indicatif::ProgressBar;
use rayon::prelude::*;
use stft_model::pitch::pitch_label_for_frequency;
use stft_model::{AnalysisParameters, FftModel, HitCounter, PeakPickType, SampleSource};

use super::decode::AudioData;
use super::features::{ColumnFeatures, GlobalAnalysis, PeakFeature};

/// Columns handed to one worker. Each worker owns its own engine, so
/// chunks should be long enough for the column cache to pay off.
const COLUMNS_PER_CHUNK: usize = 256;

#[derive(Clone, Debug)]
pub struct AnalysisOptions {
    pub params: AnalysisParameters,
    pub peak_type: PeakPickType,
    pub min_bin: usize,
    /// 0 means the top bin
    pub max_bin: usize,
    /// Peaks quieter than this linear magnitude are dropped
    pub threshold: f32,
    pub concert_a: f64,
    pub use_flats: bool,
}

pub fn analyze(
    audio: Arc<AudioData>,
    options: &AnalysisOptions,
    progress: Option<&ProgressBar>,
) -> Result<(GlobalAnalysis, Vec<ColumnFeatures>)> {
    let source: Arc<dyn SampleSource> = audio.clone();

    log::info!("Pass 1: Grid layout...");
    let probe = FftModel::new(source.clone(), options.params)?;
    let width = probe.width();
    let height = probe.height();
    drop(probe);
    log::info!(
        "{} columns x {} bins ({} window {}, increment {}, fft {})",
        width,
        height,
        options.params.window,
        options.params.window_size,
        options.params.window_increment,
        options.params.fft_size
    );

    if let Some(pb) = progress {
        pb.set_length(width as u64);
    }

    log::info!("Pass 2: Peak frequencies ({} peaks)...", options.peak_type);
    let counter = Arc::new(HitCounter::new());
    let chunks = width.div_ceil(COLUMNS_PER_CHUNK);

    let per_chunk: Vec<Vec<ColumnFeatures>> = (0..chunks)
        .into_par_iter()
        .map(|chunk| -> Result<Vec<ColumnFeatures>> {
            let start = chunk * COLUMNS_PER_CHUNK;
            let end = (start + COLUMNS_PER_CHUNK).min(width);
            let mut model =
                FftModel::new(source.clone(), options.params)?.with_observer(counter.clone());

            let columns = (start..end)
                .map(|x| {
                    let features = column_features(&mut model, x, options);
                    if let Some(pb) = progress {
                        pb.inc(1);
                    }
                    features
                })
                .collect();
            Ok(columns)
        })
        .collect::<Result<_>>()?;

    let columns: Vec<ColumnFeatures> = per_chunk.into_iter().flatten().collect();

    log::info!("Pass 3: Summary...");
    let total_peaks: usize = columns.iter().map(|c| c.peaks.len()).sum();
    counter.report();

    let global = GlobalAnalysis {
        sample_rate: audio.sample_rate,
        channels: audio.channels.len(),
        total_frames: audio.frames(),
        duration: audio.duration(),
        parameters: options.params,
        peak_type: options.peak_type,
        width,
        height,
        concert_a: options.concert_a,
        total_peaks,
    };

    log::info!(
        "Global: {} columns, {} peaks, {:.1} peaks/column",
        width,
        total_peaks,
        if width == 0 { 0.0 } else { total_peaks as f32 / width as f32 }
    );

    Ok((global, columns))
}

fn column_features(model: &mut FftModel, x: usize, options: &AnalysisOptions) -> ColumnFeatures {
    let sample_rate = model.sample_rate() as f64;
    let frame = (x * model.resolution()) as u64;

    let frequencies = model.peak_frequencies(options.peak_type, x, options.min_bin, options.max_bin);
    let peaks = frequencies
        .into_iter()
        .filter_map(|(bin, frequency)| {
            let magnitude = model.magnitude(x, bin);
            if magnitude < options.threshold {
                return None;
            }
            let pitch = if frequency > 0.0 {
                pitch_label_for_frequency(frequency, options.concert_a, options.use_flats)
            } else {
                String::new()
            };
            Some(PeakFeature {
                bin,
                frequency,
                magnitude,
                pitch,
            })
        })
        .collect();

    ColumnFeatures {
        column: x,
        frame,
        time: if sample_rate > 0.0 { frame as f64 / sample_rate } else { 0.0 },
        peaks,
    }
}
