//! Short-time spectral analysis over a dense time-domain signal.
//!
//! [`FftModel`] turns a [`SampleSource`] into a lazily computed, cached
//! grid of complex spectra, with magnitude and phase accessors,
//! phase-vocoder frequency refinement and three peak-picking strategies.
//!
//! ```no_run
//! use std::sync::Arc;
//! use stft_model::{AnalysisParameters, FftModel, PeakPickType, SampleSource, WindowShape};
//!
//! fn peaks(source: Arc<dyn SampleSource>) -> stft_model::Result<()> {
//!     let params = AnalysisParameters::new(WindowShape::Hann, 2048, 512, 4096);
//!     let mut model = FftModel::new(source, params)?;
//!     for x in 0..model.width() {
//!         for (bin, hz) in model.peak_frequencies(PeakPickType::MajorPeaks, x, 0, 0) {
//!             println!("column {} bin {}: {:.1} Hz", x, bin, hz);
//!         }
//!     }
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod pitch;
pub mod spectral;

pub use error::{AnalysisError, Result};
pub use spectral::{
    AnalysisParameters, CacheKind, CacheObserver, CacheOutcome, CacheStats, ChannelSelector,
    FftModel, Frame, HitCounter, PeakLocationSet, PeakPickType, PeakPicker, PeakSet,
    RustFftTransform, SampleSource, SpectralTransform, Window, WindowShape,
};
