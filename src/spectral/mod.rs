pub mod columns;
pub mod frequency;
pub mod model;
pub mod observer;
pub mod peaks;
pub mod source;
pub mod transform;
pub mod window;

pub use model::{AnalysisParameters, FftModel};
pub use observer::{CacheKind, CacheObserver, CacheOutcome, CacheStats, HitCounter};
pub use peaks::{PeakLocationSet, PeakPickType, PeakPicker, PeakSet};
pub use source::{ChannelSelector, Frame, SampleSource};
pub use transform::{RustFftTransform, SpectralTransform};
pub use window::{Window, WindowShape};
