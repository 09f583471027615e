//! Error types for engine construction

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnalysisError {
    #[error("window size ({window_size}) must not exceed FFT size ({fft_size})")]
    WindowExceedsTransform { window_size: usize, fft_size: usize },

    #[error("window size must be greater than zero")]
    EmptyWindow,

    #[error("transform size ({actual}) does not match FFT size ({expected})")]
    TransformSizeMismatch { expected: usize, actual: usize },

    #[error("window increment must be greater than zero")]
    ZeroIncrement,

    #[error("channel {channel} out of range (source has {available} channels)")]
    ChannelOutOfRange { channel: usize, available: usize },

    #[error("unknown window shape: {0}")]
    UnknownWindow(String),

    #[error("unknown peak pick type: {0}")]
    UnknownPeakPickType(String),

    #[error("invalid channel selector: {0}")]
    InvalidChannel(String),
}

pub type Result<T> = std::result::Result<T, AnalysisError>;
