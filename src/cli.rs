use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "stft-model", about = "Short-time spectral analysis and peak frequency reports")]
pub struct Cli {
    /// Input audio file (WAV, MP3, FLAC, OGG)
    pub input: PathBuf,

    /// Report file; stdout when omitted
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Config file (default: stft-model.toml, then ~/.config/stft-model/config.toml)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Window shape (rectangular, bartlett, hamming, hann, blackman,
    /// gaussian, parzen, nuttall, blackman-harris)
    #[arg(long, default_value = "hann")]
    pub window: String,

    /// Window size in frames
    #[arg(long, default_value_t = 2048)]
    pub window_size: usize,

    /// Window increment (hop) in frames
    #[arg(long, default_value_t = 512)]
    pub hop: usize,

    /// FFT size; defaults to the window size, larger values zero-pad
    #[arg(long)]
    pub fft_size: Option<usize>,

    /// Channel index, or "all" to mix every channel down
    #[arg(long, default_value = "all")]
    pub channel: String,

    /// Peak picking: all, major, adaptive
    #[arg(long, default_value = "major")]
    pub peaks: String,

    /// Lowest bin searched for peaks
    #[arg(long, default_value_t = 0)]
    pub min_bin: usize,

    /// Highest bin searched for peaks (0 = Nyquist)
    #[arg(long, default_value_t = 0)]
    pub max_bin: usize,

    /// Drop peaks below this linear magnitude
    #[arg(long, default_value_t = 0.0)]
    pub threshold: f32,

    /// Report format: json or csv
    #[arg(long, default_value = "json")]
    pub format: String,

    /// CSV field separator
    #[arg(long, default_value = ",")]
    pub separator: String,

    /// Report column times in frames instead of seconds
    #[arg(long)]
    pub frame_timestamps: bool,

    /// Tuning frequency of A4 for pitch labels
    #[arg(long, default_value_t = 440.0)]
    pub concert_a: f64,

    /// Spell accidentals as flats in pitch labels
    #[arg(long)]
    pub flats: bool,
}
