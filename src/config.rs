use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::encode::ReportFormat;

pub const CONFIG_FILE_NAME: &str = "stft-model.toml";

#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub analysis: AnalysisConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Deserialize)]
pub struct AnalysisConfig {
    #[serde(default = "default_window")]
    pub window: String,
    #[serde(default = "default_window_size")]
    pub window_size: usize,
    #[serde(default = "default_hop")]
    pub hop: usize,
    /// Defaults to the window size
    #[serde(default)]
    pub fft_size: Option<usize>,
    #[serde(default = "default_channel")]
    pub channel: String,
    #[serde(default = "default_peaks")]
    pub peaks: String,
    #[serde(default)]
    pub min_bin: usize,
    #[serde(default)]
    pub max_bin: usize,
}

#[derive(Debug, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: ReportFormat,
    #[serde(default = "default_separator")]
    pub separator: String,
    #[serde(default)]
    pub timestamps: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            window: default_window(),
            window_size: default_window_size(),
            hop: default_hop(),
            fft_size: None,
            channel: default_channel(),
            peaks: default_peaks(),
            min_bin: 0,
            max_bin: 0,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: ReportFormat::default(),
            separator: default_separator(),
            timestamps: false,
        }
    }
}

pub fn default_window() -> String { "hann".into() }
pub fn default_window_size() -> usize { 2048 }
pub fn default_hop() -> usize { 512 }
pub fn default_channel() -> String { "all".into() }
pub fn default_peaks() -> String { "major".into() }
pub fn default_separator() -> String { ",".into() }

pub fn load_config(path: &Path) -> Option<Config> {
    let content = std::fs::read_to_string(path).ok()?;
    match toml::from_str(&content) {
        Ok(config) => Some(config),
        Err(e) => {
            log::warn!("Invalid config {}: {}", path.display(), e);
            None
        }
    }
}

/// `stft-model.toml` in the working directory, then the XDG-style
/// `~/.config` location, then the platform config dir.
pub fn find_config() -> Option<PathBuf> {
    let local = PathBuf::from(CONFIG_FILE_NAME);
    if local.exists() {
        return Some(local);
    }
    if let Some(home) = dirs::home_dir() {
        let xdg = home.join(".config").join("stft-model").join("config.toml");
        if xdg.exists() {
            return Some(xdg);
        }
    }
    if let Some(config_dir) = dirs::config_dir() {
        let platform = config_dir.join("stft-model").join("config.toml");
        if platform.exists() {
            return Some(platform);
        }
    }
    None
}
