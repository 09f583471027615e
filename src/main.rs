mod audio;
mod cli;
mod config;
mod encode;

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::sync::Arc;

use stft_model::{AnalysisParameters, ChannelSelector, PeakPickType, WindowShape};

use audio::analysis::AnalysisOptions;
use cli::Cli;
use encode::csv::CsvWriter;
use encode::ReportFormat;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let mut cli = Cli::parse();

    let config_path = cli.config.clone().or_else(config::find_config);
    if let Some(ref path) = config_path {
        if let Some(cfg) = config::load_config(path) {
            log::info!("Loaded config from {}", path.display());
            // Merge: config values apply only when CLI is at its default
            let a = cfg.analysis;
            if cli.window == config::default_window() { cli.window = a.window; }
            if cli.window_size == config::default_window_size() { cli.window_size = a.window_size; }
            if cli.hop == config::default_hop() { cli.hop = a.hop; }
            if cli.fft_size.is_none() { cli.fft_size = a.fft_size; }
            if cli.channel == config::default_channel() { cli.channel = a.channel; }
            if cli.peaks == config::default_peaks() { cli.peaks = a.peaks; }
            if cli.min_bin == 0 { cli.min_bin = a.min_bin; }
            if cli.max_bin == 0 { cli.max_bin = a.max_bin; }
            let o = cfg.output;
            if cli.format == "json" { cli.format = o.format.to_string(); }
            if cli.separator == config::default_separator() { cli.separator = o.separator; }
            if !cli.frame_timestamps { cli.frame_timestamps = o.timestamps; }
        } else {
            log::warn!("Failed to load config from {}", path.display());
        }
    }

    if !cli.input.exists() {
        anyhow::bail!("Input file not found: {}", cli.input.display());
    }

    let window: WindowShape = cli.window.parse()?;
    let channel: ChannelSelector = cli.channel.parse()?;
    let peak_type: PeakPickType = cli.peaks.parse()?;
    let format: ReportFormat = cli.format.parse()?;
    let params = AnalysisParameters::new(
        window,
        cli.window_size,
        cli.hop,
        cli.fft_size.unwrap_or(cli.window_size),
    )
    .with_channel(channel);
    params.validate()?;

    log::info!("stft-model - short-time spectral analysis");
    log::info!("Input: {}", cli.input.display());
    match cli.output {
        Some(ref out) => log::info!("Output: {} ({})", out.display(), format),
        None => log::info!("Output: stdout ({})", format),
    }

    // 1. Decode audio
    log::info!("Decoding audio...");
    let audio = Arc::new(audio::decode::decode_audio(&cli.input)?);

    // 2. Analyze (3-pass pipeline)
    let options = AnalysisOptions {
        params,
        peak_type,
        min_bin: cli.min_bin,
        max_bin: cli.max_bin,
        threshold: cli.threshold,
        concert_a: cli.concert_a,
        use_flats: cli.flats,
    };

    let pb = ProgressBar::new(0);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} columns ({eta} remaining)")
            .context("Invalid progress bar template")?
            .progress_chars("=>-"),
    );
    let (global, columns) = audio::analysis::analyze(audio, &options, Some(&pb))?;
    pb.finish_with_message("Analysis complete");

    // 3. Write report
    let out: Box<dyn Write> = match cli.output {
        Some(ref path) => Box::new(BufWriter::new(
            File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path.display()))?,
        )),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };

    match format {
        ReportFormat::Json => encode::json::write_report(out, &global, &columns)?,
        ReportFormat::Csv => {
            let mut writer = CsvWriter::new(out, &cli.separator, cli.frame_timestamps);
            for column in &columns {
                writer.write_column(column)?;
            }
            writer.finish()?;
        }
    }

    log::info!("Done! {} peaks in {} columns", global.total_peaks, global.width);
    Ok(())
}
