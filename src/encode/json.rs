use anyhow::{Context, Result};
use serde::Serialize;
use std::io::Write;

use crate::audio::features::{ColumnFeatures, GlobalAnalysis};

#[derive(Serialize)]
struct Report<'a> {
    analysis: &'a GlobalAnalysis,
    columns: &'a [ColumnFeatures],
}

/// Writes the analysis summary and every column as one JSON object.
pub fn write_report<W: Write>(
    mut out: W,
    global: &GlobalAnalysis,
    columns: &[ColumnFeatures],
) -> Result<()> {
    let report = Report {
        analysis: global,
        columns,
    };
    serde_json::to_writer_pretty(&mut out, &report).context("Failed to write JSON report")?;
    writeln!(out)?;
    out.flush().context("Failed to flush JSON output")?;
    log::info!("JSON output complete: {} columns", columns.len());
    Ok(())
}
