use anyhow::{Context, Result};
use std::io::Write;

use crate::audio::features::ColumnFeatures;

/// Writes one delimited line per peak:
/// `column, time, bin, frequency, magnitude, "pitch"`.
///
/// Time is the column centre in seconds, or in source frames when
/// `frame_timestamps` is set.
pub struct CsvWriter<W: Write> {
    out: W,
    separator: String,
    frame_timestamps: bool,
    lines: usize,
}

impl<W: Write> CsvWriter<W> {
    pub fn new(out: W, separator: &str, frame_timestamps: bool) -> Self {
        Self {
            out,
            separator: separator.to_string(),
            frame_timestamps,
            lines: 0,
        }
    }

    pub fn write_column(&mut self, column: &ColumnFeatures) -> Result<()> {
        let sep = &self.separator;
        let time = if self.frame_timestamps {
            column.frame.to_string()
        } else {
            format!("{:.6}", column.time)
        };

        for peak in &column.peaks {
            writeln!(
                self.out,
                "{}{sep}{}{sep}{}{sep}{:.4}{sep}{}{sep}\"{}\"",
                column.column,
                time,
                peak.bin,
                peak.frequency,
                peak.magnitude,
                peak.pitch.replace('"', "\"\""),
                sep = sep
            )
            .context("Failed to write CSV line")?;
            self.lines += 1;
        }
        Ok(())
    }

    pub fn finish(mut self) -> Result<usize> {
        self.out.flush().context("Failed to flush CSV output")?;
        log::info!("CSV output complete: {} lines", self.lines);
        Ok(self.lines)
    }
}
