use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::observer::{CacheKind, CacheObserver, CacheOutcome};
use crate::error::AnalysisError;

/// Signed frame index. Analysis columns are centred on their hop position,
/// so the first column reads from negative frames.
pub type Frame = i64;

/// A dense multi-channel time-domain signal.
///
/// Implementations may still be filling in (a decode in progress), in which
/// case `completion()` reports less than 100 and `len()` is the number of
/// frames available so far.
pub trait SampleSource: Send + Sync {
    fn sample_rate(&self) -> u32;

    fn channel_count(&self) -> usize;

    /// Number of frames available.
    fn len(&self) -> u64;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Read up to `count` frames of `channel` starting at `start`.
    ///
    /// May return fewer samples than requested near the end of the signal.
    fn read(&self, channel: usize, start: u64, count: usize) -> Vec<f32>;

    /// Percentage of the signal that is available, 0-100.
    fn completion(&self) -> u8 {
        100
    }
}

/// Which channel of the source feeds the analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelSelector {
    /// Mean of all channels.
    #[default]
    Mixdown,
    Channel(usize),
}

impl fmt::Display for ChannelSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChannelSelector::Mixdown => write!(f, "all"),
            ChannelSelector::Channel(c) => write!(f, "{}", c),
        }
    }
}

impl FromStr for ChannelSelector {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("all") || s.eq_ignore_ascii_case("mix") || s == "-1" {
            return Ok(ChannelSelector::Mixdown);
        }
        s.parse::<usize>()
            .map(ChannelSelector::Channel)
            .map_err(|_| AnalysisError::InvalidChannel(s.to_string()))
    }
}

/// Read `[start, end)` from `source`, zero-filling everything outside the
/// source's frame span. Always returns exactly `end - start` samples.
pub fn read_padded(
    source: &dyn SampleSource,
    channel: ChannelSelector,
    start: Frame,
    end: Frame,
) -> Vec<f32> {
    let len = (end - start).max(0) as usize;
    let mut out = vec![0.0f32; len];
    if len == 0 {
        return out;
    }

    let available = source.len() as Frame;
    let read_start = start.max(0);
    let read_end = end.min(available);
    if read_start >= read_end {
        log::debug!(
            "No source data for range ({}, {}), source length {}",
            start,
            end,
            available
        );
        return out;
    }

    let offset = (read_start - start) as usize;
    let count = (read_end - read_start) as usize;
    let dest = &mut out[offset..offset + count];

    match channel {
        ChannelSelector::Channel(c) => {
            let data = source.read(c, read_start as u64, count);
            let n = data.len().min(count);
            dest[..n].copy_from_slice(&data[..n]);
        }
        ChannelSelector::Mixdown => {
            let channels = source.channel_count();
            if channels == 0 {
                return out;
            }
            for c in 0..channels {
                let data = source.read(c, read_start as u64, count);
                for (d, s) in dest.iter_mut().zip(data.iter()) {
                    *d += s;
                }
            }
            if channels > 1 {
                let factor = 1.0 / channels as f32;
                for d in dest.iter_mut() {
                    *d *= factor;
                }
            }
        }
    }

    out
}

/// Holds the most recently fetched contiguous source range.
///
/// A request whose start lies inside the held range and whose end extends
/// past it only fetches the missing tail from the source.
#[derive(Debug, Clone)]
pub struct SourceSampleCache {
    channel: ChannelSelector,
    range: Option<(Frame, Frame)>,
    data: Vec<f32>,
}

impl SourceSampleCache {
    pub fn new(channel: ChannelSelector) -> Self {
        Self {
            channel,
            range: None,
            data: Vec::new(),
        }
    }

    pub fn channel(&self) -> ChannelSelector {
        self.channel
    }

    /// The currently held `(start, end)` range, if any.
    pub fn range(&self) -> Option<(Frame, Frame)> {
        self.range
    }

    /// Samples for `[start, end)`. Mutates the held range as a side effect.
    pub fn get(
        &mut self,
        source: &dyn SampleSource,
        start: Frame,
        end: Frame,
        observer: Option<&dyn CacheObserver>,
    ) -> &[f32] {
        let outcome = match self.range {
            Some(held) if held == (start, end) => CacheOutcome::Hit,
            Some((held_start, held_end))
                if start >= held_start && start < held_end && end > held_end =>
            {
                let discard = (start - held_start) as usize;
                self.data.drain(..discard);
                let rest = read_padded(source, self.channel, held_end, end);
                self.data.extend_from_slice(&rest);
                self.range = Some((start, end));
                CacheOutcome::Partial
            }
            _ => {
                self.data = read_padded(source, self.channel, start, end);
                self.range = Some((start, end));
                CacheOutcome::Miss
            }
        };

        if let Some(observer) = observer {
            observer.record(CacheKind::Source, outcome);
        }

        debug_assert_eq!(self.data.len() as Frame, end - start);
        &self.data
    }

    /// Drop the last held sample, which may have been read while the
    /// source was being written.
    pub fn mark_tail_stale(&mut self) {
        if let Some((start, end)) = self.range {
            if end - start <= 1 {
                self.clear();
            } else {
                self.data.pop();
                self.range = Some((start, end - 1));
            }
        }
    }

    pub fn clear(&mut self) {
        self.range = None;
        self.data.clear();
    }
}
