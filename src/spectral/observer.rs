use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheKind {
    /// The single held range of time-domain samples.
    Source,
    /// The small ring of computed spectra.
    Column,
}

impl fmt::Display for CacheKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheKind::Source => write!(f, "source data cache"),
            CacheKind::Column => write!(f, "column cache"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheOutcome {
    Hit,
    Partial,
    Miss,
}

pub trait CacheObserver: Send + Sync {
    fn record(&self, cache: CacheKind, outcome: CacheOutcome);
}

#[derive(Debug, Default)]
struct Counts {
    hit: AtomicU64,
    partial: AtomicU64,
    miss: AtomicU64,
}

impl Counts {
    fn bump(&self, outcome: CacheOutcome) {
        let counter = match outcome {
            CacheOutcome::Hit => &self.hit,
            CacheOutcome::Partial => &self.partial,
            CacheOutcome::Miss => &self.miss,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    fn snapshot(&self) -> CacheStats {
        CacheStats {
            hits: self.hit.load(Ordering::Relaxed),
            partials: self.partial.load(Ordering::Relaxed),
            misses: self.miss.load(Ordering::Relaxed),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub partials: u64,
    pub misses: u64,
}

impl CacheStats {
    pub fn total(&self) -> u64 {
        self.hits + self.partials + self.misses
    }

    /// Fraction of lookups served fully from cache.
    pub fn hit_ratio(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// Counting observer, safe to share between engines on different threads.
#[derive(Debug, Default)]
pub struct HitCounter {
    source: Counts,
    column: Counts,
}

impl HitCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stats(&self, cache: CacheKind) -> CacheStats {
        match cache {
            CacheKind::Source => self.source.snapshot(),
            CacheKind::Column => self.column.snapshot(),
        }
    }

    /// Log a one-line summary per cache at info level.
    pub fn report(&self) {
        for kind in [CacheKind::Column, CacheKind::Source] {
            let stats = self.stats(kind);
            if stats.total() == 0 {
                continue;
            }
            log::info!(
                "{}: {} lookups, {} hits ({:.1}%), {} partial, {} misses",
                kind,
                stats.total(),
                stats.hits,
                stats.hit_ratio() * 100.0,
                stats.partials,
                stats.misses
            );
        }
    }
}

impl CacheObserver for HitCounter {
    fn record(&self, cache: CacheKind, outcome: CacheOutcome) {
        match cache {
            CacheKind::Source => self.source.bump(outcome),
            CacheKind::Column => self.column.bump(outcome),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_are_per_cache() {
        let counter = HitCounter::new();
        counter.record(CacheKind::Column, CacheOutcome::Hit);
        counter.record(CacheKind::Column, CacheOutcome::Miss);
        counter.record(CacheKind::Source, CacheOutcome::Partial);

        let column = counter.stats(CacheKind::Column);
        assert_eq!(column, CacheStats { hits: 1, partials: 0, misses: 1 });
        assert_eq!(column.hit_ratio(), 0.5);

        let source = counter.stats(CacheKind::Source);
        assert_eq!(source.partials, 1);
        assert_eq!(source.hit_ratio(), 0.0);
    }

    #[test]
    fn test_empty_ratio() {
        assert_eq!(CacheStats::default().hit_ratio(), 0.0);
    }
}
