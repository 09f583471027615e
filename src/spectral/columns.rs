use rustfft::num_complex::Complex32;

pub const DEFAULT_COLUMN_CACHE_SIZE: usize = 3;

#[derive(Debug, Clone)]
struct CachedColumn {
    column: Option<usize>,
    spectrum: Vec<Complex32>,
}

#[derive(Debug, Clone)]
pub struct ColumnCache {
    slots: Vec<CachedColumn>,
    write_index: usize,
}

impl ColumnCache {
    /// `capacity` slots of `bins` complex values each. Capacity is at least 1.
    pub fn new(capacity: usize, bins: usize) -> Self {
        let slots = (0..capacity.max(1))
            .map(|_| CachedColumn {
                column: None,
                spectrum: vec![Complex32::new(0.0, 0.0); bins],
            })
            .collect();
        Self {
            slots,
            write_index: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Slot holding `column`, if cached.
    pub fn find(&self, column: usize) -> Option<usize> {
        self.slots.iter().position(|s| s.column == Some(column))
    }

    pub fn spectrum(&self, slot: usize) -> &[Complex32] {
        &self.slots[slot].spectrum
    }

    /// Claim the oldest slot for `column` and advance the write cursor.
    ///
    /// Returns the slot index; its spectrum must be overwritten by the
    /// caller through [`ColumnCache::spectrum_mut`].
    pub fn claim(&mut self, column: usize) -> usize {
        let slot = self.write_index;
        self.slots[slot].column = Some(column);
        self.write_index = (self.write_index + 1) % self.slots.len();
        slot
    }

    pub fn spectrum_mut(&mut self, slot: usize) -> &mut [Complex32] {
        &mut self.slots[slot].spectrum
    }

    /// Columns currently held, in slot order.
    pub fn cached_columns(&self) -> impl Iterator<Item = usize> + '_ {
        self.slots.iter().filter_map(|s| s.column)
    }

    pub fn clear(&mut self) {
        for slot in &mut self.slots {
            slot.column = None;
        }
        self.write_index = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ring_overwrites_oldest() {
        let mut cache = ColumnCache::new(3, 2);
        for col in 0..3 {
            let slot = cache.claim(col);
            cache.spectrum_mut(slot)[0] = Complex32::new(col as f32, 0.0);
        }
        assert_eq!(cache.find(0), Some(0));

        let slot = cache.claim(7);
        assert_eq!(slot, 0);
        assert_eq!(cache.find(0), None);
        assert_eq!(cache.find(1), Some(1));
        assert_eq!(cache.find(7), Some(0));
        assert_eq!(cache.spectrum(1)[0].re, 1.0);
    }

    #[test]
    fn test_clear_forgets_columns() {
        let mut cache = ColumnCache::new(3, 2);
        cache.claim(4);
        cache.claim(5);
        assert_eq!(cache.cached_columns().collect::<Vec<_>>(), vec![4, 5]);
        cache.clear();
        assert_eq!(cache.find(4), None);
        assert_eq!(cache.cached_columns().count(), 0);
    }

    #[test]
    fn test_zero_capacity_is_promoted() {
        let mut cache = ColumnCache::new(0, 4);
        assert_eq!(cache.capacity(), 1);
        cache.claim(2);
        assert_eq!(cache.find(2), Some(0));
    }
}
