//! Buffer statistics
//!
//! High-water marks for a single sequence's backing buffer. Updated inline
//! on the growth and insertion paths, so reading them costs nothing and
//! keeping them costs a compare per mutation.
//!
//! Statistics are never reset by `clear`; they describe the lifetime of the
//! sequence, not its current contents.

/// Lifetime statistics of one sequence
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BufferStats {
    /// Number of times the buffer was reallocated to grow
    pub reallocations: u64,
    /// Largest capacity ever allocated
    pub peak_capacity: usize,
    /// Largest length ever reached
    pub peak_length: usize,
}

impl BufferStats {
    pub(crate) fn new(initial_capacity: usize) -> Self {
        BufferStats {
            reallocations: 0,
            peak_capacity: initial_capacity,
            peak_length: 0,
        }
    }

    #[inline]
    pub(crate) fn record_growth(&mut self, new_capacity: usize) {
        self.reallocations += 1;
        self.peak_capacity = self.peak_capacity.max(new_capacity);
    }

    #[inline]
    pub(crate) fn record_length(&mut self, len: usize) {
        self.peak_length = self.peak_length.max(len);
    }
}
