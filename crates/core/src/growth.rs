//! Growth policy for the backing buffer
//!
//! Capacity starts at [`INITIAL_CAPACITY`] and only ever increases. When a
//! write lands at position `p >= capacity` the buffer is reallocated to
//!
//! ```text
//! new_capacity = max(p + 1, capacity * GROWTH_FACTOR)
//! ```
//!
//! The factor is fixed at build time: `2` by default, `8` with the
//! `aggressive-growth` feature.

/// Capacity of a freshly constructed sequence
pub const INITIAL_CAPACITY: usize = 1;

/// Multiplicative growth factor
#[cfg(not(feature = "aggressive-growth"))]
pub const GROWTH_FACTOR: usize = 2;

/// Multiplicative growth factor
#[cfg(feature = "aggressive-growth")]
pub const GROWTH_FACTOR: usize = 8;

/// Deterministic rule for choosing the next capacity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GrowthPolicy {
    factor: usize,
}

impl GrowthPolicy {
    /// The build-time policy used by every `Sequence`
    pub const DEFAULT: GrowthPolicy = GrowthPolicy {
        factor: GROWTH_FACTOR,
    };

    /// Create a policy with an explicit factor
    ///
    /// Factors below 2 would not give amortised-constant appends and are
    /// rejected.
    pub fn new(factor: usize) -> Result<Self, String> {
        if factor < 2 {
            return Err(format!("growth factor must be at least 2, got {}", factor));
        }
        Ok(GrowthPolicy { factor })
    }

    pub fn factor(&self) -> usize {
        self.factor
    }

    /// Capacity to allocate so that `needed` slots fit
    ///
    /// Returns `current` unchanged when it already suffices. Otherwise the
    /// result is strictly greater than `needed - 1`, so the slot that
    /// triggered the growth is addressable.
    pub fn next_capacity(&self, current: usize, needed: usize) -> usize {
        if needed <= current {
            return current;
        }
        current.saturating_mul(self.factor).max(needed)
    }
}

impl Default for GrowthPolicy {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_small_factors() {
        assert!(GrowthPolicy::new(0).is_err());
        assert!(GrowthPolicy::new(1).is_err());
        assert_eq!(GrowthPolicy::new(2).map(|p| p.factor()), Ok(2));
    }

    #[test]
    fn test_no_growth_when_capacity_suffices() {
        let policy = GrowthPolicy::new(2).unwrap();
        assert_eq!(policy.next_capacity(4, 3), 4);
        assert_eq!(policy.next_capacity(4, 4), 4);
    }

    #[test]
    fn test_multiplies_capacity() {
        let policy = GrowthPolicy::new(2).unwrap();
        assert_eq!(policy.next_capacity(1, 2), 2);
        assert_eq!(policy.next_capacity(2, 3), 4);
        assert_eq!(policy.next_capacity(4, 5), 8);

        let policy = GrowthPolicy::new(8).unwrap();
        assert_eq!(policy.next_capacity(1, 2), 8);
        assert_eq!(policy.next_capacity(8, 9), 64);
    }

    #[test]
    fn test_jumps_to_needed_for_bulk_inserts() {
        let policy = GrowthPolicy::new(2).unwrap();
        assert_eq!(policy.next_capacity(4, 100), 100);
    }

    #[test]
    fn test_saturates_instead_of_overflowing() {
        let policy = GrowthPolicy::new(2).unwrap();
        assert_eq!(policy.next_capacity(usize::MAX / 2 + 1, usize::MAX), usize::MAX);
    }

    #[test]
    fn test_default_matches_build_factor() {
        assert_eq!(GrowthPolicy::default().factor(), GROWTH_FACTOR);
        assert!(GROWTH_FACTOR >= 2);
    }
}
