//! Sequence: a growable, index-addressed container
//!
//! ## Storage
//!
//! ```text
//! Sequence<T, E>
//! ┌──────────────┐      ┌─────┬─────┬─────┬─────────┬─────────┐
//! │ buf ─────────┼────▶ │ e0  │ e1  │ e2  │ (stale) │ (stale) │
//! │ len = 3      │      └─────┴─────┴─────┴─────────┴─────────┘
//! │ eq: E        │       [0, len) live       [len, capacity) unobservable
//! │ stats        │
//! └──────────────┘
//! ```
//!
//! - Insertion shifts `[i, len)` up, removal shifts `[i + 1, len)` down.
//! - Removing or clearing drops the element at the moment `len` passes it.
//! - Capacity only grows (see [`crate::growth`]).
//!
//! ## Errors
//!
//! Positional operations validate first and mutate second. A call that
//! returns [`SequenceError::OutOfBounds`](crate::SequenceError) has not
//! touched the sequence.

use crate::buffer::RawBuffer;
use crate::equivalence::{Equivalence, NaturalEq};
use crate::error::{Result, check_element, check_position};
use crate::growth::{GrowthPolicy, INITIAL_CAPACITY};
use crate::stats::BufferStats;

/// A dynamically growing, index-addressed sequence of `T`
///
/// `E` decides when two elements are the same for value-based lookups and
/// defaults to the element's `PartialEq`.
///
/// ```
/// use slotvec::Sequence;
///
/// let mut seq = Sequence::new();
/// seq.append("a");
/// seq.append("c");
/// seq.insert(1, "b").unwrap();
///
/// assert_eq!(seq.len(), 3);
/// assert_eq!(seq.get(1), Ok(&"b"));
/// assert_eq!(seq.remove_at(0), Ok("a"));
/// assert!(seq.get(2).is_err());
/// ```
pub struct Sequence<T, E = NaturalEq> {
    buf: RawBuffer<T>,
    len: usize,
    eq: E,
    stats: BufferStats,
}

impl<T> Sequence<T> {
    /// Create an empty sequence compared by `PartialEq`
    pub fn new() -> Self {
        Self::with_equivalence(NaturalEq)
    }
}

impl<T, E> Sequence<T, E> {
    /// Create an empty sequence that compares elements with `eq`
    pub fn with_equivalence(eq: E) -> Self {
        Sequence {
            buf: RawBuffer::with_capacity(INITIAL_CAPACITY),
            len: 0,
            eq,
            stats: BufferStats::new(INITIAL_CAPACITY),
        }
    }

    /// Number of elements present
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of allocated slots; always at least `len()` and at least 1
    #[inline(always)]
    pub fn capacity(&self) -> usize {
        self.buf.capacity()
    }

    /// Lifetime statistics of the backing buffer
    pub fn stats(&self) -> BufferStats {
        self.stats
    }

    /// The equivalence used for value-based lookups
    pub fn equivalence(&self) -> &E {
        &self.eq
    }

    /// The live prefix of the buffer
    #[inline]
    fn live(&self) -> &[T] {
        unsafe { std::slice::from_raw_parts(self.buf.as_ptr(), self.len) }
    }

    /// Ensure room for `additional` more elements
    fn reserve(&mut self, additional: usize) {
        let needed = self
            .len
            .checked_add(additional)
            .expect("capacity overflow");
        if self.buf.reserve(needed, GrowthPolicy::DEFAULT) {
            self.stats.record_growth(self.buf.capacity());
        }
    }

    #[inline]
    fn set_len(&mut self, len: usize) {
        self.len = len;
        self.stats.record_length(len);
    }

    /// Borrow the element at `index`
    pub fn get(&self, index: usize) -> Result<&T> {
        check_element("get", index, self.len)?;
        Ok(unsafe { self.buf.slot(index) })
    }

    /// Mutably borrow the element at `index`
    pub fn get_mut(&mut self, index: usize) -> Result<&mut T> {
        check_element("get_mut", index, self.len)?;
        Ok(unsafe { self.buf.slot_mut(index) })
    }

    /// Replace the element at `index`, returning the previous one
    pub fn set(&mut self, index: usize, value: T) -> Result<T> {
        check_element("set", index, self.len)?;
        let slot = unsafe { self.buf.slot_mut(index) };
        Ok(std::mem::replace(slot, value))
    }

    /// Insert `value` at `index`, shifting later elements up by one
    ///
    /// `index == len()` appends.
    pub fn insert(&mut self, index: usize, value: T) -> Result<()> {
        check_position("insert", index, self.len)?;
        self.reserve(1);
        unsafe {
            self.buf.shift_right(index, self.len - index, 1);
            self.buf.write(index, value);
        }
        self.set_len(self.len + 1);
        Ok(())
    }

    /// Remove and return the element at `index`, shifting later elements down
    pub fn remove_at(&mut self, index: usize) -> Result<T> {
        check_element("remove_at", index, self.len)?;
        Ok(self.remove_unchecked(index))
    }

    fn remove_unchecked(&mut self, index: usize) -> T {
        debug_assert!(index < self.len);
        let tail = self.len - index - 1;
        unsafe {
            let removed = self.buf.read(index);
            self.buf.shift_left(index + 1, tail, 1);
            self.len -= 1;
            removed
        }
    }

    /// Append `value` at the end
    ///
    /// Always succeeds; the return value exists for symmetry with the other
    /// "did this change the sequence" operations.
    pub fn append(&mut self, value: T) -> bool {
        self.reserve(1);
        unsafe {
            self.buf.write(self.len, value);
        }
        self.set_len(self.len + 1);
        true
    }

    /// Append every element of `items` in iteration order
    ///
    /// Returns true iff at least one element was appended.
    pub fn append_all<I>(&mut self, items: I) -> bool
    where
        I: IntoIterator<Item = T>,
    {
        let items: Vec<T> = items.into_iter().collect();
        self.splice_in(self.len, items)
    }

    /// Insert every element of `items` starting at `index`, in iteration order
    ///
    /// Elements previously at `[index, len)` move up by the number inserted.
    /// Returns `Ok(true)` iff at least one element was inserted.
    pub fn insert_all<I>(&mut self, index: usize, items: I) -> Result<bool>
    where
        I: IntoIterator<Item = T>,
    {
        check_position("insert_all", index, self.len)?;
        let items: Vec<T> = items.into_iter().collect();
        Ok(self.splice_in(index, items))
    }

    // The input is fully collected before the buffer is touched, so a
    // panicking iterator never observes a half-shifted tail.
    fn splice_in(&mut self, index: usize, items: Vec<T>) -> bool {
        let count = items.len();
        if count == 0 {
            return false;
        }

        self.reserve(count);
        unsafe {
            self.buf.shift_right(index, self.len - index, count);
            for (offset, item) in items.into_iter().enumerate() {
                self.buf.write(index + offset, item);
            }
        }
        self.set_len(self.len + count);
        true
    }

    /// Drop every element; capacity is kept
    pub fn clear(&mut self) {
        let len = self.len;
        // Zero first: a panicking destructor leaks the rest instead of
        // leaving dropped values reachable.
        self.len = 0;
        unsafe {
            self.buf.drop_range(0, len);
        }
        tracing::debug!(dropped = len, capacity = self.buf.capacity(), "cleared sequence");
    }

    /// Keep only elements for which `keep` returns true, preserving order
    ///
    /// Single compaction pass. Returns true iff anything was dropped.
    fn compact<F>(&mut self, mut keep: F) -> bool
    where
        F: FnMut(&E, &T) -> bool,
    {
        let Sequence { buf, len, eq, .. } = self;
        let eq: &E = eq;
        let original = *len;
        // Hidden from Drop while slots are in flux
        *len = 0;

        let mut write = 0;
        for read in 0..original {
            let retained = keep(eq, unsafe { buf.slot(read) });
            unsafe {
                if retained {
                    if read != write {
                        let value = buf.read(read);
                        buf.write(write, value);
                    }
                    write += 1;
                } else {
                    buf.drop_range(read, read + 1);
                }
            }
        }

        *len = write;
        write != original
    }
}

impl<T, E: Equivalence<T>> Sequence<T, E> {
    /// Position of the first element equivalent to `value`
    pub fn index_of(&self, value: &T) -> Option<usize> {
        self.live()
            .iter()
            .position(|item| self.eq.equivalent(item, value))
    }

    /// Position of the last element equivalent to `value`
    pub fn last_index_of(&self, value: &T) -> Option<usize> {
        self.live()
            .iter()
            .rposition(|item| self.eq.equivalent(item, value))
    }

    pub fn contains(&self, value: &T) -> bool {
        self.index_of(value).is_some()
    }

    /// Remove the first element equivalent to `value`
    ///
    /// Returns true if one was found. The removed element is dropped.
    pub fn remove(&mut self, value: &T) -> bool {
        match self.index_of(value) {
            Some(index) => {
                drop(self.remove_unchecked(index));
                true
            }
            None => false,
        }
    }

    /// True iff every element of `values` is present
    pub fn contains_all(&self, values: &[T]) -> bool {
        values.iter().all(|value| self.contains(value))
    }

    /// Remove every occurrence of every element of `values`
    ///
    /// Returns true iff the sequence changed.
    pub fn remove_all(&mut self, values: &[T]) -> bool {
        self.compact(|eq, item| !values.iter().any(|value| eq.equivalent(item, value)))
    }

    /// Remove every element that has no equivalent in `values`
    ///
    /// Returns true iff the sequence changed.
    pub fn retain_all(&mut self, values: &[T]) -> bool {
        self.compact(|eq, item| values.iter().any(|value| eq.equivalent(item, value)))
    }
}

impl<T, E> Drop for Sequence<T, E> {
    fn drop(&mut self) {
        unsafe {
            self.buf.drop_range(0, self.len);
        }
    }
}

impl<T, E: Default> Default for Sequence<T, E> {
    fn default() -> Self {
        Self::with_equivalence(E::default())
    }
}

impl<T: std::fmt::Debug, E> std::fmt::Debug for Sequence<T, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.live()).finish()
    }
}

/// Deep copy with the same capacity
impl<T: Clone, E: Clone> Clone for Sequence<T, E> {
    fn clone(&self) -> Self {
        let capacity = self.capacity();
        let mut cloned = Sequence {
            buf: RawBuffer::with_capacity(capacity),
            len: 0,
            eq: self.eq.clone(),
            stats: BufferStats::new(capacity),
        };

        for (index, item) in self.live().iter().enumerate() {
            unsafe {
                cloned.buf.write(index, item.clone());
            }
            // Bumped per element so a panicking clone drops only what exists
            cloned.set_len(index + 1);
        }

        cloned
    }
}

/// Element-wise comparison; the equivalence parameter is not consulted
impl<T: PartialEq, E> PartialEq for Sequence<T, E> {
    fn eq(&self, other: &Self) -> bool {
        self.live() == other.live()
    }
}

impl<T: Eq, E> Eq for Sequence<T, E> {}

impl<T, E> Extend<T> for Sequence<T, E> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        let iter = iter.into_iter();
        self.reserve(iter.size_hint().0);
        for item in iter {
            self.append(item);
        }
    }
}

impl<T, E: Default> FromIterator<T> for Sequence<T, E> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut seq = Self::default();
        seq.extend(iter);
        seq
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::equivalence::EqBy;
    use crate::error::SequenceError;

    fn seq_of(items: &[&'static str]) -> Sequence<&'static str> {
        items.iter().copied().collect()
    }

    fn contents<T: Clone, E>(seq: &Sequence<T, E>) -> Vec<T> {
        (0..seq.len()).map(|i| seq.get(i).unwrap().clone()).collect()
    }

    #[test]
    fn test_new_is_empty_with_unit_capacity() {
        let seq: Sequence<String> = Sequence::new();
        assert!(seq.is_empty());
        assert_eq!(seq.len(), 0);
        assert_eq!(seq.capacity(), 1);
    }

    #[test]
    fn test_append_and_get() {
        let mut seq = Sequence::new();
        assert!(seq.append("abc"));
        assert_eq!(seq.get(0), Ok(&"abc"));
        assert!(!seq.is_empty());
        assert_eq!(seq.len(), 1);
    }

    #[test]
    fn test_get_rejects_len() {
        let seq = seq_of(&["a"]);
        assert_eq!(
            seq.get(1),
            Err(SequenceError::OutOfBounds {
                op: "get",
                index: 1,
                len: 1
            })
        );
    }

    #[test]
    fn test_get_mut_edits_in_place() {
        let mut seq: Sequence<i32> = (0..3).collect();
        *seq.get_mut(1).unwrap() += 10;
        assert_eq!(contents(&seq), vec![0, 11, 2]);
        assert!(seq.get_mut(3).is_err());
    }

    #[test]
    fn test_set_returns_previous() {
        let mut seq = seq_of(&["a", "b", "c"]);
        assert_eq!(seq.set(1, "B"), Ok("b"));
        assert_eq!(contents(&seq), vec!["a", "B", "c"]);
        assert_eq!(seq.len(), 3);
    }

    #[test]
    fn test_set_on_empty_fails_without_growing() {
        let mut seq: Sequence<&str> = Sequence::new();
        assert!(seq.set(0, "x").is_err());
        assert!(seq.is_empty());
        assert_eq!(seq.capacity(), 1);
    }

    #[test]
    fn test_insert_shifts_tail() {
        let mut seq = seq_of(&["a", "c"]);
        seq.insert(1, "b").unwrap();
        seq.insert(0, "_").unwrap();
        seq.insert(4, "d").unwrap();
        assert_eq!(contents(&seq), vec!["_", "a", "b", "c", "d"]);
    }

    #[test]
    fn test_insert_past_len_fails() {
        let mut seq = seq_of(&["a"]);
        let err = seq.insert(2, "x").unwrap_err();
        assert_eq!(
            err,
            SequenceError::OutOfBounds {
                op: "insert",
                index: 2,
                len: 1
            }
        );
        assert_eq!(contents(&seq), vec!["a"]);
    }

    #[test]
    fn test_remove_at_shifts_tail() {
        let mut seq = seq_of(&["a", "b", "c"]);
        assert_eq!(seq.remove_at(1), Ok("b"));
        assert_eq!(contents(&seq), vec!["a", "c"]);
        assert_eq!(seq.remove_at(1), Ok("c"));
        assert_eq!(seq.remove_at(0), Ok("a"));
        assert!(seq.is_empty());
        assert!(seq.remove_at(0).is_err());
    }

    #[test]
    fn test_insert_then_remove_restores() {
        let mut seq = seq_of(&["a", "b", "c"]);
        for index in 0..=3 {
            seq.insert(index, "x").unwrap();
            assert_eq!(seq.remove_at(index), Ok("x"));
            assert_eq!(contents(&seq), vec!["a", "b", "c"]);
        }
    }

    #[test]
    fn test_append_all_appends_in_order() {
        let mut seq = seq_of(&["a"]);
        assert!(seq.append_all(["b", "c"]));
        assert!(!seq.append_all(Vec::new()));
        assert_eq!(contents(&seq), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_insert_all_in_the_middle() {
        let mut seq = seq_of(&["a", "d"]);
        assert_eq!(seq.insert_all(1, ["b", "c"]), Ok(true));
        assert_eq!(contents(&seq), vec!["a", "b", "c", "d"]);
        assert_eq!(seq.insert_all(0, Vec::new()), Ok(false));
        assert!(seq.insert_all(5, ["z"]).is_err());
        assert_eq!(seq.len(), 4);
    }

    #[test]
    fn test_insert_all_grows_past_factor() {
        let mut seq: Sequence<u32> = Sequence::new();
        seq.insert_all(0, 0..100).unwrap();
        assert_eq!(seq.len(), 100);
        assert!(seq.capacity() >= 100);
        assert_eq!(seq.get(99), Ok(&99));
    }

    #[test]
    fn test_index_queries() {
        let seq = seq_of(&["a", "b", "a"]);
        assert_eq!(seq.index_of(&"a"), Some(0));
        assert_eq!(seq.last_index_of(&"a"), Some(2));
        assert!(seq.contains(&"a"));
        assert!(!seq.contains(&"c"));
        assert_eq!(seq.index_of(&"c"), None);
        assert_eq!(seq.last_index_of(&"c"), None);
    }

    #[test]
    fn test_remove_by_value_takes_first() {
        let mut seq = seq_of(&["a", "b", "a"]);
        assert!(seq.remove(&"a"));
        assert_eq!(contents(&seq), vec!["b", "a"]);
        assert!(seq.remove(&"a"));
        assert!(!seq.remove(&"a"));
    }

    #[test]
    fn test_lookups_ignore_stale_slots() {
        let mut seq = seq_of(&["a", "b"]);
        seq.remove_at(1).unwrap();
        assert!(!seq.contains(&"b"));
        seq.clear();
        assert!(!seq.contains(&"a"));
        assert_eq!(seq.index_of(&"a"), None);
    }

    #[test]
    fn test_null_elements() {
        let mut seq: Sequence<Option<&str>> = Sequence::new();
        seq.append(Some("a"));
        seq.append(None);
        seq.append(None);
        assert_eq!(seq.index_of(&None), Some(1));
        assert_eq!(seq.last_index_of(&None), Some(2));
        assert!(seq.remove(&None));
        assert_eq!(seq.len(), 2);
        assert_eq!(seq.get(1), Ok(&None));
    }

    #[test]
    fn test_custom_equivalence_routes_lookups() {
        let mut seq = Sequence::with_equivalence(EqBy(|a: &String, b: &String| {
            a.eq_ignore_ascii_case(b)
        }));
        seq.append("Alpha".to_string());
        seq.append("beta".to_string());

        assert!(seq.contains(&"ALPHA".to_string()));
        assert_eq!(seq.index_of(&"BETA".to_string()), Some(1));
        assert!(seq.remove(&"alpha".to_string()));
        assert_eq!(seq.len(), 1);
    }

    #[test]
    fn test_clear_keeps_capacity() {
        let mut seq: Sequence<i32> = (0..10).collect();
        let capacity = seq.capacity();
        seq.clear();
        assert!(seq.is_empty());
        assert_eq!(seq.capacity(), capacity);
        assert!(seq.get(0).is_err());
        seq.clear();
        assert!(seq.is_empty());
    }

    #[test]
    fn test_contains_all() {
        let seq = seq_of(&["a", "b", "c"]);
        assert!(seq.contains_all(&["c", "a"]));
        assert!(seq.contains_all(&[]));
        assert!(!seq.contains_all(&["a", "z"]));
    }

    #[test]
    fn test_remove_all_removes_every_occurrence() {
        let mut seq = seq_of(&["a", "b", "a", "c", "b"]);
        assert!(seq.remove_all(&["a", "b"]));
        assert_eq!(contents(&seq), vec!["c"]);
        assert!(!seq.remove_all(&["a"]));
        assert!(!seq.remove_all(&[]));
    }

    #[test]
    fn test_retain_all_keeps_listed() {
        let mut seq = seq_of(&["a", "b", "a", "c"]);
        assert!(seq.retain_all(&["a", "c"]));
        assert_eq!(contents(&seq), vec!["a", "a", "c"]);
        assert!(!seq.retain_all(&["a", "c"]));
        assert!(seq.retain_all(&[]));
        assert!(seq.is_empty());
    }

    #[test]
    fn test_capacity_never_shrinks() {
        let mut seq: Sequence<u8> = Sequence::new();
        let mut last = seq.capacity();
        for i in 0..50 {
            seq.append(i);
            assert!(seq.capacity() >= last);
            assert!(seq.capacity() >= seq.len());
            last = seq.capacity();
        }
        while !seq.is_empty() {
            seq.remove_at(0).unwrap();
            assert_eq!(seq.capacity(), last);
        }
    }

    #[test]
    fn test_stats_track_growth() {
        let mut seq: Sequence<u64> = Sequence::new();
        for i in 0..17 {
            seq.append(i);
        }
        seq.clear();
        let stats = seq.stats();
        assert!(stats.reallocations >= 1);
        assert_eq!(stats.peak_capacity, seq.capacity());
        assert_eq!(stats.peak_length, 17);
    }

    #[test]
    fn test_clone_is_deep() {
        let mut original: Sequence<String> =
            ["x", "y"].iter().map(|s| s.to_string()).collect();
        let cloned = original.clone();
        original.set(0, "changed".to_string()).unwrap();

        assert_eq!(cloned.get(0).map(String::as_str), Ok("x"));
        assert_eq!(cloned.capacity(), original.capacity());
        assert_ne!(cloned, original);
    }

    #[test]
    fn test_debug_lists_live_elements() {
        let mut seq = seq_of(&["a", "b", "c"]);
        seq.remove_at(2).unwrap();
        assert_eq!(format!("{:?}", seq), r#"["a", "b"]"#);
    }

    #[test]
    fn test_zero_sized_elements() {
        let mut seq: Sequence<()> = Sequence::new();
        for _ in 0..1000 {
            seq.append(());
        }
        assert_eq!(seq.len(), 1000);
        assert_eq!(seq.index_of(&()), Some(0));
        assert_eq!(seq.last_index_of(&()), Some(999));
        assert!(seq.remove_all(&[()]));
        assert!(seq.is_empty());
    }
}
