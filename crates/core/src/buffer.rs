//! Raw Slot Buffer
//!
//! A contiguous, heap-allocated array of `T` slots with an explicit capacity.
//! The buffer knows nothing about which slots are initialised; that is the
//! owning `Sequence`'s job (slots `[0, len)` are live, the rest are not).
//!
//! ## Layout
//!
//! ```text
//! ┌──────────┬──────────┬──────────┬──────────┬──────────┐
//! │  slot 0  │  slot 1  │  ...     │ slot len │  ...     │
//! │  (live)  │  (live)  │  (live)  │ (uninit) │ (uninit) │
//! └──────────┴──────────┴──────────┴──────────┴──────────┘
//! ↑ base                                      capacity ↑
//! ```
//!
//! Growth goes through `realloc`, so the live prefix is carried over
//! bit-for-bit and the old allocation is released by the allocator.
//! Zero-sized element types never allocate.

use crate::growth::GrowthPolicy;
use std::alloc::{Layout, alloc, dealloc, handle_alloc_error, realloc};
use std::marker::PhantomData;
use std::ptr::{self, NonNull};

/// Owned backing storage for a sequence
pub(crate) struct RawBuffer<T> {
    /// Pointer to slot 0 (dangling for zero-sized `T`)
    base: NonNull<T>,
    /// Number of allocated slots
    capacity: usize,
    _owns: PhantomData<T>,
}

// The buffer is a plain owner of `T` values, like Box<[T]>
unsafe impl<T: Send> Send for RawBuffer<T> {}
unsafe impl<T: Sync> Sync for RawBuffer<T> {}

impl<T> RawBuffer<T> {
    const IS_ZST: bool = std::mem::size_of::<T>() == 0;

    /// Allocate a buffer with room for `capacity` slots
    pub fn with_capacity(capacity: usize) -> Self {
        assert!(capacity > 0, "buffer capacity must be greater than zero");

        if Self::IS_ZST {
            return RawBuffer {
                base: NonNull::dangling(),
                capacity,
                _owns: PhantomData,
            };
        }

        let layout = Self::layout(capacity);
        let base = unsafe { alloc(layout) as *mut T };
        let base = NonNull::new(base).unwrap_or_else(|| handle_alloc_error(layout));

        RawBuffer {
            base,
            capacity,
            _owns: PhantomData,
        }
    }

    fn layout(capacity: usize) -> Layout {
        Layout::array::<T>(capacity).expect("capacity overflow")
    }

    #[inline(always)]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline(always)]
    pub fn as_ptr(&self) -> *const T {
        self.base.as_ptr()
    }

    /// Make room for at least `needed` slots
    ///
    /// Returns true if the buffer was reallocated. Capacity never shrinks.
    pub fn reserve(&mut self, needed: usize, policy: GrowthPolicy) -> bool {
        if needed <= self.capacity {
            return false;
        }

        let new_capacity = policy.next_capacity(self.capacity, needed);

        if !Self::IS_ZST {
            let old_layout = Self::layout(self.capacity);
            let new_layout = Self::layout(new_capacity);

            let new_base = unsafe {
                realloc(self.base.as_ptr() as *mut u8, old_layout, new_layout.size()) as *mut T
            };
            self.base = NonNull::new(new_base).unwrap_or_else(|| handle_alloc_error(new_layout));
        }

        tracing::trace!(
            old_capacity = self.capacity,
            new_capacity,
            "grew sequence buffer"
        );
        self.capacity = new_capacity;
        true
    }

    /// Move the value out of `index`, leaving the slot logically uninitialised
    ///
    /// # Safety
    /// `index < capacity` and the slot must be initialised.
    #[inline]
    pub unsafe fn read(&self, index: usize) -> T {
        debug_assert!(index < self.capacity);
        unsafe { ptr::read(self.base.as_ptr().add(index)) }
    }

    /// Write `value` into `index` without dropping what was there
    ///
    /// # Safety
    /// `index < capacity`. Any previous occupant is leaked, so the slot should
    /// be uninitialised or already moved out.
    #[inline]
    pub unsafe fn write(&mut self, index: usize, value: T) {
        debug_assert!(index < self.capacity);
        unsafe { ptr::write(self.base.as_ptr().add(index), value) }
    }

    /// # Safety
    /// `index < capacity` and the slot must be initialised.
    #[inline]
    pub unsafe fn slot(&self, index: usize) -> &T {
        debug_assert!(index < self.capacity);
        unsafe { &*self.base.as_ptr().add(index) }
    }

    /// # Safety
    /// `index < capacity` and the slot must be initialised.
    #[inline]
    pub unsafe fn slot_mut(&mut self, index: usize) -> &mut T {
        debug_assert!(index < self.capacity);
        unsafe { &mut *self.base.as_ptr().add(index) }
    }

    /// Move `count` slots starting at `from` up by `by` positions
    ///
    /// The ranges may overlap; the copy behaves as if done from the highest
    /// index downwards. Slots `[from, from + by)` are left holding stale bits
    /// and must be overwritten before they are read again.
    ///
    /// # Safety
    /// `from + count + by <= capacity` and `[from, from + count)` initialised.
    #[inline]
    pub unsafe fn shift_right(&mut self, from: usize, count: usize, by: usize) {
        debug_assert!(from + count + by <= self.capacity);
        unsafe {
            let src = self.base.as_ptr().add(from);
            ptr::copy(src, src.add(by), count);
        }
    }

    /// Move `count` slots starting at `from` down by `by` positions
    ///
    /// The ranges may overlap; the copy behaves as if done from the lowest
    /// index upwards. The `by` slots at the old tail become stale.
    ///
    /// # Safety
    /// `by <= from`, `from + count <= capacity` and the source initialised.
    /// Whatever was in `[from - by, from)` must already be moved out.
    #[inline]
    pub unsafe fn shift_left(&mut self, from: usize, count: usize, by: usize) {
        debug_assert!(by <= from && from + count <= self.capacity);
        unsafe {
            let src = self.base.as_ptr().add(from);
            ptr::copy(src, src.sub(by), count);
        }
    }

    /// Drop the values in `[from, to)` in place
    ///
    /// # Safety
    /// `from <= to <= capacity` and every slot in the range initialised.
    /// The slots are uninitialised afterwards.
    pub unsafe fn drop_range(&mut self, from: usize, to: usize) {
        debug_assert!(from <= to && to <= self.capacity);
        unsafe {
            let start = self.base.as_ptr().add(from);
            ptr::drop_in_place(ptr::slice_from_raw_parts_mut(start, to - from));
        }
    }
}

impl<T> Drop for RawBuffer<T> {
    fn drop(&mut self) {
        // Element drops belong to the owner; only the allocation is freed here
        if !Self::IS_ZST {
            let layout = Self::layout(self.capacity);
            unsafe {
                dealloc(self.base.as_ptr() as *mut u8, layout);
            }
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
