//! slotvec: a growable, index-addressed sequence container
//!
//! `Sequence<T>` keeps its elements in one contiguous heap buffer whose
//! capacity is independent of (and never below) its length. Appends are
//! amortised constant time; positional inserts and removals shift the tail.
//!
//! Key design principles:
//! - Storage: a raw slot buffer grown with `realloc`, never shrunk
//! - Growth: a single build-time policy (`new = max(needed, capacity * k)`)
//! - Equivalence: value lookups go through a pluggable relation, so
//!   `Option<T>` elements compare null-safely
//! - Errors: one kind, `OutOfBounds`, raised before any mutation
//!
//! # Modules
//!
//! - `buffer`: Raw allocation, shifting and in-place drops
//! - `equivalence`: Element equality relations
//! - `error`: `SequenceError` and index validation
//! - `growth`: Capacity growth policy
//! - `sequence`: The `Sequence` container
//! - `stats`: Per-sequence buffer statistics
//!
//! # Concurrency
//!
//! No internal synchronisation. A `Sequence` is `Send`/`Sync` exactly when
//! its element type is; shared mutation needs an external lock.

mod buffer;
pub mod equivalence;
pub mod error;
pub mod growth;
pub mod sequence;
pub mod stats;

pub use equivalence::{EqBy, Equivalence, NaturalEq, NullSafe, null_safe_equals};
pub use error::{Result, SequenceError};
pub use growth::{GROWTH_FACTOR, GrowthPolicy, INITIAL_CAPACITY};
pub use sequence::Sequence;
pub use stats::BufferStats;
