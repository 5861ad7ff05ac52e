//! Sequence Error Handling
//!
//! Every positional operation validates its index before touching the
//! buffer. A rejected call returns [`SequenceError::OutOfBounds`] and leaves
//! length, capacity and contents exactly as they were.
//!
//! # Permitted ranges
//!
//! ```text
//! get / get_mut / set / remove_at   index <  len
//! insert / insert_all               index <= len
//! ```
//!
//! Indices are `usize`, so the lower bound is enforced by the type system.

/// Error type for sequence operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SequenceError {
    /// An index argument fell outside the range the operation accepts
    OutOfBounds {
        /// Operation that rejected the index (e.g. "get", "insert")
        op: &'static str,
        /// The offending index
        index: usize,
        /// Length of the sequence when the call was made
        len: usize,
    },
}

impl std::fmt::Display for SequenceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SequenceError::OutOfBounds { op, index, len } => {
                write!(f, "{}: index {} out of bounds for length {}", op, index, len)
            }
        }
    }
}

impl std::error::Error for SequenceError {}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, SequenceError>;

/// Reject `index` unless `index < len` (element access)
#[inline]
pub(crate) fn check_element(op: &'static str, index: usize, len: usize) -> Result<()> {
    if index < len {
        Ok(())
    } else {
        Err(SequenceError::OutOfBounds { op, index, len })
    }
}

/// Reject `index` unless `index <= len` (insertion point)
#[inline]
pub(crate) fn check_position(op: &'static str, index: usize, len: usize) -> Result<()> {
    if index <= len {
        Ok(())
    } else {
        Err(SequenceError::OutOfBounds { op, index, len })
    }
}
