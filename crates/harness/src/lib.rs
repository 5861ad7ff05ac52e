//! slotvec-harness: stateful property testing for `Sequence`
//!
//! A test is a list of [`Action`]s replayed against a fresh
//! `Sequence<String>`. Every action checks its own post-conditions (the
//! append law, the set law, ...) and [`run`] checks the global invariants
//! after each step:
//!
//! - every index in `[0, len)` is readable, `len` itself is not
//! - `capacity >= len` and `capacity >= 1`
//! - capacity never decreases
//!
//! # Example
//!
//! ```
//! use proptest::prelude::*;
//! use slotvec_harness::{actions, run};
//!
//! proptest! {
//!     #[test]
//!     fn sequence_obeys_its_laws(script in actions(32)) {
//!         if let Err(violation) = run(&script) {
//!             prop_assert!(false, "{}", violation);
//!         }
//!     }
//! }
//! ```
//!
//! # Modules
//!
//! - `action`: The `Action` enum and its per-action checks
//! - `strategy`: proptest strategies for elements, indices and scripts

pub mod action;
pub mod strategy;

pub use action::Action;
pub use strategy::{action, actions, element, index};

use slotvec::Sequence;

/// A broken law, tagged with the action that exposed it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// Rendered action, e.g. `set(3,abc)`
    pub action: String,
    pub message: String,
}

impl Violation {
    pub fn new(action: impl ToString, message: impl Into<String>) -> Self {
        Violation {
            action: action.to_string(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.action, self.message)
    }
}

impl std::error::Error for Violation {}

/// Replay `script` against an empty sequence
///
/// Returns the final sequence, or the first violation found.
pub fn run(script: &[Action]) -> Result<Sequence<String>, Violation> {
    let mut seq = Sequence::new();
    let mut capacity = seq.capacity();

    for action in script {
        tracing::debug!(%action, len = seq.len(), "applying action");
        action.apply(&mut seq)?;
        check_invariants(action, &seq, capacity)?;
        capacity = seq.capacity();
    }

    Ok(seq)
}

/// Global invariants that hold after every operation
pub fn check_invariants(
    action: &Action,
    seq: &Sequence<String>,
    previous_capacity: usize,
) -> Result<(), Violation> {
    let len = seq.len();

    if let Some(index) = (0..len).find(|&i| seq.get(i).is_err()) {
        return Err(Violation::new(
            action,
            format!("get({}) failed with len {}", index, len),
        ));
    }
    if seq.get(len).is_ok() {
        return Err(Violation::new(action, format!("get({}) succeeded at len", len)));
    }
    if seq.capacity() < len.max(1) {
        return Err(Violation::new(
            action,
            format!("capacity {} below len {}", seq.capacity(), len),
        ));
    }
    if seq.capacity() < previous_capacity {
        return Err(Violation::new(
            action,
            format!(
                "capacity shrank from {} to {}",
                previous_capacity,
                seq.capacity()
            ),
        ));
    }
    if seq.is_empty() != (len == 0) {
        return Err(Violation::new(action, "is_empty disagrees with len"));
    }

    Ok(())
}
