//! Actions and their laws
//!
//! Indices are signed so scripts can probe negative positions. A negative
//! index can never reach the sequence (its API takes `usize`); the action
//! treats it as rejected up front, which is what an out-of-bounds call must
//! look like from outside: nothing changes.

use crate::Violation;
use slotvec::{Sequence, SequenceError};

/// One step of a stateful test script
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Append(String),
    AppendAll(Vec<String>),
    Set(i64, String),
    InsertAll(i64, Vec<String>),
    /// Remove the first occurrence of a value
    Remove(String),
    RemoveAt(i64),
    Clear,
}

macro_rules! ensure {
    ($cond:expr, $action:expr, $($msg:tt)+) => {
        if !$cond {
            return Err(Violation::new($action, format!($($msg)+)));
        }
    };
}

fn snapshot(seq: &Sequence<String>) -> Vec<String> {
    (0..seq.len())
        .filter_map(|i| seq.get(i).ok().cloned())
        .collect()
}

fn occurrences(items: &[String], value: &str) -> usize {
    items.iter().filter(|item| item.as_str() == value).count()
}

impl Action {
    /// Run the action against `seq` and check its post-conditions
    pub fn apply(&self, seq: &mut Sequence<String>) -> Result<(), Violation> {
        let before = snapshot(seq);

        match self {
            Action::Append(element) => {
                let added = seq.append(element.clone());
                ensure!(added, self, "append reported false");
                ensure!(
                    seq.len() == before.len() + 1,
                    self,
                    "len {} after append to len {}",
                    seq.len(),
                    before.len()
                );
                ensure!(
                    seq.get(before.len()) == Ok(element),
                    self,
                    "appended element not at the end"
                );
                ensure!(
                    snapshot(seq)[..before.len()] == before[..],
                    self,
                    "append disturbed existing elements"
                );
            }

            Action::AppendAll(elements) => {
                let changed = seq.append_all(elements.iter().cloned());
                ensure!(
                    changed == !elements.is_empty(),
                    self,
                    "append_all reported {} for {} elements",
                    changed,
                    elements.len()
                );
                let mut expected = before.clone();
                expected.extend(elements.iter().cloned());
                ensure!(
                    snapshot(seq) == expected,
                    self,
                    "contents differ after append_all"
                );
            }

            Action::Set(index, element) => match usize::try_from(*index) {
                Ok(index) if index < before.len() => {
                    let previous = seq.set(index, element.clone());
                    ensure!(
                        previous.as_ref() == Ok(&before[index]),
                        self,
                        "set returned {:?}, expected {:?}",
                        previous,
                        before[index]
                    );
                    let mut expected = before.clone();
                    expected[index] = element.clone();
                    ensure!(snapshot(seq) == expected, self, "contents differ after set");
                }
                Ok(index) => {
                    let result = seq.set(index, element.clone());
                    expect_out_of_bounds(self, result.map(drop), seq, &before)?;
                }
                Err(_) => expect_unchanged(self, seq, &before)?,
            },

            Action::InsertAll(index, elements) => match usize::try_from(*index) {
                Ok(index) if index <= before.len() => {
                    let changed = seq.insert_all(index, elements.iter().cloned());
                    ensure!(
                        changed == Ok(!elements.is_empty()),
                        self,
                        "insert_all returned {:?}",
                        changed
                    );
                    let mut expected = before.clone();
                    let _ = expected.splice(index..index, elements.iter().cloned());
                    ensure!(
                        snapshot(seq) == expected,
                        self,
                        "contents differ after insert_all"
                    );
                }
                Ok(index) => {
                    let result = seq.insert_all(index, elements.iter().cloned());
                    expect_out_of_bounds(self, result.map(drop), seq, &before)?;
                }
                Err(_) => expect_unchanged(self, seq, &before)?,
            },

            Action::Remove(element) => {
                let present = seq.contains(element);
                ensure!(
                    present == before.contains(element),
                    self,
                    "contains disagrees with contents"
                );
                let removed = seq.remove(element);
                ensure!(
                    removed == present,
                    self,
                    "remove reported {} but contains was {}",
                    removed,
                    present
                );

                let mut expected = before.clone();
                if let Some(position) = before.iter().position(|item| item == element) {
                    expected.remove(position);
                }
                let after = snapshot(seq);
                ensure!(after == expected, self, "contents differ after remove");
                ensure!(
                    occurrences(&after, element) + usize::from(present)
                        == occurrences(&before, element),
                    self,
                    "remove dropped the wrong number of occurrences"
                );
            }

            Action::RemoveAt(index) => match usize::try_from(*index) {
                Ok(index) if index < before.len() => {
                    let removed = seq.remove_at(index);
                    ensure!(
                        removed.as_ref() == Ok(&before[index]),
                        self,
                        "remove_at returned {:?}",
                        removed
                    );
                    let mut expected = before.clone();
                    expected.remove(index);
                    ensure!(
                        snapshot(seq) == expected,
                        self,
                        "contents differ after remove_at"
                    );
                }
                Ok(index) => {
                    let result = seq.remove_at(index);
                    expect_out_of_bounds(self, result.map(drop), seq, &before)?;
                }
                Err(_) => expect_unchanged(self, seq, &before)?,
            },

            Action::Clear => {
                seq.clear();
                ensure!(seq.is_empty(), self, "not empty after clear");
                ensure!(seq.get(0).is_err(), self, "get(0) succeeded after clear");
                if let Some(stale) = before.iter().find(|item| seq.contains(item)) {
                    return Err(Violation::new(
                        self,
                        format!("{:?} still visible after clear", stale),
                    ));
                }
            }
        }

        // Lookups must agree with the contents whatever the action was
        let after = snapshot(seq);
        for probe in before.iter().chain(after.iter()) {
            let first = after.iter().position(|item| item == probe);
            let last = after.iter().rposition(|item| item == probe);
            ensure!(
                seq.index_of(probe) == first && seq.last_index_of(probe) == last,
                self,
                "index lookups for {:?} disagree with contents",
                probe
            );
        }

        Ok(())
    }
}

fn expect_out_of_bounds(
    action: &Action,
    result: Result<(), SequenceError>,
    seq: &Sequence<String>,
    before: &[String],
) -> Result<(), Violation> {
    ensure!(
        matches!(result, Err(SequenceError::OutOfBounds { .. })),
        action,
        "expected OutOfBounds, got {:?}",
        result
    );
    expect_unchanged(action, seq, before)
}

fn expect_unchanged(
    action: &Action,
    seq: &Sequence<String>,
    before: &[String],
) -> Result<(), Violation> {
    ensure!(
        snapshot(seq) == before,
        action,
        "rejected call changed the sequence"
    );
    Ok(())
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Action::Append(element) => write!(f, "append({})", element),
            Action::AppendAll(elements) => write!(f, "append_all({:?})", elements),
            Action::Set(index, element) => write!(f, "set({},{})", index, element),
            Action::InsertAll(index, elements) => {
                write!(f, "insert_all({},{:?})", index, elements)
            }
            Action::Remove(element) => write!(f, "remove({})", element),
            Action::RemoveAt(index) => write!(f, "remove_at({})", index),
            Action::Clear => write!(f, "clear()"),
        }
    }
}
