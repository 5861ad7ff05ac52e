//! proptest strategies for action scripts
//!
//! Elements are short alphanumeric strings drawn partly from a tiny
//! alphabet, so scripts hit duplicates and successful removes often.
//! Indices lean toward the small range where a populated sequence has
//! valid positions, with some negative and arbitrary values mixed in.

use crate::action::Action;
use proptest::collection::vec;
use proptest::prelude::*;

/// Largest bulk input generated for `AppendAll` / `InsertAll`
const MAX_BULK: usize = 6;

pub fn element() -> impl Strategy<Value = String> {
    prop_oneof![
        2 => "[a-c]",
        1 => "[a-zA-Z0-9]{0,8}",
    ]
}

pub fn index() -> impl Strategy<Value = i64> {
    prop_oneof![
        6 => 0i64..16,
        1 => -4i64..0,
        1 => any::<i64>(),
    ]
}

pub fn action() -> impl Strategy<Value = Action> {
    prop_oneof![
        4 => element().prop_map(Action::Append),
        2 => vec(element(), 0..MAX_BULK).prop_map(Action::AppendAll),
        2 => (index(), element()).prop_map(|(i, e)| Action::Set(i, e)),
        2 => (index(), vec(element(), 0..MAX_BULK)).prop_map(|(i, es)| Action::InsertAll(i, es)),
        2 => element().prop_map(Action::Remove),
        2 => index().prop_map(Action::RemoveAt),
        1 => Just(Action::Clear),
    ]
}

/// Scripts of up to `max_len` actions
pub fn actions(max_len: usize) -> impl Strategy<Value = Vec<Action>> {
    vec(action(), 0..=max_len)
}
