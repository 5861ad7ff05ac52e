//! Element equivalence
//!
//! Value-based lookups (`contains`, `index_of`, `last_index_of`, `remove`
//! and the bulk operations) never call `==` directly. They go through the
//! sequence's [`Equivalence`], so a consumer can decide what "equal" means
//! for its element type.
//!
//! # Absent elements
//!
//! A nullable element type is spelled `Option<T>`. [`NaturalEq`] on
//! `Option<T>` is already null-safe (`None == None`, `None != Some(_)`). A
//! custom relation over `T` is lifted to `Option<T>` with [`NullSafe`]:
//!
//! ```
//! use slotvec::{EqBy, NullSafe, Sequence};
//!
//! let ci = NullSafe(EqBy(|a: &String, b: &String| a.eq_ignore_ascii_case(b)));
//! let mut seq = Sequence::with_equivalence(ci);
//! seq.append(None);
//! seq.append(Some("Hello".to_string()));
//!
//! assert_eq!(seq.index_of(&Some("HELLO".to_string())), Some(1));
//! assert_eq!(seq.index_of(&None), Some(0));
//! ```

/// An equivalence relation over `T`
///
/// Implementations must be reflexive, symmetric and transitive for the
/// lookup results to be meaningful.
pub trait Equivalence<T: ?Sized> {
    fn equivalent(&self, a: &T, b: &T) -> bool;
}

/// The element's own `PartialEq`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NaturalEq;

impl<T: PartialEq + ?Sized> Equivalence<T> for NaturalEq {
    #[inline]
    fn equivalent(&self, a: &T, b: &T) -> bool {
        a == b
    }
}

/// Equivalence given by a closure
#[derive(Clone, Copy)]
pub struct EqBy<F>(pub F);

impl<T: ?Sized, F> Equivalence<T> for EqBy<F>
where
    F: Fn(&T, &T) -> bool,
{
    #[inline]
    fn equivalent(&self, a: &T, b: &T) -> bool {
        (self.0)(a, b)
    }
}

impl<F> std::fmt::Debug for EqBy<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("EqBy(..)")
    }
}

/// Lifts an equivalence over `T` to one over `Option<T>`
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSafe<E>(pub E);

impl<T, E: Equivalence<T>> Equivalence<Option<T>> for NullSafe<E> {
    #[inline]
    fn equivalent(&self, a: &Option<T>, b: &Option<T>) -> bool {
        null_safe_equals(&self.0, a.as_ref(), b.as_ref())
    }
}

/// Null-safe comparison of two possibly absent values
///
/// Equal iff both are absent, or both are present and `eq` says so.
#[inline]
pub fn null_safe_equals<T: ?Sized, E: Equivalence<T> + ?Sized>(
    eq: &E,
    a: Option<&T>,
    b: Option<&T>,
) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(a), Some(b)) => eq.equivalent(a, b),
        _ => false,
    }
}
