//! A validated integer wrapper guaranteeing a value of at least one.

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};
use std::ops::{Add, Sub};
use thiserror::Error;

/// Error produced when a zero value is offered to the fallible constructor.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("value must be at least 1, got {value}")]
pub struct PositiveError {
    /// The rejected value.
    pub value: u64,
}

/// An integer guaranteed to be at least one.
///
/// The invariant is enforced at every construction site. [`Positive::new`]
/// treats a violation as a programming error and panics; [`Positive::try_new`]
/// is the validating path for untrusted input such as pool depth text.
///
/// # Examples
///
/// ```rust
/// use tsumiki::ir::Positive;
///
/// assert_eq!(Positive::new(4).get(), 4);
/// assert!(Positive::try_new(0).is_none());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u64", into = "u64")]
pub struct Positive(u64);

impl Positive {
    /// The smallest permitted value.
    pub const ONE: Self = Self(1);

    /// Wrap `value`, trapping on a violated invariant.
    ///
    /// # Panics
    ///
    /// Panics when `value` is zero. Use [`Positive::try_new`] for values that
    /// originate outside the program.
    #[must_use]
    pub fn new(value: u64) -> Self {
        assert!(value >= 1, "Positive requires a value of at least 1");
        Self(value)
    }

    /// Wrap `value`, returning `None` when it is zero.
    #[must_use]
    pub const fn try_new(value: u64) -> Option<Self> {
        if value >= 1 { Some(Self(value)) } else { None }
    }

    /// Read the wrapped value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl Display for Positive {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl TryFrom<u64> for Positive {
    type Error = PositiveError;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        Self::try_new(value).ok_or(PositiveError { value })
    }
}

impl From<Positive> for u64 {
    fn from(value: Positive) -> Self {
        value.get()
    }
}

impl Add for Positive {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl Sub for Positive {
    type Output = Self;

    /// # Panics
    ///
    /// Panics when the difference would fall below one; a non-positive result
    /// is a programming error, not a recoverable condition.
    fn sub(self, rhs: Self) -> Self {
        match self.0.checked_sub(rhs.0).and_then(Self::try_new) {
            Some(value) => value,
            None => panic!("Positive subtraction underflow: {self} - {rhs}"),
        }
    }
}
