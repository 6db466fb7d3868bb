//! Concurrency pools and their invariant-checked value types.
//!
//! A pool pairs a [`PoolName`] with a [`PoolDepth`]; only certain pairings are
//! meaningful and [`Pool::new`] is the sole way to obtain one. The wire format
//! is `{"name": <string>, "depth": <integer> | "infinite"}`, and the name's
//! canonical text form (`""` for the default pool, `"console"` for the console
//! pool) doubles as the map-key representation.

use super::positive::Positive;
use miette::Diagnostic;
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt::{self, Display, Formatter};
use thiserror::Error;

/// Reserved name of the console pool.
const CONSOLE: &str = "console";

/// The name of a concurrency pool.
///
/// `parse` is total: every string maps to exactly one variant, and
/// `parse(print(n)) == n` for all names.
///
/// # Examples
///
/// ```rust
/// use tsumiki::ir::PoolName;
///
/// assert_eq!(PoolName::parse(""), PoolName::Default);
/// assert_eq!(PoolName::parse("console"), PoolName::Console);
/// let link = PoolName::parse("link");
/// assert_eq!(PoolName::parse(&link.to_string()), link);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PoolName {
    /// The unnamed default pool; canonical form is the empty string.
    Default,
    /// The reserved `console` pool.
    Console,
    /// A user-declared pool; never empty and never `"console"`.
    Custom(String),
}

impl PoolName {
    /// Classify arbitrary text as a pool name. Never fails.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        if text.is_empty() {
            Self::Default
        } else if text == CONSOLE {
            Self::Console
        } else {
            Self::Custom(text.to_owned())
        }
    }

    /// Construct a custom pool name from text already known to be valid.
    ///
    /// # Panics
    ///
    /// Panics when `name` is empty or equals `"console"`; both have dedicated
    /// variants and reaching this constructor with either means upstream
    /// validation did not run. Use [`PoolName::parse`] for untrusted text.
    #[must_use]
    pub fn custom(name: impl Into<String>) -> Self {
        let name = name.into();
        assert!(!name.is_empty(), "custom pool names must not be empty");
        assert!(
            name != CONSOLE,
            "`console` is reserved and not a custom pool name",
        );
        Self::Custom(name)
    }

    /// The canonical text form, also used for map keys.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Default => "",
            Self::Console => CONSOLE,
            Self::Custom(name) => name,
        }
    }
}

impl Display for PoolName {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for PoolName {
    fn from(text: String) -> Self {
        Self::parse(&text)
    }
}

impl From<PoolName> for String {
    fn from(name: PoolName) -> Self {
        name.as_str().to_owned()
    }
}

/// The capacity of a pool: a finite positive limit or unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PoolDepth {
    /// At most this many build edges run concurrently.
    Finite(Positive),
    /// No concurrency limit.
    Infinite,
}

impl Serialize for PoolDepth {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Finite(depth) => serializer.serialize_u64(depth.get()),
            Self::Infinite => serializer.serialize_str("infinite"),
        }
    }
}

struct DepthVisitor;

impl Visitor<'_> for DepthVisitor {
    type Value = PoolDepth;

    fn expecting(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str("a positive integer or the string \"infinite\"")
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<PoolDepth, E> {
        Positive::try_new(value)
            .map(PoolDepth::Finite)
            .ok_or_else(|| E::custom("pool depth must be at least 1"))
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<PoolDepth, E> {
        u64::try_from(value)
            .map_err(|_| E::custom("pool depth must not be negative"))
            .and_then(|depth| self.visit_u64(depth))
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<PoolDepth, E> {
        if value == "infinite" {
            Ok(PoolDepth::Infinite)
        } else {
            Err(E::custom(format!("unknown pool depth `{value}`")))
        }
    }
}

impl<'de> Deserialize<'de> for PoolDepth {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(DepthVisitor)
    }
}

/// Rejected name/depth pairings.
#[derive(Debug, Error, Diagnostic, Clone, PartialEq, Eq)]
pub enum PoolError {
    /// The default pool was given a finite depth.
    #[error("the default pool cannot have a finite depth")]
    #[diagnostic(code(tsumiki::ir::pool::default_bounded))]
    DefaultBounded,

    /// The console pool was given a depth other than one.
    #[error("the console pool must have a depth of exactly 1")]
    #[diagnostic(code(tsumiki::ir::pool::console_depth))]
    ConsoleDepth,

    /// A custom pool was declared unbounded.
    #[error("pool `{name}` cannot be unbounded")]
    #[diagnostic(code(tsumiki::ir::pool::custom_unbounded))]
    CustomUnbounded {
        /// The offending pool's name.
        name: String,
    },
}

/// A validated pool: name plus depth, immutable after construction.
///
/// Deserialisation routes back through [`Pool::new`], so an invalid pairing
/// can never enter the program as data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawPool")]
pub struct Pool {
    name: PoolName,
    depth: PoolDepth,
}

#[derive(Deserialize)]
struct RawPool {
    name: PoolName,
    depth: PoolDepth,
}

impl TryFrom<RawPool> for Pool {
    type Error = PoolError;

    fn try_from(raw: RawPool) -> Result<Self, Self::Error> {
        Self::new(raw.name, raw.depth)
    }
}

impl Pool {
    /// Validate a name/depth pairing.
    ///
    /// The default pool must be unbounded, the console pool must have depth
    /// exactly one, and custom pools accept any finite depth.
    ///
    /// # Errors
    ///
    /// Returns a [`PoolError`] describing the rejected pairing. This is
    /// user-data validation, distinct from the panicking invariant traps on
    /// [`Positive`] and [`PoolName::custom`].
    pub fn new(name: PoolName, depth: PoolDepth) -> Result<Self, PoolError> {
        match (&name, depth) {
            (PoolName::Default, PoolDepth::Infinite)
            | (PoolName::Custom(_), PoolDepth::Finite(_)) => Ok(Self { name, depth }),
            (PoolName::Console, PoolDepth::Finite(limit)) if limit == Positive::ONE => {
                Ok(Self { name, depth })
            }
            (PoolName::Default, PoolDepth::Finite(_)) => Err(PoolError::DefaultBounded),
            (PoolName::Console, _) => Err(PoolError::ConsoleDepth),
            (PoolName::Custom(custom), PoolDepth::Infinite) => Err(PoolError::CustomUnbounded {
                name: custom.clone(),
            }),
        }
    }

    /// The pool's name.
    #[must_use]
    pub const fn name(&self) -> &PoolName {
        &self.name
    }

    /// The pool's depth.
    #[must_use]
    pub const fn depth(&self) -> PoolDepth {
        self.depth
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[should_panic(expected = "reserved")]
    fn custom_traps_on_reserved_name() {
        let _ = PoolName::custom("console");
    }

    #[test]
    #[should_panic(expected = "empty")]
    fn custom_traps_on_empty_name() {
        let _ = PoolName::custom("");
    }
}
