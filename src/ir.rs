//! Intermediate representation of a parsed build description.
//!
//! This module defines the frozen build graph produced by the statement
//! interpreter together with its invariant-checked value types. Every type is
//! constructed through a validating path and serialises with `serde`; the
//! graph's collections are ordered so output is deterministic.
//!
//! # Examples
//!
//! ```rust
//! use tsumiki::ir::{Pool, PoolDepth, PoolName, Positive};
//!
//! let pool = Pool::new(PoolName::custom("link"), PoolDepth::Finite(Positive::new(4)))
//!     .expect("custom pools accept any finite depth");
//! assert_eq!(pool.name().to_string(), "link");
//! ```

mod graph;
mod metadata;
mod pool;
mod positive;

pub use graph::{BuildEdge, BuildGraph, Rule};
pub use metadata::Metadata;
pub use pool::{Pool, PoolDepth, PoolError, PoolName};
pub use positive::{Positive, PositiveError};
