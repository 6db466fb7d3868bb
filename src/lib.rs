//! Tsumiki core library.
//!
//! Parses Ninja-style build descriptions into a validated, serialisable
//! build graph. Raw text is lexed into statement lexemes, folded left to
//! right through a chained variable scope, and accumulated into the
//! [`ir::BuildGraph`] intermediate representation for downstream
//! build-execution tools.

pub mod cli;
pub mod deps;
pub mod env;
pub mod expr;
pub mod ir;
pub mod lexer;
pub mod parse;
