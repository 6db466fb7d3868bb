//! Error types for the statement interpreter.

use crate::ir::PoolError;
use crate::lexer::LexError;
use camino::Utf8PathBuf;
use miette::Diagnostic;
use thiserror::Error;

/// Errors that abort a parse.
///
/// Every variant is fatal to the parse in progress: the fold short-circuits,
/// abandoning unprocessed statements in the current and all enclosing files.
/// No partial graph is returned and nothing is retried.
#[derive(Debug, Error, Diagnostic)]
pub enum ParseError {
    /// The byte source could not be read.
    #[error("cannot read `{path}`")]
    #[diagnostic(code(tsumiki::parse::unreadable))]
    Unreadable {
        /// The path that failed, as evaluated at the include site.
        path: Utf8PathBuf,
        /// The underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// A file failed lexical analysis.
    #[error("{path}: {source}")]
    #[diagnostic(code(tsumiki::parse::lex))]
    Lex {
        /// The file being lexed.
        path: Utf8PathBuf,
        /// The lexical error itself.
        #[source]
        source: LexError,
    },

    /// An indented binding appeared before any statement.
    #[error("binding `{name}` is not attached to any statement")]
    #[diagnostic(
        code(tsumiki::parse::unattached_binding),
        help("indented bindings must follow the statement they belong to")
    )]
    UnattachedBinding {
        /// The stray binding's name.
        name: String,
    },

    /// A pool's `depth` binding did not evaluate to a positive integer.
    #[error("pool `{pool}` has invalid depth `{text}`")]
    #[diagnostic(
        code(tsumiki::parse::pool_depth),
        help("depth must be a base-10 integer of at least 1 with no trailing characters")
    )]
    PoolDepth {
        /// The pool being declared.
        pool: String,
        /// The evaluated depth text that failed to parse.
        text: String,
    },

    /// A pool paired a name with an unacceptable depth.
    #[error("invalid pool `{pool}`")]
    #[diagnostic(code(tsumiki::parse::pool))]
    Pool {
        /// The pool being declared.
        pool: String,
        /// The rejected pairing.
        #[source]
        source: PoolError,
    },

    /// A recognised metadata variable held text that does not parse.
    #[error("variable `{name}` holds invalid version `{text}`")]
    #[diagnostic(code(tsumiki::parse::metadata))]
    Metadata {
        /// The reserved variable name.
        name: &'static str,
        /// The offending raw text.
        text: String,
        /// The version parse failure.
        #[source]
        source: semver::Error,
    },
}
