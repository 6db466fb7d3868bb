//! The statement interpreter: folds lexemes into a build graph.
//!
//! Parsing is a strict left-to-right fold threading a `(BuildGraph, Env)`
//! pair through every statement. `include` recurses with the same scope, so
//! bindings made in the included file stay visible afterwards; `subninja`
//! recurses with an isolated child scope that is discarded on return. Both
//! complete depth-first before the includer's fold continues, and the first
//! error abandons everything still unprocessed.
//!
//! # Examples
//!
//! ```rust
//! use camino::Utf8Path;
//! use indexmap::IndexMap;
//! use tsumiki::{env::Env, parse};
//!
//! struct OneFile(&'static str);
//! impl parse::FileReader for OneFile {
//!     fn read(&self, _: &Utf8Path) -> std::io::Result<String> {
//!         Ok(self.0.to_owned())
//!     }
//! }
//!
//! let reader = OneFile("rule cc\n  command = gcc -c $in\nbuild a.o: cc a.c\n");
//! let mut env = Env::new();
//! let graph = parse::parse_with_reader(&reader, Utf8Path::new("build.ninja"), &mut env)
//!     .expect("parse");
//! assert!(graph.singles.contains_key(Utf8Path::new("a.o")));
//! ```

use crate::deps;
use crate::env::Env;
use crate::expr::Expr;
use crate::ir::{BuildEdge, BuildGraph, Pool, PoolDepth, PoolName, Positive, Rule};
use crate::lexer::{self, Binding, Lexeme, Statement};
use camino::{Utf8Path, Utf8PathBuf};
use indexmap::IndexMap;
use semver::Version;
use std::io::{self, Read};

mod error;

pub use error::ParseError;

/// Conventional path meaning "read the process's standard input".
pub const STDIN_PATH: &str = "-";

/// Rule name whose build edges declare phony targets.
const PHONY_RULE: &str = "phony";

/// Reserved top-level variable naming the minimum required tool version.
const REQUIRED_VERSION_VAR: &str = "ninja_required_version";

/// Reserved top-level variable naming the build output directory.
const BUILD_DIR_VAR: &str = "builddir";

/// The byte-source collaborator: maps a path to file contents.
pub trait FileReader {
    /// Read the contents of `path`.
    ///
    /// # Errors
    ///
    /// Returns any underlying I/O error; the interpreter wraps it with the
    /// path that was being read.
    fn read(&self, path: &Utf8Path) -> io::Result<String>;
}

/// Reads build files from the local filesystem; the path `-` reads standard
/// input instead.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsReader;

impl FileReader for FsReader {
    fn read(&self, path: &Utf8Path) -> io::Result<String> {
        if path.as_str() == STDIN_PATH {
            let mut text = String::new();
            io::stdin().read_to_string(&mut text)?;
            Ok(text)
        } else {
            std::fs::read_to_string(path.as_std_path())
        }
    }
}

/// Parse the build file at `path` and everything it transitively includes.
///
/// # Errors
///
/// Returns the first [`ParseError`] encountered; no partial graph is
/// produced.
pub fn parse(path: &Utf8Path) -> Result<BuildGraph, ParseError> {
    let mut env = Env::new();
    parse_with_env(path, &mut env)
}

/// [`parse`] with a caller-seeded root environment.
///
/// # Errors
///
/// Returns the first [`ParseError`] encountered.
pub fn parse_with_env(path: &Utf8Path, env: &mut Env<'_>) -> Result<BuildGraph, ParseError> {
    parse_with_reader(&FsReader, path, env)
}

/// [`parse_with_env`] with an explicit byte source, the seam tests use to
/// supply in-memory build files.
///
/// # Errors
///
/// Returns the first [`ParseError`] encountered.
pub fn parse_with_reader<R: FileReader>(
    reader: &R,
    path: &Utf8Path,
    env: &mut Env<'_>,
) -> Result<BuildGraph, ParseError> {
    let mut graph = BuildGraph::default();
    fold_file(reader, path, &mut graph, env)?;
    collect_metadata(&mut graph, env)?;
    Ok(graph)
}

/// Lex one file and fold its statements into the graph.
fn fold_file<R: FileReader>(
    reader: &R,
    path: &Utf8Path,
    graph: &mut BuildGraph,
    env: &mut Env<'_>,
) -> Result<(), ParseError> {
    let text = reader.read(path).map_err(|source| ParseError::Unreadable {
        path: path.to_owned(),
        source,
    })?;
    let lexemes = lexer::tokenize(&text).map_err(|source| ParseError::Lex {
        path: path.to_owned(),
        source,
    })?;
    tracing::debug!(path = %path, statements = lexemes.len(), "folding build file");
    for lexeme in lexemes {
        apply(reader, graph, env, lexeme)?;
    }
    Ok(())
}

/// Apply one statement, updating the graph and scope in place.
fn apply<R: FileReader>(
    reader: &R,
    graph: &mut BuildGraph,
    env: &mut Env<'_>,
    lexeme: Lexeme,
) -> Result<(), ParseError> {
    let Lexeme {
        statement,
        bindings,
    } = lexeme;
    match statement {
        Statement::Build {
            outputs,
            rule,
            deps,
        } => {
            apply_build(graph, env, rule, &outputs, &deps, &bindings);
            Ok(())
        }
        Statement::Rule { name } => {
            let rule = Rule {
                bindings: bindings
                    .into_iter()
                    .map(|binding| (binding.name, binding.value))
                    .collect(),
            };
            graph.rules.insert(name, rule);
            Ok(())
        }
        Statement::Pool { name } => apply_pool(graph, env, &name, &bindings),
        Statement::Default { targets } => {
            for target in &targets {
                graph.defaults.insert(Utf8PathBuf::from(target.evaluate(env)));
            }
            Ok(())
        }
        Statement::Include { path } => {
            let target = Utf8PathBuf::from(path.evaluate(env));
            tracing::debug!(path = %target, "include with shared scope");
            fold_file(reader, &target, graph, env)
        }
        Statement::Subninja { path } => {
            let target = Utf8PathBuf::from(path.evaluate(env));
            tracing::debug!(path = %target, "subninja with child scope");
            let mut child = env.child_scope();
            fold_file(reader, &target, graph, &mut child)
        }
        Statement::Define { name, value } => {
            env.bind_eager(name, &value);
            Ok(())
        }
        Statement::Orphan { name } => Err(ParseError::UnattachedBinding { name }),
    }
}

/// Evaluate and record one build edge.
///
/// Outputs, dependency tokens, and attached bindings are all evaluated
/// against the current scope in declaration order before the dependency
/// split, keeping the position-sensitive `|` / `||` semantics intact.
fn apply_build(
    graph: &mut BuildGraph,
    env: &Env<'_>,
    rule: String,
    outputs: &[Expr],
    deps: &[Expr],
    bindings: &[Binding],
) {
    let outs: Vec<Utf8PathBuf> = outputs
        .iter()
        .map(|output| Utf8PathBuf::from(output.evaluate(env)))
        .collect();
    let tokens: Vec<String> = deps.iter().map(|dep| dep.evaluate(env)).collect();
    let groups = deps::classify(tokens);
    if rule == PHONY_RULE {
        let flat = groups.flatten();
        for out in outs {
            graph.phonys.insert(out.into_string(), flat.clone());
        }
        return;
    }
    let locals: IndexMap<String, String> = bindings
        .iter()
        .map(|binding| (binding.name.clone(), binding.value.evaluate(env)))
        .collect();
    let edge = BuildEdge {
        rule,
        scope: env.snapshot(),
        normal_deps: groups.normal,
        implicit_deps: groups.implicit,
        order_only_deps: groups.order_only,
        bindings: locals,
    };
    if let [single] = outs.as_slice() {
        graph.singles.insert(single.clone(), edge);
    } else {
        graph.multiples.insert(outs, edge);
    }
}

/// Validate and record one pool declaration.
fn apply_pool(
    graph: &mut BuildGraph,
    env: &Env<'_>,
    name: &str,
    bindings: &[Binding],
) -> Result<(), ParseError> {
    let depth = match bindings.iter().find(|binding| binding.name == "depth") {
        None => PoolDepth::Finite(Positive::ONE),
        Some(binding) => {
            let text = binding.value.evaluate(env);
            // u64::from_str tolerates a leading `+`; depth text is digits only.
            let parsed = if text.bytes().all(|b| b.is_ascii_digit()) {
                text.parse::<u64>().ok()
            } else {
                None
            };
            let limit = parsed.and_then(Positive::try_new).ok_or_else(|| {
                ParseError::PoolDepth {
                    pool: name.to_owned(),
                    text: text.clone(),
                }
            })?;
            PoolDepth::Finite(limit)
        }
    };
    let pool = Pool::new(PoolName::parse(name), depth).map_err(|source| ParseError::Pool {
        pool: name.to_owned(),
        source,
    })?;
    graph.pools.insert(name.to_owned(), pool.depth());
    Ok(())
}

/// Record recognised top-level variables into the graph's metadata.
fn collect_metadata(graph: &mut BuildGraph, env: &Env<'_>) -> Result<(), ParseError> {
    if let Some(text) = env.lookup(REQUIRED_VERSION_VAR) {
        let version = Version::parse(text).map_err(|source| ParseError::Metadata {
            name: REQUIRED_VERSION_VAR,
            text: text.to_owned(),
            source,
        })?;
        graph.metadata.required_version = Some(version);
    }
    if let Some(dir) = env.lookup(BUILD_DIR_VAR) {
        graph.metadata.build_directory = Some(Utf8PathBuf::from(dir));
    }
    Ok(())
}
