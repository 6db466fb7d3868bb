//! The build graph: the IR root the statement fold accumulates into.

use super::metadata::Metadata;
use super::pool::PoolDepth;
use crate::expr::Expr;
use camino::Utf8PathBuf;
use indexmap::{IndexMap, IndexSet};
use itertools::Itertools;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// A rule template: an ordered set of bindings stored unevaluated.
///
/// Rule bindings are deferred expressions; they are expanded later, per build
/// edge, against a scope that does not exist at declaration time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Rule {
    /// Binding name to unevaluated expression, in declaration order.
    pub bindings: IndexMap<String, Expr>,
}

/// One declared build edge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildEdge {
    /// Name of the rule this edge invokes.
    pub rule: String,
    /// Snapshot of the variable scope at the point of declaration, so later
    /// rule expansion sees the bindings as of this statement.
    pub scope: IndexMap<String, String>,
    /// Normal dependencies, in declaration order.
    pub normal_deps: Vec<Utf8PathBuf>,
    /// Implicit dependencies, in declaration order.
    pub implicit_deps: Vec<Utf8PathBuf>,
    /// Order-only dependencies, in declaration order.
    pub order_only_deps: Vec<Utf8PathBuf>,
    /// Edge-local bindings, evaluated eagerly at declaration.
    pub bindings: IndexMap<String, String>,
}

/// The accumulated IR for one top-level file and everything it included.
///
/// All collections are ordered, so iteration and serialisation are
/// deterministic and reflect declaration order. Duplicate rule, pool, and
/// edge declarations follow last-write-wins semantics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BuildGraph {
    /// Rule name to rule template.
    pub rules: IndexMap<String, Rule>,
    /// Single-output edges keyed by their one output path.
    pub singles: IndexMap<Utf8PathBuf, BuildEdge>,
    /// Multi-output edges keyed by their ordered output list.
    #[serde(serialize_with = "serialize_multiples")]
    pub multiples: IndexMap<Vec<Utf8PathBuf>, BuildEdge>,
    /// Phony target name to its flattened dependency list.
    pub phonys: IndexMap<String, Vec<Utf8PathBuf>>,
    /// Targets built when none are requested explicitly.
    pub defaults: IndexSet<Utf8PathBuf>,
    /// Pool name (canonical text form) to validated depth.
    pub pools: IndexMap<String, PoolDepth>,
    /// Whole-graph metadata collected after the fold.
    pub metadata: Metadata,
}

/// Serialise multi-output edges as a map keyed by the space-joined outputs,
/// since structured map keys are not representable in JSON.
fn serialize_multiples<S: Serializer>(
    edges: &IndexMap<Vec<Utf8PathBuf>, BuildEdge>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    let mut map = serializer.serialize_map(Some(edges.len()))?;
    for (outputs, edge) in edges {
        let key = outputs.iter().map(|p| p.as_str()).join(" ");
        map.serialize_entry(&key, edge)?;
    }
    map.end()
}
