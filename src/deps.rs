//! Dependency classification for build edges.
//!
//! A build edge's dependency list may contain the sentinel tokens `|` and
//! `||`, which divide it into normal, implicit, and order-only groups. The
//! split is position sensitive, so the whole dependency path operates on
//! order-preserving sequences; routing the tokens through a set anywhere
//! before this point would make the result meaningless.

use camino::Utf8PathBuf;

/// The three dependency groups of a build edge, each in declaration order.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DepGroups {
    /// Dependencies that trigger rebuilds and appear in command text.
    pub normal: Vec<Utf8PathBuf>,
    /// Dependencies that trigger rebuilds but stay out of command text.
    pub implicit: Vec<Utf8PathBuf>,
    /// Dependencies that only enforce sequencing.
    pub order_only: Vec<Utf8PathBuf>,
}

impl DepGroups {
    /// Concatenate all three groups into one ordered list, the form phony
    /// targets record their dependencies in.
    #[must_use]
    pub fn flatten(self) -> Vec<Utf8PathBuf> {
        let mut flat = self.normal;
        flat.extend(self.implicit);
        flat.extend(self.order_only);
        flat
    }
}

enum Bucket {
    Normal,
    Implicit,
    OrderOnly,
}

/// Partition evaluated dependency tokens into [`DepGroups`].
///
/// One left-to-right pass: tokens start in the normal group, `|` switches the
/// active group to implicit, `||` to order-only. Sentinels are consumed, not
/// stored, and tokens already emitted are never moved retroactively. A `||`
/// with no preceding `|` is legal and splits normal/order-only directly.
///
/// The lexer rejects `|` appearing after `||`, so that ordering is a caller
/// error here rather than something to reinterpret.
///
/// # Examples
///
/// ```rust
/// use tsumiki::deps::classify;
///
/// let groups = classify(["a.o", "|", "gen.h", "||", "dir"].map(String::from));
/// assert_eq!(groups.normal, ["a.o"]);
/// assert_eq!(groups.implicit, ["gen.h"]);
/// assert_eq!(groups.order_only, ["dir"]);
/// ```
#[must_use]
pub fn classify(tokens: impl IntoIterator<Item = String>) -> DepGroups {
    let mut groups = DepGroups::default();
    let mut bucket = Bucket::Normal;
    for token in tokens {
        match token.as_str() {
            "|" => {
                debug_assert!(
                    matches!(bucket, Bucket::Normal),
                    "lexer must reject `|` after `||`",
                );
                bucket = Bucket::Implicit;
            }
            "||" => bucket = Bucket::OrderOnly,
            _ => {
                let path = Utf8PathBuf::from(token);
                match bucket {
                    Bucket::Normal => groups.normal.push(path),
                    Bucket::Implicit => groups.implicit.push(path),
                    Bucket::OrderOnly => groups.order_only.push(path),
                }
            }
        }
    }
    groups
}
