//! Top-level build metadata harvested after the fold completes.

use camino::Utf8PathBuf;
use semver::Version;
use serde::{Deserialize, Serialize};

/// Optional whole-graph settings taken from reserved top-level variables.
///
/// Both fields default to absent and are omitted from serialised output when
/// unset.
///
/// # Examples
///
/// ```rust
/// use tsumiki::ir::Metadata;
///
/// let metadata = Metadata::default();
/// assert!(metadata.is_empty());
/// assert_eq!(serde_json::to_string(&metadata).expect("serialise"), "{}");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    /// Minimum tool version the build description requires.
    #[serde(rename = "req-version", default, skip_serializing_if = "Option::is_none")]
    pub required_version: Option<Version>,

    /// Directory build outputs should be rooted under.
    #[serde(rename = "build-dir", default, skip_serializing_if = "Option::is_none")]
    pub build_directory: Option<Utf8PathBuf>,
}

impl Metadata {
    /// Whether neither field is set.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.required_version.is_none() && self.build_directory.is_none()
    }
}
