use chrono::{DateTime, Utc};
use plinth_index::{Manifest, PlatformArtifact, Target};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Archive,
    Head,
}

/// What was installed, captured at install time.
///
/// The manifest is a copy, not a reference into the index, so uninstall and
/// display keep working after the index moves on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Receipt {
    pub name:         String,
    pub version:      String,
    pub source:       SourceKind,
    pub uri:          String,
    /// Digest of the fetched artifact, lowercase hex.
    pub sha256:       String,
    pub target:       Target,
    pub platform:     PlatformArtifact,
    pub manifest:     Manifest,
    pub installed_at: DateTime<Utc>,
}

impl Receipt {
    pub fn is_head(&self) -> bool { self.source == SourceKind::Head }
}
