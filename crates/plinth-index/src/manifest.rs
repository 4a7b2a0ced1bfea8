use std::fmt;

use once_cell::sync::Lazy;
use plinth_platform::{Target, arch, os};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::{ArtifactProblem, ManifestError};

static NAME_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9._-]*$").expect("valid name pattern"));

/// Store entries that share a directory with version directories.
const RESERVED_VERSIONS: [&str; 2] = ["current", "receipt"];

/// Check that `name` can be used as a plugin identity and as a path segment.
pub fn validate_name(name: &str) -> Result<(), ManifestError> {
    if name.is_empty() {
        return Err(ManifestError::EmptyName);
    }
    if !NAME_PATTERN.is_match(name) {
        return Err(ManifestError::InvalidName(name.to_string()));
    }
    Ok(())
}

fn validate_version(name: &str, version: &str) -> Result<(), ManifestError> {
    if version.is_empty() {
        return Err(ManifestError::EmptyVersion {
            name: name.to_string(),
        });
    }
    if !NAME_PATTERN.is_match(version) || RESERVED_VERSIONS.contains(&version) {
        return Err(ManifestError::InvalidVersion {
            name:    name.to_string(),
            version: version.to_string(),
        });
    }
    Ok(())
}

/// A validated plugin manifest. Read-only once constructed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawManifest")]
pub struct Manifest {
    name:              String,
    version:           String,
    #[serde(skip_serializing_if = "Option::is_none")]
    homepage:          Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    short_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    description:       Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    caveats:           Option<String>,
    platforms:         Vec<PlatformArtifact>,
}

#[derive(Deserialize)]
struct RawManifest {
    name:              String,
    version:           String,
    #[serde(default)]
    homepage:          Option<String>,
    #[serde(default)]
    short_description: Option<String>,
    #[serde(default)]
    description:       Option<String>,
    #[serde(default)]
    caveats:           Option<String>,
    #[serde(default)]
    platforms:         Vec<PlatformArtifact>,
}

impl TryFrom<RawManifest> for Manifest {
    type Error = ManifestError;

    fn try_from(raw: RawManifest) -> Result<Self, Self::Error> {
        let mut manifest = Manifest::new(raw.name, raw.version)?;
        manifest.homepage = non_empty(raw.homepage);
        manifest.short_description = non_empty(raw.short_description);
        manifest.description = non_empty(raw.description);
        manifest.caveats = non_empty(raw.caveats);
        manifest.platforms = raw.platforms;
        Ok(manifest)
    }
}

fn non_empty(value: Option<String>) -> Option<String> { value.filter(|v| !v.trim().is_empty()) }

impl Manifest {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Result<Self, ManifestError> {
        let name = name.into();
        let version = version.into();
        validate_name(&name)?;
        validate_version(&name, &version)?;
        Ok(Self {
            name,
            version,
            homepage: None,
            short_description: None,
            description: None,
            caveats: None,
            platforms: Vec::new(),
        })
    }

    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> { toml::from_str(content) }

    pub fn with_platform(mut self, platform: PlatformArtifact) -> Self {
        self.platforms.push(platform);
        self
    }

    pub fn with_homepage(mut self, homepage: impl Into<String>) -> Self {
        self.homepage = non_empty(Some(homepage.into()));
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = non_empty(Some(description.into()));
        self
    }

    pub fn with_caveats(mut self, caveats: impl Into<String>) -> Self {
        self.caveats = non_empty(Some(caveats.into()));
        self
    }

    pub fn name(&self) -> &str { &self.name }

    pub fn version(&self) -> &str { &self.version }

    pub fn homepage(&self) -> Option<&str> { self.homepage.as_deref() }

    pub fn short_description(&self) -> Option<&str> { self.short_description.as_deref() }

    pub fn description(&self) -> Option<&str> { self.description.as_deref() }

    pub fn caveats(&self) -> Option<&str> { self.caveats.as_deref() }

    /// Platform artifacts in declared order.
    pub fn platforms(&self) -> &[PlatformArtifact] { &self.platforms }
}

/// One side of a platform match: a concrete value or the `*` wildcard.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Selector {
    #[default]
    Any,
    Exact(String),
}

impl Selector {
    pub const WILDCARD: &'static str = "*";

    pub fn exact(value: impl Into<String>) -> Self { Self::Exact(value.into()) }

    pub fn matches(&self, value: &str) -> bool {
        match self {
            Selector::Any => true,
            Selector::Exact(expected) => expected.eq_ignore_ascii_case(value),
        }
    }

    /// Like [`Selector::matches`], after putting both sides through the
    /// same alias table (`x86_64` and `amd64` name one architecture).
    pub fn matches_canonical(&self, value: &str, canonical: fn(&str) -> String) -> bool {
        match self {
            Selector::Any => true,
            Selector::Exact(expected) => canonical(expected) == canonical(value),
        }
    }
}

impl From<String> for Selector {
    fn from(value: String) -> Self {
        let trimmed = value.trim();
        if trimmed.is_empty() || trimmed == Self::WILDCARD {
            Selector::Any
        } else {
            Selector::Exact(trimmed.to_string())
        }
    }
}

impl From<Selector> for String {
    fn from(selector: Selector) -> Self { selector.to_string() }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selector::Any => f.write_str(Selector::WILDCARD),
            Selector::Exact(value) => f.write_str(value),
        }
    }
}

/// A post-install relocation inside the staged tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRule {
    pub from: String,
    pub to:   String,
}

impl FileRule {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to:   to.into(),
        }
    }
}

/// One downloadable (or moving) artifact and the platforms it serves.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PlatformArtifact {
    #[serde(default)]
    pub os:     Selector,
    #[serde(default)]
    pub arch:   Selector,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub head:   Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri:    Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sha256: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bin:    Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub files:  Vec<FileRule>,
}

/// Where the installer gets an artifact's content from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source<'a> {
    /// A fixed download pinned by checksum. `sha256` is the manifest text,
    /// parsed when the download is verified.
    Archive { uri: &'a str, sha256: &'a str },
    /// A moving reference; each install snapshots whatever it points at.
    Head { uri: &'a str },
}

impl Source<'_> {
    pub fn uri(&self) -> &str {
        match self {
            Source::Archive { uri, .. } | Source::Head { uri } => uri,
        }
    }

    pub fn is_head(&self) -> bool { matches!(self, Source::Head { .. }) }
}

impl PlatformArtifact {
    pub fn new(os: Selector, arch: Selector) -> Self {
        Self {
            os,
            arch,
            ..Default::default()
        }
    }

    pub fn with_uri(mut self, uri: impl Into<String>, sha256: impl Into<String>) -> Self {
        self.uri = Some(uri.into());
        self.sha256 = Some(sha256.into());
        self
    }

    pub fn with_head(mut self, head: impl Into<String>) -> Self {
        self.head = Some(head.into());
        self
    }

    pub fn with_bin(mut self, bin: impl Into<String>) -> Self {
        self.bin = Some(bin.into());
        self
    }

    pub fn with_file(mut self, rule: FileRule) -> Self {
        self.files.push(rule);
        self
    }

    pub fn matches(&self, target: &Target) -> bool {
        self.os.matches_canonical(target.os(), os::normalize)
            && self.arch.matches_canonical(target.arch(), arch::normalize)
    }

    fn uri_ref(&self) -> Option<&str> { self.uri.as_deref().filter(|v| !v.trim().is_empty()) }

    fn head_ref(&self) -> Option<&str> { self.head.as_deref().filter(|v| !v.trim().is_empty()) }

    /// Structural checks that must hold before anything is fetched.
    pub fn check(&self) -> Result<(), ArtifactProblem> {
        match (self.uri_ref(), self.head_ref()) {
            (None, None) => Err(ArtifactProblem::NoSource),
            (Some(_), _) => self.checksum().map(|_| ()),
            (None, Some(_)) => Ok(()),
        }
    }

    fn checksum(&self) -> Result<&str, ArtifactProblem> {
        self.sha256
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .ok_or(ArtifactProblem::MissingChecksum)
    }

    /// Resolve which source an install uses. `uri` wins unless `prefer_head`
    /// is set; an artifact that only has `head` always installs from head.
    pub fn source(&self, prefer_head: bool) -> Result<Source<'_>, ArtifactProblem> {
        self.check()?;
        match (self.uri_ref(), self.head_ref()) {
            (_, Some(head)) if prefer_head => Ok(Source::Head { uri: head }),
            (Some(_), _) if prefer_head => Err(ArtifactProblem::NoHead),
            (Some(uri), _) => Ok(Source::Archive {
                uri,
                sha256: self.checksum()?,
            }),
            (None, Some(head)) => Ok(Source::Head { uri: head }),
            (None, None) => Err(ArtifactProblem::NoSource),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHA: &str = "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9";

    #[test]
    fn test_name_validation() {
        assert!(validate_name("foo").is_ok());
        assert!(validate_name("foo-bar_2.x").is_ok());
        assert!(matches!(validate_name(""), Err(ManifestError::EmptyName)));
        for bad in [".hidden", "../etc", "a/b", "a b", "-x"] {
            assert!(
                matches!(validate_name(bad), Err(ManifestError::InvalidName(_))),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn test_new_rejects_bad_versions() {
        assert!(matches!(
            Manifest::new("foo", ""),
            Err(ManifestError::EmptyVersion { .. })
        ));
        for bad in ["current", "receipt", "../1.0", "1.0/x"] {
            assert!(matches!(
                Manifest::new("foo", bad),
                Err(ManifestError::InvalidVersion { .. })
            ));
        }
        assert_eq!(Manifest::new("foo", "v1.2.3").unwrap().version(), "v1.2.3");
    }

    #[test]
    fn test_deserialize_validates() {
        let err = Manifest::from_toml_str("name = \"\"\nversion = \"1.0\"").unwrap_err();
        assert!(err.to_string().contains("plugin name must not be empty"));

        let manifest = Manifest::from_toml_str(
            "name = \"foo\"\nversion = \"1.0\"\ncaveats = \"  \"\n",
        )
        .unwrap();
        assert!(manifest.platforms().is_empty());
        assert_eq!(manifest.caveats(), None);
    }

    #[test]
    fn test_selector_wildcards() {
        assert_eq!(Selector::from("*".to_string()), Selector::Any);
        assert_eq!(Selector::from(String::new()), Selector::Any);
        assert!(Selector::Any.matches("linux"));
        assert!(Selector::exact("Linux").matches("linux"));
        assert!(!Selector::exact("linux").matches("darwin"));
    }

    #[test]
    fn test_selector_aliases_match_target() {
        let artifact = PlatformArtifact::new(Selector::exact("macOS"), Selector::exact("x86_64"))
            .with_head("main");
        assert!(artifact.matches(&Target::new("darwin", "amd64").unwrap()));
        assert!(artifact.matches(&Target::new("macos", "x86_64").unwrap()));
        assert!(!artifact.matches(&Target::new("darwin", "arm64").unwrap()));
        assert!(Selector::exact("aarch64").matches_canonical("arm64", arch::normalize));
    }

    #[test]
    fn test_omitted_selectors_are_wildcards() {
        let manifest = Manifest::from_toml_str(
            "name = \"foo\"\nversion = \"1.0\"\n[[platforms]]\nhead = \"https://x/main.tar.gz\"\n",
        )
        .unwrap();
        let artifact = &manifest.platforms()[0];
        assert_eq!(artifact.os, Selector::Any);
        assert_eq!(artifact.arch, Selector::Any);
    }

    #[test]
    fn test_source_resolution() {
        let both = PlatformArtifact::default()
            .with_uri("https://x/foo.tar.gz", SHA)
            .with_head("https://x/main.tar.gz");
        assert!(matches!(both.source(false), Ok(Source::Archive { .. })));
        assert!(matches!(both.source(true), Ok(Source::Head { .. })));

        let head_only = PlatformArtifact::default().with_head("https://x/main.tar.gz");
        assert_eq!(
            head_only.source(false).unwrap(),
            Source::Head {
                uri: "https://x/main.tar.gz"
            }
        );

        let uri_only = PlatformArtifact::default().with_uri("https://x/foo.tar.gz", " abc123 ");
        assert_eq!(
            uri_only.source(false).unwrap(),
            Source::Archive {
                uri:    "https://x/foo.tar.gz",
                sha256: "abc123",
            }
        );
        assert!(matches!(uri_only.source(true), Err(ArtifactProblem::NoHead)));
    }

    #[test]
    fn test_check_rejects_missing_sources_and_checksums() {
        assert!(matches!(
            PlatformArtifact::default().check(),
            Err(ArtifactProblem::NoSource)
        ));
        assert!(matches!(
            PlatformArtifact::default().with_uri("https://x", "").check(),
            Err(ArtifactProblem::MissingChecksum)
        ));
        assert!(PlatformArtifact::default().with_uri("https://x", "abc123").check().is_ok());
    }

    #[test]
    fn test_serialize_round_trips_through_toml() {
        let manifest = Manifest::new("foo", "1.0")
            .unwrap()
            .with_caveats("needs jq")
            .with_platform(
                PlatformArtifact::new(Selector::exact("linux"), Selector::Any)
                    .with_uri("https://x/foo.tar.gz", SHA)
                    .with_bin("foo")
                    .with_file(FileRule::new("foo-linux/*", ".")),
            );
        let text = toml::to_string(&manifest).unwrap();
        assert!(text.contains("arch = \"*\""));
        assert_eq!(Manifest::from_toml_str(&text).unwrap(), manifest);
    }
}
