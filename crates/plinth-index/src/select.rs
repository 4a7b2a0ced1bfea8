use plinth_platform::Target;

use crate::{Manifest, ManifestError, PlatformArtifact};

/// Pick the artifact for `target`: the first declared platform whose `os`
/// and `arch` selectors both match.
///
/// Manifests list specific selectors before wildcard fallbacks; no ranking
/// by specificity is attempted. `Ok(None)` means the plugin is not available
/// for this platform. The chosen artifact must name a source, and a `uri`
/// needs a non-empty `sha256`; the checksum text itself is parsed only when
/// the download is verified.
pub fn select_platform<'m>(
    manifest: &'m Manifest,
    target: &Target,
) -> Result<Option<&'m PlatformArtifact>, ManifestError> {
    let Some((index, artifact)) = manifest
        .platforms()
        .iter()
        .enumerate()
        .find(|(_, artifact)| artifact.matches(target))
    else {
        return Ok(None);
    };

    artifact.check().map_err(|problem| ManifestError::Artifact {
        name: manifest.name().to_string(),
        index,
        problem,
    })?;

    Ok(Some(artifact))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ArtifactProblem, Selector};

    const SHA: &str = "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9";

    fn target(os: &str, arch: &str) -> Target { Target::new(os, arch).unwrap() }

    fn foo() -> Manifest {
        Manifest::new("foo", "v1.0.0")
            .unwrap()
            .with_platform(
                PlatformArtifact::new(Selector::exact("linux"), Selector::exact("amd64"))
                    .with_uri("https://example.com/foo.tar.gz", SHA),
            )
            .with_platform(
                PlatformArtifact::new(Selector::Any, Selector::Any).with_head("main"),
            )
    }

    #[test]
    fn test_exact_match_wins_when_declared_first() {
        let manifest = foo();
        let artifact = select_platform(&manifest, &target("linux", "amd64"))
            .unwrap()
            .unwrap();
        assert_eq!(artifact.sha256.as_deref(), Some(SHA));
    }

    #[test]
    fn test_checksum_text_is_not_parsed_at_selection() {
        let manifest = Manifest::new("foo", "1.0")
            .unwrap()
            .with_platform(
                PlatformArtifact::new(Selector::exact("linux"), Selector::exact("amd64"))
                    .with_uri("https://example.com/foo.tar.gz", "abc123"),
            )
            .with_platform(PlatformArtifact::new(Selector::Any, Selector::Any).with_head("main"));
        let artifact = select_platform(&manifest, &target("linux", "amd64"))
            .unwrap()
            .unwrap();
        assert_eq!(artifact.uri.as_deref(), Some("https://example.com/foo.tar.gz"));
        assert_eq!(artifact.sha256.as_deref(), Some("abc123"));
    }

    #[test]
    fn test_manifest_aliases_select_exact_entry() {
        let manifest = Manifest::new("foo", "1.0")
            .unwrap()
            .with_platform(
                PlatformArtifact::new(Selector::exact("linux"), Selector::exact("x86_64"))
                    .with_uri("https://example.com/foo-x86_64.tar.gz", SHA),
            )
            .with_platform(PlatformArtifact::new(Selector::Any, Selector::Any).with_head("main"));
        for arch in ["x86_64", "amd64"] {
            let artifact = select_platform(&manifest, &target("linux", arch))
                .unwrap()
                .unwrap();
            assert!(artifact.uri.is_some(), "{arch} should hit the exact entry");
        }
    }

    #[test]
    fn test_wildcard_fallback() {
        let manifest = foo();
        let artifact = select_platform(&manifest, &target("darwin", "arm64"))
            .unwrap()
            .unwrap();
        assert_eq!(artifact.head.as_deref(), Some("main"));
        assert!(artifact.uri.is_none());
    }

    #[test]
    fn test_first_declared_match_wins() {
        let manifest = Manifest::new("foo", "1.0")
            .unwrap()
            .with_platform(
                PlatformArtifact::new(Selector::exact("linux"), Selector::Any)
                    .with_head("first"),
            )
            .with_platform(
                PlatformArtifact::new(Selector::Any, Selector::exact("amd64"))
                    .with_head("second"),
            );
        let artifact = select_platform(&manifest, &target("linux", "amd64"))
            .unwrap()
            .unwrap();
        assert_eq!(artifact.head.as_deref(), Some("first"));
    }

    #[test]
    fn test_no_match() {
        let manifest = Manifest::new("foo", "1.0").unwrap().with_platform(
            PlatformArtifact::new(Selector::exact("windows"), Selector::Any).with_head("main"),
        );
        assert!(select_platform(&manifest, &target("linux", "amd64"))
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_empty_manifest_never_matches() {
        let manifest = Manifest::new("foo", "1.0").unwrap();
        assert!(select_platform(&manifest, &target("linux", "amd64"))
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_deterministic() {
        let manifest = foo();
        let t = target("darwin", "arm64");
        let first = select_platform(&manifest, &t).unwrap();
        for _ in 0..8 {
            assert_eq!(select_platform(&manifest, &t).unwrap(), first);
        }
    }

    #[test]
    fn test_uri_without_checksum_is_invalid() {
        let manifest = Manifest::new("foo", "1.0").unwrap().with_platform(
            PlatformArtifact::new(Selector::Any, Selector::Any)
                .with_uri("https://example.com/foo.tar.gz", ""),
        );
        let err = select_platform(&manifest, &target("linux", "amd64")).unwrap_err();
        assert!(matches!(
            err,
            ManifestError::Artifact {
                index: 0,
                problem: ArtifactProblem::MissingChecksum,
                ..
            }
        ));
    }

    #[test]
    fn test_match_without_source_is_invalid() {
        let manifest = Manifest::new("foo", "1.0")
            .unwrap()
            .with_platform(PlatformArtifact::new(Selector::Any, Selector::Any));
        let err = select_platform(&manifest, &target("linux", "amd64")).unwrap_err();
        assert!(err.to_string().contains("neither uri nor head"));
    }

    #[test]
    fn test_broken_entry_for_other_platform_is_ignored() {
        let manifest = Manifest::new("foo", "1.0")
            .unwrap()
            .with_platform(PlatformArtifact::new(Selector::exact("windows"), Selector::Any))
            .with_platform(PlatformArtifact::new(Selector::Any, Selector::Any).with_head("main"));
        assert!(select_platform(&manifest, &target("linux", "amd64"))
            .unwrap()
            .is_some());
    }
}
