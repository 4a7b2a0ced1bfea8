//! Plugin manifests and platform selection.
//!
//! A [`Manifest`] is an immutable, validated description of one plugin
//! version and the artifacts it ships for each platform.
//! [`select_platform`] picks the artifact for a [`Target`]; [`Index`] loads
//! manifests from an index checkout on disk.
//!
//! ```
//! use plinth_index::{Manifest, select_platform};
//! use plinth_platform::Target;
//!
//! let manifest = Manifest::from_toml_str(r#"
//!     name = "foo"
//!     version = "v1.0.0"
//!
//!     [[platforms]]
//!     os = "linux"
//!     arch = "amd64"
//!     uri = "https://example.com/foo-linux.tar.gz"
//!     sha256 = "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9"
//!
//!     [[platforms]]
//!     head = "https://example.com/foo/archive/main.tar.gz"
//! "#).unwrap();
//!
//! let darwin = Target::new("darwin", "arm64").unwrap();
//! let artifact = select_platform(&manifest, &darwin).unwrap().unwrap();
//! assert!(artifact.uri.is_none());
//! ```

pub use error::{ArtifactProblem, IndexError, ManifestError};
pub use index::Index;
pub use manifest::{FileRule, Manifest, PlatformArtifact, Selector, Source, validate_name};
pub use plinth_platform::Target;
pub use select::select_platform;

mod error;
mod index;
mod manifest;
mod select;
