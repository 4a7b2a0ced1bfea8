//! Operating system naming.
//!
//! Manifests name operating systems the way Go's `GOOS` does (`linux`,
//! `darwin`, `windows`), which is what most plugin indexes already use.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Os {
    Linux,
    Darwin,
    Windows,
    FreeBsd,
    Other(&'static str),
}

impl Os {
    /// The operating system this binary was built for.
    pub fn detect() -> Self { Self::from_rust_name(std::env::consts::OS) }

    fn from_rust_name(name: &'static str) -> Self {
        match name {
            "linux" => Os::Linux,
            "macos" => Os::Darwin,
            "windows" => Os::Windows,
            "freebsd" => Os::FreeBsd,
            other => Os::Other(other),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Os::Linux => "linux",
            Os::Darwin => "darwin",
            Os::Windows => "windows",
            Os::FreeBsd => "freebsd",
            Os::Other(name) => name,
        }
    }
}

/// Canonical spelling for a user supplied OS name; unknown names pass
/// through lower-cased.
pub fn normalize(name: &str) -> String {
    match name.trim().to_ascii_lowercase().as_str() {
        "macos" | "osx" | "mac" => "darwin".to_string(),
        "win" | "win32" | "win64" => "windows".to_string(),
        other => other.to_string(),
    }
}

impl fmt::Display for Os {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}
