//! Architecture naming, spelled like Go's `GOARCH`.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Arch {
    X86,
    Amd64,
    Arm,
    Arm64,
    Other(&'static str),
}

impl Arch {
    /// The architecture this binary was built for.
    pub fn detect() -> Self { Self::from_rust_name(std::env::consts::ARCH) }

    fn from_rust_name(name: &'static str) -> Self {
        match name {
            "x86" => Arch::X86,
            "x86_64" => Arch::Amd64,
            "arm" => Arch::Arm,
            "aarch64" => Arch::Arm64,
            other => Arch::Other(other),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Arch::X86 => "386",
            Arch::Amd64 => "amd64",
            Arch::Arm => "arm",
            Arch::Arm64 => "arm64",
            Arch::Other(name) => name,
        }
    }
}

pub fn normalize(name: &str) -> String {
    match name.trim().to_ascii_lowercase().as_str() {
        "x86_64" | "x64" => "amd64".to_string(),
        "aarch64" => "arm64".to_string(),
        "i386" | "i686" | "x86" => "386".to_string(),
        "armv7" | "armv7l" | "armhf" => "arm".to_string(),
        other => other.to_string(),
    }
}

impl fmt::Display for Arch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}
