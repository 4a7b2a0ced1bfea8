use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::arch::{self, Arch};
use crate::os::{self, Os};
use crate::{Error, Result};

/// An (os, arch) pair that platform selectors are matched against.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Target {
    os:   String,
    arch: String,
}

impl Target {
    /// Build a target from user supplied names, normalising common aliases
    /// (`macos` -> `darwin`, `x86_64` -> `amd64`, ...).
    pub fn new(os: &str, arch: &str) -> Result<Self> {
        let os = os::normalize(os);
        let arch = arch::normalize(arch);
        if os.is_empty() {
            return Err(Error::Empty("os"));
        }
        if arch.is_empty() {
            return Err(Error::Empty("arch"));
        }
        Ok(Self { os, arch })
    }

    /// The platform this binary is running on.
    pub fn host() -> Self {
        Self {
            os:   Os::detect().as_str().to_string(),
            arch: Arch::detect().as_str().to_string(),
        }
    }

    /// Host target with optional per-field overrides.
    pub fn host_with(os: Option<&str>, arch: Option<&str>) -> Result<Self> {
        let host = Self::host();
        Self::new(os.unwrap_or(&host.os), arch.unwrap_or(&host.arch))
    }

    pub fn os(&self) -> &str { &self.os }

    pub fn arch(&self) -> &str { &self.arch }
}

impl FromStr for Target {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let (os, arch) = s
            .split_once('/')
            .ok_or_else(|| Error::MalformedTarget(s.to_string()))?;
        Self::new(os, arch)
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}/{}", self.os, self.arch) }
}
