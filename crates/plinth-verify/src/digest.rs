use std::fmt;
use std::fs::File;
use std::io;
use std::path::Path;
use std::str::FromStr;

use crate::{Hasher, Result, Sha256Hasher, VerificationError, VerifiedReader};

/// A parsed SHA-256 checksum.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Sha256Digest([u8; 32]);

impl Sha256Digest {
    pub fn of(data: &[u8]) -> Self {
        let mut hasher = Sha256Hasher::new();
        hasher.update(data);
        hasher.finish()
    }

    pub const fn from_bytes(bytes: [u8; 32]) -> Self { Self(bytes) }

    pub fn as_bytes(&self) -> &[u8; 32] { &self.0 }

    /// `self` is the expected checksum; `actual` is what was computed.
    pub fn check(&self, actual: &Sha256Digest) -> Result<()> {
        if self == actual {
            return Ok(());
        }
        Err(VerificationError::Mismatch {
            expected: self.to_string(),
            actual:   actual.to_string(),
        })
    }
}

impl FromStr for Sha256Digest {
    type Err = VerificationError;

    /// Accepts upper or lower case hex; surrounding whitespace is ignored.
    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        let mut out = [0u8; 32];
        hex::decode_to_slice(trimmed, &mut out)
            .map_err(|_| VerificationError::InvalidDigest(s.to_string()))?;
        Ok(Self(out))
    }
}

impl fmt::Display for Sha256Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&hex::encode(self.0)) }
}

impl fmt::Debug for Sha256Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Sha256Digest({self})")
    }
}

/// Stream a file through SHA-256.
pub fn hash_file(path: impl AsRef<Path>) -> Result<Sha256Digest> {
    let path = path.as_ref();
    let read_err = |source| VerificationError::Read {
        path: path.to_path_buf(),
        source,
    };

    let file = File::open(path).map_err(read_err)?;
    let mut reader = VerifiedReader::sha256(file);
    io::copy(&mut reader, &mut io::sink()).map_err(read_err)?;
    Ok(reader.into_digest())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const HELLO: &str = "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9";

    #[test]
    fn test_parse_and_display() {
        let digest: Sha256Digest = HELLO.to_uppercase().parse().unwrap();
        assert_eq!(digest.to_string(), HELLO);
        assert_eq!(digest, Sha256Digest::of(b"hello world"));
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!("abc123".parse::<Sha256Digest>().is_err());
        assert!("".parse::<Sha256Digest>().is_err());
        assert!(HELLO.replace('b', "z").parse::<Sha256Digest>().is_err());
    }

    #[test]
    fn test_hash_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("artifact.tar.gz");
        std::fs::write(&path, "hello world").unwrap();
        assert_eq!(hash_file(&path).unwrap().to_string(), HELLO);
    }

    #[test]
    fn test_check() {
        let expected: Sha256Digest = HELLO.parse().unwrap();
        assert!(expected.check(&Sha256Digest::of(b"hello world")).is_ok());
        assert!(matches!(
            expected.check(&Sha256Digest::of(b"hello")),
            Err(VerificationError::Mismatch { .. })
        ));
    }

    #[test]
    fn test_hash_missing_file() {
        let dir = tempdir().unwrap();
        let err = hash_file(dir.path().join("missing")).unwrap_err();
        assert!(matches!(err, VerificationError::Read { .. }));
    }
}
