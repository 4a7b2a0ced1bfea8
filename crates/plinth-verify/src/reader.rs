use std::io::{self, Read};

use crate::{Hasher, Sha256Hasher};

/// Hashes everything that is read through it.
///
/// Wrap the artifact stream while it is copied to disk; the digest is then
/// available without a second pass over the file.
pub struct VerifiedReader<R, H = Sha256Hasher> {
    inner:  R,
    hasher: H,
}

impl<R: Read> VerifiedReader<R> {
    pub fn sha256(inner: R) -> Self { Self::new(inner, Sha256Hasher::new()) }
}

impl<R, H> VerifiedReader<R, H> {
    pub fn new(inner: R, hasher: H) -> Self { Self { inner, hasher } }

    pub fn hasher(&self) -> &H { &self.hasher }
}

impl<R, H: Hasher> VerifiedReader<R, H> {
    pub fn into_digest(self) -> H::Output { self.hasher.finish() }
}

impl<R: Read, H: Hasher> Read for VerifiedReader<R, H> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        self.hasher.update(&buf[..n]);
        Ok(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Sha256Digest, VerificationError};
    use std::io::Cursor;

    #[test]
    fn test_passes_data_through() {
        let data = b"#!/bin/sh\necho plugin\n";
        let mut reader = VerifiedReader::sha256(Cursor::new(data));
        let mut out = Vec::new();
        io::copy(&mut reader, &mut out).unwrap();

        assert_eq!(out, data);
        assert_eq!(reader.hasher().bytes_hashed(), data.len() as u64);
        assert_eq!(reader.into_digest(), Sha256Digest::of(data));
    }

    #[test]
    fn test_partial_read_hashes_prefix() {
        let mut reader = VerifiedReader::sha256(Cursor::new(b"abcdef"));
        let mut buf = [0u8; 3];
        reader.read_exact(&mut buf).unwrap();

        let expected = Sha256Digest::of(b"other");
        let err = expected.check(&reader.into_digest()).unwrap_err();
        match err {
            VerificationError::Mismatch { actual, .. } => {
                assert_eq!(actual, Sha256Digest::of(b"abc").to_string());
            }
            other => panic!("expected Mismatch, got {other:?}"),
        }
    }
}
