use sha2::{Digest, Sha256};

use crate::Sha256Digest;

/// Incremental hash state fed by [`VerifiedReader`](crate::VerifiedReader).
pub trait Hasher {
    type Output;

    fn update(&mut self, data: &[u8]);

    fn finish(self) -> Self::Output;
}

/// SHA-256 state that also counts the bytes it has seen.
#[derive(Clone, Default)]
pub struct Sha256Hasher {
    state: Sha256,
    len:   u64,
}

impl Sha256Hasher {
    pub fn new() -> Self { Self::default() }

    pub fn bytes_hashed(&self) -> u64 { self.len }
}

impl Hasher for Sha256Hasher {
    type Output = Sha256Digest;

    fn update(&mut self, data: &[u8]) {
        self.state.update(data);
        self.len += data.len() as u64;
    }

    fn finish(self) -> Sha256Digest {
        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(&self.state.finalize());
        Sha256Digest::from_bytes(bytes)
    }
}
