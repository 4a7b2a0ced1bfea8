//! Checksum verification for staged plugin artifacts.
//!
//! Provides incremental hashing so content can be verified while it is being
//! copied, plus a parsed [`Sha256Digest`] type for the checksums that plugin
//! manifests carry.
//!
//! # Example
//!
//! ```
//! use std::io::Read;
//! use plinth_verify::{Sha256Digest, VerifiedReader};
//!
//! let expected: Sha256Digest =
//!     "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9".parse().unwrap();
//!
//! let mut reader = VerifiedReader::sha256(&b"hello world"[..]);
//! let mut staged = Vec::new();
//! reader.read_to_end(&mut staged).unwrap();
//!
//! expected.check(&reader.into_digest()).unwrap();
//! ```

pub use self::digest::{Sha256Digest, hash_file};
pub use self::error::{Result, VerificationError};
pub use self::hasher::{Hasher, Sha256Hasher};
pub use self::reader::VerifiedReader;

mod digest;
mod error;
mod hasher;
mod reader;
