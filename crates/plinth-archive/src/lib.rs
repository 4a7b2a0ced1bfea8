//! Turns a verified artifact file into an installable directory tree.
//!
//! Archives (zip, tar, tar.gz) are detected by content, not by name, and
//! extracted with every entry path checked so nothing lands outside the
//! destination. Anything else is treated as a single executable file.
//! [`relocate`] then applies a manifest's `files` rules.

pub use detect::{Format, detect};
pub use error::{Error, Result};
pub use extract::unpack;
pub use relocate::relocate;
pub use sanitize::{normalize_path, sanitize_path};

mod detect;
mod error;
mod extract;
mod relocate;
mod sanitize;
