//! On-disk bookkeeping for installed plugins.
//!
//! ```text
//! <store>/
//!   .staging/<name>-<uuid>/    private build areas, garbage if left behind
//!   <name>/
//!     <version>/               one tree per installed version
//!     current                  indirection to the active version
//!     receipt                  JSON snapshot of what was installed
//! ```
//!
//! The store does no network or archive work. Every mutation it performs is
//! either a rename or a temp-file-plus-rename, so a crash leaves the previous
//! or the next state in effect.

mod error;
mod receipt;
mod store;

pub use error::{Error, Result};
pub use receipt::{Receipt, SourceKind};
pub use store::InstallationStore;
