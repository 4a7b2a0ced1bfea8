//! Atomic filesystem primitives for the plinth plugin store.
//!
//! Every mutation that another process (or a crash) could observe goes
//! through one of these helpers, which all follow the same discipline:
//! build the new state next to the old one, then publish it with a single
//! `rename`. Readers therefore see either the previous or the next state,
//! never a torn one.

mod error;
pub mod primitives;
mod workspace;

pub use error::{Error, Result};
pub use primitives::{atomic_read, atomic_write, remove_dir_all, replace_dir};
#[cfg(unix)]
pub use primitives::atomic_symlink;
pub use workspace::Workspace;
