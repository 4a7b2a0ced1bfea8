pub use error::{Error, Result};
pub use target::Target;

pub mod arch;
mod error;
pub mod os;
mod target;
