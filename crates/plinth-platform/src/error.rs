use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    #[error("empty {0} name")]
    Empty(&'static str),

    #[error("malformed target '{0}', expected <os>/<arch>")]
    MalformedTarget(String),
}
