use thiserror::Error;

/// Errors reported by fallible map accessors.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The requested key is not stored in the map.
    #[error("key not found")]
    KeyNotFound,
}

pub type Result<T> = std::result::Result<T, Error>;
