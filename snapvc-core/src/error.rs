use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Repository not initialized (run 'snapvc init' first)")]
    NotInitialized,

    #[error("Already exists: {0}")]
    AlreadyExists(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid version number: {0}")]
    Format(String),

    #[error("Invalid name: {0}")]
    InvalidName(String),

    #[error("Could not acquire repository lock within timeout")]
    LockTimeout,

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Coarse failure class, stable across message wording changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    NotInitialized,
    AlreadyExists,
    NotFound,
    Io,
    Format,
    InvalidName,
    LockTimeout,
    Config,
}

impl Error {
    pub fn class(&self) -> ErrorClass {
        match self {
            Error::NotInitialized => ErrorClass::NotInitialized,
            Error::AlreadyExists(_) => ErrorClass::AlreadyExists,
            Error::NotFound(_) => ErrorClass::NotFound,
            Error::Io(_) => ErrorClass::Io,
            Error::Format(_) => ErrorClass::Format,
            Error::InvalidName(_) => ErrorClass::InvalidName,
            Error::LockTimeout => ErrorClass::LockTimeout,
            Error::Config(_) => ErrorClass::Config,
        }
    }

    pub(crate) fn not_found(what: impl Into<String>) -> Self {
        Error::NotFound(what.into())
    }

    pub(crate) fn already_exists(what: impl Into<String>) -> Self {
        Error::AlreadyExists(what.into())
    }
}
