use thiserror::Error;

/// The primary error type for all operations in the `toksync` application.
///
/// This enum uses `thiserror` to neatly wrap the kinds of errors that can occur,
/// from I/O issues to configuration problems.
#[derive(Error, Debug)]
pub enum Error {
    /// An error related to file system I/O.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// An error that occurred while compiling a file glob pattern.
    #[error("Glob pattern error: {0}")]
    Glob(#[from] globset::Error),

    /// A general configuration-related error.
    #[error("Config error: {0}")]
    Config(String),

    /// An error from the `ignore` crate, which is used for directory traversal.
    #[error("Walk error: {0}")]
    Walk(#[from] ignore::Error),

    /// An error related to persisting a temporary file during write-back.
    #[error("Tempfile error: {0}")]
    TempFile(#[from] tempfile::PersistError),
}

/// A convenient type alias for `Result<T, toksync::errors::Error>`.
pub type Result<T> = std::result::Result<T, Error>;

impl From<String> for Error {
    fn from(s: String) -> Self {
        Error::Config(s)
    }
}

impl From<&str> for Error {
    fn from(s: &str) -> Self {
        Error::Config(s.to_string())
    }
}
