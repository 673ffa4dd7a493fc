/// The error type for codec-level operations.
#[derive(Debug)]
#[non_exhaustive]
pub enum Error {
    Io(std::io::Error),
    /// Input image or settings cannot be compressed.
    InputRejected(&'static str),
    /// Compressed data failed validation.
    CorruptFile(&'static str),
    /// Decompression was requested with no mappings loaded.
    Empty,
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::InputRejected(msg) => write!(f, "input rejected: {msg}"),
            Self::CorruptFile(msg) => write!(f, "corrupted or invalid file: {msg}"),
            Self::Empty => write!(f, "no encoded data"),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

/// Shorthand for result type of `pifs_oxide`.
pub type Result<T> = std::result::Result<T, Error>;
