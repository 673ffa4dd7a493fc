/// Errors surfaced at the command-line boundary.
#[derive(Debug)]
pub enum Error {
    Codec(pifs_oxide::Error),
    PngDecode(png::DecodingError),
    PngEncode(png::EncodingError),
    /// Input image has an unsupported shape or channel layout.
    Image(&'static str),
    Io(std::io::Error),
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Codec(e) => Some(e),
            Self::PngDecode(e) => Some(e),
            Self::PngEncode(e) => Some(e),
            Self::Image(_) => None,
            Self::Io(e) => Some(e),
        }
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Codec(e) => write!(f, "{e}"),
            Self::PngDecode(e) => write!(f, "failed to decode PNG: {e}"),
            Self::PngEncode(e) => write!(f, "failed to encode PNG: {e}"),
            Self::Image(msg) => write!(f, "unsupported image: {msg}"),
            Self::Io(e) => write!(f, "I/O error: {e}"),
        }
    }
}

impl From<pifs_oxide::Error> for Error {
    fn from(e: pifs_oxide::Error) -> Self {
        Self::Codec(e)
    }
}

impl From<png::DecodingError> for Error {
    fn from(e: png::DecodingError) -> Self {
        Self::PngDecode(e)
    }
}

impl From<png::EncodingError> for Error {
    fn from(e: png::EncodingError) -> Self {
        Self::PngEncode(e)
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl Error {
    /// Process exit code, one per failure kind.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Codec(pifs_oxide::Error::InputRejected(_)) => 2,
            Self::Image(_) | Self::PngDecode(_) => 2,
            Self::Codec(pifs_oxide::Error::CorruptFile(_)) => 3,
            Self::Codec(pifs_oxide::Error::Io(_)) | Self::Io(_) | Self::PngEncode(_) => 4,
            Self::Codec(pifs_oxide::Error::Empty) => 5,
            Self::Codec(_) => 1,
        }
    }
}

/// Shorthand for result type of the CLI.
pub type Result<T> = std::result::Result<T, Error>;
