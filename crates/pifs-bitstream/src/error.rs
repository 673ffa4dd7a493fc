/// The error type for bit-level operations.
#[derive(Debug)]
#[non_exhaustive]
pub enum Error {
    /// A read was attempted past the end of the bit sequence.
    OutOfBits,
    /// The declared bit count does not fit the backing words.
    LengthMismatch {
        bits: u32,
        words: usize,
    },
}

impl std::error::Error for Error {}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OutOfBits => write!(f, "bit sequence exhausted"),
            Self::LengthMismatch { bits, words } => {
                write!(f, "{bits} bits do not fit in {words} backing words")
            }
        }
    }
}

/// Shorthand for result type of `pifs_bitstream`.
pub type Result<T> = std::result::Result<T, Error>;
