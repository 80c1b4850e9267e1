// Error types shared by the Playfair and RSA codecs

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CipherError {
    /// Rejected key material: non-prime, equal or too small P/Q, bad exponent
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    /// N (or Phi) too small for any usable key
    #[error("Degenerate key: {0}")]
    DegenerateKey(String),

    /// A character reached the digraph step without being in the key square.
    /// Normalized input never triggers this.
    #[error("Character not found in key square: {0:?}")]
    NotFound(char),

    #[error("Decoding failed: {0}")]
    Decode(String),

    #[error("Unsupported key square size: {0} (expected 5 or 6)")]
    UnsupportedSize(usize),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CipherError>;
