// RSA Block Framing
// Chunk sizes derived from the modulus and the text form of ciphertext

use std::fmt;
use std::str::FromStr;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use super::bigint::{from_u64, RsaBigInt};
use crate::error::{CipherError, Result};

/// Refuse moduli no residue arithmetic can run on
pub fn check_modulus(n: &RsaBigInt) -> Result<()> {
    if *n < from_u64(2) {
        return Err(CipherError::DegenerateKey(format!("N={} is too small to encrypt with", n)));
    }
    Ok(())
}

/// Largest byte count k such that 256^k - 1 < n.
/// Every k-byte plaintext chunk is then a residue below n.
pub fn max_block_size(n: &RsaBigInt) -> usize {
    let mut k = 0;
    let mut limit = from_u64(256);

    while &limit - 1u8 < *n {
        limit <<= 8;
        k += 1;
    }

    k
}

/// Chunk size actually used for encryption.
/// For n <= 255 no whole byte fits, so each byte becomes its own block.
pub fn plaintext_chunk_size(n: &RsaBigInt) -> usize {
    max_block_size(n).max(1)
}

/// Bytes needed to hold any residue mod n: ceil(bitlength(n) / 8)
pub fn cipher_block_width(n: &RsaBigInt) -> usize {
    ((n.bits() + 7) / 8) as usize
}

/// Whether n is in the single-byte regime (each block is exactly one byte)
pub fn is_single_byte_modulus(n: &RsaBigInt) -> bool {
    *n <= from_u64(255)
}

/// Write `value` big-endian into exactly `width` bytes, zero-padded on the left
pub fn to_fixed_width(value: &RsaBigInt, width: usize) -> Vec<u8> {
    let bytes = value.to_bytes_be();
    let mut block = vec![0u8; width];
    let start = width.saturating_sub(bytes.len());
    let skip = bytes.len().saturating_sub(width);
    block[start..].copy_from_slice(&bytes[skip..]);
    block
}

/// How ciphertext bytes are shown as text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CiphertextEncoding {
    #[default]
    Base64,
    Hex,
}

impl CiphertextEncoding {
    pub fn encode(&self, bytes: &[u8]) -> String {
        match self {
            CiphertextEncoding::Base64 => STANDARD.encode(bytes),
            CiphertextEncoding::Hex => hex::encode(bytes),
        }
    }

    pub fn decode(&self, text: &str) -> Result<Vec<u8>> {
        let text = text.trim();
        match self {
            CiphertextEncoding::Base64 => STANDARD
                .decode(text)
                .map_err(|e| CipherError::Decode(format!("invalid Base64: {}", e))),
            CiphertextEncoding::Hex => {
                hex::decode(text).map_err(|e| CipherError::Decode(format!("invalid hex: {}", e)))
            }
        }
    }
}

impl fmt::Display for CiphertextEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CiphertextEncoding::Base64 => write!(f, "base64"),
            CiphertextEncoding::Hex => write!(f, "hex"),
        }
    }
}

impl FromStr for CiphertextEncoding {
    type Err = CipherError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "base64" | "b64" => Ok(CiphertextEncoding::Base64),
            "hex" => Ok(CiphertextEncoding::Hex),
            other => Err(CipherError::Decode(format!("unknown ciphertext encoding: {}", other))),
        }
    }
}
