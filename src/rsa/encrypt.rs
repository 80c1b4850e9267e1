// RSA Encryption Implementation
// Splits plaintext into blocks below N and frames each ciphertext block at fixed width

use log::{debug, warn};

use super::bigint::{from_bytes, mod_pow, RsaBigInt};
use super::block::{check_modulus, cipher_block_width, max_block_size, plaintext_chunk_size, to_fixed_width, CiphertextEncoding};
use super::keygen::RsaPublicKey;
use crate::error::Result;

/// Encrypt bytes and return the raw concatenated ciphertext blocks.
///
/// Each chunk of up to `max_block_size(n)` bytes is read as a big-endian
/// integer m, raised to c = m^e mod n, and written back as exactly
/// `cipher_block_width(n)` bytes so the blocks can be split again on decrypt.
pub fn encrypt_to_bytes(plaintext: &[u8], e: &RsaBigInt, n: &RsaBigInt) -> Result<Vec<u8>> {
    check_modulus(n)?;

    if max_block_size(n) == 0 {
        warn!("N={} is below 256: bytes >= N will not decrypt correctly", n);
    }

    let chunk_size = plaintext_chunk_size(n);
    let width = cipher_block_width(n);
    let block_count = plaintext.len().div_ceil(chunk_size);

    let mut ciphertext = Vec::with_capacity(block_count * width);
    for chunk in plaintext.chunks(chunk_size) {
        let m = from_bytes(chunk);
        let c = mod_pow(&m, e, n);
        ciphertext.extend_from_slice(&to_fixed_width(&c, width));
    }

    debug!(
        "encrypted {} bytes into {} blocks ({} -> {} bytes each)",
        plaintext.len(),
        block_count,
        chunk_size,
        width
    );

    Ok(ciphertext)
}

/// Encrypt bytes and present the ciphertext in the given text encoding
pub fn encrypt_with(plaintext: &[u8], e: &RsaBigInt, n: &RsaBigInt, encoding: CiphertextEncoding) -> Result<String> {
    let ciphertext = encrypt_to_bytes(plaintext, e, n)?;
    Ok(encoding.encode(&ciphertext))
}

/// Encrypt bytes and return Base64 text
pub fn encrypt_block(plaintext: &[u8], e: &RsaBigInt, n: &RsaBigInt) -> Result<String> {
    encrypt_with(plaintext, e, n, CiphertextEncoding::Base64)
}

/// Encrypt a string using RSA public key
pub fn encrypt_string(plaintext: &str, public_key: &RsaPublicKey) -> Result<String> {
    encrypt_block(plaintext.as_bytes(), &public_key.e, &public_key.n)
}
