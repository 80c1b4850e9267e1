// RSA Decryption Implementation
// Splits ciphertext into fixed-width blocks and recovers the plaintext bytes

use log::debug;
use num_traits::ToPrimitive;

use super::bigint::{from_bytes, from_u64, mod_pow, to_bytes, RsaBigInt};
use super::block::{check_modulus, cipher_block_width, is_single_byte_modulus, CiphertextEncoding};
use super::keygen::RsaPrivateKey;
use crate::error::{CipherError, Result};

/// Decrypt raw ciphertext bytes into plaintext bytes.
///
/// When n <= 255 every ciphertext byte is a block and decrypts to exactly one
/// byte. Otherwise blocks are `cipher_block_width(n)` bytes wide and leading
/// zero bytes of each decrypted block are dropped as padding, so a genuine
/// 0x00 at the front of a plaintext block does not survive.
pub fn decrypt_bytes(ciphertext: &[u8], d: &RsaBigInt, n: &RsaBigInt) -> Result<Vec<u8>> {
    check_modulus(n)?;

    let mut plaintext = Vec::with_capacity(ciphertext.len());

    if is_single_byte_modulus(n) {
        for &byte in ciphertext {
            let m = mod_pow(&from_u64(u64::from(byte)), d, n);
            let m = m
                .to_u8()
                .ok_or_else(|| CipherError::Decode(format!("block value {} does not fit a byte", m)))?;
            plaintext.push(m);
        }
        return Ok(plaintext);
    }

    let width = cipher_block_width(n);
    for block in ciphertext.chunks(width) {
        let c = from_bytes(block);
        let m = mod_pow(&c, d, n);

        // Remove leading zeros
        let bytes = to_bytes(&m);
        let start = bytes.iter().position(|&b| b != 0).unwrap_or(bytes.len());
        plaintext.extend_from_slice(&bytes[start..]);
    }

    debug!(
        "decrypted {} ciphertext bytes ({}-byte blocks) into {} bytes",
        ciphertext.len(),
        width,
        plaintext.len()
    );

    Ok(plaintext)
}

/// Decrypt ciphertext text in the given encoding to a UTF-8 string
pub fn decrypt_with(ciphertext: &str, d: &RsaBigInt, n: &RsaBigInt, encoding: CiphertextEncoding) -> Result<String> {
    let ciphertext = encoding.decode(ciphertext)?;
    let plaintext = decrypt_bytes(&ciphertext, d, n)?;
    String::from_utf8(plaintext).map_err(|e| CipherError::Decode(format!("Invalid UTF-8: {}", e)))
}

/// Decrypt Base64 ciphertext to a UTF-8 string
pub fn decrypt_block(ciphertext: &str, d: &RsaBigInt, n: &RsaBigInt) -> Result<String> {
    decrypt_with(ciphertext, d, n, CiphertextEncoding::Base64)
}

/// Decrypt ciphertext to a string using RSA private key
pub fn decrypt_to_string(ciphertext: &str, private_key: &RsaPrivateKey) -> Result<String> {
    decrypt_block(ciphertext, &private_key.d, &private_key.n)
}
