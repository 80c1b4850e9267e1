// RSA Module - Main module file
// Exports the toy RSA codec: key generation, block framing, encrypt/decrypt

pub mod bigint;
pub mod block;
pub mod keygen;
pub mod encrypt;
pub mod decrypt;

pub use bigint::{extended_gcd, is_prime, mod_inverse, mod_pow, RsaBigInt};
pub use block::{cipher_block_width, max_block_size, CiphertextEncoding};
pub use keygen::{
    generate_keypair, generate_random_keypair, resolve_primes, validate_user_primes, KeyGenConfig,
    RsaKeyPair, RsaPrivateKey, RsaPublicKey,
};
pub use encrypt::{encrypt_block, encrypt_string, encrypt_to_bytes, encrypt_with};
pub use decrypt::{decrypt_block, decrypt_bytes, decrypt_to_string, decrypt_with};
