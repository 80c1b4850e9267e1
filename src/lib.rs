//! Playfair and toy RSA ciphers for teaching.
//!
//! Both codecs are pure functions over caller-owned values: build a
//! [`playfair::KeySquare`] or an [`rsa::RsaKeyPair`] once and pass it in.
//! Nothing here is secure; key sizes and framing are classroom scale.
//!
//! # Modules
//!
//! - `playfair`: key square construction and digraph substitution
//! - `rsa`: small-prime key generation and Base64 block encryption
//! - `util`: plain text file input and output
//! - `cli`: the `cipher-lab` command line

pub mod cli;
pub mod error;
pub mod playfair;
pub mod rsa;
pub mod util;

pub use error::{CipherError, Result};
pub use playfair::{KeySquare, SquareSize};
pub use rsa::{RsaKeyPair, RsaPrivateKey, RsaPublicKey};
