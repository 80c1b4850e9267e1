// Playfair Module
// Key square construction and digraph substitution for 5x5 and 6x6 squares

pub mod matrix;
pub mod cipher;

pub use matrix::{normalize, KeySquare, SquareSize, ALPHABET_5, ALPHABET_6};
pub use cipher::{decrypt, decrypt_cleanup, digraphs, encrypt, transform, Direction, FILLER};
