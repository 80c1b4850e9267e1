// Playfair Digraph Substitution
// Pairs the normalized text and substitutes each pair by the row/column/rectangle rules

use log::debug;

use super::matrix::{normalize, KeySquare};
use crate::error::Result;

/// Padding letter for odd lengths and doubled letters
pub const FILLER: char = 'X';

/// Shift direction along a row or column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Encrypt,
    Decrypt,
}

impl Direction {
    /// +1 to encrypt, -1 to decrypt
    pub fn shift(&self) -> isize {
        match self {
            Direction::Encrypt => 1,
            Direction::Decrypt => -1,
        }
    }
}

/// Split text into digraphs.
///
/// A lone trailing character is paired with the filler. A doubled letter
/// becomes (letter, filler) and only one input position is consumed, so the
/// second copy starts the next pair.
pub fn digraphs(text: &str) -> Vec<(char, char)> {
    let chars: Vec<char> = text.chars().collect();
    let mut pairs = Vec::with_capacity(chars.len() / 2 + 1);

    let mut i = 0;
    while i < chars.len() {
        let a = chars[i];
        let b = chars.get(i + 1).copied().unwrap_or(FILLER);
        if a == b {
            pairs.push((a, FILLER));
            i += 1;
        } else {
            pairs.push((a, b));
            i += 2;
        }
    }

    pairs
}

/// Substitute every digraph of `text` against `square`.
///
/// `text` should already be normalized; any character missing from the
/// square fails with `NotFound`.
pub fn transform(text: &str, square: &KeySquare, direction: Direction) -> Result<String> {
    let n = square.dimension() as isize;
    let step = |i: usize| (i as isize + direction.shift() + n).rem_euclid(n) as usize;

    let mut output = String::with_capacity(text.len() + 2);
    for (a, b) in digraphs(text) {
        let (x1, y1) = square.locate(a)?;
        let (x2, y2) = square.locate(b)?;

        if x1 == x2 {
            // same row
            output.push(square.get(x1, step(y1)));
            output.push(square.get(x2, step(y2)));
        } else if y1 == y2 {
            // same column
            output.push(square.get(step(x1), y1));
            output.push(square.get(step(x2), y2));
        } else {
            // rectangle: swap columns
            output.push(square.get(x1, y2));
            output.push(square.get(x2, y1));
        }
    }

    Ok(output)
}

/// Undo the padding heuristically.
///
/// Drops each filler sitting strictly between two identical characters of
/// `decrypted`, then one trailing filler. A genuine X in that position is
/// lost as well ("AXA" comes back as "AA").
pub fn decrypt_cleanup(decrypted: &str) -> String {
    let chars: Vec<char> = decrypted.chars().collect();

    let mut clean: String = chars
        .iter()
        .enumerate()
        .filter(|&(i, &c)| {
            let sandwiched = c == FILLER && i > 0 && i + 1 < chars.len() && chars[i - 1] == chars[i + 1];
            !sandwiched
        })
        .map(|(_, &c)| c)
        .collect();

    if clean.ends_with(FILLER) {
        clean.pop();
    }

    clean
}

/// Normalize and encrypt
pub fn encrypt(plaintext: &str, square: &KeySquare) -> Result<String> {
    let text = normalize(plaintext, square.size());
    let ciphertext = transform(&text, square, Direction::Encrypt)?;
    debug!("playfair {} encrypt: {} -> {} chars", square.size(), text.len(), ciphertext.len());
    Ok(ciphertext)
}

/// Normalize, decrypt, and strip padding
pub fn decrypt(ciphertext: &str, square: &KeySquare) -> Result<String> {
    let text = normalize(ciphertext, square.size());
    let decrypted = transform(&text, square, Direction::Decrypt)?;
    debug!("playfair {} decrypt: {} -> {} chars", square.size(), text.len(), decrypted.len());
    Ok(decrypt_cleanup(&decrypted))
}
