// Playfair Key Square
// Alphabets, text normalization and the size x size grid built from a passphrase

use std::fmt;

use crate::error::{CipherError, Result};

/// 25 letters, J folded into I
pub const ALPHABET_5: &str = "ABCDEFGHIKLMNOPQRSTUVWXYZ";
/// 26 letters then 10 digits
pub const ALPHABET_6: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Side length of the key square
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SquareSize {
    #[default]
    Five,
    Six,
}

impl SquareSize {
    pub fn dimension(&self) -> usize {
        match self {
            SquareSize::Five => 5,
            SquareSize::Six => 6,
        }
    }

    pub fn alphabet(&self) -> &'static str {
        match self {
            SquareSize::Five => ALPHABET_5,
            SquareSize::Six => ALPHABET_6,
        }
    }

    /// J shares a cell with I in the 5x5 square
    fn folds_j(&self) -> bool {
        matches!(self, SquareSize::Five)
    }
}

impl TryFrom<usize> for SquareSize {
    type Error = CipherError;

    fn try_from(size: usize) -> Result<Self> {
        match size {
            5 => Ok(SquareSize::Five),
            6 => Ok(SquareSize::Six),
            other => Err(CipherError::UnsupportedSize(other)),
        }
    }
}

impl fmt::Display for SquareSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let n = self.dimension();
        write!(f, "{}x{}", n, n)
    }
}

/// Uppercase, keep only [A-Z0-9], and fold J into I for the 5x5 square
pub fn normalize(text: &str, size: SquareSize) -> String {
    text.to_uppercase()
        .chars()
        .filter(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
        .map(|c| if size.folds_j() && c == 'J' { 'I' } else { c })
        .collect()
}

/// Playfair key square.
///
/// Holds every alphabet character exactly once: the key's characters in
/// first-seen order, then the rest of the alphabet in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeySquare {
    size: SquareSize,
    cells: Vec<char>,
}

impl KeySquare {
    pub fn new(key: &str, size: SquareSize) -> Self {
        let alphabet = size.alphabet();

        let mut key = key.to_uppercase();
        if size.folds_j() {
            key = key.replace('J', "I");
        }

        let mut cells: Vec<char> = Vec::with_capacity(alphabet.len());
        for c in key.chars().chain(alphabet.chars()) {
            if alphabet.contains(c) && !cells.contains(&c) {
                cells.push(c);
            }
        }

        Self { size, cells }
    }

    pub fn size(&self) -> SquareSize {
        self.size
    }

    pub fn dimension(&self) -> usize {
        self.size.dimension()
    }

    /// Character at (row, col); both wrap modulo the dimension
    pub fn get(&self, row: usize, col: usize) -> char {
        let n = self.dimension();
        self.cells[(row % n) * n + (col % n)]
    }

    /// Row and column of `ch`
    pub fn locate(&self, ch: char) -> Result<(usize, usize)> {
        let n = self.dimension();
        self.cells
            .iter()
            .position(|&c| c == ch)
            .map(|idx| (idx / n, idx % n))
            .ok_or(CipherError::NotFound(ch))
    }

    pub fn rows(&self) -> impl Iterator<Item = &[char]> {
        self.cells.chunks(self.dimension())
    }

    /// All cells in row-major order
    pub fn as_str(&self) -> String {
        self.cells.iter().collect()
    }
}

impl fmt::Display for KeySquare {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, row) in self.rows().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            let line: Vec<String> = row.iter().map(|c| c.to_string()).collect();
            write!(f, "{}", line.join(" "))?;
        }
        Ok(())
    }
}
