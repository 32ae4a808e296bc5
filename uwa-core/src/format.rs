//! Display chunking for tokens.
//!
//! Chunking is cosmetic and deliberately not idempotent: formatting an already
//! formatted string inserts more delimiters. Only raw tokens should be passed
//! to [`ChunkFormatter::format`].

/// Default chunk width.
pub const DEFAULT_CHUNK_WIDTH: usize = 7;

/// Default chunk delimiter.
pub const DEFAULT_DELIMITER: char = '-';

/// Splits tokens into fixed-width, delimiter-joined groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkFormatter {
    width: usize,
    delimiter: char,
}

impl ChunkFormatter {
    /// Create a formatter. A width of 0 is treated as 1.
    pub fn new(width: usize, delimiter: char) -> Self {
        Self {
            width: width.max(1),
            delimiter,
        }
    }

    /// Chunk width.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Delimiter between chunks.
    pub fn delimiter(&self) -> char {
        self.delimiter
    }

    /// Format a raw token. The last group may be shorter than the width.
    pub fn format(&self, token: &str) -> String {
        let mut out = String::with_capacity(token.len() + token.len() / self.width);
        for (i, c) in token.chars().enumerate() {
            if i > 0 && i % self.width == 0 {
                out.push(self.delimiter);
            }
            out.push(c);
        }
        out
    }

    /// Remove delimiters from a formatted token.
    pub fn unformat(&self, display: &str) -> String {
        display.chars().filter(|c| *c != self.delimiter).collect()
    }
}

impl Default for ChunkFormatter {
    fn default() -> Self {
        Self::new(DEFAULT_CHUNK_WIDTH, DEFAULT_DELIMITER)
    }
}

/// Format a token with the default width and delimiter.
pub fn format_token(token: &str) -> String {
    ChunkFormatter::default().format(token)
}
