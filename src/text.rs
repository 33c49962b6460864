//! Text to word rows
//!
//! Each non-empty line becomes a row, each whitespace-separated word a token.
//! Punctuation stays attached to its word.

use serde::{Deserialize, Serialize};

/// One word as the host should render it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordToken {
    pub text: String,
    /// Odd-indexed words in a line get the alternate style
    pub alternate: bool,
}

/// Parsed rows, top to bottom, each left to right
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordRows {
    pub rows: Vec<Vec<WordToken>>,
}

impl WordRows {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Total number of tokens across all rows
    pub fn token_count(&self) -> usize {
        self.rows.iter().map(Vec::len).sum()
    }
}

/// Split text into uppercase word rows
pub fn parse_rows(text: &str) -> WordRows {
    let upper = text.to_uppercase();
    let rows = upper
        .split('\n')
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| {
            line.split_whitespace()
                .enumerate()
                .map(|(i, word)| WordToken {
                    text: word.to_string(),
                    alternate: i % 2 == 1,
                })
                .collect()
        })
        .collect();
    WordRows { rows }
}
