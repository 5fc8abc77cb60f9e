//! Token-level diff of a single line pair
//!
//! Tokenizes both lines into alternating runs of whitespace and
//! non-whitespace, then aligns the token sequences with a longest common
//! subsequence table. Whitespace runs are tokens in their own right, so
//! concatenating either side's token values reproduces that line exactly.
//!
//! This runs on individual changed line pairs only; the LCS table is
//! quadratic in token count, so callers must not feed it whole documents.

use serde::{Deserialize, Serialize};

/// Classification of a token within its side of the diff
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    /// Present on both sides, part of the common subsequence
    Equal,
    /// Present only in the base line (left side)
    Removed,
    /// Present only in the revision line (right side)
    Added,
}

/// One token of a diffed line
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Token {
    pub value: String,
    pub kind: TokenKind,
}

impl Token {
    fn equal(value: &str) -> Self {
        Self {
            value: value.to_string(),
            kind: TokenKind::Equal,
        }
    }

    fn removed(value: &str) -> Self {
        Self {
            value: value.to_string(),
            kind: TokenKind::Removed,
        }
    }

    fn added(value: &str) -> Self {
        Self {
            value: value.to_string(),
            kind: TokenKind::Added,
        }
    }
}

/// Token-level alignment of one line pair
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WordDiff {
    /// Base-side tokens: `Equal` or `Removed`
    pub left: Vec<Token>,
    /// Revision-side tokens: `Equal` or `Added`
    pub right: Vec<Token>,
}

/// Split a line into alternating runs of whitespace and non-whitespace.
///
/// Lossless: concatenating the returned slices reproduces the input.
fn tokenize(line: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut rest = line;
    while let Some(first) = rest.chars().next() {
        let in_whitespace = first.is_whitespace();
        let end = rest
            .find(|c: char| c.is_whitespace() != in_whitespace)
            .unwrap_or(rest.len());
        tokens.push(&rest[..end]);
        rest = &rest[end..];
    }
    tokens
}

/// Align two lines token by token.
///
/// Builds the suffix-indexed LCS table (`dp[i][j]` = LCS length of
/// `a[i..]` and `b[j..]`), then walks forward from `(0, 0)`: equal
/// tokens are emitted to both sides, otherwise the side with the larger
/// lookahead is consumed. Ties (`dp[i+1][j] >= dp[i][j+1]`) consume from
/// the base side as `Removed`; this tie-break is fixed so output is
/// deterministic on tied inputs.
pub fn diff_words(base_line: &str, revision_line: &str) -> WordDiff {
    let a = tokenize(base_line);
    let b = tokenize(revision_line);
    let n = a.len();
    let m = b.len();

    let mut dp = vec![vec![0usize; m + 1]; n + 1];
    for i in (0..n).rev() {
        for j in (0..m).rev() {
            dp[i][j] = if a[i] == b[j] {
                dp[i + 1][j + 1] + 1
            } else {
                dp[i + 1][j].max(dp[i][j + 1])
            };
        }
    }

    let mut left = Vec::with_capacity(n);
    let mut right = Vec::with_capacity(m);
    let mut i = 0;
    let mut j = 0;

    while i < n && j < m {
        if a[i] == b[j] {
            left.push(Token::equal(a[i]));
            right.push(Token::equal(b[j]));
            i += 1;
            j += 1;
        } else if dp[i + 1][j] >= dp[i][j + 1] {
            left.push(Token::removed(a[i]));
            i += 1;
        } else {
            right.push(Token::added(b[j]));
            j += 1;
        }
    }

    // One side exhausted: flush the remainder of the other.
    while i < n {
        left.push(Token::removed(a[i]));
        i += 1;
    }
    while j < m {
        right.push(Token::added(b[j]));
        j += 1;
    }

    WordDiff { left, right }
}
