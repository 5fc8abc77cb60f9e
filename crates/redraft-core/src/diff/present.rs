//! Diff presenter
//!
//! Composes the line and word layers into a structure a renderer can
//! display side by side. Word-level detail is computed for changed line
//! pairs only; unchanged lines stay whole-line records.

use serde::{Deserialize, Serialize};

use super::line::{diff_lines, LineRecord};
use super::word::{diff_words, Token};

/// Requested level of diff detail
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    /// Whole-line records only
    Line,
    /// Changed lines broken into equal/removed/added tokens
    Word,
}

/// Content of one cell of the side-by-side view
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase", tag = "kind", content = "content")]
pub enum CellContent {
    /// A whole line
    Line(String),
    /// A changed line broken into tokens
    Tokens(Vec<Token>),
}

impl CellContent {
    /// The cell's text with token markup flattened away
    pub fn plain_text(&self) -> String {
        match self {
            CellContent::Line(text) => text.clone(),
            CellContent::Tokens(tokens) => tokens.iter().map(|t| t.value.as_str()).collect(),
        }
    }
}

/// One cell of the side-by-side view
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DiffCell {
    /// Whether this line pair differs
    pub changed: bool,
    pub content: CellContent,
}

/// A renderable side-by-side comparison
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RenderableDiff {
    pub granularity: Granularity,
    pub left: Vec<DiffCell>,
    pub right: Vec<DiffCell>,
}

impl RenderableDiff {
    /// Number of line pairs
    pub fn len(&self) -> usize {
        self.left.len()
    }

    pub fn is_empty(&self) -> bool {
        self.left.is_empty()
    }

    /// Number of changed pairs
    pub fn changed_count(&self) -> usize {
        self.left.iter().filter(|cell| cell.changed).count()
    }
}

/// Build the side-by-side comparison at the requested granularity.
///
/// At word granularity every changed pair is re-diffed token by token;
/// unchanged pairs are never handed to the word differ (it is quadratic
/// per line and has nothing to say about identical lines).
pub fn present(base: &str, revision: &str, granularity: Granularity) -> RenderableDiff {
    let lines = diff_lines(base, revision);
    let mut left = Vec::with_capacity(lines.len());
    let mut right = Vec::with_capacity(lines.len());

    for (a, b) in lines.left.into_iter().zip(lines.right.into_iter()) {
        if granularity == Granularity::Word && a.changed {
            let words = diff_words(&a.text, &b.text);
            left.push(token_cell(words.left));
            right.push(token_cell(words.right));
        } else {
            left.push(line_cell(a));
            right.push(line_cell(b));
        }
    }

    RenderableDiff {
        granularity,
        left,
        right,
    }
}

fn line_cell(record: LineRecord) -> DiffCell {
    DiffCell {
        changed: record.changed,
        content: CellContent::Line(record.text),
    }
}

fn token_cell(tokens: Vec<Token>) -> DiffCell {
    DiffCell {
        changed: true,
        content: CellContent::Tokens(tokens),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::word::TokenKind;

    const BASE: &str = "The cat sat.\nIt was red.";
    const REVISION: &str = "The cat sat.\nIt was blue.";

    #[test]
    fn test_line_granularity_is_whole_lines() {
        let diff = present(BASE, REVISION, Granularity::Line);
        assert_eq!(diff.len(), 2);
        assert!(!diff.left[0].changed);
        assert!(diff.left[1].changed);
        assert!(matches!(diff.left[1].content, CellContent::Line(_)));
    }

    #[test]
    fn test_word_granularity_tokenizes_changed_lines_only() {
        let diff = present(BASE, REVISION, Granularity::Word);
        assert!(matches!(diff.left[0].content, CellContent::Line(_)));
        assert!(matches!(diff.left[1].content, CellContent::Tokens(_)));
        assert!(matches!(diff.right[1].content, CellContent::Tokens(_)));
    }

    #[test]
    fn test_end_to_end_example() {
        let diff = present(BASE, REVISION, Granularity::Word);

        let CellContent::Tokens(ref left_tokens) = diff.left[1].content else {
            panic!("expected tokens on the changed left cell");
        };
        let CellContent::Tokens(ref right_tokens) = diff.right[1].content else {
            panic!("expected tokens on the changed right cell");
        };

        let removed: Vec<_> = left_tokens
            .iter()
            .filter(|t| t.kind == TokenKind::Removed)
            .map(|t| t.value.as_str())
            .collect();
        let added: Vec<_> = right_tokens
            .iter()
            .filter(|t| t.kind == TokenKind::Added)
            .map(|t| t.value.as_str())
            .collect();
        let equal: Vec<_> = left_tokens
            .iter()
            .filter(|t| t.kind == TokenKind::Equal && !t.value.trim().is_empty())
            .map(|t| t.value.as_str())
            .collect();

        assert_eq!(removed, vec!["red."]);
        assert_eq!(added, vec!["blue."]);
        assert_eq!(equal, vec!["It", "was"]);
    }

    #[test]
    fn test_plain_text_round_trip() {
        let diff = present(BASE, REVISION, Granularity::Word);
        let left: Vec<String> = diff.left.iter().map(|c| c.content.plain_text()).collect();
        let right: Vec<String> = diff.right.iter().map(|c| c.content.plain_text()).collect();
        assert_eq!(left.join("\n"), BASE);
        assert_eq!(right.join("\n"), REVISION);
    }

    #[test]
    fn test_empty_inputs() {
        let diff = present("", "", Granularity::Word);
        assert!(diff.is_empty());
        assert_eq!(diff.changed_count(), 0);
    }

    #[test]
    fn test_every_changed_line_gets_tokens() {
        let diff = present("a\nb\nc", "x\nb\nz", Granularity::Word);
        let token_cells = diff
            .left
            .iter()
            .filter(|c| matches!(c.content, CellContent::Tokens(_)))
            .count();
        assert_eq!(token_cells, diff.changed_count());
        assert_eq!(token_cells, 2);
    }
}
