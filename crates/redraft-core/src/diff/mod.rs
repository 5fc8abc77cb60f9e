//! Revision diff engine
//!
//! Three layers, leaves first:
//!
//! - `line`: position-aligned changed/unchanged classification of lines
//! - `word`: token-level LCS alignment of a single changed line pair
//! - `present`: composes both into a renderable side-by-side structure
//!
//! All three are pure functions over in-memory strings; they take no
//! ownership beyond their arguments and return fresh structures, so they
//! are safe to call repeatedly and concurrently.

mod line;
mod present;
mod word;

pub use line::{diff_lines, LineDiff, LineRecord};
pub use present::{present, CellContent, DiffCell, Granularity, RenderableDiff};
pub use word::{diff_words, Token, TokenKind, WordDiff};
