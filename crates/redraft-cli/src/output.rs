//! Output formatting for CLI
//!
//! Provides consistent output formatting across all commands:
//! - Human-readable default output
//! - JSON output (--json flag)
//! - Quiet mode for scripting (--quiet flag)

use redraft_core::{CellContent, PublishImpactRecord, RenderableDiff, TokenKind};

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output (default)
    Human,
    /// JSON output
    Json,
    /// Quiet mode - minimal output
    Quiet,
}

impl OutputFormat {
    /// Create format from CLI flags
    pub fn from_flags(json: bool, quiet: bool) -> Self {
        if quiet {
            OutputFormat::Quiet
        } else if json {
            OutputFormat::Json
        } else {
            OutputFormat::Human
        }
    }
}

/// Output helper for consistent formatting
pub struct Output {
    /// The output format
    pub format: OutputFormat,
}

/// Column width of each diff side in human output
const DIFF_COLUMN_WIDTH: usize = 46;

impl Output {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Check if output is in quiet mode
    pub fn is_quiet(&self) -> bool {
        matches!(self.format, OutputFormat::Quiet)
    }

    /// Check if output is JSON
    pub fn is_json(&self) -> bool {
        matches!(self.format, OutputFormat::Json)
    }

    /// Print a side-by-side diff
    pub fn print_diff(&self, diff: &RenderableDiff) {
        match self.format {
            OutputFormat::Human => {
                for i in 0..diff.len() {
                    let marker = if diff.left[i].changed { '~' } else { ' ' };
                    let left = render_cell(&diff.left[i].content);
                    let right = render_cell(&diff.right[i].content);
                    println!(
                        "{} {:>4} | {:<width$} | {}",
                        marker,
                        i + 1,
                        truncate(&left, DIFF_COLUMN_WIDTH),
                        truncate(&right, DIFF_COLUMN_WIDTH),
                        width = DIFF_COLUMN_WIDTH
                    );
                }
                println!(
                    "\n{} line(s), {} changed",
                    diff.len(),
                    diff.changed_count()
                );
            }
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(diff).unwrap());
            }
            OutputFormat::Quiet => {
                println!("{}", diff.changed_count());
            }
        }
    }

    /// Print a single publish-impact record
    pub fn print_record(&self, record: &PublishImpactRecord) {
        match self.format {
            OutputFormat::Human => {
                println!("Verified:  {}", record.timestamp.format("%Y-%m-%d %H:%M"));
                if let Some(ref permalink) = record.permalink {
                    println!("Permalink: {}", permalink);
                }
                println!("{}", record.verdict());
            }
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(record).unwrap());
            }
            OutputFormat::Quiet => {
                println!("{}", record.verdict());
            }
        }
    }

    /// Print a list of publish-impact records
    pub fn print_records(&self, records: &[PublishImpactRecord]) {
        match self.format {
            OutputFormat::Human => {
                if records.is_empty() {
                    println!("No publish activity found.");
                    return;
                }
                for record in records {
                    println!(
                        "{} | {}",
                        record.timestamp.format("%Y-%m-%d %H:%M"),
                        record.verdict()
                    );
                }
                println!("\n{} record(s)", records.len());
            }
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(records).unwrap());
            }
            OutputFormat::Quiet => {
                for record in records {
                    println!("{}", record.timestamp.to_rfc3339());
                }
            }
        }
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        match self.format {
            OutputFormat::Human => println!("✓ {}", message),
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::json!({"status": "success", "message": message})
                );
            }
            OutputFormat::Quiet => {}
        }
    }

    /// Print an informational message
    pub fn message(&self, msg: &str) {
        match self.format {
            OutputFormat::Human => println!("{}", msg),
            OutputFormat::Json => {
                println!("{}", serde_json::json!({"message": msg}));
            }
            OutputFormat::Quiet => {}
        }
    }
}

/// Flatten a diff cell to text, marking word-level edits inline
fn render_cell(content: &CellContent) -> String {
    match content {
        CellContent::Line(text) => text.clone(),
        CellContent::Tokens(tokens) => tokens
            .iter()
            .map(|token| match token.kind {
                TokenKind::Equal => token.value.clone(),
                TokenKind::Removed => format!("[-{}-]", token.value),
                TokenKind::Added => format!("{{+{}+}}", token.value),
            })
            .collect(),
    }
}

/// Truncate a string to max length, adding "..." if truncated
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", cut)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use redraft_core::Token;

    #[test]
    fn test_format_from_flags() {
        assert_eq!(OutputFormat::from_flags(false, false), OutputFormat::Human);
        assert_eq!(OutputFormat::from_flags(true, false), OutputFormat::Json);
        assert_eq!(OutputFormat::from_flags(false, true), OutputFormat::Quiet);
        // Quiet takes precedence
        assert_eq!(OutputFormat::from_flags(true, true), OutputFormat::Quiet);
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("this is a long string", 10), "this is...");
    }

    #[test]
    fn test_render_cell_marks_edits() {
        let tokens = vec![
            Token {
                value: "It".to_string(),
                kind: TokenKind::Equal,
            },
            Token {
                value: " ".to_string(),
                kind: TokenKind::Equal,
            },
            Token {
                value: "red.".to_string(),
                kind: TokenKind::Removed,
            },
        ];
        assert_eq!(render_cell(&CellContent::Tokens(tokens)), "It [-red.-]");
    }
}
