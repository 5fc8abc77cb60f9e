//! Citation anchoring
//!
//! Rewrites a document body so that each citation's label becomes a
//! hyperlink, inserted exactly once at its first whole-word occurrence,
//! and can append a references block listing the sources.
//!
//! # Insert-once precondition
//!
//! [`insert_anchors`] does not consult [`Citation::used`]: callers must
//! filter their citation list to unused citations before calling, or a
//! repeated call will insert a second anchor at the next occurrence of
//! the label. The flag exists so callers can do exactly that filtering
//! across invocations; this module only sets it.

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::models::Citation;

/// Maximum number of entries in an appended references block
pub const REFERENCES_LIMIT: usize = 20;

/// Result of one anchor-insertion pass
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnchorOutcome {
    /// The rewritten body
    pub content: String,
    /// The input citations with `used` flipped where an anchor landed
    pub citations: Vec<Citation>,
}

impl AnchorOutcome {
    /// Number of citations that received an anchor in this pass
    pub fn inserted_count(&self) -> usize {
        self.citations.iter().filter(|c| c.used).count()
    }
}

/// Insert an anchor for each citation at the first whole-word occurrence
/// of its label.
///
/// Citations are processed in input order against the progressively
/// updated content, so a later citation's search sees earlier
/// insertions. A citation is skipped (left unused, content untouched)
/// when its label or URL is empty, or when the label never occurs.
/// Matching is case-insensitive and bounded by non-alphanumeric
/// characters or the string edges; the matched text keeps its original
/// casing inside the anchor.
///
/// The caller's slice is not mutated; the outcome carries fresh content
/// and a fresh citation vector.
pub fn insert_anchors(content: &str, citations: &[Citation]) -> AnchorOutcome {
    let mut body = content.to_string();
    let mut updated = citations.to_vec();

    for citation in &mut updated {
        let label = citation.label().to_string();
        if label.is_empty() || citation.url.trim().is_empty() {
            debug!(citation = %citation.id, "skipping citation with empty label or url");
            continue;
        }

        match find_whole_word(&body, &label) {
            Some((start, end)) => {
                let anchor = anchor_markup(&citation.url, &body[start..end], citation.no_follow);
                body.replace_range(start..end, &anchor);
                citation.used = true;
            }
            None => {
                debug!(citation = %citation.id, label = %label, "label not found in content");
            }
        }
    }

    AnchorOutcome {
        content: body,
        citations: updated,
    }
}

/// Append an ordered references block after the content.
///
/// Lists up to [`REFERENCES_LIMIT`] citations regardless of their `used`
/// state and performs no in-text anchoring. Citations without a usable
/// label fall back to their URL as the link text.
pub fn append_references(content: &str, citations: &[Citation]) -> String {
    if citations.is_empty() {
        return content.to_string();
    }

    let mut out = String::from(content);
    if !out.is_empty() {
        out.push_str("\n\n");
    }
    out.push_str("<h2>References</h2>\n<ol>\n");
    for citation in citations.iter().take(REFERENCES_LIMIT) {
        let label = match citation.label() {
            "" => citation.url.as_str(),
            label => label,
        };
        out.push_str("  <li>");
        out.push_str(&anchor_markup(&citation.url, label, citation.no_follow));
        out.push_str("</li>\n");
    }
    out.push_str("</ol>\n");
    out
}

/// Locate the first whole-word, case-insensitive occurrence of `label`.
///
/// Returns the byte range of the label itself, excluding the boundary
/// characters. The label is matched literally (regex-escaped).
fn find_whole_word(content: &str, label: &str) -> Option<(usize, usize)> {
    let pattern = format!(
        "(?i)(?:^|[^0-9A-Za-z])({})(?:[^0-9A-Za-z]|$)",
        regex::escape(label)
    );
    let re = match Regex::new(&pattern) {
        Ok(re) => re,
        Err(e) => {
            // Escaped literals should always compile; treat a failure as
            // a no-match rather than a hard error.
            warn!(label = %label, "anchor pattern failed to compile: {e}");
            return None;
        }
    };
    re.captures(content)
        .and_then(|caps| caps.get(1))
        .map(|m| (m.start(), m.end()))
}

/// Render the anchor element for a citation target
fn anchor_markup(url: &str, text: &str, no_follow: bool) -> String {
    let rel = if no_follow {
        "noopener noreferrer nofollow"
    } else {
        "noopener noreferrer"
    };
    format!(
        "<a href=\"{}\" target=\"_blank\" rel=\"{}\">{}</a>",
        url, rel, text
    )
}
