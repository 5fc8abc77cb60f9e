//! Data models for Redraft
//!
//! Defines the structures shared across the diff, anchoring, and
//! verification layers: citations, schema check results, and the
//! publish-impact records appended to the activity log.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A citation source that can be anchored into a document body
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Citation {
    /// Unique identifier
    pub id: Uuid,
    /// Source title, used as the anchor label when no anchor text is set
    pub title: String,
    /// Target URL
    pub url: String,
    /// Preferred anchor text, overriding the title when non-empty
    #[serde(default)]
    pub anchor_text: Option<String>,
    /// Whether an anchor for this citation has been inserted
    #[serde(default)]
    pub used: bool,
    /// Whether inserted anchors should carry a nofollow hint
    #[serde(default)]
    pub no_follow: bool,
    /// When this citation was created
    pub created_at: DateTime<Utc>,
}

impl Citation {
    /// Create a new unused citation
    pub fn new(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            url: url.into(),
            anchor_text: None,
            used: false,
            no_follow: false,
            created_at: Utc::now(),
        }
    }

    /// Set the preferred anchor text
    pub fn with_anchor_text(mut self, text: impl Into<String>) -> Self {
        self.anchor_text = Some(text.into());
        self
    }

    /// Mark inserted anchors as nofollow
    pub fn with_no_follow(mut self) -> Self {
        self.no_follow = true;
        self
    }

    /// The label searched for during anchor insertion.
    ///
    /// The anchor text wins when it is non-empty; otherwise the title is
    /// used. The result is trimmed, so a whitespace-only anchor text
    /// yields an empty label (and the citation is skipped), it does not
    /// fall back to the title.
    pub fn label(&self) -> &str {
        match self.anchor_text.as_deref() {
            Some(text) if !text.is_empty() => text.trim(),
            _ => self.title.trim(),
        }
    }
}

/// Which schema draft the verification pipeline trusted
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SchemaSource {
    /// A caller-approved draft stored for this document and target
    Inserted,
    /// Auto-generated from the published body
    Generated,
    /// No schema was checked
    None,
}

impl std::fmt::Display for SchemaSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SchemaSource::Inserted => write!(f, "inserted"),
            SchemaSource::Generated => write!(f, "generated"),
            SchemaSource::None => write!(f, "none"),
        }
    }
}

/// A single problem reported by the schema validator
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SchemaIssue {
    /// JSON path of the offending field, when the validator reports one
    #[serde(default)]
    pub path: Option<String>,
    /// Human-readable description
    pub message: String,
}

/// Outcome of validating one schema draft
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SchemaCheckResult {
    /// Whether the draft conforms
    pub valid: bool,
    /// Problems found; may be non-empty even when `valid` is true
    /// (warnings)
    #[serde(default)]
    pub issues: Vec<SchemaIssue>,
}

/// Identity under which publish-impact records are filed
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct ActivityKey {
    /// Owning user
    pub user: String,
    /// Project or document the publish belongs to
    pub project: String,
    /// Permalink of the published page, or the pre-publish URL
    pub target_url: String,
}

impl ActivityKey {
    pub fn new(
        user: impl Into<String>,
        project: impl Into<String>,
        target_url: impl Into<String>,
    ) -> Self {
        Self {
            user: user.into(),
            project: project.into(),
            target_url: target_url.into(),
        }
    }
}

/// Provenance entry for a single publish action.
///
/// Append-only: one record per publish, never edited after creation.
/// `None` fields mean the corresponding stage could not determine a
/// value, which is distinct from a negative result.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PublishImpactRecord {
    /// When verification completed
    pub timestamp: DateTime<Utc>,
    /// Which schema draft was checked
    pub schema_used: SchemaSource,
    /// Validation outcome; `None` when the check was skipped or failed
    pub schema_valid: Option<bool>,
    /// Number of issues the validator reported
    pub issue_count: usize,
    /// Quality score before publishing, when known
    pub score_before: Option<f64>,
    /// Quality score measured after publishing
    pub score_after: Option<f64>,
    /// Rounded score movement; present only when both scores are
    pub delta: Option<f64>,
    /// Permanent location returned by the publish action
    pub permalink: Option<String>,
}

impl PublishImpactRecord {
    /// One-line human-readable verdict.
    ///
    /// Composed only from fields that are present; an unknown stage
    /// degrades the phrase ("Schema: checked", "Visibility: checked")
    /// instead of failing.
    pub fn verdict(&self) -> String {
        let schema = match (self.schema_used, self.schema_valid) {
            (SchemaSource::None, _) => "Schema: skipped".to_string(),
            (_, Some(true)) => "Schema: valid".to_string(),
            (_, Some(false)) => format!("Schema: invalid ({} issue(s))", self.issue_count),
            (_, None) => "Schema: checked".to_string(),
        };

        let score = match (self.score_before, self.score_after, self.delta) {
            (Some(before), Some(after), Some(delta)) => {
                format!("Visibility: {:.0} → {:.0} ({:+.0})", before, after, delta)
            }
            (_, Some(after), _) => format!("Visibility: {:.0}", after),
            _ => "Visibility: checked".to_string(),
        };

        format!("{} · {}", schema, score)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_citation_new() {
        let citation = Citation::new("Wikipedia: Cats", "https://en.wikipedia.org/wiki/Cat");
        assert_eq!(citation.title, "Wikipedia: Cats");
        assert_eq!(citation.url, "https://en.wikipedia.org/wiki/Cat");
        assert!(!citation.used);
        assert!(!citation.no_follow);
        assert!(citation.anchor_text.is_none());
    }

    #[test]
    fn test_citation_label_prefers_anchor_text() {
        let citation = Citation::new("Wikipedia: Cats", "https://example.com").with_anchor_text("cat");
        assert_eq!(citation.label(), "cat");
    }

    #[test]
    fn test_citation_label_falls_back_to_title() {
        let citation = Citation::new("  Wikipedia: Cats  ", "https://example.com");
        assert_eq!(citation.label(), "Wikipedia: Cats");

        let citation = citation.with_anchor_text("");
        assert_eq!(citation.label(), "Wikipedia: Cats");
    }

    #[test]
    fn test_citation_label_whitespace_anchor_text_is_empty() {
        // A whitespace-only anchor text trims to "" and does not fall
        // back to the title.
        let citation = Citation::new("Wikipedia: Cats", "https://example.com").with_anchor_text("   ");
        assert_eq!(citation.label(), "");
    }

    #[test]
    fn test_citation_serialization() {
        let citation = Citation::new("Title", "https://example.com").with_no_follow();
        let json = serde_json::to_string(&citation).unwrap();
        let deserialized: Citation = serde_json::from_str(&json).unwrap();
        assert_eq!(citation, deserialized);
    }

    #[test]
    fn test_schema_source_serialization() {
        assert_eq!(
            serde_json::to_string(&SchemaSource::Inserted).unwrap(),
            "\"inserted\""
        );
        assert_eq!(
            serde_json::from_str::<SchemaSource>("\"generated\"").unwrap(),
            SchemaSource::Generated
        );
    }

    fn record() -> PublishImpactRecord {
        PublishImpactRecord {
            timestamp: Utc::now(),
            schema_used: SchemaSource::Generated,
            schema_valid: Some(true),
            issue_count: 0,
            score_before: Some(72.0),
            score_after: Some(78.0),
            delta: Some(6.0),
            permalink: Some("https://example.com/post".to_string()),
        }
    }

    #[test]
    fn test_verdict_full() {
        assert_eq!(record().verdict(), "Schema: valid · Visibility: 72 → 78 (+6)");
    }

    #[test]
    fn test_verdict_invalid_schema() {
        let mut r = record();
        r.schema_valid = Some(false);
        r.issue_count = 3;
        assert!(r.verdict().starts_with("Schema: invalid (3 issue(s))"));
    }

    #[test]
    fn test_verdict_degrades_on_unknowns() {
        let mut r = record();
        r.schema_valid = None;
        r.score_before = None;
        r.score_after = None;
        r.delta = None;
        assert_eq!(r.verdict(), "Schema: checked · Visibility: checked");
    }

    #[test]
    fn test_verdict_skipped_schema() {
        let mut r = record();
        r.schema_used = SchemaSource::None;
        r.schema_valid = None;
        assert!(r.verdict().starts_with("Schema: skipped"));
    }

    #[test]
    fn test_record_serialization() {
        let r = record();
        let json = serde_json::to_string(&r).unwrap();
        let deserialized: PublishImpactRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(r, deserialized);
    }
}
