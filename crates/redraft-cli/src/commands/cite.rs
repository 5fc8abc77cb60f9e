//! Cite command handler
//!
//! Reads a document body and a citation list, inserts anchors for the
//! citations that have not been used yet, and writes both back. The
//! unused-only filter lives here because `insert_anchors` documents it
//! as a caller precondition.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use redraft_core::{append_references, insert_anchors, Citation};

use crate::output::Output;

pub fn run(
    content_path: &Path,
    citations_path: &Path,
    references: bool,
    out: Option<&Path>,
    output: &Output,
) -> Result<()> {
    let content = fs::read_to_string(content_path)
        .with_context(|| format!("Failed to read content: {}", content_path.display()))?;
    let citations_raw = fs::read_to_string(citations_path)
        .with_context(|| format!("Failed to read citations: {}", citations_path.display()))?;
    let citations: Vec<Citation> = serde_json::from_str(&citations_raw)
        .with_context(|| format!("Failed to parse citations: {}", citations_path.display()))?;

    // insert_anchors does not re-check `used`; filter to unused here so
    // repeated runs never double-insert.
    let unused: Vec<Citation> = citations.iter().filter(|c| !c.used).cloned().collect();
    let outcome = insert_anchors(&content, &unused);
    let inserted = outcome.inserted_count();

    // Merge the flipped flags back into the full list, preserving order.
    let merged: Vec<Citation> = citations
        .into_iter()
        .map(|original| {
            outcome
                .citations
                .iter()
                .find(|updated| updated.id == original.id)
                .cloned()
                .unwrap_or(original)
        })
        .collect();

    let mut body = outcome.content;
    if references {
        body = append_references(&body, &merged);
    }

    match out {
        Some(path) => {
            fs::write(path, &body)
                .with_context(|| format!("Failed to write content: {}", path.display()))?;
        }
        None => {
            if output.is_json() {
                println!(
                    "{}",
                    serde_json::json!({ "content": &body, "citations": &merged })
                );
            } else {
                println!("{}", body);
            }
        }
    }

    let updated_json =
        serde_json::to_string_pretty(&merged).context("Failed to serialize citations")?;
    fs::write(citations_path, updated_json)
        .with_context(|| format!("Failed to update citations: {}", citations_path.display()))?;

    output.success(&format!(
        "{} anchor(s) inserted, {} citation(s) unmatched",
        inserted,
        merged.iter().filter(|c| !c.used).count()
    ));

    Ok(())
}
