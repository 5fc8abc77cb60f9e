//! Diff command handler

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use redraft_core::{present, Granularity};

use crate::output::Output;

/// Compare two document versions and print the side-by-side view
pub fn run(base: &Path, revision: &Path, words: bool, output: &Output) -> Result<()> {
    let base_text = fs::read_to_string(base)
        .with_context(|| format!("Failed to read base document: {}", base.display()))?;
    let revision_text = fs::read_to_string(revision)
        .with_context(|| format!("Failed to read revised document: {}", revision.display()))?;

    let granularity = if words {
        Granularity::Word
    } else {
        Granularity::Line
    };

    let diff = present(&base_text, &revision_text, granularity);
    output.print_diff(&diff);

    Ok(())
}
