//! Impact command handler

use std::sync::Arc;

use anyhow::{Context, Result};

use redraft_core::{ActivityKey, ActivityRecorder, Config, SqliteActivityStore};

use crate::output::Output;

/// Report recent publish-impact records for one publish identity
pub async fn run(
    user: &str,
    project: &str,
    url: &str,
    limit: usize,
    output: &Output,
) -> Result<()> {
    let config = Config::load().context("Failed to load configuration")?;
    let store = SqliteActivityStore::open(&config.activity_db_path())
        .context("Failed to open activity log")?;
    let recorder = ActivityRecorder::new(Arc::new(store));

    let key = ActivityKey::new(user, project, url);
    let records = recorder
        .recent(&key, limit)
        .await
        .context("Failed to read activity log")?;

    output.print_records(&records);
    Ok(())
}
