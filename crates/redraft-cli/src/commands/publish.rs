//! Publish command handler
//!
//! Pushes a document to the configured publishing target, then runs the
//! post-publish verification pipeline. The publish itself fails loudly;
//! verification is best-effort and always produces a record.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};

use redraft_core::verify::http::{
    HttpPublisher, HttpSchemaGenerator, HttpSchemaValidator, HttpScorer,
};
use redraft_core::{
    ActivityKey, ActivityRecorder, Config, PublishVerifier, Publisher, SchemaSource,
    SqliteActivityStore, VerifyRequest,
};

use crate::output::Output;

#[allow(clippy::too_many_arguments)]
pub async fn run(
    title: &str,
    body_path: &Path,
    user: &str,
    project: &str,
    url: &str,
    score_before: Option<f64>,
    schema_path: Option<&Path>,
    output: &Output,
) -> Result<()> {
    let config = Config::load().context("Failed to load configuration")?;
    let body = fs::read_to_string(body_path)
        .with_context(|| format!("Failed to read body: {}", body_path.display()))?;

    let publisher_endpoint = config.publisher_url.clone().context(
        "publisher_url is not configured. Set it with: redraft config set publisher_url <url>",
    )?;
    let publisher = HttpPublisher::new(publisher_endpoint)?;

    // Publishing happens first and is allowed to fail loudly.
    let receipt = publisher
        .publish(title, &body)
        .await
        .context("Publishing failed")?;
    output.message(&format!("Published as entry {}", receipt.id));

    let inserted_schema = match schema_path {
        Some(path) => Some(
            fs::read_to_string(path)
                .with_context(|| format!("Failed to read schema draft: {}", path.display()))?,
        ),
        None => None,
    };
    let schema_source = if inserted_schema.is_some() {
        SchemaSource::Inserted
    } else if config.auto_schema {
        SchemaSource::Generated
    } else {
        SchemaSource::None
    };

    let store = SqliteActivityStore::open(&config.activity_db_path())
        .context("Failed to open activity log")?;
    let mut verifier = PublishVerifier::new(ActivityRecorder::new(Arc::new(store)));
    if let Some(endpoint) = config.scorer_url.as_deref() {
        verifier = verifier.with_scorer(Arc::new(HttpScorer::new(endpoint)?));
    }
    if let Some(endpoint) = config.schema_generator_url.as_deref() {
        verifier = verifier.with_generator(Arc::new(HttpSchemaGenerator::new(endpoint)?));
    }
    if let Some(endpoint) = config.schema_validator_url.as_deref() {
        verifier = verifier.with_validator(Arc::new(HttpSchemaValidator::new(endpoint)?));
    }

    let target_url = receipt.permalink.clone().unwrap_or_else(|| url.to_string());
    let request = VerifyRequest {
        key: ActivityKey::new(user, project, target_url),
        body,
        content_type: "article".to_string(),
        schema_source,
        inserted_schema,
        score_before,
        permalink: receipt.permalink,
        fallback_url: url.to_string(),
        accepted_entities: config.accepted_entities.clone(),
        site_name: config.site_name.clone(),
    };

    let record = verifier.verify_after_publish(&request).await;
    output.print_record(&record);

    Ok(())
}
