//! HTTP collaborator implementations
//!
//! Wires the verification traits to JSON-over-HTTP endpoints. Each
//! collaborator POSTs a JSON request to its configured endpoint and
//! decodes a JSON response. Failures surface as errors to the pipeline,
//! which downgrades them to unknown fields; nothing here retries.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use super::{
    PublishReceipt, Publisher, SchemaGenerator, SchemaRequest, SchemaValidator, ScoreReport,
    Scorer,
};
use crate::models::{SchemaCheckResult, SchemaIssue};

/// Request timeout in seconds
const REQUEST_TIMEOUT: u64 = 30;

fn client() -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(REQUEST_TIMEOUT))
        .user_agent("redraft/0.4")
        .build()
        .context("Failed to build HTTP client")
}

/// Scorer backed by a JSON endpoint
pub struct HttpScorer {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpScorer {
    pub fn new(endpoint: impl Into<String>) -> Result<Self> {
        Ok(Self {
            client: client()?,
            endpoint: endpoint.into(),
        })
    }
}

#[derive(Deserialize)]
struct ScorePayload {
    #[serde(rename = "overallScore")]
    overall_score: f64,
}

#[async_trait]
impl Scorer for HttpScorer {
    async fn score(&self, url: &str, body: &str) -> Result<ScoreReport> {
        let payload: ScorePayload = self
            .client
            .post(&self.endpoint)
            .json(&json!({ "url": url, "content": body }))
            .send()
            .await
            .context("Score request failed")?
            .error_for_status()
            .context("Score endpoint returned an error status")?
            .json()
            .await
            .context("Score response was not valid JSON")?;

        Ok(ScoreReport {
            overall_score: payload.overall_score,
        })
    }
}

/// Schema generator backed by a JSON endpoint
pub struct HttpSchemaGenerator {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpSchemaGenerator {
    pub fn new(endpoint: impl Into<String>) -> Result<Self> {
        Ok(Self {
            client: client()?,
            endpoint: endpoint.into(),
        })
    }
}

#[async_trait]
impl SchemaGenerator for HttpSchemaGenerator {
    async fn generate(&self, request: &SchemaRequest) -> Result<serde_json::Value> {
        let schema = self
            .client
            .post(&self.endpoint)
            .json(&json!({
                "url": &request.url,
                "contentType": &request.content_type,
                "content": &request.body,
                "acceptedEntities": &request.accepted_entities,
                "siteName": &request.site_name,
            }))
            .send()
            .await
            .context("Schema generation request failed")?
            .error_for_status()
            .context("Schema generator returned an error status")?
            .json()
            .await
            .context("Schema generator response was not valid JSON")?;

        Ok(schema)
    }
}

/// Schema validator backed by a JSON endpoint
pub struct HttpSchemaValidator {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpSchemaValidator {
    pub fn new(endpoint: impl Into<String>) -> Result<Self> {
        Ok(Self {
            client: client()?,
            endpoint: endpoint.into(),
        })
    }
}

#[derive(Deserialize)]
struct ValidatePayload {
    valid: bool,
    #[serde(default)]
    issues: Vec<IssuePayload>,
}

#[derive(Deserialize)]
struct IssuePayload {
    #[serde(default)]
    path: Option<String>,
    message: String,
}

#[async_trait]
impl SchemaValidator for HttpSchemaValidator {
    async fn validate(&self, schema_json: &str) -> Result<SchemaCheckResult> {
        let payload: ValidatePayload = self
            .client
            .post(&self.endpoint)
            .json(&json!({ "schema": schema_json }))
            .send()
            .await
            .context("Schema validation request failed")?
            .error_for_status()
            .context("Schema validator returned an error status")?
            .json()
            .await
            .context("Schema validator response was not valid JSON")?;

        Ok(SchemaCheckResult {
            valid: payload.valid,
            issues: payload
                .issues
                .into_iter()
                .map(|issue| SchemaIssue {
                    path: issue.path,
                    message: issue.message,
                })
                .collect(),
        })
    }
}

/// Publisher backed by a JSON endpoint
pub struct HttpPublisher {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpPublisher {
    pub fn new(endpoint: impl Into<String>) -> Result<Self> {
        Ok(Self {
            client: client()?,
            endpoint: endpoint.into(),
        })
    }
}

#[derive(Deserialize)]
struct PublishPayload {
    #[serde(default)]
    permalink: Option<String>,
    id: serde_json::Value,
}

#[async_trait]
impl Publisher for HttpPublisher {
    async fn publish(&self, title: &str, body: &str) -> Result<PublishReceipt> {
        let payload: PublishPayload = self
            .client
            .post(&self.endpoint)
            .json(&json!({ "title": title, "content": body }))
            .send()
            .await
            .context("Publish request failed")?
            .error_for_status()
            .context("Publishing target returned an error status")?
            .json()
            .await
            .context("Publishing target response was not valid JSON")?;

        // Targets report numeric or string ids; normalize to a string.
        let id = match payload.id {
            serde_json::Value::String(s) => s,
            other => other.to_string(),
        };

        Ok(PublishReceipt {
            permalink: payload.permalink,
            id,
        })
    }
}
