//! Post-publish verification pipeline
//!
//! After a document has been pushed to its publishing target, this
//! module runs a best-effort verification pass: structured-data
//! validation and a content-quality re-score. The two stages are
//! independent and run concurrently; the pipeline joins both before
//! summarizing, and no failure from any stage ever reaches the caller.
//! A stage that fails simply contributes "unknown" fields to the
//! resulting [`PublishImpactRecord`].
//!
//! The external services are modeled as traits so production can wire
//! HTTP collaborators (see [`http`]) while tests use mocks.

pub mod http;

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use tracing::{debug, info, warn};

use crate::activity::ActivityRecorder;
use crate::models::{ActivityKey, PublishImpactRecord, SchemaCheckResult, SchemaSource};

/// Outcome of the content-quality scoring service
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreReport {
    pub overall_score: f64,
}

/// Outcome of a publish action
#[derive(Debug, Clone, PartialEq)]
pub struct PublishReceipt {
    /// Permanent location of the published page, when the target
    /// reports one
    pub permalink: Option<String>,
    /// Target-side identifier of the created entry
    pub id: String,
}

/// Input to schema generation
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaRequest {
    /// Resolved URL of the published page
    pub url: String,
    /// Content type hint (e.g. "article")
    pub content_type: String,
    /// Document body
    pub body: String,
    /// Entity types the caller accepts in generated schema
    pub accepted_entities: Vec<String>,
    /// Site name, when configured
    pub site_name: Option<String>,
}

/// Content-quality scoring service
#[async_trait]
pub trait Scorer: Send + Sync {
    async fn score(&self, url: &str, body: &str) -> Result<ScoreReport>;
}

/// Structured-data generator
#[async_trait]
pub trait SchemaGenerator: Send + Sync {
    async fn generate(&self, request: &SchemaRequest) -> Result<serde_json::Value>;
}

/// Structured-data validator
#[async_trait]
pub trait SchemaValidator: Send + Sync {
    async fn validate(&self, schema_json: &str) -> Result<SchemaCheckResult>;
}

/// Publishing target accepting a title/body pair.
///
/// Publishing itself happens before verification and is allowed to fail
/// loudly; it is the caller's concern, not this pipeline's.
#[async_trait]
pub trait Publisher: Send + Sync {
    async fn publish(&self, title: &str, body: &str) -> Result<PublishReceipt>;
}

/// Parameters of one verification run
#[derive(Debug, Clone)]
pub struct VerifyRequest {
    /// Identity under which the impact record is filed
    pub key: ActivityKey,
    /// Published document body
    pub body: String,
    /// Content type hint passed to schema generation
    pub content_type: String,
    /// Which schema draft to trust
    pub schema_source: SchemaSource,
    /// The caller-approved draft, when `schema_source` is `Inserted`
    pub inserted_schema: Option<String>,
    /// Quality score before publishing, when known
    pub score_before: Option<f64>,
    /// Permanent location returned by the publish action
    pub permalink: Option<String>,
    /// Pre-publish URL used when no permalink exists
    pub fallback_url: String,
    /// Entity types accepted in generated schema
    pub accepted_entities: Vec<String>,
    /// Site name, when configured
    pub site_name: Option<String>,
}

impl VerifyRequest {
    /// The URL verification runs against: the permalink when the
    /// publish action returned one, otherwise the pre-publish URL
    pub fn resolved_url(&self) -> &str {
        self.permalink.as_deref().unwrap_or(&self.fallback_url)
    }
}

/// What the schema stage learned
struct SchemaOutcome {
    source: SchemaSource,
    valid: Option<bool>,
    issue_count: usize,
}

impl SchemaOutcome {
    fn unknown(source: SchemaSource) -> Self {
        Self {
            source,
            valid: None,
            issue_count: 0,
        }
    }
}

/// Orchestrates the post-publish verification stages.
///
/// Collaborators are optional: an unconfigured collaborator degrades its
/// stage to "unknown" exactly like a failing one, so a partially wired
/// verifier is still safe to run.
pub struct PublishVerifier {
    scorer: Option<Arc<dyn Scorer>>,
    generator: Option<Arc<dyn SchemaGenerator>>,
    validator: Option<Arc<dyn SchemaValidator>>,
    recorder: ActivityRecorder,
}

impl PublishVerifier {
    /// Create a verifier with no collaborators wired
    pub fn new(recorder: ActivityRecorder) -> Self {
        Self {
            scorer: None,
            generator: None,
            validator: None,
            recorder,
        }
    }

    /// Wire the content-quality scorer
    pub fn with_scorer(mut self, scorer: Arc<dyn Scorer>) -> Self {
        self.scorer = Some(scorer);
        self
    }

    /// Wire the schema generator
    pub fn with_generator(mut self, generator: Arc<dyn SchemaGenerator>) -> Self {
        self.generator = Some(generator);
        self
    }

    /// Wire the schema validator
    pub fn with_validator(mut self, validator: Arc<dyn SchemaValidator>) -> Self {
        self.validator = Some(validator);
        self
    }

    /// Run the full pipeline and return the impact record.
    ///
    /// Never returns an error and never panics on collaborator failure:
    /// each stage degrades to unknown fields instead. The schema and
    /// score stages run concurrently and are joined (not raced) before
    /// the record is composed; persistence failures are logged and
    /// swallowed by the recorder.
    pub async fn verify_after_publish(&self, request: &VerifyRequest) -> PublishImpactRecord {
        info!(url = request.resolved_url(), "starting post-publish verification");

        let (schema, score_after) =
            tokio::join!(self.schema_stage(request), self.score_stage(request));

        let delta = match (request.score_before, score_after) {
            (Some(before), Some(after)) => Some((after - before).round()),
            _ => None,
        };

        let record = PublishImpactRecord {
            timestamp: Utc::now(),
            schema_used: schema.source,
            schema_valid: schema.valid,
            issue_count: schema.issue_count,
            score_before: request.score_before,
            score_after,
            delta,
            permalink: request.permalink.clone(),
        };

        info!(verdict = %record.verdict(), "verification complete");
        self.recorder.append(&request.key, &record).await;
        record
    }

    /// Resolve and validate the schema draft for this publish
    async fn schema_stage(&self, request: &VerifyRequest) -> SchemaOutcome {
        let schema_json = match request.schema_source {
            SchemaSource::None => {
                debug!("no schema draft for this publish, skipping validation");
                return SchemaOutcome {
                    source: SchemaSource::None,
                    valid: None,
                    issue_count: 0,
                };
            }
            SchemaSource::Inserted => match &request.inserted_schema {
                Some(draft) => draft.clone(),
                None => {
                    warn!("inserted schema requested but no draft was provided");
                    return SchemaOutcome::unknown(SchemaSource::Inserted);
                }
            },
            SchemaSource::Generated => {
                let Some(generator) = &self.generator else {
                    debug!("no schema generator configured");
                    return SchemaOutcome::unknown(SchemaSource::Generated);
                };
                let gen_request = SchemaRequest {
                    url: request.resolved_url().to_string(),
                    content_type: request.content_type.clone(),
                    body: request.body.clone(),
                    accepted_entities: request.accepted_entities.clone(),
                    site_name: request.site_name.clone(),
                };
                match generator.generate(&gen_request).await {
                    Ok(value) => value.to_string(),
                    Err(e) => {
                        warn!("schema generation failed: {e:#}");
                        return SchemaOutcome::unknown(SchemaSource::Generated);
                    }
                }
            }
        };

        let Some(validator) = &self.validator else {
            debug!("no schema validator configured");
            return SchemaOutcome::unknown(request.schema_source);
        };

        match validator.validate(&schema_json).await {
            Ok(result) => SchemaOutcome {
                source: request.schema_source,
                valid: Some(result.valid),
                issue_count: result.issues.len(),
            },
            Err(e) => {
                // Validator failure means "unknown", which must stay
                // distinguishable from "invalid".
                warn!("schema validation failed: {e:#}");
                SchemaOutcome::unknown(request.schema_source)
            }
        }
    }

    /// Re-score the published page
    async fn score_stage(&self, request: &VerifyRequest) -> Option<f64> {
        let Some(scorer) = &self.scorer else {
            debug!("no scorer configured");
            return None;
        };
        match scorer.score(request.resolved_url(), &request.body).await {
            Ok(report) => Some(report.overall_score),
            Err(e) => {
                warn!("content scoring failed: {e:#}");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activity::{ActivityStore, MemoryActivityStore};
    use crate::models::SchemaIssue;

    struct FixedScorer(f64);

    #[async_trait]
    impl Scorer for FixedScorer {
        async fn score(&self, _url: &str, _body: &str) -> Result<ScoreReport> {
            Ok(ScoreReport {
                overall_score: self.0,
            })
        }
    }

    struct FailingScorer;

    #[async_trait]
    impl Scorer for FailingScorer {
        async fn score(&self, _url: &str, _body: &str) -> Result<ScoreReport> {
            anyhow::bail!("audit service unavailable")
        }
    }

    struct FixedGenerator;

    #[async_trait]
    impl SchemaGenerator for FixedGenerator {
        async fn generate(&self, request: &SchemaRequest) -> Result<serde_json::Value> {
            Ok(serde_json::json!({
                "@type": "Article",
                "url": &request.url,
            }))
        }
    }

    struct FailingGenerator;

    #[async_trait]
    impl SchemaGenerator for FailingGenerator {
        async fn generate(&self, _request: &SchemaRequest) -> Result<serde_json::Value> {
            anyhow::bail!("generator unavailable")
        }
    }

    struct FixedValidator {
        valid: bool,
        issues: usize,
    }

    #[async_trait]
    impl SchemaValidator for FixedValidator {
        async fn validate(&self, _schema_json: &str) -> Result<SchemaCheckResult> {
            Ok(SchemaCheckResult {
                valid: self.valid,
                issues: (0..self.issues)
                    .map(|i| SchemaIssue {
                        path: None,
                        message: format!("issue {}", i),
                    })
                    .collect(),
            })
        }
    }

    struct FailingValidator;

    #[async_trait]
    impl SchemaValidator for FailingValidator {
        async fn validate(&self, _schema_json: &str) -> Result<SchemaCheckResult> {
            anyhow::bail!("validator unavailable")
        }
    }

    fn request(schema_source: SchemaSource) -> VerifyRequest {
        VerifyRequest {
            key: ActivityKey::new("user-1", "project-1", "https://example.com/post"),
            body: "Published body.".to_string(),
            content_type: "article".to_string(),
            schema_source,
            inserted_schema: None,
            score_before: Some(70.0),
            permalink: Some("https://example.com/post".to_string()),
            fallback_url: "https://example.com/draft".to_string(),
            accepted_entities: vec!["Article".to_string()],
            site_name: None,
        }
    }

    fn verifier(store: Arc<MemoryActivityStore>) -> PublishVerifier {
        PublishVerifier::new(ActivityRecorder::new(store))
    }

    #[tokio::test]
    async fn test_full_run_with_generated_schema() {
        let store = Arc::new(MemoryActivityStore::new());
        let verifier = verifier(store.clone())
            .with_scorer(Arc::new(FixedScorer(78.4)))
            .with_generator(Arc::new(FixedGenerator))
            .with_validator(Arc::new(FixedValidator {
                valid: true,
                issues: 0,
            }));

        let record = verifier
            .verify_after_publish(&request(SchemaSource::Generated))
            .await;

        assert_eq!(record.schema_used, SchemaSource::Generated);
        assert_eq!(record.schema_valid, Some(true));
        assert_eq!(record.score_after, Some(78.4));
        assert_eq!(record.delta, Some(8.0));
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_scorer_failure_keeps_schema_fields() {
        let store = Arc::new(MemoryActivityStore::new());
        let verifier = verifier(store)
            .with_scorer(Arc::new(FailingScorer))
            .with_validator(Arc::new(FixedValidator {
                valid: false,
                issues: 2,
            }));

        let mut req = request(SchemaSource::Inserted);
        req.inserted_schema = Some("{\"@type\":\"Article\"}".to_string());
        let record = verifier.verify_after_publish(&req).await;

        assert_eq!(record.score_after, None);
        assert_eq!(record.delta, None);
        assert_eq!(record.schema_valid, Some(false));
        assert_eq!(record.issue_count, 2);
    }

    #[tokio::test]
    async fn test_validator_failure_is_unknown_not_invalid() {
        let store = Arc::new(MemoryActivityStore::new());
        let verifier = verifier(store)
            .with_scorer(Arc::new(FixedScorer(75.0)))
            .with_validator(Arc::new(FailingValidator));

        let mut req = request(SchemaSource::Inserted);
        req.inserted_schema = Some("{}".to_string());
        let record = verifier.verify_after_publish(&req).await;

        assert_eq!(record.schema_valid, None);
        assert_eq!(record.schema_used, SchemaSource::Inserted);
        assert_eq!(record.score_after, Some(75.0));
    }

    #[tokio::test]
    async fn test_generator_failure_skips_validation() {
        let store = Arc::new(MemoryActivityStore::new());
        let verifier = verifier(store)
            .with_generator(Arc::new(FailingGenerator))
            .with_validator(Arc::new(FixedValidator {
                valid: true,
                issues: 0,
            }));

        let record = verifier
            .verify_after_publish(&request(SchemaSource::Generated))
            .await;

        assert_eq!(record.schema_valid, None);
        assert_eq!(record.issue_count, 0);
    }

    #[tokio::test]
    async fn test_schema_source_none_skips_stage() {
        let store = Arc::new(MemoryActivityStore::new());
        let verifier = verifier(store).with_scorer(Arc::new(FixedScorer(66.0)));

        let record = verifier
            .verify_after_publish(&request(SchemaSource::None))
            .await;

        assert_eq!(record.schema_used, SchemaSource::None);
        assert_eq!(record.schema_valid, None);
        assert_eq!(record.score_after, Some(66.0));
        assert_eq!(record.delta, Some(-4.0));
    }

    #[tokio::test]
    async fn test_everything_failing_still_returns_a_record() {
        let store = Arc::new(MemoryActivityStore::new());
        let verifier = verifier(store.clone())
            .with_scorer(Arc::new(FailingScorer))
            .with_generator(Arc::new(FailingGenerator))
            .with_validator(Arc::new(FailingValidator));

        let record = verifier
            .verify_after_publish(&request(SchemaSource::Generated))
            .await;

        assert_eq!(record.schema_valid, None);
        assert_eq!(record.score_after, None);
        assert_eq!(record.delta, None);
        assert_eq!(record.verdict(), "Schema: checked · Visibility: checked");
        // The failed run is still recorded.
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_delta_needs_both_scores() {
        let store = Arc::new(MemoryActivityStore::new());
        let verifier = verifier(store).with_scorer(Arc::new(FixedScorer(80.0)));

        let mut req = request(SchemaSource::None);
        req.score_before = None;
        let record = verifier.verify_after_publish(&req).await;

        assert_eq!(record.score_after, Some(80.0));
        assert_eq!(record.delta, None);
    }

    #[tokio::test]
    async fn test_delta_is_rounded() {
        let store = Arc::new(MemoryActivityStore::new());
        let verifier = verifier(store).with_scorer(Arc::new(FixedScorer(78.4)));

        let mut req = request(SchemaSource::None);
        req.score_before = Some(70.1);
        let record = verifier.verify_after_publish(&req).await;

        assert_eq!(record.delta, Some(8.0));
    }

    #[tokio::test]
    async fn test_resolved_url_prefers_permalink() {
        let mut req = request(SchemaSource::None);
        assert_eq!(req.resolved_url(), "https://example.com/post");
        req.permalink = None;
        assert_eq!(req.resolved_url(), "https://example.com/draft");
    }

    struct FailingStore;

    #[async_trait]
    impl ActivityStore for FailingStore {
        async fn record(
            &self,
            _key: &ActivityKey,
            _record: &PublishImpactRecord,
        ) -> Result<()> {
            anyhow::bail!("store down")
        }

        async fn query(
            &self,
            _key: &ActivityKey,
            _limit: usize,
        ) -> Result<Vec<PublishImpactRecord>> {
            anyhow::bail!("store down")
        }
    }

    #[tokio::test]
    async fn test_persistence_failure_is_swallowed() {
        let verifier = PublishVerifier::new(ActivityRecorder::new(Arc::new(FailingStore)))
            .with_scorer(Arc::new(FixedScorer(70.0)));

        // Must return normally despite the store being down.
        let record = verifier
            .verify_after_publish(&request(SchemaSource::None))
            .await;
        assert_eq!(record.score_after, Some(70.0));
    }
}
