//! Redraft Core Library
//!
//! This crate provides the core functionality for Redraft, a content
//! revision toolkit: structural comparison of an original and a revised
//! document, safe injection of citation hyperlinks into prose, and a
//! best-effort verification pipeline that runs after a document has been
//! pushed to a publishing surface.
//!
//! # Architecture
//!
//! The diff and anchoring layers are pure, synchronous functions over
//! in-memory strings. Verification is asynchronous and talks to external
//! collaborators (scoring, schema generation/validation, persistence)
//! through traits, so the pipeline can be driven against HTTP services
//! in production and mocks in tests.
//!
//! # Quick Start
//!
//! ```text
//! let diff = present(&original, &revised, Granularity::Word);
//!
//! let outcome = insert_anchors(&body, &unused_citations);
//!
//! let verifier = PublishVerifier::new(recorder).with_scorer(scorer);
//! let record = verifier.verify_after_publish(&request).await;
//! ```
//!
//! # Modules
//!
//! - `diff`: line, word, and presenter layers of the revision diff
//! - `anchor`: citation anchor insertion and references block
//! - `verify`: post-publish verification pipeline and collaborator traits
//! - `activity`: append-only publish-impact log (in-memory and SQLite)
//! - `models`: shared data structures
//! - `config`: application configuration

pub mod activity;
pub mod anchor;
pub mod config;
pub mod diff;
pub mod models;
pub mod verify;

pub use activity::{ActivityError, ActivityRecorder, ActivityStore, MemoryActivityStore, SqliteActivityStore};
pub use anchor::{append_references, insert_anchors, AnchorOutcome};
pub use config::Config;
pub use diff::{
    diff_lines, diff_words, present, CellContent, DiffCell, Granularity, LineDiff, LineRecord,
    RenderableDiff, Token, TokenKind, WordDiff,
};
pub use models::{
    ActivityKey, Citation, PublishImpactRecord, SchemaCheckResult, SchemaIssue, SchemaSource,
};
pub use verify::{
    PublishReceipt, PublishVerifier, Publisher, SchemaGenerator, SchemaRequest, SchemaValidator,
    ScoreReport, Scorer, VerifyRequest,
};
