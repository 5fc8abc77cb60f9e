//! Redraft CLI
//!
//! Command-line interface for Redraft - revision diffing, citation
//! anchoring, and post-publish verification.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod output;

use output::{Output, OutputFormat};

#[derive(Parser)]
#[command(name = "redraft")]
#[command(about = "Redraft - compare, cite, and verify published content revisions")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Quiet mode - minimal output
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compare two versions of a document side by side
    Diff {
        /// Original document
        base: PathBuf,
        /// Revised document
        revision: PathBuf,
        /// Break changed lines into word-level tokens
        #[arg(long)]
        words: bool,
    },
    /// Insert citation anchors into a document body
    Cite {
        /// Document body to rewrite
        content: PathBuf,
        /// JSON file holding the citation list
        #[arg(long)]
        citations: PathBuf,
        /// Append a references block after the content
        #[arg(long)]
        references: bool,
        /// Write the rewritten body here instead of stdout
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Publish a document and run post-publish verification
    Publish {
        /// Post title
        title: String,
        /// File holding the document body
        #[arg(long)]
        body: PathBuf,
        /// Owning user
        #[arg(long)]
        user: String,
        /// Project the publish belongs to
        #[arg(long)]
        project: String,
        /// Pre-publish URL, used when the target returns no permalink
        #[arg(long)]
        url: String,
        /// Quality score measured before publishing
        #[arg(long)]
        score_before: Option<f64>,
        /// Caller-approved schema draft to validate instead of
        /// generating one
        #[arg(long)]
        schema: Option<PathBuf>,
    },
    /// Report recent publish-impact records
    Impact {
        /// Owning user
        #[arg(long)]
        user: String,
        /// Project the publishes belong to
        #[arg(long)]
        project: String,
        /// Permalink or pre-publish URL of the page
        #[arg(long)]
        url: String,
        /// Maximum number of records to show
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },
    /// Show or set configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
}

#[derive(Subcommand, Clone)]
enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Set a configuration value
    Set {
        /// Configuration key (data_dir, site_name, auto_schema, ...)
        key: String,
        /// Configuration value
        value: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .try_init();

    let cli = Cli::parse();
    let output = Output::new(OutputFormat::from_flags(cli.json, cli.quiet));

    match cli.command {
        Commands::Diff {
            base,
            revision,
            words,
        } => commands::diff::run(&base, &revision, words, &output),
        Commands::Cite {
            content,
            citations,
            references,
            out,
        } => commands::cite::run(&content, &citations, references, out.as_deref(), &output),
        Commands::Publish {
            title,
            body,
            user,
            project,
            url,
            score_before,
            schema,
        } => {
            commands::publish::run(
                &title,
                &body,
                &user,
                &project,
                &url,
                score_before,
                schema.as_deref(),
                &output,
            )
            .await
        }
        Commands::Impact {
            user,
            project,
            url,
            limit,
        } => commands::impact::run(&user, &project, &url, limit, &output).await,
        Commands::Config { command } => match command {
            Some(ConfigCommands::Show) | None => commands::config::show(&output),
            Some(ConfigCommands::Set { key, value }) => commands::config::set(key, value, &output),
        },
    }
}
