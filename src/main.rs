//! Bitbucket Pull Request Discovery
//!
//! Prints the open pull requests of a Bitbucket Server repository with the
//! commit each one should be deployed from.
//!
//! # Usage
//! ```bash
//! # Every open PR with its head commit
//! bitbucket-pr-discovery --base-url https://bitbucket.example.com --project PROJ --repo app
//!
//! # Feature branches whose docker build is green, falling back to older commits
//! bitbucket-pr-discovery --project PROJ --repo app \
//!   --branch-match '^feature-' \
//!   --successful-build 'DOCKER-BUILD #\d+' \
//!   --find-latest-successful --output json
//! ```

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;

use bitbucket_pr_discovery::{ResolvedPullRequest, ServiceConfig};

// ============================================================
// CLI Definition
// ============================================================

#[derive(Parser, Debug)]
#[command(name = "bitbucket-pr-discovery")]
#[command(about = "List open Bitbucket Server pull requests with green commits", long_about = None)]
#[command(version)]
struct Cli {
    /// Bitbucket Server URL (`/rest` is appended when missing)
    #[arg(long, env = "BITBUCKET_URL")]
    base_url: String,

    /// Username for basic auth
    #[arg(long, env = "BITBUCKET_USERNAME", requires = "password")]
    username: Option<String>,

    /// Password or personal access token for basic auth
    #[arg(long, env = "BITBUCKET_PASSWORD", hide_env_values = true, requires = "username")]
    password: Option<String>,

    /// Project key
    #[arg(long, env = "BITBUCKET_PROJECT")]
    project: String,

    /// Repository slug
    #[arg(long, env = "BITBUCKET_REPO")]
    repo: String,

    /// Only keep pull requests whose branch name contains a match
    #[arg(long)]
    branch_match: Option<String>,

    /// Build name regex that must have a successful build (repeatable)
    #[arg(long = "successful-build", value_name = "REGEX")]
    successful_builds: Vec<String>,

    /// Require every build on the commit to be successful
    #[arg(long)]
    require_green: bool,

    /// Use the latest green commit when the head commit is not green
    #[arg(long)]
    find_latest_successful: bool,

    /// Output format
    #[arg(long, value_enum, default_value = "table")]
    output: OutputFormat,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

impl Cli {
    fn service_config(&self) -> ServiceConfig {
        let mut config = ServiceConfig::new(&self.base_url, &self.project, &self.repo)
            .find_latest_successful(self.find_latest_successful);

        if let (Some(username), Some(password)) = (&self.username, &self.password) {
            config = config.basic_auth(username, password);
        }
        if let Some(pattern) = &self.branch_match {
            config = config.branch_match(pattern);
        }
        // No patterns and no --require-green disables build checks
        if !self.successful_builds.is_empty() || self.require_green {
            config = config.successful_builds(self.successful_builds.clone());
        }

        config
    }
}

// ============================================================
// Main Entry Point
// ============================================================

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging; stdout only carries results
    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    info!(project = %cli.project, repo = %cli.repo, "Listing pull requests");

    let lister = cli
        .service_config()
        .build()
        .context("Invalid configuration")?;

    let pull_requests = lister
        .list()
        .await
        .context("Failed to list pull requests")?;

    match cli.output {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&pull_requests)?);
        }
        OutputFormat::Table => print_table(&pull_requests),
    }

    Ok(())
}

fn print_table(pull_requests: &[ResolvedPullRequest]) {
    println!("{:<8} {:<40} {:<40}", "NUMBER", "BRANCH", "HEAD_SHA");
    println!("{}", "-".repeat(90));

    for pr in pull_requests {
        println!(
            "{:<8} {:<40} {:<40}",
            pr.number,
            truncate(&pr.branch, 40),
            pr.head_sha
        );
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() > max {
        let head: String = s.chars().take(max - 3).collect();
        format!("{}...", head)
    } else {
        s.to_string()
    }
}
