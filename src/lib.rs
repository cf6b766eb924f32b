//! Bitbucket Pull Request Discovery Library
//!
//! Lists the open pull requests of a Bitbucket Server repository,
//! optionally keeping only branches that match a pattern and replacing
//! each head commit with the latest commit whose CI builds are green.
//!
//! ## Usage
//!
//! ```no_run
//! use bitbucket_pr_discovery::ServiceConfig;
//!
//! # async fn run() -> anyhow::Result<()> {
//! let lister = ServiceConfig::new("https://bitbucket.example.com", "PROJECT", "repo")
//!     .branch_match(r"^feature-")
//!     .successful_builds([r"DOCKER-BUILD #\d+"])
//!     .find_latest_successful(true)
//!     .build()?;
//!
//! for pr in lister.list().await? {
//!     println!("PR-{} {} {}", pr.number, pr.branch, pr.head_sha);
//! }
//! # Ok(())
//! # }
//! ```

pub mod bitbucket;
pub mod config;
pub mod error;
pub mod pull_request;

pub use bitbucket::BitbucketClient;
pub use config::{Auth, ListerConfig, ServiceConfig};
pub use error::{ConfigError, Resource, RetrievalError, RetrievalErrorKind};
pub use pull_request::{PullRequestLister, PullRequestSource, ResolvedPullRequest};
