//! Error Types
//!
//! Configuration errors surface before any network call is made.
//! Retrieval errors abort a listing and name the resource being fetched.

use std::fmt;

use reqwest::StatusCode;
use thiserror::Error;

/// Errors raised while building a service from its configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The branch match pattern does not compile
    #[error("Invalid branch match regex {pattern:?}: {source}")]
    InvalidBranchMatch {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// One of the build name patterns does not compile
    #[error("Invalid build name regex {pattern:?}: {source}")]
    InvalidBuildName {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// The server base URL is empty or unusable
    #[error("Invalid base URL: {0}")]
    InvalidBaseUrl(String),

    /// The HTTP client could not be built
    #[error("Failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

/// The remote resource a failed request was fetching
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resource {
    PullRequests {
        project: String,
        repo: String,
    },
    BuildStatuses {
        commit: String,
    },
    PullRequestCommits {
        project: String,
        repo: String,
        pull_request: u64,
    },
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resource::PullRequests { project, repo } => {
                write!(f, "pull requests for {}/{}", project, repo)
            }
            Resource::BuildStatuses { commit } => write!(f, "build statuses for {}", commit),
            Resource::PullRequestCommits {
                project,
                repo,
                pull_request,
            } => write!(
                f,
                "pull request commits for {}/{} PR-{}",
                project, repo, pull_request
            ),
        }
    }
}

/// What went wrong while fetching a page
#[derive(Debug, Error)]
pub enum RetrievalErrorKind {
    /// Connection, TLS or body read failure
    #[error("transport error: {0}")]
    Transport(#[source] reqwest::Error),

    /// The server answered with a non-success status
    #[error("server returned {0}")]
    Status(StatusCode),

    /// The body did not match the expected page shape
    #[error("malformed response: {0}")]
    Malformed(#[source] serde_json::Error),

    /// Any other failure reported by a page source
    #[error("{0}")]
    Other(String),
}

/// A page fetch failed; the whole listing is aborted
#[derive(Debug, Error)]
#[error("Error listing {resource}: {kind}")]
pub struct RetrievalError {
    pub resource: Resource,
    #[source]
    pub kind: RetrievalErrorKind,
}

impl RetrievalError {
    pub fn new(resource: Resource, kind: RetrievalErrorKind) -> Self {
        Self { resource, kind }
    }

    /// Whether the failure came from an unparseable response body
    pub fn is_malformed(&self) -> bool {
        matches!(self.kind, RetrievalErrorKind::Malformed(_))
    }
}
