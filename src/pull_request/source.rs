//! Page Source
//!
//! Trait-based abstraction over the REST calls the lister needs, so any
//! client (or an in-memory double) can drive the discovery logic.

use async_trait::async_trait;

use super::types::{BuildStatus, CommitRecord, Page, PullRequestCandidate};
use crate::error::RetrievalError;

/// Paginated read access to a code-hosting server.
///
/// `start` is the cursor returned by the previous page, `None` for the first
/// page. An empty terminal page is a valid answer, not an error.
#[async_trait]
pub trait PullRequestSource: Send + Sync {
    /// Fetch one page of open pull requests
    async fn pull_requests_page(
        &self,
        project_key: &str,
        repository_slug: &str,
        start: Option<u64>,
    ) -> Result<Page<PullRequestCandidate>, RetrievalError>;

    /// Fetch one page of build statuses attached to a commit
    async fn build_statuses_page(
        &self,
        commit_id: &str,
        start: Option<u64>,
    ) -> Result<Page<BuildStatus>, RetrievalError>;

    /// Fetch one page of commits belonging to a pull request
    async fn pull_request_commits_page(
        &self,
        project_key: &str,
        repository_slug: &str,
        pull_request_id: u64,
        start: Option<u64>,
    ) -> Result<Page<CommitRecord>, RetrievalError>;
}
