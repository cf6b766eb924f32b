//! Commit History Walker
//!
//! Lists the commits of a pull request in the order the server returns
//! them (most recent first in practice). The order is trusted, not re-sorted.

use super::source::PullRequestSource;
use super::types::{CommitRecord, PullRequestCandidate};
use crate::error::RetrievalError;

pub struct CommitHistoryWalker<'a, S: ?Sized> {
    source: &'a S,
    project_key: &'a str,
    repository_slug: &'a str,
}

impl<'a, S: PullRequestSource + ?Sized> CommitHistoryWalker<'a, S> {
    pub fn new(source: &'a S, project_key: &'a str, repository_slug: &'a str) -> Self {
        Self {
            source,
            project_key,
            repository_slug,
        }
    }

    /// Fetch all commits of the pull request, flagging its branch tip
    pub async fn commits_of(
        &self,
        pull_request: &PullRequestCandidate,
    ) -> Result<Vec<CommitRecord>, RetrievalError> {
        let mut commits = Vec::new();
        let mut start = None;

        loop {
            let page = self
                .source
                .pull_request_commits_page(
                    self.project_key,
                    self.repository_slug,
                    pull_request.id,
                    start,
                )
                .await?;

            commits.extend(page.items.into_iter().map(|commit| CommitRecord {
                is_branch_tip: commit.is_branch_tip
                    || commit.id == pull_request.head_commit_id
                    || commit.id == pull_request.branch_ref_id,
                id: commit.id,
            }));

            match page.next_page_start {
                Some(next) => start = Some(next),
                None => break,
            }
        }

        Ok(commits)
    }
}
