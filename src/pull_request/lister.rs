//! Pull Request Lister
//!
//! Walks every page of open pull requests and decides, per pull request,
//! whether to skip it, accept its head commit, or substitute the latest
//! commit with green builds.

use tracing::{debug, info};

use super::checker::CommitGreenChecker;
use super::history::CommitHistoryWalker;
use super::source::PullRequestSource;
use super::types::{PullRequestCandidate, ResolvedPullRequest};
use crate::config::ListerConfig;
use crate::error::RetrievalError;

/// Outcome of evaluating a single pull request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Branch name does not match the configured pattern
    BranchRejected,
    /// No build policy configured; head commit accepted as-is
    NoPolicy,
    /// Head commit builds are green
    HeadGreen,
    /// Head is not green and fallback search is disabled
    HeadNotGreen,
    /// An older green commit replaces the head
    FallbackFound(String),
    /// No green commit exists in the pull request history
    FallbackExhausted,
}

impl Resolution {
    /// The commit to report, or `None` when the pull request is skipped
    pub fn accepted_sha<'a>(&'a self, candidate: &'a PullRequestCandidate) -> Option<&'a str> {
        match self {
            Resolution::NoPolicy | Resolution::HeadGreen => Some(candidate.head_commit_id.as_str()),
            Resolution::FallbackFound(sha) => Some(sha.as_str()),
            Resolution::BranchRejected
            | Resolution::HeadNotGreen
            | Resolution::FallbackExhausted => None,
        }
    }
}

/// Lists open pull requests filtered by branch and build status
pub struct PullRequestLister<S> {
    source: S,
    config: ListerConfig,
}

impl<S: PullRequestSource> PullRequestLister<S> {
    pub fn new(source: S, config: ListerConfig) -> Self {
        Self { source, config }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn config(&self) -> &ListerConfig {
        &self.config
    }

    /// List every accepted pull request, in server page order.
    ///
    /// Any failed request aborts the whole listing.
    pub async fn list(&self) -> Result<Vec<ResolvedPullRequest>, RetrievalError> {
        let mut pull_requests = Vec::new();
        let mut start = None;
        let mut seen = 0usize;

        loop {
            let page = self
                .source
                .pull_requests_page(&self.config.project_key, &self.config.repository_slug, start)
                .await?;

            for candidate in &page.items {
                seen += 1;
                let resolution = self.resolve(candidate).await?;
                if let Some(sha) = resolution.accepted_sha(candidate) {
                    pull_requests.push(ResolvedPullRequest {
                        number: candidate.id,
                        branch: candidate.branch_display_name.clone(),
                        head_sha: sha.to_string(),
                    });
                }
            }

            match page.next_page_start {
                Some(next) => start = Some(next),
                None => break,
            }
        }

        info!(
            project = %self.config.project_key,
            repo = %self.config.repository_slug,
            open = seen,
            accepted = pull_requests.len(),
            "Listed pull requests"
        );

        Ok(pull_requests)
    }

    /// Decide what to do with one pull request
    pub async fn resolve(
        &self,
        candidate: &PullRequestCandidate,
    ) -> Result<Resolution, RetrievalError> {
        if let Some(branch_match) = &self.config.branch_match {
            if !branch_match.is_match(&candidate.branch_display_name) {
                debug!(
                    branch = %candidate.branch_display_name,
                    "Branch does not match the pattern"
                );
                return Ok(Resolution::BranchRejected);
            }
        }

        if !self.config.build_policy.is_enabled() {
            return Ok(Resolution::NoPolicy);
        }

        let checker = CommitGreenChecker::new(&self.source, &self.config.build_policy);
        if checker.is_green(&candidate.head_commit_id).await? {
            return Ok(Resolution::HeadGreen);
        }

        if !self.config.find_latest_successful {
            debug!(
                commit = %candidate.head_commit_id,
                pr = candidate.id,
                "Commit has failed builds, skipping PR"
            );
            return Ok(Resolution::HeadNotGreen);
        }

        let walker = CommitHistoryWalker::new(
            &self.source,
            &self.config.project_key,
            &self.config.repository_slug,
        );

        for commit in walker.commits_of(candidate).await? {
            if commit.is_branch_tip {
                continue;
            }
            if checker.is_green(&commit.id).await? {
                debug!(commit = %commit.id, pr = candidate.id, "Latest green commit found");
                return Ok(Resolution::FallbackFound(commit.id));
            }
        }

        debug!(
            pr = candidate.id,
            "Couldn't find a commit with successful builds, skipping PR"
        );
        Ok(Resolution::FallbackExhausted)
    }
}
