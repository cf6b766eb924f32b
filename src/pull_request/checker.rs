//! Commit Green Checker
//!
//! Fetches every build status of a commit and applies the build policy.
//! Nothing is cached: builds change state over time.

use tracing::debug;

use super::policy::BuildPolicy;
use super::source::PullRequestSource;
use super::types::BuildStatus;
use crate::error::RetrievalError;

pub struct CommitGreenChecker<'a, S: ?Sized> {
    source: &'a S,
    policy: &'a BuildPolicy,
}

impl<'a, S: PullRequestSource + ?Sized> CommitGreenChecker<'a, S> {
    pub fn new(source: &'a S, policy: &'a BuildPolicy) -> Self {
        Self { source, policy }
    }

    /// Fetch all build statuses associated with the commit
    pub async fn build_statuses(&self, commit_id: &str) -> Result<Vec<BuildStatus>, RetrievalError> {
        let mut statuses = Vec::new();
        let mut start = None;

        loop {
            let page = self.source.build_statuses_page(commit_id, start).await?;
            statuses.extend(page.items);

            match page.next_page_start {
                Some(next) => start = Some(next),
                None => break,
            }
        }

        Ok(statuses)
    }

    /// Whether the commit's builds satisfy the policy
    pub async fn is_green(&self, commit_id: &str) -> Result<bool, RetrievalError> {
        let statuses = self.build_statuses(commit_id).await?;
        let green = self.policy.is_green(&statuses);

        debug!(
            commit = %commit_id,
            builds = statuses.len(),
            green,
            "Evaluated commit builds"
        );

        Ok(green)
    }
}
