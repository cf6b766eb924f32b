//! In-memory page source for tests

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;

use super::source::PullRequestSource;
use super::types::{BuildState, BuildStatus, CommitRecord, Page, PullRequestCandidate};
use crate::error::{Resource, RetrievalError, RetrievalErrorKind};

#[derive(Default)]
pub struct FakeSource {
    pull_request_pages: HashMap<Option<u64>, Page<PullRequestCandidate>>,
    build_pages: HashMap<(String, Option<u64>), Page<BuildStatus>>,
    commit_pages: HashMap<(u64, Option<u64>), Page<CommitRecord>>,
    failing_builds: HashSet<String>,
    calls: Mutex<Vec<String>>,
}

pub fn candidate(id: u64, branch: &str, head: &str) -> PullRequestCandidate {
    PullRequestCandidate {
        id,
        branch_display_name: branch.to_string(),
        branch_ref_id: format!("refs/heads/{}", branch),
        head_commit_id: head.to_string(),
    }
}

pub fn green() -> Vec<BuildStatus> {
    vec![BuildStatus::new("unit", BuildState::Successful)]
}

pub fn red() -> Vec<BuildStatus> {
    vec![
        BuildStatus::new("unit", BuildState::Successful),
        BuildStatus::new("e2e", BuildState::Failed),
    ]
}

impl FakeSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Single terminal page of pull requests
    pub fn with_pull_requests(self, items: Vec<PullRequestCandidate>) -> Self {
        self.with_pull_request_page(None, Page::last(items))
    }

    pub fn with_pull_request_page(
        mut self,
        start: Option<u64>,
        page: Page<PullRequestCandidate>,
    ) -> Self {
        self.pull_request_pages.insert(start, page);
        self
    }

    pub fn with_builds(self, commit: &str, statuses: Vec<BuildStatus>) -> Self {
        self.with_build_page(commit, None, Page::last(statuses))
    }

    pub fn with_build_page(
        mut self,
        commit: &str,
        start: Option<u64>,
        page: Page<BuildStatus>,
    ) -> Self {
        self.build_pages.insert((commit.to_string(), start), page);
        self
    }

    pub fn with_failing_builds(mut self, commit: &str) -> Self {
        self.failing_builds.insert(commit.to_string());
        self
    }

    pub fn with_commits(self, pull_request: u64, ids: &[&str]) -> Self {
        let records = ids
            .iter()
            .map(|id| CommitRecord {
                id: id.to_string(),
                is_branch_tip: false,
            })
            .collect();
        self.with_commit_page(pull_request, None, Page::last(records))
    }

    pub fn with_commit_page(
        mut self,
        pull_request: u64,
        start: Option<u64>,
        page: Page<CommitRecord>,
    ) -> Self {
        self.commit_pages.insert((pull_request, start), page);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn build_status_calls(&self, commit: &str) -> usize {
        let prefix = format!("builds:{}:", commit);
        self.calls()
            .iter()
            .filter(|call| call.starts_with(&prefix))
            .count()
    }

    pub fn commit_calls(&self) -> usize {
        self.calls()
            .iter()
            .filter(|call| call.starts_with("commits:"))
            .count()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

fn missing(resource: Resource, start: Option<u64>) -> RetrievalError {
    RetrievalError::new(
        resource,
        RetrievalErrorKind::Other(format!("no fixture for start {:?}", start)),
    )
}

#[async_trait]
impl PullRequestSource for FakeSource {
    async fn pull_requests_page(
        &self,
        project_key: &str,
        repository_slug: &str,
        start: Option<u64>,
    ) -> Result<Page<PullRequestCandidate>, RetrievalError> {
        self.record(format!("pull-requests:{:?}", start));
        self.pull_request_pages.get(&start).cloned().ok_or_else(|| {
            missing(
                Resource::PullRequests {
                    project: project_key.to_string(),
                    repo: repository_slug.to_string(),
                },
                start,
            )
        })
    }

    async fn build_statuses_page(
        &self,
        commit_id: &str,
        start: Option<u64>,
    ) -> Result<Page<BuildStatus>, RetrievalError> {
        self.record(format!("builds:{}:{:?}", commit_id, start));
        let resource = Resource::BuildStatuses {
            commit: commit_id.to_string(),
        };
        if self.failing_builds.contains(commit_id) {
            return Err(RetrievalError::new(
                resource,
                RetrievalErrorKind::Other("connection reset".to_string()),
            ));
        }
        self.build_pages
            .get(&(commit_id.to_string(), start))
            .cloned()
            .ok_or_else(|| missing(resource, start))
    }

    async fn pull_request_commits_page(
        &self,
        project_key: &str,
        repository_slug: &str,
        pull_request_id: u64,
        start: Option<u64>,
    ) -> Result<Page<CommitRecord>, RetrievalError> {
        self.record(format!("commits:{}:{:?}", pull_request_id, start));
        self.commit_pages
            .get(&(pull_request_id, start))
            .cloned()
            .ok_or_else(|| {
                missing(
                    Resource::PullRequestCommits {
                        project: project_key.to_string(),
                        repo: repository_slug.to_string(),
                        pull_request: pull_request_id,
                    },
                    start,
                )
            })
    }
}
