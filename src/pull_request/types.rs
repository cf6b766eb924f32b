//! Pull Request Discovery Types
//!
//! Core types for candidates read from the server and the resolved
//! pull requests handed back to callers.

use serde::{Deserialize, Serialize};

/// Number of items requested per page
pub const PAGE_LIMIT: u32 = 100;

/// One page of a paginated listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    /// Items on this page, in server order
    pub items: Vec<T>,
    /// Cursor to echo back as `start` for the next page; `None` on the last page
    pub next_page_start: Option<u64>,
}

impl<T> Page<T> {
    /// A terminal page
    pub fn last(items: Vec<T>) -> Self {
        Self {
            items,
            next_page_start: None,
        }
    }

    /// A page followed by another one starting at `next_page_start`
    pub fn with_next(items: Vec<T>, next_page_start: u64) -> Self {
        Self {
            items,
            next_page_start: Some(next_page_start),
        }
    }

    pub fn has_next_page(&self) -> bool {
        self.next_page_start.is_some()
    }
}

/// An open pull request as listed by the server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestCandidate {
    /// Server-assigned pull request id
    pub id: u64,
    /// Short branch name (e.g. `feature-101`)
    pub branch_display_name: String,
    /// Full ref id (e.g. `refs/heads/feature-101`)
    pub branch_ref_id: String,
    /// Latest commit on the source branch
    pub head_commit_id: String,
}

/// A pull request accepted by the lister
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedPullRequest {
    pub number: u64,
    pub branch: String,
    /// Head commit, or the latest green commit when it was substituted
    pub head_sha: String,
}

/// Lifecycle state of a build
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BuildState {
    #[serde(rename = "SUCCESSFUL")]
    Successful,
    #[serde(rename = "FAILED")]
    Failed,
    #[serde(rename = "INPROGRESS")]
    InProgress,
    #[serde(other)]
    Other,
}

/// A CI build result attached to a commit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildStatus {
    pub name: String,
    pub state: BuildState,
}

impl BuildStatus {
    pub fn new(name: impl Into<String>, state: BuildState) -> Self {
        Self {
            name: name.into(),
            state,
        }
    }

    pub fn is_successful(&self) -> bool {
        self.state == BuildState::Successful
    }
}

/// A commit belonging to a pull request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitRecord {
    pub id: String,
    /// Set for the already-evaluated tip of the source branch
    pub is_branch_tip: bool,
}
