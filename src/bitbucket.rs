//! Bitbucket Server API Client
//!
//! Paginated REST access to pull requests, pull request commits and
//! commit build statuses. Requests go out one at a time.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Client, Url};
use serde::de::{DeserializeOwned, Error as _};
use serde::Deserialize;
use tracing::debug;

use crate::config::Auth;
use crate::error::{ConfigError, Resource, RetrievalError, RetrievalErrorKind};
use crate::pull_request::{
    BuildState, BuildStatus, CommitRecord, Page, PullRequestCandidate, PullRequestSource,
    PAGE_LIMIT,
};

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Bitbucket Server API client
pub struct BitbucketClient {
    client: Client,
    base_url: String,
    auth: Auth,
}

// ============================================================
// API Response Types
// ============================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PagedResponse<T> {
    is_last_page: bool,
    values: Vec<T>,
    next_page_start: Option<u64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiPullRequest {
    id: u64,
    from_ref: ApiRef,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiRef {
    id: String,
    display_id: Option<String>,
    // Not in the official docs, but returned by the server
    latest_commit: String,
}

#[derive(Debug, Deserialize)]
struct ApiBuildStatus {
    state: BuildState,
    name: Option<String>,
    key: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiCommit {
    id: String,
}

impl<T> PagedResponse<T> {
    fn into_page<U>(self, convert: impl FnMut(T) -> U) -> Result<Page<U>, RetrievalErrorKind> {
        let items = self.values.into_iter().map(convert).collect();
        if self.is_last_page {
            return Ok(Page::last(items));
        }
        match self.next_page_start {
            Some(next) => Ok(Page::with_next(items, next)),
            None => Err(RetrievalErrorKind::Malformed(serde_json::Error::custom(
                "isLastPage is false but nextPageStart is missing",
            ))),
        }
    }
}

impl From<ApiPullRequest> for PullRequestCandidate {
    fn from(pull: ApiPullRequest) -> Self {
        let branch_display_name = pull.from_ref.display_id.unwrap_or_else(|| {
            pull.from_ref
                .id
                .strip_prefix("refs/heads/")
                .unwrap_or(&pull.from_ref.id)
                .to_string()
        });

        Self {
            id: pull.id,
            branch_display_name,
            branch_ref_id: pull.from_ref.id,
            head_commit_id: pull.from_ref.latest_commit,
        }
    }
}

impl From<ApiBuildStatus> for BuildStatus {
    fn from(status: ApiBuildStatus) -> Self {
        Self {
            name: status.name.or(status.key).unwrap_or_default(),
            state: status.state,
        }
    }
}

impl From<ApiCommit> for CommitRecord {
    fn from(commit: ApiCommit) -> Self {
        Self {
            id: commit.id,
            is_branch_tip: false,
        }
    }
}

// ============================================================
// Client Implementation
// ============================================================

impl BitbucketClient {
    /// Create a new client for the server at `base_url`
    pub fn new(base_url: &str, auth: &Auth) -> Result<Self, ConfigError> {
        let base_url = rest_base_url(base_url)?;

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(default_headers())
            .build()?;

        Ok(Self {
            client,
            base_url,
            auth: auth.clone(),
        })
    }

    /// REST root, always ending in `/rest`
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn repo_path(&self, project_key: &str, repository_slug: &str) -> String {
        format!(
            "{}/api/1.0/projects/{}/repos/{}",
            self.base_url,
            urlencoding::encode(project_key),
            urlencoding::encode(repository_slug)
        )
    }

    /// GET one page and decode its envelope
    async fn get_page<T: DeserializeOwned>(
        &self,
        url: &str,
        start: Option<u64>,
    ) -> Result<PagedResponse<T>, RetrievalErrorKind> {
        debug!("Fetching page: {} (start: {:?})", url, start);

        let mut request = self.client.get(url).query(&[("limit", PAGE_LIMIT)]);
        if let Some(start) = start {
            request = request.query(&[("start", start)]);
        }
        if let Auth::Basic { username, password } = &self.auth {
            request = request.basic_auth(username, Some(password));
        }

        let response = request.send().await.map_err(RetrievalErrorKind::Transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(RetrievalErrorKind::Status(status));
        }

        let body = response.bytes().await.map_err(RetrievalErrorKind::Transport)?;
        serde_json::from_slice(&body).map_err(RetrievalErrorKind::Malformed)
    }
}

fn rest_base_url(base_url: &str) -> Result<String, ConfigError> {
    let trimmed = base_url.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Err(ConfigError::InvalidBaseUrl("base URL is empty".to_string()));
    }
    Url::parse(trimmed).map_err(|e| ConfigError::InvalidBaseUrl(format!("{}: {}", trimmed, e)))?;

    if trimmed.ends_with("/rest") {
        Ok(trimmed.to_string())
    } else {
        Ok(format!("{}/rest", trimmed))
    }
}

/// Headers sent on every request
fn default_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    // Avoid the XSRF check
    headers.insert("X-Atlassian-Token", HeaderValue::from_static("no-check"));
    headers.insert("X-Requested-With", HeaderValue::from_static("XMLHttpRequest"));
    headers.insert("Accept", HeaderValue::from_static("application/json"));
    headers
}

#[async_trait]
impl PullRequestSource for BitbucketClient {
    async fn pull_requests_page(
        &self,
        project_key: &str,
        repository_slug: &str,
        start: Option<u64>,
    ) -> Result<Page<PullRequestCandidate>, RetrievalError> {
        let url = format!("{}/pull-requests", self.repo_path(project_key, repository_slug));

        self.get_page::<ApiPullRequest>(&url, start)
            .await
            .and_then(|response| response.into_page(PullRequestCandidate::from))
            .map_err(|kind| {
                RetrievalError::new(
                    Resource::PullRequests {
                        project: project_key.to_string(),
                        repo: repository_slug.to_string(),
                    },
                    kind,
                )
            })
    }

    async fn build_statuses_page(
        &self,
        commit_id: &str,
        start: Option<u64>,
    ) -> Result<Page<BuildStatus>, RetrievalError> {
        let url = format!(
            "{}/build-status/1.0/commits/{}",
            self.base_url,
            urlencoding::encode(commit_id)
        );

        self.get_page::<ApiBuildStatus>(&url, start)
            .await
            .and_then(|response| response.into_page(BuildStatus::from))
            .map_err(|kind| {
                RetrievalError::new(
                    Resource::BuildStatuses {
                        commit: commit_id.to_string(),
                    },
                    kind,
                )
            })
    }

    async fn pull_request_commits_page(
        &self,
        project_key: &str,
        repository_slug: &str,
        pull_request_id: u64,
        start: Option<u64>,
    ) -> Result<Page<CommitRecord>, RetrievalError> {
        let url = format!(
            "{}/pull-requests/{}/commits",
            self.repo_path(project_key, repository_slug),
            pull_request_id
        );

        self.get_page::<ApiCommit>(&url, start)
            .await
            .and_then(|response| response.into_page(CommitRecord::from))
            .map_err(|kind| {
                RetrievalError::new(
                    Resource::PullRequestCommits {
                        project: project_key.to_string(),
                        repo: repository_slug.to_string(),
                        pull_request: pull_request_id,
                    },
                    kind,
                )
            })
    }
}
