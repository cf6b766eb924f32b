//! Service Configuration
//!
//! Construction-time settings. All patterns are compiled here, so an
//! invalid regex fails before any request reaches the server.

use regex::Regex;
use tracing::debug;

use crate::bitbucket::BitbucketClient;
use crate::error::ConfigError;
use crate::pull_request::{BuildPolicy, PullRequestLister};

/// Server authentication mode
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Auth {
    #[default]
    None,
    Basic {
        username: String,
        password: String,
    },
}

/// Raw configuration as supplied by the caller
#[derive(Debug, Clone, Default)]
pub struct ServiceConfig {
    /// Server base URL; `/rest` is appended when missing
    pub base_url: String,
    pub auth: Auth,
    pub project_key: String,
    pub repository_slug: String,
    /// Only keep pull requests whose branch name contains a match
    pub branch_match: Option<String>,
    /// `None` skips build checks, an empty list requires every build to succeed
    pub successful_builds: Option<Vec<String>>,
    /// Fall back to the latest green commit when the head is not green
    pub find_latest_successful: bool,
}

/// Compiled, immutable settings used by the lister
#[derive(Debug, Clone)]
pub struct ListerConfig {
    pub project_key: String,
    pub repository_slug: String,
    pub branch_match: Option<Regex>,
    pub build_policy: BuildPolicy,
    pub find_latest_successful: bool,
}

impl ServiceConfig {
    pub fn new(
        base_url: impl Into<String>,
        project_key: impl Into<String>,
        repository_slug: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            project_key: project_key.into(),
            repository_slug: repository_slug.into(),
            ..Default::default()
        }
    }

    pub fn basic_auth(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.auth = Auth::Basic {
            username: username.into(),
            password: password.into(),
        };
        self
    }

    pub fn branch_match(mut self, pattern: impl Into<String>) -> Self {
        self.branch_match = Some(pattern.into());
        self
    }

    pub fn successful_builds<I, P>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<String>,
    {
        self.successful_builds = Some(patterns.into_iter().map(Into::into).collect());
        self
    }

    pub fn find_latest_successful(mut self, enabled: bool) -> Self {
        self.find_latest_successful = enabled;
        self
    }

    /// Compile the branch and build name patterns
    pub fn compile(&self) -> Result<ListerConfig, ConfigError> {
        let branch_match = self
            .branch_match
            .as_deref()
            .map(|pattern| {
                Regex::new(pattern).map_err(|source| ConfigError::InvalidBranchMatch {
                    pattern: pattern.to_string(),
                    source,
                })
            })
            .transpose()?;

        let build_patterns = self
            .successful_builds
            .as_ref()
            .map(|patterns| {
                patterns
                    .iter()
                    .map(|pattern| {
                        Regex::new(pattern).map_err(|source| ConfigError::InvalidBuildName {
                            pattern: pattern.clone(),
                            source,
                        })
                    })
                    .collect::<Result<Vec<_>, _>>()
            })
            .transpose()?;

        Ok(ListerConfig {
            project_key: self.project_key.clone(),
            repository_slug: self.repository_slug.clone(),
            branch_match,
            build_policy: BuildPolicy::from_patterns(build_patterns),
            find_latest_successful: self.find_latest_successful,
        })
    }

    /// Compile the configuration and build a lister backed by Bitbucket Server
    pub fn build(&self) -> Result<PullRequestLister<BitbucketClient>, ConfigError> {
        let config = self.compile()?;
        let client = BitbucketClient::new(&self.base_url, &self.auth)?;

        debug!(
            base_url = %client.base_url(),
            project = %config.project_key,
            repo = %config.repository_slug,
            "Built pull request lister"
        );

        Ok(PullRequestLister::new(client, config))
    }
}
