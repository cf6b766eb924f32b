//! Build Status Policy
//!
//! Decides whether the builds reported for a commit count as green.

use regex::Regex;

use super::types::BuildStatus;

/// Compiled build verification policy
#[derive(Debug, Clone, Default)]
pub enum BuildPolicy {
    /// Accept head commits without looking at builds
    #[default]
    NoCheck,
    /// Every build found on the commit must be successful
    AllGreen,
    /// Each pattern must match at least one successful build
    Named(Vec<Regex>),
}

impl BuildPolicy {
    /// Build a policy from compiled patterns: `None` disables checking,
    /// an empty set checks every build.
    pub fn from_patterns(patterns: Option<Vec<Regex>>) -> Self {
        match patterns {
            None => BuildPolicy::NoCheck,
            Some(patterns) if patterns.is_empty() => BuildPolicy::AllGreen,
            Some(patterns) => BuildPolicy::Named(patterns),
        }
    }

    pub fn is_enabled(&self) -> bool {
        !matches!(self, BuildPolicy::NoCheck)
    }

    /// Apply the policy to the builds of one commit
    pub fn is_green(&self, statuses: &[BuildStatus]) -> bool {
        match self {
            BuildPolicy::NoCheck => true,
            BuildPolicy::AllGreen => all_green(statuses),
            BuildPolicy::Named(patterns) => named_green(patterns, statuses),
        }
    }
}

/// True if every build is successful. A commit without builds passes.
pub fn all_green(statuses: &[BuildStatus]) -> bool {
    statuses.iter().all(BuildStatus::is_successful)
}

/// True if every pattern matches some successful build. Builds not matched
/// by any pattern are ignored.
pub fn named_green(patterns: &[Regex], statuses: &[BuildStatus]) -> bool {
    patterns
        .iter()
        .all(|pattern| matching_build_successful(pattern, statuses))
}

fn matching_build_successful(pattern: &Regex, statuses: &[BuildStatus]) -> bool {
    statuses
        .iter()
        .any(|status| pattern.is_match(&status.name) && status.is_successful())
}
