//! Pull Request Discovery
//!
//! Lists open pull requests and resolves, for each one, the commit to
//! report based on its branch name and CI build results.
//!
//! ## Flow
//!
//! ```text
//! PullRequestLister -> branch filter -> CommitGreenChecker
//!                                    -> CommitHistoryWalker -> CommitGreenChecker (per commit)
//! ```

pub mod checker;
pub mod history;
pub mod lister;
pub mod policy;
pub mod source;
pub mod types;

#[cfg(test)]
pub(crate) mod fake;

pub use checker::CommitGreenChecker;
pub use history::CommitHistoryWalker;
pub use lister::{PullRequestLister, Resolution};
pub use policy::{all_green, named_green, BuildPolicy};
pub use source::PullRequestSource;
pub use types::{
    BuildState, BuildStatus, CommitRecord, Page, PullRequestCandidate, ResolvedPullRequest,
    PAGE_LIMIT,
};
