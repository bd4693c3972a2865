//! Provider abstraction layer
//!
//! A provider supplies the tag/commit history the orchestrator reads and
//! accepts the push of a new tag. Two real implementations exist:
//!
//! - [git::GitProvider]: the local repository, via the `git2` crate
//! - [github::GithubProvider]: the GitHub REST API, via `reqwest`
//!
//! [mock::MockProvider] backs the tests. Code should depend on the
//! [Provider] trait rather than a concrete implementation.

pub mod git;
pub mod github;
pub mod mock;

pub use git::GitProvider;
pub use github::GithubProvider;
pub use mock::MockProvider;

use crate::domain::{Commit, Tag, Version};
use crate::error::Result;

/// Capability contract between the orchestrator and the outside world.
///
/// Everything is sequential and synchronous; implementations need no
/// thread-safety guarantees.
pub trait Provider {
    /// The most recent tag reachable from history.
    ///
    /// Returns the empty [Tag] when the repository has no tags yet; that is
    /// a success, not an error.
    fn latest_tag(&self) -> Result<Tag>;

    /// Commits reachable from the working head but not from `tag`, in
    /// chronological order (oldest first, so the last element is the tip).
    ///
    /// An empty `tag` means the whole history. An empty result is valid: no
    /// commits since the tag means no version bump.
    fn commits_since(&self, tag: &Tag) -> Result<Vec<Commit>>;

    /// Create a tag named after `version` pointing at `reference`, plus
    /// whatever publication the provider supports (a release with uploaded
    /// assets, for hosting APIs).
    fn push(&self, reference: &Commit, version: &Version) -> Result<()>;
}
