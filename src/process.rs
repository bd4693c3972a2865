//! The end-to-end tagging flow: fetch tag, parse version, classify commits,
//! compute the bump, push if the version changed.

use crate::domain::{Change, Version};
use crate::error::{Result, TaggerError};
use crate::provider::Provider;
use crate::ui;

/// Boundary options for a process run. The core flow itself never prompts;
/// the confirmation step only runs when `assume_yes` is false.
#[derive(Debug, Clone, Default)]
pub struct ProcessOptions {
    /// Skip the confirmation prompt before pushing
    pub assume_yes: bool,
    /// Report the version that would be pushed without pushing it
    pub dry_run: bool,
}

/// Terminal state of a process run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// No commit since the latest tag changed the version
    NoChange,
    /// Dry run: this version would have been pushed
    DryRun(Version),
    /// The user declined the confirmation prompt
    Cancelled,
    /// A new tag was pushed
    Pushed(Version),
}

/// Run the tagging flow against a provider.
///
/// Any provider failure, and any malformed existing tag, aborts the run with
/// the first error; there is no retry. An invalid latest tag is never
/// silently treated as 0.0.0.
pub fn run<P: Provider>(provider: &P, options: &ProcessOptions) -> Result<Outcome> {
    let tag = provider.latest_tag()?;
    let version = tag.version()?;

    ui::display_status(&format!("current version: {}", version));

    let commits = provider.commits_since(&tag)?;

    let mut major = false;
    let mut minor = false;
    let mut patch = false;

    for commit in &commits {
        ui::display_commit(commit.sha(), commit.message());

        match commit.change() {
            Change::Breaking => major = true,
            Change::Feat => minor = true,
            Change::Fix => patch = true,
            Change::None => {}
        }
    }

    let new_version = version.bump(major, minor, patch);

    if new_version == version {
        ui::display_status("no version change");
        return Ok(Outcome::NoChange);
    }

    ui::display_status(&format!("new version: {}", new_version));

    // The bump changed the version, so at least one commit was classified
    let reference = commits
        .last()
        .ok_or_else(|| TaggerError::provider("push", "no commit to reference"))?;

    if options.dry_run {
        ui::display_status(&format!(
            "dry run: would tag {} at commit {}",
            new_version,
            reference.sha()
        ));
        return Ok(Outcome::DryRun(new_version));
    }

    if !options.assume_yes
        && !ui::confirm_action(&format!("Create and push tag {}?", new_version))?
    {
        ui::display_status("operation cancelled");
        return Ok(Outcome::Cancelled);
    }

    provider.push(reference, &new_version)?;
    ui::display_success(&format!("pushed tag {}", new_version));

    Ok(Outcome::Pushed(new_version))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Commit, Tag};
    use crate::provider::MockProvider;

    fn yes() -> ProcessOptions {
        ProcessOptions {
            assume_yes: true,
            dry_run: false,
        }
    }

    #[test]
    fn test_feat_and_fix_bump_minor() {
        let provider = MockProvider::new(
            Tag::new("v1.0.0"),
            vec![Commit::new("a1", "feat: x"), Commit::new("b2", "fix: y")],
        );

        let outcome = run(&provider, &yes()).unwrap();
        assert_eq!(outcome, Outcome::Pushed(Version::new(1, 1, 0)));

        let pushed = provider.pushed();
        assert_eq!(pushed.len(), 1);
        assert_eq!(pushed[0].0.sha(), "b2");
        assert_eq!(pushed[0].1, Version::new(1, 1, 0));
    }

    #[test]
    fn test_docs_only_is_no_change() {
        let provider = MockProvider::new(
            Tag::new("v1.0.0"),
            vec![Commit::new("a1", "docs: x")],
        );

        let outcome = run(&provider, &yes()).unwrap();
        assert_eq!(outcome, Outcome::NoChange);
        assert!(provider.pushed().is_empty());
    }

    #[test]
    fn test_no_commits_is_no_change() {
        let provider = MockProvider::new(Tag::new("v2.3.4"), vec![]);

        let outcome = run(&provider, &yes()).unwrap();
        assert_eq!(outcome, Outcome::NoChange);
        assert!(provider.pushed().is_empty());
    }

    #[test]
    fn test_breaking_dominates() {
        let provider = MockProvider::new(
            Tag::new("v1.2.3"),
            vec![
                Commit::new("a1", "feat: x"),
                Commit::new("b2", "chore!: drop support"),
                Commit::new("c3", "fix: y"),
            ],
        );

        let outcome = run(&provider, &yes()).unwrap();
        assert_eq!(outcome, Outcome::Pushed(Version::new(2, 0, 0)));
        assert_eq!(provider.pushed()[0].0.sha(), "c3");
    }

    #[test]
    fn test_empty_tag_bootstraps_from_zero() {
        let provider = MockProvider::new(
            Tag::empty(),
            vec![Commit::new("a1", "fix: first bug")],
        );

        let outcome = run(&provider, &yes()).unwrap();
        assert_eq!(outcome, Outcome::Pushed(Version::new(0, 0, 1)));
    }

    #[test]
    fn test_invalid_existing_tag_is_fatal() {
        let provider = MockProvider::new(
            Tag::new("release-7"),
            vec![Commit::new("a1", "feat: x")],
        );

        let err = run(&provider, &yes()).unwrap_err();
        assert!(matches!(err, TaggerError::InvalidTag(_)));
        assert!(provider.pushed().is_empty());
    }

    #[test]
    fn test_provider_failure_propagates() {
        let provider =
            MockProvider::new(Tag::new("v1.0.0"), vec![]).fail_on("latest_tag");
        assert!(run(&provider, &yes()).is_err());

        let provider = MockProvider::new(Tag::new("v1.0.0"), vec![Commit::new("a1", "feat: x")])
            .fail_on("push");
        assert!(run(&provider, &yes()).is_err());
    }

    #[test]
    fn test_dry_run_pushes_nothing() {
        let provider = MockProvider::new(
            Tag::new("v1.0.0"),
            vec![Commit::new("a1", "feat: x")],
        );
        let options = ProcessOptions {
            assume_yes: true,
            dry_run: true,
        };

        let outcome = run(&provider, &options).unwrap();
        assert_eq!(outcome, Outcome::DryRun(Version::new(1, 1, 0)));
        assert!(provider.pushed().is_empty());
    }

    #[test]
    fn test_second_run_with_no_new_commits_is_idempotent() {
        // First run pushes v1.1.0
        let provider = MockProvider::new(
            Tag::new("v1.0.0"),
            vec![Commit::new("a1", "feat: x")],
        );
        assert_eq!(
            run(&provider, &yes()).unwrap(),
            Outcome::Pushed(Version::new(1, 1, 0))
        );

        // Second run sees the new tag and no commits since it
        let provider = MockProvider::new(Tag::new("v1.1.0"), vec![]);
        assert_eq!(run(&provider, &yes()).unwrap(), Outcome::NoChange);
    }
}
