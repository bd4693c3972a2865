use crate::domain::{Commit, Tag, Version};
use crate::error::{Result, TaggerError};
use crate::provider::Provider;
use std::sync::Mutex;

/// Mock provider for testing without git or network access
pub struct MockProvider {
    tag: Tag,
    commits: Vec<Commit>,
    fail_on: Option<&'static str>,
    pushed: Mutex<Vec<(Commit, Version)>>,
}

impl MockProvider {
    /// Create a mock holding the given latest tag and commit history
    pub fn new(tag: Tag, commits: Vec<Commit>) -> Self {
        MockProvider {
            tag,
            commits,
            fail_on: None,
            pushed: Mutex::new(Vec::new()),
        }
    }

    /// Arm the named operation ("latest_tag", "commits_since" or "push") to fail
    pub fn fail_on(mut self, operation: &'static str) -> Self {
        self.fail_on = Some(operation);
        self
    }

    /// Pushes recorded so far, in order
    pub fn pushed(&self) -> Vec<(Commit, Version)> {
        self.pushed.lock().unwrap().clone()
    }

    fn check(&self, operation: &str) -> Result<()> {
        if self.fail_on == Some(operation) {
            return Err(TaggerError::provider(operation, "mock failure"));
        }
        Ok(())
    }
}

impl Provider for MockProvider {
    fn latest_tag(&self) -> Result<Tag> {
        self.check("latest_tag")?;
        Ok(self.tag.clone())
    }

    fn commits_since(&self, _tag: &Tag) -> Result<Vec<Commit>> {
        self.check("commits_since")?;
        Ok(self.commits.clone())
    }

    fn push(&self, reference: &Commit, version: &Version) -> Result<()> {
        self.check("push")?;
        self.pushed
            .lock()
            .unwrap()
            .push((reference.clone(), *version));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_returns_configured_history() {
        let mock = MockProvider::new(
            Tag::new("v1.0.0"),
            vec![Commit::new("a1", "feat: x")],
        );

        assert_eq!(mock.latest_tag().unwrap(), Tag::new("v1.0.0"));
        assert_eq!(mock.commits_since(&Tag::empty()).unwrap().len(), 1);
    }

    #[test]
    fn test_mock_records_pushes() {
        let mock = MockProvider::new(Tag::empty(), vec![]);
        let commit = Commit::new("b2", "fix: y");
        mock.push(&commit, &Version::new(1, 1, 0)).unwrap();

        let pushed = mock.pushed();
        assert_eq!(pushed.len(), 1);
        assert_eq!(pushed[0].0.sha(), "b2");
        assert_eq!(pushed[0].1, Version::new(1, 1, 0));
    }

    #[test]
    fn test_mock_armed_failure() {
        let mock = MockProvider::new(Tag::empty(), vec![]).fail_on("latest_tag");
        assert!(mock.latest_tag().is_err());
        assert!(mock.commits_since(&Tag::empty()).is_ok());
    }
}
