use crate::domain::{Commit, Tag, Version};
use crate::error::{Result, TaggerError};
use crate::provider::Provider;
use git2::{Oid, Repository};
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::path::Path;

/// Whether `candidate` should replace `current` for a commit both tags
/// point at. A parseable version beats an unparseable one, and a higher
/// version beats a lower one.
fn prefer_tag(candidate: &str, current: &str) -> bool {
    match (Version::parse(candidate), Version::parse(current)) {
        (Ok(a), Ok(b)) => (a.major, a.minor, a.patch) > (b.major, b.minor, b.patch),
        (Ok(_), Err(_)) => true,
        _ => false,
    }
}

/// Provider backed by the local git repository via the `git2` crate.
///
/// Reads history from `HEAD`; pushes go to the `origin` remote.
pub struct GitProvider {
    repo: Repository,
}

impl GitProvider {
    /// Discover the repository containing `path`
    pub fn discover<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = Repository::discover(path)?;
        Ok(GitProvider { repo })
    }

    fn head_oid(&self) -> Result<Option<Oid>> {
        match self.repo.head() {
            Ok(head) => Ok(head.target()),
            // Unborn branch: an empty repository has no tags and no commits
            Err(e) if e.code() == git2::ErrorCode::UnbornBranch => Ok(None),
            Err(e) if e.code() == git2::ErrorCode::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Map every tag to the OID of the commit it points at, peeling
    /// annotated tags. When several tags share a commit the highest
    /// version wins.
    fn tag_targets(&self) -> Result<HashMap<Oid, String>> {
        let mut targets: HashMap<Oid, String> = HashMap::new();

        for tag_name in self.repo.tag_names(None)?.iter().flatten() {
            let reference_name = format!("refs/tags/{}", tag_name);
            if let Ok(reference) = self.repo.find_reference(&reference_name) {
                if let Ok(object) = reference.peel(git2::ObjectType::Commit) {
                    match targets.entry(object.id()) {
                        Entry::Vacant(slot) => {
                            slot.insert(tag_name.to_string());
                        }
                        Entry::Occupied(mut slot) => {
                            if prefer_tag(tag_name, slot.get()) {
                                slot.insert(tag_name.to_string());
                            }
                        }
                    }
                }
            }
        }

        Ok(targets)
    }

    fn tag_oid(&self, tag: &Tag) -> Result<Oid> {
        let reference_name = format!("refs/tags/{}", tag);
        let reference = self.repo.find_reference(&reference_name).map_err(|e| {
            TaggerError::provider("log", format!("cannot find tag '{}': {}", tag, e))
        })?;

        let object = reference
            .peel(git2::ObjectType::Commit)
            .map_err(|e| TaggerError::provider("log", format!("cannot peel tag '{}': {}", tag, e)))?;

        Ok(object.id())
    }

    fn create_tag(&self, name: &str, oid: Oid) -> Result<()> {
        let object = self
            .repo
            .find_object(oid, None)
            .map_err(|e| TaggerError::provider("tag", format!("cannot find commit: {}", e)))?;

        self.repo
            .tag_lightweight(name, &object, false)
            .map_err(|e| TaggerError::provider("tag", format!("cannot create tag: {}", e)))?;

        Ok(())
    }

    fn push_tag(&self, name: &str) -> Result<()> {
        let mut remote = self
            .repo
            .find_remote("origin")
            .map_err(|e| TaggerError::provider("push", format!("cannot find remote: {}", e)))?;

        let mut push_options = git2::PushOptions::new();

        let mut callbacks = git2::RemoteCallbacks::new();
        callbacks.credentials(|_url, username_from_url, allowed_types| {
            if allowed_types.contains(git2::CredentialType::SSH_KEY) {
                let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
                for key in ["id_ed25519", "id_rsa", "id_ecdsa"] {
                    let key_path = format!("{}/.ssh/{}", home, key);
                    let path = std::path::Path::new(&key_path);
                    if path.exists() {
                        if let Ok(cred) = git2::Cred::ssh_key(
                            username_from_url.unwrap_or("git"),
                            None,
                            path,
                            None,
                        ) {
                            return Ok(cred);
                        }
                    }
                }

                if let Ok(cred) =
                    git2::Cred::ssh_key_from_agent(username_from_url.unwrap_or("git"))
                {
                    return Ok(cred);
                }
            }

            git2::Cred::default()
        });
        push_options.remote_callbacks(callbacks);

        let refspec = format!("refs/tags/{}:refs/tags/{}", name, name);
        remote
            .push(&[refspec.as_str()], Some(&mut push_options))
            .map_err(|e| TaggerError::provider("push", e.to_string()))?;

        Ok(())
    }
}

impl Provider for GitProvider {
    fn latest_tag(&self) -> Result<Tag> {
        let Some(head) = self.head_oid()? else {
            return Ok(Tag::empty());
        };

        let targets = self.tag_targets()?;
        if targets.is_empty() {
            return Ok(Tag::empty());
        }

        // Walk back from HEAD; the first tagged commit carries the most
        // recent reachable tag.
        let mut revwalk = self.repo.revwalk()?;
        revwalk.push(head)?;

        for oid in revwalk {
            let oid = oid?;
            if let Some(name) = targets.get(&oid) {
                return Ok(Tag::new(name.clone()));
            }
        }

        Ok(Tag::empty())
    }

    fn commits_since(&self, tag: &Tag) -> Result<Vec<Commit>> {
        let Some(head) = self.head_oid()? else {
            return Ok(Vec::new());
        };

        let mut revwalk = self.repo.revwalk()?;
        revwalk.push(head)?;
        if !tag.is_empty() {
            // Hiding the tagged commit excludes everything reachable from
            // it, so commits on merged side branches stay attributed to
            // the range they belong to
            revwalk.hide(self.tag_oid(tag)?)?;
        }

        let mut commits = Vec::new();
        for oid in revwalk {
            let oid = oid?;
            let commit = self.repo.find_commit(oid)?;
            let message = commit.summary().unwrap_or("").to_string();
            commits.push(Commit::new(oid.to_string(), message));
        }

        // Chronological order: the last element is the tip to tag
        commits.reverse();
        Ok(commits)
    }

    fn push(&self, reference: &Commit, version: &Version) -> Result<()> {
        let oid = Oid::from_str(reference.sha())
            .map_err(|e| TaggerError::provider("tag", format!("invalid commit id: {}", e)))?;

        let name = version.to_string();
        self.create_tag(&name, oid)?;
        self.push_tag(&name)
    }
}
