use crate::domain::Version;
use crate::error::Result;
use std::fmt;

/// A tag label as reported by a provider.
///
/// An empty tag is the bootstrap case: it means the repository has no tags
/// yet and parses to version 0.0.0.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tag(String);

impl Tag {
    /// Create a tag from a provider-supplied label
    pub fn new(name: impl Into<String>) -> Self {
        Tag(name.into())
    }

    /// The empty "no tags yet" tag
    pub fn empty() -> Self {
        Tag::default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Parse the tag into a version. Fails on malformed non-empty tags.
    pub fn version(&self) -> Result<Version> {
        Version::parse(&self.0)
    }

    /// Whether this is a non-empty tag that encodes a version
    pub fn is_valid(&self) -> bool {
        !self.is_empty() && self.version().is_ok()
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
