use crate::error::{Result, TaggerError};
use std::fmt;

/// Semantic version representation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Version {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl Version {
    /// Create a new version
    pub fn new(major: u32, minor: u32, patch: u32) -> Self {
        Version {
            major,
            minor,
            patch,
        }
    }

    /// Parse a version from a tag string.
    ///
    /// An empty tag means "no tags yet" and parses to 0.0.0. A non-empty tag
    /// must start with `v` followed by one to three dot-separated numbers;
    /// missing trailing components default to 0 ("v1.2" -> 1.2.0).
    pub fn parse(tag: &str) -> Result<Self> {
        if tag.is_empty() {
            return Ok(Version::default());
        }

        let rest = tag
            .strip_prefix('v')
            .ok_or_else(|| TaggerError::invalid_tag(tag))?;

        let chunks: Vec<&str> = rest.split('.').collect();
        if chunks.len() > 3 {
            return Err(TaggerError::invalid_tag(tag));
        }

        let mut parts = [0u32; 3];
        for (i, chunk) in chunks.iter().enumerate() {
            parts[i] = chunk
                .parse::<u32>()
                .map_err(|_| TaggerError::invalid_tag(tag))?;
        }

        Ok(Version::new(parts[0], parts[1], parts[2]))
    }

    /// Bump the version according to the detected change flags.
    ///
    /// Priority is major > minor > patch; with no flags set the version is
    /// returned unchanged.
    pub fn bump(&self, major: bool, minor: bool, patch: bool) -> Self {
        if major {
            Version::new(self.major + 1, 0, 0)
        } else if minor {
            Version::new(self.major, self.minor + 1, 0)
        } else if patch {
            Version::new(self.major, self.minor, self.patch + 1)
        } else {
            *self
        }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Canonical form: always three components
        write!(f, "v{}.{}.{}", self.major, self.minor, self.patch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_empty_is_zero() {
        assert_eq!(Version::parse("").unwrap(), Version::new(0, 0, 0));
    }

    #[test]
    fn test_parse_full() {
        assert_eq!(Version::parse("v1.2.3").unwrap(), Version::new(1, 2, 3));
    }

    #[test]
    fn test_parse_partial_defaults_to_zero() {
        assert_eq!(Version::parse("v1").unwrap(), Version::new(1, 0, 0));
        assert_eq!(Version::parse("v1.2").unwrap(), Version::new(1, 2, 0));
    }

    #[test]
    fn test_parse_invalid() {
        assert!(Version::parse("latest").is_err());
        assert!(Version::parse("v").is_err());
        assert!(Version::parse("v1.2.3.4").is_err());
        assert!(Version::parse("v1.x.3").is_err());
        assert!(Version::parse("1.2.3").is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(Version::new(1, 2, 3).to_string(), "v1.2.3");
        assert_eq!(Version::new(1, 0, 0).to_string(), "v1.0.0");
    }

    #[test]
    fn test_parse_format_round_trip() {
        let v = Version::new(4, 0, 7);
        assert_eq!(Version::parse(&v.to_string()).unwrap(), v);
    }

    #[test]
    fn test_bump_major_dominates() {
        let v = Version::new(1, 2, 3);
        assert_eq!(v.bump(true, true, true), Version::new(2, 0, 0));
    }

    #[test]
    fn test_bump_minor() {
        let v = Version::new(1, 2, 3);
        assert_eq!(v.bump(false, true, true), Version::new(1, 3, 0));
    }

    #[test]
    fn test_bump_patch() {
        let v = Version::new(1, 2, 3);
        assert_eq!(v.bump(false, false, true), Version::new(1, 2, 4));
    }

    #[test]
    fn test_bump_no_flags_unchanged() {
        let v = Version::new(1, 2, 3);
        assert_eq!(v.bump(false, false, false), v);
    }
}
