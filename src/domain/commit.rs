use std::fmt;

/// Change category derived from a conventional-commit message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Change {
    None,
    Breaking,
    Feat,
    Fix,
}

impl fmt::Display for Change {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Change::None => "none",
            Change::Breaking => "breaking",
            Change::Feat => "feat",
            Change::Fix => "fix",
        };
        f.write_str(name)
    }
}

/// A commit with a stable identifier and its first message line.
///
/// Providers are responsible for separating the identifier from the message;
/// the classifier only ever sees the clean message text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    sha: String,
    message: String,
}

impl Commit {
    /// Create a commit. Only the first line of the message is kept.
    pub fn new(sha: impl Into<String>, message: impl Into<String>) -> Self {
        let message = message.into();
        let first_line = message.lines().next().unwrap_or("").trim().to_string();
        Commit {
            sha: sha.into(),
            message: first_line,
        }
    }

    pub fn sha(&self) -> &str {
        &self.sha
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Classify the commit message into a change category.
    ///
    /// The type token is everything before the first `:`. A trailing `!`
    /// marks a breaking change regardless of the type; otherwise a `feat` or
    /// `fix` prefix decides (scopes like `feat(lang)` are covered by the
    /// prefix match). No colon means no conventional type.
    pub fn change(&self) -> Change {
        let Some((type_token, _)) = self.message.split_once(':') else {
            return Change::None;
        };

        if type_token.ends_with('!') {
            Change::Breaking
        } else if type_token.starts_with("feat") {
            Change::Feat
        } else if type_token.starts_with("fix") {
            Change::Fix
        } else {
            Change::None
        }
    }
}
