use regex::Regex;

use crate::domain::BumpLevel;

/// Parsed representation of a conventional commit message
///
/// Derived once per raw commit. Malformed headers never fail: the commit is
/// retained with an empty type and the raw message as description, so one
/// unparsable commit can never abort a release.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConventionalCommit {
    pub r#type: String,
    pub scope: Option<String>,
    pub description: String,
    pub is_breaking_change: bool,
    pub sha: String,
}

impl ConventionalCommit {
    /// Parse a commit message according to conventional commits spec
    /// Supports formats:
    /// - type(scope)!: description
    /// - type(scope): description
    /// - type!: description
    /// - type: description
    /// - non-conventional text (kept, empty type)
    pub fn parse(sha: impl Into<String>, message: &str) -> Self {
        let sha = sha.into();

        // Try format: type(scope)!: description
        if let Some(captures) = Regex::new(r"^([a-z]+)\(([^)]+)\)(!?):\s*(.*)")
            .ok()
            .and_then(|re| re.captures(message))
        {
            let r#type = captures
                .get(1)
                .map(|m| m.as_str().to_string())
                .unwrap_or_default();
            let scope = captures.get(2).map(|m| m.as_str().to_string());
            let has_exclamation = captures.get(3).map(|m| m.as_str()) == Some("!");
            let description = captures
                .get(4)
                .map(|m| m.as_str().to_string())
                .unwrap_or_default();

            let is_breaking = has_exclamation || message.contains("BREAKING CHANGE:");

            return ConventionalCommit {
                r#type,
                scope,
                description,
                is_breaking_change: is_breaking,
                sha,
            };
        }

        // Try format: type!: description
        if let Some(captures) = Regex::new(r"^([a-z]+)!:\s*(.*)")
            .ok()
            .and_then(|re| re.captures(message))
        {
            let r#type = captures
                .get(1)
                .map(|m| m.as_str().to_string())
                .unwrap_or_default();
            let description = captures
                .get(2)
                .map(|m| m.as_str().to_string())
                .unwrap_or_default();

            return ConventionalCommit {
                r#type,
                scope: None,
                description,
                is_breaking_change: true,
                sha,
            };
        }

        // Try format: type: description
        if let Some(captures) = Regex::new(r"^([a-z]+):\s*(.*)")
            .ok()
            .and_then(|re| re.captures(message))
        {
            let r#type = captures
                .get(1)
                .map(|m| m.as_str().to_string())
                .unwrap_or_default();
            let description = captures
                .get(2)
                .map(|m| m.as_str().to_string())
                .unwrap_or_default();

            let is_breaking = message.contains("BREAKING CHANGE:");

            return ConventionalCommit {
                r#type,
                scope: None,
                description,
                is_breaking_change: is_breaking,
                sha,
            };
        }

        // Non-conventional commit: keep it, it just carries no bump weight
        ConventionalCommit {
            r#type: String::new(),
            scope: None,
            description: message.trim().to_string(),
            is_breaking_change: false,
            sha,
        }
    }

    /// The version change this single commit justifies.
    ///
    /// `feat` commits are minor, `fix` and `perf` are patch, everything else
    /// is informational. A breaking marker overrides the declared type.
    pub fn bump_level(&self) -> BumpLevel {
        if self.is_breaking_change {
            return BumpLevel::Major;
        }

        match self.r#type.as_str() {
            "feat" => BumpLevel::Minor,
            "fix" | "perf" => BumpLevel::Patch,
            _ => BumpLevel::None,
        }
    }

    /// Abbreviated commit hash for changelog references
    pub fn short_sha(&self) -> &str {
        if self.sha.len() > 7 {
            &self.sha[..7]
        } else {
            &self.sha
        }
    }
}
