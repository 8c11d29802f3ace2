use std::fmt;
use std::str::FromStr;

use crate::GitError;

/// Version reported by `git --version`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GitVersion {
    /// Major component.
    pub major: u32,
    /// Minor component.
    pub minor: u32,
    /// Patch component, zero when omitted.
    pub patch: u32,
}

impl GitVersion {
    /// Construct a version from its components.
    #[must_use]
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }
}

impl FromStr for GitVersion {
    type Err = GitError;

    /// Parse output such as `git version 2.39.2 (Apple Git-143)` or
    /// `git version 2.42.0.windows.2`.
    fn from_str(output: &str) -> Result<Self, Self::Err> {
        let token = output
            .trim()
            .strip_prefix("git version ")
            .and_then(|rest| rest.split_whitespace().next())
            .ok_or_else(|| GitError::parse(format!("not a version string: {output:?}")))?;

        let mut numbers = token.split('.').map_while(|part| part.parse::<u32>().ok());
        let (Some(major), Some(minor)) = (numbers.next(), numbers.next()) else {
            return Err(GitError::parse(format!("malformed version: {token:?}")));
        };
        let patch = numbers.next().unwrap_or(0);

        Ok(Self::new(major, minor, patch))
    }
}

impl fmt::Display for GitVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}
