//! Parsing and comparison of server version strings.

use std::{fmt, str::FromStr};

use semver::Version;

use crate::error::{Error, Result};

/// A server version as reported in the `version` field of `buildInfo`.
///
/// Versions follow semver precedence: a version with a pre-release suffix (`4.0.0-rc1`) sorts
/// before the release it precedes, and the number in a server pre-release tag is compared
/// numerically, so `4.4.0-rc2` sorts before `4.4.0-rc10`.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ServerVersion(Version);

impl ServerVersion {
    /// Creates a release version.
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self(Version::new(major, minor, patch))
    }

    /// Parses a version string such as `"4.0.0"`, `"3.6"` or `"4.2.1-rc0"`. Missing minor and
    /// patch numbers default to 0.
    pub fn parse(version: &str) -> Result<Self> {
        let trimmed = version.trim();
        let (numbers, pre_release) = match trimmed.split_once('-') {
            Some((numbers, pre_release)) => (numbers, Some(pre_release)),
            None => (trimmed, None),
        };

        let mut normalized = numbers.to_string();
        for _ in numbers.split('.').count()..3 {
            normalized.push_str(".0");
        }
        if let Some(pre_release) = pre_release {
            normalized.push('-');
            normalized.push_str(&split_tag_numbers(pre_release));
        }

        Version::parse(&normalized).map(Self).map_err(|e| {
            Error::invalid_response(format!("invalid server version {:?}: {}", version, e))
        })
    }

    /// The major version number.
    pub fn major(&self) -> u64 {
        self.0.major
    }

    /// The minor version number.
    pub fn minor(&self) -> u64 {
        self.0.minor
    }

    /// The patch version number.
    pub fn patch(&self) -> u64 {
        self.0.patch
    }

    /// Whether this is a pre-release build.
    pub fn is_pre_release(&self) -> bool {
        !self.0.pre.is_empty()
    }

    /// The parsed version.
    pub fn as_semver(&self) -> &Version {
        &self.0
    }

    /// Whether this version is at least `major.minor`.
    pub fn is_at_least(&self, major: u64, minor: u64) -> bool {
        (self.0.major, self.0.minor) >= (major, minor)
    }
}

/// Server tags such as `rc10` become `rc.10` so their numbers compare numerically.
fn split_tag_numbers(pre_release: &str) -> String {
    pre_release
        .split('.')
        .map(|ident| {
            let tag = ident.trim_end_matches(|c: char| c.is_ascii_digit());
            let number = &ident[tag.len()..];
            let splittable = !tag.is_empty()
                && !number.is_empty()
                && tag.ends_with(|c: char| c.is_ascii_alphabetic())
                && !(number.len() > 1 && number.starts_with('0'));
            if splittable {
                format!("{}.{}", tag, number)
            } else {
                ident.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(".")
}

impl FromStr for ServerVersion {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl From<Version> for ServerVersion {
    fn from(version: Version) -> Self {
        Self(version)
    }
}

impl fmt::Display for ServerVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}
