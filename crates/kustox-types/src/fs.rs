//! Virtual file-system vocabulary for the result space.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// URI scheme of the result space.
pub const RESULT_SCHEME: &str = "kustox-ai";
/// URI authority of the result space.
pub const RESULT_AUTHORITY: &str = "results";
/// The only file the result space ever lists.
pub const LATEST_RESULT_PATH: &str = "/latest-result.json";
/// File name of [`LATEST_RESULT_PATH`] as it appears in a directory listing.
pub const LATEST_RESULT_NAME: &str = "latest-result.json";
pub const ROOT_PATH: &str = "/";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid URI '{0}': expected scheme://authority/path")]
pub struct UriParseError(pub String);

/// A `scheme://authority/path` address.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResultUri {
    pub scheme: String,
    pub authority: String,
    pub path: String,
}

impl ResultUri {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            scheme: RESULT_SCHEME.to_string(),
            authority: RESULT_AUTHORITY.to_string(),
            path: path.into(),
        }
    }

    /// Canonical URI of the latest-result document.
    pub fn latest() -> Self {
        Self::new(LATEST_RESULT_PATH)
    }

    pub fn root() -> Self {
        Self::new(ROOT_PATH)
    }

    /// True when scheme and authority name the result space.
    pub fn is_result_space(&self) -> bool {
        self.scheme == RESULT_SCHEME && self.authority == RESULT_AUTHORITY
    }

    pub fn is_root(&self) -> bool {
        self.is_result_space() && (self.path.is_empty() || self.path == ROOT_PATH)
    }

    pub fn is_latest(&self) -> bool {
        self.is_result_space() && self.path == LATEST_RESULT_PATH
    }

    pub fn parse(s: &str) -> Result<Self, UriParseError> {
        s.parse()
    }
}

impl FromStr for ResultUri {
    type Err = UriParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (scheme, rest) = s
            .split_once("://")
            .ok_or_else(|| UriParseError(s.to_string()))?;
        if scheme.is_empty() {
            return Err(UriParseError(s.to_string()));
        }

        let (authority, path) = match rest.find('/') {
            Some(idx) => (&rest[..idx], &rest[idx..]),
            None => (rest, ""),
        };

        Ok(Self {
            scheme: scheme.to_string(),
            authority: authority.to_string(),
            path: path.to_string(),
        })
    }
}

impl fmt::Display for ResultUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://{}{}", self.scheme, self.authority, self.path)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileType {
    File,
    Directory,
}

/// Metadata returned by `stat`. Instants are ms since the Unix epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileStat {
    #[serde(rename = "type")]
    pub file_type: FileType,
    pub ctime: i64,
    pub mtime: i64,
    pub size: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileChangeType {
    Created,
    Changed,
    Deleted,
}

/// Notification delivered to watchers of the result space.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileChangeEvent {
    pub change: FileChangeType,
    pub uri: ResultUri,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latest_uri_round_trips_through_display() {
        let uri = ResultUri::latest();
        assert_eq!(uri.to_string(), "kustox-ai://results/latest-result.json");
        assert_eq!(ResultUri::parse(&uri.to_string()).unwrap(), uri);
        assert!(uri.is_latest());
        assert!(!uri.is_root());
    }

    #[test]
    fn test_parse_root_forms() {
        assert!(ResultUri::parse("kustox-ai://results/").unwrap().is_root());
        assert!(ResultUri::parse("kustox-ai://results").unwrap().is_root());
    }

    #[test]
    fn test_parse_nested_path() {
        let uri = ResultUri::parse("kustox-ai://results/.git/config").unwrap();
        assert_eq!(uri.authority, "results");
        assert_eq!(uri.path, "/.git/config");
    }

    #[test]
    fn test_foreign_space_is_neither_root_nor_latest() {
        let workspace = ResultUri::parse("file://my-workspace/").unwrap();
        assert!(!workspace.is_result_space());
        assert!(!workspace.is_root());

        let other_authority = ResultUri::parse("kustox-ai://elsewhere/latest-result.json").unwrap();
        assert!(!other_authority.is_result_space());
        assert!(!other_authority.is_latest());

        let other_scheme = ResultUri::parse("https://results/latest-result.json").unwrap();
        assert!(!other_scheme.is_latest());
    }

    #[test]
    fn test_parse_rejects_missing_scheme() {
        assert!(ResultUri::parse("/latest-result.json").is_err());
        assert!(ResultUri::parse("://results/x").is_err());
    }
}
