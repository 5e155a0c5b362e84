//! Canonical form of a shared remote repository reference.
//!
//! Accepted inputs:
//!
//! ```text
//! owner/project
//! owner/project.git
//! github.com/owner/project
//! https://github.com/owner/project.git
//! http://git.example.org/owner/project
//! git@github.com:owner/project.git
//! ```
//!
//! Whatever the input form, the descriptor always carries both an HTTPS URL
//! ending in `.git` and an SSH URL `git@<host>:<owner>/<project>.git`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{malformed, RemoteError};
use crate::paths;
use crate::types::{ProjectName, UrlForm};

/// Host used when the reference names none.
pub const DEFAULT_HOST: &str = "github.com";
/// Scheme used when the reference names none.
pub const DEFAULT_SCHEME: &str = "https";

/// Immutable, parsed remote reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteDescriptor {
    pub scheme: String,
    pub host: String,
    pub owner: String,
    pub project: ProjectName,
    pub https_url: String,
    pub ssh_url: String,
}

impl RemoteDescriptor {
    /// Parse a raw reference. Pure; fails with
    /// [`RemoteError::MalformedReference`] when owner or project is missing.
    pub fn parse(raw: &str) -> Result<Self, RemoteError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(malformed(raw, "reference is empty"));
        }

        let (scheme, host, path) = if let Some(rest) = trimmed.strip_prefix("git@") {
            let (host, path) = rest
                .split_once(':')
                .ok_or_else(|| malformed(raw, "ssh reference is missing ':' after the host"))?;
            if host.is_empty() {
                return Err(malformed(raw, "ssh reference has an empty host"));
            }
            (DEFAULT_SCHEME.to_owned(), Some(host.to_owned()), path)
        } else if let Some((scheme, rest)) = trimmed.split_once("://") {
            let scheme = scheme.to_ascii_lowercase();
            if scheme != "https" && scheme != "http" {
                return Err(malformed(raw, format!("unsupported scheme '{scheme}'")));
            }
            (scheme, None, rest)
        } else {
            (DEFAULT_SCHEME.to_owned(), None, trimmed)
        };

        let segments: Vec<&str> = path.trim_end_matches('/').split('/').collect();
        let (host, owner, project) = match (host, segments.as_slice()) {
            (Some(host), [owner, project]) => (host, *owner, *project),
            (None, [owner, project]) => (DEFAULT_HOST.to_owned(), *owner, *project),
            (None, [host, owner, project]) if host.contains('.') => {
                ((*host).to_owned(), *owner, *project)
            }
            (_, [_]) => return Err(malformed(raw, "expected '<owner>/<project>'")),
            _ => return Err(malformed(raw, "unexpected path segments")),
        };

        let project = project.strip_suffix(".git").unwrap_or(project);
        if owner.is_empty() {
            return Err(malformed(raw, "owner is missing"));
        }
        if project.is_empty() {
            return Err(malformed(raw, "project name is missing"));
        }
        if owner.chars().chain(project.chars()).any(char::is_whitespace) {
            return Err(malformed(raw, "owner and project must not contain whitespace"));
        }
        if [owner, project].iter().any(|s| !paths::is_plain_segment(s)) {
            return Err(malformed(raw, "owner and project must be plain names, not '.' or '..'"));
        }

        Ok(Self {
            https_url: format!("{scheme}://{host}/{owner}/{project}.git"),
            ssh_url: format!("git@{host}:{owner}/{project}.git"),
            scheme,
            host,
            owner: owner.to_owned(),
            project: ProjectName::from(project),
        })
    }

    /// URL for the requested form.
    pub fn url(&self, form: UrlForm) -> &str {
        match form {
            UrlForm::Https => &self.https_url,
            UrlForm::Ssh => &self.ssh_url,
        }
    }
}

impl FromStr for RemoteDescriptor {
    type Err = RemoteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for RemoteDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.project)
    }
}
