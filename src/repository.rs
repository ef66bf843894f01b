//! # Source Repository References
//!
//! Config repositories and SCM definitions are both derived from the same
//! list of `org/repo` references. This module validates those references and
//! derives everything a collection member needs from them: a stable member
//! id (the last path segment) and a normalized SSH remote URL.
//!
//! Validation happens for the whole list before any member is written, so a
//! single malformed entry aborts the pass instead of leaving a partially
//! rewritten collection behind.

use std::collections::HashSet;

use regex::Regex;

use crate::error::{Error, Result};

/// Characters accepted in a single path segment of a reference.
const SEGMENT_PATTERN: &str = r"^[A-Za-z0-9_.-]+$";

/// A validated `org/repo` style source repository reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryRef {
    path: String,
    id: String,
}

impl RepositoryRef {
    /// Parse a single reference such as `acme/service`.
    ///
    /// A trailing `.git` is accepted and stripped. Nested paths
    /// (`group/subgroup/repo`) are allowed; the id is always the last segment.
    pub fn parse(reference: &str) -> Result<Self> {
        Self::parse_with(reference, &segment_regex()?)
    }

    /// Parse a reference against an already compiled segment pattern.
    fn parse_with(reference: &str, segment_re: &Regex) -> Result<Self> {
        let invalid = |message: &str| Error::InvalidRepositoryReference {
            reference: reference.to_string(),
            message: message.to_string(),
        };

        if reference.is_empty() {
            return Err(invalid("reference is empty"));
        }
        if reference.chars().any(char::is_whitespace) {
            return Err(invalid("reference contains whitespace"));
        }

        let path = reference.strip_suffix(".git").unwrap_or(reference);
        if !path.contains('/') {
            return Err(invalid("expected an 'org/repo' reference"));
        }

        let segments: Vec<&str> = path.split('/').collect();
        for segment in &segments {
            if segment.is_empty() {
                return Err(invalid("empty path segment"));
            }
            if *segment == "." || *segment == ".." || !segment_re.is_match(segment) {
                return Err(invalid(&format!("invalid path segment '{}'", segment)));
            }
        }

        let id = segments
            .last()
            .map(|s| s.to_string())
            .ok_or_else(|| invalid("no path segment to derive an id from"))?;

        Ok(Self {
            path: path.to_string(),
            id,
        })
    }

    /// The stable member id, i.e. the last path segment.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The normalized `org/repo` path without any `.git` suffix.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// SSH remote URL in `git@host:org/repo.git` form.
    pub fn git_url(&self, host: &str) -> String {
        format!("git@{}:{}.git", host, self.path)
    }
}

fn segment_regex() -> Result<Regex> {
    Ok(Regex::new(SEGMENT_PATTERN)?)
}

/// Parse every reference in `references`, failing on the first bad one.
///
/// Two references that derive the same id are rejected as well, since both
/// GoCD collections key their members by id.
pub fn parse_all<S: AsRef<str>>(references: &[S]) -> Result<Vec<RepositoryRef>> {
    let segment_re = segment_regex()?;
    let mut seen = HashSet::new();
    let mut parsed = Vec::with_capacity(references.len());

    for reference in references {
        let repo = RepositoryRef::parse_with(reference.as_ref(), &segment_re)?;
        if !seen.insert(repo.id().to_string()) {
            return Err(Error::InvalidRepositoryReference {
                reference: reference.as_ref().to_string(),
                message: format!("id '{}' is already used by another reference", repo.id()),
            });
        }
        parsed.push(repo);
    }

    Ok(parsed)
}
