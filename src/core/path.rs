//! Validated hierarchical path type.
//!
//! Every path that reaches a repository has been through [`PagePath::new`],
//! so downstream code never re-checks syntax.

use std::borrow::Borrow;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Reasons a string is not a valid [`PagePath`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    #[error("path is empty")]
    Empty,

    #[error("path must start with '/': `{0}`")]
    NotRooted(String),

    #[error("path contains an empty segment: `{0}`")]
    EmptySegment(String),

    #[error("path contains a '.' or '..' segment: `{0}`")]
    DotSegment(String),

    #[error("path contains a NUL character")]
    NulChar,

    #[error("path is not valid UTF-8 after decoding: `{0}`")]
    InvalidUtf8(String),
}

/// Slash-rooted, validated path (e.g. `/blog/post` or `/blog/`)
///
/// Invariants:
/// - Always starts with `/`
/// - No empty segments (`//`)
/// - No `.` or `..` segments
/// - No NUL characters
///
/// A trailing `/` is allowed and marks a directory-like path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PagePath(Arc<str>);

impl PagePath {
    /// Validate and wrap a path string.
    pub fn new(path: &str) -> Result<Self, PathError> {
        validate(path)?;
        Ok(Self(Arc::from(path)))
    }

    /// The root path `/`.
    pub fn root() -> Self {
        Self(Arc::from("/"))
    }

    /// Create from browser input (strip query/fragment, decode percent-encoding).
    ///
    /// Escapes that decode to invalid UTF-8 are rejected rather than kept verbatim.
    pub fn from_browser(encoded: &str) -> Result<Self, PathError> {
        use percent_encoding::percent_decode_str;

        let path = encoded.split(['?', '#']).next().unwrap_or(encoded).trim();
        let decoded = percent_decode_str(path)
            .decode_utf8()
            .map_err(|_| PathError::InvalidUtf8(path.to_string()))?;
        Self::new(&decoded)
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[inline]
    pub fn is_root(&self) -> bool {
        self.0.as_ref() == "/"
    }

    /// Directory-like path (ends with `/`).
    #[inline]
    pub fn is_dir(&self) -> bool {
        self.0.ends_with('/')
    }

    #[inline]
    pub fn ends_with(&self, suffix: &str) -> bool {
        self.0.ends_with(suffix)
    }

    /// Strip exactly one trailing `/` unless this is the root path.
    ///
    /// `/blog/` -> `/blog`, `/blog` -> `/blog`, `/` -> `/`
    pub fn without_trailing_slash(&self) -> Self {
        match self.0.strip_suffix('/') {
            Some(stripped) if !stripped.is_empty() => {
                // Dropping the final '/' of a valid non-root path cannot
                // introduce '//', a dot segment, or a NUL.
                debug_assert!(validate(stripped).is_ok());
                Self(Arc::from(stripped))
            }
            _ => self.clone(),
        }
    }
}

fn validate(path: &str) -> Result<(), PathError> {
    if path.is_empty() {
        return Err(PathError::Empty);
    }
    if !path.starts_with('/') {
        return Err(PathError::NotRooted(path.to_string()));
    }
    if path.contains('\0') {
        return Err(PathError::NulChar);
    }
    if path.contains("//") {
        return Err(PathError::EmptySegment(path.to_string()));
    }
    if path.contains("/./")
        || path.contains("/../")
        || path.ends_with("/.")
        || path.ends_with("/..")
    {
        return Err(PathError::DotSegment(path.to_string()));
    }
    Ok(())
}

impl fmt::Display for PagePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Default for PagePath {
    fn default() -> Self {
        Self::root()
    }
}

impl FromStr for PagePath {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<&str> for PagePath {
    type Error = PathError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl AsRef<str> for PagePath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for PagePath {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for PagePath {
    fn eq(&self, other: &str) -> bool {
        self.0.as_ref() == other
    }
}

impl PartialEq<&str> for PagePath {
    fn eq(&self, other: &&str) -> bool {
        self.0.as_ref() == *other
    }
}

impl Serialize for PagePath {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for PagePath {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::new(&s).map_err(serde::de::Error::custom)
    }
}
