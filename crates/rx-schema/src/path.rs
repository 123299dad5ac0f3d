//! # Location Paths
//!
//! A location path records the descent from the root value to the point
//! where validation failed: map and record keys become [`PathSegment::Key`],
//! array and sequence positions become [`PathSegment::Index`].
//!
//! Paths are rendered the way a reader would address the value by hand,
//! e.g. `.items[3].name`. The empty path renders as `(root)`.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One step of a location path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PathSegment {
    /// A mapping or record key.
    Key(String),
    /// A sequence position.
    Index(usize),
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Key(key) => write!(f, ".{key}"),
            Self::Index(index) => write!(f, "[{index}]"),
        }
    }
}

impl From<&str> for PathSegment {
    fn from(key: &str) -> Self {
        Self::Key(key.to_string())
    }
}

impl From<String> for PathSegment {
    fn from(key: String) -> Self {
        Self::Key(key)
    }
}

impl From<usize> for PathSegment {
    fn from(index: usize) -> Self {
        Self::Index(index)
    }
}

/// Snapshot of a location path, taken when a validation error is raised.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocationPath(Vec<PathSegment>);

impl LocationPath {
    /// Returns true if this is the root path.
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the segments in descent order.
    pub fn segments(&self) -> &[PathSegment] {
        &self.0
    }
}

impl From<&[PathSegment]> for LocationPath {
    fn from(segments: &[PathSegment]) -> Self {
        Self(segments.to_vec())
    }
}

impl From<Vec<PathSegment>> for LocationPath {
    fn from(segments: Vec<PathSegment>) -> Self {
        Self(segments)
    }
}

impl fmt::Display for LocationPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("(root)");
        }
        for segment in &self.0 {
            write!(f, "{segment}")?;
        }
        Ok(())
    }
}

/// Push `segment`, run `f` with the extended path, then pop it again.
///
/// The pop happens whether `f` succeeds or fails, so the caller's path is
/// never left extended by a descent that raised an error.
pub(crate) fn descend<T>(
    path: &mut Vec<PathSegment>,
    segment: PathSegment,
    f: impl FnOnce(&mut Vec<PathSegment>) -> T,
) -> T {
    let depth = path.len();
    path.push(segment);
    let result = f(path);
    path.truncate(depth);
    result
}
