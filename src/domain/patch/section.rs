//! Located section value object.

use serde::Serialize;
use std::ops::Range;

/// A section found in one specific document snapshot.
///
/// `start_index..end_index` is a half-open byte range into the exact document
/// the section was located in. For marker-bound sections the range covers the
/// sentinels while `content` excludes them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Section {
    pub name: String,
    pub content: String,
    pub start_index: usize,
    pub end_index: usize,
    pub has_marker: bool,
}

impl Section {
    /// Byte range of the section in its source document.
    pub fn range(&self) -> Range<usize> {
        self.start_index..self.end_index
    }

    /// True if the two ranges share at least one byte.
    pub fn overlaps(&self, other: &Section) -> bool {
        self.start_index < other.end_index && other.start_index < self.end_index
    }
}
