//! Source locations and the output spans attributed to them.

use smol_str::SmolStr;
use std::fmt;
use text_size::TextSize;

/// An offset into generated output.
pub type ByteOffset = TextSize;

/// A point in original source text.
///
/// Locations order by `(file, line, col)`, comparing file names bytewise. The
/// constructor does not validate its inputs; producers reject bad positions before
/// building a location.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Location {
    /// Source file name.
    pub file: SmolStr,
    /// 1-indexed line number.
    pub line: u32,
    /// 0-indexed column.
    pub col: u32,
}

impl Location {
    /// Creates a new location.
    #[inline]
    pub fn new(file: impl Into<SmolStr>, line: u32, col: u32) -> Self {
        Self {
            file: file.into(),
            line,
            col,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.line, self.col)
    }
}

/// A span of generated output attributed to a source location.
///
/// An entry is a closed interval: both `start` and `end` are covered. An entry with
/// `end < start` covers nothing.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Entry {
    /// The source location the span came from.
    pub loc: Location,
    /// First covered output offset.
    pub start: ByteOffset,
    /// Last covered output offset (inclusive).
    pub end: ByteOffset,
}

impl Entry {
    /// Creates a new entry covering `[start, end]`.
    #[inline]
    pub fn new(loc: Location, start: impl Into<ByteOffset>, end: impl Into<ByteOffset>) -> Self {
        Self {
            loc,
            start: start.into(),
            end: end.into(),
        }
    }

    /// Returns a copy of this entry moved forward by `distance`.
    #[must_use]
    pub fn shifted(&self, distance: ByteOffset) -> Self {
        Self {
            loc: self.loc.clone(),
            start: self.start + distance,
            end: self.end + distance,
        }
    }

    /// Returns true if `offset` lies within `[start, end]`.
    #[inline]
    pub fn contains(&self, offset: ByteOffset) -> bool {
        self.start <= offset && offset <= self.end
    }

    /// Number of output positions covered.
    #[inline]
    pub fn len(&self) -> u64 {
        if self.end < self.start {
            0
        } else {
            u64::from(u32::from(self.end - self.start)) + 1
        }
    }

    /// Returns true if the entry covers no positions.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.end < self.start
    }

    /// Iterates every covered offset in ascending order.
    pub fn offsets(&self) -> impl Iterator<Item = ByteOffset> {
        (u32::from(self.start)..=u32::from(self.end)).map(TextSize::from)
    }
}
