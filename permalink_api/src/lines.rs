use serde::{Deserialize, Serialize};

/// 1-based, inclusive line span rendered into a permalink anchor.
///
/// `start == 0` means "no anchor"; `end == 0` or `end == start` means a
/// single-line anchor. `start <= end` is not enforced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct LineRange {
    /// First line of the span (1-based), or 0 when no line is selected.
    pub start: u32,
    /// Last line of the span (1-based).
    #[serde(default)]
    pub end: u32,
}

impl LineRange {
    /// Construct a range from explicit 1-based bounds.
    #[must_use]
    pub const fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    /// A range covering exactly one line.
    #[must_use]
    pub const fn single(line: u32) -> Self {
        Self {
            start: line,
            end: line,
        }
    }

    /// A range that suppresses the anchor entirely.
    #[must_use]
    pub const fn none() -> Self {
        Self { start: 0, end: 0 }
    }

    /// Whether the anchor spans more than one line.
    #[must_use]
    pub const fn is_span(&self) -> bool {
        self.start != 0 && self.end != 0 && self.end != self.start
    }
}

impl From<Selection> for LineRange {
    fn from(selection: Selection) -> Self {
        Self {
            start: selection.start_line.saturating_add(1),
            end: selection.end_line.saturating_add(1),
        }
    }
}

/// Editor selection expressed with 0-based line numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Selection {
    /// Line containing the selection start (0-based).
    pub start_line: u32,
    /// Line containing the selection end (0-based).
    pub end_line: u32,
}

impl Selection {
    /// Construct a selection from 0-based line numbers.
    #[must_use]
    pub const fn new(start_line: u32, end_line: u32) -> Self {
        Self {
            start_line,
            end_line,
        }
    }
}
