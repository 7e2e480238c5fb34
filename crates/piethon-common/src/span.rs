use serde::Serialize;

/// Source position within a script (1-based line/column, 0-based byte offset).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct Position {
    /// 1-based line number.
    pub line: u32,
    /// 1-based column number.
    pub column: u32,
    /// 0-based byte offset from start of the script.
    pub offset: u32,
}

impl Position {
    pub fn new(line: u32, column: u32, offset: u32) -> Self {
        Self {
            line,
            column,
            offset,
        }
    }
}

/// A source location: a range in one named script, from `start` to `end`.
///
/// Every diagnostic carries one of these.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Span {
    /// Name of the script the range belongs to (usually a file name).
    pub source: String,
    /// Start position (inclusive).
    pub start: Position,
    /// End position (exclusive).
    pub end: Position,
}

impl Span {
    pub fn new(source: impl Into<String>, start: Position, end: Position) -> Self {
        Self {
            source: source.into(),
            start,
            end,
        }
    }

    /// A span that points nowhere, for nodes built outside the parser.
    pub fn dummy() -> Self {
        Self {
            source: String::new(),
            start: Position::default(),
            end: Position::default(),
        }
    }

    /// Merge two spans into one that covers both (same source assumed).
    pub fn merge(&self, other: &Span) -> Span {
        let start = if self.start.offset <= other.start.offset {
            self.start
        } else {
            other.start
        };
        let end = if self.end.offset >= other.end.offset {
            self.end
        } else {
            other.end
        };
        Span {
            source: self.source.clone(),
            start,
            end,
        }
    }

    /// Byte range covered by this span, never empty.
    pub fn byte_range(&self) -> std::ops::Range<usize> {
        let start = self.start.offset as usize;
        let end = (self.end.offset as usize).max(start + 1);
        start..end
    }
}

impl std::fmt::Display for Span {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{}:{}",
            self.source, self.start.line, self.start.column
        )
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}
