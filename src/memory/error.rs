//! Error types for the memory engine.
//!
//! [`ParseError`] covers malformed mindmap schemas, [`StorageError`] covers the
//! long-term store, and [`MemoryError`] is what the engine's public operations
//! return.

use thiserror::Error;

/// What went wrong while parsing a mindmap schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// No `root(...)` line was found.
    NoRoot,
    /// A second top-level node appeared after the root.
    MultipleRoots,
    /// A line is indented less than the root line.
    DedentPastRoot,
    /// A dedent that lands between two open indentation levels.
    InconsistentIndent,
    /// A `root` marker whose shape is unclosed or empty.
    MalformedRoot,
    /// A node (or arrow-chain segment) with no text.
    EmptyLabel,
}

impl ParseErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NoRoot => "no root node found",
            Self::MultipleRoots => "more than one top-level root",
            Self::DedentPastRoot => "line dedented past the root",
            Self::InconsistentIndent => "indentation matches no open ancestor",
            Self::MalformedRoot => "malformed root marker",
            Self::EmptyLabel => "empty node label",
        }
    }
}

impl std::fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A malformed mindmap schema. `line` is 1-based; `text` is the offending line.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("mindmap parse error at line {line}: {kind} ({text:?})")]
pub struct ParseError {
    pub line: usize,
    pub text: String,
    pub kind: ParseErrorKind,
}

impl ParseError {
    pub(crate) fn new(kind: ParseErrorKind, line: usize, text: &str) -> Self {
        Self {
            line,
            text: text.to_string(),
            kind,
        }
    }
}

/// Failures of the long-term store.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("stored engram {id} is corrupt: {reason}")]
    Corrupt { id: String, reason: String },

    #[error("store lock poisoned")]
    LockPoisoned,
}

/// Errors returned by consolidation and recall.
#[derive(Error, Debug)]
pub enum MemoryError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("invalid engram: {0}")]
    Invalid(String),

    #[error("semantic network lock poisoned")]
    LockPoisoned,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_error_message_names_line_and_kind() {
        let err = ParseError::new(ParseErrorKind::MultipleRoots, 4, "root((Y))");
        let msg = err.to_string();
        assert!(msg.contains("line 4"));
        assert!(msg.contains("more than one top-level root"));
        assert!(msg.contains("root((Y))"));
    }

    #[test]
    fn memory_error_wraps_parse_error_transparently() {
        let err: MemoryError = ParseError::new(ParseErrorKind::NoRoot, 1, "").into();
        assert!(matches!(err, MemoryError::Parse(_)));
        assert!(err.to_string().starts_with("mindmap parse error"));
    }
}
