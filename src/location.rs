//! Source locations shared by every pipeline stage.
//!
//! Every token and AST node carries one of these so diagnostics can point
//! back at the exact source span that produced them.

use std::fmt::Display;

/// A single point (or span) in a source file.
///
/// `start_column <= end_column` is an invariant maintained by every
/// constructor below; callers that need to merge two locations should use
/// [`Location::merge`] rather than building one by hand.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Location {
    pub file: String,
    pub directory: String,
    pub line: usize,
    pub start_column: usize,
    pub end_column: usize,
    pub raw_line_text: String,
}

impl Location {
    pub fn new(
        file: impl Into<String>,
        directory: impl Into<String>,
        line: usize,
        start_column: usize,
        end_column: usize,
        raw_line_text: impl Into<String>,
    ) -> Self {
        let start_column = start_column.min(end_column);
        Location {
            file: file.into(),
            directory: directory.into(),
            line,
            start_column,
            end_column,
            raw_line_text: raw_line_text.into(),
        }
    }

    /// A placeholder location for synthesized nodes (e.g. stdlib-provided
    /// function declarations) that do not originate from a source file.
    pub fn synthetic() -> Self {
        Location {
            file: "<synthetic>".to_owned(),
            directory: String::new(),
            line: 0,
            start_column: 0,
            end_column: 0,
            raw_line_text: String::new(),
        }
    }

    /// Merge two locations on the same line into a span covering both,
    /// e.g. combining a binary expression's left and right operand spans.
    pub fn merge(&self, other: &Location) -> Location {
        Location {
            file: self.file.clone(),
            directory: self.directory.clone(),
            line: self.line,
            start_column: self.start_column.min(other.start_column),
            end_column: self.end_column.max(other.end_column),
            raw_line_text: self.raw_line_text.clone(),
        }
    }
}

impl Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{}:{}",
            self.file,
            self.line + 1,
            self.start_column + 1
        )
    }
}
