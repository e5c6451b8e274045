//! Context types for validator execution.

use crate::patterns::PatternRegistry;
use crate::semantic::{Language, SemanticModel};
use crate::source::SourceFile;
use crate::types::Location;
use std::path::Path;

/// Read-only view of one file handed to every validator.
#[derive(Debug, Clone, Copy)]
pub struct ValidationContext<'a> {
    /// Path to the file.
    pub path: &'a Path,
    /// File contents.
    pub content: &'a str,
    /// Source language.
    pub language: Language,
    /// Semantic summary.
    pub model: &'a SemanticModel,
    /// Intents the file declares.
    pub intents: &'a [String],
    /// Canonical-pattern table for did-you-mean hints.
    pub patterns: Option<&'a PatternRegistry>,
}

impl<'a> ValidationContext<'a> {
    /// Creates a context over a loaded source file.
    #[must_use]
    pub fn new(file: &'a SourceFile) -> Self {
        Self {
            path: &file.path,
            content: &file.content,
            language: file.language,
            model: &file.model,
            intents: &file.intents,
            patterns: None,
        }
    }

    /// Attaches a canonical-pattern table.
    #[must_use]
    pub fn with_patterns(mut self, patterns: Option<&'a PatternRegistry>) -> Self {
        self.patterns = patterns;
        self
    }

    /// The file name (`user.service.ts`).
    #[must_use]
    pub fn file_name(&self) -> &str {
        self.path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
    }

    /// Number of lines in the content.
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.content.lines().count()
    }

    /// A location at the given line of this file.
    #[must_use]
    pub fn location(&self, line: usize) -> Location {
        Location::at_line(self.path.to_path_buf(), line)
    }

    /// Converts a byte offset into a 1-indexed (line, column) pair.
    ///
    /// Offsets past the end clamp to the last position.
    #[must_use]
    pub fn position_of(&self, offset: usize) -> (usize, usize) {
        let offset = offset.min(self.content.len());
        let before = &self.content.as_bytes()[..offset];
        let line = before.iter().filter(|&&b| b == b'\n').count() + 1;
        let line_start = before
            .iter()
            .rposition(|&b| b == b'\n')
            .map_or(0, |i| i + 1);
        (line, offset - line_start + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_name_and_lines() {
        let file = SourceFile::new("src/users/user.service.ts", "a\nb\nc\n");
        let ctx = ValidationContext::new(&file);
        assert_eq!(ctx.file_name(), "user.service.ts");
        assert_eq!(ctx.line_count(), 3);
        assert_eq!(ctx.language, Language::TypeScript);
    }

    #[test]
    fn position_of_offsets() {
        let file = SourceFile::new("a.ts", "first\nsecond\nthird");
        let ctx = ValidationContext::new(&file);
        assert_eq!(ctx.position_of(0), (1, 1));
        assert_eq!(ctx.position_of(6), (2, 1));
        assert_eq!(ctx.position_of(9), (2, 4));
        assert_eq!(ctx.position_of(1000), (3, 6));
    }
}
