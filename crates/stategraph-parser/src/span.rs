//! Byte spans into definition source text.
//!
//! The JSON decoder reports positions as line/column pairs and the
//! elaborated model keeps no positions at all, so spans are recovered from
//! the source text: [`Span::from_line_column`] converts decoder positions and
//! [`Span::locate_key`] finds the first occurrence of an object key.

use std::ops::Range;

/// A half-open byte range in the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    start: usize,
    end: usize,
}

impl Span {
    /// Creates a span from a byte range.
    pub fn new(range: Range<usize>) -> Self {
        Self {
            start: range.start,
            end: range.end.max(range.start),
        }
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> usize {
        self.end
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    /// Converts a 1-based line and byte column into a one-byte span.
    ///
    /// Positions past the end of the source are clamped to the last byte; a
    /// column of zero (end of a line) points at the preceding newline.
    ///
    /// # Examples
    ///
    /// ```
    /// # use stategraph_parser::Span;
    /// let source = "{\n  \"StartAt\": 1\n}";
    /// let span = Span::from_line_column(source, 2, 14);
    /// assert_eq!(&source[span.range()], "1");
    /// ```
    pub fn from_line_column(source: &str, line: usize, column: usize) -> Self {
        let line_start: usize = source
            .split_inclusive('\n')
            .take(line.saturating_sub(1))
            .map(str::len)
            .sum();
        let offset = (line_start + column).saturating_sub(1);
        let last = source.len().saturating_sub(1);
        let start = offset.min(last);
        Self::new(start..(start + 1).min(source.len()))
    }

    /// Finds the first `"key"` that is followed by a colon, returning the
    /// span of the quoted key.
    ///
    /// Keys are matched on their raw JSON text, so keys containing escape
    /// sequences are not found.
    ///
    /// # Examples
    ///
    /// ```
    /// # use stategraph_parser::Span;
    /// let source = r#"{"Next": "Charge", "Charge": {"Type": "Task"}}"#;
    /// let span = Span::locate_key(source, "Charge").unwrap();
    /// assert_eq!(&source[span.range()], "\"Charge\"");
    /// ```
    pub fn locate_key(source: &str, key: &str) -> Option<Self> {
        let needle = format!("\"{key}\"");
        let mut from = 0;
        while let Some(found) = source[from..].find(&needle) {
            let start = from + found;
            let end = start + needle.len();
            if source[end..].trim_start().starts_with(':') {
                return Some(Self::new(start..end));
            }
            from = end;
        }
        None
    }
}

impl From<Range<usize>> for Span {
    fn from(range: Range<usize>) -> Self {
        Self::new(range)
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn test_span_accessors() {
        let span = Span::new(4..9);
        assert_eq!(span.start(), 4);
        assert_eq!(span.end(), 9);
        assert_eq!(span.len(), 5);
        assert!(!span.is_empty());
        assert!(Span::new(3..3).is_empty());
    }

    #[test]
    fn test_inverted_range_is_empty() {
        let span = Span::new(9..4);
        assert_eq!(span.start(), 9);
        assert!(span.is_empty());
    }

    #[test]
    fn test_from_line_column_first_line() {
        let source = "{not json";
        let span = Span::from_line_column(source, 1, 2);
        assert_eq!(&source[span.range()], "n");
    }

    #[test]
    fn test_from_line_column_clamps_past_end() {
        let source = "{\n";
        let span = Span::from_line_column(source, 3, 7);
        assert_eq!(span.start(), 1);
        assert_eq!(span.end(), 2);
    }

    #[test]
    fn test_from_line_column_empty_source() {
        let span = Span::from_line_column("", 1, 1);
        assert!(span.is_empty());
    }

    #[test]
    fn test_locate_key_skips_values() {
        let source = r#"{"StartAt": "A", "States": {"A": {"Type": "Pass", "End": true}}}"#;
        let span = Span::locate_key(source, "A").unwrap();
        assert_eq!(span.start(), source.find("\"A\":").unwrap());
    }

    #[test]
    fn test_locate_key_allows_whitespace_before_colon() {
        let source = "{ \"States\"  \n : {} }";
        let span = Span::locate_key(source, "States").unwrap();
        assert_eq!(&source[span.range()], "\"States\"");
    }

    #[test]
    fn test_locate_key_missing() {
        assert_eq!(Span::locate_key(r#"{"a": "b"}"#, "b"), None);
    }

    proptest! {
        #[test]
        fn test_from_line_column_stays_in_bounds(
            source in "[a-z{}\n\" :]{1,40}",
            line in 0usize..6,
            column in 0usize..20,
        ) {
            let span = Span::from_line_column(&source, line, column);
            prop_assert!(span.end() <= source.len());
            prop_assert!(span.start() <= span.end());
        }
    }
}
