//! Labeled byte spans attached to diagnostics.

use crate::span::Span;

/// Whether a label marks the offending location or only gives context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelStyle {
    /// The location the diagnostic is about.
    Primary,
    /// Related locations, such as the `States` map an undefined start
    /// state was looked up in.
    Secondary,
}

/// A message pinned to a span of the definition text.
///
/// ```text
/// error[E202]: start state `Begin` is not defined
///    |
///  2 |   "StartAt": "Begin",
///    |   ^^^^^^^^^ not a key of `States`
///  3 |   "States": {
///    |   -------- states declared here
/// ```
#[derive(Debug, Clone)]
pub struct Label {
    style: LabelStyle,
    span: Span,
    message: String,
}

impl Label {
    pub fn new(style: LabelStyle, span: Span, message: impl Into<String>) -> Self {
        Self {
            style,
            span,
            message: message.into(),
        }
    }

    pub fn primary(span: Span, message: impl Into<String>) -> Self {
        Self::new(LabelStyle::Primary, span, message)
    }

    pub fn secondary(span: Span, message: impl Into<String>) -> Self {
        Self::new(LabelStyle::Secondary, span, message)
    }

    pub fn style(&self) -> LabelStyle {
        self.style
    }

    pub fn span(&self) -> Span {
        self.span
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn is_primary(&self) -> bool {
        self.style == LabelStyle::Primary
    }

    pub fn is_secondary(&self) -> bool {
        self.style == LabelStyle::Secondary
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_styles() {
        let start_at = Label::primary(Span::new(4..13), "not a key of `States`");
        let states = Label::secondary(Span::new(28..36), "states declared here");

        assert!(start_at.is_primary());
        assert_eq!(start_at.style(), LabelStyle::Primary);
        assert_eq!(start_at.span().range(), 4..13);
        assert_eq!(start_at.message(), "not a key of `States`");

        assert!(states.is_secondary());
        assert!(!states.is_primary());
        assert_eq!(states.span().len(), 8);
    }
}
