use std::fmt;

use weir_ir::Span;

use crate::ErrorCode;

/// Severity level for diagnostics.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Severity {
    Error,
    Warning,
    Note,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Note => write!(f, "note"),
        }
    }
}

/// A labeled span with a message.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Label {
    pub span: Span,
    pub message: String,
    pub is_primary: bool,
}

impl Label {
    /// Create a primary label (the detecting operation's location).
    pub fn primary(span: Span, message: impl Into<String>) -> Self {
        Label {
            span,
            message: message.into(),
            is_primary: true,
        }
    }

    /// Create a secondary label (related context).
    pub fn secondary(span: Span, message: impl Into<String>) -> Self {
        Label {
            span,
            message: message.into(),
            is_primary: false,
        }
    }
}

/// A structured diagnostic: operation identity, reason, and renderings of
/// the offending values/types.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[must_use = "diagnostics should be reported or returned, not silently dropped"]
pub struct Diagnostic {
    /// Error code for searchability.
    pub code: ErrorCode,
    /// Severity level.
    pub severity: Severity,
    /// Main error message.
    pub message: String,
    /// Labeled spans showing where the error occurred.
    pub labels: Vec<Label>,
    /// Additional notes providing context.
    pub notes: Vec<String>,
}

impl Diagnostic {
    /// Create a new error diagnostic.
    pub fn error(code: ErrorCode) -> Self {
        Diagnostic {
            code,
            severity: Severity::Error,
            message: String::new(),
            labels: Vec::new(),
            notes: Vec::new(),
        }
    }

    /// Set the main message.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Add a primary label at the error location.
    pub fn with_label(mut self, span: Span, message: impl Into<String>) -> Self {
        self.labels.push(Label::primary(span, message));
        self
    }

    /// Add a secondary label for context.
    pub fn with_secondary_label(mut self, span: Span, message: impl Into<String>) -> Self {
        self.labels.push(Label::secondary(span, message));
        self
    }

    /// Add a note providing additional context.
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    /// Get the primary span (first primary label's span).
    pub fn primary_span(&self) -> Option<Span> {
        self.labels.iter().find(|l| l.is_primary).map(|l| l.span)
    }

    /// Check if this is an error (vs warning/note).
    pub fn is_error(&self) -> bool {
        matches!(self.severity, Severity::Error)
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]: {}", self.severity, self.code, self.message)?;

        for label in &self.labels {
            let marker = if label.is_primary { "-->" } else { "   " };
            write!(f, "\n  {} {:?}: {}", marker, label.span, label.message)?;
        }

        for note in &self.notes {
            write!(f, "\n  = note: {note}")?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnostic_builder() {
        let diag = Diagnostic::error(ErrorCode::E3006)
            .with_message("the right-hand side operand of an arithmetic shift must be unsigned")
            .with_label(Span::new(0, 5), "here")
            .with_note("shift amount has type `int<4>`");

        assert_eq!(diag.code, ErrorCode::E3006);
        assert!(diag.is_error());
        assert_eq!(diag.labels.len(), 1);
        assert!(diag.labels[0].is_primary);
        assert_eq!(diag.primary_span(), Some(Span::new(0, 5)));
        assert_eq!(diag.notes.len(), 1);
    }

    #[test]
    fn test_diagnostic_display_format() {
        let diag = Diagnostic::error(ErrorCode::E1004)
            .with_message("multi-block region must not omit terminator")
            .with_label(Span::new(0, 5), "in this region")
            .with_secondary_label(Span::new(10, 15), "unterminated block")
            .with_note("add an explicit `yield`");

        let output = diag.to_string();
        assert!(output.contains("error [E1004]: multi-block region must not omit terminator"));
        assert!(output.contains("--> "));
        assert!(output.contains("unterminated block"));
        assert!(output.contains("= note: add an explicit `yield`"));
    }

    #[test]
    fn test_diagnostic_eq_hash() {
        use std::collections::HashSet;

        let d1 = Diagnostic::error(ErrorCode::E3001).with_message("x");
        let d2 = Diagnostic::error(ErrorCode::E3001).with_message("x");
        let d3 = Diagnostic::error(ErrorCode::E3002).with_message("y");

        assert_eq!(d1, d2);
        assert_ne!(d1, d3);

        let mut set = HashSet::new();
        set.insert(d1.clone());
        set.insert(d2);
        set.insert(d3);
        assert_eq!(set.len(), 2);
    }
}
