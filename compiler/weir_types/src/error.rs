//! Construction errors for type requests.

use weir_diagnostic::{Diagnostic, ErrorCode};
use weir_ir::{Name, Span, StringInterner};

/// Error produced by a malformed type request.
///
/// Detected before any operation exists; the failed description is never
/// interned.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TypeError {
    /// A struct description repeats one or more field names. Every duplicate
    /// is collected, not just the first.
    DuplicateFields { duplicates: Vec<Name> },
}

impl TypeError {
    /// Convert to a diagnostic attached to the requesting construct.
    pub fn to_diagnostic(&self, span: Span, strings: &StringInterner) -> Diagnostic {
        match self {
            TypeError::DuplicateFields { duplicates } => {
                let mut names = duplicates.iter().map(|&n| strings.lookup(n));
                let first = names.next().unwrap_or("");
                let mut diag = Diagnostic::error(ErrorCode::E2001)
                    .with_message(format!("duplicate field name '{first}' in struct type"))
                    .with_label(span, "field names must be unique");
                for name in names {
                    diag = diag.with_note(format!("duplicate field name '{name}' in struct type"));
                }
                diag
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_fields_diagnostic_names_all() {
        let strings = StringInterner::new();
        let a = strings.intern("a");
        let b = strings.intern("b");

        let err = TypeError::DuplicateFields {
            duplicates: vec![a, b],
        };
        let diag = err.to_diagnostic(Span::new(0, 4), &strings);
        assert_eq!(diag.code, ErrorCode::E2001);
        assert!(diag.message.contains("'a'"));
        assert_eq!(diag.notes.len(), 1);
        assert!(diag.notes[0].contains("'b'"));
    }
}
