//! Token cursor for navigating the token stream.

use weir_diagnostic::{Diagnostic, ErrorCode};
use weir_ir::Span;

use crate::token::{Token, TokenKind};

/// Cursor over a lexed token stream. The stream always ends with `Eof`,
/// and the cursor never moves past it.
pub(crate) struct Cursor<'a> {
    tokens: &'a [Token],
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub(crate) fn new(tokens: &'a [Token]) -> Self {
        debug_assert!(matches!(
            tokens.last().map(|t| t.kind),
            Some(TokenKind::Eof)
        ));
        Cursor { tokens, pos: 0 }
    }

    #[inline]
    pub(crate) fn current(&self) -> Token {
        self.tokens[self.pos]
    }

    #[inline]
    pub(crate) fn current_kind(&self) -> TokenKind {
        self.current().kind
    }

    #[inline]
    pub(crate) fn current_span(&self) -> Span {
        self.current().span
    }

    /// The token `offset` positions ahead (0 = current), clamped to `Eof`.
    #[inline]
    pub(crate) fn peek(&self, offset: usize) -> TokenKind {
        let idx = (self.pos + offset).min(self.tokens.len() - 1);
        self.tokens[idx].kind
    }

    #[inline]
    pub(crate) fn at_eof(&self) -> bool {
        matches!(self.current_kind(), TokenKind::Eof)
    }

    /// Advance past the current token and return it.
    pub(crate) fn advance(&mut self) -> Token {
        let token = self.current();
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
        token
    }

    /// Consume the current token if it equals `kind`.
    pub(crate) fn eat(&mut self, kind: TokenKind) -> bool {
        if self.current_kind() == kind {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Require the current token to equal `kind` and consume it.
    pub(crate) fn expect(&mut self, kind: TokenKind) -> Result<Token, Diagnostic> {
        if self.current_kind() == kind {
            Ok(self.advance())
        } else {
            Err(self.unexpected(kind.describe()))
        }
    }

    /// An "unexpected token" diagnostic at the current position.
    pub(crate) fn unexpected(&self, expected: &str) -> Diagnostic {
        Diagnostic::error(ErrorCode::E1001)
            .with_message(format!(
                "unexpected token: expected {expected}, found {}",
                self.current_kind().describe()
            ))
            .with_label(self.current_span(), format!("expected {expected}"))
    }
}
