//! Raw-token cooking: interning, literal parsing, lex diagnostics.

use logos::Logos;
use weir_diagnostic::{Diagnostic, ErrorCode};
use weir_ir::Span;
use weir_types::Context;

use crate::token::{RawToken, Token, TokenKind};

/// Lex a source string into cooked tokens (terminated by `Eof`).
///
/// Lex errors are aggregated; any error fails the whole lex.
pub fn lex(ctx: &Context, source: &str) -> Result<Vec<Token>, Vec<Diagnostic>> {
    let mut tokens = Vec::new();
    let mut diags = Vec::new();

    let mut lexer = RawToken::lexer(source);
    while let Some(raw) = lexer.next() {
        let span = Span::from_range(lexer.span());
        let text = lexer.slice();
        match raw {
            Ok(raw) => match cook(ctx, raw, text, span) {
                Ok(kind) => tokens.push(Token { kind, span }),
                Err(diag) => diags.push(diag),
            },
            Err(()) => diags.push(if text.starts_with('"') {
                Diagnostic::error(ErrorCode::E0003)
                    .with_message("unterminated string literal")
                    .with_label(span, "string opened here")
            } else {
                Diagnostic::error(ErrorCode::E0001)
                    .with_message(format!("unknown character `{text}`"))
                    .with_label(span, "not a valid token")
            }),
        }
    }
    tokens.push(Token {
        kind: TokenKind::Eof,
        span: Span::point(u32::try_from(source.len()).unwrap_or(u32::MAX)),
    });

    if diags.is_empty() {
        Ok(tokens)
    } else {
        Err(diags)
    }
}

fn cook(ctx: &Context, raw: RawToken, text: &str, span: Span) -> Result<TokenKind, Diagnostic> {
    Ok(match raw {
        RawToken::Ident => TokenKind::Ident(ctx.strings.intern(text)),
        RawToken::Number => match text.parse::<i128>() {
            Ok(value) => TokenKind::Number(value),
            Err(_) => {
                return Err(Diagnostic::error(ErrorCode::E0002)
                    .with_message(format!("invalid integer literal `{text}`"))
                    .with_label(span, "does not fit in 128 bits"))
            }
        },
        RawToken::Value => TokenKind::Value(ctx.strings.intern(&text[1..])),
        RawToken::Symbol => TokenKind::Symbol(ctx.strings.intern(&text[1..])),
        RawToken::Label => TokenKind::Label(ctx.strings.intern(&text[1..])),
        RawToken::Str => TokenKind::Str(ctx.strings.intern(&text[1..text.len() - 1])),

        RawToken::Func => TokenKind::Func,
        RawToken::Action => TokenKind::Action,
        RawToken::Const => TokenKind::Const,
        RawToken::Cast => TokenKind::Cast,
        RawToken::Read => TokenKind::Read,
        RawToken::Variable => TokenKind::Variable,
        RawToken::Concat => TokenKind::Concat,
        RawToken::Shl => TokenKind::Shl,
        RawToken::Shr => TokenKind::Shr,
        RawToken::Cmp => TokenKind::Cmp,
        RawToken::Scope => TokenKind::Scope,
        RawToken::If => TokenKind::If,
        RawToken::Else => TokenKind::Else,
        RawToken::Ternary => TokenKind::Ternary,
        RawToken::Yield => TokenKind::Yield,
        RawToken::Return => TokenKind::Return,
        RawToken::Call => TokenKind::Call,
        RawToken::True => TokenKind::True,
        RawToken::False => TokenKind::False,
        RawToken::Bool => TokenKind::Bool,
        RawToken::Bit => TokenKind::Bit,
        RawToken::Int => TokenKind::Int,
        RawToken::InfInt => TokenKind::InfInt,
        RawToken::Void => TokenKind::Void,
        RawToken::Struct => TokenKind::Struct,
        RawToken::Lt => TokenKind::Lt,
        RawToken::Gt => TokenKind::Gt,
        RawToken::LParen => TokenKind::LParen,
        RawToken::RParen => TokenKind::RParen,
        RawToken::LBrace => TokenKind::LBrace,
        RawToken::RBrace => TokenKind::RBrace,
        RawToken::Comma => TokenKind::Comma,
        RawToken::Colon => TokenKind::Colon,
        RawToken::Semi => TokenKind::Semi,
        RawToken::Assign => TokenKind::Assign,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(ctx: &Context, src: &str) -> Vec<TokenKind> {
        lex(ctx, src)
            .unwrap_or_else(|e| panic!("{e:?}"))
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn test_lex_basic() {
        let ctx = Context::new();
        let toks = kinds(&ctx, "func @f (bool) { return }");
        assert_eq!(toks[0], TokenKind::Func);
        assert!(matches!(toks[1], TokenKind::Symbol(_)));
        assert_eq!(toks[2], TokenKind::LParen);
        assert_eq!(toks[3], TokenKind::Bool);
        assert_eq!(toks.last(), Some(&TokenKind::Eof));
    }

    #[test]
    fn test_lex_value_names_with_dash() {
        let ctx = Context::new();
        let toks = kinds(&ctx, "%c-3_int8");
        let TokenKind::Value(name) = toks[0] else {
            panic!("expected a value token, got {:?}", toks[0]);
        };
        assert_eq!(ctx.strings.lookup(name), "c-3_int8");
    }

    #[test]
    fn test_lex_negative_number_and_comment() {
        let ctx = Context::new();
        let toks = kinds(&ctx, "-42 // trailing comment\n7");
        assert_eq!(toks[0], TokenKind::Number(-42));
        assert_eq!(toks[1], TokenKind::Number(7));
    }

    #[test]
    fn test_lex_unknown_character() {
        let ctx = Context::new();
        let err = lex(&ctx, "func ?");
        let Err(diags) = err else {
            panic!("expected a lex error");
        };
        assert_eq!(diags[0].code, ErrorCode::E0001);
    }

    #[test]
    fn test_lex_string_annotation() {
        let ctx = Context::new();
        let toks = kinds(&ctx, r#""p4runtime.id=7""#);
        let TokenKind::Str(name) = toks[0] else {
            panic!("expected a string token, got {:?}", toks[0]);
        };
        assert_eq!(ctx.strings.lookup(name), "p4runtime.id=7");
    }
}
