//! Type parsing.
//!
//! Mnemonic dispatch: `bool`, `infint`, `void`, `bit<W>`, `int<W>`,
//! `struct<name: type, ...>`, `func<[ret] (inputs)>`. Anything else is an
//! unknown type mnemonic.

use weir_diagnostic::{Diagnostic, ErrorCode};
use weir_ir::TypeId;
use weir_types::StructField;

use crate::token::TokenKind;
use crate::Parser;

impl Parser<'_> {
    /// Parse a type expression.
    pub(crate) fn parse_type(&mut self) -> Result<TypeId, Diagnostic> {
        match self.cursor.current_kind() {
            TokenKind::Bool => {
                self.cursor.advance();
                Ok(TypeId::BOOL)
            }
            TokenKind::InfInt => {
                self.cursor.advance();
                Ok(TypeId::INFINT)
            }
            TokenKind::Void => {
                self.cursor.advance();
                Ok(TypeId::VOID)
            }
            TokenKind::Bit => {
                self.cursor.advance();
                self.parse_bits(false)
            }
            TokenKind::Int => {
                self.cursor.advance();
                self.parse_bits(true)
            }
            TokenKind::Struct => {
                self.cursor.advance();
                self.parse_struct()
            }
            TokenKind::Func => {
                self.cursor.advance();
                self.cursor.expect(TokenKind::Lt)?;
                let (inputs, ret) = self.parse_signature_types()?;
                self.cursor.expect(TokenKind::Gt)?;
                Ok(self.ctx.types.function(inputs, ret))
            }
            other => Err(Diagnostic::error(ErrorCode::E1002)
                .with_message(format!("unknown type mnemonic: {}", other.describe()))
                .with_label(self.cursor.current_span(), "expected a type here")),
        }
    }

    /// `<W>` after `bit` / `int`.
    fn parse_bits(&mut self, signed: bool) -> Result<TypeId, Diagnostic> {
        self.cursor.expect(TokenKind::Lt)?;
        let token = self.cursor.current();
        let TokenKind::Number(value) = token.kind else {
            return Err(self.cursor.unexpected("an integer width"));
        };
        self.cursor.advance();
        let Ok(width) = u32::try_from(value) else {
            return Err(Diagnostic::error(ErrorCode::E0002)
                .with_message(format!("invalid bit width `{value}`"))
                .with_label(token.span, "width must fit in 32 unsigned bits"));
        };
        self.cursor.expect(TokenKind::Gt)?;
        Ok(self.ctx.types.bits(width, signed))
    }

    /// `<name: type, ...>` after `struct`.
    ///
    /// Duplicate field names do not stop the parse: every duplicate is
    /// reported before the struct fails as a whole.
    fn parse_struct(&mut self) -> Result<TypeId, Diagnostic> {
        self.cursor.expect(TokenKind::Lt)?;

        let mut fields = Vec::new();
        let mut seen = rustc_hash::FxHashSet::default();
        let mut duplicate_diags: Vec<Diagnostic> = Vec::new();

        if !self.cursor.eat(TokenKind::Gt) {
            loop {
                let token = self.cursor.current();
                let name = match token.kind {
                    TokenKind::Ident(name) | TokenKind::Str(name) => name,
                    _ => return Err(self.cursor.unexpected("a field name")),
                };
                self.cursor.advance();
                self.cursor.expect(TokenKind::Colon)?;
                let ty = self.parse_type()?;

                if !seen.insert(name) {
                    duplicate_diags.push(
                        Diagnostic::error(ErrorCode::E1003)
                            .with_message(format!(
                                "duplicate field name '{}'",
                                self.ctx.strings.lookup(name)
                            ))
                            .with_label(token.span, "field names must be unique"),
                    );
                }
                fields.push(StructField::new(name, ty));

                if !self.cursor.eat(TokenKind::Comma) {
                    break;
                }
            }
            self.cursor.expect(TokenKind::Gt)?;
        }

        if let Some(first) = duplicate_diags.first().cloned() {
            // Report every duplicate, then fail with the first.
            self.diags.extend(duplicate_diags);
            return Err(first);
        }

        match self.ctx.types.try_struct(fields) {
            Ok(id) => Ok(id),
            Err(err) => Err(err.to_diagnostic(self.cursor.current_span(), &self.ctx.strings)),
        }
    }

    /// `[returnType] '(' inputType,* ')'`.
    ///
    /// An immediate `(` denotes void; an explicit `void` return type is
    /// normalized to absent.
    pub(crate) fn parse_signature_types(
        &mut self,
    ) -> Result<(Vec<TypeId>, Option<TypeId>), Diagnostic> {
        let ret = if matches!(self.cursor.current_kind(), TokenKind::LParen) {
            None
        } else {
            let ty = self.parse_type()?;
            (ty != TypeId::VOID).then_some(ty)
        };

        self.cursor.expect(TokenKind::LParen)?;
        let mut inputs = Vec::new();
        if !self.cursor.eat(TokenKind::RParen) {
            loop {
                inputs.push(self.parse_type()?);
                if !self.cursor.eat(TokenKind::Comma) {
                    break;
                }
            }
            self.cursor.expect(TokenKind::RParen)?;
        }
        Ok((inputs, ret))
    }
}
