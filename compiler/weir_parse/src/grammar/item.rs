//! Function entity parsing.
//!
//! `func` [`action`] `@name` signature [annotation] [body]. A signature in a
//! definition names its arguments (`(%x: bit<16>)`); a declaration lists
//! bare types. Actions must have a body and must not declare results.

use rustc_hash::FxHashMap;
use weir_diagnostic::{Diagnostic, ErrorCode};
use weir_hir::{FuncBuilder, FuncOp, ValueId};
use weir_ir::{Name, TypeId};

use crate::token::TokenKind;
use crate::Parser;

impl Parser<'_> {
    /// Parse one `func` item and add it to the module.
    pub(crate) fn parse_func(&mut self) -> Result<(), Diagnostic> {
        let start = self.cursor.expect(TokenKind::Func)?.span;
        let is_action = self.cursor.eat(TokenKind::Action);

        let TokenKind::Symbol(name) = self.cursor.current_kind() else {
            return Err(self.cursor.unexpected("a symbol name"));
        };
        let name_span = self.cursor.advance().span;

        // Return type, if any. An explicit void is normalized to absent.
        let ret = if matches!(self.cursor.current_kind(), TokenKind::LParen) {
            None
        } else {
            let ty = self.parse_type()?;
            (ty != TypeId::VOID).then_some(ty)
        };

        if is_action && ret.is_some() {
            return Err(Diagnostic::error(ErrorCode::E1006)
                .with_message("actions should not produce any results")
                .with_label(name_span, "declared here"));
        }

        // Parameters: named (`%x: type`) in definitions, bare types in
        // declarations.
        self.cursor.expect(TokenKind::LParen)?;
        let mut input_tys: Vec<TypeId> = Vec::new();
        let mut arg_names: Vec<Name> = Vec::new();
        let named = matches!(self.cursor.current_kind(), TokenKind::Value(_));
        if !self.cursor.eat(TokenKind::RParen) {
            loop {
                if named {
                    let TokenKind::Value(arg) = self.cursor.current_kind() else {
                        return Err(self.cursor.unexpected("an argument name"));
                    };
                    self.cursor.advance();
                    self.cursor.expect(TokenKind::Colon)?;
                    arg_names.push(arg);
                }
                input_tys.push(self.parse_type()?);
                if !self.cursor.eat(TokenKind::Comma) {
                    break;
                }
            }
            self.cursor.expect(TokenKind::RParen)?;
        }

        // Optional opaque annotation payload.
        let annotation = match self.cursor.current_kind() {
            TokenKind::Str(payload) => {
                self.cursor.advance();
                Some(payload)
            }
            _ => None,
        };

        let span = start.merge(name_span);
        let sig_ty = self.ctx.types.function(input_tys.clone(), ret);
        let mut func = FuncOp::build(self.ctx, name, sig_ty, is_action, span)?;
        if let Some(annotation) = annotation {
            func = func.with_annotation(annotation);
        }

        if matches!(self.cursor.current_kind(), TokenKind::LBrace) {
            if !named && !input_tys.is_empty() {
                return Err(self.cursor.unexpected("named arguments in a function definition"));
            }
            let mut builder = FuncBuilder::new(self.ctx, &input_tys, ret);
            let mut env: FxHashMap<Name, ValueId> = FxHashMap::default();
            for (index, &arg) in arg_names.iter().enumerate() {
                env.insert(arg, builder.arg(index));
            }
            self.parse_region_blocks(&mut builder, &mut env, false)?;
            if builder.body().region_ops(builder.body().entry_region()).next().is_none() {
                return Err(Diagnostic::error(ErrorCode::E1005)
                    .with_message("expected non-empty function body")
                    .with_label(span, "in this function"));
            }
            func.set_body(builder.finish())?;
        } else if is_action {
            return Err(Diagnostic::error(ErrorCode::E1007)
                .with_message(format!(
                    "action '@{}' shall have a body",
                    self.ctx.strings.lookup(name)
                ))
                .with_label(span, "declared here"));
        }

        self.module.add_func(self.ctx, func)
    }
}
