//! Operation and region parsing.
//!
//! Operations build straight through the verified builder, so catalog
//! contracts run as the text is consumed. Regions handle the
//! terminator-omission sugar: a single-block region with no terminator gets
//! its zero-operand `yield` resynthesized; a multi-block region must spell
//! every terminator.

use rustc_hash::FxHashMap;
use weir_diagnostic::{Diagnostic, ErrorCode};
use weir_hir::{
    Attr, BinKind, CmpKind, FuncBuilder, RegionId, SymbolLookup, UnaryKind, ValueId,
};
use weir_ir::{Name, Span, TypeId};

use crate::token::TokenKind;
use crate::Parser;

/// A parsed `%name =` result binding.
type Binding = Option<(Name, Span)>;

impl Parser<'_> {
    /// Parse `{ ... }` into the current region context of `b`.
    ///
    /// `sugar` enables terminator resynthesis for the region bodies of
    /// `scope`/`if`/`ternary`; function bodies pass `false` and must spell
    /// their terminators.
    pub(crate) fn parse_region_blocks(
        &mut self,
        b: &mut FuncBuilder<'_>,
        env: &mut FxHashMap<Name, ValueId>,
        sugar: bool,
    ) -> Result<(), Diagnostic> {
        let open = self.cursor.expect(TokenKind::LBrace)?.span;
        loop {
            while self.cursor.eat(TokenKind::Semi) {}
            match self.cursor.current_kind() {
                TokenKind::RBrace => {
                    self.cursor.advance();
                    break;
                }
                TokenKind::Label(_) => self.parse_block_label(b, env)?,
                TokenKind::Eof => return Err(self.cursor.unexpected("`}`")),
                _ => self.parse_op(b, env)?,
            }
        }
        if sugar {
            self.ensure_region_term(b, open)?;
        }
        Ok(())
    }

    /// `^label(%p: type, ...):` starts a new block in the current region.
    fn parse_block_label(
        &mut self,
        b: &mut FuncBuilder<'_>,
        env: &mut FxHashMap<Name, ValueId>,
    ) -> Result<(), Diagnostic> {
        // Label names are positional; reprinting renumbers them.
        self.cursor.advance();

        let mut param_names = Vec::new();
        let mut param_tys = Vec::new();
        if self.cursor.eat(TokenKind::LParen) && !self.cursor.eat(TokenKind::RParen) {
            loop {
                let TokenKind::Value(name) = self.cursor.current_kind() else {
                    return Err(self.cursor.unexpected("a block parameter name"));
                };
                self.cursor.advance();
                self.cursor.expect(TokenKind::Colon)?;
                param_names.push(name);
                param_tys.push(self.parse_type()?);
                if !self.cursor.eat(TokenKind::Comma) {
                    break;
                }
            }
            self.cursor.expect(TokenKind::RParen)?;
        }
        self.cursor.expect(TokenKind::Colon)?;

        let block = b.append_block(&param_tys);
        b.switch_to_block(block);
        for (index, &name) in param_names.iter().enumerate() {
            env.insert(name, b.body().block(block).params[index]);
        }
        Ok(())
    }

    /// Resynthesize an omitted terminator, or reject the omission.
    fn ensure_region_term(
        &mut self,
        b: &mut FuncBuilder<'_>,
        open: Span,
    ) -> Result<(), Diagnostic> {
        let region = b.body().block(b.current_block()).region;
        let blocks = b.body().region(region).blocks.clone();
        if let [only] = blocks[..] {
            if !b.body().is_terminated(only) {
                b.switch_to_block(only);
                b.yield_op(&[], Span::point(open.end));
            }
            return Ok(());
        }
        for &block in &blocks {
            if !b.body().is_terminated(block) {
                return Err(Diagnostic::error(ErrorCode::E1004)
                    .with_message("multi-block region must not omit terminator")
                    .with_label(open, "in this region"));
            }
        }
        Ok(())
    }

    /// A nested region body: `{ ... }` with terminator sugar.
    fn parse_nested_region(
        &mut self,
        b: &mut FuncBuilder<'_>,
        env: &mut FxHashMap<Name, ValueId>,
    ) -> Result<RegionId, Diagnostic> {
        b.build_region(|b| self.parse_region_blocks(b, env, true))
    }

    /// One operation statement.
    fn parse_op(
        &mut self,
        b: &mut FuncBuilder<'_>,
        env: &mut FxHashMap<Name, ValueId>,
    ) -> Result<(), Diagnostic> {
        // Optional `%name =` result binding.
        let binding: Binding = match self.cursor.current_kind() {
            TokenKind::Value(name) => {
                let span = self.cursor.advance().span;
                self.cursor.expect(TokenKind::Assign)?;
                Some((name, span))
            }
            _ => None,
        };

        let token = self.cursor.current();
        let op_span = token.span;
        match token.kind {
            TokenKind::Const => {
                self.cursor.advance();
                let (attr, result_ty) = match self.cursor.current_kind() {
                    TokenKind::True => {
                        self.cursor.advance();
                        (Attr::Bool(true), TypeId::BOOL)
                    }
                    TokenKind::False => {
                        self.cursor.advance();
                        (Attr::Bool(false), TypeId::BOOL)
                    }
                    TokenKind::Number(value) => {
                        self.cursor.advance();
                        self.cursor.expect(TokenKind::Colon)?;
                        let ty = self.parse_type()?;
                        (Attr::int(value, ty), ty)
                    }
                    _ => return Err(self.cursor.unexpected("a constant value")),
                };
                let value = match self.const_override(binding, &attr) {
                    Some(name) => b.const_named(name, attr, result_ty, op_span)?,
                    None => b.const_op(attr, result_ty, op_span)?,
                };
                self.bind(env, binding, Some(value))
            }
            TokenKind::Cast => {
                self.cursor.advance();
                let value = self.parse_operand(env)?;
                self.cursor.expect(TokenKind::Colon)?;
                let ty = self.parse_type()?;
                let result = b.cast(value, ty, op_span);
                self.bind(env, binding, Some(result))
            }
            TokenKind::Read => {
                self.cursor.advance();
                let location = self.parse_operand(env)?;
                let result = b.read(location, op_span)?;
                self.bind(env, binding, Some(result))
            }
            TokenKind::Concat => {
                self.cursor.advance();
                let lhs = self.parse_operand(env)?;
                self.cursor.expect(TokenKind::Comma)?;
                let rhs = self.parse_operand(env)?;
                self.cursor.expect(TokenKind::Colon)?;
                let ty = self.parse_type()?;
                let result = b.concat(lhs, rhs, ty, op_span)?;
                self.bind(env, binding, Some(result))
            }
            TokenKind::Shl | TokenKind::Shr => {
                self.cursor.advance();
                let value = self.parse_operand(env)?;
                self.cursor.expect(TokenKind::Comma)?;
                let amount = self.parse_operand(env)?;
                let result = if matches!(token.kind, TokenKind::Shl) {
                    b.shl(value, amount, op_span)?
                } else {
                    b.shr(value, amount, op_span)?
                };
                self.bind(env, binding, Some(result))
            }
            TokenKind::Cmp => {
                self.cursor.advance();
                let TokenKind::Ident(kind_name) = self.cursor.current_kind() else {
                    return Err(self.cursor.unexpected("a comparison kind"));
                };
                let Some(kind) = CmpKind::from_mnemonic(self.ctx.strings.lookup(kind_name))
                else {
                    return Err(self.cursor.unexpected("a comparison kind"));
                };
                self.cursor.advance();
                self.cursor.expect(TokenKind::Comma)?;
                let lhs = self.parse_operand(env)?;
                self.cursor.expect(TokenKind::Comma)?;
                let rhs = self.parse_operand(env)?;
                let result = b.cmp(kind, lhs, rhs, op_span);
                self.bind(env, binding, Some(result))
            }
            TokenKind::Variable => {
                self.cursor.advance();
                self.cursor.expect(TokenKind::Colon)?;
                let ty = self.parse_type()?;
                let name = self.name_override(binding);
                let result = b.variable(name, ty, op_span);
                self.bind(env, binding, Some(result))
            }
            TokenKind::Scope => {
                self.cursor.advance();
                let region = self.parse_nested_region(b, env)?;
                let result = b.finish_scope(region, op_span)?;
                self.bind(env, binding, result)
            }
            TokenKind::If => {
                self.cursor.advance();
                let condition = self.parse_operand(env)?;
                let then_region = self.parse_nested_region(b, env)?;
                let else_region = if self.cursor.eat(TokenKind::Else) {
                    Some(self.parse_nested_region(b, env)?)
                } else {
                    None
                };
                b.finish_if(condition, then_region, else_region, op_span)?;
                self.bind(env, binding, None)
            }
            TokenKind::Ternary => {
                self.cursor.advance();
                let condition = self.parse_operand(env)?;
                self.cursor.expect(TokenKind::Comma)?;
                self.cursor.expect(TokenKind::True)?;
                let true_region = self.parse_nested_region(b, env)?;
                self.cursor.expect(TokenKind::Comma)?;
                self.cursor.expect(TokenKind::False)?;
                let false_region = self.parse_nested_region(b, env)?;
                let result = b.finish_ternary(condition, true_region, false_region, op_span)?;
                self.bind(env, binding, result)
            }
            TokenKind::Yield => {
                self.cursor.advance();
                let values = self.parse_operand_list(env)?;
                b.yield_op(&values, op_span);
                self.bind(env, binding, None)
            }
            TokenKind::Return => {
                self.cursor.advance();
                let values = self.parse_operand_list(env)?;
                if values.len() > 1 {
                    return Err(self.cursor.unexpected("at most 1 return operand"));
                }
                b.ret(values.first().copied(), op_span)?;
                self.bind(env, binding, None)
            }
            TokenKind::Call => {
                self.cursor.advance();
                let TokenKind::Symbol(callee) = self.cursor.current_kind() else {
                    return Err(self.cursor.unexpected("a callee symbol"));
                };
                self.cursor.advance();
                self.cursor.expect(TokenKind::LParen)?;
                let mut args = Vec::new();
                if !self.cursor.eat(TokenKind::RParen) {
                    loop {
                        args.push(self.parse_operand(env)?);
                        if !self.cursor.eat(TokenKind::Comma) {
                            break;
                        }
                    }
                    self.cursor.expect(TokenKind::RParen)?;
                }
                let result = b.call(&self.module, callee, &args, op_span)?;
                if binding.is_some() && result.is_none() {
                    // The callee resolved (the call verified), so the
                    // signature lookup cannot miss here.
                    let is_action = self
                        .module
                        .lookup(callee)
                        .is_some_and(|sig| sig.is_action);
                    return Err(if is_action {
                        Diagnostic::error(ErrorCode::E4004)
                            .with_message("incorrect number of results for action call")
                            .with_label(op_span, "in this call")
                    } else {
                        Diagnostic::error(ErrorCode::E4005)
                            .with_message("callee returns void but call has results")
                            .with_label(op_span, "in this call")
                    });
                }
                self.bind(env, binding, result)
            }
            TokenKind::Ident(mnemonic) => {
                let text = self.ctx.strings.lookup(mnemonic);
                if let Some(kind) = UnaryKind::from_mnemonic(text) {
                    self.cursor.advance();
                    let operand = self.parse_operand(env)?;
                    let result = b.unary(kind, operand, op_span);
                    self.bind(env, binding, Some(result))
                } else if let Some(kind) = BinKind::from_mnemonic(text) {
                    self.cursor.advance();
                    let lhs = self.parse_operand(env)?;
                    self.cursor.expect(TokenKind::Comma)?;
                    let rhs = self.parse_operand(env)?;
                    let result = b.binary(kind, lhs, rhs, op_span);
                    self.bind(env, binding, Some(result))
                } else {
                    Err(Diagnostic::error(ErrorCode::E1009)
                        .with_message(format!("unknown operation mnemonic `{text}`"))
                        .with_label(op_span, "not an operation"))
                }
            }
            _ => Err(self.cursor.unexpected("an operation")),
        }
    }

    /// `%name`: resolve a previously defined value.
    fn parse_operand(
        &mut self,
        env: &FxHashMap<Name, ValueId>,
    ) -> Result<ValueId, Diagnostic> {
        let TokenKind::Value(name) = self.cursor.current_kind() else {
            return Err(self.cursor.unexpected("a value operand"));
        };
        let span = self.cursor.advance().span;
        env.get(&name).copied().ok_or_else(|| {
            Diagnostic::error(ErrorCode::E1010)
                .with_message(format!(
                    "undefined value name '%{}'",
                    self.ctx.strings.lookup(name)
                ))
                .with_label(span, "not defined at this point")
        })
    }

    /// Zero or more comma-separated operands. A `%name` followed by `=`
    /// belongs to the next statement, not this list.
    fn parse_operand_list(
        &mut self,
        env: &FxHashMap<Name, ValueId>,
    ) -> Result<Vec<ValueId>, Diagnostic> {
        let mut values = Vec::new();
        let starts_operand = matches!(self.cursor.current_kind(), TokenKind::Value(_))
            && !matches!(self.cursor.peek(1), TokenKind::Assign);
        if starts_operand {
            values.push(self.parse_operand(env)?);
            while self.cursor.eat(TokenKind::Comma) {
                values.push(self.parse_operand(env)?);
            }
        }
        Ok(values)
    }

    /// Bind a parsed result name, rejecting bindings on result-less ops.
    fn bind(
        &mut self,
        env: &mut FxHashMap<Name, ValueId>,
        binding: Binding,
        produced: Option<ValueId>,
    ) -> Result<(), Diagnostic> {
        match (binding, produced) {
            (Some((name, _)), Some(value)) => {
                env.insert(name, value);
                Ok(())
            }
            (Some((name, span)), None) => Err(Diagnostic::error(ErrorCode::E1012)
                .with_message(format!(
                    "'%{}' is bound to an operation that produces no result",
                    self.ctx.strings.lookup(name)
                ))
                .with_label(span, "binding here")),
            (None, _) => Ok(()),
        }
    }

    /// A parsed constant keeps its textual name as an override only when it
    /// is neither the printer's numeric fallback nor the synthesized name.
    fn const_override(&self, binding: Binding, attr: &Attr) -> Option<Name> {
        let (name, _) = binding?;
        let text = self.ctx.strings.lookup(name);
        if text.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        (text != attr.suggested_name(self.ctx)).then_some(name)
    }

    /// A variable keeps its textual name unless it is the numeric fallback.
    fn name_override(&self, binding: Binding) -> Option<Name> {
        let (name, _) = binding?;
        let text = self.ctx.strings.lookup(name);
        (!text.chars().all(|c| c.is_ascii_digit())).then_some(name)
    }
}
