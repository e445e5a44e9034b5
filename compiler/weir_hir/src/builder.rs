//! Verified operation construction.
//!
//! `FuncBuilder` is the single mutator of a body under construction. Every
//! operation method runs the operation's verification contract first and only
//! then inserts; on failure the diagnostic is returned and nothing joins the
//! region. The builder captures the enclosing function's declared return
//! type at creation time, so `return` verification never walks ancestors.

use smallvec::SmallVec;
use weir_diagnostic::{Diagnostic, ErrorCode};
use weir_ir::{Name, Span, TypeId};
use weir_types::{Context, TypeData};

use crate::attr::{check_constant_type, Attr};
use crate::body::{Body, ValueDef};
use crate::func::SymbolLookup;
use crate::ids::{BlockId, OpId, RegionId, ValueId};
use crate::op::{BinKind, CmpKind, OpKind, UnaryKind};

/// Builder for one function body.
pub struct FuncBuilder<'a> {
    ctx: &'a Context,
    /// Declared return type of the enclosing function; `None` means void.
    ret: Option<TypeId>,
    body: Body,
    /// Current insertion block.
    block: BlockId,
}

impl<'a> FuncBuilder<'a> {
    /// Create a builder for a function with the given inputs and return
    /// type. The entry block receives one parameter per input.
    pub fn new(ctx: &'a Context, inputs: &[TypeId], ret: Option<TypeId>) -> Self {
        let body = Body::new(inputs);
        let block = body.entry_block();
        FuncBuilder {
            ctx,
            ret,
            body,
            block,
        }
    }

    /// Create a builder from an interned `Function` type.
    pub fn for_signature(ctx: &'a Context, signature: TypeId) -> Result<Self, Diagnostic> {
        let Some(parts) = ctx.types.function_parts(signature) else {
            return Err(Diagnostic::error(ErrorCode::E3018)
                .with_message(format!(
                    "builder requires a function-type signature, got {}",
                    ctx.display(signature)
                )));
        };
        Ok(Self::new(ctx, &parts.inputs, parts.ret))
    }

    /// The entry-block parameter values (the function arguments).
    pub fn args(&self) -> &[ValueId] {
        &self.body.block(self.body.entry_block()).params
    }

    /// The i-th function argument.
    pub fn arg(&self, index: usize) -> ValueId {
        self.args()[index]
    }

    /// The body built so far.
    pub fn body(&self) -> &Body {
        &self.body
    }

    pub fn value_type(&self, value: ValueId) -> TypeId {
        self.body.value_type(value)
    }

    /// The current insertion block.
    pub fn current_block(&self) -> BlockId {
        self.block
    }

    /// Move the insertion point to an existing block.
    pub fn switch_to_block(&mut self, block: BlockId) {
        self.block = block;
    }

    /// Append a new block to the region of the current block and return it.
    /// The insertion point does not move.
    pub fn append_block(&mut self, param_tys: &[TypeId]) -> BlockId {
        let region = self.body.block(self.block).region;
        self.body.append_block(region, param_tys)
    }

    /// Finish building and hand the body over.
    pub fn finish(self) -> Body {
        self.body
    }

    fn render(&self, ty: TypeId) -> String {
        self.ctx.display(ty).to_string()
    }

    fn insert(
        &mut self,
        kind: OpKind,
        operands: &[ValueId],
        result_tys: &[TypeId],
        span: Span,
    ) -> OpId {
        tracing::trace!(mnemonic = kind.mnemonic(), "inserting op");
        self.body.push_op(
            self.block,
            kind,
            SmallVec::from_slice(operands),
            result_tys,
            span,
        )
    }

    fn single_result(&self, op: OpId) -> ValueId {
        // Every caller passes exactly one result type.
        self.body.op(op).results[0]
    }

    // ---- leaf operations -------------------------------------------------

    /// `const`: a typed constant. The attribute must type-check against the
    /// declared result type.
    pub fn const_op(
        &mut self,
        value: Attr,
        result_ty: TypeId,
        span: Span,
    ) -> Result<ValueId, Diagnostic> {
        self.const_impl(value, None, result_ty, span)
    }

    /// `const` with an explicit debug name overriding the synthesized one.
    pub fn const_named(
        &mut self,
        name: Name,
        value: Attr,
        result_ty: TypeId,
        span: Span,
    ) -> Result<ValueId, Diagnostic> {
        self.const_impl(value, Some(name), result_ty, span)
    }

    fn const_impl(
        &mut self,
        value: Attr,
        name: Option<Name>,
        result_ty: TypeId,
        span: Span,
    ) -> Result<ValueId, Diagnostic> {
        check_constant_type(self.ctx, result_ty, &value, span)?;
        let op = self.insert(OpKind::Const { value, name }, &[], &[result_ty], span);
        Ok(self.single_result(op))
    }

    /// `cast`: type conversion. Legality is caller-enforced.
    pub fn cast(&mut self, value: ValueId, result_ty: TypeId, span: Span) -> ValueId {
        let op = self.insert(OpKind::Cast, &[value], &[result_ty], span);
        self.single_result(op)
    }

    /// `read`: load the value of an addressable location.
    pub fn read(&mut self, location: ValueId, span: Span) -> Result<ValueId, Diagnostic> {
        let addressable = match self.body.value(location).def {
            ValueDef::OpResult(op) => self.body.op(op).kind.is_addressable_def(),
            ValueDef::BlockParam { .. } => false,
        };
        if !addressable {
            return Err(Diagnostic::error(ErrorCode::E3013)
                .with_message(format!(
                    "read expects an addressable location, got a value of type {}",
                    self.render(self.value_type(location))
                ))
                .with_label(span, "in this read"));
        }
        let pointee = self.value_type(location);
        let op = self.insert(OpKind::Read, &[location], &[pointee], span);
        Ok(self.single_result(op))
    }

    /// Unary operation; the result has the operand's type.
    pub fn unary(&mut self, kind: UnaryKind, operand: ValueId, span: Span) -> ValueId {
        let ty = self.value_type(operand);
        let op = self.insert(OpKind::Unary(kind), &[operand], &[ty], span);
        self.single_result(op)
    }

    /// Binary operation; the result has the left-hand side's type.
    pub fn binary(&mut self, kind: BinKind, lhs: ValueId, rhs: ValueId, span: Span) -> ValueId {
        let ty = self.value_type(lhs);
        let op = self.insert(OpKind::Binary(kind), &[lhs, rhs], &[ty], span);
        self.single_result(op)
    }

    /// `concat`: bit concatenation. The declared result type must have the
    /// summed width and the left-hand side's signedness.
    pub fn concat(
        &mut self,
        lhs: ValueId,
        rhs: ValueId,
        result_ty: TypeId,
        span: Span,
    ) -> Result<ValueId, Diagnostic> {
        let (lhs_width, lhs_signed) = self.bits_parts(lhs, span)?;
        let (rhs_width, _) = self.bits_parts(rhs, span)?;
        let TypeData::Bits {
            width: result_width,
            signed: result_signed,
        } = self.ctx.types.lookup(result_ty)
        else {
            return Err(Diagnostic::error(ErrorCode::E3015)
                .with_message(format!(
                    "concat result must be of bits type, got {}",
                    self.render(result_ty)
                ))
                .with_label(span, "in this concat"));
        };

        if result_width != lhs_width + rhs_width {
            return Err(Diagnostic::error(ErrorCode::E3004)
                .with_message(
                    "the resulting width of a concatenation operation must equal \
                     the sum of the operand widths",
                )
                .with_label(span, "in this concat")
                .with_note(format!(
                    "operands are {} and {}, result is {}",
                    self.render(self.value_type(lhs)),
                    self.render(self.value_type(rhs)),
                    self.render(result_ty)
                )));
        }

        if result_signed != lhs_signed {
            return Err(Diagnostic::error(ErrorCode::E3005)
                .with_message(
                    "the signedness of the concatenation result must match the \
                     signedness of the left-hand side operand",
                )
                .with_label(span, "in this concat"));
        }

        let op = self.insert(OpKind::Concat, &[lhs, rhs], &[result_ty], span);
        Ok(self.single_result(op))
    }

    fn bits_parts(&self, value: ValueId, span: Span) -> Result<(u32, bool), Diagnostic> {
        match self.ctx.types.lookup(self.value_type(value)) {
            TypeData::Bits { width, signed } => Ok((width, signed)),
            _ => Err(Diagnostic::error(ErrorCode::E3015)
                .with_message(format!(
                    "operand must be of bits type, got {}",
                    self.render(self.value_type(value))
                ))
                .with_label(span, "in this operation")),
        }
    }

    /// `shl`: left shift.
    pub fn shl(&mut self, value: ValueId, amount: ValueId, span: Span) -> Result<ValueId, Diagnostic> {
        self.shift(OpKind::Shl, value, amount, span)
    }

    /// `shr`: right shift.
    pub fn shr(&mut self, value: ValueId, amount: ValueId, span: Span) -> Result<ValueId, Diagnostic> {
        self.shift(OpKind::Shr, value, amount, span)
    }

    fn shift(
        &mut self,
        kind: OpKind,
        value: ValueId,
        amount: ValueId,
        span: Span,
    ) -> Result<ValueId, Diagnostic> {
        if self
            .ctx
            .types
            .lookup(self.value_type(amount))
            .is_signed_bits()
        {
            return Err(Diagnostic::error(ErrorCode::E3006)
                .with_message(
                    "the right-hand side operand of an arithmetic shift must be unsigned",
                )
                .with_label(span, "in this shift")
                .with_note(format!(
                    "shift amount has type {}",
                    self.render(self.value_type(amount))
                )));
        }
        let ty = self.value_type(value);
        let op = self.insert(kind, &[value, amount], &[ty], span);
        Ok(self.single_result(op))
    }

    /// Comparison; the result is always `bool`.
    pub fn cmp(&mut self, kind: CmpKind, lhs: ValueId, rhs: ValueId, span: Span) -> ValueId {
        let op = self.insert(OpKind::Cmp(kind), &[lhs, rhs], &[TypeId::BOOL], span);
        self.single_result(op)
    }

    /// `variable`: an addressable location with an optional debug name.
    pub fn variable(&mut self, name: Option<Name>, ty: TypeId, span: Span) -> ValueId {
        let op = self.insert(OpKind::Variable { name }, &[], &[ty], span);
        self.single_result(op)
    }

    /// `yield`: terminate the current block, handing values to the owning
    /// operation.
    pub fn yield_op(&mut self, values: &[ValueId], span: Span) -> OpId {
        self.insert(OpKind::Yield, values, &[], span)
    }

    /// `return`: terminate the enclosing function. The operand type (void
    /// if absent) must equal the function's declared return type.
    pub fn ret(&mut self, value: Option<ValueId>, span: Span) -> Result<OpId, Diagnostic> {
        let expected = self.ret.unwrap_or(TypeId::VOID);
        let actual = value.map_or(TypeId::VOID, |v| self.value_type(v));
        if actual != expected {
            return Err(Diagnostic::error(ErrorCode::E3012)
                .with_message(format!(
                    "returns {} but enclosing function returns {}",
                    self.render(actual),
                    self.render(expected)
                ))
                .with_label(span, "in this return"));
        }
        let operands: SmallVec<[ValueId; 2]> = value.into_iter().collect();
        Ok(self.insert(OpKind::Return, &operands, &[], span))
    }

    /// `call`: invoke a symbol-addressable function.
    ///
    /// The callee must resolve and the argument list must match its inputs
    /// exactly (positionally, with no coercion). Action and void callees
    /// produce no result; any other callee produces exactly one.
    pub fn call(
        &mut self,
        symbols: &dyn SymbolLookup,
        callee: Name,
        args: &[ValueId],
        span: Span,
    ) -> Result<Option<ValueId>, Diagnostic> {
        let Some(signature) = symbols.lookup(callee) else {
            return Err(Diagnostic::error(ErrorCode::E4001)
                .with_message(format!(
                    "'@{}' does not reference a valid function",
                    self.ctx.strings.lookup(callee)
                ))
                .with_label(span, "in this call"));
        };

        if signature.inputs.len() != args.len() {
            return Err(Diagnostic::error(ErrorCode::E4002)
                .with_message(format!(
                    "incorrect number of operands for callee: expected {}, found {}",
                    signature.inputs.len(),
                    args.len()
                ))
                .with_label(span, "in this call"));
        }

        for (index, (&arg, &expected)) in args.iter().zip(signature.inputs.iter()).enumerate() {
            let actual = self.value_type(arg);
            if actual != expected {
                return Err(Diagnostic::error(ErrorCode::E4003)
                    .with_message(format!(
                        "operand type mismatch: expected operand type {}, but provided {} \
                         for operand number {index}",
                        self.render(expected),
                        self.render(actual)
                    ))
                    .with_label(span, "in this call"));
            }
        }

        // Actions and void functions produce no results; everything else
        // produces exactly one of the declared return type.
        let result_tys: SmallVec<[TypeId; 1]> = if signature.is_action || signature.is_void() {
            SmallVec::new()
        } else {
            SmallVec::from_slice(&[signature.return_type()])
        };

        let op = self.insert(OpKind::Call { callee }, args, &result_tys, span);
        Ok(self.body.op(op).result())
    }

    // ---- region-owning operations ---------------------------------------

    /// Build a fresh single-entry region, run `f` with the insertion point
    /// inside it, then restore the insertion point.
    ///
    /// The region is not attached to anything yet; pass it to one of the
    /// `finish_*` methods to construct the owning operation. This split
    /// exists for the textual-form parser, which discovers the owning
    /// operation's shape (e.g. an `else` region) only after the region text
    /// has been consumed.
    pub fn build_region(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<(), Diagnostic>,
    ) -> Result<RegionId, Diagnostic> {
        let region = self.body.new_region();
        let block = self.body.append_block(region, &[]);
        let saved = std::mem::replace(&mut self.block, block);
        let outcome = f(self);
        self.block = saved;
        outcome?;
        Ok(region)
    }

    /// If a region has exactly one unterminated block, give it the implicit
    /// zero-operand `yield`.
    fn auto_terminate(&mut self, region: RegionId, span: Span) {
        let blocks = self.body.region(region).blocks.clone();
        if let [only] = blocks[..] {
            if !self.body.is_terminated(only) {
                let saved = std::mem::replace(&mut self.block, only);
                self.yield_op(&[], span);
                self.block = saved;
            }
        }
    }

    fn check_all_terminated(
        &self,
        region: RegionId,
        span: Span,
        what: &str,
    ) -> Result<(), Diagnostic> {
        for &block in &self.body.region(region).blocks {
            if !self.body.is_terminated(block) {
                return Err(Diagnostic::error(ErrorCode::E3008)
                    .with_message(format!("every block of {what} must be terminated"))
                    .with_label(span, "in this operation"));
            }
        }
        Ok(())
    }

    /// The type yielded by a region's last block, if its terminator is a
    /// yield carrying one value. Errors if the region yields more than one.
    fn yielded_type(
        &self,
        region: RegionId,
        span: Span,
        what: &str,
    ) -> Result<Option<TypeId>, Diagnostic> {
        let Some(&last) = self.body.region(region).blocks.last() else {
            return Ok(None);
        };
        let Some(term) = self.body.terminator(last) else {
            return Ok(None);
        };
        let term = self.body.op(term);
        if !matches!(term.kind, OpKind::Yield) {
            return Ok(None);
        }
        match term.operands[..] {
            [] => Ok(None),
            [value] => Ok(Some(self.body.value_type(value))),
            _ => Err(Diagnostic::error(ErrorCode::E3016)
                .with_message(format!("{what} may yield at most one value"))
                .with_label(span, "in this operation")),
        }
    }

    /// `scope`: one region, executed once, control returns to the scope.
    ///
    /// The region must not be empty and its last block must be terminated.
    /// A one-value `yield` makes the scope produce that value.
    pub fn scope(
        &mut self,
        span: Span,
        f: impl FnOnce(&mut Self) -> Result<(), Diagnostic>,
    ) -> Result<Option<ValueId>, Diagnostic> {
        let region = self.build_region(f)?;
        self.finish_scope(region, span)
    }

    /// Verify a built region and attach it to a new `scope` operation.
    pub fn finish_scope(
        &mut self,
        region: RegionId,
        span: Span,
    ) -> Result<Option<ValueId>, Diagnostic> {
        let blocks = &self.body.region(region).blocks;
        if blocks.is_empty() || self.body.region_ops(region).next().is_none() {
            return Err(Diagnostic::error(ErrorCode::E3007)
                .with_message(
                    "scope must not be empty since it should include at least \
                     an implicit yield",
                )
                .with_label(span, "in this scope"));
        }
        let last = blocks[blocks.len() - 1];
        if !self.body.is_terminated(last) {
            return Err(Diagnostic::error(ErrorCode::E3008)
                .with_message("last block of scope must be terminated")
                .with_label(span, "in this scope"));
        }

        let result_ty = self.yielded_type(region, span, "scope")?;
        let result_tys: SmallVec<[TypeId; 1]> = result_ty.into_iter().collect();
        let op = self.insert(OpKind::Scope { region }, &[], &result_tys, span);
        Ok(self.body.op(op).result())
    }

    /// `if`: a bool condition and a then-region.
    ///
    /// The region must be terminated; a single-block unterminated region
    /// auto-gains a zero-operand `yield`.
    pub fn if_op(
        &mut self,
        condition: ValueId,
        span: Span,
        then_f: impl FnOnce(&mut Self) -> Result<(), Diagnostic>,
    ) -> Result<OpId, Diagnostic> {
        let then_region = self.build_region(then_f)?;
        self.finish_if(condition, then_region, None, span)
    }

    /// `if` with an else-region. Both regions follow the same termination
    /// rules as [`FuncBuilder::if_op`].
    pub fn if_else(
        &mut self,
        condition: ValueId,
        span: Span,
        then_f: impl FnOnce(&mut Self) -> Result<(), Diagnostic>,
        else_f: impl FnOnce(&mut Self) -> Result<(), Diagnostic>,
    ) -> Result<OpId, Diagnostic> {
        let then_region = self.build_region(then_f)?;
        let else_region = self.build_region(else_f)?;
        self.finish_if(condition, then_region, Some(else_region), span)
    }

    /// Verify built region(s) and attach them to a new `if` operation.
    pub fn finish_if(
        &mut self,
        condition: ValueId,
        then_region: RegionId,
        else_region: Option<RegionId>,
        span: Span,
    ) -> Result<OpId, Diagnostic> {
        self.check_bool_condition(condition, span)?;
        self.verify_if_region(then_region, span)?;
        if let Some(region) = else_region {
            self.verify_if_region(region, span)?;
        }
        Ok(self.insert(
            OpKind::If {
                then_region,
                else_region,
            },
            &[condition],
            &[],
            span,
        ))
    }

    fn verify_if_region(&mut self, region: RegionId, span: Span) -> Result<(), Diagnostic> {
        self.auto_terminate(region, span);
        self.check_all_terminated(region, span, "an if region")
    }

    /// `ternary`: a bool condition and two regions that both terminate with
    /// a zero- or one-operand `yield` of consistent type.
    pub fn ternary(
        &mut self,
        condition: ValueId,
        span: Span,
        true_f: impl FnOnce(&mut Self) -> Result<(), Diagnostic>,
        false_f: impl FnOnce(&mut Self) -> Result<(), Diagnostic>,
    ) -> Result<Option<ValueId>, Diagnostic> {
        let true_region = self.build_region(true_f)?;
        let false_region = self.build_region(false_f)?;
        self.finish_ternary(condition, true_region, false_region, span)
    }

    /// Verify built regions and attach them to a new `ternary` operation.
    pub fn finish_ternary(
        &mut self,
        condition: ValueId,
        true_region: RegionId,
        false_region: RegionId,
        span: Span,
    ) -> Result<Option<ValueId>, Diagnostic> {
        self.check_bool_condition(condition, span)?;

        let arm_yield = |region: RegionId| -> Result<Option<TypeId>, Diagnostic> {
            let Some(&last) = self.body.region(region).blocks.last() else {
                return Err(self.ternary_needs_yield(span));
            };
            let terminated_by_yield = self
                .body
                .terminator(last)
                .is_some_and(|t| matches!(self.body.op(t).kind, OpKind::Yield));
            if !terminated_by_yield {
                return Err(self.ternary_needs_yield(span));
            }
            self.yielded_type(region, span, "a ternary region")
        };

        let true_ty = arm_yield(true_region)?;
        let false_ty = arm_yield(false_region)?;

        if true_ty != false_ty {
            let describe = |ty: Option<TypeId>| match ty {
                Some(ty) => self.render(ty),
                None => "no value".to_owned(),
            };
            return Err(Diagnostic::error(ErrorCode::E3009)
                .with_message(format!(
                    "ternary regions must yield consistent types: {} vs {}",
                    describe(true_ty),
                    describe(false_ty)
                ))
                .with_label(span, "in this ternary"));
        }

        let result_tys: SmallVec<[TypeId; 1]> = true_ty.into_iter().collect();
        let op = self.insert(
            OpKind::Ternary {
                true_region,
                false_region,
            },
            &[condition],
            &result_tys,
            span,
        );
        Ok(self.body.op(op).result())
    }

    fn ternary_needs_yield(&self, span: Span) -> Diagnostic {
        Diagnostic::error(ErrorCode::E3009)
            .with_message("ternary regions must terminate with a yield")
            .with_label(span, "in this ternary")
    }

    fn check_bool_condition(&self, condition: ValueId, span: Span) -> Result<(), Diagnostic> {
        let ty = self.value_type(condition);
        if ty != TypeId::BOOL {
            return Err(Diagnostic::error(ErrorCode::E3014)
                .with_message(format!(
                    "condition must be of bool type, got {}",
                    self.render(ty)
                ))
                .with_label(span, "condition defined here"));
        }
        Ok(())
    }
}
