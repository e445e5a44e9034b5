//! Textual-form printer.
//!
//! Prints modules and functions in the round-trippable textual encoding.
//! SSA value names come from the constant debug-name synthesis (`%true`,
//! `%c10_bit16`), variable names, or operation mnemonics, uniqued with
//! numeric suffixes; anonymous values fall back to a per-function counter.
//!
//! A region body omits its trailing terminator exactly when it has one
//! non-empty block terminated by a zero-operand `yield`; multi-block
//! regions always spell terminators and label their non-entry blocks.

use rustc_hash::FxHashMap;
use weir_ir::TypeId;
use weir_types::Context;

use crate::body::Body;
use crate::func::FuncOp;
use crate::ids::{BlockId, OpId, RegionId, ValueId};
use crate::module::Module;
use crate::op::OpKind;
use crate::Attr;

/// Print a whole module.
pub fn print_module(ctx: &Context, module: &Module) -> String {
    let mut out = String::new();
    for (i, func) in module.funcs().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        out.push_str(&print_func(ctx, func));
        out.push('\n');
    }
    out
}

/// Print one function entity (declaration or definition).
pub fn print_func(ctx: &Context, func: &FuncOp) -> String {
    let mut out = String::new();
    out.push_str("func ");
    if func.is_action {
        out.push_str("action ");
    }
    out.push('@');
    out.push_str(ctx.strings.lookup(func.name));
    out.push(' ');

    match &func.body {
        None => {
            // Declaration: bare type signature.
            if let Some(ret) = func.ret {
                out.push_str(&format!("{} ", ctx.display(ret)));
            }
            out.push('(');
            for (i, &input) in func.inputs.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                out.push_str(&ctx.display(input).to_string());
            }
            out.push(')');
            if let Some(annotation) = func.annotation {
                out.push_str(&format!(" \"{}\"", ctx.strings.lookup(annotation)));
            }
        }
        Some(body) => {
            let mut printer = BodyPrinter::new(ctx, body);
            // Name the arguments before anything else so uses agree.
            let params = body.block(body.entry_block()).params.clone();
            for (i, &param) in params.iter().enumerate() {
                printer.assign_name(param, Some(format!("arg{i}")));
            }

            if let Some(ret) = func.ret {
                out.push_str(&format!("{} ", ctx.display(ret)));
            }
            out.push('(');
            for (i, &param) in params.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                out.push_str(&format!(
                    "%{}: {}",
                    printer.value_name(param),
                    ctx.display(body.value_type(param))
                ));
            }
            out.push(')');
            if let Some(annotation) = func.annotation {
                out.push_str(&format!(" \"{}\"", ctx.strings.lookup(annotation)));
            }
            out.push(' ');
            printer.print_region(&mut out, body.entry_region(), 0, false);
        }
    }
    out
}

struct BodyPrinter<'a> {
    ctx: &'a Context,
    body: &'a Body,
    names: FxHashMap<ValueId, String>,
    taken: FxHashMap<String, u32>,
    next_anon: u32,
    labels: FxHashMap<BlockId, String>,
    next_label: u32,
}

impl<'a> BodyPrinter<'a> {
    fn new(ctx: &'a Context, body: &'a Body) -> Self {
        BodyPrinter {
            ctx,
            body,
            names: FxHashMap::default(),
            taken: FxHashMap::default(),
            next_anon: 0,
            labels: FxHashMap::default(),
            next_label: 1,
        }
    }

    /// Deduplicate a name the way the asm printer does: first `%true`,
    /// then `%true_0`, `%true_1`, ...
    fn unique(&mut self, base: String) -> String {
        if !self.taken.contains_key(&base) {
            self.taken.insert(base.clone(), 0);
            return base;
        }
        loop {
            let n = self.taken[&base];
            self.taken.insert(base.clone(), n + 1);
            let candidate = format!("{base}_{n}");
            if !self.taken.contains_key(&candidate) {
                self.taken.insert(candidate.clone(), 0);
                return candidate;
            }
        }
    }

    fn assign_name(&mut self, value: ValueId, hint: Option<String>) -> String {
        if let Some(existing) = self.names.get(&value) {
            return existing.clone();
        }
        let base = hint.unwrap_or_else(|| {
            let anon = self.next_anon.to_string();
            self.next_anon += 1;
            anon
        });
        let name = self.unique(base);
        self.names.insert(value, name.clone());
        name
    }

    /// The printed name of a value, assigning one from its definition on
    /// first use.
    fn value_name(&mut self, value: ValueId) -> String {
        if let Some(existing) = self.names.get(&value) {
            return existing.clone();
        }
        let hint = self.name_hint(value);
        self.assign_name(value, hint)
    }

    fn name_hint(&self, value: ValueId) -> Option<String> {
        use crate::body::ValueDef;
        let ValueDef::OpResult(op) = self.body.value(value).def else {
            return None;
        };
        match &self.body.op(op).kind {
            OpKind::Const { value: attr, name } => Some(match name {
                Some(name) => self.ctx.strings.lookup(*name).to_owned(),
                None => attr.suggested_name(self.ctx),
            }),
            OpKind::Variable { name } => {
                name.map(|name| self.ctx.strings.lookup(name).to_owned())
            }
            OpKind::Cast => Some("cast".to_owned()),
            OpKind::Read => Some("val".to_owned()),
            OpKind::Unary(kind) => Some(kind.mnemonic().to_owned()),
            OpKind::Binary(kind) => Some(kind.mnemonic().to_owned()),
            OpKind::Cmp(kind) => Some(kind.mnemonic().to_owned()),
            OpKind::Call { .. } => Some("call".to_owned()),
            _ => None,
        }
    }

    fn block_label(&mut self, block: BlockId) -> String {
        if let Some(existing) = self.labels.get(&block) {
            return existing.clone();
        }
        let label = format!("bb{}", self.next_label);
        self.next_label += 1;
        self.labels.insert(block, label.clone());
        label
    }

    /// True when the region may omit its terminator in text: exactly one
    /// non-empty block whose terminator is a zero-operand `yield`.
    fn omit_region_term(&self, region: RegionId) -> bool {
        let blocks = &self.body.region(region).blocks;
        let [only] = blocks[..] else {
            return false;
        };
        let Some(term) = self.body.terminator(only) else {
            return false;
        };
        let term = self.body.op(term);
        matches!(term.kind, OpKind::Yield) && term.operands.is_empty()
    }

    fn print_region(&mut self, out: &mut String, region: RegionId, indent: usize, allow_omit: bool) {
        let omit = allow_omit && self.omit_region_term(region);
        out.push_str("{\n");
        let blocks = self.body.region(region).blocks.clone();
        for (i, &block) in blocks.iter().enumerate() {
            if i > 0 {
                let label = self.block_label(block);
                let pad = "  ".repeat(indent + 1);
                out.push_str(&pad);
                out.push('^');
                out.push_str(&label);
                let params = self.body.block(block).params.clone();
                if !params.is_empty() {
                    out.push('(');
                    for (j, &param) in params.iter().enumerate() {
                        if j > 0 {
                            out.push_str(", ");
                        }
                        out.push_str(&format!(
                            "%{}: {}",
                            self.value_name(param),
                            self.ctx.display(self.body.value_type(param))
                        ));
                    }
                    out.push(')');
                }
                out.push_str(":\n");
            }
            let ops = self.body.block(block).ops.clone();
            for (j, &op) in ops.iter().enumerate() {
                if omit && j + 1 == ops.len() {
                    break;
                }
                self.print_op(out, op, indent + 1);
            }
        }
        out.push_str(&"  ".repeat(indent));
        out.push('}');
    }

    fn print_op(&mut self, out: &mut String, op: OpId, indent: usize) {
        let pad = "  ".repeat(indent);
        out.push_str(&pad);

        let (kind, operands, result) = {
            let data = self.body.op(op);
            (data.kind.clone(), data.operands.clone(), data.result())
        };
        let result_ty = result.map(|r| self.body.value_type(r));

        if let Some(result) = result {
            let name = self.value_name(result);
            out.push_str(&format!("%{name} = "));
        }

        match kind {
            OpKind::Const { value, .. } => match &value {
                Attr::Bool(b) => out.push_str(if *b { "const true" } else { "const false" }),
                Attr::Int(int) => out.push_str(&format!(
                    "const {} : {}",
                    int.value,
                    self.ctx.display(int.ty)
                )),
                Attr::Str(name) => {
                    out.push_str(&format!("const \"{}\"", self.ctx.strings.lookup(*name)));
                }
            },
            OpKind::Cast => {
                let ty = result_ty.unwrap_or(TypeId::VOID);
                let operand = self.value_name(operands[0]);
                out.push_str(&format!("cast %{operand} : {}", self.ctx.display(ty)));
            }
            OpKind::Read => {
                let operand = self.value_name(operands[0]);
                out.push_str(&format!("read %{operand}"));
            }
            OpKind::Unary(unary) => {
                let operand = self.value_name(operands[0]);
                out.push_str(&format!("{} %{operand}", unary.mnemonic()));
            }
            OpKind::Binary(binary) => {
                let lhs = self.value_name(operands[0]);
                let rhs = self.value_name(operands[1]);
                out.push_str(&format!("{} %{lhs}, %{rhs}", binary.mnemonic()));
            }
            OpKind::Concat => {
                let ty = result_ty.unwrap_or(TypeId::VOID);
                let lhs = self.value_name(operands[0]);
                let rhs = self.value_name(operands[1]);
                out.push_str(&format!(
                    "concat %{lhs}, %{rhs} : {}",
                    self.ctx.display(ty)
                ));
            }
            OpKind::Shl | OpKind::Shr => {
                let mnemonic = if matches!(kind, OpKind::Shl) { "shl" } else { "shr" };
                let lhs = self.value_name(operands[0]);
                let rhs = self.value_name(operands[1]);
                out.push_str(&format!("{mnemonic} %{lhs}, %{rhs}"));
            }
            OpKind::Cmp(cmp) => {
                let lhs = self.value_name(operands[0]);
                let rhs = self.value_name(operands[1]);
                out.push_str(&format!("cmp {}, %{lhs}, %{rhs}", cmp.mnemonic()));
            }
            OpKind::Variable { .. } => {
                let ty = result_ty.unwrap_or(TypeId::VOID);
                out.push_str(&format!("variable : {}", self.ctx.display(ty)));
            }
            OpKind::Scope { region } => {
                out.push_str("scope ");
                self.print_region(out, region, indent, true);
            }
            OpKind::If {
                then_region,
                else_region,
            } => {
                let cond = self.value_name(operands[0]);
                out.push_str(&format!("if %{cond} "));
                self.print_region(out, then_region, indent, true);
                if let Some(else_region) = else_region {
                    out.push_str(" else ");
                    self.print_region(out, else_region, indent, true);
                }
            }
            OpKind::Ternary {
                true_region,
                false_region,
            } => {
                let cond = self.value_name(operands[0]);
                out.push_str(&format!("ternary %{cond}, true "));
                self.print_region(out, true_region, indent, true);
                out.push_str(", false ");
                self.print_region(out, false_region, indent, true);
            }
            OpKind::Yield => {
                out.push_str("yield");
                for (i, &operand) in operands.iter().enumerate() {
                    let name = self.value_name(operand);
                    out.push_str(if i == 0 { " %" } else { ", %" });
                    out.push_str(&name);
                }
            }
            OpKind::Return => {
                out.push_str("return");
                if let Some(&operand) = operands.first() {
                    let name = self.value_name(operand);
                    out.push_str(&format!(" %{name}"));
                }
            }
            OpKind::Call { callee } => {
                out.push_str(&format!("call @{}(", self.ctx.strings.lookup(callee)));
                for (i, &operand) in operands.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    let name = self.value_name(operand);
                    out.push_str(&format!("%{name}"));
                }
                out.push(')');
            }
        }
        out.push('\n');
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::FuncBuilder;
    use crate::func::FuncOp;
    use weir_diagnostic::Diagnostic;
    use weir_ir::{Span, TypeId};

    fn ok<T>(result: Result<T, Diagnostic>) -> T {
        result.unwrap_or_else(|e| panic!("{e}"))
    }

    #[test]
    fn test_scope_body_omits_trailing_yield() {
        let ctx = Context::new();
        let mut b = FuncBuilder::new(&ctx, &[], None);
        ok(b.scope(Span::DUMMY, |b| {
            b.const_op(Attr::Bool(true), TypeId::BOOL, Span::DUMMY)?;
            b.yield_op(&[], Span::DUMMY);
            Ok(())
        }));
        ok(b.ret(None, Span::DUMMY));

        let name = ctx.strings.intern("f");
        let ty = ctx.types.function([], None);
        let mut func = ok(FuncOp::build(&ctx, name, ty, false, Span::DUMMY));
        ok(func.set_body(b.finish()));

        let text = print_func(&ctx, &func);
        assert!(text.contains("scope {\n    %true = const true\n  }"), "{text}");
        // The function body itself always spells its terminator.
        assert!(text.contains("return"), "{text}");
    }

    #[test]
    fn test_declaration_signature() {
        let ctx = Context::new();
        let b16 = ctx.types.bits(16, false);
        let name = ctx.strings.intern("checksum");
        let ty = ctx.types.function([b16, TypeId::BOOL], Some(b16));
        let func = ok(FuncOp::build(&ctx, name, ty, false, Span::DUMMY));
        assert_eq!(
            print_func(&ctx, &func),
            "func @checksum bit<16> (bit<16>, bool)"
        );
    }

    #[test]
    fn test_constant_names_uniqued() {
        let ctx = Context::new();
        let b16 = ctx.types.bits(16, false);
        let mut b = FuncBuilder::new(&ctx, &[], None);
        ok(b.const_op(Attr::int(10, b16), b16, Span::DUMMY));
        ok(b.const_op(Attr::int(10, b16), b16, Span::DUMMY));
        ok(b.ret(None, Span::DUMMY));

        let name = ctx.strings.intern("f");
        let ty = ctx.types.function([], None);
        let mut func = ok(FuncOp::build(&ctx, name, ty, false, Span::DUMMY));
        ok(func.set_body(b.finish()));

        let text = print_func(&ctx, &func);
        assert!(text.contains("%c10_bit16 = const 10 : bit<16>"), "{text}");
        assert!(text.contains("%c10_bit16_0 = const 10 : bit<16>"), "{text}");
    }
}
