//! Module: the symbol-table owner for function entities.

use rustc_hash::FxHashMap;
use weir_diagnostic::{Diagnostic, ErrorCode};
use weir_ir::Name;
use weir_types::Context;

use crate::func::{FuncOp, FuncSignature, SymbolLookup};

/// An ordered collection of function entities with unique symbol names.
#[derive(Debug, Default)]
pub struct Module {
    funcs: Vec<FuncOp>,
    symbols: FxHashMap<Name, usize>,
}

impl Module {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a function entity.
    ///
    /// Runs entity verification first; a failed function registers no
    /// symbol.
    pub fn add_func(&mut self, ctx: &Context, func: FuncOp) -> Result<(), Diagnostic> {
        func.verify(ctx)?;
        if self.symbols.contains_key(&func.name) {
            return Err(Diagnostic::error(ErrorCode::E1011)
                .with_message(format!(
                    "symbol '@{}' is already defined",
                    ctx.strings.lookup(func.name)
                ))
                .with_label(func.span, "redefined here"));
        }
        tracing::trace!(name = ctx.strings.lookup(func.name), "registering function");
        self.symbols.insert(func.name, self.funcs.len());
        self.funcs.push(func);
        Ok(())
    }

    /// Look up a function entity by symbol name.
    pub fn get(&self, name: Name) -> Option<&FuncOp> {
        self.symbols.get(&name).map(|&i| &self.funcs[i])
    }

    /// The functions in insertion order.
    pub fn funcs(&self) -> impl Iterator<Item = &FuncOp> {
        self.funcs.iter()
    }

    pub fn len(&self) -> usize {
        self.funcs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.funcs.is_empty()
    }
}

impl SymbolLookup for Module {
    fn lookup(&self, name: Name) -> Option<FuncSignature> {
        self.get(name).map(FuncOp::signature)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use weir_ir::{Span, TypeId};

    #[test]
    fn test_symbol_registration_and_lookup() {
        let ctx = Context::new();
        let mut module = Module::new();
        let name = ctx.strings.intern("checksum");
        let b16 = ctx.types.bits(16, false);
        let ty = ctx.types.function([b16, b16], Some(b16));

        let func = FuncOp::build(&ctx, name, ty, false, Span::DUMMY)
            .unwrap_or_else(|e| panic!("{e}"));
        module
            .add_func(&ctx, func)
            .unwrap_or_else(|e| panic!("{e}"));

        let sig = module.lookup(name);
        let Some(sig) = sig else {
            panic!("expected symbol to resolve");
        };
        assert_eq!(sig.inputs.len(), 2);
        assert_eq!(sig.ret, Some(b16));
        assert!(!sig.is_action);

        assert!(module.lookup(ctx.strings.intern("missing")).is_none());
    }

    #[test]
    fn test_duplicate_symbol_rejected() {
        let ctx = Context::new();
        let mut module = Module::new();
        let name = ctx.strings.intern("f");
        let ty = ctx.types.function([], None);

        let first = FuncOp::build(&ctx, name, ty, false, Span::DUMMY)
            .unwrap_or_else(|e| panic!("{e}"));
        module.add_func(&ctx, first).unwrap_or_else(|e| panic!("{e}"));

        let second = FuncOp::build(&ctx, name, ty, false, Span::DUMMY)
            .unwrap_or_else(|e| panic!("{e}"));
        let err = module.add_func(&ctx, second);
        let Err(diag) = err else {
            panic!("expected duplicate symbol to fail");
        };
        assert_eq!(diag.code, ErrorCode::E1011);
        assert_eq!(module.len(), 1);
    }

    #[test]
    fn test_failed_function_registers_no_symbol() {
        let ctx = Context::new();
        let mut module = Module::new();
        let name = ctx.strings.intern("bad_action");
        let ty = ctx.types.function([], None);

        // An action without a body fails entity verification.
        let func = FuncOp::build(&ctx, name, ty, true, Span::DUMMY)
            .unwrap_or_else(|e| panic!("{e}"));
        let err = module.add_func(&ctx, func);
        assert!(err.is_err());
        assert!(module.get(name).is_none());
        assert!(module.is_empty());
    }
}
