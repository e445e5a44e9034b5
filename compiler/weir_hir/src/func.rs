//! Function entities and symbol resolution.

use weir_diagnostic::{Diagnostic, ErrorCode};
use weir_ir::{Name, Span, TypeId};
use weir_types::Context;

use crate::body::Body;

/// Symbol visibility. Functions default to private, matching the original
/// front-end contract.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub enum Visibility {
    #[default]
    Private,
    Public,
}

/// The callable surface of a function, as seen by `call` verification.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct FuncSignature {
    pub inputs: Box<[TypeId]>,
    /// `None` means void.
    pub ret: Option<TypeId>,
    pub is_action: bool,
}

impl FuncSignature {
    /// Whether the function returns void.
    pub fn is_void(&self) -> bool {
        self.ret.is_none()
    }

    /// The return type, synthesizing `void` when absent.
    pub fn return_type(&self) -> TypeId {
        self.ret.unwrap_or(TypeId::VOID)
    }
}

/// Read-only symbol resolution, implemented by the enclosing module.
pub trait SymbolLookup {
    fn lookup(&self, name: Name) -> Option<FuncSignature>;
}

/// A lookup that resolves nothing. For bodies built outside any module.
#[derive(Copy, Clone, Debug, Default)]
pub struct NoSymbols;

impl SymbolLookup for NoSymbols {
    fn lookup(&self, _name: Name) -> Option<FuncSignature> {
        None
    }
}

/// A named, symbol-addressable function: signature, action flag,
/// visibility, opaque annotation, and an optional body region.
///
/// Absent body = declaration; present body = definition.
#[derive(Clone, Debug)]
pub struct FuncOp {
    pub name: Name,
    /// The interned `Function` type carrying the signature.
    pub ty: TypeId,
    pub inputs: Box<[TypeId]>,
    /// Declared return type; `None` means void.
    pub ret: Option<TypeId>,
    pub is_action: bool,
    pub visibility: Visibility,
    /// Opaque annotation payload carried through unchanged.
    pub annotation: Option<Name>,
    pub body: Option<Body>,
    pub span: Span,
}

impl FuncOp {
    /// Construct a function entity from an interned signature type.
    ///
    /// Verifies the signature-level contract:
    /// - the type must be a `Function` type
    /// - an explicit `void` stored as the return type is rejected; absence
    ///   of a return type *is* void
    /// - an action must not declare a return type
    pub fn build(
        ctx: &Context,
        name: Name,
        ty: TypeId,
        is_action: bool,
        span: Span,
    ) -> Result<Self, Diagnostic> {
        let Some(parts) = ctx.types.function_parts(ty) else {
            return Err(Diagnostic::error(ErrorCode::E3018)
                .with_message(format!(
                    "function '@{}' requires a function-type signature, got {}",
                    ctx.strings.lookup(name),
                    ctx.display(ty)
                ))
                .with_label(span, "declared here"));
        };

        if parts.ret == Some(TypeId::VOID) {
            return Err(Diagnostic::error(ErrorCode::E3011)
                .with_message(
                    "the return type for a function returning void should be empty \
                     instead of an explicit void",
                )
                .with_label(span, "in this signature"));
        }

        if is_action && parts.ret.is_some() {
            return Err(Diagnostic::error(ErrorCode::E3010)
                .with_message(format!(
                    "action '@{}' should not produce any results, found {}",
                    ctx.strings.lookup(name),
                    ctx.display(parts.return_type())
                ))
                .with_label(span, "declared here"));
        }

        Ok(FuncOp {
            name,
            ty,
            inputs: parts.inputs,
            ret: parts.ret,
            is_action,
            visibility: Visibility::default(),
            annotation: None,
            body: None,
            span,
        })
    }

    /// Attach an opaque annotation payload.
    #[must_use]
    pub fn with_annotation(mut self, annotation: Name) -> Self {
        self.annotation = Some(annotation);
        self
    }

    /// Override the default (private) visibility.
    #[must_use]
    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    /// Attach a body, turning the declaration into a definition.
    ///
    /// The body must be non-empty and every block of its entry region must
    /// be terminated.
    pub fn set_body(&mut self, body: Body) -> Result<(), Diagnostic> {
        let region = body.entry_region();
        if body.region_ops(region).next().is_none() {
            return Err(Diagnostic::error(ErrorCode::E3008)
                .with_message("expected non-empty function body")
                .with_label(self.span, "in this function"));
        }
        for &block in &body.region(region).blocks {
            if !body.is_terminated(block) {
                return Err(Diagnostic::error(ErrorCode::E3008)
                    .with_message("every block of a function body must be terminated")
                    .with_label(self.span, "in this function"));
            }
        }
        self.body = Some(body);
        Ok(())
    }

    /// Whether this entity is a definition (has a body).
    pub fn is_definition(&self) -> bool {
        self.body.is_some()
    }

    /// Entity-level verification run when the function joins a module.
    pub fn verify(&self, ctx: &Context) -> Result<(), Diagnostic> {
        if self.is_action && self.body.is_none() {
            return Err(Diagnostic::error(ErrorCode::E3019)
                .with_message(format!(
                    "action '@{}' shall have a body",
                    ctx.strings.lookup(self.name)
                ))
                .with_label(self.span, "declared here"));
        }
        Ok(())
    }

    /// The callable signature derived from this entity.
    pub fn signature(&self) -> FuncSignature {
        FuncSignature {
            inputs: self.inputs.clone(),
            ret: self.ret,
            is_action: self.is_action,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_rejects_non_function_type() {
        let ctx = Context::new();
        let name = ctx.strings.intern("f");
        let err = FuncOp::build(&ctx, name, TypeId::BOOL, false, Span::DUMMY);
        let Err(diag) = err else {
            panic!("expected non-function signature to fail");
        };
        assert_eq!(diag.code, ErrorCode::E3018);
    }

    #[test]
    fn test_build_rejects_explicit_void_return() {
        let ctx = Context::new();
        let name = ctx.strings.intern("f");
        let ty = ctx.types.function([TypeId::BOOL], Some(TypeId::VOID));
        let err = FuncOp::build(&ctx, name, ty, false, Span::DUMMY);
        let Err(diag) = err else {
            panic!("expected explicit void return to fail");
        };
        assert_eq!(diag.code, ErrorCode::E3011);
    }

    #[test]
    fn test_build_rejects_action_with_return() {
        let ctx = Context::new();
        let name = ctx.strings.intern("drop_packet");
        let b16 = ctx.types.bits(16, false);
        let ty = ctx.types.function([b16], Some(b16));
        let err = FuncOp::build(&ctx, name, ty, true, Span::DUMMY);
        let Err(diag) = err else {
            panic!("expected action with return type to fail");
        };
        assert_eq!(diag.code, ErrorCode::E3010);
    }

    #[test]
    fn test_signature_voidness() {
        let ctx = Context::new();
        let name = ctx.strings.intern("f");
        let ty = ctx.types.function([TypeId::BOOL], None);
        let func = FuncOp::build(&ctx, name, ty, false, Span::DUMMY)
            .unwrap_or_else(|e| panic!("{e}"));
        let sig = func.signature();
        assert!(sig.is_void());
        assert_eq!(sig.return_type(), TypeId::VOID);
        assert!(!func.is_definition());
        assert_eq!(func.visibility, Visibility::Private);
    }
}
