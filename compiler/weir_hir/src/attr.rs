//! Typed constant attributes.
//!
//! Attributes are immutable constant payloads attached to `const`
//! operations. A constant's attribute must type-check against the
//! operation's declared result type; [`check_constant_type`] is that
//! contract.

use weir_diagnostic::{Diagnostic, ErrorCode};
use weir_ir::{Name, Span, TypeId};
use weir_types::{short_alias, Context};

/// An integer constant payload and its declared type (`Bits` or `InfInt`).
///
/// The value is stored as `i128`, the widest integer representation used
/// for IR constants in this codebase.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct IntAttr {
    pub value: i128,
    pub ty: TypeId,
}

/// An immutable typed constant.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum Attr {
    /// Boolean constant; its declared type is always `bool`.
    Bool(bool),
    /// Integer constant with an explicit `Bits` or `InfInt` type.
    Int(IntAttr),
    /// Opaque text payload. Used for annotation strings; never a legal
    /// constant initializer.
    Str(Name),
}

impl Attr {
    /// Integer attribute constructor.
    pub fn int(value: i128, ty: TypeId) -> Self {
        Attr::Int(IntAttr { value, ty })
    }

    /// Synthesized debug name for the value of a constant carrying this
    /// attribute. Cosmetic only; the printer uses it as the SSA name hint.
    ///
    /// - `IntAttr` -> `c<value>_<typeAlias>` (`c10_bit16`, `c7_infint`)
    /// - `BoolAttr` -> `true` / `false`
    /// - anything else -> `cst`
    pub fn suggested_name(&self, ctx: &Context) -> String {
        match self {
            Attr::Bool(value) => if *value { "true" } else { "false" }.to_owned(),
            Attr::Int(IntAttr { value, ty }) => match short_alias(&ctx.types, *ty) {
                Some(alias) => format!("c{value}_{alias}"),
                None => format!("c{value}"),
            },
            Attr::Str(_) => "cst".to_owned(),
        }
    }

    /// Render the attribute for diagnostics.
    pub fn render(&self, ctx: &Context) -> String {
        match self {
            Attr::Bool(value) => if *value { "true" } else { "false" }.to_owned(),
            Attr::Int(IntAttr { value, ty }) => {
                format!("{value} : {}", ctx.display(*ty))
            }
            Attr::Str(name) => format!("\"{}\"", ctx.strings.lookup(*name)),
        }
    }

    /// Render the attribute's own declared type for diagnostics.
    fn render_type(&self, ctx: &Context) -> String {
        match self {
            Attr::Bool(_) => "bool".to_owned(),
            Attr::Int(IntAttr { ty, .. }) => ctx.display(*ty).to_string(),
            Attr::Str(_) => "string".to_owned(),
        }
    }
}

/// Verify a `const` operation's attribute against its declared result type.
///
/// - `BoolAttr` requires the result type to be `bool`
/// - `IntAttr` requires the result type to be `Bits` or `InfInt`
/// - any other attribute kind is not a supported constant
pub fn check_constant_type(
    ctx: &Context,
    result_ty: TypeId,
    attr: &Attr,
    span: Span,
) -> Result<(), Diagnostic> {
    match attr {
        Attr::Bool(_) => {
            if result_ty != TypeId::BOOL {
                return Err(Diagnostic::error(ErrorCode::E3001)
                    .with_message(format!(
                        "result type ({}) must be 'bool' for '{}'",
                        ctx.display(result_ty),
                        attr.render(ctx)
                    ))
                    .with_label(span, "in this constant"));
            }
            Ok(())
        }
        Attr::Int(_) => {
            if !ctx.types.lookup(result_ty).is_integer() {
                return Err(Diagnostic::error(ErrorCode::E3002)
                    .with_message(format!(
                        "result type ({}) does not match value type ({})",
                        ctx.display(result_ty),
                        attr.render(ctx)
                    ))
                    .with_label(span, "in this constant"));
            }
            Ok(())
        }
        Attr::Str(_) => Err(Diagnostic::error(ErrorCode::E3003)
            .with_message(format!(
                "constant with type {} not supported",
                attr.render_type(ctx)
            ))
            .with_label(span, "in this constant")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bool_attr_requires_bool_type() {
        let ctx = Context::new();
        let b8 = ctx.types.bits(8, false);

        assert!(check_constant_type(&ctx, TypeId::BOOL, &Attr::Bool(true), Span::DUMMY).is_ok());

        let err = check_constant_type(&ctx, b8, &Attr::Bool(true), Span::DUMMY);
        let Err(diag) = err else {
            panic!("expected bool/bits mismatch to fail");
        };
        assert_eq!(diag.code, ErrorCode::E3001);
        assert!(diag.message.contains("bit<8>"));
    }

    #[test]
    fn test_int_attr_requires_integer_type() {
        let ctx = Context::new();
        let b16 = ctx.types.bits(16, false);

        assert!(check_constant_type(&ctx, b16, &Attr::int(10, b16), Span::DUMMY).is_ok());
        assert!(
            check_constant_type(&ctx, TypeId::INFINT, &Attr::int(10, TypeId::INFINT), Span::DUMMY)
                .is_ok()
        );

        let err = check_constant_type(&ctx, TypeId::BOOL, &Attr::int(10, b16), Span::DUMMY);
        let Err(diag) = err else {
            panic!("expected int/bool mismatch to fail");
        };
        assert_eq!(diag.code, ErrorCode::E3002);
    }

    #[test]
    fn test_unsupported_constant_type() {
        let ctx = Context::new();
        let name = ctx.strings.intern("payload");

        let err = check_constant_type(&ctx, TypeId::BOOL, &Attr::Str(name), Span::DUMMY);
        let Err(diag) = err else {
            panic!("expected string constant to fail");
        };
        assert_eq!(diag.code, ErrorCode::E3003);
        assert!(diag.message.contains("constant with type string not supported"));
    }

    #[test]
    fn test_suggested_names() {
        let ctx = Context::new();
        let b16 = ctx.types.bits(16, false);
        let i8t = ctx.types.bits(8, true);

        assert_eq!(Attr::Bool(true).suggested_name(&ctx), "true");
        assert_eq!(Attr::Bool(false).suggested_name(&ctx), "false");
        assert_eq!(Attr::int(10, b16).suggested_name(&ctx), "c10_bit16");
        assert_eq!(Attr::int(-3, i8t).suggested_name(&ctx), "c-3_int8");
        assert_eq!(
            Attr::int(7, TypeId::INFINT).suggested_name(&ctx),
            "c7_infint"
        );
        assert_eq!(
            Attr::Str(ctx.strings.intern("x")).suggested_name(&ctx),
            "cst"
        );
    }
}
