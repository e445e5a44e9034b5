//! Type rendering for diagnostics and the textual form.

use std::fmt;

use weir_ir::{StringInterner, TypeId};

use crate::data::TypeData;
use crate::interner::TypeInterner;

/// Displays a type in its textual form.
///
/// - `bool`, `infint`, `void`
/// - `Bits`: `int<W>` when signed, `bit<W>` when unsigned
/// - `Struct`: `struct<name1: type1, name2: type2, ...>`
/// - `Function`: `func<[returnType] (inputType, ...)>`; an immediate `(`
///   with no preceding type denotes void
pub struct TypeDisplay<'a> {
    types: &'a TypeInterner,
    strings: &'a StringInterner,
    id: TypeId,
}

impl<'a> TypeDisplay<'a> {
    pub fn new(types: &'a TypeInterner, strings: &'a StringInterner, id: TypeId) -> Self {
        TypeDisplay { types, strings, id }
    }

    fn write(&self, f: &mut fmt::Formatter<'_>, id: TypeId) -> fmt::Result {
        match self.types.lookup(id) {
            TypeData::Bool => write!(f, "bool"),
            TypeData::InfInt => write!(f, "infint"),
            TypeData::Void => write!(f, "void"),
            TypeData::Bits { width, signed } => {
                write!(f, "{}<{width}>", if signed { "int" } else { "bit" })
            }
            TypeData::Struct { fields } => {
                write!(f, "struct<")?;
                for (i, field) in fields.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: ", self.strings.lookup(field.name))?;
                    self.write(f, field.ty)?;
                }
                write!(f, ">")
            }
            TypeData::Function { inputs, ret } => {
                write!(f, "func<")?;
                self.write_signature(f, &inputs, ret)?;
                write!(f, ">")
            }
        }
    }

    /// Write a bare function signature: `[returnType] (inputs)`.
    pub fn write_signature(
        &self,
        f: &mut fmt::Formatter<'_>,
        inputs: &[TypeId],
        ret: Option<TypeId>,
    ) -> fmt::Result {
        if let Some(ret) = ret {
            self.write(f, ret)?;
            write!(f, " ")?;
        }
        write!(f, "(")?;
        for (i, &input) in inputs.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            self.write(f, input)?;
        }
        write!(f, ")")
    }
}

impl fmt::Display for TypeDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write(f, self.id)
    }
}

/// Short alias used in synthesized constant names: `bit16`, `int8`,
/// `infint`. Types without an alias return `None`.
pub fn short_alias(types: &TypeInterner, id: TypeId) -> Option<String> {
    match types.lookup(id) {
        TypeData::Bits { width, signed } => {
            Some(format!("{}{width}", if signed { "int" } else { "bit" }))
        }
        TypeData::InfInt => Some("infint".to_owned()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::StructField;
    use weir_ir::StringInterner;

    fn render(types: &TypeInterner, strings: &StringInterner, id: TypeId) -> String {
        TypeDisplay::new(types, strings, id).to_string()
    }

    #[test]
    fn test_bits_aliases() {
        let types = TypeInterner::new();
        let strings = StringInterner::new();
        assert_eq!(render(&types, &strings, types.bits(4, false)), "bit<4>");
        assert_eq!(render(&types, &strings, types.bits(32, true)), "int<32>");
    }

    #[test]
    fn test_struct_display() {
        let types = TypeInterner::new();
        let strings = StringInterner::new();
        let st = types
            .try_struct([
                StructField::new(strings.intern("flag"), TypeId::BOOL),
                StructField::new(strings.intern("len"), types.bits(8, false)),
            ])
            .unwrap_or_else(|e| panic!("{e:?}"));
        assert_eq!(
            render(&types, &strings, st),
            "struct<flag: bool, len: bit<8>>"
        );
    }

    #[test]
    fn test_function_display() {
        let types = TypeInterner::new();
        let strings = StringInterner::new();
        let b16 = types.bits(16, false);
        let f = types.function([b16, TypeId::BOOL], Some(b16));
        assert_eq!(render(&types, &strings, f), "func<bit<16> (bit<16>, bool)>");

        let v = types.function([TypeId::BOOL], None);
        assert_eq!(render(&types, &strings, v), "func<(bool)>");
    }

    #[test]
    fn test_short_alias() {
        let types = TypeInterner::new();
        assert_eq!(
            short_alias(&types, types.bits(16, false)).as_deref(),
            Some("bit16")
        );
        assert_eq!(
            short_alias(&types, types.bits(8, true)).as_deref(),
            Some("int8")
        );
        assert_eq!(short_alias(&types, TypeId::INFINT).as_deref(), Some("infint"));
        assert_eq!(short_alias(&types, TypeId::BOOL), None);
    }
}
