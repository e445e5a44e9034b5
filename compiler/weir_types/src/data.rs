//! Structural type representation stored in the interner.
//!
//! `TypeData` stores `TypeId` children rather than boxed recursion, so the
//! interner can key on it directly and equality stays O(1) at the handle
//! level.

use weir_ir::{Name, TypeId};

/// One named field of a struct type.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct StructField {
    pub name: Name,
    pub ty: TypeId,
}

impl StructField {
    pub fn new(name: Name, ty: TypeId) -> Self {
        StructField { name, ty }
    }
}

/// Structural type data.
///
/// The parameterless variants (`Bool`, `InfInt`, `Void`) are pre-interned at
/// fixed `TypeId` constants; the rest are interned on demand.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum TypeData {
    /// Boolean type.
    Bool,
    /// Arbitrary-precision integer type, unsized.
    InfInt,
    /// Void: no value. Never stored as a function return type (absence of a
    /// return type *is* void); see [`FuncType::is_void`].
    Void,
    /// Fixed-width integer: `int<W>` when signed, `bit<W>` when unsigned.
    Bits { width: u32, signed: bool },
    /// Aggregate with ordered, uniquely named fields.
    Struct { fields: Box<[StructField]> },
    /// Function signature. `ret` of `None` means void.
    Function {
        inputs: Box<[TypeId]>,
        ret: Option<TypeId>,
    },
}

impl TypeData {
    /// Check if this is a fixed-width integer type.
    pub fn is_bits(&self) -> bool {
        matches!(self, TypeData::Bits { .. })
    }

    /// Check if this is a signed fixed-width integer type.
    pub fn is_signed_bits(&self) -> bool {
        matches!(self, TypeData::Bits { signed: true, .. })
    }

    /// Check if this is any integer type (`Bits` or `InfInt`).
    pub fn is_integer(&self) -> bool {
        matches!(self, TypeData::Bits { .. } | TypeData::InfInt)
    }

    /// Check if this type has sub-fields.
    pub fn is_aggregate(&self) -> bool {
        matches!(self, TypeData::Struct { .. })
    }
}

/// A function signature unpacked from the interner.
///
/// `is_void` is the sole authority on void-ness: a signature is void iff it
/// stores no return type. `return_type` synthesizes an explicit `Void` for
/// callers that need a uniform representation; that value is never stored.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct FuncType {
    pub inputs: Box<[TypeId]>,
    pub ret: Option<TypeId>,
}

impl FuncType {
    /// Whether the function returns void.
    pub fn is_void(&self) -> bool {
        self.ret.is_none()
    }

    /// The return type, synthesizing `Void` when absent.
    pub fn return_type(&self) -> TypeId {
        self.ret.unwrap_or(TypeId::VOID)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_predicates() {
        let bits = TypeData::Bits {
            width: 8,
            signed: false,
        };
        assert!(bits.is_bits());
        assert!(!bits.is_signed_bits());
        assert!(bits.is_integer());
        assert!(TypeData::InfInt.is_integer());
        assert!(!TypeData::Bool.is_integer());
        assert!(!bits.is_aggregate());
    }

    #[test]
    fn test_func_type_voidness() {
        let void_fn = FuncType {
            inputs: Box::new([TypeId::BOOL]),
            ret: None,
        };
        assert!(void_fn.is_void());
        assert_eq!(void_fn.return_type(), TypeId::VOID);

        let bool_fn = FuncType {
            inputs: Box::new([]),
            ret: Some(TypeId::BOOL),
        };
        assert!(!bool_fn.is_void());
        assert_eq!(bool_fn.return_type(), TypeId::BOOL);
    }
}
