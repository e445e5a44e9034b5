//! The closed operation set.
//!
//! Kinds are modeled as one tagged sum so that verification, printing, and
//! parsing each dispatch over the same closed set; adding a kind extends the
//! per-kind match arms without touching shared traversal code.

use smallvec::SmallVec;
use weir_ir::{Name, Span};

use crate::attr::Attr;
use crate::ids::{BlockId, RegionId, ValueId};

/// Unary operation kinds.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum UnaryKind {
    /// Arithmetic negation.
    Neg,
    /// Unary plus (identity).
    UPlus,
    /// Bitwise complement.
    Cmpl,
    /// Logical not.
    LNot,
}

impl UnaryKind {
    pub fn mnemonic(self) -> &'static str {
        match self {
            UnaryKind::Neg => "neg",
            UnaryKind::UPlus => "uplus",
            UnaryKind::Cmpl => "cmpl",
            UnaryKind::LNot => "lnot",
        }
    }

    pub fn from_mnemonic(s: &str) -> Option<Self> {
        Some(match s {
            "neg" => UnaryKind::Neg,
            "uplus" => UnaryKind::UPlus,
            "cmpl" => UnaryKind::Cmpl,
            "lnot" => UnaryKind::LNot,
            _ => return None,
        })
    }
}

/// Binary operation kinds.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum BinKind {
    Mul,
    Div,
    Mod,
    Add,
    Sub,
    /// Saturating addition.
    AddSat,
    /// Saturating subtraction.
    SubSat,
    And,
    Or,
    Xor,
}

impl BinKind {
    pub fn mnemonic(self) -> &'static str {
        match self {
            BinKind::Mul => "mul",
            BinKind::Div => "div",
            BinKind::Mod => "mod",
            BinKind::Add => "add",
            BinKind::Sub => "sub",
            BinKind::AddSat => "addsat",
            BinKind::SubSat => "subsat",
            BinKind::And => "and",
            BinKind::Or => "or",
            BinKind::Xor => "xor",
        }
    }

    pub fn from_mnemonic(s: &str) -> Option<Self> {
        Some(match s {
            "mul" => BinKind::Mul,
            "div" => BinKind::Div,
            "mod" => BinKind::Mod,
            "add" => BinKind::Add,
            "sub" => BinKind::Sub,
            "addsat" => BinKind::AddSat,
            "subsat" => BinKind::SubSat,
            "and" => BinKind::And,
            "or" => BinKind::Or,
            "xor" => BinKind::Xor,
            _ => return None,
        })
    }
}

/// Comparison kinds. Result type is always `bool`.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum CmpKind {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl CmpKind {
    pub fn mnemonic(self) -> &'static str {
        match self {
            CmpKind::Eq => "eq",
            CmpKind::Ne => "ne",
            CmpKind::Lt => "lt",
            CmpKind::Le => "le",
            CmpKind::Gt => "gt",
            CmpKind::Ge => "ge",
        }
    }

    pub fn from_mnemonic(s: &str) -> Option<Self> {
        Some(match s {
            "eq" => CmpKind::Eq,
            "ne" => CmpKind::Ne,
            "lt" => CmpKind::Lt,
            "le" => CmpKind::Le,
            "gt" => CmpKind::Gt,
            "ge" => CmpKind::Ge,
            _ => return None,
        })
    }
}

/// Operation kind plus its kind-specific immutable parameters.
#[derive(Clone, Eq, PartialEq, Debug)]
pub enum OpKind {
    /// Typed constant. `name` optionally overrides the synthesized debug
    /// name of the result.
    Const { value: Attr, name: Option<Name> },
    /// Type conversion; legality is caller-enforced.
    Cast,
    /// Read from an addressable location (a `variable` result).
    Read,
    Unary(UnaryKind),
    Binary(BinKind),
    /// Bit concatenation of two `Bits` values.
    Concat,
    /// Left shift; amount must not be a signed `Bits` value.
    Shl,
    /// Right shift; amount must not be a signed `Bits` value.
    Shr,
    Cmp(CmpKind),
    /// A named or anonymous addressable location.
    Variable { name: Option<Name> },
    /// A lexical scope owning one region; may yield a value.
    Scope { region: RegionId },
    /// Conditional with a then-region and an optional else-region.
    ///
    /// Structurally reserves a result slot like any other operation, but no
    /// builder path produces a value through it.
    If {
        then_region: RegionId,
        else_region: Option<RegionId>,
    },
    /// Conditional expression; both regions yield a consistent type.
    Ternary {
        true_region: RegionId,
        false_region: RegionId,
    },
    /// Region terminator handing values back to the owning operation.
    Yield,
    /// Function terminator.
    Return,
    /// Call of a symbol-addressable function.
    Call { callee: Name },
}

impl OpKind {
    /// The mnemonic the textual form spells this operation with.
    pub fn mnemonic(&self) -> &'static str {
        match self {
            OpKind::Const { .. } => "const",
            OpKind::Cast => "cast",
            OpKind::Read => "read",
            OpKind::Unary(kind) => kind.mnemonic(),
            OpKind::Binary(kind) => kind.mnemonic(),
            OpKind::Concat => "concat",
            OpKind::Shl => "shl",
            OpKind::Shr => "shr",
            OpKind::Cmp(_) => "cmp",
            OpKind::Variable { .. } => "variable",
            OpKind::Scope { .. } => "scope",
            OpKind::If { .. } => "if",
            OpKind::Ternary { .. } => "ternary",
            OpKind::Yield => "yield",
            OpKind::Return => "return",
            OpKind::Call { .. } => "call",
        }
    }

    /// Whether this operation ends a block.
    pub fn is_terminator(&self) -> bool {
        matches!(self, OpKind::Yield | OpKind::Return)
    }

    /// The regions this operation owns, in declaration order.
    ///
    /// Control entering any of these regions always returns to this
    /// operation, never to a sibling region.
    pub fn regions(&self) -> SmallVec<[RegionId; 2]> {
        match self {
            OpKind::Scope { region } => SmallVec::from_slice(&[*region]),
            OpKind::If {
                then_region,
                else_region,
            } => {
                let mut regions = SmallVec::from_slice(&[*then_region]);
                if let Some(else_region) = else_region {
                    regions.push(*else_region);
                }
                regions
            }
            OpKind::Ternary {
                true_region,
                false_region,
            } => SmallVec::from_slice(&[*true_region, *false_region]),
            _ => SmallVec::new(),
        }
    }

    /// Whether this operation defines an addressable location.
    pub fn is_addressable_def(&self) -> bool {
        matches!(self, OpKind::Variable { .. })
    }
}

/// One operation: kind, ordered operands, results, and location.
#[derive(Clone, Debug)]
pub struct OpData {
    pub kind: OpKind,
    pub operands: SmallVec<[ValueId; 2]>,
    /// Result values. At most one for every kind in the catalog; kept as a
    /// list so kinds with reserved capacity (`If`) keep their slot.
    pub results: SmallVec<[ValueId; 1]>,
    pub span: Span,
    /// The block this operation belongs to.
    pub block: BlockId,
}

impl OpData {
    /// The single result, if the operation produces one.
    pub fn result(&self) -> Option<ValueId> {
        self.results.first().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mnemonic_round_trip() {
        for kind in [
            UnaryKind::Neg,
            UnaryKind::UPlus,
            UnaryKind::Cmpl,
            UnaryKind::LNot,
        ] {
            assert_eq!(UnaryKind::from_mnemonic(kind.mnemonic()), Some(kind));
        }
        for kind in [
            BinKind::Mul,
            BinKind::Div,
            BinKind::Mod,
            BinKind::Add,
            BinKind::Sub,
            BinKind::AddSat,
            BinKind::SubSat,
            BinKind::And,
            BinKind::Or,
            BinKind::Xor,
        ] {
            assert_eq!(BinKind::from_mnemonic(kind.mnemonic()), Some(kind));
        }
        for kind in [
            CmpKind::Eq,
            CmpKind::Ne,
            CmpKind::Lt,
            CmpKind::Le,
            CmpKind::Gt,
            CmpKind::Ge,
        ] {
            assert_eq!(CmpKind::from_mnemonic(kind.mnemonic()), Some(kind));
        }
        assert_eq!(UnaryKind::from_mnemonic("bogus"), None);
    }

    #[test]
    fn test_terminators() {
        assert!(OpKind::Yield.is_terminator());
        assert!(OpKind::Return.is_terminator());
        assert!(!OpKind::Cast.is_terminator());
    }

    #[test]
    fn test_region_ownership() {
        let kind = OpKind::If {
            then_region: crate::ids::RegionId::new(1),
            else_region: None,
        };
        assert_eq!(kind.regions().len(), 1);
        assert!(OpKind::Yield.regions().is_empty());
    }
}
