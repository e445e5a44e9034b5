//! Interned type identifier.
//!
//! `TypeId` is the handle every IR node stores; the structural data behind it
//! lives in the type interner (`weir_types`). Two handles compare equal iff
//! they denote the same canonical type within one context.

use std::fmt;

/// Interned type identifier.
///
/// # Layout
/// 32-bit index split into shard (4 bits) + local index (28 bits):
/// - Bits 31-28: shard index (0-15)
/// - Bits 27-0: local index within shard
///
/// # Pre-interned types
/// The parameterless types are pre-interned in shard 0 at fixed indices, so
/// they can be named as constants without consulting the interner.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
#[repr(transparent)]
pub struct TypeId(u32);

impl TypeId {
    // Pre-interned types (all in shard 0)
    pub const BOOL: TypeId = TypeId(0);
    pub const INFINT: TypeId = TypeId(1);
    pub const VOID: TypeId = TypeId(2);

    /// First local index for dynamically interned types in shard 0.
    pub const FIRST_COMPOUND: u32 = 3;

    /// Maximum local index per shard (2^28 - 1).
    pub const MAX_LOCAL: u32 = 0x0FFF_FFFF;

    /// Number of shards for type interning.
    pub const NUM_SHARDS: usize = 16;

    /// Create a `TypeId` from shard and local index.
    #[inline]
    pub const fn from_shard_local(shard: u32, local: u32) -> Self {
        debug_assert!(shard < 16);
        debug_assert!(local <= Self::MAX_LOCAL);
        TypeId((shard << 28) | local)
    }

    /// Extract the shard index (bits 31-28).
    #[inline]
    pub const fn shard(self) -> usize {
        (self.0 >> 28) as usize
    }

    /// Extract the local index within the shard (bits 27-0).
    #[inline]
    pub const fn local(self) -> usize {
        (self.0 & Self::MAX_LOCAL) as usize
    }

    /// Get the raw u32 value.
    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            TypeId::BOOL => write!(f, "TypeId(bool)"),
            TypeId::INFINT => write!(f, "TypeId(infint)"),
            TypeId::VOID => write!(f, "TypeId(void)"),
            _ => write!(f, "TypeId(shard={}, local={})", self.shard(), self.local()),
        }
    }
}

#[cfg(target_pointer_width = "64")]
mod size_asserts {
    use super::TypeId;
    crate::static_assert_size!(TypeId, 4);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_id_layout() {
        let id = TypeId::from_shard_local(3, 17);
        assert_eq!(id.shard(), 3);
        assert_eq!(id.local(), 17);
    }

    #[test]
    fn test_primitives_in_shard_zero() {
        assert_eq!(TypeId::BOOL.shard(), 0);
        assert_eq!(TypeId::INFINT.shard(), 0);
        assert_eq!(TypeId::VOID.shard(), 0);
        assert!((TypeId::VOID.local() as u32) < TypeId::FIRST_COMPOUND);
    }
}
