//! Arena indices for IR entities.
//!
//! All four are plain `u32` indices into the owning [`Body`](crate::Body);
//! they are meaningless across bodies.

use std::fmt;

macro_rules! arena_id {
    ($(#[$doc:meta])* $name:ident, $prefix:literal) => {
        $(#[$doc])*
        #[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord, Default)]
        #[repr(transparent)]
        pub struct $name(u32);

        impl $name {
            #[inline]
            pub(crate) fn new(index: usize) -> Self {
                $name(u32::try_from(index).unwrap_or_else(|_| {
                    panic!(concat!($prefix, " arena exceeded u32::MAX entries"))
                }))
            }

            /// Index into the owning body's arena.
            #[inline]
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "{}"), self.0)
            }
        }
    };
}

arena_id!(
    /// A value: the result of an operation or a block parameter.
    ValueId, "v"
);
arena_id!(
    /// An operation within a body.
    OpId, "op"
);
arena_id!(
    /// A block within a body.
    BlockId, "bb"
);
arena_id!(
    /// A region within a body.
    RegionId, "region"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_prefixes() {
        assert_eq!(format!("{:?}", ValueId::new(3)), "v3");
        assert_eq!(format!("{:?}", BlockId::new(0)), "bb0");
    }
}
