//! Shared macros.

/// Assert at compile time that a type has the expected size in bytes.
///
/// Used to catch accidental size regressions in hot IR types.
#[macro_export]
macro_rules! static_assert_size {
    ($ty:ty, $size:expr) => {
        const _: [(); $size] = [(); ::std::mem::size_of::<$ty>()];
    };
}
