//! Per-compilation-unit context.

use weir_ir::{StringInterner, TypeId};

use crate::display::TypeDisplay;
use crate::interner::TypeInterner;

/// The interning store for one compilation unit.
///
/// Every construction call within the unit shares this context, which is
/// what makes structural interning an identity guarantee. One context is
/// driven by one thread at a time; concurrent compilation of multiple units
/// uses independent contexts (the interners themselves are sharded and
/// lock-protected, so sharing is possible but not the designed-for mode).
#[derive(Debug, Default)]
pub struct Context {
    pub strings: StringInterner,
    pub types: TypeInterner,
}

impl Context {
    /// Create a fresh context with empty interners.
    pub fn new() -> Self {
        Context {
            strings: StringInterner::new(),
            types: TypeInterner::new(),
        }
    }

    /// Render a type for diagnostics and the textual form.
    pub fn display(&self, id: TypeId) -> TypeDisplay<'_> {
        TypeDisplay::new(&self.types, &self.strings, id)
    }
}
