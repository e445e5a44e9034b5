//! Foundation types for the Weir IR.
//!
//! Everything downstream of the front-end builds on these:
//! - `Span`: compact source locations, passed through the IR unchanged
//! - `Name` + `StringInterner`: interned identifiers with O(1) equality
//! - `TypeId`: interned type handles (type data lives in `weir_types`)

mod interner;
mod macros;
mod name;
mod span;
mod type_id;

pub use interner::{InternError, StringInterner};
pub use name::Name;
pub use span::{Span, SpanError};
pub use type_id::TypeId;
