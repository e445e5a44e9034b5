//! Type system for the Weir IR.
//!
//! Types are immutable and interned by structural identity: two structurally
//! equal descriptions always yield the same [`TypeId`] within one
//! [`Context`]. External code works with `TypeId` handles for O(1) equality;
//! the structural data ([`TypeData`]) lives in the [`TypeInterner`].
//!
//! The [`field_id`] module provides stable integer addressing of (nested)
//! sub-fields of aggregate types for field-sensitive analyses.

mod context;
mod data;
mod display;
mod error;
pub mod field_id;
mod interner;

pub use context::Context;
pub use data::{FuncType, StructField, TypeData};
pub use display::{short_alias, TypeDisplay};
pub use error::TypeError;
pub use field_id::FieldIdCache;
pub use interner::{TypeInternError, TypeInterner};

pub use weir_ir::TypeId;
