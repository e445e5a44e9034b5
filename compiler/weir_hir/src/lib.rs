//! The Weir high-level IR: typed operations, structured control flow, and
//! verified construction.
//!
//! Every operation is built through a [`FuncBuilder`], which runs the
//! operation's verification contract before inserting it; a failed
//! construction returns a diagnostic and inserts nothing. Control flow is
//! region-based: `scope`/`if`/`ternary` own single-entry/single-exit regions
//! that always return to the owning operation; they are not nodes in a flat
//! basic-block graph.

mod attr;
mod body;
mod builder;
mod func;
mod ids;
mod module;
mod op;
mod print;

pub use attr::{check_constant_type, Attr, IntAttr};
pub use body::{Block, Body, Region, ValueData, ValueDef};
pub use builder::FuncBuilder;
pub use func::{FuncOp, FuncSignature, NoSymbols, SymbolLookup, Visibility};
pub use ids::{BlockId, OpId, RegionId, ValueId};
pub use module::Module;
pub use op::{BinKind, CmpKind, OpData, OpKind, UnaryKind};
pub use print::{print_func, print_module};
