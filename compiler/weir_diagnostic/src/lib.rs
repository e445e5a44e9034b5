//! Diagnostics for the Weir IR core.
//!
//! Every failure in type construction, operation verification, symbol
//! resolution, and textual-form parsing is reported as a [`Diagnostic`]:
//! an error code, a message, and labeled spans pointing at the offending
//! construct. Diagnostics are values; nothing in the core prints or
//! aborts; the surrounding driver decides how to render and whether to
//! continue.

mod diagnostic;
mod error_code;

pub use diagnostic::{Diagnostic, Label, Severity};
pub use error_code::{ErrorClass, ErrorCode};
