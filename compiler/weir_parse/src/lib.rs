//! Recursive descent parser for the Weir textual form.
//!
//! Parsing builds straight through the verified [`FuncBuilder`] API, so
//! every operation verification contract runs while the text is consumed;
//! a textual module that parses successfully is well-formed IR. Parsing may
//! continue opportunistically to aggregate diagnostics (e.g. every duplicate
//! struct field name) but still reports overall failure.

mod cursor;
mod grammar;
mod lexer;
mod token;

pub use lexer::lex;
pub use token::{Token, TokenKind};

use weir_diagnostic::Diagnostic;
use weir_hir::Module;
use weir_types::Context;

use cursor::Cursor;

/// Parser state.
pub struct Parser<'a> {
    ctx: &'a Context,
    cursor: Cursor<'a>,
    diags: Vec<Diagnostic>,
    module: Module,
}

impl<'a> Parser<'a> {
    fn new(ctx: &'a Context, tokens: &'a [Token]) -> Self {
        Parser {
            ctx,
            cursor: Cursor::new(tokens),
            diags: Vec::new(),
            module: Module::new(),
        }
    }
}

/// Parse a textual module.
///
/// On failure, returns every diagnostic gathered before the parse stopped.
pub fn parse_module(ctx: &Context, source: &str) -> Result<Module, Vec<Diagnostic>> {
    tracing::trace!(len = source.len(), "parsing module");
    let tokens = lex(ctx, source)?;
    let mut parser = Parser::new(ctx, &tokens);

    while !parser.cursor.at_eof() {
        if let Err(diag) = parser.parse_func() {
            // Aggregating paths (duplicate struct fields) push their extra
            // diagnostics directly; avoid double-reporting the returned one.
            if !parser.diags.contains(&diag) {
                parser.diags.push(diag);
            }
            break;
        }
    }

    if parser.diags.is_empty() {
        Ok(parser.module)
    } else {
        Err(parser.diags)
    }
}
