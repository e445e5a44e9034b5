//! Raw and cooked token definitions.
//!
//! `RawToken` is the logos-derived tokenizer output before string interning;
//! `Token` carries the cooked kind plus its span.

use logos::Logos;
use weir_ir::{Name, Span};

/// Raw token from logos (before interning).
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ \t\r\n]+")] // Whitespace separates, it never means anything
#[logos(skip r"//[^\n]*")]
pub(crate) enum RawToken {
    #[token("func")]
    Func,
    #[token("action")]
    Action,
    #[token("const")]
    Const,
    #[token("cast")]
    Cast,
    #[token("read")]
    Read,
    #[token("variable")]
    Variable,
    #[token("concat")]
    Concat,
    #[token("shl")]
    Shl,
    #[token("shr")]
    Shr,
    #[token("cmp")]
    Cmp,
    #[token("scope")]
    Scope,
    #[token("if")]
    If,
    #[token("else")]
    Else,
    #[token("ternary")]
    Ternary,
    #[token("yield")]
    Yield,
    #[token("return")]
    Return,
    #[token("call")]
    Call,
    #[token("true")]
    True,
    #[token("false")]
    False,

    // Type mnemonics
    #[token("bool")]
    Bool,
    #[token("bit")]
    Bit,
    #[token("int")]
    Int,
    #[token("infint")]
    InfInt,
    #[token("void")]
    Void,
    #[token("struct")]
    Struct,

    #[regex(r"[A-Za-z_][A-Za-z0-9_]*")]
    Ident,
    #[regex(r"-?[0-9]+")]
    Number,
    // Value names follow the asm-printer alphabet, which includes `-` and
    // `.` (e.g. `%c-3_int8`).
    #[regex(r"%[A-Za-z0-9_.$-]+")]
    Value,
    #[regex(r"@[A-Za-z_][A-Za-z0-9_]*")]
    Symbol,
    #[regex(r"\^[A-Za-z_][A-Za-z0-9_]*")]
    Label,
    #[regex(r#""[^"\n]*""#)]
    Str,

    #[token("<")]
    Lt,
    #[token(">")]
    Gt,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token(",")]
    Comma,
    #[token(":")]
    Colon,
    #[token(";")]
    Semi,
    #[token("=")]
    Assign,
}

/// Cooked token kind with interned payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Ident(Name),
    Number(i128),
    Value(Name),
    Symbol(Name),
    Label(Name),
    Str(Name),

    Func,
    Action,
    Const,
    Cast,
    Read,
    Variable,
    Concat,
    Shl,
    Shr,
    Cmp,
    Scope,
    If,
    Else,
    Ternary,
    Yield,
    Return,
    Call,
    True,
    False,

    Bool,
    Bit,
    Int,
    InfInt,
    Void,
    Struct,

    Lt,
    Gt,
    LParen,
    RParen,
    LBrace,
    RBrace,
    Comma,
    Colon,
    Semi,
    Assign,

    Eof,
}

impl TokenKind {
    /// Short human-readable description for diagnostics.
    pub fn describe(&self) -> &'static str {
        match self {
            TokenKind::Ident(_) => "identifier",
            TokenKind::Number(_) => "integer",
            TokenKind::Value(_) => "value name",
            TokenKind::Symbol(_) => "symbol name",
            TokenKind::Label(_) => "block label",
            TokenKind::Str(_) => "string",
            TokenKind::Func => "`func`",
            TokenKind::Action => "`action`",
            TokenKind::Const => "`const`",
            TokenKind::Cast => "`cast`",
            TokenKind::Read => "`read`",
            TokenKind::Variable => "`variable`",
            TokenKind::Concat => "`concat`",
            TokenKind::Shl => "`shl`",
            TokenKind::Shr => "`shr`",
            TokenKind::Cmp => "`cmp`",
            TokenKind::Scope => "`scope`",
            TokenKind::If => "`if`",
            TokenKind::Else => "`else`",
            TokenKind::Ternary => "`ternary`",
            TokenKind::Yield => "`yield`",
            TokenKind::Return => "`return`",
            TokenKind::Call => "`call`",
            TokenKind::True => "`true`",
            TokenKind::False => "`false`",
            TokenKind::Bool => "`bool`",
            TokenKind::Bit => "`bit`",
            TokenKind::Int => "`int`",
            TokenKind::InfInt => "`infint`",
            TokenKind::Void => "`void`",
            TokenKind::Struct => "`struct`",
            TokenKind::Lt => "`<`",
            TokenKind::Gt => "`>`",
            TokenKind::LParen => "`(`",
            TokenKind::RParen => "`)`",
            TokenKind::LBrace => "`{`",
            TokenKind::RBrace => "`}`",
            TokenKind::Comma => "`,`",
            TokenKind::Colon => "`:`",
            TokenKind::Semi => "`;`",
            TokenKind::Assign => "`=`",
            TokenKind::Eof => "end of input",
        }
    }
}

/// A cooked token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}
