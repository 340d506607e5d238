//! Token types for the Kite lexer.

use std::fmt;

/// An operator, either lexed directly or (for the keyword-valued ones)
/// assigned by the parser in unary position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Pow,

    IAdd,
    ISub,
    IMul,
    IDiv,
    IMod,
    IPow,

    Increment,
    Decrement,

    Equal,
    NotEqual,
    Less,
    More,
    LessEqual,
    MoreEqual,

    BitAnd,
    BitOr,
    BitNot,
    BitLshift,
    BitRshift,

    And,
    Or,
    Not,

    Assign,

    /// `sizeof` — never emitted by the lexer; the parser maps the keyword.
    Sizeof,
    /// `ref` address-of — never emitted by the lexer; the parser maps the keyword.
    Address,
}

impl Operator {
    /// Source spelling of the operator.
    pub fn text(self) -> &'static str {
        match self {
            Operator::Add => "+",
            Operator::Sub => "-",
            Operator::Mul => "*",
            Operator::Div => "/",
            Operator::Mod => "%",
            Operator::Pow => "^",
            Operator::IAdd => "+=",
            Operator::ISub => "-=",
            Operator::IMul => "*=",
            Operator::IDiv => "/=",
            Operator::IMod => "%=",
            Operator::IPow => "^=",
            Operator::Increment => "++",
            Operator::Decrement => "--",
            Operator::Equal => "==",
            Operator::NotEqual => "!=",
            Operator::Less => "<",
            Operator::More => ">",
            Operator::LessEqual => "<=",
            Operator::MoreEqual => ">=",
            Operator::BitAnd => "&",
            Operator::BitOr => "|",
            Operator::BitNot => "~",
            Operator::BitLshift => "<<",
            Operator::BitRshift => ">>",
            Operator::And => "&&",
            Operator::Or => "||",
            Operator::Not => "!",
            Operator::Assign => "=",
            Operator::Sizeof => "sizeof",
            Operator::Address => "ref",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}

/// A punctuation symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Symbol {
    Semicolon,
    Dot,
    Comma,
    Colon,

    ParenOpen,
    ParenClose,
    CurlyOpen,
    CurlyClose,
    SquareOpen,
    SquareClose,
}

impl Symbol {
    /// Source spelling of the symbol.
    pub fn text(self) -> &'static str {
        match self {
            Symbol::Semicolon => ";",
            Symbol::Dot => ".",
            Symbol::Comma => ",",
            Symbol::Colon => ":",
            Symbol::ParenOpen => "(",
            Symbol::ParenClose => ")",
            Symbol::CurlyOpen => "{",
            Symbol::CurlyClose => "}",
            Symbol::SquareOpen => "[",
            Symbol::SquareClose => "]",
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}

/// Every possible token kind in Kite, with its value payload.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    Identifier(String),
    Operator(Operator),
    Symbol(Symbol),

    Character(char),
    String(String),
    Buffer(Vec<u8>),

    Uinteger(u64),
    Integer(i64),
    Floating(f64),
    Imaginary(f64),
}

impl TokenKind {
    /// Name of the token type, as shown in token dumps.
    pub fn type_name(&self) -> &'static str {
        match self {
            TokenKind::Identifier(_) => "identifier",
            TokenKind::Operator(_) => "operator",
            TokenKind::Symbol(_) => "symbol",
            TokenKind::Character(_) => "character",
            TokenKind::String(_) => "string",
            TokenKind::Buffer(_) => "buffer",
            TokenKind::Uinteger(_) => "uinteger",
            TokenKind::Integer(_) => "integer",
            TokenKind::Floating(_) => "floating",
            TokenKind::Imaginary(_) => "imaginary",
        }
    }

    /// Source-like spelling of the token value.
    pub fn text(&self) -> String {
        match self {
            TokenKind::Identifier(name) => name.clone(),
            TokenKind::Operator(op) => op.text().to_string(),
            TokenKind::Symbol(sym) => sym.text().to_string(),
            TokenKind::Character(c) => format!("'{}'", c.escape_default()),
            TokenKind::String(s) => format!("{s:?}"),
            TokenKind::Buffer(bytes) => {
                let mut out = String::from("b\"");
                for byte in bytes {
                    match byte {
                        0x20..=0x7e if *byte != b'"' && *byte != b'\\' => out.push(*byte as char),
                        _ => out.push_str(&format!("\\x{byte:02x}")),
                    }
                }
                out.push('"');
                out
            }
            TokenKind::Uinteger(value) => format!("{value}U"),
            TokenKind::Integer(value) => value.to_string(),
            TokenKind::Floating(value) => value.to_string(),
            TokenKind::Imaginary(value) => format!("{value}i"),
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} `{}`", self.type_name(), self.text())
    }
}

/// A single token with its source position, all counted in code points.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// Code-point offset of the first character.
    pub index: usize,
    /// 1-based line number.
    pub line: usize,
    /// 1-based column in code points from the line start.
    pub column: usize,
    /// Length in code points.
    pub length: usize,
    pub kind: TokenKind,
}

impl Token {
    pub fn new(index: usize, line: usize, column: usize, length: usize, kind: TokenKind) -> Self {
        Self {
            index,
            line,
            column,
            length,
            kind,
        }
    }

    /// Source-like spelling of the token, used in diagnostics.
    pub fn text(&self) -> String {
        self.kind.text()
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.kind.fmt(f)
    }
}

/// Lexer error with location.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{message} at line {line} column {column}")]
pub struct LexError {
    pub message: String,
    /// Code-point offset of the fault.
    pub index: usize,
    pub line: usize,
    pub column: usize,
}

impl LexError {
    pub fn new(message: impl Into<String>, index: usize, line: usize, column: usize) -> Self {
        Self {
            message: message.into(),
            index,
            line,
            column,
        }
    }
}
