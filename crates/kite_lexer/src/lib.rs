//! Kite Lexer — tokenizes Kite source code.
//!
//! Converts a Unicode source text into a flat token list, handling:
//! - Identifiers (ASCII-restricted)
//! - Numeric literals (decimal/hex/octal/binary, unsigned and imaginary)
//! - Character, string, buffer and byte-character literals with escapes
//! - Operators and symbols (longest match)
//! - Comments (line and block)
//!
//! All positions are counted in Unicode code points, not bytes.

pub mod lexer;
pub mod source;
pub mod token;


pub use lexer::{lex, LexResult, Lexer};
pub use source::{decode_utf8, SourceBuffer, Utf8DecodeError};
pub use token::{LexError, Operator, Symbol, Token, TokenKind};
