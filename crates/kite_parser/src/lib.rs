//! Kite Parser — transforms the token list into a module AST.
//!
//! Handwritten recursive descent with a precedence-climbing expression
//! sub-parser. Errors are accumulated, never thrown; parsing always
//! produces a module.

pub mod parser;

mod expr;
mod item;
mod stmt;
mod types;

#[cfg(test)]
mod tests;

pub use parser::{parse, ParseError, ParseErrors, ParseResult, Parser};

use kite_ast::Module;
use kite_lexer::{LexError, Token};

/// Result of running both phases over a source text.
#[derive(Debug)]
pub struct SourceParse {
    pub tokens: Vec<Token>,
    pub module: Module,
    pub lex_errors: Vec<LexError>,
    pub parse_errors: Vec<ParseError>,
}

impl SourceParse {
    /// Total number of errors across both phases.
    pub fn error_count(&self) -> usize {
        self.lex_errors.len() + self.parse_errors.len()
    }
}

/// Lex and parse a source text in one step.
pub fn parse_source(source: &str) -> SourceParse {
    let lexed = kite_lexer::lex(source);
    let result = parse(lexed.tokens.clone());
    SourceParse {
        tokens: lexed.tokens,
        module: result.module,
        lex_errors: lexed.errors,
        parse_errors: result.errors,
    }
}
