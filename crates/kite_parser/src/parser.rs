//! Parser infrastructure — token navigation, error handling, recovery.

use log::debug;

use kite_ast::Module;
use kite_lexer::{Operator, Symbol, Token, TokenKind};

/// Words the language reserves; they cannot name variables, types, or
/// import path segments.
const RESERVED_KEYWORDS: &[&str] = &[
    "import", "include", "as", "def", "try", "class", "struct", "enum",
    "public", "private", "static", "if", "elif", "else", "while", "do",
    "for", "continue", "break", "return", "ref", "sizeof",
];

pub(crate) fn is_reserved_keyword(word: &str) -> bool {
    RESERVED_KEYWORDS.contains(&word)
}

/// Parse error carrying the offending token.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub struct ParseError {
    pub message: String,
    pub token: Token,
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} at line {} column {}",
            self.message, self.token.line, self.token.column
        )
    }
}

impl ParseError {
    pub fn new(message: impl Into<String>, token: Token) -> Self {
        Self {
            message: message.into(),
            token,
        }
    }

    /// Code-point offset of the offending token.
    pub fn index(&self) -> usize {
        self.token.index
    }
}

/// Aggregate failure for the opt-in `Result` surface.
#[derive(Debug, thiserror::Error)]
#[error("{} parse error(s)", .0.len())]
pub struct ParseErrors(pub Vec<ParseError>);

/// Result of parsing a token list.
#[derive(Debug)]
pub struct ParseResult {
    pub module: Module,
    pub errors: Vec<ParseError>,
}

impl ParseResult {
    /// Opt-in aggregate surface: non-empty errors become a single failure.
    pub fn into_result(self) -> Result<Module, ParseErrors> {
        if self.errors.is_empty() {
            Ok(self.module)
        } else {
            Err(ParseErrors(self.errors))
        }
    }
}

/// Parse a token list into a module.
pub fn parse(tokens: Vec<Token>) -> ParseResult {
    Parser::new(tokens).parse()
}

/// The Kite parser.
pub struct Parser {
    pub(crate) tokens: Vec<Token>,
    pub(crate) pos: usize,
    pub(crate) errors: Vec<ParseError>,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            pos: 0,
            errors: vec![],
        }
    }

    pub fn parse(mut self) -> ParseResult {
        let module = self.parse_module();
        let errors = dedup_errors(self.errors);
        debug!(
            "parsed module ({} import(s), {} function(s), {} type(s)) with {} error(s)",
            module.imports.len(),
            module.functions.len(),
            module.user_types.len() + module.enums.len(),
            errors.len()
        );
        ParseResult { module, errors }
    }

    // ---- Token navigation ----

    pub(crate) fn at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    pub(crate) fn current(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    pub(crate) fn advance(&mut self) {
        self.pos += 1;
    }

    /// Index of the current token, or of the last token at end of input.
    pub(crate) fn current_index(&self) -> usize {
        self.tokens
            .get(self.pos)
            .or_else(|| self.tokens.last())
            .map(|token| token.index)
            .unwrap_or(0)
    }

    // ---- Matching helpers ----

    pub(crate) fn at_symbol(&self, symbol: Symbol) -> bool {
        matches!(self.current(), Some(token) if token.kind == TokenKind::Symbol(symbol))
    }

    pub(crate) fn at_operator(&self, op: Operator) -> bool {
        matches!(self.current(), Some(token) if token.kind == TokenKind::Operator(op))
    }

    /// True when the current token is the given identifier keyword.
    pub(crate) fn at_keyword(&self, word: &str) -> bool {
        matches!(self.current(), Some(Token { kind: TokenKind::Identifier(w), .. }) if w == word)
    }

    /// The current identifier text, if any.
    pub(crate) fn current_identifier(&self) -> Option<String> {
        match self.current() {
            Some(Token {
                kind: TokenKind::Identifier(word),
                ..
            }) => Some(word.clone()),
            _ => None,
        }
    }

    /// The current integer-valued token (`Integer` or `Uinteger`), if any.
    pub(crate) fn current_integer(&self) -> Option<u64> {
        match self.current() {
            Some(Token {
                kind: TokenKind::Integer(value),
                ..
            }) => Some(*value as u64),
            Some(Token {
                kind: TokenKind::Uinteger(value),
                ..
            }) => Some(*value),
            _ => None,
        }
    }

    /// If the current token is one of the given operators, return it.
    pub(crate) fn current_operator_among(&self, operators: &[Operator]) -> Option<Operator> {
        match self.current() {
            Some(Token {
                kind: TokenKind::Operator(op),
                ..
            }) if operators.contains(op) => Some(*op),
            _ => None,
        }
    }

    // ---- Error handling ----

    /// Token used to position errors reported at end of input.
    fn last_token(&self) -> Token {
        match self.tokens.last() {
            Some(token) => token.clone(),
            None => Token::new(0, 1, 1, 0, TokenKind::Symbol(Symbol::Semicolon)),
        }
    }

    /// Build an error at the current token without recording it.
    pub(crate) fn parse_error_here(&self, message: impl Into<String>) -> ParseError {
        let token = match self.current() {
            Some(token) => token.clone(),
            None => self.last_token(),
        };
        ParseError::new(message, token)
    }

    pub(crate) fn eof_parse_error(&self) -> ParseError {
        ParseError::new("unexpected end of file", self.last_token())
    }

    /// Record an error at the current token.
    pub(crate) fn error_here(&mut self, message: impl Into<String>) {
        let error = self.parse_error_here(message);
        self.record_error(error);
    }

    /// Record an error at an explicit token.
    pub(crate) fn error_at_token(&mut self, message: impl Into<String>, token: Token) {
        self.record_error(ParseError::new(message, token));
    }

    pub(crate) fn record_error(&mut self, error: ParseError) {
        self.errors.push(error);
    }

    pub(crate) fn eof_error(&mut self) {
        let error = self.eof_parse_error();
        self.record_error(error);
    }

    /// End-of-input guard: records an error and signals the caller to
    /// return its partially built node.
    pub(crate) fn guard(&mut self) -> bool {
        if self.at_end() {
            self.eof_error();
            false
        } else {
            true
        }
    }
}

/// Collapse consecutive errors that share a token index and message.
fn dedup_errors(errors: Vec<ParseError>) -> Vec<ParseError> {
    let mut cleaned: Vec<ParseError> = Vec::with_capacity(errors.len());
    for error in errors {
        match cleaned.last() {
            Some(last) if last.token.index == error.token.index && last.message == error.message => {}
            _ => cleaned.push(error),
        }
    }
    cleaned
}
