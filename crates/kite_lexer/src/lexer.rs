//! Core lexer implementation.
//!
//! Scans Kite source text code point by code point, producing a flat token
//! list plus a list of recoverable errors. Handles: identifiers, numbers
//! (decimal/hex/octal/binary, unsigned `U` and imaginary `i` suffixes),
//! character/string/buffer literals with escapes, operators, symbols, and
//! comments.

use log::debug;

use crate::source::SourceBuffer;
use crate::token::{LexError, Operator, Symbol, Token, TokenKind};

/// Result of lexing a source text.
#[derive(Debug)]
pub struct LexResult {
    pub tokens: Vec<Token>,
    pub errors: Vec<LexError>,
}

/// Tokenize a source text.
pub fn lex(source: &str) -> LexResult {
    Lexer::new(source).tokenize()
}

/// The Kite lexer.
pub struct Lexer {
    source: SourceBuffer,
    pos: usize,
    line: usize,
    column: usize,
    errors: Vec<LexError>,
}

impl Lexer {
    pub fn new(source: &str) -> Self {
        Self::from_buffer(SourceBuffer::new(source))
    }

    pub fn from_buffer(source: SourceBuffer) -> Self {
        Self {
            source,
            pos: 0,
            line: 1,
            column: 1,
            errors: Vec::new(),
        }
    }

    /// Tokenize the entire source, returning tokens and errors.
    pub fn tokenize(mut self) -> LexResult {
        let mut tokens = Vec::new();

        loop {
            self.skip_whitespace();
            if self.skip_comment() {
                continue;
            }
            if self.is_at_end() {
                break;
            }
            if let Some(token) = self.next_token() {
                tokens.push(token);
            }
        }

        debug!(
            "lexed {} token(s) with {} error(s)",
            tokens.len(),
            self.errors.len()
        );
        LexResult {
            tokens,
            errors: self.errors,
        }
    }

    // === Character navigation ===

    fn is_at_end(&self) -> bool {
        self.pos >= self.source.len()
    }

    fn peek(&self) -> Option<char> {
        self.source.get(self.pos)
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.source.get(self.pos + offset)
    }

    fn advance(&mut self) -> char {
        let ch = self.source.get(self.pos).unwrap_or('\0');
        self.pos += 1;
        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        ch
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn error_here(&mut self, message: impl Into<String>) {
        self.errors
            .push(LexError::new(message, self.pos, self.line, self.column));
    }

    fn error_at(&mut self, message: impl Into<String>, index: usize, line: usize, column: usize) {
        self.errors.push(LexError::new(message, index, line, column));
    }

    // === Whitespace and comments ===

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.peek() {
            if ch.is_ascii_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    /// Skip a comment. Returns true if one was skipped.
    fn skip_comment(&mut self) -> bool {
        if self.peek() != Some('/') {
            return false;
        }

        match self.peek_at(1) {
            Some('/') => {
                while let Some(ch) = self.peek() {
                    if ch == '\n' {
                        break;
                    }
                    self.advance();
                }
                true
            }
            Some('*') => {
                let start = self.pos;
                let start_line = self.line;
                let start_column = self.column;
                self.advance(); // /
                self.advance(); // *

                // Block comments do not nest.
                loop {
                    if self.is_at_end() {
                        self.error_at(
                            "unterminated block comment",
                            start,
                            start_line,
                            start_column,
                        );
                        break;
                    }
                    if self.peek() == Some('*') && self.peek_at(1) == Some('/') {
                        self.advance();
                        self.advance();
                        break;
                    }
                    self.advance();
                }
                true
            }
            _ => false,
        }
    }

    // === Main token dispatch ===

    fn next_token(&mut self) -> Option<Token> {
        let start = self.pos;
        let line = self.line;
        let column = self.column;

        let ch = self.peek()?;

        // Byte literals: b'...' or b"..."
        if ch == 'b' && matches!(self.peek_at(1), Some('\'') | Some('"')) {
            self.advance(); // b
            return if self.peek() == Some('\'') {
                self.lex_byte_character(start, line, column)
            } else {
                self.lex_string(start, line, column, true)
            };
        }

        if ch == '_' || ch.is_ascii_alphabetic() {
            return Some(self.lex_identifier(start, line, column));
        }

        // Word characters outside ASCII start an identifier-shaped run that
        // the language does not accept.
        if ch.is_alphabetic() {
            while let Some(c) = self.peek() {
                if c == '_' || c.is_alphanumeric() {
                    self.advance();
                } else {
                    break;
                }
            }
            self.error_at(
                "a non-ASCII character in an identifier",
                start,
                line,
                column,
            );
            return None;
        }

        if ch.is_ascii_digit() {
            return self.lex_number(start, line, column);
        }

        // A leading `.digits` is a floating literal.
        if ch == '.' && self.peek_at(1).is_some_and(|c| c.is_ascii_digit()) {
            return self.lex_number(start, line, column);
        }

        if ch == '\'' {
            return self.lex_character(start, line, column);
        }
        if ch == '"' {
            return self.lex_string(start, line, column, false);
        }

        self.lex_operator(start, line, column)
    }

    fn token(&self, start: usize, line: usize, column: usize, kind: TokenKind) -> Token {
        Token::new(start, line, column, self.pos - start, kind)
    }

    // === Identifiers ===

    fn lex_identifier(&mut self, start: usize, line: usize, column: usize) -> Token {
        while let Some(ch) = self.peek() {
            if ch == '_' || ch.is_ascii_alphanumeric() {
                self.advance();
            } else {
                break;
            }
        }

        // `abc<non-ASCII>` is one word to the reader; reject the whole run.
        if self.peek().is_some_and(|c| c.is_alphanumeric()) {
            while let Some(c) = self.peek() {
                if c == '_' || c.is_alphanumeric() {
                    self.advance();
                } else {
                    break;
                }
            }
            self.error_at("a non-ASCII character in an identifier", start, line, column);
        }

        let text = self.source.slice(start, self.pos);
        let ascii: String = text.chars().filter(|c| c.is_ascii()).collect();
        self.token(start, line, column, TokenKind::Identifier(ascii))
    }

    // === Number literals ===

    fn lex_number(&mut self, start: usize, line: usize, column: usize) -> Option<Token> {
        if self.peek() == Some('0') {
            match self.peek_at(1) {
                Some('x') | Some('X') => return self.lex_radix(start, line, column, 16),
                Some('o') | Some('O') => return self.lex_radix(start, line, column, 8),
                Some('b') | Some('B') => return self.lex_radix(start, line, column, 2),
                _ => {}
            }
        }

        let mut is_float = false;

        if self.peek() == Some('.') {
            // Dispatch guarantees a digit follows.
            self.advance();
            is_float = true;
        }

        self.eat_digits();

        if !is_float && self.peek() == Some('.') && self.peek_at(1).is_some_and(|c| c.is_ascii_digit())
        {
            self.advance(); // .
            self.eat_digits();
            is_float = true;
        }

        let text = self.source.slice(start, self.pos);

        // Imaginary suffix: the mantissa is stored as a double either way.
        if self.eat('i') {
            return match text.parse::<f64>() {
                Ok(value) => Some(self.token(start, line, column, TokenKind::Imaginary(value))),
                Err(_) => {
                    self.error_at("unable to lex an imaginary literal", start, line, column);
                    None
                }
            };
        }

        if is_float {
            return match text.parse::<f64>() {
                Ok(value) => Some(self.token(start, line, column, TokenKind::Floating(value))),
                Err(_) => {
                    self.error_at("unable to lex a floating-point literal", start, line, column);
                    None
                }
            };
        }

        if self.eat('U') {
            return match text.parse::<u64>() {
                Ok(value) => Some(self.token(start, line, column, TokenKind::Uinteger(value))),
                Err(_) => {
                    self.error_at(
                        "unsigned integer literal does not fit in 64 bits",
                        start,
                        line,
                        column,
                    );
                    None
                }
            };
        }

        match text.parse::<i64>() {
            Ok(value) => Some(self.token(start, line, column, TokenKind::Integer(value))),
            Err(_) => {
                self.error_at(
                    "integer literal does not fit in a signed 64-bit value",
                    start,
                    line,
                    column,
                );
                None
            }
        }
    }

    fn lex_radix(&mut self, start: usize, line: usize, column: usize, radix: u32) -> Option<Token> {
        self.advance(); // 0
        let prefix = self.advance(); // x / o / b

        let digits_start = self.pos;
        while self.peek().is_some_and(|c| c.is_digit(radix)) {
            self.advance();
        }

        if self.pos == digits_start {
            self.error_at(
                format!("expected digits after the `0{prefix}` prefix"),
                start,
                line,
                column,
            );
            return None;
        }

        let text = self.source.slice(digits_start, self.pos);
        let unsigned = self.eat('U');

        let value = match u64::from_str_radix(&text, radix) {
            Ok(value) => value,
            Err(_) => {
                self.error_at(
                    "integer literal does not fit in 64 bits",
                    start,
                    line,
                    column,
                );
                return None;
            }
        };

        if unsigned {
            Some(self.token(start, line, column, TokenKind::Uinteger(value)))
        } else if value <= i64::MAX as u64 {
            Some(self.token(start, line, column, TokenKind::Integer(value as i64)))
        } else {
            self.error_at(
                "integer literal does not fit in a signed 64-bit value",
                start,
                line,
                column,
            );
            None
        }
    }

    fn eat_digits(&mut self) {
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
        }
    }

    // === Character literals ===

    /// Lex the single scalar between character-literal quotes.
    /// Returns `None` after recording an error; the caller resynchronizes.
    fn lex_character_content(
        &mut self,
        start: usize,
        line: usize,
        column: usize,
    ) -> Option<char> {
        self.advance(); // opening '

        if self.is_at_end() || self.peek() == Some('\n') {
            self.error_at("unterminated character literal", start, line, column);
            return None;
        }

        if self.peek() == Some('\'') {
            self.advance();
            self.error_at("empty character literal", start, line, column);
            return None;
        }

        let ch = if self.peek() == Some('\\') {
            self.advance();
            match self.lex_escape() {
                Some(c) => c,
                None => {
                    self.skip_to_quote('\'');
                    return None;
                }
            }
        } else {
            self.advance()
        };

        if self.eat('\'') {
            Some(ch)
        } else if self.is_at_end() || self.peek() == Some('\n') {
            self.error_at("unterminated character literal", start, line, column);
            None
        } else {
            self.skip_to_quote('\'');
            self.error_at(
                "a character literal may only contain a single character",
                start,
                line,
                column,
            );
            None
        }
    }

    fn lex_character(&mut self, start: usize, line: usize, column: usize) -> Option<Token> {
        let ch = self.lex_character_content(start, line, column)?;
        Some(self.token(start, line, column, TokenKind::Character(ch)))
    }

    /// `b'x'` emits an `Integer` token holding the byte value.
    fn lex_byte_character(&mut self, start: usize, line: usize, column: usize) -> Option<Token> {
        let ch = self.lex_character_content(start, line, column)?;
        if (ch as u32) > 0xff {
            self.error_at(
                "a byte character literal must fit in a byte",
                start,
                line,
                column,
            );
            return None;
        }
        Some(self.token(start, line, column, TokenKind::Integer(ch as u32 as i64)))
    }

    /// Resynchronize at the closing quote of a malformed literal.
    fn skip_to_quote(&mut self, quote: char) {
        while let Some(ch) = self.peek() {
            if ch == '\n' {
                break;
            }
            self.advance();
            if ch == quote {
                break;
            }
        }
    }

    // === String and buffer literals ===

    fn lex_string(
        &mut self,
        start: usize,
        line: usize,
        column: usize,
        is_buffer: bool,
    ) -> Option<Token> {
        self.advance(); // opening "

        let multiline = self.peek() == Some('"') && self.peek_at(1) == Some('"');
        if multiline {
            self.advance();
            self.advance();
        }

        let mut value = String::new();

        loop {
            if self.is_at_end() {
                self.error_at("unterminated string literal", start, line, column);
                return None;
            }

            let ch = self.peek().unwrap_or('\0');

            if ch == '\n' && !multiline {
                self.error_at("unterminated string literal", start, line, column);
                return None;
            }

            if ch == '"' {
                if multiline {
                    if self.peek_at(1) == Some('"') && self.peek_at(2) == Some('"') {
                        self.advance();
                        self.advance();
                        self.advance();
                        break;
                    }
                    self.advance();
                    value.push('"');
                    continue;
                }
                self.advance();
                break;
            }

            if ch == '\\' {
                self.advance();
                if let Some(escaped) = self.lex_escape() {
                    value.push(escaped);
                }
                continue;
            }

            value.push(self.advance());
        }

        if is_buffer {
            let mut bytes = Vec::with_capacity(value.len());
            let mut in_range = true;
            for ch in value.chars() {
                if (ch as u32) > 0xff {
                    in_range = false;
                } else {
                    bytes.push(ch as u32 as u8);
                }
            }
            if !in_range {
                self.error_at(
                    "a character in a buffer literal does not fit in a byte",
                    start,
                    line,
                    column,
                );
            }
            Some(self.token(start, line, column, TokenKind::Buffer(bytes)))
        } else {
            Some(self.token(start, line, column, TokenKind::String(value)))
        }
    }

    // === Escape sequences ===

    /// Process an escape sequence; the backslash has already been consumed.
    fn lex_escape(&mut self) -> Option<char> {
        if self.is_at_end() {
            self.error_here("unterminated escape sequence");
            return None;
        }

        let ch = self.advance();
        match ch {
            '\\' => Some('\\'),
            '\'' => Some('\''),
            '"' => Some('"'),
            'n' => Some('\n'),
            'r' => Some('\r'),
            't' => Some('\t'),
            'b' => Some('\u{0008}'),
            'f' => Some('\u{000c}'),
            'v' => Some('\u{000b}'),
            '0' => Some('\0'),
            'a' => Some('\u{0007}'),
            'x' => self.lex_hex_escape(2),
            'u' => self.lex_hex_escape(4),
            'U' => self.lex_hex_escape(8),
            other => {
                self.error_here(format!("invalid escape sequence `\\{other}`"));
                None
            }
        }
    }

    /// Hex escapes require exactly `digits` hexadecimal digits.
    fn lex_hex_escape(&mut self, digits: usize) -> Option<char> {
        let mut value: u32 = 0;
        for _ in 0..digits {
            let Some(ch) = self.peek() else {
                self.error_here(format!("expected {digits} hexadecimal digits in the escape"));
                return None;
            };
            let Some(digit) = ch.to_digit(16) else {
                self.error_here(format!("expected {digits} hexadecimal digits in the escape"));
                return None;
            };
            self.advance();
            value = value * 16 + digit;
        }

        match char::from_u32(value) {
            Some(ch) => Some(ch),
            None => {
                self.error_here(format!(
                    "escape does not name a Unicode scalar value: U+{value:X}"
                ));
                None
            }
        }
    }

    // === Operators and symbols ===

    fn lex_operator(&mut self, start: usize, line: usize, column: usize) -> Option<Token> {
        use Operator::*;
        use Symbol::*;

        let ch = self.advance();
        let kind = match ch {
            '+' => {
                if self.eat('=') {
                    TokenKind::Operator(IAdd)
                } else if self.eat('+') {
                    TokenKind::Operator(Increment)
                } else {
                    TokenKind::Operator(Add)
                }
            }
            '-' => {
                if self.eat('=') {
                    TokenKind::Operator(ISub)
                } else if self.eat('-') {
                    TokenKind::Operator(Decrement)
                } else {
                    TokenKind::Operator(Sub)
                }
            }
            '*' => {
                if self.eat('=') {
                    TokenKind::Operator(IMul)
                } else {
                    TokenKind::Operator(Mul)
                }
            }
            '/' => {
                if self.eat('=') {
                    TokenKind::Operator(IDiv)
                } else {
                    TokenKind::Operator(Div)
                }
            }
            '%' => {
                if self.eat('=') {
                    TokenKind::Operator(IMod)
                } else {
                    TokenKind::Operator(Mod)
                }
            }
            '^' => {
                if self.eat('=') {
                    TokenKind::Operator(IPow)
                } else {
                    TokenKind::Operator(Pow)
                }
            }
            '=' => {
                if self.eat('=') {
                    TokenKind::Operator(Equal)
                } else {
                    TokenKind::Operator(Assign)
                }
            }
            '!' => {
                if self.eat('=') {
                    TokenKind::Operator(NotEqual)
                } else {
                    TokenKind::Operator(Not)
                }
            }
            '<' => {
                if self.eat('=') {
                    TokenKind::Operator(LessEqual)
                } else if self.eat('<') {
                    TokenKind::Operator(BitLshift)
                } else {
                    TokenKind::Operator(Less)
                }
            }
            '>' => {
                if self.eat('=') {
                    TokenKind::Operator(MoreEqual)
                } else if self.eat('>') {
                    TokenKind::Operator(BitRshift)
                } else {
                    TokenKind::Operator(More)
                }
            }
            '&' => {
                if self.eat('&') {
                    TokenKind::Operator(And)
                } else {
                    TokenKind::Operator(BitAnd)
                }
            }
            '|' => {
                if self.eat('|') {
                    TokenKind::Operator(Or)
                } else {
                    TokenKind::Operator(BitOr)
                }
            }
            '~' => TokenKind::Operator(BitNot),
            ';' => TokenKind::Symbol(Semicolon),
            '.' => TokenKind::Symbol(Dot),
            ',' => TokenKind::Symbol(Comma),
            ':' => TokenKind::Symbol(Colon),
            '(' => TokenKind::Symbol(ParenOpen),
            ')' => TokenKind::Symbol(ParenClose),
            '{' => TokenKind::Symbol(CurlyOpen),
            '}' => TokenKind::Symbol(CurlyClose),
            '[' => TokenKind::Symbol(SquareOpen),
            ']' => TokenKind::Symbol(SquareClose),
            other => {
                self.error_at(
                    format!("unexpected character `{other}`"),
                    start,
                    line,
                    column,
                );
                return None;
            }
        };

        Some(self.token(start, line, column, kind))
    }
}
