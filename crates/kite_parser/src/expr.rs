//! Expression parsing — precedence climbing with chained comparisons.
//!
//! Precedence, lowest to highest: assignment (right-assoc), ternary,
//! `||`, `&&`, `!` (prefix), comparisons (chained), `|`, `&`, shifts,
//! additive, multiplicative, `^` (right-assoc), unary prefix, postfix
//! (`++`/`--`/subscript/call/member access), atoms.

use kite_ast::{Expr, Value};
use kite_lexer::{Operator, Symbol, Token, TokenKind};

use crate::parser::{is_reserved_keyword, ParseError, Parser};

const ASSIGN_OPS: [Operator; 7] = [
    Operator::Assign,
    Operator::IAdd,
    Operator::ISub,
    Operator::IMul,
    Operator::IDiv,
    Operator::IMod,
    Operator::IPow,
];

const COMPARISON_OPS: [Operator; 6] = [
    Operator::Equal,
    Operator::NotEqual,
    Operator::Less,
    Operator::More,
    Operator::LessEqual,
    Operator::MoreEqual,
];

impl Parser {
    /// Parse an expression. A type-then-name shape is treated as a local
    /// declaration rather than a binary operation.
    pub(crate) fn parse_expression(&mut self) -> Result<Expr, ParseError> {
        if self.looks_like_declaration() {
            return Ok(Expr::Declaration(self.parse_declaration()));
        }
        self.parse_assign()
    }

    /// Lookahead without consuming: `[ref]* Path [!Generics] [N]* name`.
    fn looks_like_declaration(&self) -> bool {
        let at = |i: usize| self.tokens.get(i);
        let at_symbol = |i: usize, symbol: Symbol| {
            matches!(at(i), Some(Token { kind: TokenKind::Symbol(s), .. }) if *s == symbol)
        };
        let at_plain_identifier = |i: usize| {
            matches!(at(i), Some(Token { kind: TokenKind::Identifier(word), .. })
                if !is_reserved_keyword(word))
        };

        let mut i = self.pos;

        while matches!(at(i), Some(Token { kind: TokenKind::Identifier(word), .. }) if word == "ref")
        {
            i += 1;
        }

        // The type path head.
        match at(i) {
            Some(Token {
                kind: TokenKind::Identifier(word),
                ..
            }) if !is_reserved_keyword(word) => i += 1,
            _ => return false,
        }
        while at_symbol(i, Symbol::Dot) {
            match at(i + 1) {
                Some(Token {
                    kind: TokenKind::Identifier(word),
                    ..
                }) if !is_reserved_keyword(word) => i += 2,
                _ => return false,
            }
        }

        // Optional generic arguments.
        if matches!(at(i), Some(Token { kind: TokenKind::Operator(Operator::Not), .. })) {
            match at(i + 1) {
                Some(Token {
                    kind: TokenKind::Identifier(_),
                    ..
                }) => i += 2,
                Some(Token {
                    kind: TokenKind::Symbol(Symbol::ParenOpen),
                    ..
                }) => {
                    i += 2;
                    let mut depth = 1usize;
                    while depth > 0 {
                        match at(i) {
                            Some(Token {
                                kind: TokenKind::Symbol(Symbol::ParenOpen),
                                ..
                            }) => depth += 1,
                            Some(Token {
                                kind: TokenKind::Symbol(Symbol::ParenClose),
                                ..
                            }) => depth -= 1,
                            Some(_) => {}
                            None => return false,
                        }
                        i += 1;
                    }
                }
                _ => return false,
            }
        }

        // Optional array dimensions.
        while at_symbol(i, Symbol::SquareOpen) {
            i += 1;
            let mut depth = 1usize;
            while depth > 0 {
                match at(i) {
                    Some(Token {
                        kind: TokenKind::Symbol(Symbol::SquareOpen),
                        ..
                    }) => depth += 1,
                    Some(Token {
                        kind: TokenKind::Symbol(Symbol::SquareClose),
                        ..
                    }) => depth -= 1,
                    Some(_) => {}
                    None => return false,
                }
                i += 1;
            }
        }

        // A declaration only if a variable name follows.
        at_plain_identifier(i)
    }

    // ---- The precedence ladder ----

    fn parse_assign(&mut self) -> Result<Expr, ParseError> {
        let left = self.parse_ternary()?;
        if let Some(op) = self.current_operator_among(&ASSIGN_OPS) {
            self.advance();
            let right = self.parse_assign()?;
            let index = left.index();
            return Ok(Expr::Binary {
                index,
                op,
                left: Box::new(left),
                right: Box::new(right),
            });
        }
        Ok(left)
    }

    /// `value if condition else otherwise`, right-associative.
    fn parse_ternary(&mut self) -> Result<Expr, ParseError> {
        let value = self.parse_or()?;
        if self.at_keyword("if") {
            self.advance();
            let condition = self.parse_or()?;
            if self.at_keyword("else") {
                self.advance();
            } else {
                self.error_here("expected `else` after the ternary condition");
            }
            let otherwise = self.parse_ternary()?;
            let index = value.index();
            return Ok(Expr::Ternary {
                index,
                condition: Box::new(condition),
                value: Box::new(value),
                otherwise: Box::new(otherwise),
            });
        }
        Ok(value)
    }

    fn parse_or(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_and()?;
        while self.at_operator(Operator::Or) {
            self.advance();
            let right = self.parse_and()?;
            let index = left.index();
            left = Expr::Binary {
                index,
                op: Operator::Or,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_not()?;
        while self.at_operator(Operator::And) {
            self.advance();
            let right = self.parse_not()?;
            let index = left.index();
            left = Expr::Binary {
                index,
                op: Operator::And,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
        Ok(left)
    }

    /// Logical `!` binds looser than comparisons: `!a < b` is `!(a < b)`.
    fn parse_not(&mut self) -> Result<Expr, ParseError> {
        if self.at_operator(Operator::Not) {
            let index = self.current_index();
            self.advance();
            let value = self.parse_not()?;
            return Ok(Expr::Unary {
                index,
                op: Operator::Not,
                value: Box::new(value),
            });
        }
        self.parse_comparison()
    }

    /// A run of comparison operators parses as one chain: `a < b <= c`
    /// keeps all three operands in a single node. A lone comparison stays
    /// a plain binary operation.
    fn parse_comparison(&mut self) -> Result<Expr, ParseError> {
        let first = self.parse_bitwise_or()?;
        if self.current_operator_among(&COMPARISON_OPS).is_none() {
            return Ok(first);
        }

        let index = first.index();
        let mut operations = Vec::new();
        let mut values = vec![first];
        while let Some(op) = self.current_operator_among(&COMPARISON_OPS) {
            self.advance();
            operations.push(op);
            values.push(self.parse_bitwise_or()?);
        }

        if operations.len() == 1 {
            let right = values.pop().unwrap();
            let left = values.pop().unwrap();
            Ok(Expr::Binary {
                index,
                op: operations[0],
                left: Box::new(left),
                right: Box::new(right),
            })
        } else {
            Ok(Expr::Comparison {
                index,
                operations,
                values,
            })
        }
    }

    fn parse_bitwise_or(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_bitwise_and()?;
        while self.at_operator(Operator::BitOr) {
            self.advance();
            let right = self.parse_bitwise_and()?;
            let index = left.index();
            left = Expr::Binary {
                index,
                op: Operator::BitOr,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
        Ok(left)
    }

    fn parse_bitwise_and(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_shift()?;
        while self.at_operator(Operator::BitAnd) {
            self.advance();
            let right = self.parse_shift()?;
            let index = left.index();
            left = Expr::Binary {
                index,
                op: Operator::BitAnd,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
        Ok(left)
    }

    fn parse_shift(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_additive()?;
        while let Some(op) =
            self.current_operator_among(&[Operator::BitLshift, Operator::BitRshift])
        {
            self.advance();
            let right = self.parse_additive()?;
            let index = left.index();
            left = Expr::Binary {
                index,
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
        Ok(left)
    }

    fn parse_additive(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_multiplicative()?;
        while let Some(op) = self.current_operator_among(&[Operator::Add, Operator::Sub]) {
            self.advance();
            let right = self.parse_multiplicative()?;
            let index = left.index();
            left = Expr::Binary {
                index,
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
        Ok(left)
    }

    fn parse_multiplicative(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_exponent()?;
        while let Some(op) =
            self.current_operator_among(&[Operator::Mul, Operator::Div, Operator::Mod])
        {
            self.advance();
            let right = self.parse_exponent()?;
            let index = left.index();
            left = Expr::Binary {
                index,
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
        Ok(left)
    }

    /// `^` is exponentiation and right-associative: `a^b^c` is `a^(b^c)`.
    fn parse_exponent(&mut self) -> Result<Expr, ParseError> {
        let left = self.parse_unary()?;
        if self.at_operator(Operator::Pow) {
            self.advance();
            let right = self.parse_exponent()?;
            let index = left.index();
            return Ok(Expr::Binary {
                index,
                op: Operator::Pow,
                left: Box::new(left),
                right: Box::new(right),
            });
        }
        Ok(left)
    }

    fn parse_unary(&mut self) -> Result<Expr, ParseError> {
        let Some(token) = self.current() else {
            return Err(self.eof_parse_error());
        };
        let index = token.index;

        let op = match &token.kind {
            TokenKind::Operator(
                op @ (Operator::Add
                | Operator::Sub
                | Operator::BitNot
                | Operator::Not
                | Operator::Increment
                | Operator::Decrement),
            ) => Some(*op),
            TokenKind::Identifier(word) if word == "ref" => Some(Operator::Address),
            TokenKind::Identifier(word) if word == "sizeof" => Some(Operator::Sizeof),
            _ => None,
        };

        if let Some(op) = op {
            self.advance();
            let value = self.parse_unary()?;
            return Ok(Expr::Unary {
                index,
                op,
                value: Box::new(value),
            });
        }
        self.parse_postfix()
    }

    fn parse_postfix(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.parse_atom()?;

        loop {
            let Some(token) = self.current() else { break };
            match &token.kind {
                TokenKind::Operator(op @ (Operator::Increment | Operator::Decrement)) => {
                    let op = *op;
                    let index = expr.index();
                    self.advance();
                    expr = Expr::RevUnary {
                        index,
                        op,
                        value: Box::new(expr),
                    };
                }
                TokenKind::Symbol(Symbol::SquareOpen) => {
                    let index = expr.index();
                    let arguments = self.parse_grouped(Symbol::SquareClose)?;
                    expr = Expr::Subscript {
                        index,
                        expression: Box::new(expr),
                        arguments,
                    };
                }
                TokenKind::Symbol(Symbol::ParenOpen) => {
                    let index = expr.index();
                    let arguments = self.parse_grouped(Symbol::ParenClose)?;
                    expr = Expr::Call {
                        index,
                        expression: Box::new(expr),
                        arguments,
                    };
                }
                TokenKind::Symbol(Symbol::Dot) => {
                    let index = expr.index();
                    let mut identifiers = Vec::new();
                    while self.at_symbol(Symbol::Dot) {
                        self.advance();
                        if self.at_end() {
                            self.eof_error();
                            break;
                        }
                        match self.current_identifier() {
                            Some(word) => {
                                if is_reserved_keyword(&word) {
                                    self.error_here(
                                        "cannot use a reserved keyword as an identifier",
                                    );
                                }
                                identifiers.push(word);
                                self.advance();
                            }
                            None => {
                                self.error_here("expected an identifier after the dot");
                                break;
                            }
                        }
                    }
                    expr = Expr::Scoping {
                        index,
                        expression: Box::new(expr),
                        identifiers,
                    };
                }
                _ => break,
            }
        }

        Ok(expr)
    }

    // ---- Atoms ----

    fn parse_atom(&mut self) -> Result<Expr, ParseError> {
        let Some(token) = self.current() else {
            return Err(self.eof_parse_error());
        };
        let index = token.index;
        let token = token.clone();

        match &token.kind {
            TokenKind::Identifier(word) if word == "def" => {
                self.advance();
                if self.at_end() {
                    return Err(self.eof_parse_error());
                }
                let function = self.parse_function(false);
                if !function.identifiers.is_empty() {
                    self.error_at_token(
                        "a function in an expression must be a lambda",
                        token,
                    );
                }
                Ok(Expr::Function(function))
            }
            TokenKind::Identifier(_) => Ok(Expr::Identifiers(self.parse_identifiers())),

            TokenKind::Character(c) => {
                let value = Value::Character(*c);
                self.advance();
                Ok(Expr::Value { index, value })
            }
            TokenKind::String(s) => {
                let value = Value::String(s.clone());
                self.advance();
                Ok(Expr::Value { index, value })
            }
            TokenKind::Buffer(bytes) => {
                let value = Value::Buffer(bytes.clone());
                self.advance();
                Ok(Expr::Value { index, value })
            }
            TokenKind::Uinteger(v) => {
                let value = Value::Uinteger(*v);
                self.advance();
                Ok(Expr::Value { index, value })
            }
            TokenKind::Integer(v) => {
                let value = Value::Integer(*v);
                self.advance();
                Ok(Expr::Value { index, value })
            }
            TokenKind::Floating(v) => {
                let value = Value::Floating(*v);
                self.advance();
                Ok(Expr::Value { index, value })
            }
            TokenKind::Imaginary(v) => {
                let value = Value::Imaginary(*v);
                self.advance();
                Ok(Expr::Value { index, value })
            }

            TokenKind::Symbol(Symbol::ParenOpen) => self.parse_tuple(true),
            TokenKind::Symbol(Symbol::SquareOpen) => {
                let elements = self.parse_grouped(Symbol::SquareClose)?;
                Ok(Expr::List { index, elements })
            }
            TokenKind::Symbol(Symbol::CurlyOpen) => self.parse_dict(),

            _ => Err(ParseError::new(
                format!("unexpected `{}` in an expression", token.text()),
                token,
            )),
        }
    }

    /// Parse a parenthesized group. A single element without a comma is
    /// just that expression when `unwrap_single` is set; the constructor
    /// form of a declaration keeps the tuple shape either way.
    pub(crate) fn parse_tuple(&mut self, unwrap_single: bool) -> Result<Expr, ParseError> {
        let index = self.current_index();
        self.advance(); // (

        let mut elements = Vec::new();
        let mut saw_comma = false;
        loop {
            if self.at_end() {
                return Err(self.eof_parse_error());
            }
            if self.at_symbol(Symbol::ParenClose) {
                self.advance();
                break;
            }
            elements.push(self.parse_expression()?);
            if self.at_end() {
                return Err(self.eof_parse_error());
            }
            if self.at_symbol(Symbol::Comma) {
                saw_comma = true;
                self.advance();
                continue;
            }
            if self.at_symbol(Symbol::ParenClose) {
                self.advance();
                break;
            }
            return Err(
                self.parse_error_here("expected a closing parentheses or a comma in the tuple")
            );
        }

        if unwrap_single && !saw_comma && elements.len() == 1 {
            Ok(elements.pop().unwrap())
        } else {
            Ok(Expr::Tuple { index, elements })
        }
    }

    /// Parse a comma-separated expression group; the opening symbol is the
    /// current token and `close` ends it. Used for lists, subscripts and
    /// call arguments.
    fn parse_grouped(&mut self, close: Symbol) -> Result<Vec<Expr>, ParseError> {
        self.advance(); // opening symbol

        let mut elements = Vec::new();
        loop {
            if self.at_end() {
                return Err(self.eof_parse_error());
            }
            if self.at_symbol(close) {
                self.advance();
                break;
            }
            elements.push(self.parse_expression()?);
            if self.at_end() {
                return Err(self.eof_parse_error());
            }
            if self.at_symbol(Symbol::Comma) {
                self.advance();
                continue;
            }
            if self.at_symbol(close) {
                self.advance();
                break;
            }
            return Err(self.parse_error_here(format!(
                "expected a closing `{}` or a comma",
                close.text()
            )));
        }

        Ok(elements)
    }

    /// Parse a dict literal: `{key: item, ...}`.
    fn parse_dict(&mut self) -> Result<Expr, ParseError> {
        let index = self.current_index();
        self.advance(); // {

        let mut keys = Vec::new();
        let mut items = Vec::new();
        loop {
            if self.at_end() {
                return Err(self.eof_parse_error());
            }
            if self.at_symbol(Symbol::CurlyClose) {
                self.advance();
                break;
            }

            let key = self.parse_expression()?;
            if !self.at_symbol(Symbol::Colon) {
                return Err(self.parse_error_here("expected a colon after the dict key"));
            }
            self.advance();
            if self.at_end() {
                return Err(self.eof_parse_error());
            }
            let item = self.parse_expression()?;
            keys.push(key);
            items.push(item);

            if self.at_end() {
                return Err(self.eof_parse_error());
            }
            if self.at_symbol(Symbol::Comma) {
                self.advance();
                continue;
            }
            if self.at_symbol(Symbol::CurlyClose) {
                self.advance();
                break;
            }
            return Err(
                self.parse_error_here("expected a closing curly bracket or a comma in the dict")
            );
        }

        Ok(Expr::Dict { index, keys, items })
    }
}
