//! Statement and body parsing.

use kite_ast::{Expr, Stmt};
use kite_lexer::{Symbol, TokenKind};

use crate::parser::Parser;

impl Parser {
    /// Parse a body: either `{ statements }` or a single unbraced
    /// statement. `loop_count` is the current loop nesting depth, used to
    /// validate `break`/`continue`.
    pub(crate) fn parse_body(&mut self, loop_count: usize) -> Vec<Stmt> {
        let mut body = Vec::new();
        if !self.guard() {
            return body;
        }

        if !self.at_symbol(Symbol::CurlyOpen) {
            self.parse_statement_into(&mut body, loop_count);
            return body;
        }
        self.advance();

        loop {
            if !self.guard() {
                return body;
            }
            if self.at_symbol(Symbol::CurlyClose) {
                self.advance();
                break;
            }
            self.parse_statement_into(&mut body, loop_count);
        }

        body
    }

    /// Parse one statement and append it to `body`. Stray semicolons are
    /// consumed without producing a statement.
    fn parse_statement_into(&mut self, body: &mut Vec<Stmt>, loop_count: usize) {
        let Some(token) = self.current() else {
            self.eof_error();
            return;
        };
        let token = token.clone();
        let index = token.index;

        let word = match &token.kind {
            TokenKind::Identifier(word) => word.as_str(),
            TokenKind::Symbol(Symbol::Semicolon) => {
                self.advance();
                return;
            }
            _ => "",
        };

        match word {
            "if" => {
                let mut conditions = Vec::new();
                let mut bodies = Vec::new();
                let mut else_body = Vec::new();

                loop {
                    self.advance(); // `if` / `elif`
                    if !self.guard() {
                        break;
                    }
                    let condition = match self.parse_expression() {
                        Ok(condition) => condition,
                        Err(error) => {
                            self.record_error(error);
                            self.synchronize_statement();
                            break;
                        }
                    };
                    conditions.push(condition);
                    bodies.push(self.parse_body(loop_count));
                    if !self.at_keyword("elif") {
                        break;
                    }
                }

                if self.at_keyword("else") {
                    self.advance();
                    else_body = self.parse_body(loop_count);
                }

                if !conditions.is_empty() {
                    body.push(Stmt::If {
                        index,
                        conditions,
                        bodies,
                        else_body,
                    });
                }
            }
            "while" => {
                self.advance();
                if !self.guard() {
                    return;
                }
                match self.parse_expression() {
                    Ok(condition) => {
                        let while_body = self.parse_body(loop_count + 1);
                        body.push(Stmt::While {
                            index,
                            condition: Box::new(condition),
                            body: while_body,
                        });
                    }
                    Err(error) => {
                        self.record_error(error);
                        self.synchronize_statement();
                    }
                }
            }
            "do" => {
                self.advance();
                if !self.guard() {
                    return;
                }
                let do_body = self.parse_body(loop_count + 1);
                if !self.guard() {
                    return;
                }

                let condition = if self.at_keyword("while") {
                    self.advance();
                    match self.parse_expression() {
                        Ok(condition) => Some(condition),
                        Err(error) => {
                            self.record_error(error);
                            self.synchronize_statement();
                            None
                        }
                    }
                } else {
                    self.error_here("expected `while` after the `do {...}`");
                    None
                };

                if self.at_symbol(Symbol::Semicolon) {
                    self.advance();
                } else {
                    self.error_here("expected a semicolon after `do {...} while ...`");
                }

                if let Some(condition) = condition {
                    body.push(Stmt::DoWhile {
                        index,
                        condition: Box::new(condition),
                        body: do_body,
                    });
                }
            }
            "for" => {
                self.advance();
                if !self.guard() {
                    return;
                }
                let target_or_initializer = match self.parse_expression() {
                    Ok(expression) => expression,
                    Err(error) => {
                        self.record_error(error);
                        self.synchronize_statement();
                        return;
                    }
                };
                if !self.guard() {
                    return;
                }

                if self.at_symbol(Symbol::Colon) {
                    // `for target : iterable { ... }`
                    self.advance();
                    if !self.guard() {
                        return;
                    }
                    match self.parse_expression() {
                        Ok(iterator) => {
                            let foreach_body = self.parse_body(loop_count + 1);
                            body.push(Stmt::ForEach {
                                index,
                                target: Box::new(target_or_initializer),
                                iterator: Box::new(iterator),
                                body: foreach_body,
                            });
                        }
                        Err(error) => {
                            self.record_error(error);
                            self.synchronize_statement();
                        }
                    }
                } else if self.at_symbol(Symbol::Comma) {
                    // `for init, cond, step { ... }`
                    self.advance();
                    if !self.guard() {
                        return;
                    }
                    let condition = match self.parse_expression() {
                        Ok(expression) => expression,
                        Err(error) => {
                            self.record_error(error);
                            self.synchronize_statement();
                            return;
                        }
                    };
                    if !self.guard() {
                        return;
                    }
                    if self.at_symbol(Symbol::Comma) {
                        self.advance();
                        if !self.guard() {
                            return;
                        }
                    } else {
                        self.error_here("expected a comma after `for ..., ...`");
                    }
                    let step = match self.parse_expression() {
                        Ok(expression) => expression,
                        Err(error) => {
                            self.record_error(error);
                            self.synchronize_statement();
                            return;
                        }
                    };
                    let for_body = self.parse_body(loop_count + 1);
                    body.push(Stmt::For {
                        index,
                        initialize: Box::new(target_or_initializer),
                        condition: Box::new(condition),
                        step: Box::new(step),
                        body: for_body,
                    });
                } else {
                    self.error_here("expected a colon or a comma after the `for` target/initializer");
                }
            }
            "continue" | "break" => {
                let is_continue = word == "continue";
                let word = word.to_string();
                self.advance();
                if !self.guard() {
                    return;
                }

                if loop_count == 0 {
                    self.error_at_token(
                        format!("`{word}` cannot be used outside of while or for loops"),
                        token,
                    );
                }

                // `break N` skips N extra loops; it must stay inside the
                // enclosing loop depth.
                let mut loop_breaks: u64 = 0;
                if let Some(value) = self.current_integer() {
                    if value >= loop_count as u64 {
                        self.error_here(format!("trying to `{word}` an invalid amount of loops"));
                    }
                    loop_breaks = value;
                    self.advance();
                    if !self.guard() {
                        return;
                    }
                }

                if self.at_symbol(Symbol::Semicolon) {
                    self.advance();
                } else {
                    self.error_here(format!("expected a semicolon or an integer after `{word}`"));
                }

                body.push(if is_continue {
                    Stmt::Continue {
                        index,
                        loop_count: loop_breaks,
                    }
                } else {
                    Stmt::Break {
                        index,
                        loop_count: loop_breaks,
                    }
                });
            }
            "return" => {
                self.advance();
                if !self.guard() {
                    return;
                }

                if self.at_symbol(Symbol::Semicolon) {
                    self.advance();
                    body.push(Stmt::Return {
                        index,
                        expression: None,
                    });
                    return;
                }

                match self.parse_expression() {
                    Ok(expression) => {
                        if self.at_symbol(Symbol::Semicolon) {
                            self.advance();
                        } else {
                            self.error_here("expected a semicolon after `return ...`");
                        }
                        body.push(Stmt::Return {
                            index,
                            expression: Some(Box::new(expression)),
                        });
                    }
                    Err(error) => {
                        self.record_error(error);
                        self.synchronize_statement();
                    }
                }
            }
            _ => self.parse_expression_statement(body),
        }
    }

    /// Anything else is an expression statement terminated by `;`.
    fn parse_expression_statement(&mut self, body: &mut Vec<Stmt>) {
        match self.parse_expression() {
            Ok(expression) => {
                if self.at_symbol(Symbol::Semicolon) {
                    self.advance();
                } else {
                    self.error_here("expected a semicolon after the expression in the body");
                }
                body.push(match expression {
                    Expr::Declaration(declaration) => Stmt::Declaration(declaration),
                    other => Stmt::Expr(other),
                });
            }
            Err(error) => {
                self.record_error(error);
                self.synchronize_statement();
            }
        }
    }

    /// Skip to the nearest statement boundary: past the next `;`, or up to
    /// a closing `}`.
    fn synchronize_statement(&mut self) {
        while let Some(token) = self.current() {
            match &token.kind {
                TokenKind::Symbol(Symbol::Semicolon) => {
                    self.advance();
                    break;
                }
                TokenKind::Symbol(Symbol::CurlyClose) => break,
                _ => self.advance(),
            }
        }
    }
}
