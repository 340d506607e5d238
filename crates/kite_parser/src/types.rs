//! Type references — qualified identifier paths with generic arguments
//! and array dimensions.

use kite_ast::Identifiers;
use kite_lexer::{Operator, Symbol};

use crate::parser::{is_reserved_keyword, Parser};

impl Parser {
    /// Parse a qualified identifier with optional generic arguments:
    /// `a.b.c`, `list!int`, `map!(str, ref float[3])`.
    pub(crate) fn parse_identifiers(&mut self) -> Identifiers {
        let mut identifiers = Identifiers::new(self.current_index(), Vec::new());

        loop {
            match self.current_identifier() {
                Some(word) => {
                    if is_reserved_keyword(&word) {
                        self.error_here("cannot use a reserved keyword as an identifier");
                    }
                    identifiers.names.push(word);
                    self.advance();
                }
                None => self.error_here("expected an identifier"),
            }
            if self.at_end() {
                self.eof_error();
                return identifiers;
            }
            if self.at_symbol(Symbol::Dot) {
                self.advance();
                if !self.guard() {
                    return identifiers;
                }
                continue;
            }
            break;
        }

        // Generic arguments: `!T` for a single bare identifier, or
        // `!(T, ...)` where each argument carries its own `ref` depth and
        // array dimensions.
        if self.at_operator(Operator::Not) {
            self.advance();
            if !self.guard() {
                return identifiers;
            }

            if let Some(word) = self.current_identifier() {
                if is_reserved_keyword(&word) {
                    self.error_here(
                        "cannot use a reserved keyword as an identifier of a generic argument",
                    );
                }
                identifiers
                    .generics
                    .push(Identifiers::new(self.current_index(), vec![word]));
                identifiers.generics_refs.push(0);
                identifiers.generics_array.push(Vec::new());
                self.advance();
            } else if self.at_symbol(Symbol::ParenOpen) {
                self.advance();
                if !self.guard() {
                    return identifiers;
                }
                loop {
                    let mut refs = 0;
                    while self.at_keyword("ref") {
                        refs += 1;
                        self.advance();
                        if !self.guard() {
                            return identifiers;
                        }
                    }

                    let generic = self.parse_identifiers();
                    let array = if self.at_symbol(Symbol::SquareOpen) {
                        self.parse_array_dimension()
                    } else {
                        Vec::new()
                    };
                    identifiers.generics.push(generic);
                    identifiers.generics_refs.push(refs);
                    identifiers.generics_array.push(array);

                    if self.at_end() {
                        self.eof_error();
                        return identifiers;
                    }
                    if self.at_symbol(Symbol::Comma) {
                        self.advance();
                        if !self.guard() {
                            return identifiers;
                        }
                        continue;
                    }
                    break;
                }
                if self.at_symbol(Symbol::ParenClose) {
                    self.advance();
                } else {
                    self.error_here("expected a closing parentheses for the generic argument(s)");
                }
            } else {
                self.error_here(
                    "expected an identifier or an opening parentheses for the generic argument(s)",
                );
            }
        }

        identifiers
    }

    /// Parse a `[N][M]...` array dimension sequence. Dimensions must be
    /// positive integers.
    pub(crate) fn parse_array_dimension(&mut self) -> Vec<u64> {
        let mut dimensions = Vec::new();

        while self.at_symbol(Symbol::SquareOpen) {
            self.advance();
            if !self.guard() {
                return dimensions;
            }
            match self.current_integer() {
                Some(value) => {
                    if value == 0 {
                        self.error_here("an array cannot be zero-sized");
                    }
                    dimensions.push(value);
                    self.advance();
                    if !self.guard() {
                        return dimensions;
                    }
                }
                None => self.error_here("expected an integer for the array size"),
            }
            if !self.at_symbol(Symbol::SquareClose) {
                self.error_here("expected a closing square bracket");
            }
            self.advance();
        }

        dimensions
    }
}
