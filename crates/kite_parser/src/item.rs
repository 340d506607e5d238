//! Module-scope parsing — imports, functions, user types, enums, and
//! top-level variable declarations.

use kite_ast::{Declaration, EnumType, Function, Identifiers, Import, Module, UserType};
use kite_lexer::{Operator, Symbol, TokenKind};

use crate::parser::{is_reserved_keyword, Parser};

impl Parser {
    /// Parse the whole module scope. Never aborts; errors accumulate.
    pub(crate) fn parse_module(&mut self) -> Module {
        let mut module = Module::default();

        while !self.at_end() {
            let (is_public, is_static) = self.parse_access_attribs();
            let Some(token) = self.current() else { break };
            let token = token.clone();

            match &token.kind {
                TokenKind::Identifier(word) => match word.as_str() {
                    "def" | "try" => {
                        self.advance();
                        let is_conditional = word == "try";
                        if is_conditional {
                            if self.at_keyword("def") {
                                self.advance();
                            } else {
                                self.error_here("expected `def` after `try`");
                            }
                        }
                        if !self.guard() {
                            break;
                        }

                        let mut function = self.parse_function(is_conditional);
                        function.is_public = is_public;
                        function.is_static = is_static;

                        if function.identifiers.is_empty() {
                            self.error_at_token(
                                "a lambda cannot be declared at the top scope",
                                token.clone(),
                            );
                        }
                        // `def Class.method` may be static; a free function may not.
                        if is_static && function.identifiers.len() == 1 {
                            self.error_at_token(
                                "a top scope function cannot be static",
                                token.clone(),
                            );
                        }
                        module.functions.push(function);
                    }
                    "class" | "struct" => {
                        self.advance();
                        if !self.guard() {
                            break;
                        }
                        let is_class = word == "class";
                        let mut user_type = self.parse_user_type(is_class);
                        user_type.is_public = is_public;
                        if is_static {
                            self.error_at_token(
                                format!("a {word} cannot be static"),
                                token.clone(),
                            );
                        }
                        module.user_types.push(user_type);
                    }
                    "enum" => {
                        self.advance();
                        if !self.guard() {
                            break;
                        }
                        let mut enum_type = self.parse_enum();
                        enum_type.is_public = is_public;
                        if is_static {
                            self.error_at_token("an enum cannot be static", token.clone());
                        }
                        module.enums.push(enum_type);
                    }
                    "import" | "include" => {
                        self.advance();
                        if !self.guard() {
                            break;
                        }
                        let is_include = word == "include";
                        let mut import = self.parse_import(is_include);
                        import.is_public = is_public;
                        if is_static {
                            self.error_at_token(
                                format!("an {word} cannot be static"),
                                token.clone(),
                            );
                        }
                        module.imports.push(import);
                    }
                    _ => {
                        let mut declaration = self.parse_declaration();
                        declaration.is_public = is_public;
                        declaration.is_static = is_static;

                        if self.at_symbol(Symbol::Semicolon) {
                            self.advance();
                        } else {
                            self.error_here("expected a semicolon after a variable declaration");
                        }
                        if is_static {
                            self.error_at_token(
                                "a top scope variable cannot be static",
                                token.clone(),
                            );
                        }
                        module.variables.push(declaration);
                    }
                },

                // Placeholder semicolons are tolerated at the top scope.
                TokenKind::Symbol(Symbol::Semicolon) => self.advance(),

                _ => {
                    self.advance();
                    self.error_at_token(
                        format!("unexpected `{}` while parsing the top scope", token.text()),
                        token,
                    );
                }
            }
        }

        module
    }

    /// Parse a leading `public`/`private`/`static` attribute run.
    /// `public` is the default; duplicates and conflicts are reported but
    /// the latest seen wins.
    pub(crate) fn parse_access_attribs(&mut self) -> (bool, bool) {
        let mut is_public = true;
        let mut is_static = false;

        let mut specified_public = false;
        let mut specified_private = false;
        let mut specified_static = false;

        while let Some(word) = self.current_identifier() {
            match word.as_str() {
                "public" => {
                    is_public = true;
                    if specified_public {
                        self.error_here("`public` was already specified");
                    }
                    if specified_private {
                        self.error_here("`private` was already specified");
                    }
                    specified_public = true;
                }
                "private" => {
                    is_public = false;
                    if specified_public {
                        self.error_here("`public` was already specified");
                    }
                    if specified_private {
                        self.error_here("`private` was already specified");
                    }
                    specified_private = true;
                }
                "static" => {
                    is_static = true;
                    if specified_static {
                        self.error_here("`static` was already specified");
                    }
                    specified_static = true;
                }
                _ => break,
            }
            self.advance();
            if !self.guard() {
                break;
            }
        }

        (is_public, is_static)
    }

    /// Parse an import or include statement; the keyword is already
    /// consumed.
    pub(crate) fn parse_import(&mut self, is_include: bool) -> Import {
        let kind = if is_include { "include" } else { "import" };
        let index = self.current_index();

        let mut path: Vec<String> = Vec::new();
        let mut is_relative = false;
        let mut alias = String::new();

        // A leading dot marks a relative path.
        if self.at_symbol(Symbol::Dot) {
            is_relative = true;
            self.advance();
            if !self.guard() {
                return Import::new(index, path, is_include, is_relative, alias);
            }
        }

        match self.current_identifier() {
            Some(word) => {
                if is_reserved_keyword(&word) {
                    self.error_here(format!("was trying to {kind} a reserved keyword"));
                }
                path.push(word);
                self.advance();
            }
            None => {
                self.error_here(format!("expected an identifier after the `{kind}` keyword"));
                self.advance();
            }
        }
        if !self.guard() {
            return Import::new(index, path, is_include, is_relative, alias);
        }

        while self.at_symbol(Symbol::Dot) {
            self.advance();
            if !self.guard() {
                return Import::new(index, path, is_include, is_relative, alias);
            }
            match self.current_identifier() {
                Some(word) => {
                    if is_reserved_keyword(&word) {
                        self.error_here(format!("was trying to {kind} a reserved keyword"));
                    }
                    path.push(word);
                    self.advance();
                    if !self.guard() {
                        return Import::new(index, path, is_include, is_relative, alias);
                    }
                }
                None => {
                    self.error_here(format!(
                        "expected an identifier after the dot in the {kind} statement"
                    ));
                    break;
                }
            }
        }

        // An optional `as` rebinds the namespace name; imports only.
        if !is_include && self.at_keyword("as") {
            self.advance();
            if !self.guard() {
                return Import::new(index, path, is_include, is_relative, alias);
            }
            match self.current_identifier() {
                Some(word) => {
                    if is_reserved_keyword(&word) {
                        self.error_here("could not use a reserved keyword as the alias of the import");
                    }
                    alias = word;
                }
                None => {
                    self.error_here(
                        "expected an identifier after the `as` keyword in the import statement",
                    );
                }
            }
            self.advance();
            if !self.guard() {
                return Import::new(index, path, is_include, is_relative, alias);
            }
        }

        if self.at_symbol(Symbol::Semicolon) {
            self.advance();
        } else {
            self.error_here(format!("expected a semicolon after the {kind} statement"));
        }

        Import::new(index, path, is_include, is_relative, alias)
    }

    /// Parse a function declaration; `def` is already consumed. When the
    /// next token is `(` the function is a lambda (empty identifier path).
    pub(crate) fn parse_function(&mut self, is_conditional: bool) -> Function {
        let mut function = Function {
            index: self.current_index(),
            identifiers: vec![],
            generic_args: vec![],
            id_array: vec![],
            return_type: Identifiers::new(0, vec![]),
            return_array: vec![],
            return_refs: 0,
            arguments: vec![],
            body: vec![],
            is_conditional,
            is_public: true,
            is_static: false,
        };

        if !self.at_symbol(Symbol::ParenOpen) {
            let (mut identifiers, mut generic_args) = (vec![], vec![]);
            self.parse_top_scope_path(&mut identifiers, &mut generic_args);
            function.identifiers = identifiers;
            function.generic_args = generic_args;
            if !self.guard() {
                return function;
            }

            // Receiver array dimensions: `def float[3].cross(...)`.
            while self.at_symbol(Symbol::SquareOpen) {
                self.advance();
                if !self.guard() {
                    return function;
                }
                match self.current_integer() {
                    Some(value) => {
                        if value == 0 {
                            self.error_here("an array cannot be zero-sized");
                        }
                        function.id_array.push(value);
                        self.advance();
                        if !self.guard() {
                            return function;
                        }
                    }
                    None => self.error_here("expected an integer for the array size"),
                }
                if !self.at_symbol(Symbol::SquareClose) {
                    self.error_here("expected a closing square bracket");
                }
                self.advance();
                if !self.guard() {
                    return function;
                }
            }

            // Extra segment: `def something!T.extraIdentifier() {}`.
            if self.at_symbol(Symbol::Dot) {
                self.advance();
                if !self.guard() {
                    return function;
                }
                match self.current_identifier() {
                    Some(word) => {
                        function.identifiers.push(word);
                        self.advance();
                    }
                    None => self.error_here(
                        "expected an identifier after the dot in the function declaration name",
                    ),
                }
            }

            if !self.guard() {
                return function;
            }
            if !self.at_symbol(Symbol::ParenOpen) {
                self.error_here(
                    "expected an opening parentheses of the argument(s) in the function declaration",
                );
                return function;
            }
        }

        self.advance(); // (
        if !self.guard() {
            return function;
        }

        loop {
            if self.at_symbol(Symbol::ParenClose) {
                break;
            }
            function.arguments.push(self.parse_declaration());
            if !self.guard() {
                return function;
            }
            if self.at_symbol(Symbol::Comma) {
                self.advance();
                if !self.guard() {
                    return function;
                }
                continue;
            }
            if self.at_symbol(Symbol::ParenClose) {
                break;
            }
            self.error_here(
                "expected a closing parentheses or a comma in the function declaration's argument(s)",
            );
            return function;
        }

        self.advance(); // )
        if !self.guard() {
            return function;
        }

        // Return type: `-> [ref]* Type [N]*`, defaulting to `void`.
        // The arrow arrives as two tokens, `-` then `>`.
        if self.at_operator(Operator::Sub) {
            self.advance();
            if !self.guard() {
                return function;
            }
            if self.at_operator(Operator::More) {
                self.advance();
                if !self.guard() {
                    return function;
                }
                while self.at_keyword("ref") {
                    function.return_refs += 1;
                    self.advance();
                    if !self.guard() {
                        return function;
                    }
                }
                function.return_type = self.parse_identifiers();
                if !self.guard() {
                    return function;
                }
                if self.at_symbol(Symbol::SquareOpen) {
                    function.return_array = self.parse_array_dimension();
                }
            } else {
                function.return_type =
                    Identifiers::new(self.current_index(), vec!["void".to_string()]);
                self.error_here("expected a `->` specifying a return type");
            }
        } else {
            function.return_type = Identifiers::new(self.current_index(), vec!["void".to_string()]);
        }

        function.body = self.parse_body(0);
        function
    }

    /// Parse a variable declaration: `[ref]* Type [N]* name [( … ) | = expr]`.
    pub(crate) fn parse_declaration(&mut self) -> Declaration {
        let mut declaration = Declaration {
            index: self.current_index(),
            var_type: Identifiers::new(0, vec![]),
            var_array: vec![],
            var_name: String::new(),
            expression: None,
            refs: 0,
            is_public: true,
            is_static: false,
        };

        while self.at_keyword("ref") {
            declaration.refs += 1;
            self.advance();
            if !self.guard() {
                return declaration;
            }
        }

        declaration.var_type = self.parse_identifiers();
        if !self.guard() {
            return declaration;
        }
        declaration.var_array = self.parse_array_dimension();
        if !self.guard() {
            return declaration;
        }

        let Some(word) = self.current_identifier() else {
            self.error_here("expected an identifier of the name of the variable declaration");
            return declaration;
        };
        if is_reserved_keyword(&word) {
            self.error_here("cannot use a reserved keyword as a variable name");
        }
        declaration.var_name = word;
        self.advance();
        if self.at_end() {
            return declaration;
        }

        if self.at_symbol(Symbol::ParenOpen) {
            // Constructor form: `SomeClass x(1, 2, 3)`.
            declaration.expression = match self.parse_tuple(false) {
                Ok(expression) => Some(Box::new(expression)),
                Err(error) => {
                    self.record_error(error);
                    None
                }
            };
        } else if self.at_operator(Operator::Assign) {
            self.advance();
            if !self.guard() {
                return declaration;
            }
            declaration.expression = match self.parse_expression() {
                Ok(expression) => Some(Box::new(expression)),
                Err(error) => {
                    self.record_error(error);
                    None
                }
            };
        }

        declaration
    }

    /// Parse a class or struct declaration; the keyword is already
    /// consumed.
    pub(crate) fn parse_user_type(&mut self, is_class: bool) -> UserType {
        let type_name = if is_class { "class" } else { "struct" };
        let mut user_type = UserType {
            index: self.current_index(),
            identifiers: vec![],
            base: None,
            generic_args: vec![],
            members: vec![],
            methods: vec![],
            is_class,
            is_public: true,
        };

        let (mut identifiers, mut generic_args) = (vec![], vec![]);
        self.parse_top_scope_path(&mut identifiers, &mut generic_args);
        user_type.identifiers = identifiers;
        user_type.generic_args = generic_args;
        if !self.guard() {
            return user_type;
        }

        // Optional base type: `class K(Base) { ... }`.
        if self.at_symbol(Symbol::ParenOpen) {
            self.advance();
            if !self.guard() {
                return user_type;
            }
            user_type.base = Some(self.parse_identifiers());
            if !self.guard() {
                return user_type;
            }
            if self.at_symbol(Symbol::ParenClose) {
                self.advance();
            } else {
                self.error_here(format!(
                    "expected a closing parentheses after the base class argument in the {type_name} declaration"
                ));
            }
        }

        if !self.guard() {
            return user_type;
        }
        if !self.at_symbol(Symbol::CurlyOpen) {
            self.error_here(format!(
                "expected an opening curly bracket for the {type_name} body"
            ));
            return user_type;
        }
        self.advance();

        loop {
            if !self.guard() {
                return user_type;
            }
            let (is_public, is_static) = self.parse_access_attribs();
            if !self.guard() {
                return user_type;
            }
            let token = self.tokens[self.pos].clone();

            match &token.kind {
                TokenKind::Identifier(word) if word == "def" || word == "try" => {
                    self.advance();
                    let is_conditional = word == "try";
                    if is_conditional {
                        if self.at_keyword("def") {
                            self.advance();
                        } else {
                            self.error_here("expected `def` after `try`");
                        }
                    }
                    if !self.guard() {
                        return user_type;
                    }

                    let mut method = self.parse_function(is_conditional);
                    if !method.generic_args.is_empty() {
                        self.error_at_token("a method cannot have generic arguments", token.clone());
                    }
                    if method.identifiers.is_empty() {
                        self.error_at_token("a method cannot be a lambda", token);
                    }
                    method.is_public = is_public;
                    method.is_static = is_static;
                    user_type.methods.push(method);
                }
                TokenKind::Identifier(_) => {
                    let mut member = self.parse_declaration();
                    member.is_public = is_public;
                    member.is_static = is_static;
                    user_type.members.push(member);
                    if !self.guard() {
                        return user_type;
                    }
                    if self.at_symbol(Symbol::Semicolon) {
                        self.advance();
                    } else {
                        self.error_here(format!(
                            "expected a semicolon after a variable declaration in the {type_name} body"
                        ));
                        if !self.at_symbol(Symbol::CurlyClose) {
                            self.advance();
                        }
                    }
                }
                TokenKind::Symbol(Symbol::Semicolon) => self.advance(),
                TokenKind::Symbol(Symbol::CurlyClose) => {
                    self.advance();
                    break;
                }
                _ => {
                    self.advance();
                    self.error_at_token(
                        format!(
                            "unexpected `{}` while parsing the {type_name} body",
                            token.text()
                        ),
                        token,
                    );
                }
            }
        }

        user_type
    }

    /// Parse an enum declaration; the keyword is already consumed.
    pub(crate) fn parse_enum(&mut self) -> EnumType {
        let mut enum_type = EnumType {
            index: self.current_index(),
            identifiers: vec![],
            members: vec![],
            values: vec![],
            is_public: true,
        };

        // Member values continue from an internal counter that resets to
        // `value + 1` whenever an explicit value is given.
        let mut counter: u64 = 0;

        let (mut identifiers, mut generic_args) = (vec![], vec![]);
        self.parse_top_scope_path(&mut identifiers, &mut generic_args);
        enum_type.identifiers = identifiers;
        if !generic_args.is_empty() {
            self.error_here("an enum cannot have generic arguments");
        }
        if !self.guard() {
            return enum_type;
        }

        if !self.at_symbol(Symbol::CurlyOpen) {
            self.error_here("expected an opening curly bracket after the enum declaration");
            return enum_type;
        }
        self.advance();
        if !self.guard() {
            return enum_type;
        }

        loop {
            if self.at_symbol(Symbol::CurlyClose) {
                self.advance();
                break;
            }

            match self.current_identifier() {
                Some(word) => {
                    enum_type.members.push(word);
                    self.advance();
                }
                None => {
                    let token = self.tokens[self.pos].clone();
                    self.advance();
                    self.error_at_token(
                        format!("unexpected `{}` while parsing the enum body", token.text()),
                        token,
                    );
                    if !self.guard() {
                        return enum_type;
                    }
                    continue;
                }
            }
            if !self.guard() {
                return enum_type;
            }

            if self.at_operator(Operator::Assign) {
                self.advance();
                if !self.guard() {
                    return enum_type;
                }
                match self.current_integer() {
                    Some(value) => {
                        enum_type.values.push(value);
                        counter = value.wrapping_add(1);
                        self.advance();
                        if !self.guard() {
                            return enum_type;
                        }
                    }
                    None => {
                        self.error_here(
                            "expected an integer constant after the assignment operator on the enum member",
                        );
                        enum_type.values.push(counter);
                        counter = counter.wrapping_add(1);
                    }
                }
            } else {
                enum_type.values.push(counter);
                counter = counter.wrapping_add(1);
            }

            // Duplicate names and values are reported; both entries stay.
            let last = enum_type.members.len() - 1;
            for member in 0..last {
                if enum_type.members[member] == enum_type.members[last] {
                    self.error_here(format!(
                        "this enum member has the same name as the #{} member",
                        member + 1
                    ));
                    break;
                }
                if enum_type.values[member] == enum_type.values[last] {
                    self.error_here(format!(
                        "this enum member has the same value as `{}`",
                        enum_type.members[member]
                    ));
                    break;
                }
            }

            if self.at_symbol(Symbol::CurlyClose) {
                self.advance();
                break;
            }
            if !self.at_symbol(Symbol::Comma) {
                self.error_here(
                    "expected a closing curly bracket or a comma after an enum member in the enum body",
                );
            }
            self.advance();
            if !self.guard() {
                return enum_type;
            }
        }

        enum_type
    }

    /// Parse a top-scope declaration name: a dotted identifier path with
    /// optional generic parameter names (`Path!T` or `Path!(T, U)`).
    pub(crate) fn parse_top_scope_path(
        &mut self,
        identifiers: &mut Vec<String>,
        generic_args: &mut Vec<String>,
    ) {
        loop {
            match self.current_identifier() {
                Some(word) => {
                    if is_reserved_keyword(&word) {
                        self.error_here("cannot use a reserved keyword as an identifier");
                    }
                    identifiers.push(word);
                    self.advance();
                }
                None => self.error_here("expected an identifier"),
            }
            if self.at_end() {
                self.eof_error();
                return;
            }
            if self.at_symbol(Symbol::Dot) {
                self.advance();
                if !self.guard() {
                    return;
                }
                continue;
            }
            break;
        }

        if self.at_operator(Operator::Not) {
            self.advance();
            if !self.guard() {
                return;
            }
            if let Some(word) = self.current_identifier() {
                if is_reserved_keyword(&word) {
                    self.error_here(
                        "cannot use a reserved keyword as an identifier of a generic argument",
                    );
                }
                generic_args.push(word);
                self.advance();
            } else if self.at_symbol(Symbol::ParenOpen) {
                self.advance();
                if !self.guard() {
                    return;
                }
                loop {
                    match self.current_identifier() {
                        Some(word) => {
                            if is_reserved_keyword(&word) {
                                self.error_here(
                                    "cannot use a reserved keyword as an identifier of a generic argument",
                                );
                            }
                            generic_args.push(word);
                            self.advance();
                        }
                        None => self.error_here("expected an identifier for a generic argument"),
                    }
                    if !self.guard() {
                        return;
                    }
                    if self.at_symbol(Symbol::Comma) {
                        self.advance();
                        if !self.guard() {
                            return;
                        }
                        continue;
                    }
                    break;
                }
                if self.at_symbol(Symbol::ParenClose) {
                    self.advance();
                } else {
                    self.error_here("expected a closing parentheses");
                }
            } else {
                self.error_here(
                    "expected an identifier or an opening parentheses for the generic argument(s)",
                );
            }
        }
    }
}
