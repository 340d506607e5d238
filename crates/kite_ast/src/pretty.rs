//! AST pretty printer — outputs a readable tree format for debugging.
//!
//! Prints a module as an indented tree. Example output:
//! ```text
//! Module
//! └── Function "main"
//!     ├── ReturnType: void
//!     ├── Params: (none)
//!     └── Body
//!         └── Call
//! ```

use crate::expr::{Expr, Identifiers, Value};
use crate::item::{Declaration, EnumType, Function, Import, Module, UserType};
use crate::stmt::Stmt;

/// Pretty-prints an AST to a string.
pub struct PrettyPrinter {
    output: String,
    indent: usize,
}

impl PrettyPrinter {
    pub fn new() -> Self {
        Self {
            output: String::new(),
            indent: 0,
        }
    }

    pub fn print_module(&mut self, module: &Module) -> &str {
        self.line("Module");
        self.indent += 1;

        let total = module.imports.len()
            + module.functions.len()
            + module.user_types.len()
            + module.enums.len()
            + module.variables.len();
        let mut seen = 0;

        for import in &module.imports {
            seen += 1;
            self.prefix(seen == total);
            self.print_import(import);
        }
        for function in &module.functions {
            seen += 1;
            self.prefix(seen == total);
            self.print_function(function);
        }
        for user_type in &module.user_types {
            seen += 1;
            self.prefix(seen == total);
            self.print_user_type(user_type);
        }
        for enum_type in &module.enums {
            seen += 1;
            self.prefix(seen == total);
            self.print_enum(enum_type);
        }
        for variable in &module.variables {
            seen += 1;
            self.prefix(seen == total);
            self.print_declaration(variable);
        }

        self.indent -= 1;
        &self.output
    }

    fn print_import(&mut self, import: &Import) {
        let kind = if import.is_include { "Include" } else { "Import" };
        let relative = if import.is_relative { "." } else { "" };
        let mut text = format!(
            "{}{} {}{}",
            vis_str(import.is_public),
            kind,
            relative,
            import.path.join(".")
        );
        if !import.is_include && import.alias != *import.path.last().unwrap_or(&String::new()) {
            text.push_str(&format!(" as {}", import.alias));
        }
        self.line(&text);
    }

    fn print_function(&mut self, function: &Function) {
        let name = if function.identifiers.is_empty() {
            "(lambda)".to_string()
        } else {
            format!("\"{}\"", function.identifiers.join("."))
        };
        let conditional = if function.is_conditional { "try " } else { "" };
        let staticness = if function.is_static { "static " } else { "" };
        self.line(&format!(
            "{}{}{}Function {}{}{}",
            vis_str(function.is_public),
            staticness,
            conditional,
            name,
            generics_str(&function.generic_args),
            array_str(&function.id_array),
        ));
        self.indent += 1;

        self.child(
            false,
            &format!(
                "ReturnType: {}{}{}",
                refs_str(function.return_refs),
                type_str(&function.return_type),
                array_str(&function.return_array)
            ),
        );

        if function.arguments.is_empty() {
            self.child(false, "Params: (none)");
        } else {
            self.child(false, "Params");
            self.indent += 1;
            for (i, argument) in function.arguments.iter().enumerate() {
                self.prefix(i == function.arguments.len() - 1);
                self.print_declaration(argument);
            }
            self.indent -= 1;
        }

        self.prefix(true);
        self.line("Body");
        self.indent += 1;
        self.print_body(&function.body);
        self.indent -= 1;

        self.indent -= 1;
    }

    fn print_user_type(&mut self, user_type: &UserType) {
        let kind = if user_type.is_class { "Class" } else { "Struct" };
        let base = match &user_type.base {
            Some(base) => format!(" ({})", type_str(base)),
            None => String::new(),
        };
        self.line(&format!(
            "{}{} \"{}\"{}{}",
            vis_str(user_type.is_public),
            kind,
            user_type.identifiers.join("."),
            generics_str(&user_type.generic_args),
            base,
        ));
        self.indent += 1;
        let total = user_type.members.len() + user_type.methods.len();
        let mut seen = 0;
        for member in &user_type.members {
            seen += 1;
            self.prefix(seen == total);
            self.print_declaration(member);
        }
        for method in &user_type.methods {
            seen += 1;
            self.prefix(seen == total);
            self.print_function(method);
        }
        self.indent -= 1;
    }

    fn print_enum(&mut self, enum_type: &EnumType) {
        self.line(&format!(
            "{}Enum \"{}\"",
            vis_str(enum_type.is_public),
            enum_type.identifiers.join(".")
        ));
        self.indent += 1;
        for (i, member) in enum_type.members.iter().enumerate() {
            self.prefix(i == enum_type.members.len() - 1);
            self.line(&format!("{}: {}", member, enum_type.values[i]));
        }
        self.indent -= 1;
    }

    fn print_declaration(&mut self, declaration: &Declaration) {
        let staticness = if declaration.is_static { "static " } else { "" };
        self.line(&format!(
            "{}{}Declare {}: {}{}{}",
            vis_str(declaration.is_public),
            staticness,
            declaration.var_name,
            refs_str(declaration.refs),
            type_str(&declaration.var_type),
            array_str(&declaration.var_array),
        ));
        if let Some(expression) = &declaration.expression {
            self.indent += 1;
            self.prefix(true);
            self.print_expr(expression);
            self.indent -= 1;
        }
    }

    // === Statements ===

    fn print_body(&mut self, body: &[Stmt]) {
        for (i, stmt) in body.iter().enumerate() {
            self.prefix(i == body.len() - 1);
            self.print_stmt(stmt);
        }
    }

    fn print_stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Declaration(declaration) => self.print_declaration(declaration),
            Stmt::Expr(expr) => self.print_expr(expr),
            Stmt::If {
                conditions,
                bodies,
                else_body,
                ..
            } => {
                self.line("If");
                self.indent += 1;
                for (i, condition) in conditions.iter().enumerate() {
                    let last = i == conditions.len() - 1 && else_body.is_empty();
                    self.prefix(last);
                    self.line("Clause");
                    self.indent += 1;
                    self.prefix(false);
                    self.line("Condition");
                    self.indent += 1;
                    self.prefix(true);
                    self.print_expr(condition);
                    self.indent -= 1;
                    self.prefix(true);
                    self.line("Body");
                    self.indent += 1;
                    self.print_body(&bodies[i]);
                    self.indent -= 1;
                    self.indent -= 1;
                }
                if !else_body.is_empty() {
                    self.prefix(true);
                    self.line("Else");
                    self.indent += 1;
                    self.print_body(else_body);
                    self.indent -= 1;
                }
                self.indent -= 1;
            }
            Stmt::While {
                condition, body, ..
            } => {
                self.line("While");
                self.print_condition_and_body(condition, body);
            }
            Stmt::DoWhile {
                condition, body, ..
            } => {
                self.line("DoWhile");
                self.print_condition_and_body(condition, body);
            }
            Stmt::For {
                initialize,
                condition,
                step,
                body,
                ..
            } => {
                self.line("For");
                self.indent += 1;
                self.prefix(false);
                self.line("Initializer");
                self.indent += 1;
                self.prefix(true);
                self.print_expr(initialize);
                self.indent -= 1;
                self.prefix(false);
                self.line("Condition");
                self.indent += 1;
                self.prefix(true);
                self.print_expr(condition);
                self.indent -= 1;
                self.prefix(false);
                self.line("Step");
                self.indent += 1;
                self.prefix(true);
                self.print_expr(step);
                self.indent -= 1;
                self.prefix(true);
                self.line("Body");
                self.indent += 1;
                self.print_body(body);
                self.indent -= 1;
                self.indent -= 1;
            }
            Stmt::ForEach {
                target,
                iterator,
                body,
                ..
            } => {
                self.line("ForEach");
                self.indent += 1;
                self.prefix(false);
                self.line("Target");
                self.indent += 1;
                self.prefix(true);
                self.print_expr(target);
                self.indent -= 1;
                self.prefix(false);
                self.line("Iterator");
                self.indent += 1;
                self.prefix(true);
                self.print_expr(iterator);
                self.indent -= 1;
                self.prefix(true);
                self.line("Body");
                self.indent += 1;
                self.print_body(body);
                self.indent -= 1;
                self.indent -= 1;
            }
            Stmt::Continue { loop_count, .. } => {
                self.line(&format!("Continue {loop_count}"));
            }
            Stmt::Break { loop_count, .. } => {
                self.line(&format!("Break {loop_count}"));
            }
            Stmt::Return { expression, .. } => match expression {
                Some(expression) => {
                    self.line("Return");
                    self.indent += 1;
                    self.prefix(true);
                    self.print_expr(expression);
                    self.indent -= 1;
                }
                None => self.line("Return (void)"),
            },
        }
    }

    fn print_condition_and_body(&mut self, condition: &Expr, body: &[Stmt]) {
        self.indent += 1;
        self.prefix(false);
        self.line("Condition");
        self.indent += 1;
        self.prefix(true);
        self.print_expr(condition);
        self.indent -= 1;
        self.prefix(true);
        self.line("Body");
        self.indent += 1;
        self.print_body(body);
        self.indent -= 1;
        self.indent -= 1;
    }

    // === Expressions ===

    fn print_expr(&mut self, expr: &Expr) {
        match expr {
            Expr::Identifiers(identifiers) => {
                self.line(&format!("Ident({})", type_str(identifiers)));
            }
            Expr::Unary { op, value, .. } => {
                self.line(&format!("Unary({})", op.text()));
                self.indent += 1;
                self.prefix(true);
                self.print_expr(value);
                self.indent -= 1;
            }
            Expr::RevUnary { op, value, .. } => {
                self.line(&format!("RevUnary({})", op.text()));
                self.indent += 1;
                self.prefix(true);
                self.print_expr(value);
                self.indent -= 1;
            }
            Expr::Binary {
                op, left, right, ..
            } => {
                self.line(&format!("Binary({})", op.text()));
                self.indent += 1;
                self.prefix(false);
                self.print_expr(left);
                self.prefix(true);
                self.print_expr(right);
                self.indent -= 1;
            }
            Expr::Ternary {
                condition,
                value,
                otherwise,
                ..
            } => {
                self.line("Ternary");
                self.indent += 1;
                self.prefix(false);
                self.line("Condition");
                self.indent += 1;
                self.prefix(true);
                self.print_expr(condition);
                self.indent -= 1;
                self.prefix(false);
                self.line("Value");
                self.indent += 1;
                self.prefix(true);
                self.print_expr(value);
                self.indent -= 1;
                self.prefix(true);
                self.line("Otherwise");
                self.indent += 1;
                self.prefix(true);
                self.print_expr(otherwise);
                self.indent -= 1;
                self.indent -= 1;
            }
            Expr::Comparison {
                operations, values, ..
            } => {
                let ops: Vec<&str> = operations.iter().map(|op| op.text()).collect();
                self.line(&format!("Comparison({})", ops.join(" ")));
                self.indent += 1;
                for (i, value) in values.iter().enumerate() {
                    self.prefix(i == values.len() - 1);
                    self.print_expr(value);
                }
                self.indent -= 1;
            }
            Expr::Subscript {
                expression,
                arguments,
                ..
            } => {
                self.line("Subscript");
                self.print_expr_and_args(expression, arguments);
            }
            Expr::Call {
                expression,
                arguments,
                ..
            } => {
                self.line("Call");
                self.print_expr_and_args(expression, arguments);
            }
            Expr::Scoping {
                expression,
                identifiers,
                ..
            } => {
                self.line(&format!("Scoping .{}", identifiers.join(".")));
                self.indent += 1;
                self.prefix(true);
                self.print_expr(expression);
                self.indent -= 1;
            }
            Expr::Value { value, .. } => match value {
                Value::Character(c) => self.line(&format!("Character({c:?})")),
                Value::Uinteger(v) => self.line(&format!("Uinteger({v})")),
                Value::Integer(v) => self.line(&format!("Integer({v})")),
                Value::Floating(v) => self.line(&format!("Floating({v})")),
                Value::Imaginary(v) => self.line(&format!("Imaginary({v}i)")),
                Value::Buffer(bytes) => self.line(&format!("Buffer({} byte(s))", bytes.len())),
                Value::String(s) => self.line(&format!("String({s:?})")),
            },
            Expr::Tuple { elements, .. } => {
                self.line(&format!("Tuple({})", elements.len()));
                self.print_elements(elements);
            }
            Expr::List { elements, .. } => {
                self.line(&format!("List({})", elements.len()));
                self.print_elements(elements);
            }
            Expr::Dict { keys, items, .. } => {
                self.line(&format!("Dict({})", keys.len()));
                self.indent += 1;
                for (i, key) in keys.iter().enumerate() {
                    self.prefix(i == keys.len() - 1);
                    self.line("Pair");
                    self.indent += 1;
                    self.prefix(false);
                    self.print_expr(key);
                    self.prefix(true);
                    self.print_expr(&items[i]);
                    self.indent -= 1;
                }
                self.indent -= 1;
            }
            Expr::Declaration(declaration) => self.print_declaration(declaration),
            Expr::Function(function) => self.print_function(function),
        }
    }

    fn print_expr_and_args(&mut self, expression: &Expr, arguments: &[Expr]) {
        self.indent += 1;
        self.prefix(arguments.is_empty());
        self.print_expr(expression);
        if !arguments.is_empty() {
            self.prefix(true);
            self.line("Args");
            self.indent += 1;
            for (i, argument) in arguments.iter().enumerate() {
                self.prefix(i == arguments.len() - 1);
                self.print_expr(argument);
            }
            self.indent -= 1;
        }
        self.indent -= 1;
    }

    fn print_elements(&mut self, elements: &[Expr]) {
        self.indent += 1;
        for (i, element) in elements.iter().enumerate() {
            self.prefix(i == elements.len() - 1);
            self.print_expr(element);
        }
        self.indent -= 1;
    }

    // === Output helpers ===

    fn line(&mut self, text: &str) {
        self.output.push_str(text);
        self.output.push('\n');
    }

    fn prefix(&mut self, is_last: bool) {
        for i in 0..self.indent {
            if i == self.indent - 1 {
                if is_last {
                    self.output.push_str("└── ");
                } else {
                    self.output.push_str("├── ");
                }
            } else {
                self.output.push_str("│   ");
            }
        }
    }

    fn child(&mut self, is_last: bool, text: &str) {
        self.prefix(is_last);
        self.line(text);
    }
}

impl Default for PrettyPrinter {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience function to pretty-print a module.
pub fn pretty_print(module: &Module) -> String {
    let mut printer = PrettyPrinter::new();
    printer.print_module(module);
    printer.output
}

// === Helper functions ===

fn vis_str(is_public: bool) -> &'static str {
    if is_public {
        ""
    } else {
        "private "
    }
}

fn refs_str(refs: usize) -> String {
    "ref ".repeat(refs)
}

fn array_str(dimensions: &[u64]) -> String {
    dimensions.iter().map(|d| format!("[{d}]")).collect()
}

fn generics_str(params: &[String]) -> String {
    if params.is_empty() {
        String::new()
    } else {
        format!("!({})", params.join(", "))
    }
}

/// Render a type reference, e.g. `map!(str, ref int[3])`.
fn type_str(identifiers: &Identifiers) -> String {
    let mut out = identifiers.names.join(".");
    if !identifiers.generics.is_empty() {
        let args: Vec<String> = identifiers
            .generics
            .iter()
            .enumerate()
            .map(|(i, generic)| {
                format!(
                    "{}{}{}",
                    refs_str(identifiers.generics_refs[i]),
                    type_str(generic),
                    array_str(&identifiers.generics_array[i])
                )
            })
            .collect();
        out.push_str(&format!("!({})", args.join(", ")));
    }
    out
}
