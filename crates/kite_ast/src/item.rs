//! Module-level AST nodes — imports, functions, user types, enums,
//! top-level declarations.

use crate::expr::{Expr, Identifiers};
use crate::stmt::Stmt;

/// A parsed module: the root of the tree.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Module {
    pub imports: Vec<Import>,
    pub functions: Vec<Function>,
    pub user_types: Vec<UserType>,
    pub enums: Vec<EnumType>,
    pub variables: Vec<Declaration>,
}

/// `import a.b.c as d;` or `include a.b;`
#[derive(Debug, Clone, PartialEq)]
pub struct Import {
    pub index: usize,
    pub path: Vec<String>,
    pub is_include: bool,
    pub is_relative: bool,
    pub is_public: bool,
    /// The bound name: the `as` alias if given, otherwise the last path
    /// segment. Empty when the path itself failed to parse.
    pub alias: String,
}

impl Import {
    /// Builds an import, defaulting the alias to the last path segment.
    pub fn new(
        index: usize,
        path: Vec<String>,
        is_include: bool,
        is_relative: bool,
        alias: String,
    ) -> Self {
        let alias = match path.last() {
            None => String::new(),
            Some(last) if alias.is_empty() => last.clone(),
            _ => alias,
        };
        Self {
            index,
            path,
            is_include,
            is_relative,
            is_public: true,
            alias,
        }
    }
}

/// A function declaration. An empty identifier path marks a lambda.
#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    pub index: usize,
    pub identifiers: Vec<String>,
    pub generic_args: Vec<String>,
    /// Receiver array dimensions for methods extending an array type,
    /// e.g. `def float[3].cross(float[3] other)`.
    pub id_array: Vec<u64>,
    pub return_type: Identifiers,
    pub return_array: Vec<u64>,
    pub return_refs: usize,
    pub arguments: Vec<Declaration>,
    pub body: Vec<Stmt>,
    /// Declared with `try def`.
    pub is_conditional: bool,
    pub is_public: bool,
    pub is_static: bool,
}

/// A variable declaration: `ref int[3] x = ...;` or `SomeClass y(1, 2);`
#[derive(Debug, Clone, PartialEq)]
pub struct Declaration {
    pub index: usize,
    pub var_type: Identifiers,
    pub var_array: Vec<u64>,
    pub var_name: String,
    /// Either the `= expr` initializer or the parenthesized constructor
    /// tuple; absent when the variable is default-initialized.
    pub expression: Option<Box<Expr>>,
    /// Number of leading `ref` keywords.
    pub refs: usize,
    pub is_public: bool,
    pub is_static: bool,
}

/// A `class` or `struct` declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct UserType {
    pub index: usize,
    pub identifiers: Vec<String>,
    pub base: Option<Identifiers>,
    pub generic_args: Vec<String>,
    pub members: Vec<Declaration>,
    pub methods: Vec<Function>,
    pub is_class: bool,
    pub is_public: bool,
}

/// An `enum` declaration. `members` and `values` run in parallel.
#[derive(Debug, Clone, PartialEq)]
pub struct EnumType {
    pub index: usize,
    pub identifiers: Vec<String>,
    pub members: Vec<String>,
    pub values: Vec<u64>,
    pub is_public: bool,
}
