//! Kite AST — the syntax tree produced by the parser.
//!
//! Every node carries the code-point `index` of the token that introduced
//! it. Children are exclusively owned by their parent (a tree, not a DAG);
//! dropping the module frees everything below it.

pub mod expr;
pub mod item;
pub mod pretty;
pub mod stmt;

pub use expr::{Expr, Identifiers, Value};
pub use item::{Declaration, EnumType, Function, Import, Module, UserType};
pub use pretty::pretty_print;
pub use stmt::Stmt;
