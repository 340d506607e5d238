//! Parser test suite — module items, statements, and the expression
//! sub-parser.

use kite_ast::{Expr, Module, Stmt, Value};
use kite_lexer::Operator;

use crate::parser::{parse, ParseError};

/// Helper: lex and parse, asserting both phases are clean.
fn parse_ok(source: &str) -> Module {
    let lexed = kite_lexer::lex(source);
    assert!(
        lexed.errors.is_empty(),
        "lex errors for {source:?}: {:?}",
        lexed.errors
    );
    let result = parse(lexed.tokens);
    assert!(
        result.errors.is_empty(),
        "parse errors for {source:?}: {:?}",
        result.errors
    );
    result.module
}

/// Helper: lex and parse, returning the module and parse errors.
fn parse_with_errors(source: &str) -> (Module, Vec<ParseError>) {
    let lexed = kite_lexer::lex(source);
    let result = parse(lexed.tokens);
    (result.module, result.errors)
}

/// Helper: parse a single expression statement inside a function body.
fn parse_expr(source: &str) -> Expr {
    let module = parse_ok(&format!("def f() {{ {source}; }}"));
    match &module.functions[0].body[0] {
        Stmt::Expr(expr) => expr.clone(),
        other => panic!("expected an expression statement, got {other:?}"),
    }
}

/// Helper: parse a single statement inside a function body.
fn parse_stmt(source: &str) -> Stmt {
    let module = parse_ok(&format!("def f() {{ {source} }}"));
    assert_eq!(module.functions[0].body.len(), 1);
    module.functions[0].body[0].clone()
}

fn ident_expr(expr: &Expr) -> String {
    match expr {
        Expr::Identifiers(identifiers) => identifiers.name(),
        other => panic!("expected an identifier, got {other:?}"),
    }
}

fn int_value(expr: &Expr) -> i64 {
    match expr {
        Expr::Value {
            value: Value::Integer(v),
            ..
        } => *v,
        other => panic!("expected an integer literal, got {other:?}"),
    }
}

// ============================================================
// Empty / trivial
// ============================================================

#[test]
fn test_parse_empty_module() {
    let module = parse_ok("");
    assert!(module.imports.is_empty());
    assert!(module.functions.is_empty());
    assert!(module.user_types.is_empty());
    assert!(module.enums.is_empty());
    assert!(module.variables.is_empty());
}

#[test]
fn test_stray_semicolons_are_tolerated() {
    let module = parse_ok(";;; import std; ;;");
    assert_eq!(module.imports.len(), 1);
}

#[test]
fn test_unexpected_top_scope_token() {
    let (_, errors) = parse_with_errors("42;");
    assert_eq!(errors.len(), 1);
    assert!(errors[0].message.contains("while parsing the top scope"));
    assert_eq!(errors[0].token.index, 0);
}

// ============================================================
// Imports and includes
// ============================================================

#[test]
fn test_import_simple() {
    // S1: `import std;`
    let module = parse_ok("import std;");
    let import = &module.imports[0];
    assert_eq!(import.path, vec!["std".to_string()]);
    assert!(!import.is_include);
    assert!(!import.is_relative);
    assert!(import.is_public);
    assert_eq!(import.alias, "std");
}

#[test]
fn test_import_dotted_path_defaults_alias_to_last_segment() {
    let module = parse_ok("import a.b.c;");
    let import = &module.imports[0];
    assert_eq!(
        import.path,
        vec!["a".to_string(), "b".to_string(), "c".to_string()]
    );
    assert_eq!(import.alias, "c");
}

#[test]
fn test_import_with_alias() {
    let module = parse_ok("import a.b as z;");
    assert_eq!(module.imports[0].alias, "z");
}

#[test]
fn test_relative_import() {
    let module = parse_ok("import .a.b;");
    assert!(module.imports[0].is_relative);
}

#[test]
fn test_include() {
    let module = parse_ok("include a.b;");
    assert!(module.imports[0].is_include);
}

#[test]
fn test_include_does_not_take_alias() {
    let (module, errors) = parse_with_errors("include a as b;");
    assert!(module.imports[0].is_include);
    assert!(!errors.is_empty());
}

#[test]
fn test_private_import() {
    let module = parse_ok("private import std;");
    assert!(!module.imports[0].is_public);
}

#[test]
fn test_import_of_reserved_keyword() {
    let (_, errors) = parse_with_errors("import def;");
    assert!(errors
        .iter()
        .any(|e| e.message.contains("reserved keyword")));
}

#[test]
fn test_static_import_is_rejected() {
    let (_, errors) = parse_with_errors("static import std;");
    assert!(errors.iter().any(|e| e.message.contains("cannot be static")));
}

#[test]
fn test_missing_semicolon_after_import() {
    let (_, errors) = parse_with_errors("import std def f() {}");
    assert!(errors
        .iter()
        .any(|e| e.message.contains("expected a semicolon after the import statement")));
}

// ============================================================
// Functions
// ============================================================

#[test]
fn test_function_basic() {
    // S2: `def main() {}`
    let module = parse_ok("def main() {}");
    let function = &module.functions[0];
    assert_eq!(function.identifiers, vec!["main".to_string()]);
    assert!(function.arguments.is_empty());
    assert!(function.body.is_empty());
    assert_eq!(function.return_type.names, vec!["void".to_string()]);
    assert_eq!(function.return_refs, 0);
    assert!(function.is_public);
    assert!(!function.is_static);
    assert!(!function.is_conditional);
}

#[test]
fn test_function_with_parameters() {
    let module = parse_ok("def add(int a, int b) -> int { return a + b; }");
    let function = &module.functions[0];
    assert_eq!(function.arguments.len(), 2);
    assert_eq!(function.arguments[0].var_name, "a");
    assert_eq!(function.arguments[0].var_type.names, vec!["int".to_string()]);
    assert_eq!(function.return_type.names, vec!["int".to_string()]);
}

#[test]
fn test_function_return_type_with_refs_and_array() {
    let module = parse_ok("def f() -> ref int[3] {}");
    let function = &module.functions[0];
    assert_eq!(function.return_refs, 1);
    assert_eq!(function.return_type.names, vec!["int".to_string()]);
    assert_eq!(function.return_array, vec![3]);
}

#[test]
fn test_conditional_function() {
    let module = parse_ok("try def f() {}");
    assert!(module.functions[0].is_conditional);
}

#[test]
fn test_try_without_def() {
    let (_, errors) = parse_with_errors("try f() {}");
    assert!(errors
        .iter()
        .any(|e| e.message.contains("expected `def` after `try`")));
}

#[test]
fn test_function_generic_params() {
    let module = parse_ok("def f!T() {}");
    assert_eq!(module.functions[0].generic_args, vec!["T".to_string()]);

    let module = parse_ok("def g!(T, U)() {}");
    assert_eq!(
        module.functions[0].generic_args,
        vec!["T".to_string(), "U".to_string()]
    );
}

#[test]
fn test_method_extending_array_type() {
    let module = parse_ok("def float[3].cross(float[3] other) -> float[3] {}");
    let function = &module.functions[0];
    assert_eq!(
        function.identifiers,
        vec!["float".to_string(), "cross".to_string()]
    );
    assert_eq!(function.id_array, vec![3]);
    assert_eq!(function.arguments[0].var_array, vec![3]);
    assert_eq!(function.return_array, vec![3]);
}

#[test]
fn test_lambda_at_top_scope_is_rejected() {
    let (module, errors) = parse_with_errors("def () {}");
    assert!(module.functions[0].identifiers.is_empty());
    assert!(errors
        .iter()
        .any(|e| e.message.contains("lambda cannot be declared at the top scope")));
}

#[test]
fn test_static_free_function_is_rejected() {
    let (_, errors) = parse_with_errors("static def f() {}");
    assert!(errors
        .iter()
        .any(|e| e.message.contains("top scope function cannot be static")));
}

#[test]
fn test_static_out_of_class_method_is_allowed() {
    // `def Class.method` declared at the top scope may be static.
    let module = parse_ok("static def Vec.zero() {}");
    assert!(module.functions[0].is_static);
}

#[test]
fn test_zero_sized_receiver_array() {
    let (_, errors) = parse_with_errors("def float[0].f() {}");
    assert!(errors
        .iter()
        .any(|e| e.message.contains("zero-sized")));
}

// ============================================================
// Access attributes
// ============================================================

#[test]
fn test_access_attribute_order_is_irrelevant() {
    let first = parse_ok("public static def Vec.f() {}");
    let second = parse_ok("static public def Vec.f() {}");
    assert_eq!(first, second);
}

#[test]
fn test_duplicate_access_attribute() {
    let (_, errors) = parse_with_errors("public public int x;");
    assert_eq!(errors.len(), 1);
    assert!(errors[0].message.contains("`public` was already specified"));
}

#[test]
fn test_conflicting_access_attributes_latest_wins() {
    let (module, errors) = parse_with_errors("public private int x;");
    assert!(!errors.is_empty());
    assert!(!module.variables[0].is_public);
}

// ============================================================
// Top-level declarations
// ============================================================

#[test]
fn test_top_level_declaration() {
    let module = parse_ok("int x;");
    let declaration = &module.variables[0];
    assert_eq!(declaration.var_type.names, vec!["int".to_string()]);
    assert_eq!(declaration.var_name, "x");
    assert!(declaration.expression.is_none());
    assert_eq!(declaration.refs, 0);
}

#[test]
fn test_declaration_with_initializer() {
    let module = parse_ok("float number = 6.9;");
    let declaration = &module.variables[0];
    assert!(matches!(
        declaration.expression.as_deref(),
        Some(Expr::Value {
            value: Value::Floating(_),
            ..
        })
    ));
}

#[test]
fn test_declaration_with_ref_depth() {
    let module = parse_ok("ref ref int y = 3;");
    assert_eq!(module.variables[0].refs, 2);
}

#[test]
fn test_declaration_with_array_dimensions() {
    let module = parse_ok("float[3][4] m;");
    assert_eq!(module.variables[0].var_array, vec![3, 4]);
}

#[test]
fn test_declaration_constructor_form() {
    let module = parse_ok("SomeClass x(1, 2, 3);");
    let declaration = &module.variables[0];
    match declaration.expression.as_deref() {
        Some(Expr::Tuple { elements, .. }) => assert_eq!(elements.len(), 3),
        other => panic!("expected a constructor tuple, got {other:?}"),
    }
}

#[test]
fn test_declaration_with_generic_type() {
    let module = parse_ok("map!(str, ref int[3]) m;");
    let var_type = &module.variables[0].var_type;
    assert_eq!(var_type.names, vec!["map".to_string()]);
    assert_eq!(var_type.generics.len(), 2);
    assert_eq!(var_type.generics[0].names, vec!["str".to_string()]);
    assert_eq!(var_type.generics_refs, vec![0, 1]);
    assert_eq!(var_type.generics_array, vec![vec![], vec![3]]);
}

#[test]
fn test_declaration_with_bare_generic() {
    let module = parse_ok("list!int l;");
    let var_type = &module.variables[0].var_type;
    assert_eq!(var_type.generics.len(), 1);
    assert_eq!(var_type.generics[0].names, vec!["int".to_string()]);
}

#[test]
fn test_zero_sized_array_is_rejected() {
    let (_, errors) = parse_with_errors("int[0] x;");
    assert!(errors.iter().any(|e| e.message.contains("zero-sized")));
}

#[test]
fn test_missing_semicolon_after_declaration() {
    let (_, errors) = parse_with_errors("int x int y;");
    assert!(errors
        .iter()
        .any(|e| e.message.contains("expected a semicolon after a variable declaration")));
}

#[test]
fn test_reserved_keyword_as_variable_name() {
    let (_, errors) = parse_with_errors("int if;");
    assert!(errors
        .iter()
        .any(|e| e.message.contains("reserved keyword")));
}

// ============================================================
// User types
// ============================================================

#[test]
fn test_class_with_base_member_and_method() {
    // S7: `class K(Base) { int x; def method() {} }`
    let module = parse_ok("class K(Base) { int x; def method() {} }");
    let user_type = &module.user_types[0];
    assert!(user_type.is_class);
    assert_eq!(user_type.identifiers, vec!["K".to_string()]);
    assert_eq!(
        user_type.base.as_ref().unwrap().names,
        vec!["Base".to_string()]
    );
    assert_eq!(user_type.members.len(), 1);
    assert_eq!(user_type.members[0].var_name, "x");
    assert_eq!(user_type.methods.len(), 1);
    assert_eq!(user_type.methods[0].identifiers, vec!["method".to_string()]);
}

#[test]
fn test_struct() {
    let module = parse_ok("struct Point { float x; float y; }");
    let user_type = &module.user_types[0];
    assert!(!user_type.is_class);
    assert_eq!(user_type.members.len(), 2);
}

#[test]
fn test_class_generic_params() {
    let module = parse_ok("class Box!T { T value; }");
    assert_eq!(module.user_types[0].generic_args, vec!["T".to_string()]);
}

#[test]
fn test_member_access_attributes() {
    let module = parse_ok("class K { private static int counter; def m() {} }");
    let member = &module.user_types[0].members[0];
    assert!(!member.is_public);
    assert!(member.is_static);
}

#[test]
fn test_method_with_generic_params_is_rejected() {
    let (_, errors) = parse_with_errors("class K { def m!T() {} }");
    assert!(errors
        .iter()
        .any(|e| e.message.contains("a method cannot have generic arguments")));
}

#[test]
fn test_method_lambda_is_rejected() {
    let (_, errors) = parse_with_errors("class K { def () {} }");
    assert!(errors
        .iter()
        .any(|e| e.message.contains("a method cannot be a lambda")));
}

#[test]
fn test_conditional_method() {
    let module = parse_ok("class K { try def m() {} }");
    assert!(module.user_types[0].methods[0].is_conditional);
}

#[test]
fn test_static_class_is_rejected() {
    let (_, errors) = parse_with_errors("static class K {}");
    assert!(errors.iter().any(|e| e.message.contains("cannot be static")));
}

// ============================================================
// Enums
// ============================================================

#[test]
fn test_enum_values_continue_after_explicit_value() {
    // S6: `enum E { A, B = 5, C }`
    let module = parse_ok("enum E { A, B = 5, C }");
    let enum_type = &module.enums[0];
    assert_eq!(
        enum_type.members,
        vec!["A".to_string(), "B".to_string(), "C".to_string()]
    );
    assert_eq!(enum_type.values, vec![0, 5, 6]);
}

#[test]
fn test_enum_duplicate_name_is_reported_but_kept() {
    let (module, errors) = parse_with_errors("enum E { A, A }");
    assert_eq!(module.enums[0].members.len(), 2);
    assert!(errors.iter().any(|e| e.message.contains("same name")));
}

#[test]
fn test_enum_duplicate_value_is_reported_but_kept() {
    let (module, errors) = parse_with_errors("enum E { A, B = 0 }");
    assert_eq!(module.enums[0].values, vec![0, 0]);
    assert!(errors.iter().any(|e| e.message.contains("same value")));
}

#[test]
fn test_enum_generic_params_are_rejected() {
    let (_, errors) = parse_with_errors("enum E!T { A }");
    assert!(errors
        .iter()
        .any(|e| e.message.contains("an enum cannot have generic arguments")));
}

#[test]
fn test_enum_trailing_comma() {
    let module = parse_ok("enum E { A, B, }");
    assert_eq!(module.enums[0].members.len(), 2);
}

// ============================================================
// Statements
// ============================================================

#[test]
fn test_if_chain_with_unbraced_bodies() {
    // S8: condition is one comparison chain; both branches hold returns.
    let module = parse_ok("def f() { if (a < b < c) return 1; else return 0; }");
    let Stmt::If {
        conditions,
        bodies,
        else_body,
        ..
    } = &module.functions[0].body[0]
    else {
        panic!("expected an if statement");
    };

    assert_eq!(conditions.len(), 1);
    assert_eq!(bodies.len(), 1);
    match &conditions[0] {
        Expr::Comparison {
            operations, values, ..
        } => {
            assert_eq!(operations, &vec![Operator::Less, Operator::Less]);
            assert_eq!(values.len(), 3);
        }
        other => panic!("expected a comparison chain, got {other:?}"),
    }

    match &bodies[0][0] {
        Stmt::Return {
            expression: Some(expression),
            ..
        } => assert_eq!(int_value(expression), 1),
        other => panic!("expected a return, got {other:?}"),
    }
    match &else_body[0] {
        Stmt::Return {
            expression: Some(expression),
            ..
        } => assert_eq!(int_value(expression), 0),
        other => panic!("expected a return, got {other:?}"),
    }
}

#[test]
fn test_if_elif_else() {
    let module = parse_ok("def f() { if a { x; } elif b { y; } elif c { z; } else { w; } }");
    let Stmt::If {
        conditions,
        bodies,
        else_body,
        ..
    } = &module.functions[0].body[0]
    else {
        panic!("expected an if statement");
    };
    assert_eq!(conditions.len(), 3);
    assert_eq!(bodies.len(), 3);
    assert_eq!(else_body.len(), 1);
}

#[test]
fn test_if_without_else_has_empty_else_body() {
    let Stmt::If { else_body, .. } = parse_stmt("if a { x; }") else {
        panic!("expected an if statement");
    };
    assert!(else_body.is_empty());
}

#[test]
fn test_while() {
    let Stmt::While { condition, body, .. } = parse_stmt("while a < 10 { work(); }") else {
        panic!("expected a while statement");
    };
    assert!(matches!(*condition, Expr::Binary { .. }));
    assert_eq!(body.len(), 1);
}

#[test]
fn test_do_while() {
    let Stmt::DoWhile { body, .. } = parse_stmt("do { work(); } while a;") else {
        panic!("expected a do-while statement");
    };
    assert_eq!(body.len(), 1);
}

#[test]
fn test_do_without_while() {
    let (_, errors) = parse_with_errors("def f() { do { x; } ; }");
    assert!(errors
        .iter()
        .any(|e| e.message.contains("expected `while` after the `do {...}`")));
}

#[test]
fn test_for_classic() {
    let Stmt::For {
        initialize,
        condition,
        step,
        body,
        ..
    } = parse_stmt("for int i = 0, i < 10, i ++ { work(i); }")
    else {
        panic!("expected a for statement");
    };
    assert!(matches!(*initialize, Expr::Declaration(_)));
    assert!(matches!(*condition, Expr::Binary { .. }));
    assert!(matches!(*step, Expr::RevUnary { .. }));
    assert_eq!(body.len(), 1);
}

#[test]
fn test_for_each() {
    let Stmt::ForEach { target, iterator, .. } = parse_stmt("for int x : items { use(x); }")
    else {
        panic!("expected a foreach statement");
    };
    assert!(matches!(*target, Expr::Declaration(_)));
    assert_eq!(ident_expr(&iterator), "items");
}

#[test]
fn test_for_without_separator() {
    let (_, errors) = parse_with_errors("def f() { for x { y; } }");
    assert!(errors
        .iter()
        .any(|e| e.message.contains("expected a colon or a comma")));
}

#[test]
fn test_continue_and_break_in_loop() {
    let module = parse_ok("def f() { while 1 { continue; break; } }");
    let Stmt::While { body, .. } = &module.functions[0].body[0] else {
        panic!("expected a while statement");
    };
    assert!(matches!(body[0], Stmt::Continue { loop_count: 0, .. }));
    assert!(matches!(body[1], Stmt::Break { loop_count: 0, .. }));
}

#[test]
fn test_multi_level_break() {
    let module = parse_ok("def f() { while 1 { while 1 { break 1; } } }");
    let Stmt::While { body, .. } = &module.functions[0].body[0] else {
        panic!("expected a while statement");
    };
    let Stmt::While { body: inner, .. } = &body[0] else {
        panic!("expected a nested while statement");
    };
    assert!(matches!(inner[0], Stmt::Break { loop_count: 1, .. }));
}

#[test]
fn test_break_outside_loop() {
    let (_, errors) = parse_with_errors("def f() { break; }");
    assert!(errors
        .iter()
        .any(|e| e.message.contains("cannot be used outside of while or for loops")));
}

#[test]
fn test_break_too_many_loops() {
    let (_, errors) = parse_with_errors("def f() { while 1 { break 1; } }");
    assert!(errors
        .iter()
        .any(|e| e.message.contains("invalid amount of loops")));
}

#[test]
fn test_continue_inside_if_inside_loop() {
    // An `if` body does not add a loop level.
    parse_ok("def f() { while 1 { if a { continue; } } }");
}

#[test]
fn test_return_without_value() {
    assert!(matches!(
        parse_stmt("return;"),
        Stmt::Return {
            expression: None,
            ..
        }
    ));
}

#[test]
fn test_local_declaration_statement() {
    let Stmt::Declaration(declaration) = parse_stmt("float number = 6.9;") else {
        panic!("expected a declaration statement");
    };
    assert_eq!(declaration.var_name, "number");
}

#[test]
fn test_missing_semicolon_after_expression() {
    let (_, errors) = parse_with_errors("def f() { a }");
    assert!(errors
        .iter()
        .any(|e| e.message.contains("expected a semicolon after the expression")));
}

// ============================================================
// Expressions — precedence
// ============================================================

#[test]
fn test_multiplication_binds_tighter_than_addition() {
    let Expr::Binary {
        op, left, right, ..
    } = parse_expr("a + b * c")
    else {
        panic!("expected a binary expression");
    };
    assert_eq!(op, Operator::Add);
    assert_eq!(ident_expr(&left), "a");
    assert!(matches!(
        *right,
        Expr::Binary {
            op: Operator::Mul,
            ..
        }
    ));
}

#[test]
fn test_power_is_right_associative() {
    let Expr::Binary { op, right, .. } = parse_expr("a ^ b ^ c") else {
        panic!("expected a binary expression");
    };
    assert_eq!(op, Operator::Pow);
    assert!(matches!(
        *right,
        Expr::Binary {
            op: Operator::Pow,
            ..
        }
    ));
}

#[test]
fn test_assignment_is_right_associative() {
    let Expr::Binary { op, right, .. } = parse_expr("a = b = c") else {
        panic!("expected a binary expression");
    };
    assert_eq!(op, Operator::Assign);
    assert!(matches!(
        *right,
        Expr::Binary {
            op: Operator::Assign,
            ..
        }
    ));
}

#[test]
fn test_compound_assignment() {
    assert!(matches!(
        parse_expr("a += 1"),
        Expr::Binary {
            op: Operator::IAdd,
            ..
        }
    ));
}

#[test]
fn test_comparison_chain() {
    let Expr::Comparison {
        operations, values, ..
    } = parse_expr("a < b <= c")
    else {
        panic!("expected a comparison chain");
    };
    assert_eq!(operations, vec![Operator::Less, Operator::LessEqual]);
    assert_eq!(values.len(), 3);
}

#[test]
fn test_single_comparison_is_plain_binary() {
    assert!(matches!(
        parse_expr("a < b"),
        Expr::Binary {
            op: Operator::Less,
            ..
        }
    ));
}

#[test]
fn test_logical_not_binds_looser_than_comparison() {
    let Expr::Unary { op, value, .. } = parse_expr("!a < b") else {
        panic!("expected a unary expression");
    };
    assert_eq!(op, Operator::Not);
    assert!(matches!(
        *value,
        Expr::Binary {
            op: Operator::Less,
            ..
        }
    ));
}

#[test]
fn test_shift_and_bitwise_precedence() {
    // `a | b & c << d` parses as `a | (b & (c << d))`.
    let Expr::Binary { op, right, .. } = parse_expr("a | b & c << d") else {
        panic!("expected a binary expression");
    };
    assert_eq!(op, Operator::BitOr);
    let Expr::Binary { op, right, .. } = *right else {
        panic!("expected a nested binary expression");
    };
    assert_eq!(op, Operator::BitAnd);
    assert!(matches!(
        *right,
        Expr::Binary {
            op: Operator::BitLshift,
            ..
        }
    ));
}

#[test]
fn test_ternary() {
    let Expr::Ternary {
        condition,
        value,
        otherwise,
        ..
    } = parse_expr("a if b else c")
    else {
        panic!("expected a ternary expression");
    };
    assert_eq!(ident_expr(&value), "a");
    assert_eq!(ident_expr(&condition), "b");
    assert_eq!(ident_expr(&otherwise), "c");
}

// ============================================================
// Expressions — unary, postfix, atoms
// ============================================================

#[test]
fn test_prefix_unary_operators() {
    assert!(matches!(
        parse_expr("-a"),
        Expr::Unary {
            op: Operator::Sub,
            ..
        }
    ));
    assert!(matches!(
        parse_expr("~a"),
        Expr::Unary {
            op: Operator::BitNot,
            ..
        }
    ));
    assert!(matches!(
        parse_expr("++a"),
        Expr::Unary {
            op: Operator::Increment,
            ..
        }
    ));
}

#[test]
fn test_keyword_unary_operators() {
    assert!(matches!(
        parse_expr("sizeof x"),
        Expr::Unary {
            op: Operator::Sizeof,
            ..
        }
    ));
    assert!(matches!(
        parse_expr("ref x"),
        Expr::Unary {
            op: Operator::Address,
            ..
        }
    ));
}

#[test]
fn test_postfix_increment() {
    assert!(matches!(
        parse_expr("a ++"),
        Expr::RevUnary {
            op: Operator::Increment,
            ..
        }
    ));
}

#[test]
fn test_double_postfix_increment_is_accepted() {
    let Expr::RevUnary { value, .. } = parse_expr("a ++ ++") else {
        panic!("expected a reverse unary expression");
    };
    assert!(matches!(*value, Expr::RevUnary { .. }));
}

#[test]
fn test_subscript() {
    let Expr::Subscript {
        expression,
        arguments,
        ..
    } = parse_expr("a[1]")
    else {
        panic!("expected a subscript expression");
    };
    assert_eq!(ident_expr(&expression), "a");
    assert_eq!(arguments.len(), 1);
}

#[test]
fn test_call_with_arguments() {
    let Expr::Call {
        expression,
        arguments,
        ..
    } = parse_expr("f(1, x, \"s\")")
    else {
        panic!("expected a call expression");
    };
    assert_eq!(ident_expr(&expression), "f");
    assert_eq!(arguments.len(), 3);
}

#[test]
fn test_scoping_after_call() {
    let Expr::Scoping {
        expression,
        identifiers,
        ..
    } = parse_expr("f().a.b")
    else {
        panic!("expected a scoping expression");
    };
    assert!(matches!(*expression, Expr::Call { .. }));
    assert_eq!(identifiers, vec!["a".to_string(), "b".to_string()]);
}

#[test]
fn test_dotted_identifier_is_one_node() {
    let module = parse_ok("def f() { std.print(\"hi\"); }");
    let Stmt::Expr(Expr::Call { expression, .. }) = &module.functions[0].body[0] else {
        panic!("expected a call statement");
    };
    assert_eq!(ident_expr(expression), "std.print");
}

#[test]
fn test_parenthesized_expression_is_not_a_tuple() {
    assert!(matches!(
        parse_expr("(1)"),
        Expr::Value {
            value: Value::Integer(1),
            ..
        }
    ));
}

#[test]
fn test_tuple_list_and_dict() {
    let Expr::Tuple { elements, .. } = parse_expr("(1, 2)") else {
        panic!("expected a tuple");
    };
    assert_eq!(elements.len(), 2);

    let Expr::List { elements, .. } = parse_expr("[1, 2, 3]") else {
        panic!("expected a list");
    };
    assert_eq!(elements.len(), 3);

    let Expr::Dict { keys, items, .. } = parse_expr("{1: 2, 3: 4}") else {
        panic!("expected a dict");
    };
    assert_eq!(keys.len(), items.len());
    assert_eq!(keys.len(), 2);
}

#[test]
fn test_empty_tuple_and_list() {
    assert!(matches!(parse_expr("()"), Expr::Tuple { .. }));
    assert!(matches!(parse_expr("[]"), Expr::List { .. }));
}

#[test]
fn test_literal_values() {
    assert!(matches!(
        parse_expr("'K'"),
        Expr::Value {
            value: Value::Character('K'),
            ..
        }
    ));
    assert!(matches!(
        parse_expr("29U"),
        Expr::Value {
            value: Value::Uinteger(29),
            ..
        }
    ));
    assert!(matches!(
        parse_expr("5.6i"),
        Expr::Value {
            value: Value::Imaginary(_),
            ..
        }
    ));
    assert!(matches!(
        parse_expr("b\"hi\""),
        Expr::Value {
            value: Value::Buffer(_),
            ..
        }
    ));
}

#[test]
fn test_lambda_in_expression() {
    let module = parse_ok("def f() { callback(def (int x) { use(x); }); }");
    let Stmt::Expr(Expr::Call { arguments, .. }) = &module.functions[0].body[0] else {
        panic!("expected a call statement");
    };
    let Expr::Function(lambda) = &arguments[0] else {
        panic!("expected a lambda argument");
    };
    assert!(lambda.identifiers.is_empty());
    assert_eq!(lambda.arguments.len(), 1);
}

#[test]
fn test_generic_arguments_in_expression() {
    let Expr::Call { expression, .. } = parse_expr("make!(int)()") else {
        panic!("expected a call expression");
    };
    let Expr::Identifiers(identifiers) = &*expression else {
        panic!("expected an identifier callee");
    };
    assert_eq!(identifiers.generics.len(), 1);
}

// ============================================================
// Node indices and error metadata
// ============================================================

#[test]
fn test_node_indices_point_at_introducing_tokens() {
    let module = parse_ok("import std;\ndef main() {}");
    // `import`'s payload starts at the path token, `def`'s at its name.
    assert_eq!(module.imports[0].index, 7);
    assert_eq!(module.functions[0].index, 16);
}

#[test]
fn test_parse_error_carries_token_position() {
    let (_, errors) = parse_with_errors("def f() { a }");
    let error = errors
        .iter()
        .find(|e| e.message.contains("expected a semicolon"))
        .unwrap();
    assert_eq!(error.token.line, 1);
    assert!(error.token.column > 1);
}

#[test]
fn test_consecutive_identical_errors_are_deduplicated() {
    let (_, errors) = parse_with_errors("x .");
    let eof_errors = errors
        .iter()
        .filter(|e| e.message.contains("unexpected end of file"))
        .count();
    assert_eq!(eof_errors, 1);
}

#[test]
fn test_parse_never_aborts() {
    // A pile of junk still yields a module and a non-empty error list.
    let (module, errors) = parse_with_errors("} ) ] ; def ; class { enum");
    assert!(!errors.is_empty());
    assert!(module.variables.is_empty());
}

#[test]
fn test_into_result_aggregates_errors() {
    let lexed = kite_lexer::lex("def f() { a }");
    assert!(parse(lexed.tokens).into_result().is_err());

    let lexed = kite_lexer::lex("def f() {}");
    assert!(parse(lexed.tokens).into_result().is_ok());
}
