//! Semantic analysis scenarios: valid programs and one case per diagnostic

use indoc::indoc;
use pretty_assertions::assert_eq;
use ucc_common::CompilerError;
use ucc_frontend::{
    DeclKind, ExprTypes, ExpressionKind, Frontend, FrontendConfig, Item, StatementKind,
    TranslationUnit, Type,
};

fn analyze(source: &str) -> Result<(TranslationUnit, ExprTypes), CompilerError> {
    Frontend::analyze_source(source, &FrontendConfig::default())
}

/// Message and byte offset of the first error in `source`
fn first_error(source: &str) -> (String, usize) {
    let err = analyze(source).unwrap_err();
    (err.message().to_string(), err.pos().unwrap_or_default())
}

fn error_at(message: &str, pos: usize) -> (String, usize) {
    (message.to_string(), pos)
}

#[test]
fn test_assignments_resolve_and_type_as_int() {
    let (unit, types) = analyze("int main(void){int x;int y;x=42;x=y=4711;}").unwrap();

    let Some(Item::Function(main)) = unit.items.first() else {
        panic!("expected main");
    };
    let body = main.body.as_ref().unwrap();
    let mut assignments = 0;
    for stmt in &body.statements {
        if let StatementKind::Expression(expr) = &stmt.kind {
            assert_eq!(types.get(expr), Some(&Type::INT));
            if let ExpressionKind::Binary { left, .. } = &expr.kind {
                let ExpressionKind::Identifier(ident) = &left.kind else {
                    panic!("expected a name on the left");
                };
                let decl = unit.decl(ident.decl.unwrap());
                assert_eq!(decl.kind, DeclKind::Variable);
                assert_eq!(decl.ty, Type::INT);
            }
            assignments += 1;
        }
    }
    assert_eq!(assignments, 2);
}

#[test]
fn test_quiet_programs() {
    let programs = [
        indoc! {"
            int a[10];
            int sum(int v[], int n) {
              int s;
              s = 0;
              while (n > 0) {
                n = n - 1;
                s = s + v[n];
              }
              return s;
            }
            int main(void) {
              return sum(a, 10);
            }
        "},
        // Tentative definitions followed by the real one.
        indoc! {"
            int x;
            int x;
            int x = 3;
            int x;
            int main(void) { return x; }
        "},
        // Prototype, then use, then definition.
        indoc! {"
            void put(char c);
            int main(void) { put('a'); return 0; }
            void put(char c) { }
        "},
        // Missing return is allowed in main.
        "int main(void) { int x; x = 1; }\n",
        // Both branches return.
        "int sign(int x) { if (x < 0) return 0 - 1; else if (x > 0) return 1; else return 0; }\n",
        // Sized array passed for an unsized parameter.
        "int len(char s[]) { return 0; } int main(void) { char buf[80]; return len(buf); }\n",
        // Nested functions are allowed by default.
        "int main(void) { int g(void) { return 1; } return g(); }\n",
    ];
    for program in programs {
        if let Err(err) = analyze(program) {
            panic!("{} failed: {}", program, err);
        }
    }
}

#[test]
fn test_undeclared_identifier() {
    let source = indoc! {"
        int main(void) {
          int a;
          a = 1;
          b = 1;
        }
    "};
    assert_eq!(first_error(source), error_at("undeclared identifier \"b\"", 37));

    assert_eq!(
        first_error("int main(void) { return foo(); }"),
        error_at("undeclared identifier \"foo\"", 24)
    );
}

#[test]
fn test_redefinition_with_other_type() {
    assert_eq!(
        first_error("char a;\nint a;\n"),
        error_at("redefinition of \"a\" with type \"int\" instead of \"char\"", 12)
    );
    assert_eq!(
        first_error("int a;\nvoid a(void);\n"),
        error_at("redefinition of \"a\" with type \"void(void)\" instead of \"int\"", 12)
    );
    assert_eq!(
        first_error("void f(void);\nint f(void) { return 1; }\n"),
        error_at(
            "redefinition of \"f\" with type \"int(void)\" instead of \"void(void)\"",
            18
        )
    );
    assert_eq!(
        first_error("int f(int n) { char n; return 0; }"),
        error_at("redefinition of \"n\" with type \"char\" instead of \"int\"", 20)
    );
}

#[test]
fn test_redefinition_points_at_both_definitions() {
    let err = analyze("int a = 1;\nint a = 2;\n").unwrap_err();
    assert_eq!(err.message(), "redefinition of \"a\"");
    assert_eq!(err.pos(), Some(15));
    let diagnostic = err.to_diagnostic();
    assert_eq!(diagnostic.notes.len(), 1);
    assert_eq!(diagnostic.notes[0].message, "previous definition of \"a\"");
    assert_eq!(diagnostic.notes[0].pos, 4);

    assert_eq!(
        first_error("int main(void) { int x; int x; }").0,
        "redefinition of \"x\""
    );
    assert_eq!(
        first_error("int f(int x) { int x; return x; }").0,
        "redefinition of \"x\""
    );
    assert_eq!(
        first_error("int f(void) { return 1; }\nint f(void) { return 2; }\n"),
        error_at("redefinition of \"f\"", 30)
    );
}

#[test]
fn test_return_type_mismatch() {
    assert_eq!(
        first_error("void f(void);\nint g(void) { return f(); }\n"),
        error_at(
            "returning \"void\" from a function with incompatible result type \"int\"",
            35
        )
    );
    assert_eq!(
        first_error("int f(void) { char c[1]; return c; }"),
        error_at(
            "returning \"char[1]\" from a function with incompatible result type \"int\"",
            32
        )
    );
}

#[test]
fn test_expression_diagnostics() {
    let cases = [
        (
            "int main(void) { int n; n[2]; }",
            "invalid operation: n[2] (type \"int\" does not support indexing)",
        ),
        (
            "int a(void); int main(void) { a = 1; }",
            "cannot assign to \"a\" of type \"int(void)\"",
        ),
        (
            "int main(void) { char a[10]; a = 'x'; }",
            "cannot assign to \"a\" of type \"char[10]\"",
        ),
        (
            "int main(void) { (1 + 2) = 3; }",
            "cannot assign to \"(1 + 2)\" of type \"int\"",
        ),
        (
            "int main(void) { int a; int b[10]; a = b; }",
            "cannot assign to \"a\" (type mismatch between \"int\" and \"int[10]\")",
        ),
        (
            "int a; int main(void) { a(); }",
            "cannot call non-function \"a\" of type \"int\"",
        ),
        (
            "void foo(int x); int main(void) { 1 + foo(0); }",
            "invalid operands to binary expression: 1 + foo(0) (\"int\" and \"void\")",
        ),
        (
            "char hello[5]; int main(void) { hello + 1; }",
            "invalid operation: hello + 1 (type mismatch between \"char[5]\" and \"int\")",
        ),
        (
            "int main(void) { char a[10]; if (a == 42) return 1; }",
            "invalid operation: a == 42 (type mismatch between \"char[10]\" and \"int\")",
        ),
        (
            "void v(void); int main(void) { !v(); }",
            "invalid operand to unary expression: !v() (\"void\")",
        ),
    ];
    for (source, message) in cases {
        assert_eq!(first_error(source).0, message, "{}", source);
    }
}

#[test]
fn test_call_diagnostics() {
    let source = indoc! {"
        void q(int a, int b, int c) { }
        int main(void) {
          q(1, 2);
        }
    "};
    assert_eq!(
        first_error(source),
        error_at("calling \"q\" with too few arguments; expected 3, got 2", 52)
    );
    assert_eq!(
        first_error("void d(int a, int b) { } int main(void) { d(1, 2, 3); }").0,
        "calling \"d\" with too many arguments; expected 2, got 3"
    );
    assert_eq!(
        first_error("void f(int v[]) { } int main(void) { char s[10]; f(s); }").0,
        "calling \"f\" with incompatible argument type \"char[10]\" to parameter of type \"int[]\""
    );
    assert_eq!(
        first_error("void f(int v[]) { } int main(void) { f(1); }").0,
        "calling \"f\" with incompatible argument type \"int\" to parameter of type \"int[]\""
    );
}

#[test]
fn test_declaration_diagnostics() {
    let cases = [
        ("void f(int x, void) { }", "\"void\" must be the only parameter"),
        ("int f(void x) { return 0; }", "\"x\" has invalid type \"void\""),
        ("int main(void) { void x; }", "\"x\" has invalid type \"void\""),
        ("int main(void) { void x[3]; }", "invalid element type \"void\" of array \"x\""),
        ("int f(void x[]) { return 0; }", "invalid element type \"void\" of array \"x\""),
        ("int main(void) { int y[]; }", "array size or initializer missing for \"y\""),
        ("int f(int) { return 0; }", "parameter name omitted"),
        ("int f(int x) { if (x) return 1; }", "missing return at end of non-void function \"f\""),
        ("int a[20]; int i[20]; int main(void) { return a[i]; }", "invalid array index; expected integer, got \"int[20]\""),
        ("char c = 300;", "cannot initialize \"c\" of type \"char\" with value of type \"int\""),
    ];
    for (source, message) in cases {
        assert_eq!(first_error(source).0, message, "{}", source);
    }
}

#[test]
fn test_nested_functions_switch() {
    let source = "int main(void) {\n  int g(void) { return 1; }\n  return g();\n}\n";
    analyze(source).unwrap();

    let config = FrontendConfig {
        no_nested_functions: true,
    };
    let err = Frontend::analyze_source(source, &config).unwrap_err();
    assert_eq!(err.message(), "nested functions not allowed");
    assert_eq!(err.pos(), Some(23));
}

#[test]
fn test_parse_errors_stop_before_analysis() {
    assert_eq!(
        first_error("int main(void) { return 1 }"),
        error_at("expected \";\", got \"}\"", 26)
    );
    assert_eq!(
        first_error("int main(void) { return '; }"),
        error_at("lexical error: unterminated character literal", 24)
    );
}
