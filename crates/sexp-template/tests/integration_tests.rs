/*
 * integration_tests.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * End-to-end tests for sexp-template through its public API.
 */

use pretty_assertions::assert_eq;
use serde_json::json;
use sexp_template::{
    BindingsEvaluator, CompiledTemplate, Datum, Environment, LookupError, Scope, TemplateCache,
    TemplateError, Value, compile_template, parse_template,
};
use std::sync::Arc;

type Result = std::result::Result<Datum<Value>, LookupError>;

fn sym(s: &str) -> Datum<Value> {
    Datum::symbol(s)
}

fn int(n: i64) -> Datum<Value> {
    Datum::Value(Value::Int(n))
}

fn list(items: Vec<Datum<Value>>) -> Datum<Value> {
    Datum::List(items)
}

/// Globals shared by the tests, like a module-level constant in the host.
fn test_globals() -> Scope {
    Scope::from_json(json!({"_TEST_GLOBAL": 100}))
}

fn render(source: &str, locals: &Scope) -> Result {
    compile_template(source, BindingsEvaluator).expect("template should compile")(
        &test_globals(),
        locals,
    )
}

// ============================================================================
// Substitution
// ============================================================================

#[test]
fn test_single_substitution() {
    let locals = Scope::from_json(json!({"a": 5}));
    assert_eq!(render("(x ,a)", &locals), Ok(list(vec![sym("x"), int(5)])));
}

#[test]
fn test_global_lookup() {
    assert_eq!(
        render("(x ,_TEST_GLOBAL)", &Scope::new()),
        Ok(list(vec![sym("x"), int(100)]))
    );
}

#[test]
fn test_splice_flattening() {
    let locals = Scope::from_json(json!({"b": [1, 2, 3]}));
    assert_eq!(
        render("(a ,@b c)", &locals),
        Ok(list(vec![sym("a"), int(1), int(2), int(3), sym("c")]))
    );
    assert_eq!(
        render("(x ,@b)", &locals),
        Ok(list(vec![sym("x"), int(1), int(2), int(3)]))
    );
}

#[test]
fn test_bare_unquote_evaluates_directly() {
    let locals = Scope::from_json(json!({"x": "hello"}));
    assert_eq!(
        render(",x", &locals),
        Ok(Datum::Value(Value::Str("hello".to_string())))
    );
}

#[test]
fn test_nested_holes() {
    let locals = Scope::from_json(json!({
        "name": "f",
        "args": [1, 2],
        "body": {"ret": 0}
    }));
    assert_eq!(
        render("(define (,name ,@args) (return ,body.ret))", &locals),
        Ok(list(vec![
            sym("define"),
            list(vec![Datum::Value(Value::from("f")), int(1), int(2)]),
            list(vec![sym("return"), int(0)]),
        ]))
    );
}

#[test]
fn test_host_values_are_not_flattened_by_unquote() {
    let locals = Scope::from_json(json!({"b": [1, 2]}));
    assert_eq!(
        render("(a ,b)", &locals),
        Ok(list(vec![
            sym("a"),
            Datum::Value(Value::List(vec![Value::Int(1), Value::Int(2)])),
        ]))
    );
}

// ============================================================================
// Literal templates
// ============================================================================

#[test]
fn test_literal_round_trip() {
    let cases = vec![
        ("a", sym("a")),
        ("()", list(vec![])),
        ("( ) ", list(vec![])),
        ("(())", list(vec![list(vec![])])),
        (
            "(a (b c) (d (e)))",
            list(vec![
                sym("a"),
                list(vec![sym("b"), sym("c")]),
                list(vec![sym("d"), list(vec![sym("e")])]),
            ]),
        ),
    ];
    for (source, expected) in cases {
        assert_eq!(render(source, &Scope::new()), Ok(expected), "{source:?}");
        assert!(parse_template(source).unwrap().is_literal());
    }
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn test_arity_enforcement() {
    for source in ["", "   ", "a b", "(a) (b)"] {
        assert!(
            matches!(parse_template(source), Err(TemplateError::ParseError { .. })),
            "{source:?} should be rejected"
        );
    }
}

#[test]
fn test_bare_splice_rejected() {
    assert!(matches!(
        parse_template(",@x"),
        Err(TemplateError::ParseError { .. })
    ));
    assert!(parse_template(",x").is_ok());
}

#[test]
fn test_malformed_templates() {
    for source in [")", "(a", "(a))", ",f(x", "(a ,{b)", "(1)"] {
        assert!(
            matches!(parse_template(source), Err(TemplateError::ParseError { .. })),
            "{source:?} should be rejected"
        );
    }
}

#[test]
fn test_undefined_name_propagates() {
    assert_eq!(
        render("(a ,missing)", &Scope::new()),
        Err(LookupError::Undefined {
            name: "missing".to_string()
        })
    );
}

#[test]
fn test_splice_of_non_list_propagates() {
    let locals = Scope::from_json(json!({"n": 3}));
    assert_eq!(
        render("(a ,@n)", &locals),
        Err(LookupError::NotIterable { found: "int" })
    );
}

// ============================================================================
// Reuse and concurrency
// ============================================================================

#[test]
fn test_template_reused_across_environments() {
    let template = Arc::new(parse_template("(point ,x ,y)").unwrap());
    let compiled = CompiledTemplate::new(Arc::clone(&template), BindingsEvaluator);
    let globals = Scope::new();

    for (x, y) in [(0i64, 0i64), (1, 2), (-5, 7)] {
        let locals: Scope = [("x", x), ("y", y)].into_iter().collect();
        assert_eq!(
            compiled.call(&globals, &locals),
            Ok(list(vec![sym("point"), int(x), int(y)]))
        );
    }
    assert_eq!(compiled.template(), template.as_ref());
}

#[test]
fn test_concurrent_evaluation() {
    let cache = TemplateCache::new();
    let template = cache.get_or_compile("(n ,n ,@rest)").unwrap();
    let globals = Scope::new();

    std::thread::scope(|scope| {
        for n in 0..8i64 {
            let template = Arc::clone(&template);
            let globals = &globals;
            scope.spawn(move || {
                let locals = Scope::from_json(json!({"n": n, "rest": [n, n]}));
                let result =
                    template.evaluate(&BindingsEvaluator, Environment::new(globals, &locals));
                assert_eq!(
                    result,
                    Ok(list(vec![sym("n"), int(n), int(n), int(n)]))
                );
            });
        }
    });
}
