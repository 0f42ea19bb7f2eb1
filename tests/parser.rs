use deslang::ast::{Expr, Stmt};
use deslang::ast_printer::AstPrinter;
use deslang::error::LoxError;
use deslang::parser::{Parser, MAX_NESTING};
use deslang::scanner::Scanner;
use deslang::value::Value;

fn parse(source: &str) -> (Vec<Stmt>, Vec<String>) {
    let mut errors: Vec<LoxError> = Vec::new();
    let tokens = Scanner::new()
        .scan_tokens(source.as_bytes(), &mut errors)
        .expect("in-memory read cannot fail");
    assert!(errors.is_empty(), "lexical errors: {:?}", errors);

    let statements = Parser::new().parse(tokens, &mut errors);
    let messages = errors.iter().map(|e| e.to_string()).collect();

    (statements, messages)
}

fn printed(source: &str) -> Vec<String> {
    let (statements, errors) = parse(source);
    assert!(errors.is_empty(), "syntax errors: {:?}", errors);

    statements.iter().map(AstPrinter::print_stmt).collect()
}

#[test]
fn precedence_climbs_from_factor_to_equality() {
    assert_eq!(
        printed("1 + 2 * 3 == 7 > 1;"),
        vec!["(; (== (+ 1.0 (* 2.0 3.0)) (> 7.0 1.0)))"]
    );
}

#[test]
fn binary_levels_are_left_associative() {
    assert_eq!(printed("1 - 2 - 3;"), vec!["(; (- (- 1.0 2.0) 3.0))"]);
    assert_eq!(printed("8 / 4 / 2;"), vec!["(; (/ (/ 8.0 4.0) 2.0))"]);
}

#[test]
fn assignment_is_right_associative() {
    assert_eq!(printed("a = b = 1;"), vec!["(; (= a (= b 1.0)))"]);
}

#[test]
fn logical_operators_bind_below_equality() {
    assert_eq!(
        printed("print a or b and c == d;"),
        vec!["(print (or a (and b (== c d))))"]
    );
}

#[test]
fn unary_and_grouping() {
    assert_eq!(
        printed("print -(1 + 2) * !true;"),
        vec!["(print (* (- (group (+ 1.0 2.0))) (! true)))"]
    );
}

#[test]
fn declarations_blocks_and_conditionals() {
    assert_eq!(
        printed("var x; var y = \"s\"; { x = 1; } if (x) print x; else { print y; }"),
        vec![
            "(var x)",
            "(var y s)",
            "(block (; (= x 1.0)))",
            "(if x (print x) (block (print y)))",
        ]
    );
}

#[test]
fn missing_else_becomes_noop() {
    let (statements, errors) = parse("if (true) print 1;");

    assert!(errors.is_empty());
    match &statements[0] {
        Stmt::If { else_branch, .. } => assert_eq!(**else_branch, Stmt::NoOp),
        other => panic!("expected if statement, got {:?}", other),
    }
}

#[test]
fn var_without_initializer_has_none() {
    let (statements, _) = parse("var x;");

    match &statements[0] {
        Stmt::Var { name, initializer } => {
            assert_eq!(name.lexeme, "x");
            assert!(initializer.is_none());
        }
        other => panic!("expected var statement, got {:?}", other),
    }
}

#[test]
fn invalid_assignment_target_is_recoverable() {
    let (statements, errors) = parse("1 = 2; print 3;");

    assert_eq!(errors, vec!["[line 1] Error at '=': Invalid assignment target."]);

    // The left side stands in for the expression; later statements still parse.
    assert_eq!(statements.len(), 2);
    assert_eq!(
        statements[0],
        Stmt::Expression(Expr::Literal(Value::Number(1.0)))
    );
}

#[test]
fn errors_at_end_of_input() {
    let (_, errors) = parse("print 1");

    assert_eq!(errors, vec!["[line 1] Error at end: Expect ';' after value."]);
}

#[test]
fn synchronize_surfaces_independent_errors() {
    let (statements, errors) = parse("print ;\nvar = 2;\nprint 3;\n(1;");

    assert_eq!(
        errors,
        vec![
            "[line 1] Error at ';': Expect expression.",
            "[line 2] Error at '=': Expect variable name.",
            "[line 4] Error at ';': Expect ')' after expression.",
        ]
    );
    assert_eq!(statements.len(), 1);
    assert_eq!(AstPrinter::print_stmt(&statements[0]), "(print 3.0)");
}

#[test]
fn reserved_keywords_are_rejected() {
    let (_, errors) = parse("while (true) x;\nreturn 1;\nfun f;\nfor;");

    assert_eq!(
        errors,
        vec![
            "[line 1] Error at 'while': 'while' is reserved but not supported.",
            "[line 2] Error at 'return': 'return' is reserved but not supported.",
            "[line 3] Error at 'fun': 'fun' is reserved but not supported.",
            "[line 4] Error at 'for': 'for' is reserved but not supported.",
        ]
    );
}

#[test]
fn unclosed_block_reports_at_end() {
    let (_, errors) = parse("{ print 1;");

    assert_eq!(errors, vec!["[line 1] Error at end: Expect '}' after block."]);
}

#[test]
fn parser_is_reusable() {
    let mut errors: Vec<LoxError> = Vec::new();
    let mut scanner = Scanner::new();
    let mut parser = Parser::new();

    let bad = scanner.scan_tokens(&b"print"[..], &mut errors).unwrap();
    assert!(parser.parse(bad, &mut errors).is_empty());
    assert_eq!(errors.len(), 1);

    let good = scanner.scan_tokens(&b"print 1;"[..], &mut errors).unwrap();
    assert_eq!(parser.parse(good, &mut errors).len(), 1);
    assert_eq!(errors.len(), 1);
}

#[test]
fn statements_serialize_to_json() {
    let (statements, _) = parse("print 1;");
    let json = serde_json::to_value(&statements).unwrap();

    assert_eq!(json[0]["Print"]["Literal"]["Number"], 1.0);
}

#[test]
fn deep_nesting_is_a_syntax_error() {
    let depth = 50_000;
    let grouped = format!("print {}1{};", "(".repeat(depth), ")".repeat(depth));
    let (statements, errors) = parse(&grouped);

    assert!(statements.is_empty());
    assert_eq!(errors, vec!["[line 1] Error at '(': Too much nesting."]);

    let negated = format!("print {}1;", "-".repeat(depth));
    let (_, errors) = parse(&negated);

    assert_eq!(errors, vec!["[line 1] Error at '-': Too much nesting."]);
}

#[test]
fn nesting_below_the_limit_parses() {
    let depth = MAX_NESTING / 2;
    let (statements, errors) = parse(&format!("{}1{};", "(".repeat(depth), ")".repeat(depth)));

    assert!(errors.is_empty());
    assert_eq!(statements.len(), 1);
}
