use deslang::session::{Outcome, Session};

/// Runs each chunk as one invocation on a single session and returns the
/// outcomes plus everything written to the sink.
fn run_all(chunks: &[&str]) -> (Vec<Outcome>, String) {
    let mut session = Session::new(Vec::new());

    let outcomes = chunks
        .iter()
        .map(|src| session.run(src.as_bytes()).expect("in-memory I/O"))
        .collect();

    let output = String::from_utf8(session.into_output()).expect("utf-8 output");
    (outcomes, output)
}

fn run(src: &str) -> (Outcome, String) {
    let (outcomes, output) = run_all(&[src]);
    (outcomes[0], output)
}

#[test]
fn concatenates_strings() {
    assert_eq!(
        run("print \"a\" + \"b\";"),
        (Outcome::Completed, "ab\n".into())
    );
}

#[test]
fn division_by_zero_is_infinity() {
    assert_eq!(run("print 1/0;"), (Outcome::Completed, "inf\n".into()));
    assert_eq!(run("print -1/0;"), (Outcome::Completed, "-inf\n".into()));
}

#[test]
fn arithmetic_and_comparison() {
    let (outcome, output) = run("print 1 + 2 * 3; print 7 / 2; print 2 >= 2; print 1 < 0;");

    assert_eq!(outcome, Outcome::Completed);
    assert_eq!(output, "7\n3.5\ntrue\nfalse\n");
}

#[test]
fn reassignment() {
    assert_eq!(
        run("var x = 1; x = 2; print x;"),
        (Outcome::Completed, "2\n".into())
    );
}

#[test]
fn assignment_is_an_expression() {
    assert_eq!(
        run("var a; var b; a = b = 3; print a + b;"),
        (Outcome::Completed, "6\n".into())
    );
}

#[test]
fn else_branch_runs_on_falsy_condition() {
    assert_eq!(
        run("if (false) print 1; else print 2;"),
        (Outcome::Completed, "2\n".into())
    );
    assert_eq!(run("if (0) print 1;"), (Outcome::Completed, String::new()));
    assert_eq!(
        run("if (\"\") print 1; else print \"empty\";"),
        (Outcome::Completed, "empty\n".into())
    );
}

#[test]
fn uninitialized_variable_is_nil() {
    assert_eq!(
        run("var x; print x; print !x;"),
        (Outcome::Completed, "nil\ntrue\n".into())
    );
}

#[test]
fn undefined_variable_is_a_runtime_error() {
    assert_eq!(
        run("print y;"),
        (Outcome::RuntimeError, "Undefined variable 'y'.\n".into())
    );
}

#[test]
fn assignment_to_undeclared_is_a_runtime_error() {
    assert_eq!(
        run("y = 1;"),
        (Outcome::RuntimeError, "Undefined variable 'y'.\n".into())
    );
}

#[test]
fn runtime_error_keeps_earlier_output_and_skips_the_rest() {
    assert_eq!(
        run("print 1; print 1 + \"a\"; print 2;"),
        (
            Outcome::RuntimeError,
            "1\nInvalid operation. Mismatched types number and string.\n".into()
        )
    );
}

#[test]
fn unterminated_string_executes_nothing() {
    assert_eq!(
        run("print 1;\n\"abc"),
        (
            Outcome::CompileError,
            "[line 2] Error : Unterminated string\n".into()
        )
    );
}

#[test]
fn lexical_errors_are_all_reported() {
    assert_eq!(
        run("print 1 $;\nprint #2;"),
        (
            Outcome::CompileError,
            "[line 1] Error : Unexpected character\n[line 2] Error : Unexpected character\n"
                .into()
        )
    );
}

#[test]
fn block_shadowing_is_local() {
    assert_eq!(
        run("var x=1; { var x=2; print x; } print x;"),
        (Outcome::Completed, "2\n1\n".into())
    );
}

#[test]
fn block_assignment_reaches_outer_frame() {
    assert_eq!(
        run("var x = 1; { { x = x + 1; } } print x;"),
        (Outcome::Completed, "2\n".into())
    );
}

#[test]
fn block_locals_are_gone_after_the_block() {
    assert_eq!(
        run("{ var inner = 1; } print inner;"),
        (Outcome::RuntimeError, "Undefined variable 'inner'.\n".into())
    );
}

#[test]
fn invalid_assignment_target_executes_nothing() {
    assert_eq!(
        run("print 0; 1 = 2;"),
        (
            Outcome::CompileError,
            "[line 1] Error at '=': Invalid assignment target.\n".into()
        )
    );
}

#[test]
fn logical_operators_short_circuit() {
    let (outcome, output) = run("print nope or 1;");
    assert_eq!(outcome, Outcome::RuntimeError);
    assert_eq!(output, "Undefined variable 'nope'.\n");

    assert_eq!(
        run("print 1 or nope; print false and nope; print \"\" or \"x\"; print 1 and 2;"),
        (Outcome::Completed, "1\nfalse\nx\n2\n".into())
    );
}

#[test]
fn equality_compares_kind_and_payload() {
    assert_eq!(
        run("print 1 == 1; print \"1\" == 1; print true != false; print \"a\" == \"a\";"),
        (Outcome::Completed, "true\nfalse\ntrue\ntrue\n".into())
    );
}

#[test]
fn arithmetic_requires_numbers() {
    assert_eq!(
        run("print \"a\" - \"b\";"),
        (
            Outcome::RuntimeError,
            "Invalid operation. Operator '-' does not apply to string operands.\n".into()
        )
    );
    assert_eq!(
        run("print -true;"),
        (
            Outcome::RuntimeError,
            "Invalid operation. Operator '-' does not apply to a boolean operand.\n".into()
        )
    );
}

#[test]
fn bindings_persist_across_invocations() {
    let (outcomes, output) = run_all(&["var x = 1;", "x = x + 1;", "print x;"]);

    assert_eq!(outcomes, vec![Outcome::Completed; 3]);
    assert_eq!(output, "2\n");
}

#[test]
fn session_survives_errors() {
    let (outcomes, output) = run_all(&[
        "var x = 10;",
        "{ var x = 1; print nope; }",
        "print (;",
        "print x;",
    ]);

    assert_eq!(
        outcomes,
        vec![
            Outcome::Completed,
            Outcome::RuntimeError,
            Outcome::CompileError,
            Outcome::Completed,
        ]
    );
    assert_eq!(
        output,
        "Undefined variable 'nope'.\n[line 1] Error at ';': Expect expression.\n10\n"
    );
}

#[test]
fn rerunning_on_a_fresh_session_is_deterministic() {
    let program = "var a = \"x\";\nvar b = 2;\n{ var a = a + \"y\"; print a; }\nif (b > 1) print b * 2; else print 0;\n";

    assert_eq!(run(program), run(program));
    assert_eq!(run(program).1, "xy\n4\n");
}

#[test]
fn expression_statements_print_nothing() {
    assert_eq!(run("1 + 2; \"s\";"), (Outcome::Completed, String::new()));
}

#[test]
fn non_utf8_input_does_not_end_the_session() {
    let mut session = Session::new(Vec::new());
    let lines: [&[u8]; 4] = [
        b"var x = 1;\n",
        b"print \"\xe9\";\n",
        b"print 2; \xff\n",
        b"print x;\n",
    ];

    let outcomes: Vec<Outcome> = lines
        .iter()
        .map(|line| session.run(*line).expect("in-memory I/O"))
        .collect();

    assert_eq!(
        outcomes,
        vec![
            Outcome::Completed,
            Outcome::Completed,
            Outcome::CompileError,
            Outcome::Completed,
        ]
    );
    assert_eq!(
        String::from_utf8(session.into_output()).expect("utf-8 output"),
        "\u{FFFD}\n[line 1] Error : Unexpected character\n1\n"
    );
}

#[test]
fn nested_groupings_evaluate() {
    let program = format!("print -{}1 + 1{};", "(".repeat(60), ")".repeat(60));

    assert_eq!(run(&program), (Outcome::Completed, "-2\n".into()));
}
