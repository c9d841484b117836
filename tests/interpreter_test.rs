use semtree::interpreter::{BufferedContext, RuntimeError, TreeWalkInterpreter};
use semtree::lexer::Lexer;
use semtree::parser::Parser;
use semtree::symbol::SymbolError;
use semtree::tree::SemanticTree;
use semtree::value::ValueError;

fn parse(input: &str) -> SemanticTree {
    let tokens = Lexer::new(input)
        .tokenize()
        .expect("Test inputs lex cleanly.");
    Parser::new(tokens).parse().expect("Test inputs parse.")
}

fn run(input: &str) -> String {
    let tree = parse(input);
    let mut interpreter = TreeWalkInterpreter::new(BufferedContext::new());
    interpreter.run(&tree).expect("Test programs run cleanly.");
    interpreter.into_context().into_data()
}

fn run_with_input(input: &str, lines: &[&str]) -> String {
    let tree = parse(input);
    let mut interpreter = TreeWalkInterpreter::new(BufferedContext::with_input(lines));
    interpreter.run(&tree).expect("Test programs run cleanly.");
    interpreter.into_context().into_data()
}

fn run_error(input: &str) -> RuntimeError {
    let tree = parse(input);
    let mut interpreter = TreeWalkInterpreter::new(BufferedContext::new());
    interpreter
        .run(&tree)
        .expect_err("The program should fail.")
}

#[test]
fn outputs_the_bound_value() {
    let output = run(
        "module m.\n\
         variable -integer x;\n\
         begin\n\
             let x := 5;\n\
             output x;\n\
         end.",
    );
    assert_eq!(output, "5\n");
}

#[test]
fn declarations_with_initializers_bind_eagerly() {
    let output = run(
        "module m.\n\
         variable -integer x := 2 + 3;\n\
         begin\n\
             output x * x;\n\
         end.",
    );
    assert_eq!(output, "25\n");
}

#[test]
fn an_unbound_variable_cannot_be_read() {
    let error = run_error(
        "module m.\n\
         variable -integer x;\n\
         begin\n\
             output x;\n\
         end.",
    );
    assert!(matches!(error, RuntimeError::Unbound(name) if name == "x"));
}

#[test]
fn let_rebinds_an_existing_name_only() {
    let error = run_error(
        "module m.\n\
         begin\n\
             let ghost := 1;\n\
         end.",
    );
    assert!(matches!(
        error,
        RuntimeError::Symbol(SymbolError::Undefined(name)) if name == "ghost"
    ));
}

#[test]
fn a_while_loop_runs_its_body_while_the_guard_holds() {
    // Guard x < 3 starting from 0 runs the body exactly 3 times.
    let output = run(
        "module m.\n\
         variable -integer x := 0;\n\
         begin\n\
             while x < 3 then\n\
                 let x := x + 1;\n\
                 output x;\n\
             end while.\n\
             output \"done\";\n\
         end.",
    );
    assert_eq!(output, "1\n2\n3\ndone\n");
}

#[test]
fn a_false_guard_skips_the_loop_entirely() {
    let output = run(
        "module m.\n\
         variable -integer x := 5;\n\
         begin\n\
             while x < 3 then\n\
                 output \"never\";\n\
             end while.\n\
             output x;\n\
         end.",
    );
    assert_eq!(output, "5\n");
}

#[test]
fn the_first_truthy_branch_wins() {
    let source = |x: i32| {
        format!(
            "module m.\n\
             variable -integer x := {x};\n\
             begin\n\
                 if x == 1 then\n\
                     output \"one\";\n\
                 else if x == 2 then\n\
                     output \"two\";\n\
                 else\n\
                     output \"many\";\n\
                 end if.\n\
             end.",
        )
    };
    assert_eq!(run(&source(1)), "one\n");
    assert_eq!(run(&source(2)), "two\n");
    assert_eq!(run(&source(9)), "many\n");
}

#[test]
fn an_if_without_else_may_match_nothing() {
    let output = run(
        "module m.\n\
         variable -integer x := 0;\n\
         begin\n\
             if x == 1 then\n\
                 output \"one\";\n\
             end if.\n\
             output \"after\";\n\
         end.",
    );
    assert_eq!(output, "after\n");
}

#[test]
fn input_converts_to_the_declared_type() {
    let output = run_with_input(
        "module m.\n\
         variable -integer x;\n\
         begin\n\
             input x;\n\
             output x * 2;\n\
         end.",
        &["21"],
    );
    assert_eq!(output, "42\n");
}

#[test]
fn input_of_unconvertible_text_fails() {
    let tree = parse(
        "module m.\n\
         variable -integer x;\n\
         begin\n\
             input x;\n\
         end.",
    );
    let mut interpreter = TreeWalkInterpreter::new(BufferedContext::with_input(&["abc"]));
    let error = interpreter.run(&tree).expect_err("The input does not fit.");
    assert!(matches!(
        error,
        RuntimeError::Value(ValueError::TypeConversion { .. })
    ));
}

#[test]
fn input_from_an_exhausted_source_fails() {
    let error = run_error(
        "module m.\n\
         variable -integer x;\n\
         begin\n\
             input x;\n\
         end.",
    );
    assert!(matches!(error, RuntimeError::InputExhausted));
}

#[test]
fn functions_return_values_to_their_callers() {
    let output = run(
        "module m.\n\
         variable -integer x := 41;\n\
         function bump: integer\n\
             return x + 1;\n\
         end function.\n\
         begin\n\
             output bump();\n\
         end.",
    );
    assert_eq!(output, "42\n");
}

#[test]
fn functions_use_their_own_frame_for_locals() {
    let output = run(
        "module m.\n\
         function helper: integer\n\
             variable -integer local := 7;\n\
             return local * 6;\n\
         end function.\n\
         begin\n\
             output helper();\n\
         end.",
    );
    assert_eq!(output, "42\n");
}

#[test]
fn recursive_calls_get_fresh_activations() {
    let output = run(
        "module m.\n\
         variable -integer n := 3;\n\
         function countdown: integer\n\
             if n <= 0 then\n\
                 return 0;\n\
             end if.\n\
             output n;\n\
             let n := n - 1;\n\
             return countdown();\n\
         end function.\n\
         begin\n\
             output countdown();\n\
         end.",
    );
    assert_eq!(output, "3\n2\n1\n0\n");
}

#[test]
fn class_methods_are_callable() {
    let output = run(
        "module m.\n\
         class circle.\n\
             function tau: real\n\
                 return 6.28;\n\
             end function.\n\
         end class.\n\
         begin\n\
             output tau();\n\
         end.",
    );
    assert_eq!(output, "6.28\n");
}

#[test]
fn calling_an_unknown_function_fails() {
    let error = run_error(
        "module m.\n\
         begin\n\
             output nope();\n\
         end.",
    );
    assert!(matches!(
        error,
        RuntimeError::Symbol(SymbolError::Undefined(name)) if name == "nope"
    ));
}

#[test]
fn a_function_with_a_return_type_must_return() {
    let error = run_error(
        "module m.\n\
         function silent: integer\n\
             output 1;\n\
         end function.\n\
         begin\n\
             output silent();\n\
         end.",
    );
    assert!(matches!(error, RuntimeError::MissingReturn(name) if name == "silent"));
}

#[test]
fn a_failing_function_body_surfaces_with_its_cause_and_tears_down() {
    let tree = parse(
        "module m.\n\
         variable -string s := \"oops\";\n\
         function boom: integer\n\
             variable -integer y := s * 2;\n\
             return y;\n\
         end function.\n\
         begin\n\
             output boom();\n\
         end.",
    );
    let mut interpreter = TreeWalkInterpreter::new(BufferedContext::new());
    let error = interpreter.run(&tree).expect_err("The body fails.");

    match error {
        RuntimeError::Execution { name, cause } => {
            assert_eq!(name, "boom");
            assert!(matches!(
                *cause,
                RuntimeError::Value(ValueError::TypeConversion { .. })
            ));
        }
        other => panic!("Expected an execution failure but got {other:?}"),
    }

    // Scope teardown happened despite the failure: every activation frame
    // is gone, only the global frame remains.
    assert_eq!(interpreter.scopes().depth(), 1);
    assert!(!interpreter.scopes().exists("y"));
    assert!(!interpreter.scopes().exists("s"));
}

#[test]
fn output_renders_every_value_kind() {
    let output = run(
        "module m.\n\
         begin\n\
             output 7;\n\
             output 2.5;\n\
             output \"text\";\n\
             output 1 == 1;\n\
         end.",
    );
    assert_eq!(output, "7\n2.5\ntext\ntrue\n");
}
