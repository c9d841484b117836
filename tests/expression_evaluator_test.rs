use semtree::interpreter::{BufferedContext, RuntimeError, TreeWalkInterpreter};
use semtree::lexer::Lexer;
use semtree::parser::Parser;
use semtree::tree::SemanticTree;
use semtree::value::{Value, ValueError, ValueKind};

fn evaluate(input: &str) -> Result<Value, RuntimeError> {
    let tokens = Lexer::new(input)
        .tokenize()
        .expect("Test inputs lex cleanly.");
    let mut parser = Parser::new(tokens);
    let expression = parser.parse_expression().expect("Test inputs parse.");
    let tree = SemanticTree::new();
    let mut interpreter = TreeWalkInterpreter::new(BufferedContext::new());
    interpreter.evaluate(&tree, &expression)
}

fn check(input: &str, expected: Value, test_name: &str) {
    let actual = evaluate(input).expect("Test inputs evaluate.");
    assert_eq!(actual, expected, "Failed the test {test_name}");
}

#[test]
fn smoke_test() {
    check("1", Value::Integer(1), "smoke");
}

#[test]
fn arithmetic_follows_precedence() {
    check("1 + 2 * 3", Value::Integer(7), "precedence");
    check("(1 + 2) * 3", Value::Integer(9), "grouping");
}

#[test]
fn integer_arithmetic_stays_integer() {
    check("10 / 4", Value::Integer(2), "integer_division");
    check("7 - 9", Value::Integer(-2), "subtraction");
}

#[test]
fn a_real_operand_makes_the_result_real() {
    check("1.5 + 1", Value::Real(2.5), "mixed_addition");
    check("9 / 2.0", Value::Real(4.5), "real_division");
}

#[test]
fn unary_minus_negates() {
    check("-5 + 3", Value::Integer(-2), "negate");
    check("-2.5", Value::Real(-2.5), "negate_real");
}

#[test]
fn adding_strings_concatenates() {
    check(
        "\"ab\" + \"cd\"",
        Value::String("abcd".into()),
        "concatenation",
    );
    check(
        "\"n = \" + 4",
        Value::String("n = 4".into()),
        "mixed_concatenation",
    );
}

#[test]
fn relational_operators_compare_as_reals() {
    check("1 < 2", Value::Boolean(true), "less");
    check("2 <= 1", Value::Boolean(false), "less_equal");
    check("3 > 2.5", Value::Boolean(true), "greater_mixed");
}

#[test]
fn relational_chains_fold_left() {
    // (1 < 2) is true, and true < 3 compares 1.0 against 3.0.
    check("1 < 2 < 3", Value::Boolean(true), "chained");
    check("5 < 2 < 1", Value::Boolean(true), "chained_false_head");
}

#[test]
fn equality_compares_in_one_representation() {
    check("3 == 3.0", Value::Boolean(true), "numeric_equality");
    check("1 != 2", Value::Boolean(true), "inequality");
    check("\"a\" == \"a\"", Value::Boolean(true), "string_equality");
    check("\"1\" == 1", Value::Boolean(true), "string_wins_mixed");
}

#[test]
fn logical_operators_use_boolean_conversion() {
    check("1 && 0", Value::Boolean(false), "and");
    check("0 || 1", Value::Boolean(true), "or");
    check("1 < 2 && 2 < 3", Value::Boolean(true), "combined");
}

#[test]
fn division_by_integer_zero_fails() {
    let error = evaluate("1 / 0").unwrap_err();
    assert!(matches!(error, RuntimeError::DivisionByZero));
}

#[test]
fn arithmetic_on_unparsable_text_fails() {
    let error = evaluate("\"x\" * 2").unwrap_err();
    assert!(matches!(
        error,
        RuntimeError::Value(ValueError::TypeConversion {
            from: ValueKind::String,
            to: ValueKind::Integer,
        })
    ));
}

#[test]
fn negating_text_fails() {
    let error = evaluate("-\"a\"").unwrap_err();
    assert!(matches!(
        error,
        RuntimeError::Value(ValueError::TypeConversion { .. })
    ));
}
