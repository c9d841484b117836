use proptest::prelude::*;
use semtree::lexer::{Lexer, LexicalErrorKind};
use semtree::token::{Token, TokenKind, KEYWORD_HASHMAP};

fn kinds(input: &str) -> Vec<TokenKind> {
    Lexer::new(input)
        .tokenize()
        .expect("Test inputs lex cleanly.")
        .into_iter()
        .map(|token| token.kind)
        .collect()
}

#[test]
fn lexes_a_small_program() {
    let input = "module m.\nvariable -integer x := 5;\nbegin\n    output x;\nend.";
    let expected = vec![
        TokenKind::KeywordModule,
        TokenKind::Ident,
        TokenKind::Dot,
        TokenKind::KeywordVariable,
        TokenKind::Minus,
        TokenKind::Ident,
        TokenKind::Ident,
        TokenKind::Assign,
        TokenKind::NumericLiteral,
        TokenKind::Semicolon,
        TokenKind::KeywordBegin,
        TokenKind::KeywordOutput,
        TokenKind::Ident,
        TokenKind::Semicolon,
        TokenKind::KeywordEnd,
        TokenKind::Dot,
        TokenKind::Eof,
    ];
    assert_eq!(kinds(input), expected);
}

#[test]
fn lexes_operators() {
    let input = ":= : == != < <= > >= && || + - * / ( ) ; .";
    let expected = vec![
        TokenKind::Assign,
        TokenKind::Colon,
        TokenKind::EqualEqual,
        TokenKind::BangEqual,
        TokenKind::LessThan,
        TokenKind::LessThanEqual,
        TokenKind::GreaterThan,
        TokenKind::GreaterThanEqual,
        TokenKind::AndAnd,
        TokenKind::OrOr,
        TokenKind::Plus,
        TokenKind::Minus,
        TokenKind::Star,
        TokenKind::Slash,
        TokenKind::LeftParenthesis,
        TokenKind::RightParenthesis,
        TokenKind::Semicolon,
        TokenKind::Dot,
        TokenKind::Eof,
    ];
    assert_eq!(kinds(input), expected);
}

#[test]
fn a_dot_without_a_following_digit_terminates_a_number() {
    assert_eq!(
        kinds("5."),
        vec![TokenKind::NumericLiteral, TokenKind::Dot, TokenKind::Eof]
    );
    assert_eq!(kinds("5.25"), vec![TokenKind::NumericLiteral, TokenKind::Eof]);
}

#[test]
fn string_literal_text_excludes_the_quotes() {
    let tokens = Lexer::new("\"hello\"").tokenize().expect("Lexes cleanly.");
    assert_eq!(tokens[0].kind, TokenKind::StringLiteral);
    assert_eq!(tokens[0].text, "hello");
}

#[test]
fn comments_run_to_the_end_of_the_line() {
    let input = "output 1; // trailing words\noutput 2;";
    let expected = vec![
        TokenKind::KeywordOutput,
        TokenKind::NumericLiteral,
        TokenKind::Semicolon,
        TokenKind::KeywordOutput,
        TokenKind::NumericLiteral,
        TokenKind::Semicolon,
        TokenKind::Eof,
    ];
    assert_eq!(kinds(input), expected);
}

#[test]
fn unterminated_string_is_a_lexical_error() {
    let error = Lexer::new("\"oops").tokenize().unwrap_err();
    assert_eq!(error.kind, LexicalErrorKind::UnclosedString);
}

#[test]
fn unrecognized_character_is_a_lexical_error() {
    let error = Lexer::new("output @;").tokenize().unwrap_err();
    assert_eq!(error.kind, LexicalErrorKind::Unrecognized('@'));
}

#[test]
fn keywords_are_recognized() {
    for (keyword, kind) in KEYWORD_HASHMAP.iter() {
        let tokens = Lexer::new(keyword).tokenize().expect("Lexes cleanly.");
        assert_eq!(tokens[0].kind, *kind, "Failed on keyword {keyword}");
    }
}

fn symbol_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(":=".to_string()),
        Just("==".to_string()),
        Just("!=".to_string()),
        Just("<".to_string()),
        Just("<=".to_string()),
        Just(">".to_string()),
        Just(">=".to_string()),
        Just("&&".to_string()),
        Just("||".to_string()),
        Just("+".to_string()),
        Just("-".to_string()),
        Just("*".to_string()),
        Just("/".to_string()),
        Just("(".to_string()),
        Just(")".to_string()),
        Just(";".to_string()),
        Just(".".to_string()),
        Just(":".to_string()),
    ]
}

fn numeric_literal_strategy() -> impl Strategy<Value = String> {
    "[0-9]{1,7}(\\.[0-9]{1,4})?"
}

fn string_literal_strategy() -> impl Strategy<Value = String> {
    "\"[a-zA-Z0-9 ]{0,10}\""
}

fn identifier_strategy() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{0,10}"
}

fn keyword_strategy() -> impl Strategy<Value = String> {
    prop::sample::select(KEYWORD_HASHMAP.keys().copied().collect::<Vec<_>>())
        .prop_map(|keyword| keyword.to_string())
}

fn comment_strategy() -> impl Strategy<Value = String> {
    "//[a-z ]{0,10}"
}

fn token_sequence_strategy() -> impl Strategy<Value = Vec<String>> {
    const MIN_TOKEN_COUNT: usize = 1;
    const MAX_TOKEN_COUNT: usize = 100;
    prop::collection::vec(
        prop_oneof![
            symbol_strategy(),
            numeric_literal_strategy(),
            string_literal_strategy(),
            identifier_strategy(),
            keyword_strategy(),
        ],
        MIN_TOKEN_COUNT..MAX_TOKEN_COUNT,
    )
}

fn token_sequence_with_comments_strategy() -> impl Strategy<Value = String> {
    const MIN_TOKEN_COUNT: usize = 1;
    const MAX_TOKEN_COUNT: usize = 100;
    prop::collection::vec(
        prop_oneof![
            symbol_strategy(),
            numeric_literal_strategy(),
            string_literal_strategy(),
            identifier_strategy(),
            keyword_strategy(),
            comment_strategy(),
        ],
        MIN_TOKEN_COUNT..MAX_TOKEN_COUNT,
    )
    .prop_map(|tokens| tokens.join(" "))
}

proptest! {
    #[test]
    fn lexer_handles_valid_token_sequences(input in token_sequence_strategy()) {
        // Add 1 to include the EOF token
        let expected_num_tokens = input.len() + 1;
        let input = input.join(" ");
        let tokens = Lexer::new(&input).tokenize();
        prop_assert!(tokens.is_ok());
        prop_assert_eq!(tokens.unwrap().len(), expected_num_tokens);
    }

    #[test]
    fn lexer_handles_valid_tokens_with_comments(input in token_sequence_with_comments_strategy()) {
        let mut scanner = Lexer::new(&input);
        loop {
            match scanner.next_token() {
                Ok(Token { kind: TokenKind::Eof, .. }) => {
                    break;
                }
                token => {
                    prop_assert!(token.is_ok());
                }
            }
        }
    }
}
