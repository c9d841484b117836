use compact_str::CompactString;
use std::collections::HashMap;
use std::fmt::Display;
use std::ops::Range;
use std::sync::LazyLock;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Span {
    /// The byte position of the start of the token.
    pub start: u32,
    /// The length of the token in bytes.
    pub length: u32,
}

impl Span {
    pub const fn new(start: u32, length: u32) -> Self {
        Self { start, length }
    }

    pub const fn empty() -> Self {
        Self {
            start: 0,
            length: 0,
        }
    }

    pub fn range(&self) -> Range<usize> {
        self.start as usize..(self.start + self.length) as usize
    }
}

/// The hashmap for keywords
pub static KEYWORD_HASHMAP: LazyLock<HashMap<&'static str, TokenKind>> = LazyLock::new(|| {
    let mut map = HashMap::new();
    map.insert("module", TokenKind::KeywordModule);
    map.insert("begin", TokenKind::KeywordBegin);
    map.insert("end", TokenKind::KeywordEnd);
    map.insert("while", TokenKind::KeywordWhile);
    map.insert("if", TokenKind::KeywordIf);
    map.insert("else", TokenKind::KeywordElse);
    map.insert("then", TokenKind::KeywordThen);
    map.insert("variable", TokenKind::KeywordVariable);
    map.insert("let", TokenKind::KeywordLet);
    map.insert("input", TokenKind::KeywordInput);
    map.insert("output", TokenKind::KeywordOutput);
    map.insert("function", TokenKind::KeywordFunction);
    map.insert("return", TokenKind::KeywordReturn);
    map.insert("class", TokenKind::KeywordClass);
    map
});

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum TokenKind {
    // Parentheses
    LeftParenthesis,
    RightParenthesis,
    // Punctuation
    Semicolon,
    Colon,
    Dot,
    // Arithmetic operators
    Minus,
    Plus,
    Star,
    Slash,
    // Assignment
    Assign,
    // Comparison operators
    EqualEqual,
    BangEqual,
    LessThan,
    LessThanEqual,
    GreaterThan,
    GreaterThanEqual,
    // Logical operators
    AndAnd,
    OrOr,

    // Literals
    NumericLiteral,
    StringLiteral,
    Ident,

    // Keywords
    KeywordModule,
    KeywordBegin,
    KeywordEnd,
    KeywordWhile,
    KeywordIf,
    KeywordElse,
    KeywordThen,
    KeywordVariable,
    KeywordLet,
    KeywordInput,
    KeywordOutput,
    KeywordFunction,
    KeywordReturn,
    KeywordClass,

    // End of the token stream.
    Eof,
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenKind::LeftParenthesis => write!(f, "LEFT_PAREN"),
            TokenKind::RightParenthesis => write!(f, "RIGHT_PAREN"),
            TokenKind::Semicolon => write!(f, "SEMICOLON"),
            TokenKind::Colon => write!(f, "COLON"),
            TokenKind::Dot => write!(f, "DOT"),
            TokenKind::Minus => write!(f, "MINUS"),
            TokenKind::Plus => write!(f, "PLUS"),
            TokenKind::Star => write!(f, "STAR"),
            TokenKind::Slash => write!(f, "SLASH"),
            TokenKind::Assign => write!(f, "ASSIGN"),
            TokenKind::EqualEqual => write!(f, "EQUAL_EQUAL"),
            TokenKind::BangEqual => write!(f, "BANG_EQUAL"),
            TokenKind::LessThan => write!(f, "LESS"),
            TokenKind::LessThanEqual => write!(f, "LESS_EQUAL"),
            TokenKind::GreaterThan => write!(f, "GREATER"),
            TokenKind::GreaterThanEqual => write!(f, "GREATER_EQUAL"),
            TokenKind::AndAnd => write!(f, "AND_AND"),
            TokenKind::OrOr => write!(f, "OR_OR"),
            TokenKind::NumericLiteral => write!(f, "NUMBER"),
            TokenKind::StringLiteral => write!(f, "STRING"),
            TokenKind::Ident => write!(f, "IDENTIFIER"),
            TokenKind::KeywordModule => write!(f, "MODULE"),
            TokenKind::KeywordBegin => write!(f, "BEGIN"),
            TokenKind::KeywordEnd => write!(f, "END"),
            TokenKind::KeywordWhile => write!(f, "WHILE"),
            TokenKind::KeywordIf => write!(f, "IF"),
            TokenKind::KeywordElse => write!(f, "ELSE"),
            TokenKind::KeywordThen => write!(f, "THEN"),
            TokenKind::KeywordVariable => write!(f, "VARIABLE"),
            TokenKind::KeywordLet => write!(f, "LET"),
            TokenKind::KeywordInput => write!(f, "INPUT"),
            TokenKind::KeywordOutput => write!(f, "OUTPUT"),
            TokenKind::KeywordFunction => write!(f, "FUNCTION"),
            TokenKind::KeywordReturn => write!(f, "RETURN"),
            TokenKind::KeywordClass => write!(f, "CLASS"),
            TokenKind::Eof => write!(f, "EOF"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: CompactString,
    pub span: Span,
}

impl Token {
    pub fn end_of_stream(offset: u32) -> Self {
        Self {
            kind: TokenKind::Eof,
            text: CompactString::default(),
            span: Span::new(offset, 0),
        }
    }
}
