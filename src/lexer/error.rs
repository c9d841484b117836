use crate::token::Span;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum LexicalErrorKind {
    #[error("Unrecognized character {0:?}")]
    Unrecognized(char),
    #[error("Unterminated string literal")]
    UnclosedString,
}

#[derive(Debug, Error, Clone, PartialEq)]
#[error("{kind}")]
pub struct LexicalError {
    pub kind: LexicalErrorKind,
    pub span: Span,
}
