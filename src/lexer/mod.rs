mod error;

pub use error::{LexicalError, LexicalErrorKind};

use crate::token::{Span, Token, TokenKind, KEYWORD_HASHMAP};
use compact_str::CompactString;
use std::iter::Peekable;
use std::ops::Range;
use std::str::CharIndices;

/// Maps byte offsets back to 1-based line numbers for diagnostics.
#[derive(Debug, Clone)]
pub struct LineBreaks {
    lines: Vec<Range<u32>>,
}

impl LineBreaks {
    pub fn new(text: &str) -> Self {
        let mut lines = Vec::new();
        let mut cursor = 0u32;
        for (offset, byte) in text.bytes().enumerate() {
            if byte == b'\n' {
                let offset = (offset + 1) as u32;
                lines.push(cursor..offset);
                cursor = offset;
            }
        }
        lines.push(cursor..(text.len() + 1) as u32);
        Self { lines }
    }

    pub fn get_line(&self, offset: u32) -> u32 {
        self.lines
            .binary_search_by(|range| {
                if offset < range.start {
                    std::cmp::Ordering::Greater
                } else if offset >= range.end {
                    std::cmp::Ordering::Less
                } else {
                    std::cmp::Ordering::Equal
                }
            })
            .map(|index| (index + 1) as u32)
            .unwrap_or(self.lines.len() as u32)
    }

    pub fn get_line_from_span(&self, span: Span) -> u32 {
        self.get_line(span.start)
    }
}

pub struct Lexer<'src> {
    source: &'src str,
    chars: Peekable<CharIndices<'src>>,
}

impl<'src> Lexer<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            chars: source.char_indices().peekable(),
        }
    }

    /// Lexes the whole source into an ordered token sequence ending in `Eof`.
    pub fn tokenize(mut self) -> Result<Vec<Token>, LexicalError> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token()?;
            let finished = token.kind == TokenKind::Eof;
            tokens.push(token);
            if finished {
                return Ok(tokens);
            }
        }
    }

    pub fn next_token(&mut self) -> Result<Token, LexicalError> {
        self.skip_trivia();
        let Some(&(start, c)) = self.chars.peek() else {
            return Ok(Token::end_of_stream(self.source.len() as u32));
        };
        let start = start as u32;
        if c.is_ascii_alphabetic() || c == '_' {
            Ok(self.lex_word(start))
        } else if c.is_ascii_digit() {
            Ok(self.lex_number(start))
        } else if c == '"' {
            self.lex_string(start)
        } else {
            self.lex_symbol(start, c)
        }
    }

    fn skip_trivia(&mut self) {
        loop {
            let Some(&(_, c)) = self.chars.peek() else {
                return;
            };
            if c.is_whitespace() {
                self.chars.next();
            } else if c == '/' && self.peek_second() == Some('/') {
                while let Some(&(_, c)) = self.chars.peek() {
                    if c == '\n' {
                        break;
                    }
                    self.chars.next();
                }
            } else {
                return;
            }
        }
    }

    fn peek_second(&self) -> Option<char> {
        let mut ahead = self.chars.clone();
        ahead.next();
        ahead.next().map(|(_, c)| c)
    }

    fn offset(&mut self) -> u32 {
        match self.chars.peek() {
            Some(&(offset, _)) => offset as u32,
            None => self.source.len() as u32,
        }
    }

    fn token(&self, kind: TokenKind, start: u32, end: u32) -> Token {
        Token {
            kind,
            text: CompactString::from(&self.source[start as usize..end as usize]),
            span: Span::new(start, end - start),
        }
    }

    fn lex_word(&mut self, start: u32) -> Token {
        while let Some(&(_, c)) = self.chars.peek() {
            if !c.is_ascii_alphanumeric() && c != '_' {
                break;
            }
            self.chars.next();
        }
        let end = self.offset();
        let lexeme = &self.source[start as usize..end as usize];
        let kind = KEYWORD_HASHMAP
            .get(lexeme)
            .copied()
            .unwrap_or(TokenKind::Ident);
        self.token(kind, start, end)
    }

    fn lex_number(&mut self, start: u32) -> Token {
        self.eat_digits();
        // A dot only belongs to the number when a digit follows it, so that
        // `5.` stays a number and a statement terminator.
        let second = self.peek_second();
        if matches!(self.chars.peek(), Some(&(_, '.')))
            && second.is_some_and(|c| c.is_ascii_digit())
        {
            self.chars.next();
            self.eat_digits();
        }
        let end = self.offset();
        self.token(TokenKind::NumericLiteral, start, end)
    }

    fn eat_digits(&mut self) {
        while let Some(&(_, c)) = self.chars.peek() {
            if !c.is_ascii_digit() {
                break;
            }
            self.chars.next();
        }
    }

    fn lex_string(&mut self, start: u32) -> Result<Token, LexicalError> {
        self.chars.next();
        loop {
            match self.chars.next() {
                Some((offset, '"')) => {
                    let end = (offset + 1) as u32;
                    return Ok(Token {
                        kind: TokenKind::StringLiteral,
                        text: CompactString::from(&self.source[start as usize + 1..offset]),
                        span: Span::new(start, end - start),
                    });
                }
                Some(_) => {}
                None => {
                    return Err(LexicalError {
                        kind: LexicalErrorKind::UnclosedString,
                        span: Span::new(start, self.source.len() as u32 - start),
                    });
                }
            }
        }
    }

    fn lex_symbol(&mut self, start: u32, c: char) -> Result<Token, LexicalError> {
        let second = self.peek_second();
        let (kind, length) = match (c, second) {
            (':', Some('=')) => (TokenKind::Assign, 2),
            (':', _) => (TokenKind::Colon, 1),
            ('=', Some('=')) => (TokenKind::EqualEqual, 2),
            ('!', Some('=')) => (TokenKind::BangEqual, 2),
            ('<', Some('=')) => (TokenKind::LessThanEqual, 2),
            ('<', _) => (TokenKind::LessThan, 1),
            ('>', Some('=')) => (TokenKind::GreaterThanEqual, 2),
            ('>', _) => (TokenKind::GreaterThan, 1),
            ('&', Some('&')) => (TokenKind::AndAnd, 2),
            ('|', Some('|')) => (TokenKind::OrOr, 2),
            ('(', _) => (TokenKind::LeftParenthesis, 1),
            (')', _) => (TokenKind::RightParenthesis, 1),
            (';', _) => (TokenKind::Semicolon, 1),
            ('.', _) => (TokenKind::Dot, 1),
            ('-', _) => (TokenKind::Minus, 1),
            ('+', _) => (TokenKind::Plus, 1),
            ('*', _) => (TokenKind::Star, 1),
            ('/', _) => (TokenKind::Slash, 1),
            _ => {
                return Err(LexicalError {
                    kind: LexicalErrorKind::Unrecognized(c),
                    span: Span::new(start, c.len_utf8() as u32),
                });
            }
        };
        self.chars.next();
        if length == 2 {
            self.chars.next();
        }
        let end = self.offset();
        Ok(self.token(kind, start, end))
    }
}
