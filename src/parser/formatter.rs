use super::ParserError;
use crate::lexer::{LexicalError, LineBreaks};
use ariadne::{Color, Label, Report, ReportKind, Source};
use std::path::Path;

const ARIADNE_MSG: &str = "Ariadne produces valid utf-8 strings";
const ARIADNE_WRITE_MSG: &str = "Write into buffer should not fail.";

pub trait ParserFormatter {
    fn format_error(&self, error: &ParserError) -> String;
    fn format_lexical_error(&self, error: &LexicalError) -> String;
}

pub struct BasicFormatter {
    line_breaks: LineBreaks,
}

impl BasicFormatter {
    pub fn new(text: &str) -> Self {
        Self {
            line_breaks: LineBreaks::new(text),
        }
    }
}

impl ParserFormatter for BasicFormatter {
    fn format_error(&self, error: &ParserError) -> String {
        let line = self.line_breaks.get_line_from_span(error.span);
        format!("[line {line}] {error}")
    }

    fn format_lexical_error(&self, error: &LexicalError) -> String {
        let line = self.line_breaks.get_line_from_span(error.span);
        format!("[line {line}] {error}")
    }
}

pub struct PrettyFormatter<'src> {
    text: &'src str,
    path: &'src Path,
}

impl<'src> PrettyFormatter<'src> {
    pub fn new(text: &'src str, path: &'src Path) -> Self {
        Self { text, path }
    }
}

impl<'src> ParserFormatter for PrettyFormatter<'src> {
    fn format_error(&self, error: &ParserError) -> String {
        let path = self
            .path
            .to_str()
            .expect("Non-UTF8 paths are not supported!");
        let mut output = std::io::Cursor::new(Vec::new());
        let span = error.span;
        Report::build(ReportKind::Error, (path, span.range()))
            .with_code(error.code())
            .with_message("Failed to parse the token stream")
            .with_label(
                Label::new((path, span.range()))
                    .with_message(format!("{}", error.kind))
                    .with_color(Color::BrightRed),
            )
            .finish()
            .write((path, Source::from(self.text)), &mut output)
            .expect(ARIADNE_WRITE_MSG);
        String::from_utf8(output.into_inner()).expect(ARIADNE_MSG)
    }

    fn format_lexical_error(&self, error: &LexicalError) -> String {
        let path = self
            .path
            .to_str()
            .expect("Non-UTF8 paths are not supported!");
        let mut output = std::io::Cursor::new(Vec::new());
        let span = error.span;
        Report::build(ReportKind::Error, (path, span.range()))
            .with_code("LX001")
            .with_message("Failed to lex the source")
            .with_label(
                Label::new((path, span.range()))
                    .with_message(format!("{}", error.kind))
                    .with_color(Color::BrightRed),
            )
            .finish()
            .write((path, Source::from(self.text)), &mut output)
            .expect(ARIADNE_WRITE_MSG);
        String::from_utf8(output.into_inner()).expect(ARIADNE_MSG)
    }
}
