//! Error handling
//!
//! There is a single error type, [Error].
//! Every error is tagged with either the token at which it occurred or the position at
//!     which the input ended.
//! Errors are never recovered from during a conversion:
//!     the first error aborts the whole document and is returned to the caller.

use crate::token::{Position, Token};

pub mod display;

pub type Result<T> = std::result::Result<T, Box<Error>>;

/// Where an error occurred.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Kind {
    /// The error is attached to a specific token.
    Token(Token),
    /// The input ended prematurely.
    EndOfInput(Position),
}

/// A command that was running when an error occurred.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackTraceElement {
    pub command: String,
    pub position: Position,
}

/// A parse error.
#[derive(Debug, Clone)]
pub struct Error {
    kind: Kind,
    title: String,
    notes: Vec<String>,
    stack_trace: Vec<StackTraceElement>,
    source_line: Option<String>,
}

impl Error {
    pub fn new_token_error<T: Into<String>>(token: Token, title: T) -> Box<Error> {
        Error::new(Kind::Token(token), title.into())
    }

    pub fn new_end_of_input_error<T: Into<String>>(position: Position, title: T) -> Box<Error> {
        Error::new(Kind::EndOfInput(position), title.into())
    }

    fn new(kind: Kind, title: String) -> Box<Error> {
        Box::new(Error {
            kind,
            title,
            notes: vec![],
            stack_trace: vec![],
            source_line: None,
        })
    }

    pub fn with_note<T: Into<String>>(mut self: Box<Self>, note: T) -> Box<Error> {
        self.notes.push(note.into());
        self
    }

    pub fn kind(&self) -> &Kind {
        &self.kind
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn notes(&self) -> &[String] {
        &self.notes
    }

    /// The commands that were running, innermost first.
    pub fn stack_trace(&self) -> &[StackTraceElement] {
        &self.stack_trace
    }

    pub fn position(&self) -> Position {
        match &self.kind {
            Kind::Token(token) => token.position(),
            Kind::EndOfInput(position) => *position,
        }
    }

    /// Byte range in the source that the error points at.
    pub fn span(&self) -> std::ops::Range<usize> {
        match &self.kind {
            Kind::Token(token) if !token.text().is_empty() => token.span(),
            _ => {
                let offset = self.position().offset;
                offset..offset
            }
        }
    }

    pub fn source_line(&self) -> Option<&str> {
        self.source_line.as_deref()
    }

    pub(crate) fn push_stack_trace_element(&mut self, command: &str, position: Position) {
        self.stack_trace.push(StackTraceElement {
            command: command.into(),
            position,
        });
    }

    /// Records the source line the error points at, for display.
    pub fn attach_source(&mut self, source: &str) {
        let line_number = self.position().line;
        self.source_line = source
            .split('\n')
            .nth(line_number.saturating_sub(1))
            .map(|line| line.trim_end_matches('\r').to_string());
    }

    #[cfg(feature = "ariadne")]
    pub fn ariadne_report<'a>(
        &self,
        file_name: &'a str,
    ) -> ariadne::Report<'static, (&'a str, std::ops::Range<usize>)> {
        let mut report = ariadne::Report::build(ariadne::ReportKind::Error, (file_name, self.span()))
            .with_message(&self.title);
        report = report.with_label(
            ariadne::Label::new((file_name, self.span()))
                .with_message(self.annotation())
                .with_color(ariadne::Color::BrightRed),
        );
        for element in &self.stack_trace {
            let offset = element.position.offset;
            report = report.with_label(
                ariadne::Label::new((file_name, offset..offset))
                    .with_message(format!["while running the `{}` command", element.command])
                    .with_color(ariadne::Color::BrightYellow),
            );
        }
        for note in &self.notes {
            report = report.with_note(note);
        }
        report.finish()
    }

    fn annotation(&self) -> String {
        match &self.kind {
            Kind::Token(token) if token.text().is_empty() => "here".into(),
            Kind::Token(token) => format!["the {} `{}` appears here", token.kind(), token.text()],
            Kind::EndOfInput(_) => "the input ended here".into(),
        }
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        display::format_error(f, self)
    }
}

impl std::error::Error for Error {}
