use super::{Error, Kind};
use crate::color::Colorize;

pub fn format_error(f: &mut std::fmt::Formatter<'_>, err: &Error) -> std::fmt::Result {
    let position = err.position();
    let margin_width = position.line.to_string().len() + 1;
    let printer = Printer {
        indent: margin_width,
    };
    writeln!(f, "{}: {}", "Error".bright_red().bold(), err.title().bold())?;
    printer
        .new_line()
        .with_separator('>')
        .with_content(format!["{position}"])
        .print(f)?;

    if let Some(source_line) = err.source_line() {
        printer.new_line().print(f)?;
        printer
            .new_line()
            .with_margin_content(position.line.to_string())
            .with_content(source_line)
            .print(f)?;
        let width = match err.kind() {
            Kind::Token(token) => token.text().chars().count().max(1),
            Kind::EndOfInput(_) => 1,
        };
        let padding = " ".repeat(position.column.saturating_sub(1));
        let carets = "^".repeat(width);
        printer
            .new_line()
            .with_content(format!["{padding}{}", carets.bright_red()])
            .print(f)?;
    }

    for note in err.notes() {
        printer
            .new_line()
            .with_separator('=')
            .with_content(format!["{} {note}", "note:".bold()])
            .print(f)?;
    }

    for element in err.stack_trace() {
        printer
            .new_line()
            .with_separator('=')
            .with_content(format![
                "{} `{}` ({})",
                "while running the command".yellow(),
                element.command,
                element.position,
            ])
            .print(f)?;
    }
    Ok(())
}

struct Printer {
    indent: usize,
}

struct PrintLineBuilder<'a> {
    printer: &'a Printer,
    margin_content: String,
    separator: char,
    content: String,
}

impl Printer {
    fn new_line(&self) -> PrintLineBuilder {
        PrintLineBuilder {
            printer: self,
            margin_content: "".into(),
            separator: '|',
            content: "".into(),
        }
    }
}

impl<'a> PrintLineBuilder<'a> {
    fn with_content<T: Into<String>>(mut self, content: T) -> Self {
        self.content = content.into();
        self
    }

    fn with_margin_content<T: Into<String>>(mut self, content: T) -> Self {
        self.margin_content = content.into();
        self
    }

    fn with_separator(mut self, c: char) -> Self {
        self.separator = c;
        self
    }

    fn print(self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let indent = self
            .printer
            .indent
            .saturating_sub(self.margin_content.len() + 1);
        let margin = format!["{}{} {} ", " ".repeat(indent), self.margin_content, self.separator];
        writeln!(f, "{}{}", margin.bright_cyan(), self.content)
    }
}
