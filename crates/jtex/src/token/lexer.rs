//! The JTeX lexer, which reads a string of characters and outputs JTeX tokens.
//!
//! The lexer is a single pass state machine.
//! Each call to [Lexer::next] looks at the current character and dispatches to the
//! state that recognizes tokens starting with that character.
//! Multi-character operators (`=>`, `<=`, `<=>`, `--`, `//`, `...`, `:=`, `=:`) are
//! recognized by consuming one character at a time and deciding on the next state,
//! so a token is never re-scanned.
//!
//! Whitespace is coalesced into a single token before any other state runs.
//! As a result a partially recognized operator is never interrupted by whitespace:
//!     `- -` is two dashes, not an escape sequence.
//!
//! The lexer never fails.
//! Characters it does not recognize become single-character [Kind::Any] tokens
//!     and it is up to the parser to reject them.

use super::{Kind, Position, Token};

/// The JTeX lexer
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Lexer {
    raw_lexer: RawLexer,
}

impl Lexer {
    pub fn new(source_code: String) -> Lexer {
        Lexer {
            raw_lexer: RawLexer::new(source_code),
        }
    }

    /// Position just after the last character of the input.
    ///
    /// Before the input is exhausted this is the position of the next token.
    pub fn position(&self) -> Position {
        self.raw_lexer.position()
    }

    fn finish(&self, kind: Kind, start: Position) -> Token {
        Token::new(kind, self.raw_lexer.slice_from(start.offset), start)
    }

    fn read_latex_command(&mut self) -> Kind {
        match self.raw_lexer.peek() {
            None => Kind::Backslash,
            Some(c) if c.is_ascii_alphabetic() => {
                while matches!(self.raw_lexer.peek(), Some(c) if c.is_ascii_alphabetic()) {
                    self.raw_lexer.advance();
                }
                Kind::LatexCommand
            }
            Some(_) => {
                self.raw_lexer.advance();
                Kind::LatexCommand
            }
        }
    }

    fn read_identifier(&mut self, first: char) -> Kind {
        let mut keyword = match first {
            'u' => Keyword::U,
            _ => Keyword::None,
        };
        while let Some(c) = self.raw_lexer.peek() {
            if !c.is_ascii_alphabetic() {
                break;
            }
            self.raw_lexer.advance();
            keyword = keyword.next(c);
        }
        match keyword {
            Keyword::Use => Kind::Use,
            _ => Kind::Varname,
        }
    }

    fn read_block_comment(&mut self) {
        while let Some(c) = self.raw_lexer.advance() {
            if c == '*' && self.raw_lexer.eat('/') {
                return;
            }
        }
    }
}

impl Iterator for Lexer {
    type Item = Token;

    /// Returns the next token, or [None] if the input is exhausted.
    fn next(&mut self) -> Option<Token> {
        let start = self.raw_lexer.position();
        let c = self.raw_lexer.peek()?;
        if is_whitespace(c) {
            while matches!(self.raw_lexer.peek(), Some(c) if is_whitespace(c)) {
                self.raw_lexer.advance();
            }
            return Some(self.finish(Kind::Whitespace, start));
        }
        self.raw_lexer.advance();
        use Kind::*;
        let kind = match c {
            '%' => {
                while let Some(c) = self.raw_lexer.peek() {
                    if c == '\n' {
                        break;
                    }
                    self.raw_lexer.advance();
                }
                Comment
            }
            '\\' => self.read_latex_command(),
            'a'..='z' | 'A'..='Z' => self.read_identifier(c),
            '0'..='9' => {
                while matches!(self.raw_lexer.peek(), Some('0'..='9')) {
                    self.raw_lexer.advance();
                }
                Number
            }
            '(' => ParenOpen,
            ')' => ParenClose,
            '{' => CurlyOpen,
            '}' => CurlyClose,
            '[' => SquareOpen,
            ']' => SquareClose,
            ';' => Semicolon,
            ',' => Comma,
            '*' => Star,
            '^' => Roof,
            '_' => Underscore,
            '$' => Dollar,
            '>' => GreaterThan,
            '.' => {
                if !self.raw_lexer.eat('.') {
                    Dot
                } else if self.raw_lexer.eat('.') {
                    TripleDot
                } else {
                    // Two dots are not an operator.
                    Any
                }
            }
            '-' => {
                if self.raw_lexer.eat('-') {
                    Escape
                } else {
                    Dash
                }
            }
            '/' => {
                if self.raw_lexer.eat('*') {
                    self.read_block_comment();
                    BlockComment
                } else if self.raw_lexer.eat('/') {
                    DoubleSlash
                } else {
                    Slash
                }
            }
            ':' => {
                if self.raw_lexer.eat('=') {
                    ColonEquals
                } else {
                    Colon
                }
            }
            '=' => {
                if self.raw_lexer.eat(':') {
                    EqualsColon
                } else if self.raw_lexer.eat('>') {
                    Implies
                } else {
                    Equals
                }
            }
            '<' => {
                if !self.raw_lexer.eat('=') {
                    LessThan
                } else if self.raw_lexer.eat('>') {
                    Iff
                } else {
                    ImpliedBy
                }
            }
            _ => Any,
        };
        Some(self.finish(kind, start))
    }
}

/// States of the sub-automaton recognizing the `use` keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Keyword {
    None,
    U,
    Us,
    Use,
}

impl Keyword {
    fn next(self, c: char) -> Keyword {
        match (self, c) {
            (Keyword::U, 's') => Keyword::Us,
            (Keyword::Us, 'e') => Keyword::Use,
            _ => Keyword::None,
        }
    }
}

fn is_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\r' | '\n')
}

#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
struct RawLexer {
    source_code: String,
    pos: usize,
    line: usize,
    column: usize,
}

impl RawLexer {
    fn new(source_code: String) -> RawLexer {
        RawLexer {
            source_code,
            pos: 0,
            line: 1,
            column: 1,
        }
    }

    fn position(&self) -> Position {
        Position {
            line: self.line,
            column: self.column,
            offset: self.pos,
        }
    }

    fn peek(&self) -> Option<char> {
        self.source_code[self.pos..].chars().next()
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn eat(&mut self, want: char) -> bool {
        if self.peek() == Some(want) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn slice_from(&self, offset: usize) -> &str {
        &self.source_code[offset..self.pos]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use Kind::*;

    fn lexer_test(input: &str, expected: Vec<(Kind, &str)>) {
        let actual: Vec<(Kind, String)> = Lexer::new(input.into())
            .map(|t| (t.kind(), t.text().to_string()))
            .collect();
        let expected: Vec<(Kind, String)> = expected
            .into_iter()
            .map(|(k, s)| (k, s.to_string()))
            .collect();
        assert_eq!(expected, actual);
    }

    macro_rules! lexer_tests {
        ($( ( $name: ident, $input: expr, $ ( $expected_token : expr, ) * ), )+) => {
            $(
            #[test]
            fn $name() {
                let input = $input;
                let expected_tokens = vec!( $( $expected_token ),* );
                lexer_test(&input, expected_tokens);
            }
            )+
        };
    }

    lexer_tests![
        (empty_input, "",),
        (
            whitespace_is_coalesced,
            "a \t\r\n b",
            (Varname, "a"),
            (Whitespace, " \t\r\n "),
            (Varname, "b"),
        ),
        (
            use_keyword,
            "use amsmath",
            (Use, "use"),
            (Whitespace, " "),
            (Varname, "amsmath"),
        ),
        (use_prefix_is_identifier, "used", (Varname, "used"),),
        (partial_use_prefix_is_identifier, "us", (Varname, "us"),),
        (use_suffix_is_identifier, "fuse", (Varname, "fuse"),),
        (
            use_followed_by_digit,
            "use2",
            (Use, "use"),
            (Number, "2"),
        ),
        (
            escape_sequence,
            "--math",
            (Escape, "--"),
            (Varname, "math"),
        ),
        (
            escape_then_dash,
            "---",
            (Escape, "--"),
            (Dash, "-"),
        ),
        (
            dashes_split_by_whitespace,
            "- -",
            (Dash, "-"),
            (Whitespace, " "),
            (Dash, "-"),
        ),
        (
            slashes,
            "a/b//c",
            (Varname, "a"),
            (Slash, "/"),
            (Varname, "b"),
            (DoubleSlash, "//"),
            (Varname, "c"),
        ),
        (
            block_comment,
            "a/* x ** y */b",
            (Varname, "a"),
            (BlockComment, "/* x ** y */"),
            (Varname, "b"),
        ),
        (
            unterminated_block_comment,
            "a/* x",
            (Varname, "a"),
            (BlockComment, "/* x"),
        ),
        (
            line_comment_stops_before_newline,
            "a% comment\nb",
            (Varname, "a"),
            (Comment, "% comment"),
            (Whitespace, "\n"),
            (Varname, "b"),
        ),
        (
            latex_command,
            r"\frac{1}",
            (LatexCommand, r"\frac"),
            (CurlyOpen, "{"),
            (Number, "1"),
            (CurlyClose, "}"),
        ),
        (
            latex_command_single_character,
            r"\\\{",
            (LatexCommand, r"\\"),
            (LatexCommand, r"\{"),
        ),
        (trailing_backslash, "\\", (Backslash, "\\"),),
        (
            arrows,
            "=><=<=><>=",
            (Implies, "=>"),
            (ImpliedBy, "<="),
            (Iff, "<=>"),
            (LessThan, "<"),
            (GreaterThan, ">"),
            (Equals, "="),
        ),
        (
            colons,
            ":=:=:",
            (ColonEquals, ":="),
            (ColonEquals, ":="),
            (Colon, ":"),
        ),
        (
            equals_colon,
            "a=:b",
            (Varname, "a"),
            (EqualsColon, "=:"),
            (Varname, "b"),
        ),
        (
            dots,
            "a.b...c..",
            (Varname, "a"),
            (Dot, "."),
            (Varname, "b"),
            (TripleDot, "..."),
            (Varname, "c"),
            (Any, ".."),
        ),
        (
            brackets_and_punctuation,
            "([{}]);,$^_*",
            (ParenOpen, "("),
            (SquareOpen, "["),
            (CurlyOpen, "{"),
            (CurlyClose, "}"),
            (SquareClose, "]"),
            (ParenClose, ")"),
            (Semicolon, ";"),
            (Comma, ","),
            (Dollar, "$"),
            (Roof, "^"),
            (Underscore, "_"),
            (Star, "*"),
        ),
        (
            numbers_and_identifiers,
            "x12y",
            (Varname, "x"),
            (Number, "12"),
            (Varname, "y"),
        ),
        (
            unknown_characters,
            "a+ü&",
            (Varname, "a"),
            (Any, "+"),
            (Any, "ü"),
            (Any, "&"),
        ),
    ];

    #[test]
    fn positions() {
        let tokens: Vec<Token> = Lexer::new("ab\n  ü--c".into()).collect();
        let positions: Vec<(usize, usize, usize)> = tokens
            .iter()
            .map(|t| {
                let p = t.position();
                (p.line, p.column, p.offset)
            })
            .collect();
        assert_eq!(
            positions,
            vec![(1, 1, 0), (1, 3, 2), (2, 3, 5), (2, 4, 7), (2, 6, 9)]
        );
    }

    #[test]
    fn end_position() {
        let mut lexer = Lexer::new("a\nb".into());
        while lexer.next().is_some() {}
        assert_eq!(
            lexer.position(),
            Position {
                line: 2,
                column: 2,
                offset: 3
            }
        );
    }
}
