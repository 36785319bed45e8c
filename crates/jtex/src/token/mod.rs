//! Lexical tokens
//!
//! A JTeX [Token] is a slice of the source text together with its [Kind] and the
//! [Position] at which it starts.
//! Tokens are lossless: concatenating the text of every token produced by the lexer
//! reproduces the input exactly.
//! The only tokens that do not correspond to source text are the end-of-input token
//! and the [Kind::Empty] placeholder inserted by the bracket tree builder.

pub mod lexer;

pub use lexer::Lexer;

/// The kind of a lexical token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Kind {
    Eof,
    Whitespace,
    Comment,
    BlockComment,
    LatexCommand,
    Backslash,
    Use,
    Varname,
    Number,
    Any,
    Empty,
    ParenOpen,
    ParenClose,
    CurlyOpen,
    CurlyClose,
    SquareOpen,
    SquareClose,
    Semicolon,
    Comma,
    Dot,
    TripleDot,
    /// The command escape sequence `--`.
    Escape,
    Dash,
    Slash,
    DoubleSlash,
    Star,
    Roof,
    Underscore,
    Dollar,
    Colon,
    ColonEquals,
    EqualsColon,
    Equals,
    LessThan,
    GreaterThan,
    Implies,
    ImpliedBy,
    Iff,
}

impl Kind {
    /// Returns a short human readable name used in error messages and token dumps.
    pub fn name(&self) -> &'static str {
        use Kind::*;
        match self {
            Eof => "end of input",
            Whitespace => "whitespace",
            Comment => "comment",
            BlockComment => "block comment",
            LatexCommand => "LaTeX command",
            Backslash => "backslash",
            Use => "use",
            Varname => "identifier",
            Number => "number",
            Any => "character",
            Empty => "empty",
            ParenOpen => "`(`",
            ParenClose => "`)`",
            CurlyOpen => "`{`",
            CurlyClose => "`}`",
            SquareOpen => "`[`",
            SquareClose => "`]`",
            Semicolon => "`;`",
            Comma => "`,`",
            Dot => "`.`",
            TripleDot => "`...`",
            Escape => "`--`",
            Dash => "`-`",
            Slash => "`/`",
            DoubleSlash => "`//`",
            Star => "`*`",
            Roof => "`^`",
            Underscore => "`_`",
            Dollar => "`$`",
            Colon => "`:`",
            ColonEquals => "`:=`",
            EqualsColon => "`=:`",
            Equals => "`=`",
            LessThan => "`<`",
            GreaterThan => "`>`",
            Implies => "`=>`",
            ImpliedBy => "`<=`",
            Iff => "`<=>`",
        }
    }

    pub fn is_comment(&self) -> bool {
        matches!(self, Kind::Comment | Kind::BlockComment)
    }
}

impl std::fmt::Display for Kind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Location of a token in the source.
///
/// Lines and columns are 1-based and count characters; the offset is a 0-based byte offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    pub line: usize,
    pub column: usize,
    pub offset: usize,
}

impl Position {
    pub const START: Position = Position {
        line: 1,
        column: 1,
        offset: 0,
    };
}

impl Default for Position {
    fn default() -> Self {
        Position::START
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "line: {}, column: {}", self.line, self.column)
    }
}

/// A lexical token.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Token {
    kind: Kind,
    text: String,
    position: Position,
    expanded: bool,
}

impl Token {
    pub fn new<T: Into<String>>(kind: Kind, text: T, position: Position) -> Token {
        Token {
            kind,
            text: text.into(),
            position,
            expanded: false,
        }
    }

    pub fn new_eof(position: Position) -> Token {
        Token::new(Kind::Eof, "", position)
    }

    pub fn new_empty(position: Position) -> Token {
        Token::new(Kind::Empty, "", position)
    }

    #[inline]
    pub fn kind(&self) -> Kind {
        self.kind
    }

    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[inline]
    pub fn position(&self) -> Position {
        self.position
    }

    /// Whether this token was produced by re-lexing the output of a nested command.
    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    pub fn is_whitespace(&self) -> bool {
        self.kind == Kind::Whitespace
    }

    /// Byte range of this token in the source it was lexed from.
    pub fn span(&self) -> std::ops::Range<usize> {
        self.position.offset..self.position.offset + self.text.len()
    }

    pub(crate) fn mark_expanded(&mut self, position: Position) {
        self.position = position;
        self.expanded = true;
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.text)
    }
}

/// Lex a complete string.
///
/// The returned vector does not contain the end-of-input token.
pub fn tokenize(source: &str) -> Vec<Token> {
    Lexer::new(source.to_string()).collect()
}

/// Lex a string that was generated at `at`, typically the output of a nested command.
///
/// Every returned token is stamped with the position `at` and is marked as expanded.
pub fn tokenize_substring(source: &str, at: Position) -> Vec<Token> {
    let mut tokens = tokenize(source);
    for token in &mut tokens {
        token.mark_expanded(at);
    }
    tokens
}

/// Concatenate the text of some tokens.
pub fn write_tokens<'a, I: IntoIterator<Item = &'a Token>>(tokens: I) -> String {
    let mut result = String::new();
    for token in tokens {
        result.push_str(token.text());
    }
    result
}
