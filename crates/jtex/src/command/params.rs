//! Optional parameters
//!
//! A command invocation may be followed by any number of parameters:
//!
//! ```text
//! --matrix.type(bmatrix).set(pos: (1, 2), x).hidden[...]
//! ```
//!
//! Each parameter is a `.` followed by a name and, optionally, a parenthesized tuple.
//! A tuple is a comma separated list of groups.
//! A group may start with a `label:` annotation and is either a nested tuple, when the
//!     rest of the group is exactly one parenthesized run, or a flat run of tokens.
//!
//! Parameters are kept in the order they appear and are not deduplicated.
//! Lookup by name returns the first match.

use crate::error::{Error, Result};
use crate::token::{self, Kind, Token};
use crate::vm::streams::Input;

/// The parameters given to one command invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct List {
    params: Vec<Param>,
}

impl List {
    /// Returns the first parameter with the name.
    pub fn get(&self, name: &str) -> Option<&Param> {
        self.params.iter().find(|p| p.name() == name)
    }

    /// Returns every parameter with the name, in order of appearance.
    pub fn all<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Param> + 'a {
        self.params.iter().filter(move |p| p.name() == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Param> {
        self.params.iter()
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    name: Token,
    args: Option<Tuple>,
}

impl Param {
    pub fn name(&self) -> &str {
        self.name.text()
    }

    /// The token holding the parameter's name.
    pub fn token(&self) -> &Token {
        &self.name
    }

    pub fn args(&self) -> Option<&Tuple> {
        self.args.as_ref()
    }

    /// Returns the arguments, failing if the parameter was given without any.
    pub fn required_args(&self) -> Result<&Tuple> {
        match &self.args {
            Some(args) if !args.is_empty() => Ok(args),
            _ => Err(Error::new_token_error(
                self.name.clone(),
                format!["the `{}` parameter requires arguments", self.name()],
            )),
        }
    }

    /// Returns the text of the single argument of this parameter.
    ///
    /// A `label:` prefix is part of the text, so `.label(eq:one)` gives `eq:one`.
    pub fn single_argument(&self) -> Result<String> {
        let args = self.required_args()?;
        match args.groups() {
            [group] => match group.full_text() {
                text if !text.is_empty() => Ok(text),
                _ => Err(Error::new_token_error(
                    self.name.clone(),
                    format!["the argument of the `{}` parameter is empty", self.name()],
                )),
            },
            _ => Err(Error::new_token_error(
                self.name.clone(),
                format!["the `{}` parameter takes exactly one argument", self.name()],
            )
            .with_note(format!["got {} arguments", args.len()])),
        }
    }
}

/// A parenthesized, comma separated list of groups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tuple {
    open: Token,
    groups: Vec<Group>,
}

impl Tuple {
    fn from_tokens(open: Token, tokens: Vec<Token>) -> Tuple {
        let mut groups = vec![];
        if tokens.iter().any(|t| !t.is_whitespace()) {
            let mut current = vec![];
            let mut depth: usize = 0;
            for token in tokens {
                match token.kind() {
                    Kind::ParenOpen => depth += 1,
                    Kind::ParenClose => depth = depth.saturating_sub(1),
                    Kind::Comma if depth == 0 => {
                        groups.push(Group::from_tokens(std::mem::take(&mut current)));
                        continue;
                    }
                    _ => {}
                }
                current.push(token);
            }
            groups.push(Group::from_tokens(current));
        }
        Tuple { open, groups }
    }

    /// The opening parenthesis.
    pub fn open(&self) -> &Token {
        &self.open
    }

    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    pub fn get(&self, i: usize) -> Option<&Group> {
        self.groups.get(i)
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// One comma separated element of a [Tuple].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    label: Option<Token>,
    value: Argument,
    written: Vec<Token>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Argument {
    Tuple(Tuple),
    Tokens(Vec<Token>),
}

impl Group {
    fn from_tokens(tokens: Vec<Token>) -> Group {
        let mut tokens = trim(tokens);
        let labelled = matches!(
            tokens.as_slice(),
            [name, colon, ..] if name.kind() == Kind::Varname && colon.kind() == Kind::Colon
        );
        let label = if labelled {
            let label = tokens.remove(0);
            tokens.remove(0);
            tokens = trim(tokens);
            Some(label)
        } else {
            None
        };
        let written = tokens.clone();
        let value = if is_single_parenthesized(&tokens) {
            let mut inner = tokens;
            inner.pop();
            let open = inner.remove(0);
            Argument::Tuple(Tuple::from_tokens(open, inner))
        } else {
            Argument::Tokens(tokens)
        };
        Group {
            label,
            value,
            written,
        }
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_ref().map(Token::text)
    }

    pub fn label_token(&self) -> Option<&Token> {
        self.label.as_ref()
    }

    pub fn value(&self) -> &Argument {
        &self.value
    }

    /// The value's tokens as written, parentheses included and label excluded.
    pub fn written_tokens(&self) -> &[Token] {
        &self.written
    }

    pub fn as_tuple(&self) -> Option<&Tuple> {
        match &self.value {
            Argument::Tuple(tuple) => Some(tuple),
            Argument::Tokens(_) => None,
        }
    }

    pub fn tokens(&self) -> Option<&[Token]> {
        match &self.value {
            Argument::Tuple(_) => None,
            Argument::Tokens(tokens) => Some(tokens),
        }
    }

    /// A token to attach errors about this group to.
    pub fn token(&self) -> Option<&Token> {
        match (&self.label, &self.value) {
            (Some(label), _) => Some(label),
            (None, Argument::Tuple(tuple)) => Some(tuple.open()),
            (None, Argument::Tokens(tokens)) => tokens.first(),
        }
    }

    /// The value as text, without the label.
    pub fn text(&self) -> String {
        match &self.value {
            Argument::Tokens(tokens) => token::write_tokens(tokens),
            Argument::Tuple(tuple) => {
                let inner: Vec<String> = tuple.groups().iter().map(Group::text).collect();
                format!["({})", inner.join(", ")]
            }
        }
    }

    /// The value as text, with the label if there is one.
    pub fn full_text(&self) -> String {
        match self.label() {
            None => self.text(),
            Some(label) => format!["{label}:{}", self.text()],
        }
    }

    /// The value as a positive integer.
    pub fn number(&self) -> Option<usize> {
        match self.tokens()? {
            [token] if token.kind() == Kind::Number => token.text().parse().ok(),
            _ => None,
        }
    }
}

fn trim(mut tokens: Vec<Token>) -> Vec<Token> {
    while tokens.last().map_or(false, Token::is_whitespace) {
        tokens.pop();
    }
    let leading = tokens.iter().take_while(|t| t.is_whitespace()).count();
    tokens.drain(..leading);
    tokens
}

/// Whether the tokens are `( ... )` with the first parenthesis matched by the last.
fn is_single_parenthesized(tokens: &[Token]) -> bool {
    if tokens.len() < 2 || tokens[0].kind() != Kind::ParenOpen {
        return false;
    }
    let mut depth: usize = 0;
    for (i, token) in tokens.iter().enumerate() {
        match token.kind() {
            Kind::ParenOpen => depth += 1,
            Kind::ParenClose => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return i == tokens.len() - 1;
                }
            }
            _ => {}
        }
    }
    false
}

/// Parses the parameters following a command's trigger token.
pub fn parse(input: &mut Input) -> Result<List> {
    let mut params = vec![];
    while matches!(input.peek(), Some(t) if t.kind() == Kind::Dot) {
        let dot = match input.next() {
            Some(dot) => dot,
            None => break,
        };
        let name = match input.next() {
            Some(name) if name.kind() == Kind::Varname => name,
            Some(other) => {
                return Err(Error::new_token_error(
                    other,
                    "expected a parameter name after `.`",
                ))
            }
            None => {
                return Err(Error::new_end_of_input_error(
                    dot.position(),
                    "expected a parameter name after `.`",
                ))
            }
        };
        let args = if matches!(input.peek(), Some(t) if t.kind() == Kind::ParenOpen) {
            match input.next() {
                Some(open) => Some(parse_tuple(input, open)?),
                None => None,
            }
        } else {
            None
        };
        params.push(Param { name, args });
    }
    Ok(List { params })
}

fn parse_tuple(input: &mut Input, open: Token) -> Result<Tuple> {
    let mut tokens = vec![];
    let mut depth: usize = 0;
    loop {
        let token = match input.next() {
            Some(token) => token,
            None => {
                return Err(Error::new_end_of_input_error(
                    input.position(),
                    "the parameter list is never closed",
                )
                .with_note(format!["the list was opened at {}", open.position()]))
            }
        };
        match token.kind() {
            Kind::ParenOpen => depth += 1,
            Kind::ParenClose if depth == 0 => break,
            Kind::ParenClose => depth -= 1,
            _ => {}
        }
        tokens.push(token);
    }
    Ok(Tuple::from_tokens(open, tokens))
}
