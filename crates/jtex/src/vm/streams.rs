//! The shared token stream
//!
//! There is exactly one [Input] per conversion.
//! The driver, the tree builder, parameter parsing and every command handler read from it,
//!     so a nested command always continues from the position its caller reached.
//! Tokens can be pushed back onto the stream; pushed tokens are returned before any
//!     further input is lexed.

use crate::token::{Kind, Lexer, Position, Token};

#[derive(Debug, Clone)]
pub struct Input {
    lexer: Lexer,
    pending: Vec<Token>,
}

impl Input {
    pub fn new(source: String) -> Input {
        Input {
            lexer: Lexer::new(source),
            pending: vec![],
        }
    }

    /// Returns the next token, or [None] at the end of the input.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Option<Token> {
        match self.pending.pop() {
            Some(token) => Some(token),
            None => self.lexer.next(),
        }
    }

    pub fn peek(&mut self) -> Option<&Token> {
        if self.pending.is_empty() {
            let token = self.lexer.next()?;
            self.pending.push(token);
        }
        self.pending.last()
    }

    /// Returns the next token that is not whitespace or a comment.
    pub fn next_significant(&mut self) -> Option<Token> {
        loop {
            let token = self.next()?;
            if !token.is_whitespace() && !token.kind().is_comment() {
                return Some(token);
            }
        }
    }

    /// Consumes whitespace and comments.
    pub fn skip_insignificant(&mut self) {
        while matches!(self.peek(), Some(t) if t.is_whitespace() || t.kind().is_comment()) {
            self.next();
        }
    }

    /// Puts a token back so that it is returned by the next call to [Input::next].
    pub fn back(&mut self, token: Token) {
        self.pending.push(token);
    }

    /// Puts tokens back so that they are returned in order before any other input.
    pub fn push_tokens(&mut self, tokens: Vec<Token>) {
        self.pending.extend(tokens.into_iter().rev());
    }

    /// Whether the next token has the kind.
    pub fn next_is(&mut self, kind: Kind) -> bool {
        matches!(self.peek(), Some(t) if t.kind() == kind)
    }

    /// Position of the next token to be lexed from the source.
    pub fn position(&self) -> Position {
        self.lexer.position()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::tokenize_substring;

    #[test]
    fn pushed_tokens_come_first_in_order() {
        let mut input = Input::new("c".into());
        input.push_tokens(tokenize_substring("a b", Position::START));
        let texts: Vec<String> = std::iter::from_fn(|| input.next())
            .map(|t| t.text().to_string())
            .collect();
        assert_eq!(texts, vec!["a", " ", "b", "c"]);
    }

    #[test]
    fn peek_does_not_consume() {
        let mut input = Input::new("a b".into());
        assert_eq!(input.peek().unwrap().text(), "a");
        assert!(input.next_is(Kind::Varname));
        assert_eq!(input.next().unwrap().text(), "a");
        assert_eq!(input.next_significant().unwrap().text(), "b");
        assert!(input.next().is_none());
        assert!(input.peek().is_none());
    }

    #[test]
    fn back() {
        let mut input = Input::new("a".into());
        let a = input.next().unwrap();
        input.back(a.clone());
        assert_eq!(input.next(), Some(a));
    }

    #[test]
    fn skip_insignificant() {
        let mut input = Input::new(" % c\n /* d */x".into());
        input.skip_insignificant();
        assert_eq!(input.next().unwrap().text(), "x");
    }
}
