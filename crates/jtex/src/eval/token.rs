//! Evaluation tokens
//!
//! The evaluator does not work with lexical tokens directly.
//! Each lexical token is converted to an [EvalToken] whose [EvalKind] describes what the
//! token means inside an expression rather than how it was spelled.

use crate::token::{self, Position, Token};

/// The semantic kind of an evaluation token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EvalKind {
    String,
    Fraction,
    Multiply,
    Power,
    Integral,
    Subscript,
    Implies,
    ImpliedBy,
    Iff,
    TripleDot,
    Colon,
    ColonEquals,
    EqualsColon,
    Set,
}

impl EvalKind {
    pub const ALL: [EvalKind; 14] = [
        EvalKind::String,
        EvalKind::Fraction,
        EvalKind::Multiply,
        EvalKind::Power,
        EvalKind::Integral,
        EvalKind::Subscript,
        EvalKind::Implies,
        EvalKind::ImpliedBy,
        EvalKind::Iff,
        EvalKind::TripleDot,
        EvalKind::Colon,
        EvalKind::ColonEquals,
        EvalKind::EqualsColon,
        EvalKind::Set,
    ];

    /// Name of the kind as used in declarative operator files.
    pub fn name(&self) -> &'static str {
        use EvalKind::*;
        match self {
            String => "string",
            Fraction => "fraction",
            Multiply => "multiply",
            Power => "power",
            Integral => "integral",
            Subscript => "subscript",
            Implies => "implies",
            ImpliedBy => "implied-by",
            Iff => "iff",
            TripleDot => "triple-dot",
            Colon => "colon",
            ColonEquals => "colon-equals",
            EqualsColon => "equals-colon",
            Set => "set",
        }
    }

    pub fn from_name(name: &str) -> Option<EvalKind> {
        EvalKind::ALL.into_iter().find(|kind| kind.name() == name)
    }
}

impl From<token::Kind> for EvalKind {
    fn from(kind: token::Kind) -> Self {
        use token::Kind;
        match kind {
            Kind::Slash => EvalKind::Fraction,
            Kind::Star => EvalKind::Multiply,
            Kind::Roof => EvalKind::Power,
            Kind::DoubleSlash => EvalKind::Integral,
            Kind::Underscore => EvalKind::Subscript,
            Kind::Implies => EvalKind::Implies,
            Kind::ImpliedBy => EvalKind::ImpliedBy,
            Kind::Iff => EvalKind::Iff,
            Kind::TripleDot => EvalKind::TripleDot,
            Kind::Colon => EvalKind::Colon,
            Kind::ColonEquals => EvalKind::ColonEquals,
            Kind::EqualsColon => EvalKind::EqualsColon,
            Kind::Dollar => EvalKind::Set,
            _ => EvalKind::String,
        }
    }
}

impl std::fmt::Display for EvalKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A token used during expression evaluation.
///
/// The token carries a number of pending parenthesis layers.
/// When rendered, each layer becomes a `\left(`...`\right)` pair around the text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvalToken {
    kind: EvalKind,
    text: String,
    wraps: usize,
    start: Position,
    end: Position,
}

impl EvalToken {
    pub fn new<T: Into<String>>(kind: EvalKind, text: T, start: Position, end: Position) -> Self {
        EvalToken {
            kind,
            text: text.into(),
            wraps: 0,
            start,
            end,
        }
    }

    /// Builds an evaluation token from a lexical token.
    ///
    /// Tokens that were spliced in from the output of a nested command are always strings.
    pub fn from_token(token: &Token) -> Self {
        let kind = if token.is_expanded() {
            EvalKind::String
        } else {
            token.kind().into()
        };
        EvalToken::new(kind, token.text(), token.position(), token.position())
    }

    /// Builds a string token covering the source range from `first` to `last`.
    pub fn spanning<T: Into<String>>(text: T, first: &EvalToken, last: &EvalToken) -> Self {
        EvalToken::new(EvalKind::String, text, first.start, last.end)
    }

    /// Builds a string token at the same location as this token.
    pub fn replaced_by<T: Into<String>>(&self, text: T) -> Self {
        EvalToken::new(EvalKind::String, text, self.start, self.end)
    }

    #[inline]
    pub fn kind(&self) -> EvalKind {
        self.kind
    }

    /// The raw text, without any parenthesis layers.
    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[inline]
    pub fn wraps(&self) -> usize {
        self.wraps
    }

    pub fn start(&self) -> Position {
        self.start
    }

    pub fn end(&self) -> Position {
        self.end
    }

    /// Whether the token is a run of whitespace, which binary operators skip over.
    pub fn is_whitespace(&self) -> bool {
        self.kind == EvalKind::String
            && self.wraps == 0
            && !self.text.is_empty()
            && self.text.chars().all(char::is_whitespace)
    }

    /// Adds one parenthesis layer.
    pub fn wrap(&mut self) -> &mut Self {
        self.wraps += 1;
        self
    }

    /// Removes one parenthesis layer, if there is one.
    pub fn unwrap(&mut self) -> &mut Self {
        self.wraps = self.wraps.saturating_sub(1);
        self
    }

    /// Renders the token with one parenthesis layer fewer, without modifying it.
    pub fn unwrapped(&self) -> String {
        render(&self.text, self.wraps.saturating_sub(1))
    }
}

fn render(text: &str, wraps: usize) -> String {
    let mut s = String::with_capacity(text.len() + wraps * 15);
    for _ in 0..wraps {
        s.push_str(r"\left(");
    }
    s.push_str(text);
    for _ in 0..wraps {
        s.push_str(r"\right)");
    }
    s
}

impl std::fmt::Display for EvalToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", render(&self.text, self.wraps))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn string(text: &str) -> EvalToken {
        EvalToken::new(EvalKind::String, text, Position::START, Position::START)
    }

    #[test]
    fn wrap_renders_parentheses() {
        let mut t = string("x");
        t.wrap().wrap();
        assert_eq!(t.to_string(), r"\left(\left(x\right)\right)");
        assert_eq!(t.unwrapped(), r"\left(x\right)");
    }

    #[test]
    fn unwrap_after_wrap_is_identity() {
        for text in ["", "a", r"\frac{1}{2}"] {
            let original = string(text);
            let mut t = original.clone();
            t.wrap();
            t.unwrap();
            assert_eq!(t.to_string(), original.to_string());
            assert_eq!(t, original);
        }
    }

    #[test]
    fn unwrap_saturates() {
        let mut t = string("a");
        t.unwrap();
        assert_eq!(t.wraps(), 0);
        assert_eq!(t.to_string(), "a");
    }

    #[test]
    fn kind_remapping() {
        let tokens = token::tokenize("a/b*c^d//e_f=><=<=>...: := =:$+");
        let kinds: Vec<EvalKind> = tokens
            .iter()
            .filter(|t| !t.is_whitespace())
            .map(|t| EvalToken::from_token(t).kind())
            .collect();
        use EvalKind::*;
        assert_eq!(
            kinds,
            vec![
                String,
                Fraction,
                String,
                Multiply,
                String,
                Power,
                String,
                Integral,
                String,
                Subscript,
                String,
                Implies,
                ImpliedBy,
                Iff,
                TripleDot,
                Colon,
                ColonEquals,
                EqualsColon,
                Set,
                String,
            ]
        );
    }

    #[test]
    fn expanded_tokens_are_strings() {
        let tokens = token::tokenize_substring("{a}^{b}", Position::START);
        assert!(tokens
            .iter()
            .all(|t| EvalToken::from_token(t).kind() == EvalKind::String));
    }

    #[test]
    fn kind_names_round_trip() {
        for kind in EvalKind::ALL {
            assert_eq!(EvalKind::from_name(kind.name()), Some(kind));
        }
        assert_eq!(EvalKind::from_name("modulo"), None);
    }

    #[test]
    fn whitespace_detection() {
        assert!(string(" \n").is_whitespace());
        assert!(!string("").is_whitespace());
        let mut wrapped = string(" ");
        wrapped.wrap();
        assert!(!wrapped.is_whitespace());
    }
}
