//! Operators
//!
//! An operator is a rewrite rule applied by the expression evaluator.
//! It is triggered by an evaluation token of a specific [EvalKind] and comes in one of
//! three categories:
//!
//! - binary operators combine the operand to their left and the operand to their right,
//!     like `a/b`.
//! - unary operators combine with the token immediately to their right, like `$u`.
//! - single operators replace the trigger token on its own, like `=>`.
//!
//! Operators declare the names of the commands they belong to.
//! The [crate::command::Registry] performs the actual injection.

use std::rc::Rc;

use crate::eval::{EvalKind, EvalToken};

pub type BinaryFn = Rc<dyn Fn(&EvalToken, &EvalToken) -> Option<EvalToken>>;
pub type UnaryFn = Rc<dyn Fn(&EvalToken, &EvalToken) -> Option<EvalToken>>;
pub type SingleFn = Rc<dyn Fn(&EvalToken) -> EvalToken>;
pub type CheckerFn = Rc<dyn Fn(&EvalToken) -> bool>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Binary,
    Unary,
    Single,
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Category::Binary => "binary",
                Category::Unary => "unary",
                Category::Single => "single",
            }
        )
    }
}

/// The rewrite performed by an operator.
///
/// Binary handlers receive the left and right operands.
/// Unary handlers receive the trigger token and the operand.
/// Returning [None] declines the match and the trigger token is kept as data.
#[derive(Clone)]
pub enum Handler {
    Binary(BinaryFn),
    Unary(UnaryFn),
    Single(SingleFn),
}

#[derive(Clone)]
pub struct Operator {
    name: String,
    trigger: EvalKind,
    handler: Handler,
    checker: Option<CheckerFn>,
    commands: Vec<String>,
}

impl Operator {
    pub fn new_binary<F>(name: &str, trigger: EvalKind, f: F) -> Operator
    where
        F: Fn(&EvalToken, &EvalToken) -> Option<EvalToken> + 'static,
    {
        Operator::new(name, trigger, Handler::Binary(Rc::new(f)))
    }

    pub fn new_unary<F>(name: &str, trigger: EvalKind, f: F) -> Operator
    where
        F: Fn(&EvalToken, &EvalToken) -> Option<EvalToken> + 'static,
    {
        Operator::new(name, trigger, Handler::Unary(Rc::new(f)))
    }

    pub fn new_single<F>(name: &str, trigger: EvalKind, f: F) -> Operator
    where
        F: Fn(&EvalToken) -> EvalToken + 'static,
    {
        Operator::new(name, trigger, Handler::Single(Rc::new(f)))
    }

    fn new(name: &str, trigger: EvalKind, handler: Handler) -> Operator {
        Operator {
            name: name.into(),
            trigger,
            handler,
            checker: None,
            commands: vec![],
        }
    }

    /// Restricts the operator to trigger tokens for which the checker holds.
    pub fn with_checker<F: Fn(&EvalToken) -> bool + 'static>(mut self, f: F) -> Self {
        self.checker = Some(Rc::new(f));
        self
    }

    /// Declares that the operator should be injected into the named command.
    pub fn inject_into(mut self, command_name: &str) -> Self {
        self.commands.push(command_name.into());
        self
    }

    pub fn inject_into_all(mut self, command_names: &[&str]) -> Self {
        self.commands
            .extend(command_names.iter().map(|name| name.to_string()));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn trigger(&self) -> EvalKind {
        self.trigger
    }

    pub fn handler(&self) -> &Handler {
        &self.handler
    }

    pub fn category(&self) -> Category {
        match self.handler {
            Handler::Binary(_) => Category::Binary,
            Handler::Unary(_) => Category::Unary,
            Handler::Single(_) => Category::Single,
        }
    }

    pub fn commands(&self) -> &[String] {
        &self.commands
    }

    pub fn targets(&self, command_name: &str) -> bool {
        self.commands.iter().any(|c| c == command_name)
    }

    /// Whether the token triggers this operator.
    pub fn accepts(&self, token: &EvalToken) -> bool {
        token.kind() == self.trigger
            && match &self.checker {
                None => true,
                Some(checker) => checker(token),
            }
    }
}

impl std::fmt::Debug for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Operator")
            .field("name", &self.name)
            .field("category", &self.category())
            .field("trigger", &self.trigger)
            .field("commands", &self.commands)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::Position;

    fn token(kind: EvalKind, text: &str) -> EvalToken {
        EvalToken::new(kind, text, Position::START, Position::START)
    }

    #[test]
    fn checker_restricts_trigger() {
        let op = Operator::new_single("infinity", EvalKind::String, |t| t.replaced_by(r"\infty"))
            .with_checker(|t| t.text() == "inf");
        assert!(op.accepts(&token(EvalKind::String, "inf")));
        assert!(!op.accepts(&token(EvalKind::String, "x")));
        assert!(!op.accepts(&token(EvalKind::Fraction, "inf")));
        assert_eq!(op.category(), Category::Single);
    }

    #[test]
    fn injection_targets() {
        let op = Operator::new_binary("frac", EvalKind::Fraction, |_, _| None)
            .inject_into("a")
            .inject_into_all(&["b", "c"]);
        assert!(op.targets("a"));
        assert!(op.targets("c"));
        assert!(!op.targets("d"));
        assert_eq!(op.commands().len(), 3);
    }
}
