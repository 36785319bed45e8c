//! Commands
//!
//! A command is invoked by the escape sequence `--` followed by a trigger token.
//! Commands are looked up by the lexical kind of the trigger token; when several commands
//!     share a kind, each command's checker is consulted in registration order and the
//!     first command that accepts the token is invoked.
//!
//! Each command owns the operators injected into it and a [Dispatch] built from them,
//!     which it passes to the evaluator when it evaluates expressions.

use crate::error::Result;
use crate::eval::Dispatch;
use crate::operator::Operator;
use crate::output::LineBuffer;
use crate::token::{Kind, Token};
use crate::vm::Context;

pub mod params;
mod registry;

pub use registry::Registry;

/// The function that runs a command.
///
/// Output is written to the line buffer.
/// Further input, like the command's body, is read from the context.
pub type Handler = fn(&Call<'_>, &mut LineBuffer, &mut Context<'_>) -> Result<()>;

/// Predicate on the trigger token.
pub type Checker = fn(&Token) -> bool;

/// An optional parameter accepted by a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Parameter {
    pub name: &'static str,
    /// Whether the parameter may be given more than once.
    pub repeatable: bool,
}

#[derive(Clone)]
pub struct Command {
    name: String,
    trigger: Kind,
    checker: Option<Checker>,
    handler: Handler,
    parameters: Vec<Parameter>,
    operators: Vec<Operator>,
    dispatch: Dispatch,
    doc: Option<&'static str>,
}

impl Command {
    pub fn new(name: &str, trigger: Kind, handler: Handler) -> Command {
        Command {
            name: name.into(),
            trigger,
            checker: None,
            handler,
            parameters: vec![],
            operators: vec![],
            dispatch: Default::default(),
            doc: None,
        }
    }

    pub fn with_checker(mut self, checker: Checker) -> Command {
        self.checker = Some(checker);
        self
    }

    pub fn with_parameter(mut self, name: &'static str) -> Command {
        self.parameters.push(Parameter {
            name,
            repeatable: false,
        });
        self
    }

    pub fn with_repeatable_parameter(mut self, name: &'static str) -> Command {
        self.parameters.push(Parameter {
            name,
            repeatable: true,
        });
        self
    }

    pub fn with_doc(mut self, doc: &'static str) -> Command {
        self.doc = Some(doc);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn trigger(&self) -> Kind {
        self.trigger
    }

    pub fn doc(&self) -> Option<&'static str> {
        self.doc
    }

    pub fn handler(&self) -> Handler {
        self.handler
    }

    /// Whether this command is invoked by the trigger token.
    pub fn accepts(&self, token: &Token) -> bool {
        token.kind() == self.trigger
            && match self.checker {
                None => true,
                Some(checker) => checker(token),
            }
    }

    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    pub fn parameter(&self, name: &str) -> Option<&Parameter> {
        self.parameters.iter().find(|p| p.name == name)
    }

    /// Whether `.name(...)` suffixes are parsed after the trigger token.
    pub fn takes_parameters(&self) -> bool {
        !self.parameters.is_empty()
    }

    pub fn operators(&self) -> &[Operator] {
        &self.operators
    }

    /// Operators injected into this command, indexed for the evaluator.
    pub fn dispatch(&self) -> &Dispatch {
        &self.dispatch
    }

    /// Injects an operator and rebuilds the dispatch.
    pub fn inject(&mut self, operator: Operator) {
        self.operators.push(operator);
        self.build_operators();
    }

    pub(crate) fn clear_operators(&mut self) {
        self.operators.clear();
    }

    pub(crate) fn push_operator(&mut self, operator: Operator) {
        self.operators.push(operator);
    }

    /// Rebuilds the dispatch from the injected operators.
    pub fn build_operators(&mut self) {
        self.dispatch = Dispatch::new(&self.operators);
    }
}

impl std::fmt::Debug for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Command")
            .field("name", &self.name)
            .field("trigger", &self.trigger)
            .field("parameters", &self.parameters)
            .field("operators", &self.operators)
            .finish()
    }
}

/// A single invocation of a command.
pub struct Call<'a> {
    command: &'a Command,
    escape: Token,
    token: Token,
    params: params::List,
}

impl<'a> Call<'a> {
    pub(crate) fn new(
        command: &'a Command,
        escape: Token,
        token: Token,
        params: params::List,
    ) -> Call<'a> {
        Call {
            command,
            escape,
            token,
            params,
        }
    }

    pub fn command(&self) -> &'a Command {
        self.command
    }

    /// The escape sequence that started the invocation.
    pub fn escape(&self) -> &Token {
        &self.escape
    }

    /// The trigger token following the escape sequence.
    pub fn token(&self) -> &Token {
        &self.token
    }

    pub fn params(&self) -> &params::List {
        &self.params
    }
}
