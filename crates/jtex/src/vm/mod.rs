//! The parser driver
//!
//! The driver scans the document for the escape sequence `--`.
//! Everything else is copied to the output unchanged.
//! On an escape sequence the next token is looked up in the [Registry]; if a command
//!     accepts it, the command's parameters are parsed and its handler is run.
//! If no command accepts the token, the escape sequence is emitted literally and the token
//!     is processed as ordinary input.
//!
//! Command handlers read their bodies from the same [Context] using
//!     [Context::build_tree].
//! The tree builder itself dispatches commands it encounters.
//! The output of such a nested command is re-lexed and pushed back onto the input, so the
//!     surrounding command sees it at the exact position of the call.

use std::any::{Any, TypeId};
use std::collections::HashMap;

use crate::command::params;
use crate::command::{Call, Command, Registry};
use crate::error::{Error, Result};
use crate::eval::{self, Dispatch, EvalToken};
use crate::output::LineBuffer;
use crate::spellcheck;
use crate::token::{self, Kind, Token};
use crate::tree::{self, BracketPair, Tree};
use crate::warning::Warning;

pub mod streams;

use streams::Input;

/// Conversion options.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Options {
    /// String used to join output lines.
    pub line_break: String,
    /// Packages imported by `--use default`.
    pub default_packages: Vec<String>,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            line_break: "\n".into(),
            default_packages: vec!["amsmath".into()],
        }
    }
}

/// Result of a successful conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversion {
    pub output: String,
    pub warnings: Vec<Warning>,
}

/// Converts a JTeX document to LaTeX.
pub fn convert(source: &str, registry: &Registry, options: &Options) -> Result<Conversion> {
    let mut context = Context::new(source, registry, options);
    let mut buffer = LineBuffer::new();
    if let Err(mut err) = context.run(&mut buffer) {
        err.attach_source(source);
        return Err(err);
    }
    Ok(Conversion {
        output: buffer.join(&options.line_break),
        warnings: context.take_warnings(),
    })
}

/// An entry in the command call stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub command: String,
    /// The escape sequence that invoked the command.
    pub token: Token,
}

/// Named values that persist for the whole document, like stored matrices.
///
/// There is one namespace per value type.
#[derive(Default)]
pub struct Stores {
    stores: HashMap<TypeId, Box<dyn Any>>,
}

impl Stores {
    pub fn get<T: 'static>(&self, name: &str) -> Option<&T> {
        self.stores
            .get(&TypeId::of::<T>())?
            .downcast_ref::<HashMap<String, T>>()?
            .get(name)
    }

    pub fn insert<T: 'static>(&mut self, name: &str, value: T) {
        let store = self
            .stores
            .entry(TypeId::of::<T>())
            .or_insert_with(|| Box::new(HashMap::<String, T>::new()));
        if let Some(store) = store.downcast_mut::<HashMap<String, T>>() {
            store.insert(name.into(), value);
        }
    }

    pub fn names<T: 'static>(&self) -> Vec<&str> {
        let mut names: Vec<&str> = match self
            .stores
            .get(&TypeId::of::<T>())
            .and_then(|s| s.downcast_ref::<HashMap<String, T>>())
        {
            None => vec![],
            Some(store) => store.keys().map(String::as_str).collect(),
        };
        names.sort();
        names
    }
}

/// State of one conversion.
pub struct Context<'r> {
    input: Input,
    registry: &'r Registry,
    options: &'r Options,
    call_stack: Vec<Frame>,
    stores: Stores,
    warnings: Vec<Warning>,
}

impl<'r> Context<'r> {
    pub fn new(source: &str, registry: &'r Registry, options: &'r Options) -> Context<'r> {
        Context {
            input: Input::new(source.into()),
            registry,
            options,
            call_stack: vec![],
            stores: Default::default(),
            warnings: vec![],
        }
    }

    pub fn input(&mut self) -> &mut Input {
        &mut self.input
    }

    pub fn registry(&self) -> &'r Registry {
        self.registry
    }

    pub fn options(&self) -> &'r Options {
        self.options
    }

    /// The commands currently running, outermost first.
    pub fn call_stack(&self) -> &[Frame] {
        &self.call_stack
    }

    /// Number of running invocations of the named command.
    pub fn depth_of(&self, command: &str) -> usize {
        self.call_stack
            .iter()
            .filter(|frame| frame.command == command)
            .count()
    }

    pub fn stores(&self) -> &Stores {
        &self.stores
    }

    pub fn stores_mut(&mut self) -> &mut Stores {
        &mut self.stores
    }

    pub fn warn(&mut self, warning: Warning) {
        self.warnings.push(warning);
    }

    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    pub fn take_warnings(&mut self) -> Vec<Warning> {
        std::mem::take(&mut self.warnings)
    }

    /// Runs the main loop until the input is exhausted.
    pub fn run(&mut self, buffer: &mut LineBuffer) -> Result<()> {
        while let Some(token) = self.input.next() {
            if is_command_escape(&token) && self.dispatch(token.clone(), Some(&mut *buffer))? {
                continue;
            }
            buffer.append_text(token.text());
        }
        if let Some(frame) = self.call_stack.last() {
            return Err(Error::new_token_error(
                frame.token.clone(),
                format!["the `{}` command did not finish", frame.command],
            ));
        }
        Ok(())
    }

    /// Dispatches the command following an escape sequence.
    ///
    /// With a buffer the command writes to it directly.
    /// Without one its output is re-lexed and pushed back onto the input.
    ///
    /// Returns false if no command accepts the token after the escape sequence,
    ///     in which case that token is put back.
    pub fn dispatch(&mut self, escape: Token, buffer: Option<&mut LineBuffer>) -> Result<bool> {
        let trigger = match self.input.next() {
            Some(trigger) => trigger,
            None => {
                return Err(Error::new_end_of_input_error(
                    self.input.position(),
                    "expected a command after the escape sequence `--`",
                ))
            }
        };
        let registry = self.registry;
        let command = match registry.lookup(&trigger) {
            Some(command) => command,
            None => {
                self.input.back(trigger);
                return Ok(false);
            }
        };
        self.call_stack.push(Frame {
            command: command.name().into(),
            token: escape.clone(),
        });
        let result = self.invoke(command, escape.clone(), trigger, buffer);
        self.call_stack.pop();
        match result {
            Ok(()) => Ok(true),
            Err(mut err) => {
                err.push_stack_trace_element(command.name(), escape.position());
                Err(err)
            }
        }
    }

    fn invoke(
        &mut self,
        command: &'r Command,
        escape: Token,
        trigger: Token,
        buffer: Option<&mut LineBuffer>,
    ) -> Result<()> {
        let params = if command.takes_parameters() {
            params::parse(&mut self.input)?
        } else {
            Default::default()
        };
        self.check_parameters(command, &params)?;
        let position = escape.position();
        let call = Call::new(command, escape, trigger, params);
        let handler = command.handler();
        match buffer {
            Some(buffer) => handler(&call, buffer, self),
            None => {
                let mut private = LineBuffer::new();
                handler(&call, &mut private, self)?;
                let output = private.join(&self.options.line_break);
                self.input
                    .push_tokens(token::tokenize_substring(&output, position));
                Ok(())
            }
        }
    }

    fn check_parameters(&mut self, command: &Command, params: &params::List) -> Result<()> {
        let mut seen: Vec<&str> = vec![];
        for param in params.iter() {
            let declared = match command.parameter(param.name()) {
                Some(declared) => declared,
                None => {
                    let names: Vec<&str> = command.parameters().iter().map(|p| p.name).collect();
                    let err = Error::new_token_error(
                        param.token().clone(),
                        format![
                            "the `{}` command has no parameter named `{}`",
                            command.name(),
                            param.name()
                        ],
                    );
                    let close_words = spellcheck::find_close_words(&names, param.name());
                    return Err(match close_words.first() {
                        Some(word) => err.with_note(format!["did you mean `{word}`?"]),
                        None => err.with_note(format![
                            "the parameters of this command are: {}",
                            names.join(", ")
                        ]),
                    });
                }
            };
            if !declared.repeatable && seen.contains(&param.name()) {
                self.warn(Warning::DuplicateParameter {
                    command: command.name().into(),
                    parameter: param.name().into(),
                    position: param.token().position(),
                });
            }
            seen.push(param.name());
        }
        Ok(())
    }

    /// Builds a bracket tree from the input.
    ///
    /// Building stops at the first token outside of any bracket for which `is_end` holds;
    ///     that token is consumed but not part of the tree.
    /// It also stops at the end of the input, provided every bracket has been closed.
    ///
    /// Brackets in `brackets` create child nodes and must be balanced.
    /// With `allow_commands`, escape sequences dispatch commands whose output is spliced
    ///     back into the input.
    pub fn build_tree<F: FnMut(&Token) -> bool>(
        &mut self,
        mut is_end: F,
        allow_commands: bool,
        brackets: &[BracketPair],
    ) -> Result<Tree> {
        let mut builder = tree::Builder::new(brackets);
        while let Some(token) = self.input.next() {
            if allow_commands && is_command_escape(&token) {
                if !self.dispatch(token.clone(), None)? {
                    builder.push_leaf(token);
                }
                continue;
            }
            if builder.depth() == 0 && is_end(&token) {
                break;
            }
            builder.push(token)?;
        }
        builder.finish()
    }

    /// Evaluates a math expression tree and renders the result.
    ///
    /// The tree is evaluated inside a wrapper node, the first survivor is kept,
    ///     the wrapper's parentheses are removed and surrounding whitespace is trimmed.
    pub fn evaluate_expression(&mut self, tree: &Tree, dispatch: &Dispatch) -> String {
        let survivors = eval::evaluate_wrapped(tree, dispatch);
        self.render_first(survivors)
    }

    /// Renders the first survivor of an evaluation, after removing one parenthesis layer.
    ///
    /// Any further survivors are dropped with a [Warning::DiscardedTokens].
    pub fn render_first(&mut self, survivors: Vec<EvalToken>) -> String {
        let mut survivors = survivors.into_iter();
        let mut first = match survivors.next() {
            None => return String::new(),
            Some(first) => first,
        };
        let rest: Vec<EvalToken> = survivors.collect();
        if let Some(next) = rest.first() {
            self.warn(Warning::DiscardedTokens {
                position: next.start(),
                kept: first.to_string(),
                discarded: eval::join(&rest),
            });
        }
        first.unwrap();
        first.to_string().trim().to_string()
    }
}

/// Escape sequences in command output are text, so output is never run twice.
fn is_command_escape(token: &Token) -> bool {
    token.kind() == Kind::Escape && !token.is_expanded()
}
