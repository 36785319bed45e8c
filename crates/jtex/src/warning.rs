//! Warnings
//!
//! Warnings describe problems that do not stop a conversion.
//! They are collected and returned to the caller, which decides how to report them.

use crate::color::Colorize;
use crate::token::Position;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    /// A plugin could not be loaded and was skipped.
    PluginSkipped { source: String, reason: String },
    /// An expression did not reduce to a single token; everything after the first was dropped.
    DiscardedTokens {
        position: Position,
        kept: String,
        discarded: String,
    },
    /// A non-repeatable parameter was given more than once; only the first is used.
    DuplicateParameter {
        command: String,
        parameter: String,
        position: Position,
    },
}

impl Warning {
    pub fn message(&self) -> String {
        match self {
            Warning::PluginSkipped { source, reason } => {
                format!["skipped plugin `{source}`: {reason}"]
            }
            Warning::DiscardedTokens {
                position,
                kept,
                discarded,
            } => format![
                "expression at {position} did not reduce to a single value; kept `{kept}` and discarded `{discarded}`"
            ],
            Warning::DuplicateParameter {
                command,
                parameter,
                position,
            } => format![
                "the `{parameter}` parameter of the `{command}` command was provided more than once; the occurrence at {position} is ignored"
            ],
        }
    }
}

impl std::fmt::Display for Warning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", "Warning".bright_yellow().bold(), self.message())
    }
}
